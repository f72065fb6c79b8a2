//! Paths into a value tree.
//!
//! A [`JsonPath`] is an ordered list of [`PathSegment`]s. Overlaid on a root
//! object type it also names a location in the schema graph, which is how the
//! resolver, the validator, and the editor agree on "where" an edit happened.

use std::fmt::{self, Display};

/// One step of a [`JsonPath`]: a property key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// A field/property access (e.g., `charts`, `name`)
    Field(String),
    /// An array index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A path to a value in a nested JSON-like structure.
///
/// `JsonPath` represents locations like `traces[0].props` and provides
/// methods for building paths incrementally. Two renderings exist:
/// [`Display`] produces the bracketed form used in error reports, and
/// [`JsonPath::to_dotted`] produces the dotted form (`traces.0.props`) used
/// as the key of a validation error map.
///
/// # Example
///
/// ```rust
/// use schema_editor::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("traces")
///     .push_index(0)
///     .push_field("props");
///
/// assert_eq!(path.to_string(), "traces[0].props");
/// assert_eq!(path.to_dotted(), "traces.0.props");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Parses the dotted form produced by [`JsonPath::to_dotted`].
    ///
    /// All-digit segments are indices. Empty segments are skipped, so `""`
    /// is the root.
    ///
    /// ```rust
    /// use schema_editor::{JsonPath, PathSegment};
    ///
    /// let path = JsonPath::from_dotted("rows.0.height");
    /// assert_eq!(path.last(), Some(&PathSegment::field("height")));
    /// assert_eq!(path.to_string(), "rows[0].height");
    /// ```
    pub fn from_dotted(dotted: &str) -> Self {
        dotted
            .split('.')
            .filter(|part| !part.is_empty())
            .map(|part| match part.parse::<usize>() {
                Ok(idx) if part.bytes().all(|b| b.is_ascii_digit()) => PathSegment::Index(idx),
                _ => PathSegment::Field(part.to_string()),
            })
            .collect()
    }

    /// A copy of this path extended by a field.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        self.push(PathSegment::Field(name.into()))
    }

    /// A copy of this path extended by an index.
    pub fn push_index(&self, index: usize) -> Self {
        self.push(PathSegment::Index(index))
    }

    /// Returns a new path with `segment` appended.
    pub fn push(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Everything but the last segment; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Renders the path with `.` between every segment, indices included.
    ///
    /// The root path renders as the empty string.
    pub fn to_dotted(&self) -> String {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|segment| match segment {
                PathSegment::Field(name) => name.clone(),
                PathSegment::Index(idx) => idx.to_string(),
            })
            .collect();
        parts.join(".")
    }
}

impl FromIterator<PathSegment> for JsonPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_is_empty() {
        let path = JsonPath::root();
        assert!(path.is_root());
        assert!(path.is_empty());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
        assert_eq!(path.to_dotted(), "");
    }

    #[test]
    fn test_field_with_index() {
        let path = JsonPath::root().push_field("charts").push_index(0);
        assert_eq!(path.to_string(), "charts[0]");
        assert_eq!(path.to_dotted(), "charts.0");
    }

    #[test]
    fn test_deeply_nested_dotted() {
        let path = JsonPath::root()
            .push_field("dashboards")
            .push_index(2)
            .push_field("rows")
            .push_index(0)
            .push_field("items");
        assert_eq!(path.to_string(), "dashboards[2].rows[0].items");
        assert_eq!(path.to_dotted(), "dashboards.2.rows.0.items");
    }

    #[test]
    fn test_parent_path() {
        let path = JsonPath::root()
            .push_field("charts")
            .push_index(0)
            .push_field("layout");

        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "charts[0]");

        let root = parent.parent().unwrap().parent().unwrap();
        assert!(root.is_root());
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_from_dotted_round_trips_keys() {
        for key in ["", "name", "traces.0.props.width", "rows.12"] {
            assert_eq!(JsonPath::from_dotted(key).to_dotted(), key);
        }
        let path = JsonPath::from_dotted("columns.+1");
        assert_eq!(path.last(), Some(&PathSegment::field("+1")));
    }
}

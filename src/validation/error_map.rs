//! Validation errors grouped by dotted path.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{ErrorParams, SchemaError};

use super::{friendly_message, ValueValidation};

/// Human-readable validation messages keyed by dotted path (`"a.0.b"`).
///
/// Serializes as a plain JSON object: `{"label": ["This field is required"]}`.
/// The root object's own errors live under the empty key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorMap(IndexMap<String, Vec<String>>);

impl ErrorMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups failures by the path they occurred at.
    ///
    /// A `required` failure is filed under the missing child's path, so the
    /// message appears where the absent field would be.
    pub fn from_errors<'e>(errors: impl IntoIterator<Item = &'e SchemaError>) -> Self {
        let mut map = Self::new();
        for error in errors {
            let key = match &error.params {
                Some(ErrorParams::Required { property }) => {
                    error.path.push_field(property.as_str()).to_dotted()
                }
                _ => error.path.to_dotted(),
            };
            map.0.entry(key).or_default().push(friendly_message(error));
        }
        map
    }

    /// Records the outcome of re-validating one path.
    ///
    /// A failure replaces the messages stored under `key`; a success removes
    /// the key.
    pub fn merge(&mut self, key: impl Into<String>, validation: &ValueValidation) {
        let key = key.into();
        if validation.valid {
            self.0.shift_remove(&key);
        } else {
            self.0.insert(key, validation.errors.clone());
        }
    }

    /// Drops every entry at or below `prefix`. The empty prefix clears the map.
    pub fn remove_prefix(&mut self, prefix: &str) {
        if prefix.is_empty() {
            self.0.clear();
            return;
        }
        self.0.retain(|key, _| {
            !(key == prefix
                || key
                    .strip_prefix(prefix)
                    .is_some_and(|rest| rest.starts_with('.')))
        });
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::JsonPath;

    fn required(parent: JsonPath, property: &str) -> SchemaError {
        SchemaError::new(parent, "missing")
            .with_code("required")
            .with_params(ErrorParams::Required {
                property: property.to_string(),
            })
    }

    #[test]
    fn test_required_filed_under_child() {
        let errors = [required(JsonPath::root(), "name")];
        let map = ErrorMap::from_errors(&errors);
        assert_eq!(map.get("name"), Some(&["This field is required".to_string()][..]));
        assert!(!map.contains_key(""));
    }

    #[test]
    fn test_nested_paths_are_dotted() {
        let path = JsonPath::root().push_field("traces").push_index(2);
        let errors = [required(path, "props")];
        let map = ErrorMap::from_errors(&errors);
        assert!(map.contains_key("traces.2.props"));
    }

    #[test]
    fn test_merge_inserts_and_removes() {
        let mut map = ErrorMap::new();
        let failed = ValueValidation {
            valid: false,
            errors: vec!["Must be a string".to_string()],
        };
        map.merge("a.b", &failed);
        assert_eq!(map.len(), 1);
        map.merge("a.b", &ValueValidation::valid());
        assert!(map.is_empty());
    }

    #[test]
    fn test_remove_prefix_respects_segments() {
        let mut map = ErrorMap::new();
        let failed = ValueValidation {
            valid: false,
            errors: vec!["x".to_string()],
        };
        for key in ["items", "items.0", "items.1.name", "itemsCount"] {
            map.merge(key, &failed);
        }
        map.remove_prefix("items");
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["itemsCount"]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let errors = [required(JsonPath::root(), "label")];
        let json = serde_json::to_value(ErrorMap::from_errors(&errors)).unwrap();
        assert_eq!(json, serde_json::json!({"label": ["This field is required"]}));
    }
}

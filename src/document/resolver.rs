//! Path and reference resolution over a [`SchemaDocument`].
//!
//! Every function here fails closed: an unresolvable step yields `None`, which
//! callers treat as "no schema information", never as an error.

use serde_json::Value;

use super::node::{AdditionalProperties, SchemaKind, Subschema};
use super::SchemaDocument;
use crate::config::EditorConfig;
use crate::path::{JsonPath, PathSegment};

/// Navigates a schema document starting from a named `$defs` type.
///
/// # Example
///
/// ```rust
/// use schema_editor::{EditorConfig, JsonPath, Resolver, SchemaDocument};
/// use serde_json::json;
///
/// let doc = SchemaDocument::from_value(&json!({
///     "$defs": {
///         "Chart": {
///             "type": "object",
///             "properties": {"traces": {"type": "array", "items": {"$ref": "#/$defs/Trace"}}}
///         },
///         "Trace": {"type": "object", "properties": {"name": {"type": "string"}}}
///     }
/// }))
/// .unwrap();
/// let config = EditorConfig::default();
/// let resolver = Resolver::new(&doc, &config);
///
/// let path = JsonPath::root().push_field("traces").push_index(0).push_field("name");
/// let node = resolver.schema_at_path("Chart", &path, &json!({})).unwrap();
/// assert_eq!(node.type_name(), Some("string"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    document: &'a SchemaDocument,
    top_level_kinds: &'a [String],
    max_depth: usize,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver over `document` using the kinds and depth in `config`.
    pub fn new(document: &'a SchemaDocument, config: &'a EditorConfig) -> Self {
        Self {
            document,
            top_level_kinds: &config.top_level_kinds,
            max_depth: config.max_ref_depth,
        }
    }

    /// The underlying document.
    pub fn document(&self) -> &'a SchemaDocument {
        self.document
    }

    /// Resolves a `#/$defs/<name>` reference; other shapes yield `None`.
    pub fn resolve_ref(&self, reference: &str) -> Option<&'a Subschema> {
        self.document.resolve_ref(reference)
    }

    /// Follows `$ref` chains until a non-reference node is reached.
    pub fn deref(&self, node: &'a Subschema) -> Option<&'a Subschema> {
        let mut current = node;
        for _ in 0..=self.max_depth {
            match &current.kind {
                SchemaKind::Ref(reference) => current = self.resolve_ref(reference)?,
                _ => return Some(current),
            }
        }
        None
    }

    /// Returns true if `reference` names a type listed by one of the
    /// top-level kind arrays, either directly as its items or as a member of
    /// the items' union.
    pub fn is_top_level_ref(&self, reference: &str) -> bool {
        self.top_level_kinds
            .iter()
            .filter_map(|kind| self.top_level_items(kind))
            .any(|items| {
                items.reference() == Some(reference)
                    || items.members().iter().any(|m| m.reference() == Some(reference))
            })
    }

    /// The item schema of a top-level kind array (e.g. `charts`).
    pub fn top_level_items(&self, kind: &str) -> Option<&'a Subschema> {
        match &self.document.root().kind {
            SchemaKind::Object { properties, .. } => match &properties.get(kind)?.kind {
                SchemaKind::Array { items, .. } => items.as_deref(),
                _ => None,
            },
            _ => None,
        }
    }

    /// The configured top-level kinds.
    pub fn top_level_kinds(&self) -> &'a [String] {
        self.top_level_kinds
    }

    /// Resolves the schema describing the value at `path` inside an object of
    /// type `object_type`, whose full value is `root`.
    ///
    /// Numeric segments descend into `items`; field segments into
    /// `properties[key]` or, failing that, a schema-valued
    /// `additionalProperties`. After every step a discriminated union is
    /// narrowed to one member using the matching slice of `root`.
    pub fn schema_at_path(
        &self,
        object_type: &str,
        path: &JsonPath,
        root: &Value,
    ) -> Option<&'a Subschema> {
        let (node, slice) = self.walk(object_type, path, root)?;
        self.settle(node, slice)
    }

    /// Like [`Resolver::schema_at_path`] but leaves the final node un-narrowed.
    ///
    /// Validation uses this so a discriminated union at the target dispatches
    /// on the value being validated rather than on the value it replaces.
    pub fn locate(
        &self,
        object_type: &str,
        path: &JsonPath,
        root: &Value,
    ) -> Option<&'a Subschema> {
        self.walk(object_type, path, root).map(|(node, _)| node)
    }

    /// The object-shaped schema at `path`, looking through unions for the
    /// first object member.
    pub fn object_schema_at(
        &self,
        object_type: &str,
        path: &JsonPath,
        root: &Value,
    ) -> Option<&'a Subschema> {
        let (node, slice) = self.walk(object_type, path, root)?;
        self.object_schema_of(node, slice)
    }

    /// The object-shaped schema behind `node`, where `value` is the value
    /// `node` describes.
    pub fn object_schema_of(&self, node: &'a Subschema, value: Option<&Value>) -> Option<&'a Subschema> {
        let node = self.settle(node, value)?;
        self.object_like(node, value, 0)
    }

    /// One step down: the schema of the child at `segment` of a value
    /// described by `node`. `value` is the parent value, used to narrow
    /// discriminated unions.
    ///
    /// Walking a path from its `$defs` type one segment at a time gives the
    /// same node as [`Resolver::locate`].
    pub fn child_schema(
        &self,
        node: &'a Subschema,
        segment: &PathSegment,
        value: Option<&Value>,
    ) -> Option<&'a Subschema> {
        let current = self.settle(node, value)?;
        let next = self.step(current, segment, value, 0)?;
        self.deref(next)
    }

    /// Narrows a discriminated union to one member.
    ///
    /// The tag is read from `value[propertyName]`, falling back to the node's
    /// own default for that property; the tag's mapping entry is resolved.
    /// Without a usable tag, or when the mapped reference does not resolve,
    /// the first `oneOf` member is returned. That fallback
    /// is a best-effort guess, not a validation judgement. Non-discriminated
    /// nodes are returned unchanged.
    pub fn discriminated_schema(
        &self,
        node: &'a Subschema,
        value: Option<&Value>,
    ) -> Option<&'a Subschema> {
        match &node.kind {
            SchemaKind::Discriminated { members, .. } => self
                .discriminated_reference(node, value)
                .and_then(|reference| self.resolve_ref(reference))
                .or_else(|| members.first().and_then(|m| self.deref(m))),
            _ => Some(node),
        }
    }

    /// The `$ref` a discriminated union selects for `value`.
    ///
    /// Falls back to the first member's reference when the tag is missing or
    /// unmapped; `None` if that member is inline.
    pub fn discriminated_reference(
        &self,
        node: &'a Subschema,
        value: Option<&Value>,
    ) -> Option<&'a str> {
        let SchemaKind::Discriminated {
            discriminator,
            members,
        } = &node.kind
        else {
            return node.reference();
        };

        let tag = value
            .and_then(|v| v.get(&discriminator.property_name))
            .and_then(Value::as_str)
            .or(discriminator.tag_default.as_deref());

        tag.and_then(|t| discriminator.mapping.get(t))
            .map(String::as_str)
            .or_else(|| members.first().and_then(Subschema::reference))
    }

    /// Dereferences and narrows discriminated unions until a concrete node remains.
    pub fn settle(&self, node: &'a Subschema, value: Option<&Value>) -> Option<&'a Subschema> {
        let mut current = self.deref(node)?;
        for _ in 0..=self.max_depth {
            match &current.kind {
                SchemaKind::Discriminated { .. } => {
                    current = self.deref(self.discriminated_schema(current, value)?)?;
                }
                _ => return Some(current),
            }
        }
        None
    }

    fn walk<'v>(
        &self,
        object_type: &str,
        path: &JsonPath,
        root: &'v Value,
    ) -> Option<(&'a Subschema, Option<&'v Value>)> {
        let mut node = self.deref(self.document.definition(object_type)?)?;
        let mut slice = Some(root);

        for segment in path.segments() {
            node = self.child_schema(node, segment, slice)?;
            slice = slice.and_then(|v| child_value(v, segment));
        }

        Some((node, slice))
    }

    fn step(
        &self,
        node: &'a Subschema,
        segment: &PathSegment,
        value: Option<&Value>,
        depth: usize,
    ) -> Option<&'a Subschema> {
        if depth > self.max_depth {
            return None;
        }
        match (&node.kind, segment) {
            (SchemaKind::Array { items, .. }, PathSegment::Index(_)) => items.as_deref(),
            (
                SchemaKind::Object {
                    properties,
                    additional,
                    ..
                },
                PathSegment::Field(key),
            ) => properties.get(key).or(match additional {
                AdditionalProperties::Schema(schema) => Some(schema.as_ref()),
                _ => None,
            }),
            (SchemaKind::OneOf(members) | SchemaKind::AnyOf(members), _) => members
                .iter()
                .filter_map(|m| self.settle(m, value))
                .find_map(|m| self.step(m, segment, value, depth + 1)),
            _ => None,
        }
    }

    fn object_like(
        &self,
        node: &'a Subschema,
        value: Option<&Value>,
        depth: usize,
    ) -> Option<&'a Subschema> {
        if depth > self.max_depth {
            return None;
        }
        match &node.kind {
            SchemaKind::Object { .. } => Some(node),
            SchemaKind::OneOf(members) | SchemaKind::AnyOf(members) => members
                .iter()
                .filter_map(|m| self.settle(m, value))
                .find_map(|m| self.object_like(m, value, depth + 1)),
            _ => None,
        }
    }
}

/// The child of `value` addressed by `segment`.
pub(crate) fn child_value<'v>(value: &'v Value, segment: &PathSegment) -> Option<&'v Value> {
    match segment {
        PathSegment::Field(key) => value.get(key.as_str()),
        PathSegment::Index(idx) => value.get(*idx),
    }
}

/// The value at `path` inside `root`.
pub(crate) fn value_at<'v>(root: &'v Value, path: &JsonPath) -> Option<&'v Value> {
    path.segments()
        .try_fold(root, |current, segment| child_value(current, segment))
}

//! The loaded schema document and everything derived from navigating it.
//!
//! - [`SchemaDocument`]: the parsed, immutable schema
//! - [`Resolver`]: path and reference resolution over a document
//! - [`PropertyDescriptor`] / [`CatalogMemo`]: which properties exist where
//! - default value synthesis lives on [`Resolver::default_value`]

mod catalog;
mod defaults;
mod node;
mod resolver;

pub use catalog::{CatalogMemo, PropertyDescriptor};
pub use node::{
    AdditionalProperties, Annotations, Discriminator, JsonType, NodeId, SchemaKind, Subschema,
};
pub use resolver::Resolver;
pub(crate) use resolver::value_at;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::SchemaLoadError;
use node::{parse_node, NodeIds};

/// Prefix of every reference the resolver understands.
pub const DEFS_PREFIX: &str = "#/$defs/";

/// A parsed JSON Schema document.
///
/// Holds the `$defs` table and the root node (whose `properties` list the
/// top-level object kinds). Immutable once built; share it with `Arc`.
///
/// # Example
///
/// ```rust
/// use schema_editor::SchemaDocument;
/// use serde_json::json;
///
/// let doc = SchemaDocument::from_value(&json!({
///     "$defs": {"Widget": {"type": "object", "properties": {"label": {"type": "string"}}}}
/// }))
/// .unwrap();
///
/// assert!(doc.definition("Widget").is_some());
/// assert!(doc.resolve_ref("#/$defs/Widget").is_some());
/// assert!(doc.resolve_ref("https://example.com/Widget").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    defs: IndexMap<String, Subschema>,
    root: Subschema,
    node_count: usize,
}

impl SchemaDocument {
    /// Parses a document from a JSON value whose root must be an object.
    pub fn from_value(raw: &Value) -> Result<Self, SchemaLoadError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| SchemaLoadError::NotAnObject(JsonType::of(raw).as_str()))?;

        let mut ids = NodeIds::default();
        let defs = obj
            .get("$defs")
            .and_then(Value::as_object)
            .map(|defs| {
                defs.iter()
                    .map(|(name, def)| (name.clone(), parse_node(def, &mut ids)))
                    .collect()
            })
            .unwrap_or_default();

        // The root's own `$defs` were parsed above; strip them so they are not
        // parsed (and numbered) twice.
        let mut root_raw = obj.clone();
        root_raw.remove("$defs");
        let root = parse_node(&Value::Object(root_raw), &mut ids);

        Ok(Self {
            defs,
            root,
            node_count: ids.issued(),
        })
    }

    /// A document with no definitions. Every path resolves to nothing.
    pub fn empty() -> Self {
        let mut ids = NodeIds::default();
        let root = parse_node(&Value::Object(serde_json::Map::new()), &mut ids);
        Self {
            defs: IndexMap::new(),
            root,
            node_count: ids.issued(),
        }
    }

    /// Parses a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, SchemaLoadError> {
        let raw: Value = serde_json::from_str(text)?;
        Self::from_value(&raw)
    }

    /// Looks up a `$defs` entry by type name.
    pub fn definition(&self, name: &str) -> Option<&Subschema> {
        self.defs.get(name)
    }

    /// Names of all `$defs` entries, in declaration order.
    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }

    /// The root node.
    pub fn root(&self) -> &Subschema {
        &self.root
    }

    /// Resolves a `#/$defs/<name>` reference. Any other shape yields `None`.
    pub fn resolve_ref(&self, reference: &str) -> Option<&Subschema> {
        ref_name(reference).and_then(|name| self.definition(name))
    }

    /// Total number of parsed nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }
}

/// Extracts the type name from a `#/$defs/<name>` reference.
pub fn ref_name(reference: &str) -> Option<&str> {
    reference
        .strip_prefix(DEFS_PREFIX)
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

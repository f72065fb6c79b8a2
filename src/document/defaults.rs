//! Default values for properties that are about to be created.

use serde_json::Value;

use super::node::Subschema;
use super::resolver::Resolver;
use crate::path::JsonPath;

impl<'a> Resolver<'a> {
    /// Synthesizes a value for the (not yet present) location at `path`.
    ///
    /// An explicit `default` on the resolved schema is returned verbatim.
    /// Otherwise the empty value of the declared `type` is returned (`""`,
    /// `0`, `false`, `[]`, `{}`). Unresolvable paths and untyped schemas give
    /// `null`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schema_editor::{EditorConfig, JsonPath, Resolver, SchemaDocument};
    /// use serde_json::json;
    ///
    /// let doc = SchemaDocument::from_value(&json!({
    ///     "$defs": {"Widget": {"type": "object", "properties": {
    ///         "label": {"type": "string"},
    ///         "color": {"type": "string", "default": "blue"}
    ///     }}}
    /// }))
    /// .unwrap();
    /// let config = EditorConfig::default();
    /// let resolver = Resolver::new(&doc, &config);
    ///
    /// assert_eq!(resolver.default_value("Widget", &JsonPath::from_field("label")), json!(""));
    /// assert_eq!(resolver.default_value("Widget", &JsonPath::from_field("color")), json!("blue"));
    /// assert_eq!(resolver.default_value("Widget", &JsonPath::from_field("nope")), json!(null));
    /// ```
    pub fn default_value(&self, object_type: &str, path: &JsonPath) -> Value {
        self.schema_at_path(object_type, path, &Value::Null)
            .map(|node| self.default_for(node))
            .unwrap_or(Value::Null)
    }

    /// The default value for a resolved node.
    pub fn default_for(&self, node: &'a Subschema) -> Value {
        if let Some(default) = &node.annotations.default {
            return default.clone();
        }
        node.annotations
            .primary_type()
            .map(|declared| declared.empty_value())
            .unwrap_or(Value::Null)
    }
}

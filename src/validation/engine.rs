use rayon::prelude::*;
use serde_json::Value;
use std::sync::Arc;
use stillwater::Validation;
use tracing::info;

use crate::cache::ValidatorCache;
use crate::config::EditorConfig;
use crate::document::{value_at, Resolver, SchemaDocument, Subschema};
use crate::error::{ErrorParams, SchemaErrors};
use crate::path::JsonPath;

use super::{friendly_message, ErrorMap, ObjectValidation, ValueValidation};

/// Validates values against a loaded schema document.
///
/// Without a loaded document every request is valid: a missing schema never
/// blocks editing. Loading a document replaces the validator cache, which
/// is the only way compiled validators are discarded.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use schema_editor::validation::ValidationEngine;
/// use schema_editor::{EditorConfig, SchemaDocument};
/// use serde_json::json;
///
/// let doc = SchemaDocument::from_value(&json!({
///     "$defs": {"Widget": {
///         "type": "object",
///         "properties": {"label": {"type": "string"}},
///         "required": ["label"]
///     }}
/// })).unwrap();
///
/// let mut engine = ValidationEngine::new(EditorConfig::default());
/// engine.load(Arc::new(doc));
///
/// let result = engine.validate_object("Widget", &json!({}));
/// assert!(!result.valid);
/// assert_eq!(result.errors.get("label").unwrap(), ["This field is required"]);
/// ```
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    config: EditorConfig,
    cache: Option<ValidatorCache>,
}

impl ValidationEngine {
    /// Creates an engine with no document loaded.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            cache: None,
        }
    }

    /// Loads `document`, discarding validators compiled for any previous one.
    pub fn load(&mut self, document: Arc<SchemaDocument>) {
        info!(
            definitions = document.definition_names().count(),
            nodes = document.node_count(),
            "schema document loaded"
        );
        self.cache = Some(ValidatorCache::new(document).with_max_depth(self.config.max_ref_depth));
    }

    /// Forgets the loaded document; every request becomes valid.
    pub fn unload(&mut self) {
        self.cache = None;
    }

    pub fn document(&self) -> Option<&Arc<SchemaDocument>> {
        self.cache.as_ref().map(ValidatorCache::document)
    }

    /// Number of validators compiled so far for the loaded document.
    pub fn cached_validators(&self) -> usize {
        self.cache.as_ref().map_or(0, ValidatorCache::len)
    }

    /// Validates `value` as the value at `path` inside an `object_type`.
    ///
    /// Unions met along the path are narrowed without knowledge of the
    /// surrounding value; use [`ValidationEngine::validate_at`] when the whole
    /// object is at hand.
    pub fn validate_value(&self, object_type: &str, path: &JsonPath, value: &Value) -> ValueValidation {
        self.run(object_type, path, &Value::Null, value)
    }

    /// Validates the value at `path` inside `root`, an `object_type`.
    ///
    /// A path with no value behind it is valid.
    pub fn validate_at(&self, object_type: &str, root: &Value, path: &JsonPath) -> ValueValidation {
        match value_at(root, path) {
            Some(value) => self.run(object_type, path, root, value),
            None => ValueValidation::valid(),
        }
    }

    /// Like [`ValidationEngine::validate_at`], but keeps only the failures of
    /// the value at `path` itself.
    ///
    /// Failures of nested values are dropped, which leaves container keywords
    /// such as `minItems` on an array. A `required` failure belongs to the
    /// missing child and is dropped too.
    pub fn validate_node_at(&self, object_type: &str, root: &Value, path: &JsonPath) -> ValueValidation {
        let Some(value) = value_at(root, path) else {
            return ValueValidation::valid();
        };
        let Some(errors) = self.failures(object_type, path, root, value) else {
            return ValueValidation::valid();
        };
        let messages: Vec<String> = errors
            .iter()
            .filter(|e| e.path == *path && !matches!(e.params, Some(ErrorParams::Required { .. })))
            .map(friendly_message)
            .collect();
        if messages.is_empty() {
            ValueValidation::valid()
        } else {
            ValueValidation {
                valid: false,
                errors: messages,
            }
        }
    }

    /// Validates a whole `object_type` value, grouping failures by path.
    pub fn validate_object(&self, object_type: &str, value: &Value) -> ObjectValidation {
        let Some((cache, node)) = self.definition(object_type) else {
            return ObjectValidation::valid();
        };
        match cache.validate(node, value, &JsonPath::root()) {
            Validation::Success(()) => ObjectValidation::valid(),
            Validation::Failure(errors) => ObjectValidation {
                valid: false,
                errors: ErrorMap::from_errors(errors.iter()),
            },
        }
    }

    /// Validates many `(object_type, value)` pairs in parallel.
    ///
    /// Results are in input order. Workers share the compiled validators.
    pub fn validate_batch(&self, objects: &[(String, Value)]) -> Vec<ObjectValidation> {
        objects
            .par_iter()
            .map(|(object_type, value)| self.validate_object(object_type, value))
            .collect()
    }

    fn definition(&self, object_type: &str) -> Option<(&ValidatorCache, &Subschema)> {
        let cache = self.cache.as_ref()?;
        let node = cache.document().definition(object_type)?;
        Some((cache, node))
    }

    fn run(&self, object_type: &str, path: &JsonPath, root: &Value, value: &Value) -> ValueValidation {
        match self.failures(object_type, path, root, value) {
            Some(errors) => ValueValidation::from_errors(&errors),
            None => ValueValidation::valid(),
        }
    }

    /// Every failure of `value` as the value at `path`; `None` when it passes
    /// or nothing constrains it.
    fn failures(&self, object_type: &str, path: &JsonPath, root: &Value, value: &Value) -> Option<SchemaErrors> {
        let cache = self.cache.as_ref()?;
        let resolver = Resolver::new(cache.document(), &self.config);
        let node = resolver.locate(object_type, path, root)?;
        match cache.validate(node, value, path) {
            Validation::Success(()) => None,
            Validation::Failure(errors) => Some(errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine() -> ValidationEngine {
        let doc = SchemaDocument::from_value(&json!({
            "$defs": {
                "Widget": {
                    "type": "object",
                    "properties": {
                        "label": {"type": "string"},
                        "count": {"type": "integer", "minimum": 0},
                        "tags": {"type": "array", "items": {"type": "string", "maxLength": 3}, "maxItems": 2}
                    },
                    "required": ["label"]
                }
            }
        }))
        .unwrap();
        let mut engine = ValidationEngine::new(EditorConfig::default());
        engine.load(Arc::new(doc));
        engine
    }

    #[test]
    fn test_no_document_is_always_valid() {
        let engine = ValidationEngine::new(EditorConfig::default());
        assert!(engine.validate_object("Widget", &json!(null)).valid);
        assert!(engine.validate_value("Widget", &JsonPath::root(), &json!(1)).valid);
    }

    #[test]
    fn test_unknown_type_or_path_is_valid() {
        let engine = engine();
        assert!(engine.validate_object("Gadget", &json!(1)).valid);
        let path = JsonPath::from_field("nowhere");
        assert!(engine.validate_value("Widget", &path, &json!(1)).valid);
    }

    #[test]
    fn test_validate_value_at_path() {
        let engine = engine();
        let path = JsonPath::from_field("tags").push_index(0);
        let result = engine.validate_value("Widget", &path, &json!("long"));
        assert_eq!(result.errors, vec!["Must be at most 3 characters"]);
        assert!(engine.validate_value("Widget", &path, &json!("ok")).valid);
    }

    #[test]
    fn test_validate_at_missing_value_is_valid() {
        let engine = engine();
        let path = JsonPath::from_field("count");
        assert!(engine.validate_at("Widget", &json!({}), &path).valid);
        assert!(!engine.validate_at("Widget", &json!({"count": 1.5}), &path).valid);
    }

    #[test]
    fn test_validate_node_at_keeps_only_own_failures() {
        let engine = engine();
        let path = JsonPath::from_field("tags");

        let root = json!({"label": "a", "tags": ["long", "x", "y"]});
        let own = engine.validate_node_at("Widget", &root, &path);
        assert!(!own.valid);
        assert_eq!(own.errors, vec!["must have at most 2 items, got 3"]);
        assert_eq!(engine.validate_at("Widget", &root, &path).errors.len(), 2);

        let root = json!({"label": "a", "tags": ["long"]});
        assert!(engine.validate_node_at("Widget", &root, &path).valid);
        assert!(!engine.validate_at("Widget", &root, &path).valid);

        // The root's missing `label` belongs to `label`, not the root.
        assert!(engine.validate_node_at("Widget", &json!({}), &JsonPath::root()).valid);
    }

    #[test]
    fn test_batch_preserves_order() {
        let engine = engine();
        let results = engine.validate_batch(&[
            ("Widget".to_string(), json!({"label": "a"})),
            ("Widget".to_string(), json!({})),
        ]);
        assert!(results[0].valid);
        assert!(!results[1].valid);
    }

    #[test]
    fn test_reload_replaces_cache() {
        let mut engine = engine();
        engine.validate_object("Widget", &json!({}));
        assert!(engine.cached_validators() > 0);
        let doc = engine.document().unwrap().clone();
        engine.load(doc);
        assert_eq!(engine.cached_validators(), 0);
    }
}

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::document::{
    value_at, CatalogMemo, PropertyDescriptor, Resolver, SchemaDocument, SchemaKind,
};
use crate::error::EditorError;
use crate::loading::{load_document, SchemaSource};
use crate::path::JsonPath;
use crate::validation::{ErrorMap, ValidationEngine};

use super::protocol::{EditNode, Renderer};
use super::references::ReferenceIndex;
use super::selector::PropertySelector;
use super::tree::{TreeNode, ValueTree};
use super::EditAction;

/// One editor instance: a top-level object being edited against a schema.
///
/// The session owns the loaded document, the validator cache (inside its
/// [`ValidationEngine`]), the catalog memo, the value tree, and the error
/// map. Every edit produces a new [`ValueTree`] and re-validates the
/// affected path. A failed edit leaves everything untouched.
///
/// Until a schema loads, or after a load fails, the session is *degraded*:
/// every value validates, catalogs are empty, and editing still works.
///
/// # Example
///
/// ```rust
/// use schema_editor::editor::{EditAction, EditorSession};
/// use schema_editor::loading::StaticSource;
/// use schema_editor::{EditorConfig, JsonPath};
/// use serde_json::json;
///
/// let schema = StaticSource::new(r#"{"$defs": {"Widget": {
///     "type": "object",
///     "properties": {"label": {"type": "string"}, "count": {"type": "integer", "minimum": 0}},
///     "required": ["label"]
/// }}}"#);
///
/// let mut session = EditorSession::new(EditorConfig::default(), "Widget", &json!({"count": -1}));
/// session.load_schema(&schema);
/// assert_eq!(session.errors().get("label").unwrap(), ["This field is required"]);
///
/// session
///     .apply(EditAction::AddProperty { path: JsonPath::root(), key: "label".into() })
///     .unwrap();
/// assert_eq!(session.value(), json!({"count": -1, "label": ""}));
/// assert!(!session.errors().contains_key("label"));
/// ```
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    object_type: String,
    document: Arc<SchemaDocument>,
    degraded: bool,
    engine: ValidationEngine,
    catalog: CatalogMemo,
    tree: ValueTree,
    errors: ErrorMap,
    references: ReferenceIndex,
}

impl EditorSession {
    /// Starts a degraded session over `value`, an `object_type`.
    pub fn new(config: EditorConfig, object_type: impl Into<String>, value: &Value) -> Self {
        Self {
            engine: ValidationEngine::new(config.clone()),
            config,
            object_type: object_type.into(),
            document: Arc::new(SchemaDocument::empty()),
            degraded: true,
            catalog: CatalogMemo::new(),
            tree: ValueTree::from_json(value),
            errors: ErrorMap::new(),
            references: ReferenceIndex::new(),
        }
    }

    /// Fetches and installs the schema, replacing any previous one.
    ///
    /// A failed load is logged and leaves the session degraded; it is never
    /// returned to the caller.
    pub fn load_schema<S: SchemaSource>(&mut self, source: &S) {
        match load_document(source) {
            Ok(document) => self.set_document(Arc::new(document)),
            Err(error) => {
                warn!(%error, object_type = %self.object_type, "schema load failed; editing without validation");
                self.document = Arc::new(SchemaDocument::empty());
                self.degraded = true;
                self.engine.unload();
                self.catalog.invalidate();
                self.errors = ErrorMap::new();
            }
        }
    }

    /// Installs an already parsed schema.
    ///
    /// Compiled validators and memoized catalogs of the previous document are
    /// discarded, and the whole value is validated afresh.
    pub fn set_document(&mut self, document: Arc<SchemaDocument>) {
        self.engine.load(Arc::clone(&document));
        self.document = document;
        self.degraded = false;
        self.catalog.invalidate();
        self.validate_all();
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The current value as JSON.
    pub fn value(&self) -> Value {
        self.tree.to_json()
    }

    /// The current version of the value tree.
    pub fn tree(&self) -> &ValueTree {
        &self.tree
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Number of memoized catalog entries.
    pub fn memoized_catalogs(&self) -> usize {
        self.catalog.len()
    }

    pub fn references(&self) -> &ReferenceIndex {
        &self.references
    }

    /// Rebuilds the reference picker candidates from a whole project value.
    pub fn index_project(&mut self, project: &Value) {
        let references = ReferenceIndex::from_project(&self.resolver(), project);
        self.references = references;
    }

    pub fn set_references(&mut self, references: ReferenceIndex) {
        self.references = references;
    }

    /// Re-validates the whole value, replacing the error map.
    pub fn validate_all(&mut self) {
        let root = self.tree.to_json();
        self.errors = self.engine.validate_object(&self.object_type, &root).errors;
    }

    /// Renders the edit-surface tree of the current value.
    pub fn render(&self) -> EditNode {
        let root = self.tree.to_json();
        Renderer::new(
            self.resolver(),
            &self.config,
            &self.catalog,
            &self.object_type,
            &root,
            &self.errors,
            &self.references,
        )
        .render()
    }

    /// Declared properties of the object at `path` that it does not have yet.
    pub fn available_properties(&self, path: &JsonPath) -> Vec<PropertyDescriptor> {
        let root = self.tree.to_json();
        self.catalog
            .addable(&self.resolver(), &self.object_type, path, &root)
    }

    /// Opens the "add property" picker for the object at `path`.
    ///
    /// Fails with [`EditorError::NoPropertiesAvailable`] instead of opening an
    /// empty picker.
    pub fn open_property_selector(&self, path: &JsonPath) -> Result<PropertySelector, EditorError> {
        match self.tree.get(path).map(|node| &**node) {
            Some(TreeNode::Object(_)) => {}
            Some(_) => {
                return Err(EditorError::WrongShape {
                    path: path.to_dotted(),
                    expected: "object",
                })
            }
            None => return Err(EditorError::PathNotFound(path.to_dotted())),
        }
        let options = self.available_properties(path);
        if options.is_empty() {
            return Err(EditorError::NoPropertiesAvailable {
                path: path.to_dotted(),
            });
        }
        Ok(PropertySelector::new(path.clone(), options))
    }

    /// The value a new property or item at `path` starts with.
    pub fn default_value(&self, path: &JsonPath) -> Value {
        let root = self.tree.to_json();
        self.default_at(&self.resolver(), path, &root)
    }

    /// Applies one edit and returns the new tree.
    ///
    /// On error nothing changes: not the tree, not the error map.
    pub fn apply(&mut self, action: EditAction) -> Result<ValueTree, EditorError> {
        debug!(?action, "applying edit");
        match action {
            EditAction::SetValue { path, value } => {
                self.tree = self.tree.set(&path, &value)?;
                self.revalidate(&path);
            }
            EditAction::SelectReference { path, name } => {
                let token = Value::String(self.config.reference_token(&name));
                self.tree = self.tree.set(&path, &token)?;
                self.revalidate(&path);
            }
            EditAction::AppendItem { path } => {
                let len = self.array_len(&path)?;
                let item_path = path.push_index(len);
                let item = self.default_value(&item_path);
                self.tree = self.tree.push_item(&path, &item)?;
                self.revalidate_array(&path)?;
            }
            EditAction::RemoveItem { path, index } => {
                self.tree = self.tree.remove_item(&path, index)?;
                self.revalidate_array(&path)?;
            }
            EditAction::AddProperty { path, key } => {
                let value = self.property_default(&path, &key)?;
                let child = path.push_field(key);
                self.tree = self.tree.set(&child, &value)?;
                self.revalidate(&child);
            }
            EditAction::RemoveProperty { path, key } => {
                if self.is_required(&path, &key) {
                    return Err(EditorError::RequiredProperty {
                        path: path.to_dotted(),
                        key,
                    });
                }
                self.tree = self.tree.remove_property(&path, &key)?;
                self.errors.remove_prefix(&path.push_field(key).to_dotted());
            }
        }
        Ok(self.tree.clone())
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.document, &self.config)
    }

    fn default_at(&self, resolver: &Resolver<'_>, path: &JsonPath, root: &Value) -> Value {
        resolver
            .schema_at_path(&self.object_type, path, root)
            .map(|node| resolver.default_for(node))
            .unwrap_or(Value::Null)
    }

    /// Re-validates the value at `path` and records the outcome under its key.
    fn revalidate(&mut self, path: &JsonPath) {
        let root = self.tree.to_json();
        let result = self.engine.validate_at(&self.object_type, &root, path);
        let key = path.to_dotted();
        self.errors.remove_prefix(&key);
        self.errors.merge(key, &result);
    }

    /// Re-validates an array after its length changed.
    ///
    /// Items may have moved, so each one is checked again under its new key,
    /// and the array's own keywords (`minItems`, `maxItems`) are recorded
    /// under the array's key.
    fn revalidate_array(&mut self, path: &JsonPath) -> Result<(), EditorError> {
        self.errors.remove_prefix(&path.to_dotted());
        for i in 0..self.array_len(path)? {
            self.revalidate(&path.push_index(i));
        }
        let root = self.tree.to_json();
        let own = self.engine.validate_node_at(&self.object_type, &root, path);
        self.errors.merge(path.to_dotted(), &own);
        Ok(())
    }

    fn array_len(&self, path: &JsonPath) -> Result<usize, EditorError> {
        match self.tree.get(path).map(|node| &**node) {
            Some(TreeNode::Array(items)) => Ok(items.len()),
            Some(_) => Err(EditorError::WrongShape {
                path: path.to_dotted(),
                expected: "array",
            }),
            None => Err(EditorError::PathNotFound(path.to_dotted())),
        }
    }

    fn is_required(&self, path: &JsonPath, key: &str) -> bool {
        let root = self.tree.to_json();
        let resolver = self.resolver();
        match resolver
            .object_schema_at(&self.object_type, path, &root)
            .map(|node| &node.kind)
        {
            Some(SchemaKind::Object { required, .. }) => required.iter().any(|r| r == key),
            _ => false,
        }
    }

    /// The starting value of a property about to be added.
    ///
    /// Declared properties take their schema default; top-level references
    /// start as an empty reference for the picker to fill. Undeclared keys are
    /// accepted only on objects open to additional properties.
    fn property_default(&self, path: &JsonPath, key: &str) -> Result<Value, EditorError> {
        let root = self.tree.to_json();
        match value_at(&root, path) {
            Some(Value::Object(obj)) if obj.contains_key(key) => {
                return Err(EditorError::PropertyExists {
                    path: path.to_dotted(),
                    key: key.to_string(),
                })
            }
            Some(Value::Object(_)) => {}
            Some(_) => {
                return Err(EditorError::WrongShape {
                    path: path.to_dotted(),
                    expected: "object",
                })
            }
            None => return Err(EditorError::PathNotFound(path.to_dotted())),
        }

        let resolver = self.resolver();
        let child = path.push_field(key);
        let options = self
            .catalog
            .addable(&resolver, &self.object_type, path, &root);
        if let Some(descriptor) = options.iter().find(|d| d.key == key) {
            if descriptor.is_top_level_ref {
                return Ok(Value::String(String::new()));
            }
            return Ok(self.default_at(&resolver, &child, &root));
        }

        let open = resolver
            .object_schema_at(&self.object_type, path, &root)
            .is_some_and(|node| match &node.kind {
                SchemaKind::Object { additional, .. } => additional.is_open(),
                _ => false,
            });
        if open {
            Ok(self.default_at(&resolver, &child, &root))
        } else {
            Err(EditorError::UnknownProperty {
                path: path.to_dotted(),
                key: key.to_string(),
            })
        }
    }
}

//! Per-document cache of compiled validators.
//!
//! This module provides [`ValidatorCache`], which compiles schema nodes into
//! validators on first use and keeps them for the lifetime of the loaded
//! document.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::DEFAULT_MAX_REF_DEPTH;
use crate::document::{NodeId, SchemaDocument, Subschema};
use crate::path::JsonPath;
use crate::schema::{compile, ValueValidator};
use crate::validation::{RegistryAccess, ValidationContext};
use crate::ValidationResult;

/// Type alias for the validator storage map.
///
/// `None` marks a node that failed to compile; it validates as unconstrained.
type ValidatorMap = Arc<RwLock<HashMap<NodeId, Option<Arc<dyn ValueValidator>>>>>;

/// A thread-safe, append-only cache of compiled validators for one document.
///
/// Entries are keyed by [`NodeId`], which is unique within a document. The
/// cache never evicts; loading a new document means building a new cache,
/// which is the only way entries go away.
///
/// The cache also serves as the [`RegistryAccess`] for `$ref` resolution,
/// so referenced definitions are compiled lazily too.
///
/// # Thread Safety
///
/// Clones share storage through `Arc<RwLock<...>>`:
/// - Multiple threads can validate concurrently (read-only access)
/// - Inserting a freshly compiled validator takes the write lock briefly
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use schema_editor::cache::ValidatorCache;
/// use schema_editor::{JsonPath, SchemaDocument};
/// use serde_json::json;
///
/// let doc = SchemaDocument::from_value(&json!({
///     "$defs": {"Port": {"type": "integer", "minimum": 1}}
/// })).unwrap();
/// let cache = ValidatorCache::new(Arc::new(doc));
/// let port = cache.document().definition("Port").unwrap().clone();
///
/// assert!(cache.validate(&port, &json!(0), &JsonPath::root()).is_failure());
/// assert_eq!(cache.len(), 1);
/// ```
#[derive(Clone)]
pub struct ValidatorCache {
    document: Arc<SchemaDocument>,
    validators: ValidatorMap,
    max_depth: usize,
}

impl ValidatorCache {
    /// Creates an empty cache for `document` with the default max depth (100).
    pub fn new(document: Arc<SchemaDocument>) -> Self {
        Self {
            document,
            validators: Arc::new(RwLock::new(HashMap::new())),
            max_depth: DEFAULT_MAX_REF_DEPTH,
        }
    }

    /// Sets the longest `$ref` chain a validation pass follows.
    ///
    /// Exceeding it fails validation with a `max_depth_exceeded` error.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// The document this cache compiles from.
    pub fn document(&self) -> &Arc<SchemaDocument> {
        &self.document
    }

    /// Returns the validator for `node`, compiling it on first use.
    ///
    /// `None` if the node failed to compile. The failure is logged once and
    /// remembered.
    pub fn get_or_compile(&self, node: &Subschema) -> Option<Arc<dyn ValueValidator>> {
        if let Some(entry) = self.validators.read().get(&node.id) {
            return entry.clone();
        }

        let compiled = match compile(node) {
            Ok(validator) => {
                debug!(node = ?node.id, "compiled validator");
                Some(validator)
            }
            Err(error) => {
                warn!(node = ?node.id, %error, "schema node failed to compile; treating as unconstrained");
                None
            }
        };

        self.validators
            .write()
            .entry(node.id)
            .or_insert(compiled)
            .clone()
    }

    /// Validates `value`, located at `path`, against `node`.
    pub fn validate(&self, node: &Subschema, value: &Value, path: &JsonPath) -> ValidationResult<()> {
        match self.get_or_compile(node) {
            Some(validator) => {
                let context = ValidationContext::new(Arc::new(self.clone()), self.max_depth);
                validator.validate_value(value, path, &context)
            }
            None => stillwater::Validation::Success(()),
        }
    }

    /// Number of cached entries, failed compilations included.
    pub fn len(&self) -> usize {
        self.validators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.read().is_empty()
    }
}

impl fmt::Debug for ValidatorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorCache")
            .field("definitions", &self.document.definition_names().count())
            .field("cached", &self.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl RegistryAccess for ValidatorCache {
    fn get_schema(&self, name: &str) -> Option<Arc<dyn ValueValidator>> {
        let node = self.document.definition(name)?;
        self.get_or_compile(node)
    }
}

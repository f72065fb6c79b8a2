//! # Schema Editor
//!
//! The core of a schema-driven configuration editor: navigate a JSON Schema
//! document, work out which properties can go where and what they start as,
//! validate values with human-readable messages, and decide how each value
//! is edited.
//!
//! ## Overview
//!
//! A schema document is parsed once into typed nodes. Everything else is
//! derived from it on demand: a [`Resolver`] walks paths through `$ref`,
//! unions, and discriminators; the catalog lists addable properties; the
//! [`ValidationEngine`](validation::ValidationEngine) compiles validators
//! lazily and caches them per document. Unknown shapes are never errors:
//! a path the schema does not describe is simply unconstrained.
//!
//! Validation accumulates ALL errors through stillwater's `Validation` type
//! rather than stopping at the first one.
//!
//! ## Core Types
//!
//! - [`SchemaDocument`]: the parsed schema
//! - [`Resolver`]: path, reference, and discriminator resolution
//! - [`PropertyDescriptor`]: editing metadata for one property
//! - [`ErrorMap`](validation::ErrorMap): messages keyed by dotted path
//! - [`EditorSession`](editor::EditorSession): value, schema, and errors of one editor
//! - [`JsonPath`]: a location in a value (e.g., `traces[0].props`)
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use schema_editor::validation::ValidationEngine;
//! use schema_editor::{EditorConfig, SchemaDocument};
//! use serde_json::json;
//!
//! let doc = SchemaDocument::from_value(&json!({
//!     "$defs": {"Widget": {
//!         "type": "object",
//!         "properties": {
//!             "label": {"type": "string"},
//!             "count": {"type": "integer", "minimum": 0}
//!         },
//!         "required": ["label"]
//!     }}
//! })).unwrap();
//!
//! let mut engine = ValidationEngine::new(EditorConfig::default());
//! engine.load(Arc::new(doc));
//!
//! let result = engine.validate_object("Widget", &json!({"count": -1}));
//! assert!(!result.valid);
//! assert_eq!(result.errors.get("label").unwrap(), ["This field is required"]);
//! assert_eq!(result.errors.get("count").unwrap(), ["Must be greater than or equal to 0"]);
//! ```

pub mod cache;
pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod loading;
pub mod path;
pub mod schema;
pub mod validation;

pub use config::EditorConfig;
pub use document::{PropertyDescriptor, Resolver, SchemaDocument, Subschema};
pub use editor::{EditAction, EditorSession, ValueTree};
pub use error::{EditorError, SchemaError, SchemaErrors, SchemaLoadError};
pub use path::{JsonPath, PathSegment};
pub use validation::{ErrorMap, ValidationEngine};

/// Type alias for validation results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;

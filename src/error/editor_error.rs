//! Operational errors for loading, compiling, and editing.

use thiserror::Error;

/// Errors that can occur while obtaining a schema document.
///
/// A session that hits one of these logs it and continues in degraded mode;
/// it is never surfaced to the editing user as a hard failure.
#[derive(Debug, Error)]
pub enum SchemaLoadError {
    /// The source could not produce the document text.
    #[error("failed to fetch schema: {0}")]
    Fetch(Box<dyn std::error::Error + Send + Sync>),

    /// The document text is not valid JSON.
    #[error("schema is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but its root is not an object.
    #[error("schema root must be an object, got {0}")]
    NotAnObject(&'static str),
}

/// A subschema that cannot be turned into a validator.
#[derive(Debug, Error)]
pub enum CompileError {
    /// `pattern` is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// A structural edit the editor refused to perform.
///
/// Every variant means the value tree was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Every property the schema declares for this object is already present.
    #[error("no more properties can be added at '{path}'")]
    NoPropertiesAvailable {
        /// Dotted path of the object.
        path: String,
    },

    /// Required properties cannot be deleted.
    #[error("'{key}' is required and cannot be removed from '{path}'")]
    RequiredProperty {
        /// Dotted path of the owning object.
        path: String,
        /// The required property.
        key: String,
    },

    /// The key is neither declared by the schema nor allowed as an additional property.
    #[error("'{key}' is not a known property of '{path}'")]
    UnknownProperty {
        /// Dotted path of the owning object.
        path: String,
        /// The rejected key.
        key: String,
    },

    /// The key is already present on the object.
    #[error("'{key}' already exists on '{path}'")]
    PropertyExists {
        /// Dotted path of the owning object.
        path: String,
        /// The duplicate key.
        key: String,
    },

    /// Nothing exists at the given path.
    #[error("no value at '{0}'")]
    PathNotFound(String),

    /// The value at the path is not the container kind the edit needs.
    #[error("expected {expected} at '{path}'")]
    WrongShape {
        /// Dotted path of the value.
        path: String,
        /// The container kind the operation needs.
        expected: &'static str,
    },

    /// An array index past the end.
    #[error("index {index} out of bounds for '{path}' (length {len})")]
    IndexOutOfBounds {
        /// Dotted path of the array.
        path: String,
        /// The requested index.
        index: usize,
        /// Current array length.
        len: usize,
    },
}

//! Validation failures: [`SchemaError`] for one keyword, [`SchemaErrors`] for a run.

use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;

use crate::path::JsonPath;

/// Structured arguments of a failed keyword.
///
/// The validator records what it checked; turning that into a sentence for the
/// editing user happens later (see [`crate::validation::friendly_message`]).
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorParams {
    /// `type` mismatch, naming the expected JSON type.
    Type { expected: String },
    /// `enum` mismatch, listing the allowed values.
    Enum { allowed: Vec<Value> },
    /// `pattern` mismatch.
    Pattern { pattern: String },
    /// `required` property missing from the object at the error's path.
    Required { property: String },
    /// `format` mismatch.
    Format { format: String },
    /// Below the inclusive `minimum`.
    Minimum { limit: f64 },
    /// Above the inclusive `maximum`.
    Maximum { limit: f64 },
    /// Shorter than `minLength`.
    MinLength { limit: usize },
    /// Longer than `maxLength`.
    MaxLength { limit: usize },
}

/// One keyword failure at one path.
///
/// `message` is the validator's own wording and is kept for logs; what the
/// editing user sees is derived from `code` and `params`. `got` and
/// `expected` are free-form hints, present when the validator knows them.
///
/// # Example
///
/// ```rust
/// use schema_editor::{JsonPath, SchemaError};
///
/// let error = SchemaError::new(JsonPath::from_field("contact"), "not an email address")
///     .with_code("format")
///     .with_expected("email");
///
/// assert_eq!(error.code, "format");
/// assert_eq!(error.to_string(), "contact: not an email address (expected: email)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub path: JsonPath,
    pub message: String,
    pub got: Option<String>,
    pub expected: Option<String>,
    /// The failing keyword, e.g. `maxLength`, or `validation_error`.
    pub code: String,
    pub params: Option<ErrorParams>,
}

impl SchemaError {
    /// An error with the generic `validation_error` code.
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
            params: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_params(mut self, params: ErrorParams) -> Self {
        self.params = Some(params);
        self
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)?;
        } else {
            write!(f, "{}: {}", self.path, self.message)?;
        }
        if let Some(expected) = &self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(got) = &self.got {
            write!(f, " (got: {})", got)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Every failure found in one validation run; never empty.
///
/// Carried as the failure side of [`crate::ValidationResult`], so a failed
/// validation always explains itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// `None` if `errors` is empty.
    pub fn from_errors(errors: Vec<SchemaError>) -> Option<Self> {
        NonEmptyVec::from_vec(errors).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// The errors reported by keyword `code`.
    pub fn with_code(&self, code: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut errors = self.iter();
        if let Some(first) = errors.next() {
            write!(f, "{}", first)?;
        }
        for error in errors {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

//! The validator trait shared by every compiled schema node.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ErrorParams, SchemaError, SchemaErrors};
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

/// A compiled check for one schema node.
///
/// Validators accumulate every failure they find instead of stopping at the
/// first one. The `Send + Sync` bounds let compiled validators live in the
/// shared cache and be used from rayon workers.
///
/// # Example
///
/// ```rust
/// use schema_editor::schema::{StringSchema, ValueValidator};
/// use schema_editor::validation::ValidationContext;
/// use schema_editor::JsonPath;
/// use serde_json::json;
///
/// let schema = StringSchema::new().min_len(2);
/// let context = ValidationContext::detached();
/// assert!(schema.validate_value(&json!("ok"), &JsonPath::root(), &context).is_success());
/// assert!(schema.validate_value(&json!("x"), &JsonPath::root(), &context).is_failure());
/// ```
pub trait ValueValidator: Send + Sync {
    /// Validates `value`, located at `path`, resolving references through `context`.
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> ValidationResult<()>;
}

/// Turns accumulated errors into a validation outcome.
pub(crate) fn finish(errors: Vec<SchemaError>) -> ValidationResult<()> {
    match SchemaErrors::from_errors(errors) {
        Some(errors) => Validation::Failure(errors),
        None => Validation::Success(()),
    }
}

/// Collects the errors of a failed validation into `errors`.
pub(crate) fn absorb(result: ValidationResult<()>, errors: &mut Vec<SchemaError>) {
    if let Validation::Failure(e) = result {
        errors.extend(e.into_vec());
    }
}

/// A `type` keyword failure.
pub(crate) fn type_error(value: &Value, path: &JsonPath, expected: &str) -> SchemaError {
    SchemaError::new(path.clone(), format!("expected {}", expected))
        .with_code("type")
        .with_got(value_type_name(value))
        .with_expected(expected)
        .with_params(ErrorParams::Type {
            expected: expected.to_string(),
        })
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

//! Human-readable messages for validation failures.

use serde_json::Value;

use crate::error::{ErrorParams, SchemaError};

/// Renders a validation failure as the message shown next to the field.
///
/// Failures of the `type`, `enum`, `pattern`, `required`, `format`,
/// `minimum`, `maximum`, `minLength`, and `maxLength` keywords get a fixed
/// template. Anything else keeps the validator's own message.
///
/// # Example
///
/// ```rust
/// use schema_editor::error::{ErrorParams, SchemaError};
/// use schema_editor::validation::friendly_message;
/// use schema_editor::JsonPath;
///
/// let error = SchemaError::new(JsonPath::root(), "must be >= 0, got -1")
///     .with_code("minimum")
///     .with_params(ErrorParams::Minimum { limit: 0.0 });
/// assert_eq!(friendly_message(&error), "Must be greater than or equal to 0");
/// ```
pub fn friendly_message(error: &SchemaError) -> String {
    match &error.params {
        Some(ErrorParams::Type { expected }) => {
            format!("Must be {} {}", article(expected), expected)
        }
        Some(ErrorParams::Enum { allowed }) => format!(
            "Must be one of: {}",
            allowed.iter().map(display_value).collect::<Vec<_>>().join(", ")
        ),
        Some(ErrorParams::Pattern { pattern }) => format!("Must match pattern: {}", pattern),
        Some(ErrorParams::Required { .. }) => "This field is required".to_string(),
        Some(ErrorParams::Format { format }) => format!("Must be a valid {}", format),
        Some(ErrorParams::Minimum { limit }) => {
            format!("Must be greater than or equal to {}", limit)
        }
        Some(ErrorParams::Maximum { limit }) => {
            format!("Must be less than or equal to {}", limit)
        }
        Some(ErrorParams::MinLength { limit }) => format!("Must be at least {} characters", limit),
        Some(ErrorParams::MaxLength { limit }) => format!("Must be at most {} characters", limit),
        None => error.message.clone(),
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Strings are shown bare; other values as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Numeric range validation.
//!
//! [`NumberSchema`] checks the inclusive `minimum` / `maximum` bounds of a
//! number. Whether the number must be integral is a `type` concern and lives
//! in [`TypeSchema`](super::TypeSchema).

use serde_json::Value;

use crate::error::{ErrorParams, SchemaError};
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::traits::{finish, type_error, ValueValidator};

/// A schema for validating numeric ranges.
///
/// # Example
///
/// ```rust
/// use schema_editor::schema::{NumberSchema, ValueValidator};
/// use schema_editor::validation::ValidationContext;
/// use schema_editor::JsonPath;
/// use serde_json::json;
///
/// let schema = NumberSchema::new().minimum(0.0).maximum(10.0);
/// let context = ValidationContext::detached();
///
/// assert!(schema.validate_value(&json!(10), &JsonPath::root(), &context).is_success());
/// assert!(schema.validate_value(&json!(-0.5), &JsonPath::root(), &context).is_failure());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberSchema {
    minimum: Option<f64>,
    maximum: Option<f64>,
}

impl NumberSchema {
    /// Creates a schema accepting any number.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound.
    pub fn minimum(mut self, limit: f64) -> Self {
        self.minimum = Some(limit);
        self
    }

    /// Inclusive upper bound.
    pub fn maximum(mut self, limit: f64) -> Self {
        self.maximum = Some(limit);
        self
    }
}

impl ValueValidator for NumberSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        _context: &ValidationContext,
    ) -> ValidationResult<()> {
        let Some(n) = value.as_f64() else {
            return finish(vec![type_error(value, path, "number")]);
        };

        let mut errors = Vec::new();

        if let Some(min) = self.minimum {
            if n < min {
                errors.push(
                    SchemaError::new(path.clone(), format!("must be >= {}, got {}", min, n))
                        .with_code("minimum")
                        .with_expected(format!(">= {}", min))
                        .with_got(n.to_string())
                        .with_params(ErrorParams::Minimum { limit: min }),
                );
            }
        }

        if let Some(max) = self.maximum {
            if n > max {
                errors.push(
                    SchemaError::new(path.clone(), format!("must be <= {}, got {}", max, n))
                        .with_code("maximum")
                        .with_expected(format!("<= {}", max))
                        .with_got(n.to_string())
                        .with_params(ErrorParams::Maximum { limit: max }),
                );
            }
        }

        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(schema: &NumberSchema, value: Value) -> ValidationResult<()> {
        schema.validate_value(&value, &JsonPath::root(), &ValidationContext::detached())
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let schema = NumberSchema::new().minimum(0.0).maximum(5.0);
        assert!(check(&schema, json!(0)).is_success());
        assert!(check(&schema, json!(5.0)).is_success());
    }

    #[test]
    fn test_below_minimum() {
        let schema = NumberSchema::new().minimum(0.0);
        let errors = check(&schema, json!(-1)).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().code, "minimum");
        assert_eq!(errors.first().params, Some(ErrorParams::Minimum { limit: 0.0 }));
    }

    #[test]
    fn test_both_bounds_reported_independently() {
        let schema = NumberSchema::new().minimum(10.0).maximum(1.0);
        let errors = check(&schema, json!(5)).into_result().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.with_code("maximum").len(), 1);
    }

    #[test]
    fn test_rejects_numeric_string() {
        let errors = check(&NumberSchema::new(), json!("42"))
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().code, "type");
    }
}

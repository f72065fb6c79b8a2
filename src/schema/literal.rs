//! Validators for the `type` and `enum` keywords, and the always-pass node.

use serde_json::Value;

use crate::document::JsonType;
use crate::error::{ErrorParams, SchemaError};
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::traits::{finish, type_error, ValueValidator};

/// Accepts every value. Compiled for unconstrained nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySchema;

impl ValueValidator for AnySchema {
    fn validate_value(
        &self,
        _value: &Value,
        _path: &JsonPath,
        _context: &ValidationContext,
    ) -> ValidationResult<()> {
        finish(Vec::new())
    }
}

/// The `type` keyword: the value must be one of the declared types.
///
/// `integer` accepts any number with no fractional part, so `2.0` is an
/// integer.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    allowed: Vec<JsonType>,
}

impl TypeSchema {
    pub fn new(allowed: Vec<JsonType>) -> Self {
        Self { allowed }
    }

    fn accepts(&self, value: &Value) -> bool {
        self.allowed.iter().any(|t| matches_type(*t, value))
    }

    /// The type named in the error: the first non-null declared type.
    fn expected(&self) -> &'static str {
        self.allowed
            .iter()
            .find(|t| **t != JsonType::Null)
            .or_else(|| self.allowed.first())
            .map_or("null", |t| t.as_str())
    }
}

impl ValueValidator for TypeSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        _context: &ValidationContext,
    ) -> ValidationResult<()> {
        if self.allowed.is_empty() || self.accepts(value) {
            return finish(Vec::new());
        }
        finish(vec![type_error(value, path, self.expected())])
    }
}

fn matches_type(expected: JsonType, value: &Value) -> bool {
    match expected {
        JsonType::Integer => match value {
            Value::Number(n) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            _ => false,
        },
        other => JsonType::of(value) == other,
    }
}

/// The `enum` keyword: the value must equal one of the listed values.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    allowed: Vec<Value>,
}

impl EnumSchema {
    pub fn new(allowed: Vec<Value>) -> Self {
        Self { allowed }
    }
}

impl ValueValidator for EnumSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        _context: &ValidationContext,
    ) -> ValidationResult<()> {
        if self.allowed.contains(value) {
            return finish(Vec::new());
        }
        let listed = self
            .allowed
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        finish(vec![SchemaError::new(
            path.clone(),
            format!("must be one of the allowed values: {}", listed),
        )
        .with_code("enum")
        .with_expected(listed)
        .with_got(value.to_string())
        .with_params(ErrorParams::Enum {
            allowed: self.allowed.clone(),
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(schema: &dyn ValueValidator, value: Value) -> ValidationResult<()> {
        schema.validate_value(&value, &JsonPath::root(), &ValidationContext::detached())
    }

    #[test]
    fn test_integer_accepts_integral_floats() {
        let schema = TypeSchema::new(vec![JsonType::Integer]);
        assert!(check(&schema, json!(3)).is_success());
        assert!(check(&schema, json!(3.0)).is_success());
        assert!(check(&schema, json!(3.5)).is_failure());
    }

    #[test]
    fn test_number_accepts_integers() {
        let schema = TypeSchema::new(vec![JsonType::Number]);
        assert!(check(&schema, json!(7)).is_success());
        assert!(check(&schema, json!(true)).is_failure());
    }

    #[test]
    fn test_nullable_type_names_non_null_type() {
        let schema = TypeSchema::new(vec![JsonType::Null, JsonType::String]);
        assert!(check(&schema, json!(null)).is_success());
        let errors = check(&schema, json!(1)).into_result().unwrap_err();
        assert_eq!(
            errors.first().params,
            Some(ErrorParams::Type {
                expected: "string".to_string()
            })
        );
    }

    #[test]
    fn test_enum() {
        let schema = EnumSchema::new(vec![json!("a"), json!("b")]);
        assert!(check(&schema, json!("b")).is_success());
        let errors = check(&schema, json!("c")).into_result().unwrap_err();
        assert_eq!(errors.first().code, "enum");
    }

    #[test]
    fn test_any_schema_accepts_everything() {
        for value in [json!(null), json!([1]), json!({"a": {}})] {
            assert!(check(&AnySchema, value).is_success());
        }
    }
}

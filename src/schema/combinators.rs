//! Schema combinators for composing validation logic.
//!
//! - `OneOf`: exactly one member must match
//! - `AnyOf`: at least one member must match
//! - `AllOf`: every member must match; compiled nodes use it to stack keywords
//! - `When`: the inner schema applies only to values of one JSON type
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use schema_editor::document::JsonType;
//! use schema_editor::schema::{CombinatorSchema, StringSchema, TypeSchema, ValueValidator};
//! use schema_editor::validation::ValidationContext;
//! use schema_editor::JsonPath;
//! use serde_json::json;
//!
//! // A string id, or null
//! let id = CombinatorSchema::any_of(vec![
//!     Arc::new(StringSchema::new().min_len(1)),
//!     Arc::new(TypeSchema::new(vec![JsonType::Null])),
//! ]);
//!
//! let context = ValidationContext::detached();
//! assert!(id.validate_value(&json!(null), &JsonPath::root(), &context).is_success());
//! assert!(id.validate_value(&json!(""), &JsonPath::root(), &context).is_failure());
//! ```

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::document::JsonType;
use crate::error::{SchemaError, SchemaErrors};
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::traits::{absorb, finish, ValueValidator};

/// Composes member validators.
#[derive(Clone)]
pub enum CombinatorSchema {
    /// Exactly one member must match.
    OneOf(Vec<Arc<dyn ValueValidator>>),
    /// At least one member must match; stops at the first match.
    AnyOf(Vec<Arc<dyn ValueValidator>>),
    /// Every member must match; errors from all members accumulate.
    AllOf(Vec<Arc<dyn ValueValidator>>),
    /// `inner` applies only when the value has type `applies_to`.
    ///
    /// Keywords like `minLength` or `minimum` constrain one type and ignore
    /// the rest. `Number` also covers integers.
    When {
        applies_to: JsonType,
        inner: Arc<dyn ValueValidator>,
    },
}

impl CombinatorSchema {
    pub fn one_of(members: Vec<Arc<dyn ValueValidator>>) -> Self {
        CombinatorSchema::OneOf(members)
    }

    pub fn any_of(members: Vec<Arc<dyn ValueValidator>>) -> Self {
        CombinatorSchema::AnyOf(members)
    }

    pub fn all_of(members: Vec<Arc<dyn ValueValidator>>) -> Self {
        CombinatorSchema::AllOf(members)
    }

    pub fn when(applies_to: JsonType, inner: Arc<dyn ValueValidator>) -> Self {
        CombinatorSchema::When { applies_to, inner }
    }
}

impl ValueValidator for CombinatorSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        match self {
            CombinatorSchema::OneOf(members) => validate_one_of(members, value, path, context),
            CombinatorSchema::AnyOf(members) => validate_any_of(members, value, path, context),
            CombinatorSchema::AllOf(members) => {
                let mut errors = Vec::new();
                for member in members {
                    absorb(member.validate_value(value, path, context), &mut errors);
                }
                finish(errors)
            }
            CombinatorSchema::When { applies_to, inner } => {
                let applies = match applies_to {
                    JsonType::Number | JsonType::Integer => value.is_number(),
                    other => JsonType::of(value) == *other,
                };
                if applies {
                    inner.validate_value(value, path, context)
                } else {
                    finish(Vec::new())
                }
            }
        }
    }
}

fn validate_one_of(
    members: &[Arc<dyn ValueValidator>],
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let mut failures = Vec::new();
    let mut matched = Vec::new();
    for (index, member) in members.iter().enumerate() {
        match member.validate_value(value, path, context) {
            Validation::Success(()) => matched.push(index),
            Validation::Failure(errors) => failures.push(errors),
        }
    }

    match matched.len() {
        1 => finish(Vec::new()),
        0 => no_member_matched(failures, "oneOf", members.len(), path),
        n => finish(vec![SchemaError::new(
            path.clone(),
            format!(
                "value matched {} schemas (indices {:?}), expected exactly one",
                n, matched
            ),
        )
        .with_code("oneOf")]),
    }
}

fn validate_any_of(
    members: &[Arc<dyn ValueValidator>],
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> ValidationResult<()> {
    let mut failures = Vec::new();
    for member in members {
        match member.validate_value(value, path, context) {
            Validation::Success(()) => return finish(Vec::new()),
            Validation::Failure(errors) => failures.push(errors),
        }
    }
    no_member_matched(failures, "anyOf", members.len(), path)
}

/// Reports the errors of the closest member followed by the union failure.
///
/// The closest member is the one with the fewest errors, so a nullable
/// reference reports what is wrong with the referenced object rather than
/// that the value is not null.
fn no_member_matched(
    failures: Vec<SchemaErrors>,
    code: &str,
    count: usize,
    path: &JsonPath,
) -> ValidationResult<()> {
    let mut errors: Vec<SchemaError> = failures
        .into_iter()
        .min_by_key(SchemaErrors::len)
        .map(SchemaErrors::into_vec)
        .unwrap_or_default();
    errors.push(
        SchemaError::new(
            path.clone(),
            format!("value did not match any of {} schemas", count),
        )
        .with_code(code),
    );
    finish(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NumberSchema, ObjectSchema, StringSchema, TypeSchema};
    use serde_json::json;

    fn check(schema: &CombinatorSchema, value: Value) -> ValidationResult<()> {
        schema.validate_value(&value, &JsonPath::root(), &ValidationContext::detached())
    }

    fn string() -> Arc<dyn ValueValidator> {
        Arc::new(StringSchema::new())
    }

    fn null() -> Arc<dyn ValueValidator> {
        Arc::new(TypeSchema::new(vec![JsonType::Null]))
    }

    #[test]
    fn test_one_of_exactly_one() {
        let schema = CombinatorSchema::one_of(vec![string(), null()]);
        assert!(check(&schema, json!("x")).is_success());
        assert!(check(&schema, json!(null)).is_success());
        let errors = check(&schema, json!(1)).into_result().unwrap_err();
        assert_eq!(errors.with_code("oneOf").len(), 1);
    }

    #[test]
    fn test_one_of_ambiguous_match_fails() {
        let schema = CombinatorSchema::one_of(vec![string(), string()]);
        let errors = check(&schema, json!("x")).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.first().message.contains("expected exactly one"));
    }

    #[test]
    fn test_any_of_reports_closest_member() {
        let widget = ObjectSchema::new()
            .property("label", string())
            .require("label");
        let schema = CombinatorSchema::any_of(vec![Arc::new(widget), null()]);
        assert!(check(&schema, json!({"label": "ok"})).is_success());

        // The object member fails once (required); the null member fails once
        // too (type). Ties go to the first member.
        let errors = check(&schema, json!({})).into_result().unwrap_err();
        assert_eq!(errors.first().code, "required");
        assert_eq!(errors.with_code("anyOf").len(), 1);
    }

    #[test]
    fn test_all_of_accumulates() {
        let schema = CombinatorSchema::all_of(vec![
            Arc::new(StringSchema::new().min_len(3)),
            Arc::new(StringSchema::new().pattern("^[0-9]+$").unwrap()),
        ]);
        let errors = check(&schema, json!("a")).into_result().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_when_skips_other_types() {
        let schema = CombinatorSchema::when(
            JsonType::Integer,
            Arc::new(NumberSchema::new().minimum(0.0)),
        );
        assert!(check(&schema, json!("not a number")).is_success());
        assert!(check(&schema, json!(-2.5)).is_failure());
    }
}

//! Object schema validation.
//!
//! This module provides [`ObjectSchema`] for validating the `properties`,
//! `required`, and `additionalProperties` keywords of JSON objects.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{ErrorParams, SchemaError};
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::traits::{absorb, finish, ValueValidator};

/// How to handle properties not declared in the schema.
#[derive(Clone)]
pub enum AdditionalRule {
    /// Allow unknown properties (default behavior).
    Allow,
    /// Reject unknown properties.
    Deny,
    /// Validate unknown properties against a schema.
    Validate(Arc<dyn ValueValidator>),
}

/// A schema for validating JSON objects.
///
/// Only objects are inspected; other values pass, leaving the `type` keyword
/// to reject them. All property errors are accumulated rather than
/// short-circuiting on the first failure.
///
/// A missing required property is reported at the object's own path with
/// code `required` and the property name in its params, the way JSON Schema
/// validators report it.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use schema_editor::schema::{ObjectSchema, StringSchema, ValueValidator};
/// use schema_editor::validation::ValidationContext;
/// use schema_editor::JsonPath;
/// use serde_json::json;
///
/// let schema = ObjectSchema::new()
///     .property("label", Arc::new(StringSchema::new()))
///     .require("label");
///
/// let result = schema.validate_value(&json!({}), &JsonPath::root(), &ValidationContext::detached());
/// let errors = result.into_result().unwrap_err();
/// assert_eq!(errors.first().code, "required");
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    properties: IndexMap<String, Arc<dyn ValueValidator>>,
    required: Vec<String>,
    additional: AdditionalRule,
}

impl ObjectSchema {
    /// Creates an object schema with no properties.
    pub fn new() -> Self {
        Self {
            properties: IndexMap::new(),
            required: Vec::new(),
            additional: AdditionalRule::Allow,
        }
    }

    /// Declares a property validated by `schema` when present.
    pub fn property(mut self, name: impl Into<String>, schema: Arc<dyn ValueValidator>) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Marks a property as required.
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Sets how undeclared properties are treated.
    pub fn additional(mut self, rule: AdditionalRule) -> Self {
        self.additional = rule;
        self
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueValidator for ObjectSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        let Some(obj) = value.as_object() else {
            return finish(Vec::new());
        };

        let mut errors = Vec::new();

        for name in &self.required {
            if !obj.contains_key(name) {
                errors.push(
                    SchemaError::new(
                        path.clone(),
                        format!("must have required property '{}'", name),
                    )
                    .with_code("required")
                    .with_expected(name.clone())
                    .with_params(ErrorParams::Required {
                        property: name.clone(),
                    }),
                );
            }
        }

        for (key, item) in obj {
            let item_path = path.push_field(key.as_str());
            match self.properties.get(key) {
                Some(schema) => absorb(schema.validate_value(item, &item_path, context), &mut errors),
                None => match &self.additional {
                    AdditionalRule::Allow => {}
                    AdditionalRule::Deny => errors.push(
                        SchemaError::new(
                            item_path,
                            format!("property '{}' is not allowed", key),
                        )
                        .with_code("additionalProperties"),
                    ),
                    AdditionalRule::Validate(schema) => {
                        absorb(schema.validate_value(item, &item_path, context), &mut errors)
                    }
                },
            }
        }

        finish(errors)
    }
}

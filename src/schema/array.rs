//! Array schema validation.
//!
//! This module provides [`ArraySchema`] for validating the `items`,
//! `minItems`, and `maxItems` keywords.

use std::sync::Arc;

use serde_json::Value;

use crate::error::SchemaError;
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::traits::{absorb, finish, ValueValidator};

/// A schema for validating array values.
///
/// Only arrays are inspected; other values pass, leaving the `type` keyword
/// to reject them. Each item is validated at its index path and all errors
/// are accumulated.
#[derive(Clone, Default)]
pub struct ArraySchema {
    items: Option<Arc<dyn ValueValidator>>,
    min_items: Option<usize>,
    max_items: Option<usize>,
}

impl ArraySchema {
    /// Creates an array schema with no item schema or length bounds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every item against `schema`.
    pub fn items(mut self, schema: Arc<dyn ValueValidator>) -> Self {
        self.items = Some(schema);
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }
}

impl ValueValidator for ArraySchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        let Some(arr) = value.as_array() else {
            return finish(Vec::new());
        };

        let mut errors = Vec::new();

        if let Some(min) = self.min_items {
            if arr.len() < min {
                errors.push(
                    SchemaError::new(
                        path.clone(),
                        format!("must have at least {} items, got {}", min, arr.len()),
                    )
                    .with_code("minItems")
                    .with_expected(format!("at least {} items", min))
                    .with_got(format!("{} items", arr.len())),
                );
            }
        }

        if let Some(max) = self.max_items {
            if arr.len() > max {
                errors.push(
                    SchemaError::new(
                        path.clone(),
                        format!("must have at most {} items, got {}", max, arr.len()),
                    )
                    .with_code("maxItems")
                    .with_expected(format!("at most {} items", max))
                    .with_got(format!("{} items", arr.len())),
                );
            }
        }

        if let Some(schema) = &self.items {
            for (index, item) in arr.iter().enumerate() {
                absorb(
                    schema.validate_value(item, &path.push_index(index), context),
                    &mut errors,
                );
            }
        }

        finish(errors)
    }
}

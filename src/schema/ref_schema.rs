//! Lazily resolved references and discriminated unions.
//!
//! [`RefSchema`] names a `$defs` entry and looks it up through the
//! [`ValidationContext`] registry at validation time, so recursive types
//! compile without recursing. [`DiscriminatorSchema`] reads a tag property
//! and validates against the member the tag selects.

use std::sync::Arc;

use serde_json::Value;

use crate::document::{ref_name, Discriminator};
use crate::error::SchemaError;
use crate::path::JsonPath;
use crate::validation::ValidationContext;
use crate::ValidationResult;

use super::traits::{finish, ValueValidator};

/// A schema that references a `$defs` entry by name.
///
/// A name the registry does not know is treated as unconstrained, matching
/// how the resolver treats an unresolvable reference.
#[derive(Debug, Clone)]
pub struct RefSchema {
    name: String,
}

impl RefSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the name of the referenced definition.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ValueValidator for RefSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        validate_named(&self.name, value, path, context).unwrap_or_else(|| finish(Vec::new()))
    }
}

/// Validates `value` against the named definition with one more level of depth.
///
/// `None` if the registry has no such definition.
fn validate_named(
    name: &str,
    value: &Value,
    path: &JsonPath,
    context: &ValidationContext,
) -> Option<ValidationResult<()>> {
    let Some(deeper) = context.follow() else {
        return Some(finish(vec![SchemaError::new(
            path.clone(),
            format!("reference chain through '{}' deeper than {}", name, context.max_depth()),
        )
        .with_code("max_depth_exceeded")]));
    };

    let schema = context.registry().get_schema(name)?;
    Some(schema.validate_value(value, path, &deeper))
}

/// A `oneOf` narrowed by a discriminator tag.
///
/// The tag is read from `value[propertyName]`, falling back to the declared
/// default of that property. A mapped tag validates against its `$ref`.
/// Otherwise the first member is used: the same best-effort guess the
/// resolver makes, so the editor and the validator agree on the shape.
#[derive(Clone)]
pub struct DiscriminatorSchema {
    discriminator: Discriminator,
    members: Vec<Arc<dyn ValueValidator>>,
}

impl DiscriminatorSchema {
    pub fn new(discriminator: Discriminator, members: Vec<Arc<dyn ValueValidator>>) -> Self {
        Self {
            discriminator,
            members,
        }
    }

    fn selected_name(&self, value: &Value) -> Option<&str> {
        let tag = value
            .get(&self.discriminator.property_name)
            .and_then(Value::as_str)
            .or(self.discriminator.tag_default.as_deref())?;
        self.discriminator
            .mapping
            .get(tag)
            .and_then(|reference| ref_name(reference))
    }
}

impl ValueValidator for DiscriminatorSchema {
    fn validate_value(
        &self,
        value: &Value,
        path: &JsonPath,
        context: &ValidationContext,
    ) -> ValidationResult<()> {
        if let Some(result) = self
            .selected_name(value)
            .and_then(|name| validate_named(name, value, path, context))
        {
            return result;
        }
        match self.members.first() {
            Some(first) => first.validate_value(value, path, context),
            None => finish(Vec::new()),
        }
    }
}

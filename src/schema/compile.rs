//! Compiles parsed schema nodes into validators.

use std::sync::Arc;

use crate::document::{ref_name, AdditionalProperties, JsonType, SchemaKind, Subschema};
use crate::error::CompileError;

use super::{
    AdditionalRule, AnySchema, ArraySchema, CombinatorSchema, DiscriminatorSchema, EnumSchema,
    NumberSchema, ObjectSchema, RefSchema, StringSchema, TypeSchema, ValueValidator,
};

/// Builds the validator for `node` and, recursively, its inline children.
///
/// `$ref`s into `$defs` become [`RefSchema`]s resolved at validation time.
/// Any other reference shape is unconstrained. Keywords that constrain one
/// JSON type are guarded so other types pass them, and the keyword
/// validators of a node are stacked with `AllOf`.
pub fn compile(node: &Subschema) -> Result<Arc<dyn ValueValidator>, CompileError> {
    let mut parts: Vec<Arc<dyn ValueValidator>> = Vec::new();

    match &node.kind {
        SchemaKind::Ref(reference) => {
            if let Some(name) = ref_name(reference) {
                parts.push(Arc::new(RefSchema::new(name)));
            }
        }
        SchemaKind::Object {
            properties,
            required,
            additional,
        } => {
            let mut schema = ObjectSchema::new();
            for (key, prop) in properties {
                schema = schema.property(key.clone(), compile(prop)?);
            }
            for key in required {
                schema = schema.require(key.clone());
            }
            let rule = match additional {
                AdditionalProperties::Unspecified | AdditionalProperties::Allowed => {
                    AdditionalRule::Allow
                }
                AdditionalProperties::Denied => AdditionalRule::Deny,
                AdditionalProperties::Schema(inner) => AdditionalRule::Validate(compile(inner)?),
            };
            parts.push(Arc::new(schema.additional(rule)));
        }
        SchemaKind::Array {
            items,
            min_items,
            max_items,
        } => {
            let mut schema = ArraySchema::new();
            if let Some(items) = items {
                schema = schema.items(compile(items)?);
            }
            if let Some(min) = min_items {
                schema = schema.min_items(*min);
            }
            if let Some(max) = max_items {
                schema = schema.max_items(*max);
            }
            parts.push(Arc::new(schema));
        }
        SchemaKind::OneOf(members) => {
            parts.push(Arc::new(CombinatorSchema::one_of(compile_all(members)?)));
        }
        SchemaKind::AnyOf(members) => {
            parts.push(Arc::new(CombinatorSchema::any_of(compile_all(members)?)));
        }
        SchemaKind::Discriminated {
            discriminator,
            members,
        } => {
            parts.push(Arc::new(DiscriminatorSchema::new(
                discriminator.clone(),
                compile_all(members)?,
            )));
        }
        SchemaKind::Leaf => {}
    }

    let annotations = &node.annotations;

    if !annotations.declared_types.is_empty() {
        parts.push(Arc::new(TypeSchema::new(annotations.declared_types.clone())));
    }

    if let Some(allowed) = &annotations.enum_values {
        parts.push(Arc::new(EnumSchema::new(allowed.clone())));
    }

    if annotations.min_length.is_some()
        || annotations.max_length.is_some()
        || annotations.pattern.is_some()
        || annotations.format.is_some()
    {
        let mut schema = StringSchema::new();
        if let Some(min) = annotations.min_length {
            schema = schema.min_len(min);
        }
        if let Some(max) = annotations.max_length {
            schema = schema.max_len(max);
        }
        if let Some(pattern) = &annotations.pattern {
            schema = schema
                .pattern(pattern)
                .map_err(|source| CompileError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
        }
        if let Some(format) = &annotations.format {
            schema = schema.format(format);
        }
        parts.push(Arc::new(CombinatorSchema::when(
            JsonType::String,
            Arc::new(schema),
        )));
    }

    if annotations.minimum.is_some() || annotations.maximum.is_some() {
        let mut schema = NumberSchema::new();
        if let Some(min) = annotations.minimum {
            schema = schema.minimum(min);
        }
        if let Some(max) = annotations.maximum {
            schema = schema.maximum(max);
        }
        parts.push(Arc::new(CombinatorSchema::when(
            JsonType::Number,
            Arc::new(schema),
        )));
    }

    Ok(match parts.len() {
        0 => Arc::new(AnySchema),
        1 => parts.remove(0),
        _ => Arc::new(CombinatorSchema::all_of(parts)),
    })
}

fn compile_all(members: &[Subschema]) -> Result<Vec<Arc<dyn ValueValidator>>, CompileError> {
    members.iter().map(compile).collect()
}

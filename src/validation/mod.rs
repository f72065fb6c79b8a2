//! Validation of values against the loaded schema.
//!
//! - [`ValidationEngine`]: owns the validator cache and answers validation requests
//! - [`ErrorMap`]: failures grouped by dotted path, as the editor displays them
//! - [`friendly_message`]: keyword failures rendered as human-readable text
//! - [`ValidationContext`] / [`RegistryAccess`]: lazy `$ref` resolution with depth tracking

mod context;
mod engine;
mod error_map;
mod messages;

pub use context::{RegistryAccess, ValidationContext};
pub use engine::ValidationEngine;
pub use error_map::ErrorMap;
pub use messages::friendly_message;

use serde::Serialize;

use crate::error::SchemaErrors;

/// Outcome of validating one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueValidation {
    pub valid: bool,
    /// Human-readable messages; empty when valid.
    pub errors: Vec<String>,
}

impl ValueValidation {
    /// A passing result.
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub(crate) fn from_errors(errors: &SchemaErrors) -> Self {
        Self {
            valid: false,
            errors: errors.iter().map(friendly_message).collect(),
        }
    }
}

/// Outcome of validating a whole top-level object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectValidation {
    pub valid: bool,
    pub errors: ErrorMap,
}

impl ObjectValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: ErrorMap::new(),
        }
    }
}

//! Error types.
//!
//! Validation failures are data ([`SchemaError`], [`SchemaErrors`]) carried in
//! a `Validation`; the `thiserror` enums here cover the operations that can
//! refuse to act: loading a schema, compiling a validator, and structural edits.

mod editor_error;
mod schema_error;

pub use editor_error::{CompileError, EditorError, SchemaLoadError};
pub use schema_error::{ErrorParams, SchemaError, SchemaErrors};

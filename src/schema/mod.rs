//! Validators compiled from schema nodes.
//!
//! Each validator checks one group of JSON Schema keywords and accumulates
//! every failure rather than short-circuiting on the first one. [`compile`]
//! turns a parsed [`Subschema`](crate::document::Subschema) into a stack of
//! these validators.
//!
//! # Example
//!
//! ```rust
//! use schema_editor::schema::{StringSchema, ValueValidator};
//! use schema_editor::validation::ValidationContext;
//! use schema_editor::JsonPath;
//! use serde_json::json;
//!
//! let schema = StringSchema::new().min_len(1).max_len(100);
//!
//! let result = schema.validate_value(&json!("hello"), &JsonPath::root(), &ValidationContext::detached());
//! assert!(result.is_success());
//! ```

mod array;
mod combinators;
mod compile;
mod literal;
mod numeric;
mod object;
mod ref_schema;
mod string;
mod traits;

pub use array::ArraySchema;
pub use combinators::CombinatorSchema;
pub use compile::compile;
pub use literal::{AnySchema, EnumSchema, TypeSchema};
pub use numeric::NumberSchema;
pub use object::{AdditionalRule, ObjectSchema};
pub use ref_schema::{DiscriminatorSchema, RefSchema};
pub use string::{StringFormat, StringSchema};
pub use traits::ValueValidator;

//! JSON Schema generation for records.

mod converter;
mod generator;
mod types;

pub use converter::json_schema_with;
pub use generator::{RichJsonSchema, SchemaError, SchemaGenerator, StrictJsonSchema};
pub use types::{FieldSchema, ModelSchema, RichKind, TypeSchema};

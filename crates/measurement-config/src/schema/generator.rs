//! Policies for types without a JSON Schema mapping.

use serde_json::{json, Value as Json};
use thiserror::Error;

use super::types::RichKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("cannot generate JSON schema for type `{0}`")]
    Unsupported(String),
}

pub trait SchemaGenerator {
    /// Called for every opaque type; returns its schema or fails.
    fn handle_invalid(&self, type_name: &str, rich: Option<RichKind>) -> Result<Json, SchemaError>;
}

/// Rejects every opaque type.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictJsonSchema;

impl SchemaGenerator for StrictJsonSchema {
    fn handle_invalid(&self, type_name: &str, _rich: Option<RichKind>) -> Result<Json, SchemaError> {
        Err(SchemaError::Unsupported(type_name.to_string()))
    }
}

/// Describes the rich leaf kinds as plain objects, since that is how the
/// codec writes them. Other opaque types still fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct RichJsonSchema;

impl SchemaGenerator for RichJsonSchema {
    fn handle_invalid(&self, type_name: &str, rich: Option<RichKind>) -> Result<Json, SchemaError> {
        match rich {
            Some(_) => Ok(json!({"type": "object"})),
            None => StrictJsonSchema.handle_invalid(type_name, rich),
        }
    }
}

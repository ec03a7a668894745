use std::string::FromUtf8Error;

use thiserror::Error;

use crate::codec::CodecError;
use crate::pointer::FieldPath;
use crate::schema::SchemaError;
use crate::value::ModelValue;

/// A value failed to validate against a declared field type.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("field required at `{path}`")]
    Missing { path: String },
    #[error("expected {expected} at `{path}`, found {found}")]
    Type {
        path: String,
        expected: String,
        found: &'static str,
    },
    #[error("invalid value at `{path}`: {reason}")]
    Invalid { path: String, reason: String },
}

impl ValidationError {
    pub fn type_mismatch(path: &FieldPath, expected: impl Into<String>, found: &ModelValue) -> Self {
        Self::Type {
            path: path.pointer(),
            expected: expected.into(),
            found: found.kind_name(),
        }
    }

    pub fn invalid(path: &FieldPath, reason: impl ToString) -> Self {
        Self::Invalid {
            path: path.pointer(),
            reason: reason.to_string(),
        }
    }

    /// JSON pointer of the offending field.
    pub fn path(&self) -> &str {
        match self {
            Self::Missing { path } | Self::Type { path, .. } | Self::Invalid { path, .. } => path,
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Utf8(#[from] FromUtf8Error),
    #[error("`{model}` has no field `{field}`")]
    UnknownField { model: &'static str, field: String },
}

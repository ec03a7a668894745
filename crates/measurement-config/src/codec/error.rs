use measurement_config_quantity::QuantityError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("unknown numeric class: {0}")]
    UnknownNumericClass(String),
    #[error("unknown quantity class: {0}")]
    UnknownQuantityClass(String),
    #[error("unknown complex class: {0}")]
    UnknownComplexClass(String),
    #[error("invalid `{tag}` payload at `{path}`: {reason}")]
    InvalidPayload {
        tag: String,
        path: String,
        reason: String,
    },
    #[error("unknown type tag `{tag}` at `{path}`")]
    UnknownTag { path: String, tag: String },
    #[error("cannot build exchange record: {0}")]
    Record(#[from] QuantityError),
}

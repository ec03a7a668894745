//! Error types for quantities, units and numeric conversions.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QuantityError {
    #[error("array shape {shape:?} does not hold {len} elements")]
    ShapeMismatch { shape: Vec<usize>, len: usize },
    #[error("invalid unit `{unit}`: {reason}")]
    InvalidUnit { unit: String, reason: String },
    #[error("unit `{found}` is not a {expected} unit")]
    DimensionMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("cannot convert `{from}` to `{to}`: incompatible dimensions")]
    Incompatible { from: String, to: String },
    #[error("unit exponent overflows")]
    ExponentOverflow,
    #[error("complex quantities are not ordered")]
    Unordered,
    #[error("invalid exchange record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    #[error("unknown dtype `{0}`")]
    UnknownDType(String),
    #[error("value {value} is not representable as {dtype}")]
    Lossy { value: String, dtype: &'static str },
    #[error("numeric payload carries unit `{0}`")]
    NotDimensionless(String),
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

//! Expression error type.

use measurement_config_quantity::QuantityError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Failed to parse expression string '{input}': {reason}")]
    Parse { input: String, reason: String },
    #[error("Value for symbol '{0}' not provided in params.")]
    MissingSymbol(String),
    #[error("operand shapes {lhs:?} and {rhs:?} do not match")]
    Shape { lhs: Vec<usize>, rhs: Vec<usize> },
    #[error("{backend} backend cannot evaluate array operand `{symbol}`")]
    Backend {
        backend: &'static str,
        symbol: String,
    },
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

//! Physical quantities for measurement configuration.
//!
//! Provides complex numbers, row-major n-d arrays, dtype-tagged numeric
//! scalars and arrays, units with rational exponents, scalar and array
//! quantities (plus dimension-checked `Time`/`Frequency` variants) and the
//! canonical exchange record used to carry them across serialization
//! boundaries.

mod dimension;
mod dimensioned;
mod error;
mod fraction;
mod ndarray;
mod numeric;
mod quantity;
mod unit;
mod value;

pub mod record;
pub mod units;

/// Double-precision complex numbers.
pub type Complex = num_complex::Complex64;
pub use dimension::Dimension;
pub use dimensioned::{Frequency, FrequencyArray, Time, TimeArray};
pub use error::{NumericError, QuantityError};
pub use fraction::Fraction;
pub use ndarray::NdArray;
pub use numeric::{DType, NumericArray, NumericScalar};
pub use quantity::{Quantity, QuantityClass};
pub use unit::{BaseUnit, Scale, Unit, UnitFactor};
pub use value::{ArrayData, Scalar, Value, ValueArray};

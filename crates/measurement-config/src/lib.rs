//! Typed configuration and result records for measurement sweeps.
//!
//! Records are declared with [`model!`] and dump to a [`ModelValue`] tree.
//! The [`codec`] turns that tree into JSON, tagging rich leaves (numeric
//! scalars and arrays, complex numbers, physical quantities) so decoding
//! rebuilds their exact types.
//!
//! ```
//! use measurement_config::codec::{decode_value, encode};
//! use measurement_config::ModelValue;
//! use measurement_config_quantity::Complex;
//!
//! let z = ModelValue::Complex(Complex::new(3.0, 4.0));
//! let tree = encode(&z).unwrap();
//! assert_eq!(tree["__type__"], "scalar.complex");
//! assert_eq!(decode_value(&tree).unwrap(), z);
//! ```

pub mod codec;
pub mod model;
pub mod models;
pub mod pointer;
pub mod schema;
mod value;

pub use codec::{decode, decode_value, decode_with, encode, CodecError, DecodeOptions, Decoded};
pub use model::{Field, Model, ModelError, Mutable, ValidationError};
pub use pointer::FieldPath;
pub use value::ModelValue;

pub use measurement_config_expression as expression;
pub use measurement_config_quantity as quantity;

#[doc(hidden)]
pub mod __private {
    pub use crate::model::load_field;
    pub use indexmap::IndexMap;
}

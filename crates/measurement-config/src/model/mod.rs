//! Record layer: typed fields, records and mutable wrappers.

mod error;
mod field;
mod mutable;
mod record;

pub use error::{ModelError, ValidationError};
pub use field::Field;
pub use mutable::Mutable;
pub use record::{load_field, Model};

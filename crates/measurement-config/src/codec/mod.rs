//! Self-describing value codec.
//!
//! Rich leaves are written as a mapping carrying `__type__ =
//! "<namespace>.<Class>"` next to their payload. Numeric scalars and arrays
//! are lifted to dimensionless quantities and share the quantity exchange
//! record; complex numbers carry `real` and `imag`. Decoding dispatches on
//! the namespace and rebuilds the original type; tags in other namespaces
//! are tolerated and left in place.

mod decode;
mod encode;
mod error;
mod tag;

pub use decode::{decode, decode_value, decode_with, Advisory, DecodeOptions, Decoded, UnknownTagPolicy};
pub use encode::{classify, encode, ValueKind};
pub use error::CodecError;
pub use tag::{Namespace, NumericClass, LEGACY_ARRAY_CLASS, TYPE_KEY};

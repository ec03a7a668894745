//! Dynamic in-memory value tree that records dump to and load from.

use indexmap::IndexMap;
use measurement_config_quantity::{
    Complex, Frequency, FrequencyArray, NumericArray, NumericScalar, Quantity, Time, TimeArray,
    Value, ValueArray,
};

/// A node of a dumped record: plain JSON-like data plus the rich leaf kinds
/// the codec tags on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<ModelValue>),
    Map(IndexMap<String, ModelValue>),
    Array(NumericArray),
    Numeric(NumericScalar),
    Complex(Complex),
    Quantity(Quantity),
}

impl ModelValue {
    /// Short kind name used in validation messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "mapping",
            Self::Array(_) => "numeric array",
            Self::Numeric(_) => "numeric scalar",
            Self::Complex(_) => "complex",
            Self::Quantity(q) if q.is_array() => "quantity array",
            Self::Quantity(_) => "quantity",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, ModelValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[ModelValue]> {
        match self {
            Self::Seq(s) => Some(s),
            _ => None,
        }
    }
}

macro_rules! from_impls {
    ($($ty:ty => |$v:ident| $body:expr;)*) => {
        $(
            impl From<$ty> for ModelValue {
                fn from($v: $ty) -> Self {
                    $body
                }
            }
        )*
    };
}

from_impls! {
    bool => |v| ModelValue::Bool(v);
    i64 => |v| ModelValue::Int(v);
    i32 => |v| ModelValue::Int(v.into());
    f64 => |v| ModelValue::Float(v);
    String => |v| ModelValue::Str(v);
    &str => |v| ModelValue::Str(v.to_string());
    Vec<ModelValue> => |v| ModelValue::Seq(v);
    IndexMap<String, ModelValue> => |v| ModelValue::Map(v);
    NumericArray => |v| ModelValue::Array(v);
    NumericScalar => |v| ModelValue::Numeric(v);
    Complex => |v| ModelValue::Complex(v);
    Quantity => |v| ModelValue::Quantity(v);
    Value => |v| ModelValue::Quantity(Quantity::Value(v));
    Time => |v| ModelValue::Quantity(Quantity::Time(v));
    Frequency => |v| ModelValue::Quantity(Quantity::Frequency(v));
    ValueArray => |v| ModelValue::Quantity(Quantity::ValueArray(v));
    TimeArray => |v| ModelValue::Quantity(Quantity::TimeArray(v));
    FrequencyArray => |v| ModelValue::Quantity(Quantity::FrequencyArray(v));
}

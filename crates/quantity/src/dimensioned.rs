//! Quantities whose unit is checked against a fixed dimension.

use std::ops::Deref;

use crate::dimension::Dimension;
use crate::error::QuantityError;
use crate::unit::Unit;
use crate::value::{ArrayData, Scalar, Value, ValueArray};

macro_rules! dimensioned {
    ($name:ident, $inner:ident, $data:ty, $dimension:expr, $label:literal) => {
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name($inner);

        impl $name {
            pub const DIMENSION: Dimension = $dimension;

            pub fn new(value: impl Into<$data>, unit: Unit) -> Result<Self, QuantityError> {
                Self::try_from($inner::new(value, unit))
            }

            pub fn from_unit_str(value: impl Into<$data>, unit: &str) -> Result<Self, QuantityError> {
                Self::new(value, Unit::parse(unit)?)
            }

            pub fn as_inner(&self) -> &$inner {
                &self.0
            }

            pub fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl TryFrom<$inner> for $name {
            type Error = QuantityError;

            fn try_from(inner: $inner) -> Result<Self, Self::Error> {
                if inner.unit().dimension() != Self::DIMENSION {
                    return Err(QuantityError::DimensionMismatch {
                        expected: $label,
                        found: inner.unit().to_string(),
                    });
                }
                Ok(Self(inner))
            }
        }

        impl From<$name> for $inner {
            fn from(q: $name) -> $inner {
                q.0
            }
        }

        impl Deref for $name {
            type Target = $inner;

            fn deref(&self) -> &$inner {
                &self.0
            }
        }
    };
}

dimensioned!(Time, Value, Scalar, Dimension::TIME, "time");
dimensioned!(Frequency, Value, Scalar, Dimension::FREQUENCY, "frequency");
dimensioned!(TimeArray, ValueArray, ArrayData, Dimension::TIME, "time");
dimensioned!(FrequencyArray, ValueArray, ArrayData, Dimension::FREQUENCY, "frequency");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checks_dimension() {
        assert!(Time::from_unit_str(4.0, "ns").is_ok());
        assert!(Frequency::from_unit_str(5.0, "GHz").is_ok());
        assert_eq!(
            Time::from_unit_str(4.0, "GHz"),
            Err(QuantityError::DimensionMismatch {
                expected: "time",
                found: "GHz".into()
            })
        );
        assert!(FrequencyArray::from_unit_str(vec![1.0, 2.0], "MHz").is_ok());
        assert!(TimeArray::from_unit_str(vec![1.0], "V").is_err());
    }

    #[test]
    fn inverse_seconds_are_a_frequency() {
        let f = Frequency::from_unit_str(1.0, "1/ns").unwrap();
        let hz = f.value_in(&Unit::parse("GHz").unwrap()).unwrap();
        assert!((hz.as_real().unwrap() - 1.0).abs() < 1e-12);
    }
}

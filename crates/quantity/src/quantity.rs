//! The closed set of quantity classes and their name registry.

use serde_json::{Map, Value as Json};

use crate::dimensioned::{Frequency, FrequencyArray, Time, TimeArray};
use crate::error::QuantityError;
use crate::unit::Unit;
use crate::value::{Value, ValueArray};

/// Quantity class names as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuantityClass {
    Value,
    Time,
    Frequency,
    ValueArray,
    TimeArray,
    FrequencyArray,
}

impl QuantityClass {
    pub const ALL: [QuantityClass; 6] = [
        QuantityClass::Value,
        QuantityClass::Time,
        QuantityClass::Frequency,
        QuantityClass::ValueArray,
        QuantityClass::TimeArray,
        QuantityClass::FrequencyArray,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Value => "Value",
            Self::Time => "Time",
            Self::Frequency => "Frequency",
            Self::ValueArray => "ValueArray",
            Self::TimeArray => "TimeArray",
            Self::FrequencyArray => "FrequencyArray",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub fn is_array(self) -> bool {
        matches!(
            self,
            Self::ValueArray | Self::TimeArray | Self::FrequencyArray
        )
    }
}

/// A scalar or array quantity of a known class.
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    Value(Value),
    Time(Time),
    Frequency(Frequency),
    ValueArray(ValueArray),
    TimeArray(TimeArray),
    FrequencyArray(FrequencyArray),
}

impl Quantity {
    pub fn class(&self) -> QuantityClass {
        match self {
            Self::Value(_) => QuantityClass::Value,
            Self::Time(_) => QuantityClass::Time,
            Self::Frequency(_) => QuantityClass::Frequency,
            Self::ValueArray(_) => QuantityClass::ValueArray,
            Self::TimeArray(_) => QuantityClass::TimeArray,
            Self::FrequencyArray(_) => QuantityClass::FrequencyArray,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.class().name()
    }

    pub fn is_array(&self) -> bool {
        self.class().is_array()
    }

    pub fn unit(&self) -> &Unit {
        match self {
            Self::Value(v) => v.unit(),
            Self::Time(v) => v.unit(),
            Self::Frequency(v) => v.unit(),
            Self::ValueArray(v) => v.unit(),
            Self::TimeArray(v) => v.unit(),
            Self::FrequencyArray(v) => v.unit(),
        }
    }

    /// Scalar view, for any scalar class.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Time(v) => Some(v.as_inner()),
            Self::Frequency(v) => Some(v.as_inner()),
            _ => None,
        }
    }

    /// Array view, for any array class.
    pub fn as_value_array(&self) -> Option<&ValueArray> {
        match self {
            Self::ValueArray(v) => Some(v),
            Self::TimeArray(v) => Some(v.as_inner()),
            Self::FrequencyArray(v) => Some(v.as_inner()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Result<Map<String, Json>, QuantityError> {
        match self {
            Self::Value(v) => v.to_json(),
            Self::Time(v) => v.to_json(),
            Self::Frequency(v) => v.to_json(),
            Self::ValueArray(v) => v.to_json(),
            Self::TimeArray(v) => v.to_json(),
            Self::FrequencyArray(v) => v.to_json(),
        }
    }

    /// Rebuilds a quantity of `class` from its exchange record payload.
    pub fn from_json(class: QuantityClass, map: Map<String, Json>) -> Result<Self, QuantityError> {
        Ok(match class {
            QuantityClass::Value => Self::Value(Value::from_json(map)?),
            QuantityClass::Time => Self::Time(Time::try_from(Value::from_json(map)?)?),
            QuantityClass::Frequency => {
                Self::Frequency(Frequency::try_from(Value::from_json(map)?)?)
            }
            QuantityClass::ValueArray => Self::ValueArray(ValueArray::from_json(map)?),
            QuantityClass::TimeArray => {
                Self::TimeArray(TimeArray::try_from(ValueArray::from_json(map)?)?)
            }
            QuantityClass::FrequencyArray => {
                Self::FrequencyArray(FrequencyArray::try_from(ValueArray::from_json(map)?)?)
            }
        })
    }
}

impl From<Value> for Quantity {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<Time> for Quantity {
    fn from(v: Time) -> Self {
        Self::Time(v)
    }
}

impl From<Frequency> for Quantity {
    fn from(v: Frequency) -> Self {
        Self::Frequency(v)
    }
}

impl From<ValueArray> for Quantity {
    fn from(v: ValueArray) -> Self {
        Self::ValueArray(v)
    }
}

impl From<TimeArray> for Quantity {
    fn from(v: TimeArray) -> Self {
        Self::TimeArray(v)
    }
}

impl From<FrequencyArray> for Quantity {
    fn from(v: FrequencyArray) -> Self {
        Self::FrequencyArray(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_names() {
        for class in QuantityClass::ALL {
            assert_eq!(QuantityClass::from_name(class.name()), Some(class));
        }
        assert_eq!(QuantityClass::from_name("Bogus"), None);
        assert!(QuantityClass::TimeArray.is_array());
        assert!(!QuantityClass::Frequency.is_array());
    }

    #[test]
    fn class_is_enforced_on_rebuild() {
        let t = Quantity::from(Time::from_unit_str(12.5, "ns").unwrap());
        let map = t.to_json().unwrap();
        assert_eq!(Quantity::from_json(QuantityClass::Time, map.clone()).unwrap(), t);
        assert!(matches!(
            Quantity::from_json(QuantityClass::Frequency, map.clone()),
            Err(QuantityError::DimensionMismatch { .. })
        ));
        assert!(Quantity::from_json(QuantityClass::ValueArray, map).is_err());
    }
}

//! Canonical exchange record for quantities.
//!
//! The layout follows the proto3 JSON mapping of the quantity messages with
//! original field names preserved: 64-bit integers are strings, non-finite
//! doubles are `"NaN"`, `"Infinity"` and `"-Infinity"`, and empty repeated
//! fields are omitted.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::error::QuantityError;
use crate::fraction::Fraction;
use crate::unit::{BaseUnit, Scale, Unit, UnitFactor};

/// A double in proto3 JSON form.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProtoDouble(pub f64);

impl Serialize for ProtoDouble {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.is_nan() {
            serializer.serialize_str("NaN")
        } else if v == f64::INFINITY {
            serializer.serialize_str("Infinity")
        } else if v == f64::NEG_INFINITY {
            serializer.serialize_str("-Infinity")
        } else {
            serializer.serialize_f64(v)
        }
    }
}

struct ProtoDoubleVisitor;

impl Visitor<'_> for ProtoDoubleVisitor {
    type Value = ProtoDouble;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a number or a proto3 JSON double string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ProtoDouble, E> {
        Ok(ProtoDouble(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProtoDouble, E> {
        Ok(ProtoDouble(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProtoDouble, E> {
        Ok(ProtoDouble(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ProtoDouble, E> {
        match v {
            "NaN" => Ok(ProtoDouble(f64::NAN)),
            "Infinity" => Ok(ProtoDouble(f64::INFINITY)),
            "-Infinity" => Ok(ProtoDouble(f64::NEG_INFINITY)),
            other => other
                .parse::<f64>()
                .map(ProtoDouble)
                .map_err(|_| E::invalid_value(de::Unexpected::Str(other), &self)),
        }
    }
}

impl<'de> Deserialize<'de> for ProtoDouble {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProtoDoubleVisitor)
    }
}

/// A 64-bit integer in proto3 JSON form (written as a string).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProtoInt64(pub i64);

impl Serialize for ProtoInt64 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct ProtoInt64Visitor;

impl Visitor<'_> for ProtoInt64Visitor {
    type Value = ProtoInt64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a decimal integer string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ProtoInt64, E> {
        Ok(ProtoInt64(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ProtoInt64, E> {
        i64::try_from(v)
            .map(ProtoInt64)
            .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ProtoInt64, E> {
        v.parse::<i64>()
            .map(ProtoInt64)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for ProtoInt64 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProtoInt64Visitor)
    }
}

fn one() -> ProtoInt64 {
    ProtoInt64(1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FractionRecord {
    #[serde(default)]
    pub numerator: ProtoInt64,
    #[serde(default = "one")]
    pub denominator: ProtoInt64,
}

impl Default for FractionRecord {
    fn default() -> Self {
        Self {
            numerator: ProtoInt64(1),
            denominator: ProtoInt64(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitRecord {
    pub unit: BaseUnit,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default)]
    pub exponent: FractionRecord,
}

impl UnitRecord {
    pub fn from_factor(factor: &UnitFactor) -> Self {
        Self {
            unit: factor.unit,
            scale: factor.scale,
            exponent: FractionRecord {
                numerator: ProtoInt64(factor.exponent.numerator()),
                denominator: ProtoInt64(factor.exponent.denominator()),
            },
        }
    }

    pub fn to_factor(&self) -> Result<UnitFactor, QuantityError> {
        let (numerator, denominator) = (self.exponent.numerator.0, self.exponent.denominator.0);
        let exponent = Fraction::new(numerator, denominator).ok_or_else(|| {
            QuantityError::InvalidRecord(if denominator == 0 {
                "unit exponent has a zero denominator".into()
            } else {
                format!("unit exponent {numerator}/{denominator} is out of range")
            })
        })?;
        Ok(UnitFactor {
            unit: self.unit,
            scale: self.scale,
            exponent,
        })
    }
}

pub fn unit_to_records(unit: &Unit) -> Vec<UnitRecord> {
    unit.factors().iter().map(UnitRecord::from_factor).collect()
}

pub fn unit_from_records(records: &[UnitRecord]) -> Result<Unit, QuantityError> {
    let factors = records
        .iter()
        .map(UnitRecord::to_factor)
        .collect::<Result<Vec<_>, _>>()?;
    Unit::from_factors(factors).map_err(|e| QuantityError::InvalidRecord(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexRecord {
    #[serde(default)]
    pub real: ProtoDouble,
    #[serde(default)]
    pub imaginary: ProtoDouble,
}

/// Scalar quantity record: units plus exactly one of `real_value` or
/// `complex_value`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueRecord {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<UnitRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_value: Option<ProtoDouble>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complex_value: Option<ComplexRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoubleArrayRecord {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ProtoDouble>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComplexArrayRecord {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<ComplexRecord>,
}

/// Array quantity record: units, exactly one of `reals` or `complexes`, and
/// the row-major shape.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueArrayRecord {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<UnitRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reals: Option<DoubleArrayRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexes: Option<ComplexArrayRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shape: Vec<u32>,
}

pub(crate) fn record_to_map<T: Serialize>(record: &T) -> Result<Map<String, Json>, QuantityError> {
    match serde_json::to_value(record) {
        Ok(Json::Object(map)) => Ok(map),
        Ok(other) => Err(QuantityError::InvalidRecord(format!(
            "expected an object, produced {other}"
        ))),
        Err(err) => Err(QuantityError::InvalidRecord(err.to_string())),
    }
}

pub(crate) fn record_from_map<T: for<'de> Deserialize<'de>>(
    map: Map<String, Json>,
) -> Result<T, QuantityError> {
    serde_json::from_value(Json::Object(map)).map_err(|err| QuantityError::InvalidRecord(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn proto_double_non_finite() {
        assert_eq!(serde_json::to_value(ProtoDouble(f64::NAN)).unwrap(), json!("NaN"));
        assert_eq!(
            serde_json::to_value(ProtoDouble(f64::NEG_INFINITY)).unwrap(),
            json!("-Infinity")
        );
        assert_eq!(serde_json::to_value(ProtoDouble(1.5)).unwrap(), json!(1.5));
        let back: ProtoDouble = serde_json::from_value(json!("Infinity")).unwrap();
        assert_eq!(back.0, f64::INFINITY);
        let back: ProtoDouble = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(back.0, 3.0);
        assert!(serde_json::from_value::<ProtoDouble>(json!("abc")).is_err());
    }

    #[test]
    fn proto_int64_is_a_string() {
        assert_eq!(serde_json::to_value(ProtoInt64(-2)).unwrap(), json!("-2"));
        let back: ProtoInt64 = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(back, ProtoInt64(7));
        let back: ProtoInt64 = serde_json::from_value(json!(7)).unwrap();
        assert_eq!(back, ProtoInt64(7));
    }

    #[test]
    fn unit_record_layout() {
        let unit = Unit::parse("GHz").unwrap();
        let records = unit_to_records(&unit);
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([{"unit": "HERTZ", "scale": "GIGA",
                    "exponent": {"numerator": "1", "denominator": "1"}}])
        );
        assert_eq!(unit_from_records(&records).unwrap(), unit);
    }

    #[test]
    fn unit_record_defaults_and_rejects() {
        let record: UnitRecord = serde_json::from_value(json!({"unit": "SECOND"})).unwrap();
        assert_eq!(record.to_factor().unwrap(), UnitFactor::new(BaseUnit::Second, Scale::Unity));
        assert!(serde_json::from_value::<UnitRecord>(json!({"unit": "PARSEC"})).is_err());
        let zero: UnitRecord = serde_json::from_value(
            json!({"unit": "SECOND", "exponent": {"numerator": "1", "denominator": "0"}}),
        )
        .unwrap();
        assert!(zero.to_factor().is_err());
    }

    #[test]
    fn unit_records_reject_out_of_range_exponents() {
        let min: UnitRecord = serde_json::from_value(json!({
            "unit": "SECOND",
            "exponent": {"numerator": "-9223372036854775808", "denominator": "1"}
        }))
        .unwrap();
        assert!(matches!(min.to_factor(), Err(QuantityError::InvalidRecord(_))));

        let max: UnitRecord = serde_json::from_value(json!({
            "unit": "SECOND",
            "exponent": {"numerator": "9223372036854775807", "denominator": "1"}
        }))
        .unwrap();
        assert!(max.to_factor().is_ok());
        assert!(matches!(
            unit_from_records(&[max.clone(), max]),
            Err(QuantityError::InvalidRecord(_))
        ));
    }
}

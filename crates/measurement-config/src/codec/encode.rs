//! Value tree to tagged JSON tree.

use measurement_config_quantity::record::ProtoDouble;
use measurement_config_quantity::{Complex, QuantityError};
use serde::Serialize;
use serde_json::{Map, Number, Value as Json};

use super::error::CodecError;
use super::tag::{Namespace, COMPLEX_CLASS, COMPLEX_IMAG_KEY, COMPLEX_REAL_KEY, TYPE_KEY};
use crate::value::ModelValue;

/// Which branch of the encode cascade a value takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    NumericArray,
    NumericScalar,
    ComplexNumber,
    PhysicalQuantity,
    PhysicalQuantityArray,
    Mapping,
    Sequence,
    Plain,
}

impl ValueKind {
    /// Tag namespace for rich kinds, `None` for containers and primitives.
    pub fn namespace(self) -> Option<Namespace> {
        match self {
            Self::NumericArray | Self::NumericScalar => Some(Namespace::Numeric),
            Self::ComplexNumber => Some(Namespace::Scalar),
            Self::PhysicalQuantity | Self::PhysicalQuantityArray => Some(Namespace::Quantity),
            Self::Mapping | Self::Sequence | Self::Plain => None,
        }
    }
}

/// Classifies `value` in cascade order: numeric array, numeric scalar,
/// complex, quantity, mapping, sequence, plain.
pub fn classify(value: &ModelValue) -> ValueKind {
    match value {
        ModelValue::Array(_) => ValueKind::NumericArray,
        ModelValue::Numeric(_) => ValueKind::NumericScalar,
        ModelValue::Complex(_) => ValueKind::ComplexNumber,
        ModelValue::Quantity(q) if q.is_array() => ValueKind::PhysicalQuantityArray,
        ModelValue::Quantity(_) => ValueKind::PhysicalQuantity,
        ModelValue::Map(_) => ValueKind::Mapping,
        ModelValue::Seq(_) => ValueKind::Sequence,
        ModelValue::Null
        | ModelValue::Bool(_)
        | ModelValue::Int(_)
        | ModelValue::Float(_)
        | ModelValue::Str(_) => ValueKind::Plain,
    }
}

fn tagged(mut payload: Map<String, Json>, namespace: Namespace, class: &str) -> Json {
    payload.insert(TYPE_KEY.to_string(), Json::String(namespace.tag(class)));
    Json::Object(payload)
}

fn proto_double(v: f64) -> Result<Json, CodecError> {
    serde_json::to_value(ProtoDouble(v))
        .map_err(|err| QuantityError::InvalidRecord(err.to_string()).into())
}

fn complex_payload(c: Complex) -> Result<Map<String, Json>, CodecError> {
    let mut payload = Map::new();
    payload.insert(COMPLEX_REAL_KEY.to_string(), proto_double(c.re)?);
    payload.insert(COMPLEX_IMAG_KEY.to_string(), proto_double(c.im)?);
    Ok(payload)
}

/// Encodes `value` into a JSON tree, tagging every rich leaf.
///
/// Mapping keys keep their order. Non-finite plain floats become `null`;
/// inside rich payloads they are kept as `"NaN"`, `"Infinity"` and
/// `"-Infinity"`.
pub fn encode(value: &ModelValue) -> Result<Json, CodecError> {
    Ok(match value {
        ModelValue::Array(a) => tagged(a.lift().to_json()?, Namespace::Numeric, a.class_name()),
        ModelValue::Numeric(n) => tagged(n.lift().to_json()?, Namespace::Numeric, n.class_name()),
        ModelValue::Complex(c) => tagged(complex_payload(*c)?, Namespace::Scalar, COMPLEX_CLASS),
        ModelValue::Quantity(q) => tagged(q.to_json()?, Namespace::Quantity, q.class_name()),
        ModelValue::Map(map) => Json::Object(
            map.iter()
                .map(|(k, v)| Ok((k.clone(), encode(v)?)))
                .collect::<Result<_, CodecError>>()?,
        ),
        ModelValue::Seq(items) => {
            Json::Array(items.iter().map(encode).collect::<Result<_, _>>()?)
        }
        ModelValue::Null => Json::Null,
        ModelValue::Bool(b) => Json::Bool(*b),
        ModelValue::Int(i) => Json::from(*i),
        ModelValue::Float(f) => Number::from_f64(*f).map_or(Json::Null, Json::Number),
        ModelValue::Str(s) => Json::String(s.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use measurement_config_quantity::{NumericScalar, Value};
    use serde_json::json;

    #[test]
    fn classification_cascade() {
        assert_eq!(
            classify(&ModelValue::Numeric(NumericScalar::Complex128(Complex::new(1.0, 0.0)))),
            ValueKind::NumericScalar
        );
        assert_eq!(classify(&Complex::new(1.0, 0.0).into()), ValueKind::ComplexNumber);
        assert_eq!(
            classify(&Value::dimensionless(1.0).into()),
            ValueKind::PhysicalQuantity
        );
        assert_eq!(classify(&ModelValue::Seq(vec![])), ValueKind::Sequence);
        assert_eq!(classify(&ModelValue::Float(1.0)), ValueKind::Plain);
        assert_eq!(ValueKind::Plain.namespace(), None);
    }

    #[test]
    fn complex_layout() {
        let encoded = encode(&Complex::new(3.0, 4.0).into()).unwrap();
        assert_eq!(encoded, json!({"real": 3.0, "imag": 4.0, "__type__": "scalar.complex"}));
        let encoded = encode(&Complex::new(f64::NAN, f64::INFINITY).into()).unwrap();
        assert_eq!(encoded["real"], json!("NaN"));
        assert_eq!(encoded["imag"], json!("Infinity"));
    }

    #[test]
    fn plain_values() {
        assert_eq!(encode(&ModelValue::Float(f64::NAN)).unwrap(), Json::Null);
        assert_eq!(encode(&ModelValue::Int(-3)).unwrap(), json!(-3));
        assert_eq!(encode(&"q0".into()).unwrap(), json!("q0"));
    }
}

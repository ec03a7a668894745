//! Tagged JSON tree back to a value tree.

use std::fmt;

use indexmap::IndexMap;
use measurement_config_quantity::record::ProtoDouble;
use measurement_config_quantity::{
    ArrayData, Complex, DType, NumericArray, NumericScalar, Quantity, QuantityClass, Value,
    ValueArray,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use tracing::{debug, warn};

use super::error::CodecError;
use super::tag::{
    Namespace, NumericClass, COMPLEX_CLASS, COMPLEX_IMAG_KEY, COMPLEX_REAL_KEY, TYPE_KEY,
};
use crate::pointer::FieldPath;
use crate::value::ModelValue;

/// What to do with a tag whose namespace is not recognized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownTagPolicy {
    /// Record an advisory, log a warning and keep the node as a mapping.
    #[default]
    Warn,
    /// Fail with [`CodecError::UnknownTag`].
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub unknown_tag: UnknownTagPolicy,
}

/// A non-fatal observation made while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    UnknownTag { path: String, tag: String },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag { path, tag } => {
                write!(f, "Unknown type during deserialization: {tag} (at `{path}`)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: ModelValue,
    pub advisories: Vec<Advisory>,
}

/// Decodes with the default options: unknown namespaces are tolerated.
pub fn decode(node: &Json) -> Result<Decoded, CodecError> {
    decode_with(node, &DecodeOptions::default())
}

/// Decodes and drops the advisories; they have already been logged.
pub fn decode_value(node: &Json) -> Result<ModelValue, CodecError> {
    decode(node).map(|decoded| decoded.value)
}

pub fn decode_with(node: &Json, options: &DecodeOptions) -> Result<Decoded, CodecError> {
    let mut decoder = Decoder {
        options,
        path: FieldPath::new(),
        advisories: Vec::new(),
    };
    let value = decoder.node(node)?;
    Ok(Decoded {
        value,
        advisories: decoder.advisories,
    })
}

struct Decoder<'o> {
    options: &'o DecodeOptions,
    path: FieldPath,
    advisories: Vec<Advisory>,
}

impl Decoder<'_> {
    fn node(&mut self, node: &Json) -> Result<ModelValue, CodecError> {
        match node {
            Json::Object(map) => {
                if let Some(Json::String(tag)) = map.get(TYPE_KEY) {
                    if let Some(value) = self.tagged(tag, map)? {
                        return Ok(value);
                    }
                }
                self.mapping(map)
            }
            Json::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    self.path.push(i.to_string());
                    let value = self.node(item);
                    self.path.pop();
                    out.push(value?);
                }
                Ok(ModelValue::Seq(out))
            }
            Json::Null => Ok(ModelValue::Null),
            Json::Bool(b) => Ok(ModelValue::Bool(*b)),
            Json::Number(n) => Ok(match n.as_i64() {
                Some(i) => ModelValue::Int(i),
                None => ModelValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Json::String(s) => Ok(ModelValue::Str(s.clone())),
        }
    }

    fn mapping(&mut self, map: &Map<String, Json>) -> Result<ModelValue, CodecError> {
        let mut out = IndexMap::with_capacity(map.len());
        for (key, value) in map {
            self.path.push(key.as_str());
            let value = self.node(value);
            self.path.pop();
            out.insert(key.clone(), value?);
        }
        Ok(ModelValue::Map(out))
    }

    /// Returns `None` when the node should be decoded as a plain mapping.
    fn tagged(
        &mut self,
        tag: &str,
        map: &Map<String, Json>,
    ) -> Result<Option<ModelValue>, CodecError> {
        let Some((namespace, class)) = Namespace::split(tag) else {
            return self.unknown(tag).map(|()| None);
        };
        debug!(path = %self.path, tag, "decoding tagged node");
        let mut payload = map.clone();
        payload.remove(TYPE_KEY);
        let value = match namespace {
            Namespace::Numeric => self.numeric(tag, class, payload)?,
            Namespace::Quantity => self.quantity(tag, class, payload)?,
            Namespace::Scalar => self.scalar(tag, class, &payload)?,
        };
        Ok(Some(value))
    }

    fn unknown(&mut self, tag: &str) -> Result<(), CodecError> {
        let path = self.path.pointer();
        match self.options.unknown_tag {
            UnknownTagPolicy::Error => Err(CodecError::UnknownTag {
                path,
                tag: tag.to_string(),
            }),
            UnknownTagPolicy::Warn => {
                warn!(path = %path, tag, "Unknown type during deserialization: {tag}");
                self.advisories.push(Advisory::UnknownTag {
                    path,
                    tag: tag.to_string(),
                });
                Ok(())
            }
        }
    }

    fn invalid(&self, tag: &str, reason: impl fmt::Display) -> CodecError {
        CodecError::InvalidPayload {
            tag: tag.to_string(),
            path: self.path.pointer(),
            reason: reason.to_string(),
        }
    }

    fn numeric(
        &self,
        tag: &str,
        class: &str,
        payload: Map<String, Json>,
    ) -> Result<ModelValue, CodecError> {
        let class = NumericClass::from_name(class)
            .ok_or_else(|| CodecError::UnknownNumericClass(class.to_string()))?;
        Ok(match class {
            NumericClass::Scalar(dtype) => {
                let value = Value::from_json(payload).map_err(|e| self.invalid(tag, e))?;
                ModelValue::Numeric(
                    NumericScalar::unlift(dtype, &value).map_err(|e| self.invalid(tag, e))?,
                )
            }
            NumericClass::Array(dtype) => {
                let array = ValueArray::from_json(payload).map_err(|e| self.invalid(tag, e))?;
                ModelValue::Array(
                    NumericArray::unlift(dtype, &array).map_err(|e| self.invalid(tag, e))?,
                )
            }
            NumericClass::LegacyArray => {
                let array = ValueArray::from_json(payload).map_err(|e| self.invalid(tag, e))?;
                let dtype = match array.values() {
                    ArrayData::Real(_) => DType::Float64,
                    ArrayData::Complex(_) => DType::Complex128,
                };
                ModelValue::Array(
                    NumericArray::unlift(dtype, &array).map_err(|e| self.invalid(tag, e))?,
                )
            }
        })
    }

    fn quantity(
        &self,
        tag: &str,
        class: &str,
        payload: Map<String, Json>,
    ) -> Result<ModelValue, CodecError> {
        let class = QuantityClass::from_name(class)
            .ok_or_else(|| CodecError::UnknownQuantityClass(class.to_string()))?;
        let quantity = Quantity::from_json(class, payload).map_err(|e| self.invalid(tag, e))?;
        Ok(ModelValue::Quantity(quantity))
    }

    fn scalar(
        &self,
        tag: &str,
        class: &str,
        payload: &Map<String, Json>,
    ) -> Result<ModelValue, CodecError> {
        if class != COMPLEX_CLASS {
            return Err(CodecError::UnknownComplexClass(tag.to_string()));
        }
        let part = |key: &str| -> Result<f64, CodecError> {
            let raw = payload
                .get(key)
                .ok_or_else(|| self.invalid(tag, format_args!("missing `{key}`")))?;
            serde_json::from_value::<ProtoDouble>(raw.clone())
                .map(|d| d.0)
                .map_err(|e| self.invalid(tag, format_args!("`{key}`: {e}")))
        };
        Ok(ModelValue::Complex(Complex::new(
            part(COMPLEX_REAL_KEY)?,
            part(COMPLEX_IMAG_KEY)?,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primitives_pass_through() {
        assert_eq!(decode_value(&json!(3)).unwrap(), ModelValue::Int(3));
        assert_eq!(decode_value(&json!(3.5)).unwrap(), ModelValue::Float(3.5));
        assert_eq!(decode_value(&json!(null)).unwrap(), ModelValue::Null);
        assert_eq!(
            decode_value(&json!(u64::MAX)).unwrap(),
            ModelValue::Float(u64::MAX as f64)
        );
    }

    #[test]
    fn non_string_tag_is_plain() {
        let node = json!({"__type__": 7, "a": 1});
        let decoded = decode(&node).unwrap();
        assert!(decoded.advisories.is_empty());
        assert_eq!(decoded.value.as_map().unwrap()["__type__"], ModelValue::Int(7));
    }

    #[test]
    fn unknown_scalar_class() {
        let node = json!({"__type__": "scalar.quaternion", "real": 1.0});
        assert_eq!(
            decode(&node),
            Err(CodecError::UnknownComplexClass("scalar.quaternion".into()))
        );
    }

    #[test]
    fn malformed_payload_names_the_path() {
        let node = json!({"freq": [{"__type__": "scalar.complex", "real": 1.0}]});
        match decode(&node) {
            Err(CodecError::InvalidPayload { tag, path, .. }) => {
                assert_eq!(tag, "scalar.complex");
                assert_eq!(path, "/freq/0");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn error_policy_rejects_unknown_namespaces() {
        let options = DecodeOptions {
            unknown_tag: UnknownTagPolicy::Error,
        };
        let node = json!({"x": {"__type__": "unknown.Foo"}});
        assert_eq!(
            decode_with(&node, &options),
            Err(CodecError::UnknownTag {
                path: "/x".into(),
                tag: "unknown.Foo".into()
            })
        );
    }

    #[test]
    fn options_deserialize_from_config() {
        let options: DecodeOptions = serde_json::from_value(json!({"unknown_tag": "error"})).unwrap();
        assert_eq!(options.unknown_tag, UnknownTagPolicy::Error);
        let options: DecodeOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, DecodeOptions::default());
    }
}

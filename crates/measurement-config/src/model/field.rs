//! Conversion between declared field types and the dynamic value tree.

use indexmap::IndexMap;
use measurement_config_quantity::{
    Complex, Frequency, FrequencyArray, NdArray, NumericArray, NumericScalar, Quantity, Time,
    TimeArray, Value, ValueArray,
};

use super::error::ValidationError;
use crate::pointer::FieldPath;
use crate::schema::{RichKind, TypeSchema};
use crate::value::ModelValue;

/// A type that can be stored in a record field.
pub trait Field: Sized {
    fn to_model_value(&self) -> ModelValue;

    /// Validates `value`, reporting errors at `path`.
    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError>;

    fn type_schema() -> TypeSchema;

    /// Value used when the key is absent; `None` makes the field required.
    fn missing() -> Option<Self> {
        None
    }
}

impl Field for ModelValue {
    fn to_model_value(&self) -> ModelValue {
        self.clone()
    }

    fn from_model_value(value: ModelValue, _path: &mut FieldPath) -> Result<Self, ValidationError> {
        Ok(value)
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Any
    }
}

impl Field for bool {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Bool(*self)
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Bool(b) => Ok(b),
            other => Err(ValidationError::type_mismatch(path, "bool", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Bool
    }
}

impl Field for i64 {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Int(*self)
    }

    /// Integral floats are accepted; fractional ones are not truncated.
    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Int(i) => Ok(i),
            ModelValue::Float(f)
                if f.fract() == 0.0
                    && (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f) =>
            {
                Ok(f as i64)
            }
            ModelValue::Float(f) => Err(ValidationError::invalid(
                path,
                format_args!("{f} is not a whole number"),
            )),
            other => Err(ValidationError::type_mismatch(path, "int", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Integer
    }
}

macro_rules! narrow_int_field {
    ($($ty:ty),*) => {
        $(
            impl Field for $ty {
                fn to_model_value(&self) -> ModelValue {
                    ModelValue::Int(*self as i64)
                }

                fn from_model_value(
                    value: ModelValue,
                    path: &mut FieldPath,
                ) -> Result<Self, ValidationError> {
                    let wide = i64::from_model_value(value, path)?;
                    <$ty>::try_from(wide).map_err(|_| {
                        ValidationError::invalid(
                            path,
                            format_args!("{wide} is out of range for {}", stringify!($ty)),
                        )
                    })
                }

                fn type_schema() -> TypeSchema {
                    TypeSchema::Integer
                }
            }
        )*
    };
}

narrow_int_field!(i32, u32, usize);

impl Field for f64 {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Float(*self)
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Float(f) => Ok(f),
            ModelValue::Int(i) => Ok(i as f64),
            other => Err(ValidationError::type_mismatch(path, "float", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Number
    }
}

impl Field for String {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Str(self.clone())
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Str(s) => Ok(s),
            other => Err(ValidationError::type_mismatch(path, "string", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::String
    }
}

impl<T: Field> Field for Vec<T> {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Seq(self.iter().map(Field::to_model_value).collect())
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Seq(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| path.scoped(i.to_string(), |p| T::from_model_value(item, p)))
                .collect(),
            other => Err(ValidationError::type_mismatch(path, "sequence", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Array(Box::new(T::type_schema()))
    }
}

impl<T: Field> Field for IndexMap<String, T> {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Map(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_model_value()))
                .collect(),
        )
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Map(map) => map
                .into_iter()
                .map(|(k, v)| {
                    let v = path.scoped(k.as_str(), |p| T::from_model_value(v, p))?;
                    Ok((k, v))
                })
                .collect(),
            other => Err(ValidationError::type_mismatch(path, "mapping", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Map(Box::new(T::type_schema()))
    }
}

impl<T: Field> Field for Option<T> {
    fn to_model_value(&self) -> ModelValue {
        self.as_ref().map_or(ModelValue::Null, Field::to_model_value)
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Null => Ok(None),
            other => T::from_model_value(other, path).map(Some),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::Optional(Box::new(T::type_schema()))
    }

    fn missing() -> Option<Self> {
        Some(None)
    }
}

impl Field for Complex {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Complex(*self)
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Complex(c) => Ok(c),
            other => Err(ValidationError::type_mismatch(path, "complex", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::rich("complex", RichKind::Complex)
    }
}

impl Field for NumericScalar {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Numeric(*self)
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Numeric(n) => Ok(n),
            other => Err(ValidationError::type_mismatch(path, "numeric scalar", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::rich("NumericScalar", RichKind::NumericScalar)
    }
}

impl Field for NumericArray {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Array(self.clone())
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Array(a) => Ok(a),
            other => Err(ValidationError::type_mismatch(path, "numeric array", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::rich("NumericArray", RichKind::NumericArray)
    }
}

impl Field for NdArray<f64> {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Array(NumericArray::Float64(self.clone()))
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Array(NumericArray::Float64(a)) => Ok(a),
            other => Err(ValidationError::type_mismatch(path, "float64 array", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::rich("Float64Array", RichKind::NumericArray)
    }
}

impl Field for NdArray<Complex> {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Array(NumericArray::Complex128(self.clone()))
    }

    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Array(NumericArray::Complex128(a)) => Ok(a),
            other => Err(ValidationError::type_mismatch(path, "complex128 array", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::rich("Complex128Array", RichKind::NumericArray)
    }
}

impl Field for Value {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Quantity(Quantity::Value(self.clone()))
    }

    /// Accepts `Time` and `Frequency` as well.
    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Quantity(Quantity::Value(v)) => Ok(v),
            ModelValue::Quantity(Quantity::Time(v)) => Ok(v.into_inner()),
            ModelValue::Quantity(Quantity::Frequency(v)) => Ok(v.into_inner()),
            other => Err(ValidationError::type_mismatch(path, "Value", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::rich("Value", RichKind::Quantity)
    }
}

impl Field for ValueArray {
    fn to_model_value(&self) -> ModelValue {
        ModelValue::Quantity(Quantity::ValueArray(self.clone()))
    }

    /// Accepts `TimeArray` and `FrequencyArray` as well.
    fn from_model_value(value: ModelValue, path: &mut FieldPath) -> Result<Self, ValidationError> {
        match value {
            ModelValue::Quantity(Quantity::ValueArray(v)) => Ok(v),
            ModelValue::Quantity(Quantity::TimeArray(v)) => Ok(v.into_inner()),
            ModelValue::Quantity(Quantity::FrequencyArray(v)) => Ok(v.into_inner()),
            other => Err(ValidationError::type_mismatch(path, "ValueArray", &other)),
        }
    }

    fn type_schema() -> TypeSchema {
        TypeSchema::rich("ValueArray", RichKind::QuantityArray)
    }
}

/// Dimension-checked quantities also accept their untyped base when the
/// unit carries the right dimension.
macro_rules! dimensioned_field {
    ($name:ident, $base:ident, $kind:expr) => {
        impl Field for $name {
            fn to_model_value(&self) -> ModelValue {
                ModelValue::Quantity(Quantity::$name(self.clone()))
            }

            fn from_model_value(
                value: ModelValue,
                path: &mut FieldPath,
            ) -> Result<Self, ValidationError> {
                match value {
                    ModelValue::Quantity(Quantity::$name(v)) => Ok(v),
                    ModelValue::Quantity(Quantity::$base(v)) => {
                        $name::try_from(v).map_err(|e| ValidationError::invalid(path, e))
                    }
                    other => Err(ValidationError::type_mismatch(path, stringify!($name), &other)),
                }
            }

            fn type_schema() -> TypeSchema {
                TypeSchema::rich(stringify!($name), $kind)
            }
        }
    };
}

dimensioned_field!(Time, Value, RichKind::Quantity);
dimensioned_field!(Frequency, Value, RichKind::Quantity);
dimensioned_field!(TimeArray, ValueArray, RichKind::QuantityArray);
dimensioned_field!(FrequencyArray, ValueArray, RichKind::QuantityArray);

#[cfg(test)]
mod tests {
    use super::*;

    fn load<T: Field>(value: impl Into<ModelValue>) -> Result<T, ValidationError> {
        T::from_model_value(value.into(), &mut FieldPath::new())
    }

    #[test]
    fn ints_are_strict_about_fractions() {
        assert_eq!(load::<i64>(3.0), Ok(3));
        assert!(matches!(load::<i64>(3.5), Err(ValidationError::Invalid { .. })));
        assert!(matches!(load::<u32>(-1i64), Err(ValidationError::Invalid { .. })));
        assert_eq!(load::<f64>(2i64), Ok(2.0));
        assert!(matches!(load::<bool>("yes"), Err(ValidationError::Type { .. })));
    }

    #[test]
    fn nested_errors_carry_the_pointer() {
        let mut map = IndexMap::new();
        map.insert(
            "q0".to_string(),
            ModelValue::Seq(vec![ModelValue::Int(1), ModelValue::Str("x".into())]),
        );
        let err = load::<IndexMap<String, Vec<i64>>>(map).unwrap_err();
        assert_eq!(err.path(), "/q0/1");
    }

    #[test]
    fn quantity_subclass_tolerance() {
        let t = Time::from_unit_str(4.0, "ns").unwrap();
        assert_eq!(load::<Value>(t.clone()), Ok(t.as_inner().clone()));

        let plain = Value::from_unit_str(4.0, "ns").unwrap();
        assert_eq!(load::<Time>(plain), Ok(t));

        let wrong = Value::from_unit_str(4.0, "GHz").unwrap();
        assert!(matches!(load::<Time>(wrong), Err(ValidationError::Invalid { .. })));

        let f = Frequency::from_unit_str(1.0, "GHz").unwrap();
        assert!(matches!(load::<Time>(f), Err(ValidationError::Type { .. })));
    }

    #[test]
    fn option_fills_missing() {
        assert_eq!(<Option<String>>::missing(), Some(None));
        assert_eq!(String::missing(), None);
        assert_eq!(load::<Option<i64>>(ModelValue::Null), Ok(None));
    }
}

//! Records: named bundles of typed fields with dict, JSON and schema forms.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value as Json};

use super::error::{ModelError, ValidationError};
use super::field::Field;
use crate::codec::{decode_with, encode, DecodeOptions};
use crate::pointer::FieldPath;
use crate::schema::{json_schema_with, FieldSchema, RichJsonSchema};
use crate::value::ModelValue;

/// A record type. Implemented through [`model!`](crate::model!).
pub trait Model: Field {
    const NAME: &'static str;

    fn fields() -> Vec<FieldSchema>;

    /// Field values in declaration order.
    fn dump(&self) -> IndexMap<String, ModelValue>;

    /// Builds a record from field values; keys that name no field are
    /// ignored.
    fn load(map: IndexMap<String, ModelValue>, path: &mut FieldPath) -> Result<Self, ValidationError>;

    fn to_dict(&self) -> Result<Json, ModelError> {
        Ok(encode(&ModelValue::Map(self.dump()))?)
    }

    /// Serializes to JSON text, pretty-printed with `indent` spaces when
    /// given.
    fn to_json(&self, indent: Option<usize>) -> Result<String, ModelError> {
        let tree = self.to_dict()?;
        match indent {
            None => Ok(serde_json::to_string(&tree)?),
            Some(width) => {
                let pad = vec![b' '; width];
                let mut out = Vec::new();
                let mut ser = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&pad));
                tree.serialize(&mut ser)?;
                Ok(String::from_utf8(out)?)
            }
        }
    }

    fn from_dict(node: &Json) -> Result<Self, ModelError> {
        Self::from_dict_with(node, &DecodeOptions::default())
    }

    /// Decodes `node` first, then validates the result against the fields.
    fn from_dict_with(node: &Json, options: &DecodeOptions) -> Result<Self, ModelError> {
        let decoded = decode_with(node, options)?;
        Ok(Self::from_model_value(decoded.value, &mut FieldPath::new())?)
    }

    fn from_json(text: &str) -> Result<Self, ModelError> {
        let node: Json = serde_json::from_str(text)?;
        Self::from_dict(&node)
    }

    /// JSON Schema with rich leaves described as objects.
    fn json_schema() -> Result<Json, ModelError> {
        Ok(json_schema_with(&RichJsonSchema, &Self::type_schema())?)
    }
}

/// Removes `name` from `map` and validates it as a `T`.
#[doc(hidden)]
pub fn load_field<T: Field>(
    map: &mut IndexMap<String, ModelValue>,
    name: &str,
    path: &mut FieldPath,
) -> Result<T, ValidationError> {
    match map.shift_remove(name) {
        Some(value) => path.scoped(name, |p| T::from_model_value(value, p)),
        None => T::missing().ok_or_else(|| ValidationError::Missing {
            path: path.child_pointer(name),
        }),
    }
}

/// Declares a record struct and implements [`Field`] and [`Model`] for it.
///
/// ```
/// use measurement_config::{model, Model};
///
/// model! {
///     /// A labelled count.
///     pub struct Tally {
///         pub label: String,
///         pub count: i64,
///     }
/// }
///
/// let t = Tally { label: "shots".into(), count: 3 };
/// let json = t.to_json(None).unwrap();
/// assert_eq!(json, r#"{"label":"shots","count":3}"#);
/// assert_eq!(Tally::from_json(&json).unwrap(), t);
/// ```
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::Field for $name {
            fn to_model_value(&self) -> $crate::ModelValue {
                $crate::ModelValue::Map(<Self as $crate::Model>::dump(self))
            }

            fn from_model_value(
                value: $crate::ModelValue,
                path: &mut $crate::FieldPath,
            ) -> ::core::result::Result<Self, $crate::ValidationError> {
                match value {
                    $crate::ModelValue::Map(map) => <Self as $crate::Model>::load(map, path),
                    other => ::core::result::Result::Err($crate::ValidationError::type_mismatch(
                        path,
                        <Self as $crate::Model>::NAME,
                        &other,
                    )),
                }
            }

            fn type_schema() -> $crate::schema::TypeSchema {
                $crate::schema::TypeSchema::Model($crate::schema::ModelSchema {
                    name: <Self as $crate::Model>::NAME,
                    fields: <Self as $crate::Model>::fields(),
                })
            }
        }

        impl $crate::Model for $name {
            const NAME: &'static str = stringify!($name);

            fn fields() -> ::std::vec::Vec<$crate::schema::FieldSchema> {
                ::std::vec![$($crate::schema::FieldSchema::of::<$ty>(stringify!($field))),*]
            }

            fn dump(&self) -> $crate::__private::IndexMap<::std::string::String, $crate::ModelValue> {
                let mut map = $crate::__private::IndexMap::new();
                $(
                    map.insert(
                        ::std::string::String::from(stringify!($field)),
                        $crate::Field::to_model_value(&self.$field),
                    );
                )*
                map
            }

            fn load(
                #[allow(unused_mut)] mut map: $crate::__private::IndexMap<::std::string::String, $crate::ModelValue>,
                path: &mut $crate::FieldPath,
            ) -> ::core::result::Result<Self, $crate::ValidationError> {
                ::core::result::Result::Ok(Self {
                    $($field: $crate::__private::load_field(&mut map, stringify!($field), path)?,)*
                })
            }
        }
    };
}

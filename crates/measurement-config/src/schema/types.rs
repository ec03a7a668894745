//! Declared field types, as seen by schema generation.

use crate::model::Field;

/// The rich leaf kinds that have no native JSON Schema form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RichKind {
    NumericArray,
    NumericScalar,
    Complex,
    Quantity,
    QuantityArray,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeSchema {
    Any,
    Bool,
    Integer,
    Number,
    String,
    Enum(Vec<&'static str>),
    Array(Box<TypeSchema>),
    Map(Box<TypeSchema>),
    Optional(Box<TypeSchema>),
    Union(Vec<TypeSchema>),
    Model(ModelSchema),
    /// A type with no built-in JSON Schema mapping.
    Opaque {
        type_name: &'static str,
        rich: Option<RichKind>,
    },
}

impl TypeSchema {
    pub fn rich(type_name: &'static str, kind: RichKind) -> Self {
        Self::Opaque {
            type_name,
            rich: Some(kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub schema: TypeSchema,
    pub required: bool,
}

impl FieldSchema {
    /// Describes a field of type `T`; fields with a missing default are
    /// optional.
    pub fn of<T: Field>(name: &'static str) -> Self {
        Self {
            name,
            schema: T::type_schema(),
            required: T::missing().is_none(),
        }
    }
}

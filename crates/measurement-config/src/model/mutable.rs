//! By-name field assignment with validation.

use std::ops::Deref;

use super::error::ModelError;
use super::record::Model;
use crate::pointer::FieldPath;
use crate::value::ModelValue;

/// Wraps a record so fields can be reassigned by name.
///
/// Every assignment is validated against the field's declared type; a
/// rejected assignment leaves the record as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutable<M> {
    inner: M,
}

impl<M: Model> Mutable<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }

    pub fn set(&mut self, field: &str, value: impl Into<ModelValue>) -> Result<(), ModelError> {
        if !M::fields().iter().any(|f| f.name == field) {
            return Err(ModelError::UnknownField {
                model: M::NAME,
                field: field.to_string(),
            });
        }
        let mut map = self.inner.dump();
        map.insert(field.to_string(), value.into());
        self.inner = M::load(map, &mut FieldPath::new())?;
        Ok(())
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M> Deref for Mutable<M> {
    type Target = M;

    fn deref(&self) -> &M {
        &self.inner
    }
}

impl<M: Model> From<M> for Mutable<M> {
    fn from(inner: M) -> Self {
        Self::new(inner)
    }
}

//! Scalar and array quantities: numbers paired with a unit.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value as Json};

use crate::Complex;
use crate::dimension::Dimension;
use crate::error::QuantityError;
use crate::ndarray::NdArray;
use crate::record::{
    record_from_map, record_to_map, unit_from_records, unit_to_records, ComplexArrayRecord,
    ComplexRecord, DoubleArrayRecord, ProtoDouble, ValueArrayRecord, ValueRecord,
};
use crate::unit::Unit;

/// The numeric part of a scalar quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Real(f64),
    Complex(Complex),
}

impl Scalar {
    pub fn as_complex(self) -> Complex {
        match self {
            Self::Real(v) => Complex::from(v),
            Self::Complex(c) => c,
        }
    }

    pub fn as_real(self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(v),
            Self::Complex(_) => None,
        }
    }

    fn scaled(self, k: f64) -> Scalar {
        match self {
            Self::Real(v) => Self::Real(v * k),
            Self::Complex(c) => Self::Complex(Complex::new(c.re * k, c.im * k)),
        }
    }

    fn combine(self, other: Scalar, real: fn(f64, f64) -> f64, complex: fn(Complex, Complex) -> Complex) -> Scalar {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => Self::Real(real(a, b)),
            (a, b) => Self::Complex(complex(a.as_complex(), b.as_complex())),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<Complex> for Scalar {
    fn from(c: Complex) -> Self {
        Self::Complex(c)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(v) => write!(f, "{v}"),
            Self::Complex(c) => write!(f, "{c}"),
        }
    }
}

/// A scalar quantity.
///
/// Equality is structural: `1 GHz` and `1000 MHz` are different values but
/// [`Value::is_equivalent`] reports them as physically equal.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    value: Scalar,
    unit: Unit,
}

impl Value {
    pub fn new(value: impl Into<Scalar>, unit: Unit) -> Self {
        Self {
            value: value.into(),
            unit,
        }
    }

    pub fn dimensionless(value: impl Into<Scalar>) -> Self {
        Self::new(value, Unit::dimensionless())
    }

    /// `Value::from_unit_str(5.0, "GHz")`.
    pub fn from_unit_str(value: impl Into<Scalar>, unit: &str) -> Result<Self, QuantityError> {
        Ok(Self::new(value, Unit::parse(unit)?))
    }

    pub fn value(&self) -> Scalar {
        self.value
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    pub fn convert_to(&self, unit: &Unit) -> Result<Value, QuantityError> {
        let k = self.unit.conversion_factor(unit)?;
        Ok(Value::new(self.value.scaled(k), unit.clone()))
    }

    /// The numeric part expressed in `unit`.
    pub fn value_in(&self, unit: &Unit) -> Result<Scalar, QuantityError> {
        Ok(self.convert_to(unit)?.value)
    }

    pub fn checked_add(&self, other: &Value) -> Result<Value, QuantityError> {
        let rhs = other.value_in(&self.unit)?;
        Ok(Value::new(
            self.value.combine(rhs, |a, b| a + b, |a, b| a + b),
            self.unit.clone(),
        ))
    }

    pub fn checked_sub(&self, other: &Value) -> Result<Value, QuantityError> {
        let rhs = other.value_in(&self.unit)?;
        Ok(Value::new(
            self.value.combine(rhs, |a, b| a - b, |a, b| a - b),
            self.unit.clone(),
        ))
    }

    /// Product of two quantities; the unit is the product of both units.
    pub fn checked_mul(&self, other: &Value) -> Result<Value, QuantityError> {
        Ok(Value::new(
            self.value.combine(other.value, |a, b| a * b, |a, b| a * b),
            self.unit.mul(&other.unit)?,
        ))
    }

    pub fn checked_div(&self, other: &Value) -> Result<Value, QuantityError> {
        Ok(Value::new(
            self.value.combine(other.value, |a, b| a / b, |a, b| a / b),
            self.unit.div(&other.unit)?,
        ))
    }

    /// Orders two real quantities of compatible dimension.
    pub fn compare(&self, other: &Value) -> Result<Ordering, QuantityError> {
        let rhs = other.value_in(&self.unit)?;
        match (self.value, rhs) {
            (Scalar::Real(a), Scalar::Real(b)) => a.partial_cmp(&b).ok_or(QuantityError::Unordered),
            _ => Err(QuantityError::Unordered),
        }
    }

    /// Physical equality after unit conversion, within a relative tolerance
    /// of a few ulps.
    pub fn is_equivalent(&self, other: &Value) -> bool {
        match other.value_in(&self.unit) {
            Ok(rhs) => scalar_close(self.value, rhs),
            Err(_) => false,
        }
    }

    pub fn to_record(&self) -> ValueRecord {
        let mut record = ValueRecord {
            units: unit_to_records(&self.unit),
            ..ValueRecord::default()
        };
        match self.value {
            Scalar::Real(v) => record.real_value = Some(ProtoDouble(v)),
            Scalar::Complex(c) => {
                record.complex_value = Some(ComplexRecord {
                    real: ProtoDouble(c.re),
                    imaginary: ProtoDouble(c.im),
                })
            }
        }
        record
    }

    pub fn from_record(record: &ValueRecord) -> Result<Self, QuantityError> {
        let unit = unit_from_records(&record.units)?;
        let value = match (&record.real_value, &record.complex_value) {
            (Some(v), None) => Scalar::Real(v.0),
            (None, Some(c)) => Scalar::Complex(Complex::new(c.real.0, c.imaginary.0)),
            (Some(_), Some(_)) => {
                return Err(QuantityError::InvalidRecord(
                    "both real_value and complex_value are set".into(),
                ))
            }
            (None, None) => {
                return Err(QuantityError::InvalidRecord(
                    "neither real_value nor complex_value is set".into(),
                ))
            }
        };
        Ok(Self { value, unit })
    }

    pub fn to_json(&self) -> Result<Map<String, Json>, QuantityError> {
        record_to_map(&self.to_record())
    }

    pub fn from_json(map: Map<String, Json>) -> Result<Self, QuantityError> {
        Self::from_record(&record_from_map(map)?)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.factors().is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}

fn close(a: f64, b: f64) -> bool {
    a == b || (a - b).abs() <= 4.0 * f64::EPSILON * a.abs().max(b.abs())
}

fn scalar_close(a: Scalar, b: Scalar) -> bool {
    let (a, b) = (a.as_complex(), b.as_complex());
    close(a.re, b.re) && close(a.im, b.im)
}

/// The numeric part of an array quantity.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Real(NdArray<f64>),
    Complex(NdArray<Complex>),
}

impl ArrayData {
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Real(a) => a.shape(),
            Self::Complex(a) => a.shape(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Real(a) => a.len(),
            Self::Complex(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn scaled(&self, k: f64) -> ArrayData {
        match self {
            Self::Real(a) => Self::Real(a.map(|v| v * k)),
            Self::Complex(a) => Self::Complex(a.map(|c| Complex::new(c.re * k, c.im * k))),
        }
    }
}

impl From<Vec<f64>> for ArrayData {
    fn from(v: Vec<f64>) -> Self {
        Self::Real(NdArray::from_vec(v))
    }
}

impl From<Vec<Complex>> for ArrayData {
    fn from(v: Vec<Complex>) -> Self {
        Self::Complex(NdArray::from_vec(v))
    }
}

impl From<NdArray<f64>> for ArrayData {
    fn from(a: NdArray<f64>) -> Self {
        Self::Real(a)
    }
}

impl From<NdArray<Complex>> for ArrayData {
    fn from(a: NdArray<Complex>) -> Self {
        Self::Complex(a)
    }
}

/// An array quantity: every element shares one unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueArray {
    values: ArrayData,
    unit: Unit,
}

impl ValueArray {
    pub fn new(values: impl Into<ArrayData>, unit: Unit) -> Self {
        Self {
            values: values.into(),
            unit,
        }
    }

    pub fn dimensionless(values: impl Into<ArrayData>) -> Self {
        Self::new(values, Unit::dimensionless())
    }

    /// `ValueArray::from_unit_str(vec![1.0, 2.0], "ns")`.
    pub fn from_unit_str(values: impl Into<ArrayData>, unit: &str) -> Result<Self, QuantityError> {
        Ok(Self::new(values, Unit::parse(unit)?))
    }

    pub fn values(&self) -> &ArrayData {
        &self.values
    }

    pub fn into_values(self) -> ArrayData {
        self.values
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension()
    }

    /// Element at a row-major multi-index.
    pub fn get(&self, index: &[usize]) -> Option<Value> {
        let scalar = match &self.values {
            ArrayData::Real(a) => Scalar::Real(*a.get(index)?),
            ArrayData::Complex(a) => Scalar::Complex(*a.get(index)?),
        };
        Some(Value::new(scalar, self.unit.clone()))
    }

    pub fn convert_to(&self, unit: &Unit) -> Result<ValueArray, QuantityError> {
        let k = self.unit.conversion_factor(unit)?;
        Ok(ValueArray::new(self.values.scaled(k), unit.clone()))
    }

    pub fn is_equivalent(&self, other: &ValueArray) -> bool {
        let Ok(rhs) = other.convert_to(&self.unit) else {
            return false;
        };
        if self.shape() != rhs.shape() {
            return false;
        }
        match (&self.values, &rhs.values) {
            (ArrayData::Real(a), ArrayData::Real(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| close(*x, *y))
            }
            (ArrayData::Complex(a), ArrayData::Complex(b)) => a
                .iter()
                .zip(b.iter())
                .all(|(x, y)| scalar_close(Scalar::Complex(*x), Scalar::Complex(*y))),
            _ => false,
        }
    }

    /// Fails when a dimension does not fit the record's 32-bit shape field.
    pub fn to_record(&self) -> Result<ValueArrayRecord, QuantityError> {
        let shape = self
            .shape()
            .iter()
            .map(|&d| {
                u32::try_from(d).map_err(|_| {
                    QuantityError::InvalidRecord(format!("dimension {d} exceeds the record range"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut record = ValueArrayRecord {
            units: unit_to_records(&self.unit),
            shape,
            ..ValueArrayRecord::default()
        };
        match &self.values {
            ArrayData::Real(a) => {
                record.reals = Some(DoubleArrayRecord {
                    values: a.iter().map(|&v| ProtoDouble(v)).collect(),
                })
            }
            ArrayData::Complex(a) => {
                record.complexes = Some(ComplexArrayRecord {
                    values: a
                        .iter()
                        .map(|c| ComplexRecord {
                            real: ProtoDouble(c.re),
                            imaginary: ProtoDouble(c.im),
                        })
                        .collect(),
                })
            }
        }
        Ok(record)
    }

    pub fn from_record(record: &ValueArrayRecord) -> Result<Self, QuantityError> {
        let unit = unit_from_records(&record.units)?;
        let shape: Vec<usize> = record.shape.iter().map(|&d| d as usize).collect();
        let invalid = |e: QuantityError| QuantityError::InvalidRecord(e.to_string());
        let values = match (&record.reals, &record.complexes) {
            (Some(reals), None) => ArrayData::Real(
                NdArray::new(shape, reals.values.iter().map(|v| v.0).collect()).map_err(invalid)?,
            ),
            (None, Some(complexes)) => ArrayData::Complex(
                NdArray::new(
                    shape,
                    complexes
                        .values
                        .iter()
                        .map(|c| Complex::new(c.real.0, c.imaginary.0))
                        .collect(),
                )
                .map_err(invalid)?,
            ),
            (Some(_), Some(_)) => {
                return Err(QuantityError::InvalidRecord(
                    "both reals and complexes are set".into(),
                ))
            }
            (None, None) => {
                return Err(QuantityError::InvalidRecord(
                    "neither reals nor complexes is set".into(),
                ))
            }
        };
        Ok(Self { values, unit })
    }

    pub fn to_json(&self) -> Result<Map<String, Json>, QuantityError> {
        record_to_map(&self.to_record()?)
    }

    pub fn from_json(map: Map<String, Json>) -> Result<Self, QuantityError> {
        Self::from_record(&record_from_map(map)?)
    }
}

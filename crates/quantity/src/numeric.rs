//! Typed numeric scalars and arrays (dtype-tagged), and their lifting into
//! dimensionless quantities.
//!
//! Lifting reuses the quantity exchange record as the wire form of bare
//! numbers. Unlifting casts back into the requested dtype: floats round,
//! integers must be integral and in range, complex values only fit a real
//! dtype when their imaginary part is zero.

use crate::Complex;
use crate::error::NumericError;
use crate::ndarray::NdArray;
use crate::value::{ArrayData, Scalar, Value, ValueArray};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Float64,
    Float32,
    Int64,
    Int32,
    Complex128,
}

impl DType {
    pub const ALL: [DType; 5] = [
        DType::Float64,
        DType::Float32,
        DType::Int64,
        DType::Int32,
        DType::Complex128,
    ];

    /// Scalar class name, e.g. `float64`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Float64 => "float64",
            Self::Float32 => "float32",
            Self::Int64 => "int64",
            Self::Int32 => "int32",
            Self::Complex128 => "complex128",
        }
    }

    /// Array class name, e.g. `Float64Array`.
    pub fn array_class_name(self) -> &'static str {
        match self {
            Self::Float64 => "Float64Array",
            Self::Float32 => "Float32Array",
            Self::Int64 => "Int64Array",
            Self::Int32 => "Int32Array",
            Self::Complex128 => "Complex128Array",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }

    pub fn from_array_class_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.array_class_name() == name)
    }

    pub fn is_complex(self) -> bool {
        matches!(self, Self::Complex128)
    }
}

fn lossy(value: impl ToString, dtype: DType) -> NumericError {
    NumericError::Lossy {
        value: value.to_string(),
        dtype: dtype.name(),
    }
}

fn to_i64(v: f64) -> Result<i64, NumericError> {
    // 2^63 is exactly representable; the valid range is [-2^63, 2^63).
    if v.fract() == 0.0 && (-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&v) {
        Ok(v as i64)
    } else {
        Err(lossy(v, DType::Int64))
    }
}

fn to_i32(v: f64) -> Result<i32, NumericError> {
    if v.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&v) {
        Ok(v as i32)
    } else {
        Err(lossy(v, DType::Int32))
    }
}

fn real_part(s: Scalar, dtype: DType) -> Result<f64, NumericError> {
    match s {
        Scalar::Real(v) => Ok(v),
        Scalar::Complex(c) if c.im == 0.0 => Ok(c.re),
        Scalar::Complex(c) => Err(lossy(c, dtype)),
    }
}

fn ensure_dimensionless(unit: &crate::unit::Unit) -> Result<(), NumericError> {
    if unit.factors().is_empty() {
        Ok(())
    } else {
        Err(NumericError::NotDimensionless(unit.to_string()))
    }
}

/// A single typed number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericScalar {
    Float64(f64),
    Float32(f32),
    Int64(i64),
    Int32(i32),
    Complex128(Complex),
}

impl NumericScalar {
    pub fn dtype(&self) -> DType {
        match self {
            Self::Float64(_) => DType::Float64,
            Self::Float32(_) => DType::Float32,
            Self::Int64(_) => DType::Int64,
            Self::Int32(_) => DType::Int32,
            Self::Complex128(_) => DType::Complex128,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.dtype().name()
    }

    fn to_scalar(self) -> Scalar {
        match self {
            Self::Float64(v) => Scalar::Real(v),
            Self::Float32(v) => Scalar::Real(v as f64),
            Self::Int64(v) => Scalar::Real(v as f64),
            Self::Int32(v) => Scalar::Real(v as f64),
            Self::Complex128(c) => Scalar::Complex(c),
        }
    }

    fn from_scalar(dtype: DType, s: Scalar) -> Result<Self, NumericError> {
        Ok(match dtype {
            DType::Float64 => Self::Float64(real_part(s, dtype)?),
            DType::Float32 => Self::Float32(real_part(s, dtype)? as f32),
            DType::Int64 => Self::Int64(to_i64(real_part(s, dtype)?)?),
            DType::Int32 => Self::Int32(to_i32(real_part(s, dtype)?)?),
            DType::Complex128 => Self::Complex128(s.as_complex()),
        })
    }

    /// Lifts into a dimensionless scalar quantity.
    pub fn lift(&self) -> Value {
        Value::dimensionless(self.to_scalar())
    }

    /// Casts a dimensionless quantity back into `dtype`.
    pub fn unlift(dtype: DType, value: &Value) -> Result<Self, NumericError> {
        ensure_dimensionless(value.unit())?;
        Self::from_scalar(dtype, value.value())
    }
}

/// A typed n-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Float64(NdArray<f64>),
    Float32(NdArray<f32>),
    Int64(NdArray<i64>),
    Int32(NdArray<i32>),
    Complex128(NdArray<Complex>),
}

impl NumericArray {
    pub fn dtype(&self) -> DType {
        match self {
            Self::Float64(_) => DType::Float64,
            Self::Float32(_) => DType::Float32,
            Self::Int64(_) => DType::Int64,
            Self::Int32(_) => DType::Int32,
            Self::Complex128(_) => DType::Complex128,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.dtype().array_class_name()
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Self::Float64(a) => a.shape(),
            Self::Float32(a) => a.shape(),
            Self::Int64(a) => a.shape(),
            Self::Int32(a) => a.shape(),
            Self::Complex128(a) => a.shape(),
        }
    }

    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lifts into a dimensionless array quantity.
    pub fn lift(&self) -> ValueArray {
        let data = match self {
            Self::Float64(a) => ArrayData::Real(a.clone()),
            Self::Float32(a) => ArrayData::Real(a.map(|&v| v as f64)),
            Self::Int64(a) => ArrayData::Real(a.map(|&v| v as f64)),
            Self::Int32(a) => ArrayData::Real(a.map(|&v| v as f64)),
            Self::Complex128(a) => ArrayData::Complex(a.clone()),
        };
        ValueArray::dimensionless(data)
    }

    /// Casts a dimensionless array quantity back into `dtype`.
    pub fn unlift(dtype: DType, array: &ValueArray) -> Result<Self, NumericError> {
        ensure_dimensionless(array.unit())?;
        let data = array.values();
        let reals = |data: &ArrayData| -> Result<NdArray<f64>, NumericError> {
            match data {
                ArrayData::Real(a) => Ok(a.clone()),
                ArrayData::Complex(a) => a.try_map(|&c| real_part(Scalar::Complex(c), dtype)),
            }
        };
        Ok(match dtype {
            DType::Float64 => Self::Float64(reals(data)?),
            DType::Float32 => Self::Float32(reals(data)?.map(|&v| v as f32)),
            DType::Int64 => Self::Int64(reals(data)?.try_map(|&v| to_i64(v))?),
            DType::Int32 => Self::Int32(reals(data)?.try_map(|&v| to_i32(v))?),
            DType::Complex128 => Self::Complex128(match data {
                ArrayData::Real(a) => a.map(|&v| Complex::from(v)),
                ArrayData::Complex(a) => a.clone(),
            }),
        })
    }
}

impl From<NdArray<f64>> for NumericArray {
    fn from(a: NdArray<f64>) -> Self {
        Self::Float64(a)
    }
}

impl From<NdArray<f32>> for NumericArray {
    fn from(a: NdArray<f32>) -> Self {
        Self::Float32(a)
    }
}

impl From<NdArray<i64>> for NumericArray {
    fn from(a: NdArray<i64>) -> Self {
        Self::Int64(a)
    }
}

impl From<NdArray<i32>> for NumericArray {
    fn from(a: NdArray<i32>) -> Self {
        Self::Int32(a)
    }
}

impl From<NdArray<Complex>> for NumericArray {
    fn from(a: NdArray<Complex>) -> Self {
        Self::Complex128(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::Unit;

    #[test]
    fn names_resolve() {
        for dtype in DType::ALL {
            assert_eq!(DType::from_name(dtype.name()), Some(dtype));
            assert_eq!(DType::from_array_class_name(dtype.array_class_name()), Some(dtype));
        }
        assert_eq!(DType::from_name("Bogus"), None);
        assert_eq!(DType::from_name("Float64Array"), None);
    }

    #[test]
    fn scalar_lift_unlift_preserves_bits() {
        let cases = [
            NumericScalar::Float64(0.1),
            NumericScalar::Float32(0.1),
            NumericScalar::Int64(-(1 << 40)),
            NumericScalar::Int32(i32::MIN),
            NumericScalar::Complex128(Complex::new(2.0, 3.0)),
        ];
        for case in cases {
            let back = NumericScalar::unlift(case.dtype(), &case.lift()).unwrap();
            assert_eq!(back, case);
        }
    }

    #[test]
    fn unlift_rejects_lossy_values() {
        let half = Value::dimensionless(1.5);
        assert!(matches!(
            NumericScalar::unlift(DType::Int64, &half),
            Err(NumericError::Lossy { dtype: "int64", .. })
        ));
        let big = Value::dimensionless(1e10);
        assert!(NumericScalar::unlift(DType::Int32, &big).is_err());
        let z = Value::dimensionless(Complex::new(1.0, 1.0));
        assert!(NumericScalar::unlift(DType::Float64, &z).is_err());
        let ghz = Value::new(1.0, Unit::parse("GHz").unwrap());
        assert!(matches!(
            NumericScalar::unlift(DType::Float64, &ghz),
            Err(NumericError::NotDimensionless(_))
        ));
    }

    #[test]
    fn array_lift_unlift() {
        let a = NumericArray::Int32(NdArray::new(vec![2, 2], vec![1, -2, 3, -4]).unwrap());
        let lifted = a.lift();
        assert_eq!(lifted.shape(), &[2, 2]);
        assert_eq!(NumericArray::unlift(DType::Int32, &lifted).unwrap(), a);
        let promoted = NumericArray::unlift(DType::Complex128, &lifted).unwrap();
        assert_eq!(promoted.dtype(), DType::Complex128);
    }
}

//! Numeric evaluation of an expression tree.
//!
//! Operands are real or complex, scalar or n-d array. Binary operations
//! broadcast a scalar over an array; two arrays must share a shape. Any
//! complex input promotes the result to complex. Real domain errors (such
//! as `sqrt(-1)` on a real operand) yield NaN, matching elementwise array
//! arithmetic.

use indexmap::IndexMap;
use measurement_config_quantity::{Complex, NdArray};

use crate::ast::{BinaryOp, Constant, Expr, Function};
use crate::error::ExpressionError;

/// A value an expression can be evaluated over or evaluate to.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Real(f64),
    Complex(Complex),
    Array(NdArray<f64>),
    ComplexArray(NdArray<Complex>),
}

impl Operand {
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_) | Self::ComplexArray(_))
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Self::Complex(_) | Self::ComplexArray(_))
    }

    pub fn shape(&self) -> Option<&[usize]> {
        match self {
            Self::Array(a) => Some(a.shape()),
            Self::ComplexArray(a) => Some(a.shape()),
            Self::Real(_) | Self::Complex(_) => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    fn real_at(&self, i: usize) -> f64 {
        match self {
            Self::Real(v) => *v,
            Self::Array(a) => a.as_slice()[i],
            Self::Complex(c) => c.re,
            Self::ComplexArray(a) => a.as_slice()[i].re,
        }
    }

    fn complex_at(&self, i: usize) -> Complex {
        match self {
            Self::Real(v) => Complex::from(*v),
            Self::Array(a) => Complex::from(a.as_slice()[i]),
            Self::Complex(c) => *c,
            Self::ComplexArray(a) => a.as_slice()[i],
        }
    }

    fn from_reals(shape: Option<Vec<usize>>, data: Vec<f64>) -> Result<Self, ExpressionError> {
        Ok(match shape {
            None => Self::Real(data.first().copied().unwrap_or(f64::NAN)),
            Some(shape) => Self::Array(NdArray::new(shape, data)?),
        })
    }

    fn from_complexes(
        shape: Option<Vec<usize>>,
        data: Vec<Complex>,
    ) -> Result<Self, ExpressionError> {
        Ok(match shape {
            None => Self::Complex(data.first().copied().unwrap_or(Complex::new(f64::NAN, 0.0))),
            Some(shape) => Self::ComplexArray(NdArray::new(shape, data)?),
        })
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Operand {
    fn from(v: i64) -> Self {
        Self::Real(v as f64)
    }
}

impl From<Complex> for Operand {
    fn from(v: Complex) -> Self {
        Self::Complex(v)
    }
}

impl From<NdArray<f64>> for Operand {
    fn from(v: NdArray<f64>) -> Self {
        Self::Array(v)
    }
}

impl From<NdArray<Complex>> for Operand {
    fn from(v: NdArray<Complex>) -> Self {
        Self::ComplexArray(v)
    }
}

impl From<Vec<f64>> for Operand {
    fn from(v: Vec<f64>) -> Self {
        Self::Array(NdArray::from_vec(v))
    }
}

/// Evaluation strategy for a compiled expression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Elementwise over scalars and arrays.
    #[default]
    Array,
    /// Scalars only; array operands are rejected.
    Scalar,
}

impl Backend {
    pub fn name(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Scalar => "scalar",
        }
    }
}

fn broadcast_shape(lhs: &Operand, rhs: &Operand) -> Result<Option<Vec<usize>>, ExpressionError> {
    match (lhs.shape(), rhs.shape()) {
        (None, None) => Ok(None),
        (Some(s), None) | (None, Some(s)) => Ok(Some(s.to_vec())),
        (Some(a), Some(b)) if a == b => Ok(Some(a.to_vec())),
        (Some(a), Some(b)) => Err(ExpressionError::Shape {
            lhs: a.to_vec(),
            rhs: b.to_vec(),
        }),
    }
}

fn element_count(shape: &Option<Vec<usize>>) -> usize {
    shape.as_ref().map_or(1, |s| s.iter().product())
}

fn binary(
    lhs: &Operand,
    rhs: &Operand,
    real: fn(f64, f64) -> f64,
    complex: fn(Complex, Complex) -> Complex,
) -> Result<Operand, ExpressionError> {
    let shape = broadcast_shape(lhs, rhs)?;
    let n = element_count(&shape);
    if lhs.is_complex() || rhs.is_complex() {
        let data = (0..n)
            .map(|i| complex(lhs.complex_at(i), rhs.complex_at(i)))
            .collect();
        Operand::from_complexes(shape, data)
    } else {
        let data = (0..n).map(|i| real(lhs.real_at(i), rhs.real_at(i))).collect();
        Operand::from_reals(shape, data)
    }
}

fn unary(
    operand: &Operand,
    real: fn(f64) -> f64,
    complex: fn(Complex) -> Complex,
) -> Result<Operand, ExpressionError> {
    Ok(match operand {
        Operand::Real(v) => Operand::Real(real(*v)),
        Operand::Complex(c) => Operand::Complex(complex(*c)),
        Operand::Array(a) => Operand::Array(a.map(|&v| real(v))),
        Operand::ComplexArray(a) => Operand::ComplexArray(a.map(|&c| complex(c))),
    })
}

fn abs(operand: &Operand) -> Operand {
    match operand {
        Operand::Real(v) => Operand::Real(v.abs()),
        Operand::Complex(c) => Operand::Real(c.norm()),
        Operand::Array(a) => Operand::Array(a.map(|v| v.abs())),
        Operand::ComplexArray(a) => Operand::Array(a.map(|c| c.norm())),
    }
}

/// `0^0 = 1` and `0^w = 0` otherwise, as elementwise array arithmetic does.
fn complex_pow(z: Complex, w: Complex) -> Complex {
    if z == Complex::new(0.0, 0.0) {
        if w == Complex::new(0.0, 0.0) {
            Complex::new(1.0, 0.0)
        } else {
            Complex::new(0.0, 0.0)
        }
    } else {
        z.powc(w)
    }
}

fn call(func: Function, arg: &Operand) -> Result<Operand, ExpressionError> {
    match func {
        Function::Sin => unary(arg, f64::sin, Complex::sin),
        Function::Cos => unary(arg, f64::cos, Complex::cos),
        Function::Tan => unary(arg, f64::tan, Complex::tan),
        Function::Asin => unary(arg, f64::asin, Complex::asin),
        Function::Acos => unary(arg, f64::acos, Complex::acos),
        Function::Atan => unary(arg, f64::atan, Complex::atan),
        Function::Sinh => unary(arg, f64::sinh, Complex::sinh),
        Function::Cosh => unary(arg, f64::cosh, Complex::cosh),
        Function::Tanh => unary(arg, f64::tanh, Complex::tanh),
        Function::Exp => unary(arg, f64::exp, Complex::exp),
        Function::Log => unary(arg, f64::ln, Complex::ln),
        Function::Sqrt => unary(arg, f64::sqrt, Complex::sqrt),
        Function::Abs => Ok(abs(arg)),
    }
}

fn constant(c: Constant) -> Operand {
    match c {
        Constant::Pi => Operand::Real(std::f64::consts::PI),
        Constant::E => Operand::Real(std::f64::consts::E),
        Constant::I => Operand::Complex(Complex::i()),
    }
}

/// Evaluates `expr` with every free symbol looked up in `env`.
pub fn evaluate(expr: &Expr, env: &IndexMap<&str, &Operand>) -> Result<Operand, ExpressionError> {
    Ok(match expr {
        Expr::Number(n) => Operand::Real(*n),
        Expr::Constant(c) => constant(*c),
        Expr::Symbol(name) => env
            .get(name.as_str())
            .map(|&op| op.clone())
            .ok_or_else(|| ExpressionError::MissingSymbol(name.clone()))?,
        Expr::Neg(inner) => unary(&evaluate(inner, env)?, |v| -v, |c| -c)?,
        Expr::Call(func, arg) => call(*func, &evaluate(arg, env)?)?,
        Expr::Binary(op, lhs, rhs) => {
            let lhs = evaluate(lhs, env)?;
            let rhs = evaluate(rhs, env)?;
            match op {
                BinaryOp::Add => binary(&lhs, &rhs, |a, b| a + b, |a, b| a + b)?,
                BinaryOp::Sub => binary(&lhs, &rhs, |a, b| a - b, |a, b| a - b)?,
                BinaryOp::Mul => binary(&lhs, &rhs, |a, b| a * b, |a, b| a * b)?,
                BinaryOp::Div => binary(&lhs, &rhs, |a, b| a / b, |a, b| a / b)?,
                BinaryOp::Pow => binary(&lhs, &rhs, f64::powf, complex_pow)?,
            }
        }
    })
}

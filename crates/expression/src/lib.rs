//! Arithmetic expressions over named scalar and array variables.
//!
//! An [`Expression`] is parsed once; its free symbols are known up front
//! and [`Expression::resolve`] evaluates it for one set of parameter
//! values.
//!
//! ```
//! use indexmap::IndexMap;
//! use measurement_config_expression::{Expression, Operand};
//!
//! let e = Expression::new("a + b").unwrap();
//! let mut params = IndexMap::new();
//! params.insert("a".to_string(), Operand::Real(1.0));
//! params.insert("b".to_string(), Operand::Real(2.0));
//! assert_eq!(e.resolve(&params).unwrap(), Operand::Real(3.0));
//! ```

mod ast;
mod error;
mod eval;
mod expression;
mod parser;

pub use ast::{Constant, Function};
pub use error::ExpressionError;
pub use eval::{Backend, Operand};
pub use expression::{Binding, Expression, SymbolTable};

//! Parsed expressions with symbol rebinding and evaluation.

use std::fmt;

use indexmap::IndexMap;

use crate::ast::Expr;
use crate::error::ExpressionError;
use crate::eval::{evaluate, Backend, Operand};
use crate::parser::Parser;

/// What a name in the source string is bound to before evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Rename to another free symbol.
    Symbol(String),
    /// Substitute a fixed number.
    Constant(f64),
}

pub type SymbolTable = IndexMap<String, Binding>;

fn bind(expr: Expr, table: &SymbolTable) -> Expr {
    match expr {
        Expr::Symbol(name) => match table.get(&name) {
            Some(Binding::Symbol(to)) => Expr::Symbol(to.clone()),
            Some(Binding::Constant(v)) => Expr::Number(*v),
            None => Expr::Symbol(name),
        },
        Expr::Neg(inner) => Expr::Neg(Box::new(bind(*inner, table))),
        Expr::Call(func, arg) => Expr::Call(func, Box::new(bind(*arg, table))),
        Expr::Binary(op, lhs, rhs) => Expr::Binary(
            op,
            Box::new(bind(*lhs, table)),
            Box::new(bind(*rhs, table)),
        ),
        other => other,
    }
}

/// A compiled arithmetic expression over named variables.
///
/// The free symbols are fixed at construction and reported in name order.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    expr: Expr,
    symbols: Vec<String>,
    backend: Backend,
}

impl Expression {
    pub fn new(string: &str) -> Result<Self, ExpressionError> {
        Self::with_options(string, None, Backend::default())
    }

    /// Parses `string`, applying `symbols` to names that appear in it.
    ///
    /// Table entries shadow the built-in constants `pi`, `E` and `I`.
    pub fn with_options(
        string: &str,
        symbols: Option<&SymbolTable>,
        backend: Backend,
    ) -> Result<Self, ExpressionError> {
        let mut expr = Parser::parse(string).map_err(|e| ExpressionError::Parse {
            input: string.to_string(),
            reason: format!("{} at offset {}", e.message, e.pos),
        })?;
        if let Some(table) = symbols {
            let shadowed = shadow_constants(expr, table);
            expr = bind(shadowed, table);
        }
        let mut names = Vec::new();
        expr.collect_symbols(&mut names);
        let mut names: Vec<String> = names.into_iter().map(str::to_string).collect();
        names.sort();
        names.dedup();
        Ok(Self {
            source: string.to_string(),
            expr,
            symbols: names,
            backend,
        })
    }

    /// Free variable names, sorted.
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Evaluates with every free symbol taken from `params`.
    ///
    /// Extra entries in `params` are ignored. The first missing symbol in
    /// name order is reported.
    pub fn resolve(&self, params: &IndexMap<String, Operand>) -> Result<Operand, ExpressionError> {
        let mut env = IndexMap::with_capacity(self.symbols.len());
        for name in &self.symbols {
            let operand = params
                .get(name)
                .ok_or_else(|| ExpressionError::MissingSymbol(name.clone()))?;
            if self.backend == Backend::Scalar && operand.is_array() {
                return Err(ExpressionError::Backend {
                    backend: self.backend.name(),
                    symbol: name.clone(),
                });
            }
            env.insert(name.as_str(), operand);
        }
        evaluate(&self.expr, &env)
    }
}

/// Turns constants whose names the table rebinds back into plain symbols.
fn shadow_constants(expr: Expr, table: &SymbolTable) -> Expr {
    match expr {
        Expr::Constant(c) if table.contains_key(c.name()) => Expr::Symbol(c.name().to_string()),
        Expr::Neg(inner) => Expr::Neg(Box::new(shadow_constants(*inner, table))),
        Expr::Call(func, arg) => Expr::Call(func, Box::new(shadow_constants(*arg, table))),
        Expr::Binary(op, lhs, rhs) => Expr::Binary(
            op,
            Box::new(shadow_constants(*lhs, table)),
            Box::new(shadow_constants(*rhs, table)),
        ),
        other => other,
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_renames_and_substitutes() {
        let mut table = SymbolTable::new();
        table.insert("amp".into(), Binding::Symbol("a".into()));
        table.insert("k".into(), Binding::Constant(2.0));
        let e = Expression::with_options("amp*k + b", Some(&table), Backend::Array).unwrap();
        assert_eq!(e.symbols(), ["a", "b"]);
        assert_eq!(e.to_string(), "a*2 + b");
    }

    #[test]
    fn table_shadows_constants() {
        let mut table = SymbolTable::new();
        table.insert("E".into(), Binding::Symbol("E".into()));
        let e = Expression::with_options("E + 1", Some(&table), Backend::Array).unwrap();
        assert_eq!(e.symbols(), ["E"]);
        assert!(Expression::new("E + 1").unwrap().symbols().is_empty());
    }

    #[test]
    fn scalar_backend_rejects_arrays() {
        let e = Expression::with_options("x + 1", None, Backend::Scalar).unwrap();
        let mut params = IndexMap::new();
        params.insert("x".to_string(), Operand::from(vec![1.0, 2.0]));
        assert_eq!(
            e.resolve(&params),
            Err(ExpressionError::Backend {
                backend: "scalar",
                symbol: "x".into()
            })
        );
        params.insert("x".to_string(), Operand::Real(1.0));
        assert_eq!(e.resolve(&params), Ok(Operand::Real(2.0)));
    }
}

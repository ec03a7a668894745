//! Recursive-descent parser for arithmetic expression strings.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := ('+' | '-') unary | power
//! power := atom ('**' unary)?
//! atom  := number | name | name '(' expr ')' | '(' expr ')'
//! ```

use crate::ast::{BinaryOp, Constant, Expr, Function};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub pos: usize,
    pub message: String,
}

type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Default)]
pub struct Parser<'a> {
    str_: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { str_: input, pos: 0 }
    }

    /// Parses the whole input as one expression.
    pub fn parse(input: &'a str) -> ParseResult<Expr> {
        let mut parser = Self::new(input);
        let expr = parser.expr()?;
        parser.ws();
        if !parser.eof() {
            return Err(parser.error(format!("unexpected `{}`", parser.peek())));
        }
        Ok(expr)
    }

    fn eof(&self) -> bool {
        self.pos >= self.str_.len()
    }

    fn peek(&self) -> char {
        self.str_[self.pos..].chars().next().unwrap_or('\0')
    }

    fn is(&self, expected: &str) -> bool {
        self.str_[self.pos..].starts_with(expected)
    }

    fn r#match(&self, predicate: fn(char) -> bool) -> usize {
        self.str_[self.pos..]
            .chars()
            .take_while(|&c| predicate(c))
            .map(char::len_utf8)
            .sum()
    }

    fn skip(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.str_.len());
    }

    fn ws(&mut self) {
        let n = self.r#match(char::is_whitespace);
        self.skip(n);
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            pos: self.pos,
            message: message.into(),
        }
    }

    fn expr(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.term()?;
        loop {
            self.ws();
            let op = if self.is("+") {
                BinaryOp::Add
            } else if self.is("-") {
                BinaryOp::Sub
            } else {
                return Ok(lhs);
            };
            self.skip(1);
            let rhs = self.term()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut lhs = self.unary()?;
        loop {
            self.ws();
            let op = if self.is("**") {
                return Ok(lhs);
            } else if self.is("*") {
                BinaryOp::Mul
            } else if self.is("/") {
                BinaryOp::Div
            } else {
                return Ok(lhs);
            };
            self.skip(1);
            let rhs = self.unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        self.ws();
        if self.is("-") {
            self.skip(1);
            return Ok(Expr::Neg(Box::new(self.unary()?)));
        }
        if self.is("+") {
            self.skip(1);
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> ParseResult<Expr> {
        let base = self.atom()?;
        self.ws();
        if self.is("**") {
            self.skip(2);
            let exponent = self.unary()?;
            return Ok(Expr::Binary(BinaryOp::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> ParseResult<Expr> {
        self.ws();
        if self.eof() {
            return Err(self.error("unexpected end of input"));
        }
        let c = self.peek();
        if c == '(' {
            self.skip(1);
            let inner = self.expr()?;
            self.ws();
            if !self.is(")") {
                return Err(self.error("expected `)`"));
            }
            self.skip(1);
            return Ok(inner);
        }
        if c.is_ascii_digit() || c == '.' {
            return self.number();
        }
        if c.is_alphabetic() || c == '_' {
            return self.name();
        }
        Err(self.error(format!("unexpected `{c}`")))
    }

    fn number(&mut self) -> ParseResult<Expr> {
        let start = self.pos;
        let int_len = self.r#match(|c| c.is_ascii_digit());
        self.skip(int_len);
        let mut digits = int_len;
        if self.is(".") {
            self.skip(1);
            let frac_len = self.r#match(|c| c.is_ascii_digit());
            self.skip(frac_len);
            digits += frac_len;
        }
        if digits == 0 {
            return Err(self.error("malformed number"));
        }
        if self.is("e") || self.is("E") {
            let mark = self.pos;
            self.skip(1);
            if self.is("+") || self.is("-") {
                self.skip(1);
            }
            let exp_len = self.r#match(|c| c.is_ascii_digit());
            if exp_len == 0 {
                // `2E` is not an exponent; leave `E` for the caller to reject.
                self.pos = mark;
            } else {
                self.skip(exp_len);
            }
        }
        let text = &self.str_[start..self.pos];
        text.parse::<f64>()
            .map(Expr::Number)
            .map_err(|e| ParseError {
                pos: start,
                message: format!("malformed number `{text}`: {e}"),
            })
    }

    fn name(&mut self) -> ParseResult<Expr> {
        let start = self.pos;
        let len = self.r#match(|c| c.is_alphanumeric() || c == '_');
        self.skip(len);
        let name = &self.str_[start..self.pos];
        self.ws();
        if self.is("(") {
            let func = Function::from_name(name).ok_or_else(|| ParseError {
                pos: start,
                message: format!("unknown function `{name}`"),
            })?;
            self.skip(1);
            let arg = self.expr()?;
            self.ws();
            if !self.is(")") {
                return Err(self.error("expected `)`"));
            }
            self.skip(1);
            return Ok(Expr::Call(func, Box::new(arg)));
        }
        Ok(match Constant::from_name(name) {
            Some(constant) => Expr::Constant(constant),
            None => Expr::Symbol(name.to_string()),
        })
    }
}

//! Normalized rational numbers used for unit exponents.

use std::fmt;
use std::ops::Neg;

/// A rational number kept in lowest terms with a positive denominator.
///
/// Both parts stay within `-i64::MAX..=i64::MAX`, so negation never
/// overflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numerator: i64,
    denominator: i64,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

fn reduce(numerator: i128, denominator: i128) -> Option<Fraction> {
    if denominator == 0 {
        return None;
    }
    let g = gcd(numerator.unsigned_abs(), denominator.unsigned_abs()).max(1);
    let g = i128::try_from(g).ok()?;
    let sign = if denominator < 0 { -1 } else { 1 };
    let numerator = i64::try_from(sign * (numerator / g)).ok()?;
    let denominator = i64::try_from(sign * (denominator / g)).ok()?;
    if numerator == i64::MIN {
        return None;
    }
    Some(Fraction {
        numerator,
        denominator,
    })
}

impl Fraction {
    pub const ZERO: Fraction = Fraction {
        numerator: 0,
        denominator: 1,
    };
    pub const ONE: Fraction = Fraction {
        numerator: 1,
        denominator: 1,
    };

    /// Returns `None` when `denominator` is zero or the reduced fraction
    /// does not fit.
    pub fn new(numerator: i64, denominator: i64) -> Option<Self> {
        reduce(numerator.into(), denominator.into())
    }

    /// Whole-number fraction. `i64::MIN` is clamped to `-i64::MAX`.
    pub const fn integer(value: i64) -> Self {
        Self {
            numerator: if value == i64::MIN { -i64::MAX } else { value },
            denominator: 1,
        }
    }

    pub fn numerator(self) -> i64 {
        self.numerator
    }

    pub fn denominator(self) -> i64 {
        self.denominator
    }

    pub fn is_zero(self) -> bool {
        self.numerator == 0
    }

    pub fn is_negative(self) -> bool {
        self.numerator < 0
    }

    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn checked_add(self, rhs: Fraction) -> Option<Fraction> {
        let (a, b) = (i128::from(self.numerator), i128::from(self.denominator));
        let (c, d) = (i128::from(rhs.numerator), i128::from(rhs.denominator));
        reduce(a.checked_mul(d)?.checked_add(c.checked_mul(b)?)?, b.checked_mul(d)?)
    }

    pub fn checked_mul(self, rhs: Fraction) -> Option<Fraction> {
        let (a, b) = (i128::from(self.numerator), i128::from(self.denominator));
        let (c, d) = (i128::from(rhs.numerator), i128::from(rhs.denominator));
        reduce(a.checked_mul(c)?, b.checked_mul(d)?)
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ONE
    }
}

impl Neg for Fraction {
    type Output = Fraction;
    fn neg(self) -> Fraction {
        Fraction {
            numerator: -self.numerator,
            denominator: self.denominator,
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "({}/{})", self.numerator, self.denominator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes() {
        let f = Fraction::new(2, -4).unwrap();
        assert_eq!((f.numerator(), f.denominator()), (-1, 2));
        assert_eq!(Fraction::new(0, 5), Some(Fraction::ZERO));
        assert_eq!(Fraction::new(1, 0), None);
    }

    #[test]
    fn arithmetic() {
        let half = Fraction::new(1, 2).unwrap();
        assert_eq!(half.checked_add(half), Some(Fraction::ONE));
        assert_eq!(half.checked_mul(Fraction::integer(4)), Some(Fraction::integer(2)));
        assert_eq!((-half).checked_add(half), Some(Fraction::ZERO));
        assert_eq!(half.to_string(), "(1/2)");
        assert_eq!(Fraction::integer(-3).to_string(), "-3");
    }

    #[test]
    fn extreme_parts_do_not_overflow() {
        assert_eq!(Fraction::new(i64::MIN, 1), None);
        assert_eq!(Fraction::new(i64::MIN, -1), None);
        let half_min = Fraction::new(i64::MIN, 2).unwrap();
        assert_eq!(half_min.numerator(), i64::MIN / 2);
        let max = Fraction::integer(i64::MAX);
        assert_eq!(max.checked_add(max), None);
        assert_eq!(max.checked_mul(Fraction::integer(2)), None);
        assert_eq!(max.checked_add(-max), Some(Fraction::ZERO));
        assert_eq!(Fraction::integer(i64::MIN), Fraction::integer(-i64::MAX));
    }
}

//! Physical dimensions as rational exponents over SI base quantities.

use std::fmt;

use crate::fraction::Fraction;

const BASE_NAMES: [&str; 6] = ["T", "L", "M", "I", "Θ", "N"];

/// Exponents over time, length, mass, current, temperature and amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension([Fraction; 6]);

impl Dimension {
    pub const NONE: Dimension = Dimension([Fraction::ZERO; 6]);
    pub const TIME: Dimension = Dimension::from_integers([1, 0, 0, 0, 0, 0]);
    pub const FREQUENCY: Dimension = Dimension::from_integers([-1, 0, 0, 0, 0, 0]);
    pub const LENGTH: Dimension = Dimension::from_integers([0, 1, 0, 0, 0, 0]);
    pub const MASS: Dimension = Dimension::from_integers([0, 0, 1, 0, 0, 0]);
    pub const CURRENT: Dimension = Dimension::from_integers([0, 0, 0, 1, 0, 0]);
    pub const TEMPERATURE: Dimension = Dimension::from_integers([0, 0, 0, 0, 1, 0]);
    pub const AMOUNT: Dimension = Dimension::from_integers([0, 0, 0, 0, 0, 1]);
    pub const POWER: Dimension = Dimension::from_integers([-3, 2, 1, 0, 0, 0]);
    pub const VOLTAGE: Dimension = Dimension::from_integers([-3, 2, 1, -1, 0, 0]);
    pub const RESISTANCE: Dimension = Dimension::from_integers([-3, 2, 1, -2, 0, 0]);

    pub const fn from_integers(exponents: [i64; 6]) -> Self {
        Dimension([
            Fraction::integer(exponents[0]),
            Fraction::integer(exponents[1]),
            Fraction::integer(exponents[2]),
            Fraction::integer(exponents[3]),
            Fraction::integer(exponents[4]),
            Fraction::integer(exponents[5]),
        ])
    }

    pub fn exponents(&self) -> &[Fraction; 6] {
        &self.0
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.iter().all(|e| e.is_zero())
    }

    /// `None` when an exponent overflows.
    pub fn checked_mul(&self, other: &Dimension) -> Option<Dimension> {
        let mut out = self.0;
        for (slot, e) in out.iter_mut().zip(other.0.iter()) {
            *slot = slot.checked_add(*e)?;
        }
        Some(Dimension(out))
    }

    pub fn checked_pow(&self, exponent: Fraction) -> Option<Dimension> {
        let mut out = self.0;
        for slot in out.iter_mut() {
            *slot = slot.checked_mul(exponent)?;
        }
        Some(Dimension(out))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            return f.write_str("1");
        }
        let mut first = true;
        for (name, e) in BASE_NAMES.iter().zip(self.0.iter()) {
            if e.is_zero() {
                continue;
            }
            if !first {
                f.write_str("*")?;
            }
            first = false;
            if *e == Fraction::ONE {
                f.write_str(name)?;
            } else {
                write!(f, "{name}^{e}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_times_frequency_is_dimensionless() {
        assert!(Dimension::TIME
            .checked_mul(&Dimension::FREQUENCY)
            .unwrap()
            .is_dimensionless());
        assert_eq!(
            Dimension::TIME.checked_pow(Fraction::integer(-1)),
            Some(Dimension::FREQUENCY)
        );
        let huge = Dimension::TIME.checked_pow(Fraction::integer(i64::MAX)).unwrap();
        assert_eq!(huge.checked_mul(&huge), None);
    }

    #[test]
    fn display() {
        assert_eq!(Dimension::NONE.to_string(), "1");
        assert_eq!(Dimension::TIME.to_string(), "T");
        assert_eq!(Dimension::VOLTAGE.to_string(), "T^-3*L^2*M*I^-1");
    }
}

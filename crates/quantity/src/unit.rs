//! Units: products of scaled base units raised to rational exponents.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;
use crate::error::QuantityError;
use crate::fraction::Fraction;

/// Base units known to the exchange record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaseUnit {
    Second,
    Hertz,
    Meter,
    Gram,
    Ampere,
    Kelvin,
    Mole,
    Volt,
    Watt,
    Ohm,
    Radian,
    Degree,
}

impl BaseUnit {
    pub const ALL: [BaseUnit; 12] = [
        BaseUnit::Second,
        BaseUnit::Hertz,
        BaseUnit::Meter,
        BaseUnit::Gram,
        BaseUnit::Ampere,
        BaseUnit::Kelvin,
        BaseUnit::Mole,
        BaseUnit::Volt,
        BaseUnit::Watt,
        BaseUnit::Ohm,
        BaseUnit::Radian,
        BaseUnit::Degree,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Hertz => "Hz",
            Self::Meter => "m",
            Self::Gram => "g",
            Self::Ampere => "A",
            Self::Kelvin => "K",
            Self::Mole => "mol",
            Self::Volt => "V",
            Self::Watt => "W",
            Self::Ohm => "Ohm",
            Self::Radian => "rad",
            Self::Degree => "deg",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        if symbol == "Ω" {
            return Some(Self::Ohm);
        }
        Self::ALL.into_iter().find(|u| u.symbol() == symbol)
    }

    pub fn dimension(self) -> Dimension {
        match self {
            Self::Second => Dimension::TIME,
            Self::Hertz => Dimension::FREQUENCY,
            Self::Meter => Dimension::LENGTH,
            Self::Gram => Dimension::MASS,
            Self::Ampere => Dimension::CURRENT,
            Self::Kelvin => Dimension::TEMPERATURE,
            Self::Mole => Dimension::AMOUNT,
            Self::Volt => Dimension::VOLTAGE,
            Self::Watt => Dimension::POWER,
            Self::Ohm => Dimension::RESISTANCE,
            Self::Radian | Self::Degree => Dimension::NONE,
        }
    }

    /// Multiplier to the coherent SI unit of the same dimension.
    pub fn si_factor(self) -> f64 {
        match self {
            Self::Gram => 1e-3,
            Self::Degree => PI / 180.0,
            _ => 1.0,
        }
    }
}

/// Decimal SI prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Scale {
    Yotta,
    Zetta,
    Exa,
    Peta,
    Tera,
    Giga,
    Mega,
    Kilo,
    Hecto,
    Decad,
    #[default]
    Unity,
    Deci,
    Centi,
    Milli,
    Micro,
    Nano,
    Pico,
    Femto,
    Atto,
    Zepto,
    Yocto,
}

impl Scale {
    pub const ALL: [Scale; 21] = [
        Scale::Yotta,
        Scale::Zetta,
        Scale::Exa,
        Scale::Peta,
        Scale::Tera,
        Scale::Giga,
        Scale::Mega,
        Scale::Kilo,
        Scale::Hecto,
        Scale::Decad,
        Scale::Unity,
        Scale::Deci,
        Scale::Centi,
        Scale::Milli,
        Scale::Micro,
        Scale::Nano,
        Scale::Pico,
        Scale::Femto,
        Scale::Atto,
        Scale::Zepto,
        Scale::Yocto,
    ];

    pub fn exponent(self) -> i32 {
        match self {
            Self::Yotta => 24,
            Self::Zetta => 21,
            Self::Exa => 18,
            Self::Peta => 15,
            Self::Tera => 12,
            Self::Giga => 9,
            Self::Mega => 6,
            Self::Kilo => 3,
            Self::Hecto => 2,
            Self::Decad => 1,
            Self::Unity => 0,
            Self::Deci => -1,
            Self::Centi => -2,
            Self::Milli => -3,
            Self::Micro => -6,
            Self::Nano => -9,
            Self::Pico => -12,
            Self::Femto => -15,
            Self::Atto => -18,
            Self::Zepto => -21,
            Self::Yocto => -24,
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Yotta => "Y",
            Self::Zetta => "Z",
            Self::Exa => "E",
            Self::Peta => "P",
            Self::Tera => "T",
            Self::Giga => "G",
            Self::Mega => "M",
            Self::Kilo => "k",
            Self::Hecto => "h",
            Self::Decad => "da",
            Self::Unity => "",
            Self::Deci => "d",
            Self::Centi => "c",
            Self::Milli => "m",
            Self::Micro => "u",
            Self::Nano => "n",
            Self::Pico => "p",
            Self::Femto => "f",
            Self::Atto => "a",
            Self::Zepto => "z",
            Self::Yocto => "y",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        if prefix == "µ" || prefix == "μ" {
            return Some(Self::Micro);
        }
        Self::ALL
            .into_iter()
            .find(|s| *s != Scale::Unity && s.prefix() == prefix)
    }

    pub fn factor(self) -> f64 {
        10f64.powi(self.exponent())
    }
}

/// One scaled base unit raised to a rational power.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnitFactor {
    pub unit: BaseUnit,
    pub scale: Scale,
    pub exponent: Fraction,
}

impl UnitFactor {
    pub fn new(unit: BaseUnit, scale: Scale) -> Self {
        Self {
            unit,
            scale,
            exponent: Fraction::ONE,
        }
    }

    fn symbol(&self) -> String {
        format!("{}{}", self.scale.prefix(), self.unit.symbol())
    }

    fn si_factor(&self) -> f64 {
        (self.scale.factor() * self.unit.si_factor()).powf(self.exponent.as_f64())
    }
}

/// An ordered product of unit factors. The empty product is dimensionless.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Unit {
    factors: Vec<UnitFactor>,
    dimension: Dimension,
}

impl Default for Unit {
    fn default() -> Self {
        Self {
            factors: Vec::new(),
            dimension: Dimension::NONE,
        }
    }
}

impl Unit {
    pub fn dimensionless() -> Self {
        Self::default()
    }

    pub fn base(unit: BaseUnit, scale: Scale) -> Self {
        Self {
            factors: vec![UnitFactor::new(unit, scale)],
            dimension: unit.dimension(),
        }
    }

    /// Builds a unit from factors, merging repeats and dropping zero exponents.
    ///
    /// Fails with [`QuantityError::ExponentOverflow`] when a merged exponent
    /// or the resulting dimension leaves the representable range.
    pub fn from_factors(
        factors: impl IntoIterator<Item = UnitFactor>,
    ) -> Result<Self, QuantityError> {
        let mut merged: Vec<UnitFactor> = Vec::new();
        for factor in factors {
            match merged
                .iter_mut()
                .find(|f| f.unit == factor.unit && f.scale == factor.scale)
            {
                Some(existing) => {
                    existing.exponent = existing
                        .exponent
                        .checked_add(factor.exponent)
                        .ok_or(QuantityError::ExponentOverflow)?
                }
                None => merged.push(factor),
            }
        }
        merged.retain(|f| !f.exponent.is_zero());
        let mut dimension = Dimension::NONE;
        for f in &merged {
            dimension = f
                .unit
                .dimension()
                .checked_pow(f.exponent)
                .and_then(|d| dimension.checked_mul(&d))
                .ok_or(QuantityError::ExponentOverflow)?;
        }
        Ok(Self {
            factors: merged,
            dimension,
        })
    }

    pub fn factors(&self) -> &[UnitFactor] {
        &self.factors
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn si_factor(&self) -> f64 {
        self.factors.iter().map(UnitFactor::si_factor).product()
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension() == other.dimension()
    }

    /// Factor `k` such that `x [self] == x * k [other]`.
    pub fn conversion_factor(&self, other: &Unit) -> Result<f64, QuantityError> {
        if !self.is_compatible(other) {
            return Err(QuantityError::Incompatible {
                from: self.to_string(),
                to: other.to_string(),
            });
        }
        Ok(self.si_factor() / other.si_factor())
    }

    pub fn mul(&self, other: &Unit) -> Result<Unit, QuantityError> {
        Unit::from_factors(self.factors.iter().chain(other.factors.iter()).copied())
    }

    pub fn div(&self, other: &Unit) -> Result<Unit, QuantityError> {
        self.mul(&other.powf(-Fraction::ONE)?)
    }

    pub fn powf(&self, exponent: Fraction) -> Result<Unit, QuantityError> {
        let factors = self
            .factors
            .iter()
            .map(|f| {
                Ok(UnitFactor {
                    exponent: f
                        .exponent
                        .checked_mul(exponent)
                        .ok_or(QuantityError::ExponentOverflow)?,
                    ..*f
                })
            })
            .collect::<Result<Vec<_>, QuantityError>>()?;
        Unit::from_factors(factors)
    }

    pub fn powi(&self, exponent: i64) -> Result<Unit, QuantityError> {
        self.powf(Fraction::new(exponent, 1).ok_or(QuantityError::ExponentOverflow)?)
    }

    /// Parses unit strings such as `"GHz"`, `"ns"`, `"V*s"`, `"Hz/V^2"` or
    /// `"Hz^(1/2)"`. The empty string is dimensionless.
    pub fn parse(input: &str) -> Result<Unit, QuantityError> {
        UnitParser::new(input).parse()
    }
}

impl std::str::FromStr for Unit {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

fn write_factor(f: &mut fmt::Formatter<'_>, factor: &UnitFactor, exponent: Fraction) -> fmt::Result {
    f.write_str(&factor.symbol())?;
    if exponent != Fraction::ONE {
        write!(f, "^{exponent}")?;
    }
    Ok(())
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let numerator: Vec<&UnitFactor> =
            self.factors.iter().filter(|x| !x.exponent.is_negative()).collect();
        if numerator.is_empty() {
            for (i, factor) in self.factors.iter().enumerate() {
                if i > 0 {
                    f.write_str("*")?;
                }
                write_factor(f, factor, factor.exponent)?;
            }
            return Ok(());
        }
        for (i, factor) in numerator.iter().enumerate() {
            if i > 0 {
                f.write_str("*")?;
            }
            write_factor(f, factor, factor.exponent)?;
        }
        for factor in self.factors.iter().filter(|x| x.exponent.is_negative()) {
            f.write_str("/")?;
            write_factor(f, factor, -factor.exponent)?;
        }
        Ok(())
    }
}

struct UnitParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> UnitParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn err(&self, reason: impl Into<String>) -> QuantityError {
        QuantityError::InvalidUnit {
            unit: self.input.to_owned(),
            reason: reason.into(),
        }
    }

    fn ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn parse(mut self) -> Result<Unit, QuantityError> {
        let mut factors = Vec::new();
        self.ws();
        if self.rest().is_empty() {
            return Ok(Unit::dimensionless());
        }
        let mut invert = false;
        loop {
            self.ws();
            if let Some(mut factor) = self.factor()? {
                if invert {
                    factor.exponent = -factor.exponent;
                }
                factors.push(factor);
            }
            self.ws();
            if self.rest().is_empty() {
                break;
            }
            if self.eat("**") {
                return Err(self.err("unexpected `**`"));
            } else if self.eat("*") {
                invert = false;
            } else if self.eat("/") {
                invert = true;
            } else {
                return Err(self.err(format!("unexpected `{}`", self.rest())));
            }
        }
        Unit::from_factors(factors).map_err(|e| self.err(e.to_string()))
    }

    /// `None` for the literal `1`.
    fn factor(&mut self) -> Result<Option<UnitFactor>, QuantityError> {
        let len = self
            .rest()
            .char_indices()
            .find(|(_, c)| !(c.is_alphabetic() || *c == 'Ω'))
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        if len == 0 {
            if self.eat("1") {
                return Ok(None);
            }
            return Err(self.err("expected a unit symbol"));
        }
        let symbol = &self.rest()[..len];
        let mut factor = resolve_symbol(symbol)
            .ok_or_else(|| self.err(format!("unknown unit symbol `{symbol}`")))?;
        self.pos += len;
        if self.eat("^") || self.eat("**") {
            factor.exponent = self.exponent()?;
        }
        Ok(Some(factor))
    }

    fn integer(&mut self) -> Result<i64, QuantityError> {
        let negative = self.eat("-");
        let digits = self
            .rest()
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(self.rest().len());
        if digits == 0 {
            return Err(self.err("expected an integer exponent"));
        }
        let value: i64 = self.rest()[..digits]
            .parse()
            .map_err(|_| self.err("exponent out of range"))?;
        self.pos += digits;
        Ok(if negative { -value } else { value })
    }

    fn exponent(&mut self) -> Result<Fraction, QuantityError> {
        if self.eat("(") {
            let numerator = self.integer()?;
            let denominator = if self.eat("/") { self.integer()? } else { 1 };
            if !self.eat(")") {
                return Err(self.err("expected `)`"));
            }
            return Fraction::new(numerator, denominator)
                .ok_or_else(|| self.err("zero denominator in exponent"));
        }
        Ok(Fraction::integer(self.integer()?))
    }
}

fn resolve_symbol(symbol: &str) -> Option<UnitFactor> {
    if let Some(unit) = BaseUnit::from_symbol(symbol) {
        return Some(UnitFactor::new(unit, Scale::Unity));
    }
    for (i, _) in symbol.char_indices().skip(1) {
        let (prefix, rest) = symbol.split_at(i);
        if let (Some(scale), Some(unit)) = (Scale::from_prefix(prefix), BaseUnit::from_symbol(rest)) {
            return Some(UnitFactor::new(unit, scale));
        }
    }
    None
}

//! Frequently used units for measurement configuration.

use crate::unit::{BaseUnit, Scale, Unit};

pub fn hz() -> Unit {
    Unit::base(BaseUnit::Hertz, Scale::Unity)
}

pub fn khz() -> Unit {
    Unit::base(BaseUnit::Hertz, Scale::Kilo)
}

pub fn mhz() -> Unit {
    Unit::base(BaseUnit::Hertz, Scale::Mega)
}

pub fn ghz() -> Unit {
    Unit::base(BaseUnit::Hertz, Scale::Giga)
}

pub fn s() -> Unit {
    Unit::base(BaseUnit::Second, Scale::Unity)
}

pub fn ms() -> Unit {
    Unit::base(BaseUnit::Second, Scale::Milli)
}

pub fn us() -> Unit {
    Unit::base(BaseUnit::Second, Scale::Micro)
}

pub fn ns() -> Unit {
    Unit::base(BaseUnit::Second, Scale::Nano)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_match_parsed_units() {
        assert_eq!(ghz(), Unit::parse("GHz").unwrap());
        assert_eq!(khz(), Unit::parse("kHz").unwrap());
        assert_eq!(us(), Unit::parse("us").unwrap());
        assert_eq!(ns().to_string(), "ns");
    }
}

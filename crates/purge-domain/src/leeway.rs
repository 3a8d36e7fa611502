//! Leeway module - tolerance for jitter in entry timestamps
//!
//! Entries produced on a schedule rarely land exactly one interval apart. A
//! leeway shortens every tier's interval so that, for example, a backup taken
//! a few minutes early still counts as a day after the previous one.

use crate::duration::{parse_numeral, DurationToken, Quantity};
use crate::PolicyError;

const DEFAULT_FRACTION: f64 = 0.01;

/// How much to shorten each tier's interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Leeway {
    /// A fixed number of seconds
    Absolute(f64),
    /// A fraction of the interval (`0.01` for `1%`)
    Fraction(f64),
}

impl Default for Leeway {
    /// One percent of the interval
    fn default() -> Self {
        Leeway::Fraction(DEFAULT_FRACTION)
    }
}

impl Leeway {
    /// Parse `<duration>`, `<number>x` or `<number>%`; empty selects the default
    ///
    /// # Examples
    ///
    /// ```
    /// use purge_domain::Leeway;
    ///
    /// assert_eq!(Leeway::parse("5%").unwrap(), Leeway::Fraction(0.05));
    /// assert_eq!(Leeway::parse("0.1x").unwrap(), Leeway::Fraction(0.1));
    /// assert_eq!(Leeway::parse("2h").unwrap(), Leeway::Absolute(7200.0));
    /// assert_eq!(Leeway::parse("").unwrap(), Leeway::default());
    /// ```
    pub fn parse(margin: &str) -> Result<Self, PolicyError> {
        let text = margin.trim();
        if text.is_empty() {
            return Ok(Self::default());
        }

        if let Some(numeral) = text.strip_suffix('%') {
            // A percentage needs its number
            if numeral.trim().is_empty() {
                return Err(PolicyError::InvalidNumber(text.to_string()));
            }
            return Ok(Leeway::Fraction(parse_numeral(numeral, text)? / 100.0));
        }

        match DurationToken::parse(text)? {
            DurationToken::Relative { factor } => Ok(Leeway::Fraction(factor)),
            DurationToken::Absolute { value, unit } => Ok(Leeway::Absolute(value * unit.seconds())),
            DurationToken::Indefinite => Err(PolicyError::InvalidLeeway(text.to_string())),
        }
    }

    /// Seconds removed from an interval of `interval_secs`
    pub fn amount(&self, interval_secs: f64) -> f64 {
        match self {
            Leeway::Absolute(secs) => *secs,
            Leeway::Fraction(fraction) => interval_secs * fraction,
        }
    }

    /// The effective interval: `interval` less the leeway, never below zero
    pub fn apply(&self, interval: Quantity) -> Quantity {
        match interval {
            Quantity::Indefinite => Quantity::Indefinite,
            Quantity::Elapsed(secs) => Quantity::Elapsed((secs - self.amount(secs)).max(0.0)),
        }
    }
}

impl std::str::FromStr for Leeway {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

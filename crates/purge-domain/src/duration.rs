//! Duration module - the value+unit atoms of the policy language
//!
//! Tokens are resolved in two phases. [`DurationToken::parse`] is purely
//! syntactic and never looks at neighbouring terms; a relative token is only
//! turned into a concrete [`Quantity`] by [`DurationToken::resolve`], once the
//! policy parser supplies the matching value from the previous tier.

use crate::PolicyError;
use std::cmp::Ordering;
use std::fmt;

/// Seconds in an hour
pub const HOUR: f64 = 3600.0;
/// Seconds in a day
pub const DAY: f64 = 24.0 * HOUR;
/// Seconds in a week
pub const WEEK: f64 = 7.0 * DAY;
/// Seconds in an average month (30.4 days)
pub const MONTH: f64 = 30.4 * DAY;
/// Seconds in a (non-leap) year
pub const YEAR: f64 = 365.0 * DAY;

const INDEFINITE_SPELLINGS: [&str; 4] = ["", "∞", "oo", "inf"];
const RELATIVE_MARKERS: [char; 3] = ['x', 'X', '*'];

/// Time unit of an absolute duration token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// `h`
    Hour,
    /// `d` (the default when no unit is given)
    Day,
    /// `w`
    Week,
    /// `m`, 30.4 days
    Month,
    /// `y`, 365 days
    Year,
}

impl Unit {
    /// Parse a unit letter (case-insensitive)
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'h' => Some(Unit::Hour),
            'd' => Some(Unit::Day),
            'w' => Some(Unit::Week),
            'm' => Some(Unit::Month),
            'y' => Some(Unit::Year),
            _ => None,
        }
    }

    /// Length of one unit in seconds
    pub fn seconds(&self) -> f64 {
        match self {
            Unit::Hour => HOUR,
            Unit::Day => DAY,
            Unit::Week => WEEK,
            Unit::Month => MONTH,
            Unit::Year => YEAR,
        }
    }

    /// The canonical unit letter
    pub fn as_char(&self) -> char {
        match self {
            Unit::Hour => 'h',
            Unit::Day => 'd',
            Unit::Week => 'w',
            Unit::Month => 'm',
            Unit::Year => 'y',
        }
    }
}

/// A resolved span of time: elapsed seconds, or indefinitely long
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quantity {
    /// A finite, non-negative number of seconds
    Elapsed(f64),
    /// Longer than any age
    Indefinite,
}

impl Quantity {
    /// A span of `secs` seconds
    pub fn from_secs(secs: f64) -> Self {
        Quantity::Elapsed(secs)
    }

    /// A span of `hours` hours
    pub fn hours(hours: f64) -> Self {
        Quantity::Elapsed(hours * HOUR)
    }

    /// A span of `days` days
    pub fn days(days: f64) -> Self {
        Quantity::Elapsed(days * DAY)
    }

    /// Seconds in this span; `f64::INFINITY` when indefinite
    pub fn as_secs(&self) -> f64 {
        match self {
            Quantity::Elapsed(secs) => *secs,
            Quantity::Indefinite => f64::INFINITY,
        }
    }

    /// Whether this span is indefinite
    pub fn is_indefinite(&self) -> bool {
        matches!(self, Quantity::Indefinite)
    }

    /// Whether this span is exactly zero
    pub fn is_zero(&self) -> bool {
        matches!(self, Quantity::Elapsed(secs) if *secs <= 0.0)
    }

    /// Multiply by `factor`; overflowing products become indefinite
    pub fn scale(self, factor: f64) -> Self {
        match self {
            Quantity::Elapsed(secs) => {
                let scaled = secs * factor;
                if scaled.is_finite() {
                    Quantity::Elapsed(scaled)
                } else {
                    Quantity::Indefinite
                }
            }
            Quantity::Indefinite => Quantity::Indefinite,
        }
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_secs().partial_cmp(&other.as_secs())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = match self {
            Quantity::Indefinite => return write!(f, "∞"),
            Quantity::Elapsed(secs) => *secs,
        };
        if secs == 0.0 {
            return write!(f, "0");
        }

        for unit in [Unit::Year, Unit::Month, Unit::Week, Unit::Day, Unit::Hour] {
            let count = secs / unit.seconds();
            if count >= 1.0 && (count - count.round()).abs() < 1e-9 {
                return write!(f, "{}{}", count.round(), unit.as_char());
            }
        }

        if secs >= DAY {
            write!(f, "{:.2}d", secs / DAY)
        } else if secs >= HOUR {
            write!(f, "{:.2}h", secs / HOUR)
        } else {
            write!(f, "{:.0}s", secs)
        }
    }
}

/// A syntactically parsed duration token, not yet resolved against context
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationToken {
    /// A number with a unit, e.g. `2w` or `1.5` (days)
    Absolute {
        /// Count of units
        value: f64,
        /// Unit, `d` when omitted
        unit: Unit,
    },
    /// One of `∞`, `oo`, `inf` or the empty token
    Indefinite,
    /// A multiplier of the matching previous value, e.g. `3x` or `2*`
    Relative {
        /// Multiplication factor, `1` when omitted
        factor: f64,
    },
}

impl DurationToken {
    /// Parse one token
    ///
    /// # Examples
    ///
    /// ```
    /// use purge_domain::duration::{DurationToken, Unit};
    ///
    /// assert_eq!(
    ///     DurationToken::parse("2w").unwrap(),
    ///     DurationToken::Absolute { value: 2.0, unit: Unit::Week }
    /// );
    /// assert_eq!(DurationToken::parse("oo").unwrap(), DurationToken::Indefinite);
    /// assert_eq!(
    ///     DurationToken::parse("3x").unwrap(),
    ///     DurationToken::Relative { factor: 3.0 }
    /// );
    /// ```
    pub fn parse(token: &str) -> Result<Self, PolicyError> {
        let text = token.trim();
        if INDEFINITE_SPELLINGS
            .iter()
            .any(|spelling| text.eq_ignore_ascii_case(spelling))
        {
            return Ok(DurationToken::Indefinite);
        }

        let Some(last) = text.chars().next_back() else {
            return Ok(DurationToken::Indefinite);
        };
        let head = &text[..text.len() - last.len_utf8()];

        if RELATIVE_MARKERS.contains(&last) {
            return Ok(DurationToken::Relative {
                factor: parse_numeral(head, text)?,
            });
        }

        if last.is_alphabetic() {
            let unit = Unit::from_char(last)
                .ok_or_else(|| PolicyError::InvalidUnit(text.to_string(), last))?;
            return Ok(DurationToken::Absolute {
                value: parse_numeral(head, text)?,
                unit,
            });
        }

        Ok(DurationToken::Absolute {
            value: parse_numeral(text, text)?,
            unit: Unit::Day,
        })
    }

    /// Whether this token is a relative marker
    pub fn is_relative(&self) -> bool {
        matches!(self, DurationToken::Relative { .. })
    }

    /// Resolve against the matching value of the previous tier
    pub fn resolve(&self, previous: Quantity) -> Quantity {
        match self {
            DurationToken::Absolute { value, unit } => Quantity::Elapsed(value * unit.seconds()),
            DurationToken::Indefinite => Quantity::Indefinite,
            DurationToken::Relative { factor } => previous.scale(*factor),
        }
    }
}

/// Parse the numeric part of a token; an empty numeral means `1`
pub(crate) fn parse_numeral(numeral: &str, token: &str) -> Result<f64, PolicyError> {
    let numeral = numeral.trim();
    if numeral.is_empty() {
        return Ok(1.0);
    }
    match numeral.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(PolicyError::InvalidNumber(token.to_string())),
    }
}

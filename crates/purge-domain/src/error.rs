//! Error types for policy and leeway parsing

use thiserror::Error;

/// Errors raised while parsing a retention policy or a leeway specification
///
/// Parsing stops at the first error, scanning terms left to right, so a
/// policy either parses completely or not at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    /// A unit letter outside `h`, `d`, `w`, `m`, `y`
    #[error("Invalid unit '{1}' in '{0}' (expected one of h, d, w, m, y)")]
    InvalidUnit(String, char),

    /// A numeral that is not a finite, non-negative number
    #[error("Invalid number in '{0}'")]
    InvalidNumber(String),

    /// A relative marker whose factor is not greater than 1
    #[error("Multipliers must be greater than 1: '{0}'")]
    InvalidMultiplier(String),

    /// A term whose age does not exceed the age of the term before it
    #[error("Policy ages must be strictly increasing: '{0}' does not follow '{1}'")]
    NonMonotonicPolicy(String, String),

    /// An age multiplier on a term other than the last (strict parsing only)
    #[error("Age multipliers must only be used in the last policy term: '{0}'")]
    MultiplierNotLast(String),

    /// A term with more than one colon
    #[error("Malformed policy term: '{0}'")]
    MalformedTerm(String),

    /// A leeway that cannot be applied to an interval
    #[error("Invalid leeway: '{0}'")]
    InvalidLeeway(String),
}

//! Error types for Janitor operations

use purge_domain::PolicyError;
use thiserror::Error;

/// Errors that can occur during Janitor operations
#[derive(Error, Debug)]
pub enum JanitorError {
    /// The policy or leeway text did not parse
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The timestamp of an entry could not be determined
    #[error("Cannot determine timestamp of '{0}': {1}")]
    Timestamp(String, String),
}

//! backup-purge CLI library.
//!
//! This library provides the core functionality for the `backup-purge`
//! command-line tool, including argument parsing, configuration management,
//! name gathering, command execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use cli::{Action, Cli};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use output::Formatter;

//! backup-purge Janitor
//!
//! Applies a retention policy to named entries on disk: reads each entry's
//! timestamp, classifies the set, and removes the purge set.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Timestamp extraction**: from file metadata or a strftime pattern over the name
//! - **Planning**: partitioning names into keep and purge with `purge-domain`
//! - **Removal**: deleting the purge set through a [`Remover`], or only logging it in dry-run mode
//! - **Metrics collection**: counting decisions per tier, removals and failures
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use purge_janitor::{current_timestamp, FsRemover, Janitor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut janitor = Janitor::default_config()?;
//! let names = vec!["/backups/2024-01-01".to_string()];
//!
//! let report = janitor.sweep(&names, current_timestamp(), &mut FsRemover);
//! for failure in &report.failures {
//!     eprintln!("{}: {}", failure.name, failure.error);
//! }
//! println!("{}", janitor.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Planning Only
//!
//! ```
//! use purge_janitor::{Janitor, JanitorConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut janitor = Janitor::new(JanitorConfig::daily_snapshots("%Y-%m-%d"))?;
//! let names = vec!["2024-01-01".to_string(), "not-a-date".to_string()];
//!
//! let plan = janitor.plan(&names, 1_800_000_000.0);
//! assert_eq!(plan.kept_names(), vec!["2024-01-01"]);
//! assert_eq!(plan.skipped.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! policy = "w,m,y"
//! leeway = "1%"
//! time_source = "pattern"
//! time_pattern = "backup-%Y%m%d-%H%M"
//! leaf_only = true
//! dry_run = false
//! strict_policy = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod remover;
mod timestamp;

pub use config::{JanitorConfig, TimeSource};
pub use error::JanitorError;
pub use janitor::{current_timestamp, Janitor, RemovalFailure, Skipped, SweepPlan, SweepReport};
pub use metrics::SweepMetrics;
pub use remover::{FsRemover, Remover};
pub use timestamp::TimestampSource;

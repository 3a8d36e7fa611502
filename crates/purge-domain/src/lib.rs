//! backup-purge Domain Layer
//!
//! This crate decides which of a set of timestamped entries to retain and
//! which to purge under an age-based retention policy. It performs no I/O:
//! callers supply entries, a reference "now" and the policy text, and get
//! back a keep/purge partition.
//!
//! ## Key Concepts
//!
//! - **Policy**: comma-separated terms such as `w,m,y`, each an age band with
//!   its own minimum spacing (`endAge[:interval]`)
//! - **Tier**: one band of a policy; the last band is always indefinite
//! - **Relative marker**: `3x` multiplies the previous term's value; on the
//!   last term it repeats the tier until every entry is covered
//! - **Leeway**: a tolerance subtracted from every interval (default `1%`)
//!
//! ## Example
//!
//! ```
//! use purge_domain::{Entry, RetentionPolicy};
//! use purge_domain::duration::DAY;
//!
//! let retention = RetentionPolicy::parse("w,m,y", "1%").unwrap();
//! let now = 1_700_000_000.0;
//! let entries: Vec<Entry<u32>> = (0..60).map(|d| Entry::new(d, now - f64::from(d) * DAY)).collect();
//!
//! let result = retention.classify(entries, now);
//! assert_eq!(result.len(), 60);
//! assert!(result.kept().count() < 60);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod duration;
pub mod error;
pub mod expand;
pub mod leeway;
pub mod policy;
pub mod retention;

// Re-exports for convenience
pub use duration::{DurationToken, Quantity, Unit};
pub use error::PolicyError;
pub use expand::{Schedule, TierExpansion};
pub use leeway::Leeway;
pub use policy::{parse_term, Policy, PolicyParser, TermContext, Tier};
pub use retention::{
    classify, Classification, Classified, Decision, Entry, RetentionPolicy, Verdict,
};

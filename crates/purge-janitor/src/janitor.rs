//! Core Janitor implementation: plan and carry out a retention sweep

use crate::{JanitorConfig, JanitorError, Remover, SweepMetrics, TimestampSource};
use purge_domain::{Classification, Entry, RetentionPolicy};
use std::collections::HashSet;
use std::time::SystemTime;

/// Current timestamp in seconds since Unix epoch
pub fn current_timestamp() -> f64 {
    crate::timestamp::system_time_secs(SystemTime::now())
}

/// A name left out of a sweep because its timestamp could not be read
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    /// The name as given
    pub name: String,
    /// Why its timestamp could not be read
    pub reason: String,
}

/// The keep/purge partition for one set of names
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Per-entry decisions, newest first
    pub classification: Classification<String>,
    /// Names that took no part in the classification
    pub skipped: Vec<Skipped>,
}

impl SweepPlan {
    /// Names to retain, newest first
    pub fn kept_names(&self) -> Vec<&str> {
        self.classification.kept().map(|e| e.id.as_str()).collect()
    }

    /// Names to remove, newest first
    pub fn purged_names(&self) -> Vec<&str> {
        self.classification.purged().map(|e| e.id.as_str()).collect()
    }
}

/// A removal that did not succeed
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalFailure {
    /// The name that could not be removed
    pub name: String,
    /// The remover's error message
    pub error: String,
}

/// Outcome of a sweep: the plan and what happened to its purge set
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// The plan the sweep acted on
    pub plan: SweepPlan,
    /// Names removed (empty in dry-run mode)
    pub removed: Vec<String>,
    /// Removals that failed
    pub failures: Vec<RemovalFailure>,
}

/// Janitor for age-based retention of named entries
///
/// Responsible for:
/// - Reading each entry's timestamp from the configured source
/// - Classifying entries against the retention policy
/// - Removing the purge set through a [`Remover`]
/// - Collecting metrics on sweeps
///
/// # Examples
///
/// ```no_run
/// use purge_janitor::{current_timestamp, FsRemover, Janitor, JanitorConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = JanitorConfig {
///     dry_run: true,
///     ..JanitorConfig::default()
/// };
/// let mut janitor = Janitor::new(config)?;
///
/// let names = vec!["/backups/a".to_string(), "/backups/b".to_string()];
/// let report = janitor.sweep(&names, current_timestamp(), &mut FsRemover);
/// println!("{}", janitor.metrics().summary());
/// # let _ = report;
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    retention: RetentionPolicy,
    source: TimestampSource,
    metrics: SweepMetrics,
}

impl Janitor {
    /// Create a Janitor, parsing the configured policy and leeway
    pub fn new(config: JanitorConfig) -> Result<Self, JanitorError> {
        let retention = config.retention()?;
        let source = config.timestamp_source()?;
        Ok(Self {
            config,
            retention,
            source,
            metrics: SweepMetrics::new(),
        })
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Result<Self, JanitorError> {
        Self::new(JanitorConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// The parsed policy and leeway
    pub fn retention(&self) -> &RetentionPolicy {
        &self.retention
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &SweepMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Read timestamps for `names`, dropping duplicates and unreadable names
    pub fn collect(&mut self, names: &[String]) -> (Vec<Entry<String>>, Vec<Skipped>) {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(names.len());
        let mut skipped = Vec::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            match self.source.timestamp(name) {
                Ok(timestamp) => entries.push(Entry::new(name.clone(), timestamp)),
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    self.metrics.record_skip();
                    skipped.push(Skipped {
                        name: name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (entries, skipped)
    }

    /// Decide which of `names` to keep, as of `now`
    pub fn plan(&mut self, names: &[String], now: f64) -> SweepPlan {
        let (entries, skipped) = self.collect(names);
        let classification = self.retention.classify(entries, now);

        for classified in classification.entries() {
            let decision = &classified.decision;
            tracing::debug!(
                "{} {} (age {:.0}s, tier {})",
                decision.verdict.as_str(),
                classified.entry.id,
                decision.age,
                decision.tier
            );
            if decision.is_keep() {
                self.metrics.record_kept(decision.tier);
            } else {
                self.metrics.record_purged(decision.tier);
            }
        }
        self.metrics.record_sweep();

        tracing::info!(
            "Planned {} entries: {} kept, {} to purge, {} skipped",
            classification.len(),
            classification.kept().count(),
            classification.purged().count(),
            skipped.len()
        );

        SweepPlan {
            classification,
            skipped,
        }
    }

    /// Plan, then remove the purge set unless in dry-run mode
    ///
    /// Removal failures are collected in the report; they do not stop the
    /// sweep.
    pub fn sweep<R: Remover>(&mut self, names: &[String], now: f64, remover: &mut R) -> SweepReport {
        let plan = self.plan(names, now);
        let mut removed = Vec::new();
        let mut failures = Vec::new();

        if self.config.dry_run {
            for name in plan.purged_names() {
                tracing::info!("DRY RUN: Would delete {}", name);
            }
            return SweepReport {
                plan,
                removed,
                failures,
            };
        }

        for name in plan.purged_names() {
            match remover.remove(name) {
                Ok(()) => {
                    tracing::info!("Removed {}", name);
                    self.metrics.record_removal();
                    removed.push(name.to_string());
                }
                Err(e) => {
                    tracing::warn!("Failed to remove {}: {}", name, e);
                    self.metrics.record_failure();
                    failures.push(RemovalFailure {
                        name: name.to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        SweepReport {
            plan,
            removed,
            failures,
        }
    }
}

//! Metrics collection for Janitor sweeps

use std::collections::BTreeMap;

/// Metrics collected across Janitor sweeps
///
/// Tiers are identified by their index in the expanded schedule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepMetrics {
    /// Entries kept per tier
    pub kept: BTreeMap<usize, usize>,

    /// Entries marked for removal per tier
    pub purged: BTreeMap<usize, usize>,

    /// Entries actually removed
    pub removed: usize,

    /// Removals that failed
    pub failed: usize,

    /// Names skipped because their timestamp could not be read
    pub skipped: usize,

    /// Plans completed
    pub sweep_count: usize,
}

impl SweepMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a kept entry
    pub fn record_kept(&mut self, tier: usize) {
        *self.kept.entry(tier).or_insert(0) += 1;
    }

    /// Record an entry marked for removal
    pub fn record_purged(&mut self, tier: usize) {
        *self.purged.entry(tier).or_insert(0) += 1;
    }

    /// Record a successful removal
    pub fn record_removal(&mut self) {
        self.removed += 1;
    }

    /// Record a failed removal
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Record a skipped name
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Record a completed plan
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Total kept across all tiers
    pub fn total_kept(&self) -> usize {
        self.kept.values().sum()
    }

    /// Total marked for removal across all tiers
    pub fn total_purged(&self) -> usize {
        self.purged.values().sum()
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Sweep Metrics Summary".to_string(),
            "=====================".to_string(),
            format!("Sweeps: {}", self.sweep_count),
            format!("Kept: {}", self.total_kept()),
            format!("Purged: {}", self.total_purged()),
            format!("Removed: {}", self.removed),
            format!("Failed: {}", self.failed),
            format!("Skipped: {}", self.skipped),
        ];

        let tiers: std::collections::BTreeSet<usize> =
            self.kept.keys().chain(self.purged.keys()).copied().collect();
        if !tiers.is_empty() {
            lines.push(String::new());
            lines.push("By tier (kept/purged):".to_string());
            for tier in tiers {
                lines.push(format!(
                    "  Tier {}: {}/{}",
                    tier,
                    self.kept.get(&tier).copied().unwrap_or(0),
                    self.purged.get(&tier).copied().unwrap_or(0)
                ));
            }
        }

        lines.join("\n")
    }
}

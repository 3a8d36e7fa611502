//! Retention module - the keep/purge partition of timestamped entries
//!
//! Entries are scanned newest first. A single `last_kept` timestamp is
//! carried across the whole scan, including across tier boundaries, so the
//! spacing enforced at the end of one band also applies to the first
//! candidate of the next.

use crate::duration::Quantity;
use crate::expand::Schedule;
use crate::leeway::Leeway;
use crate::policy::{Policy, PolicyParser};
use crate::PolicyError;
use std::collections::HashMap;
use std::hash::Hash;

/// A caller-supplied item with its timestamp (seconds since the Unix epoch)
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<K> {
    /// Opaque identifier
    pub id: K,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
}

impl<K> Entry<K> {
    /// Create an entry
    pub fn new(id: K, timestamp: f64) -> Self {
        Self { id, timestamp }
    }
}

/// Outcome for a single entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Retain the entry
    Keep,
    /// Mark the entry for removal
    Purge,
}

impl Verdict {
    /// Lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Keep => "keep",
            Verdict::Purge => "purge",
        }
    }
}

/// Verdict plus the diagnostics that led to it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Keep or purge
    pub verdict: Verdict,
    /// Index into the schedule of the tier that governed the decision
    pub tier: usize,
    /// Age of the entry in seconds (negative for future timestamps)
    pub age: f64,
}

impl Decision {
    /// Whether the entry is kept
    pub fn is_keep(&self) -> bool {
        self.verdict == Verdict::Keep
    }
}

/// An entry with its decision
#[derive(Debug, Clone, PartialEq)]
pub struct Classified<K> {
    /// The entry as supplied
    pub entry: Entry<K>,
    /// The decision reached for it
    pub decision: Decision,
}

/// The result of classifying a set of entries
///
/// Entries are held newest first, each with exactly one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<K> {
    entries: Vec<Classified<K>>,
    schedule: Schedule,
}

impl<K> Classification<K> {
    /// All entries with their decisions, newest first
    pub fn entries(&self) -> &[Classified<K>] {
        &self.entries
    }

    /// The concrete schedule the decisions were made against
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Number of classified entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were classified
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries to retain, newest first
    pub fn kept(&self) -> impl Iterator<Item = &Entry<K>> {
        self.with_verdict(Verdict::Keep)
    }

    /// Entries to remove, newest first
    pub fn purged(&self) -> impl Iterator<Item = &Entry<K>> {
        self.with_verdict(Verdict::Purge)
    }

    fn with_verdict(&self, verdict: Verdict) -> impl Iterator<Item = &Entry<K>> {
        self.entries
            .iter()
            .filter(move |classified| classified.decision.verdict == verdict)
            .map(|classified| &classified.entry)
    }

    /// Decision for the entry with the given id
    pub fn decision(&self, id: &K) -> Option<&Decision>
    where
        K: PartialEq,
    {
        self.entries
            .iter()
            .find(|classified| classified.entry.id == *id)
            .map(|classified| &classified.decision)
    }

    /// Map of id to verdict
    pub fn to_map(&self) -> HashMap<K, Verdict>
    where
        K: Eq + Hash + Clone,
    {
        self.entries
            .iter()
            .map(|classified| (classified.entry.id.clone(), classified.decision.verdict))
            .collect()
    }

    /// Consume into the classified entries, newest first
    pub fn into_entries(self) -> Vec<Classified<K>> {
        self.entries
    }
}

/// Partition `entries` into keep and purge according to `policy`
///
/// Entries dated after `now`, and entries whose timestamp is not finite, are
/// always kept and take no part in spacing.
/// An empty input yields an empty classification.
///
/// # Examples
///
/// ```
/// use purge_domain::{classify, Entry, Leeway, Policy, Verdict};
/// use purge_domain::duration::HOUR;
///
/// let policy = Policy::parse("d:0").unwrap();
/// let now = 100.0 * HOUR;
/// let entries = vec![Entry::new("a", now - HOUR), Entry::new("b", now - 2.0 * HOUR)];
///
/// let result = classify(&policy, &Leeway::default(), entries, now);
/// assert_eq!(result.to_map()["a"], Verdict::Keep);
/// assert_eq!(result.to_map()["b"], Verdict::Keep);
/// ```
pub fn classify<K>(
    policy: &Policy,
    leeway: &Leeway,
    entries: Vec<Entry<K>>,
    now: f64,
) -> Classification<K> {
    let mut entries = entries;
    // Stable: equal timestamps keep their input order
    entries.sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));

    // Future and non-finite timestamps are kept but take no part in spacing
    let in_scan = |entry: &Entry<K>| {
        let age = now - entry.timestamp;
        age.is_finite() && age >= 0.0
    };
    let oldest_index = entries.iter().rposition(in_scan);
    let oldest_age = oldest_index.map(|index| now - entries[index].timestamp);
    let schedule = policy.expand(oldest_age);
    let effective: Vec<Quantity> = schedule
        .tiers()
        .iter()
        .map(|tier| leeway.apply(tier.interval))
        .collect();

    let mut last_kept: Option<f64> = None;
    let mut classified = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let age = now - entry.timestamp;
        if !in_scan(&entry) {
            classified.push(Classified {
                entry,
                decision: Decision {
                    verdict: Verdict::Keep,
                    tier: 0,
                    age,
                },
            });
            continue;
        }

        let tier = schedule.tier_index(age);
        let keep = match effective[tier] {
            // Exactly one entry survives an indefinite interval: the oldest
            Quantity::Indefinite => Some(index) == oldest_index,
            Quantity::Elapsed(gap) if gap <= 0.0 => true,
            Quantity::Elapsed(gap) => {
                last_kept.map_or(true, |kept| kept - entry.timestamp >= gap)
            }
        };
        if keep {
            last_kept = Some(entry.timestamp);
        }

        classified.push(Classified {
            entry,
            decision: Decision {
                verdict: if keep { Verdict::Keep } else { Verdict::Purge },
                tier,
                age,
            },
        });
    }

    Classification {
        entries: classified,
        schedule,
    }
}

/// A parsed policy together with its leeway
#[derive(Debug, Clone, PartialEq)]
pub struct RetentionPolicy {
    /// The tier policy
    pub policy: Policy,
    /// The leeway applied to every interval
    pub leeway: Leeway,
}

impl RetentionPolicy {
    /// Parse a policy and a leeway with the lenient parser
    ///
    /// # Examples
    ///
    /// ```
    /// use purge_domain::RetentionPolicy;
    ///
    /// let retention = RetentionPolicy::parse("w,m,y", "1%").unwrap();
    /// assert_eq!(retention.policy.tiers().len(), 4);
    /// assert!(RetentionPolicy::parse("m,w", "").is_err());
    /// ```
    pub fn parse(policy: &str, leeway: &str) -> Result<Self, PolicyError> {
        Self::parse_with(PolicyParser::new(), policy, leeway)
    }

    /// Parse with a specific policy parser
    pub fn parse_with(
        parser: PolicyParser,
        policy: &str,
        leeway: &str,
    ) -> Result<Self, PolicyError> {
        Ok(Self {
            policy: parser.parse(policy)?,
            leeway: Leeway::parse(leeway)?,
        })
    }

    /// Classify entries against this policy
    pub fn classify<K>(&self, entries: Vec<Entry<K>>, now: f64) -> Classification<K> {
        classify(&self.policy, &self.leeway, entries, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{DAY, HOUR};

    const NOW: f64 = 1_700_000_000.0;

    /// Entries named by their age in hours
    fn aged_hours(ages: &[f64]) -> Vec<Entry<String>> {
        ages.iter()
            .map(|age| Entry::new(format!("{}h", age), NOW - age * HOUR))
            .collect()
    }

    fn kept_ids(result: &Classification<String>) -> Vec<String> {
        result.kept().map(|entry| entry.id.clone()).collect()
    }

    fn run(policy: &str, leeway: &str, entries: Vec<Entry<String>>) -> Classification<String> {
        RetentionPolicy::parse(policy, leeway)
            .unwrap()
            .classify(entries, NOW)
    }

    #[test]
    fn test_empty_input() {
        let result = run("w,m,y", "", Vec::new());
        assert!(result.is_empty());
        assert!(result.to_map().is_empty());
    }

    #[test]
    fn test_keep_only_oldest_with_indefinite_interval() {
        let result = run(":", "", aged_hours(&[1.0, 50.0, 500.0, 5.0]));
        assert_eq!(kept_ids(&result), vec!["500h"]);
        assert_eq!(result.purged().count(), 3);
    }

    #[test]
    fn test_keep_everything_with_zero_interval() {
        let result = run("∞:0", "", aged_hours(&[1.0, 1.0, 20_000.0, 0.0]));
        assert_eq!(result.kept().count(), 4);
    }

    #[test]
    fn test_zero_interval_within_a_day() {
        let result = run("d:0", "", aged_hours(&[0.5, 1.0, 1.5, 23.0, 24.0]));
        for id in ["0.5h", "1h", "1.5h", "23h", "24h"] {
            assert!(
                result.decision(&id.to_string()).unwrap().is_keep(),
                "{} should be kept",
                id
            );
        }
    }

    #[test]
    fn test_daily_spacing() {
        // Hourly entries over three days: one per day survives
        let ages: Vec<f64> = (0..72).map(f64::from).collect();
        let result = run("", "0", aged_hours(&ages));
        assert_eq!(kept_ids(&result), vec!["0h", "24h", "48h"]);
    }

    #[test]
    fn test_leeway_absorbs_jitter() {
        // Backups drift a few minutes earlier every day
        let ages = [0.0, 23.9, 47.8, 71.7];
        let strict = run("", "0", aged_hours(&ages));
        assert_eq!(kept_ids(&strict), vec!["0h", "47.8h"]);

        let lenient = run("", "1%", aged_hours(&ages));
        assert_eq!(lenient.kept().count(), 4);
    }

    #[test]
    fn test_spacing_carries_across_tier_boundary() {
        // Hourly up to a day, then daily. The entry at 25h is within a day of
        // the last kept entry (at 24h) and must go.
        let result = run("d:h", "0", aged_hours(&[0.0, 24.0, 25.0, 47.0, 48.0]));
        assert_eq!(kept_ids(&result), vec!["0h", "24h", "48h"]);
        let decision = result.decision(&"25h".to_string()).unwrap();
        assert_eq!(decision.verdict, Verdict::Purge);
        assert_eq!(decision.tier, 1);
    }

    #[test]
    fn test_boundary_age_belongs_to_younger_tier() {
        let result = run("d:0,w", "0", aged_hours(&[24.0, 24.5]));
        assert_eq!(result.decision(&"24h".to_string()).unwrap().tier, 0);
        assert_eq!(result.decision(&"24.5h".to_string()).unwrap().tier, 1);
    }

    #[test]
    fn test_entries_beyond_last_age_use_closing_tier() {
        // "d" alone closes with a daily tier; a 10-day-old entry is governed by it
        let result = run("d:0", "0", aged_hours(&[1.0, 240.0]));
        let decision = result.decision(&"240h".to_string()).unwrap();
        assert_eq!(decision.tier, 1);
        assert!(decision.is_keep());
    }

    #[test]
    fn test_future_entries_are_kept() {
        let entries = vec![
            Entry::new("future".to_string(), NOW + HOUR),
            Entry::new("old".to_string(), NOW - 10.0 * DAY),
        ];
        let result = run(":", "", entries);
        assert_eq!(result.kept().count(), 2);
        let future = result.decision(&"future".to_string()).unwrap();
        assert!(future.age < 0.0);
        assert_eq!(future.tier, 0);
    }

    #[test]
    fn test_non_finite_timestamps_do_not_disturb_spacing() {
        let mut entries = aged_hours(&(0..10).map(|d| f64::from(d) * 24.0).collect::<Vec<_>>());
        entries.push(Entry::new("nan".to_string(), f64::NAN));
        entries.push(Entry::new("-inf".to_string(), f64::NEG_INFINITY));
        entries.push(Entry::new("inf".to_string(), f64::INFINITY));

        let result = run("", "0", entries);
        assert_eq!(result.len(), 13);
        for id in ["nan", "-inf", "inf"] {
            let decision = result.decision(&id.to_string()).unwrap();
            assert!(decision.is_keep(), "{} should be kept", id);
            assert_eq!(decision.tier, 0);
        }
        // Daily entries still keep one per day, newest included
        for day in 0..10 {
            assert!(result.decision(&format!("{}h", day * 24)).unwrap().is_keep());
        }
        assert_eq!(result.schedule().len(), 1);
    }

    #[test]
    fn test_non_finite_timestamp_does_not_claim_oldest_slot() {
        let mut entries = aged_hours(&[1.0, 50.0, 500.0]);
        entries.push(Entry::new("ancient".to_string(), f64::NEG_INFINITY));

        let result = run(":", "", entries);
        let kept = kept_ids(&result);
        assert!(kept.contains(&"500h".to_string()));
        assert!(kept.contains(&"ancient".to_string()));
        assert_eq!(result.purged().count(), 2);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let entries = vec![
            Entry::new("first".to_string(), NOW - DAY),
            Entry::new("second".to_string(), NOW - DAY),
        ];
        let result = run("", "0", entries);
        assert_eq!(kept_ids(&result), vec!["first"]);
        assert_eq!(result.entries()[1].entry.id, "second");
    }

    #[test]
    fn test_repeating_policy_classification() {
        // Daily entries for 40 days under "3x": bands 3d, 9d, 27d, then 27d spacing.
        // After the 3 day entry nothing is far enough apart until day 30.
        let ages: Vec<f64> = (0..40).map(|d| f64::from(d) * 24.0).collect();
        let result = run("3x", "0", aged_hours(&ages));
        assert_eq!(result.schedule().len(), 4);
        assert_eq!(kept_ids(&result), vec!["0h", "72h", "720h"]);
    }

    #[test]
    fn test_weekly_monthly_yearly_keeps_newest() {
        let ages: Vec<f64> = (0..800).map(|d| f64::from(d) * 24.0).collect();
        let result = run("w,m,y", "", aged_hours(&ages));
        let kept = kept_ids(&result);
        assert_eq!(kept[0], "0h");
        assert!(kept.len() < 100);
        // Daily retention within the first week
        for day in 0..7 {
            assert!(kept.contains(&format!("{}h", day * 24)));
        }
    }

    #[test]
    fn test_classification_is_idempotent() {
        let ages: Vec<f64> = (0..200).map(|h| f64::from(h) * 7.3).collect();
        let first = run("2d:h,2w,3x", "", aged_hours(&ages));
        let second = run("2d:h,2w,3x", "", aged_hours(&ages));
        assert_eq!(first, second);
    }

    #[test]
    fn test_to_map_covers_every_entry() {
        let result = run("w,m", "", aged_hours(&[1.0, 2.0, 300.0, 3000.0]));
        let map = result.to_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map["1h"], Verdict::Keep);
    }
}

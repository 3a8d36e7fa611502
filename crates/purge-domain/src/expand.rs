//! Expansion of repeating policies into a concrete tier schedule

use crate::duration::Quantity;
use crate::policy::{Policy, Repetition, Tier};

/// Lazy, unbounded sequence of tiers generated from a repeating template
///
/// Each step multiplies the end age by the age factor and the interval by the
/// interval factor. Callers bound the sequence themselves, usually with
/// `take_while`; end ages that overflow become indefinite.
#[derive(Debug, Clone)]
pub struct TierExpansion {
    end_age: Quantity,
    interval: Quantity,
    repetition: Repetition,
}

impl TierExpansion {
    /// Start from the template tier itself
    pub fn new(template: &Tier, repetition: Repetition) -> Self {
        Self {
            end_age: template.end_age,
            interval: template.interval,
            repetition,
        }
    }
}

impl Iterator for TierExpansion {
    type Item = Tier;

    fn next(&mut self) -> Option<Tier> {
        let tier = Tier::new(self.end_age, self.interval);
        self.end_age = self.end_age.scale(self.repetition.age_factor);
        self.interval = self.interval.scale(self.repetition.interval_factor);
        Some(tier)
    }
}

/// Concrete tiers with strictly increasing end ages, closed by an
/// indefinite tier
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    tiers: Vec<Tier>,
}

impl Schedule {
    /// The tiers in ascending end-age order
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Number of tiers
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false for a schedule built from a policy
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Index of the tier whose band contains `age` (in seconds)
    ///
    /// An age equal to a tier's end age belongs to that tier.
    pub fn tier_index(&self, age: f64) -> usize {
        self.tiers
            .iter()
            .position(|tier| age <= tier.end_age.as_secs())
            .unwrap_or(self.tiers.len().saturating_sub(1))
    }
}

impl Policy {
    /// The lazy tier sequence of a repeating policy
    pub fn expansion(&self) -> Option<TierExpansion> {
        let template = self.tiers().last()?;
        self.repetition()
            .map(|repetition| TierExpansion::new(template, *repetition))
    }

    /// Resolve this policy into a concrete schedule covering `oldest_age`
    ///
    /// A repeating template is expanded while the generated end ages stay
    /// below `oldest_age` (seconds); the first generated tier that would
    /// reach it is replaced by the closing indefinite tier. Without an oldest
    /// age nothing is generated and only the closing tier follows the fixed
    /// tiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use purge_domain::Policy;
    /// use purge_domain::duration::{Quantity, DAY};
    ///
    /// let schedule = Policy::parse("3x").unwrap().expand(Some(40.0 * DAY));
    /// let ends: Vec<Quantity> = schedule.tiers().iter().map(|t| t.end_age).collect();
    /// assert_eq!(
    ///     ends,
    ///     vec![Quantity::days(3.0), Quantity::days(9.0), Quantity::days(27.0), Quantity::Indefinite]
    /// );
    /// ```
    pub fn expand(&self, oldest_age: Option<f64>) -> Schedule {
        let (Some(expansion), Some(repetition)) = (self.expansion(), self.repetition()) else {
            return Schedule {
                tiers: self.tiers().to_vec(),
            };
        };

        let fixed = &self.tiers()[..self.tiers().len() - 1];
        let mut tiers = fixed.to_vec();
        let mut previous_end_age = repetition.seed.end_age;

        if let Some(oldest_age) = oldest_age {
            for tier in expansion.take_while(|tier| tier.end_age.as_secs() < oldest_age) {
                previous_end_age = tier.end_age;
                tiers.push(tier);
            }
        }

        tiers.push(Tier::closing(previous_end_age));
        Schedule { tiers }
    }
}

//! Policy module - tiers and the comma-separated policy language
//!
//! A policy is a list of terms such as `w,m,y` or `2d:h,2w,3x`. Each term
//! names the oldest age its tier governs and, after an optional colon, the
//! minimum spacing kept between entries of that age. Omitted values are
//! inherited from the previous term, which is threaded explicitly through
//! [`parse_term`] as a [`TermContext`].

use crate::duration::{DurationToken, Quantity};
use crate::PolicyError;

/// One age band of a policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tier {
    /// Inclusive upper bound of the ages this tier governs
    pub end_age: Quantity,
    /// Minimum spacing between retained entries inside the band
    pub interval: Quantity,
    /// Whether this tier is a multiplier template to be expanded
    pub repeats: bool,
}

impl Tier {
    /// A concrete (non-repeating) tier
    pub fn new(end_age: Quantity, interval: Quantity) -> Self {
        Self {
            end_age,
            interval,
            repeats: false,
        }
    }

    /// The indefinite tier closing a policy, as an empty trailing term would
    pub fn closing(previous_end_age: Quantity) -> Self {
        Self::new(Quantity::Indefinite, previous_end_age)
    }
}

/// Resolved values of the previous term, inherited by the next one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TermContext {
    /// End age of the previous tier
    pub end_age: Quantity,
    /// Interval of the previous tier
    pub interval: Quantity,
}

impl TermContext {
    /// The implicit `1d:1d` term that precedes the first real term
    pub fn seed() -> Self {
        Self {
            end_age: Quantity::days(1.0),
            interval: Quantity::days(1.0),
        }
    }
}

impl Default for TermContext {
    fn default() -> Self {
        Self::seed()
    }
}

impl From<&Tier> for TermContext {
    fn from(tier: &Tier) -> Self {
        Self {
            end_age: tier.end_age,
            interval: tier.interval,
        }
    }
}

/// Growth factors of a repeating tier, with the context it was parsed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repetition {
    /// Factor applied to the end age at each step
    pub age_factor: f64,
    /// Factor applied to the interval at each step
    pub interval_factor: f64,
    /// The tier values preceding the repeating term
    pub seed: TermContext,
}

/// Result of parsing one term
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedTerm {
    /// The resolved tier
    pub tier: Tier,
    /// Present when the end age used a relative marker
    pub repetition: Option<Repetition>,
}

/// Parse one policy term against the previous term's values
///
/// Returns the parsed term together with the context for the next term.
///
/// # Examples
///
/// ```
/// use purge_domain::duration::Quantity;
/// use purge_domain::policy::{parse_term, TermContext};
///
/// let (parsed, next) = parse_term("w", TermContext::seed()).unwrap();
/// assert_eq!(parsed.tier.end_age, Quantity::days(7.0));
/// assert_eq!(parsed.tier.interval, Quantity::days(1.0));
///
/// let (parsed, _) = parse_term("m", next).unwrap();
/// assert_eq!(parsed.tier.interval, Quantity::days(7.0));
/// ```
pub fn parse_term(
    term: &str,
    previous: TermContext,
) -> Result<(ParsedTerm, TermContext), PolicyError> {
    let mut parts = term.split(':');
    let age_text = parts.next().unwrap_or_default();
    let interval_text = parts.next();
    if parts.next().is_some() {
        return Err(PolicyError::MalformedTerm(term.trim().to_string()));
    }

    let age_token = DurationToken::parse(age_text)?;
    let age_factor = relative_factor(&age_token, age_text)?;
    let end_age = age_token.resolve(previous.end_age);

    let (interval, interval_factor) = match interval_text {
        Some(text) => {
            let token = DurationToken::parse(text)?;
            let factor = relative_factor(&token, text)?;
            (token.resolve(previous.interval), factor)
        }
        // The age multiplier carries over to the interval
        None => match age_factor {
            Some(factor) => (previous.interval.scale(factor), None),
            None => (previous.end_age, None),
        },
    };

    let tier = Tier {
        end_age,
        interval,
        repeats: age_factor.is_some(),
    };
    let repetition = age_factor.map(|age_factor| Repetition {
        age_factor,
        interval_factor: interval_factor.unwrap_or(age_factor),
        seed: previous,
    });

    Ok((ParsedTerm { tier, repetition }, TermContext::from(&tier)))
}

/// Factor of a relative token, rejecting factors that would not grow
fn relative_factor(token: &DurationToken, text: &str) -> Result<Option<f64>, PolicyError> {
    match token {
        DurationToken::Relative { factor } if *factor <= 1.0 => {
            Err(PolicyError::InvalidMultiplier(text.trim().to_string()))
        }
        DurationToken::Relative { factor } => Ok(Some(*factor)),
        _ => Ok(None),
    }
}

/// Parser for complete policy strings
///
/// The default parser resolves an age multiplier on a non-final term as a
/// one-off relative value. The strict parser rejects it instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyParser {
    strict: bool,
}

impl PolicyParser {
    /// Create a lenient parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that only accepts age multipliers on the last term
    pub fn strict() -> Self {
        Self { strict: true }
    }

    /// Parse a comma-separated policy
    pub fn parse(&self, policy: &str) -> Result<Policy, PolicyError> {
        let terms: Vec<&str> = policy.split(',').collect();
        let last = terms.len() - 1;

        let mut context = TermContext::seed();
        let mut tiers: Vec<Tier> = Vec::with_capacity(terms.len() + 1);
        let mut repetition = None;
        let mut previous_term = "";

        for (index, &term) in terms.iter().enumerate() {
            let (mut parsed, next) = parse_term(term, context)?;

            if parsed.tier.repeats && index != last {
                if self.strict {
                    return Err(PolicyError::MultiplierNotLast(term.trim().to_string()));
                }
                parsed.tier.repeats = false;
                parsed.repetition = None;
            }

            if let Some(previous) = tiers.last() {
                if parsed.tier.end_age <= previous.end_age {
                    return Err(PolicyError::NonMonotonicPolicy(
                        term.trim().to_string(),
                        previous_term.trim().to_string(),
                    ));
                }
            }

            repetition = parsed.repetition;
            tiers.push(parsed.tier);
            context = next;
            previous_term = term;
        }

        let closing = tiers
            .last()
            .filter(|tier| !tier.repeats && !tier.end_age.is_indefinite())
            .map(|tier| Tier::closing(tier.end_age));
        tiers.extend(closing);

        Ok(Policy { tiers, repetition })
    }
}

/// A parsed retention policy
///
/// Unless it repeats, the last tier always has an indefinite end age. A
/// repeating policy ends in a template tier; see [`Policy::expand`].
#[derive(Debug, Clone, PartialEq)]
pub struct Policy {
    tiers: Vec<Tier>,
    repetition: Option<Repetition>,
}

impl Policy {
    /// Parse a policy with the lenient parser
    ///
    /// # Examples
    ///
    /// ```
    /// use purge_domain::Policy;
    /// use purge_domain::duration::Quantity;
    ///
    /// let policy = Policy::parse("").unwrap();
    /// assert_eq!(policy.tiers().len(), 1);
    /// assert_eq!(policy.tiers()[0].end_age, Quantity::Indefinite);
    /// assert_eq!(policy.tiers()[0].interval, Quantity::days(1.0));
    /// ```
    pub fn parse(policy: &str) -> Result<Self, PolicyError> {
        PolicyParser::new().parse(policy)
    }

    /// Tiers as parsed, including a trailing template if the policy repeats
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Whether the last tier is a repeating template
    pub fn repeats(&self) -> bool {
        self.repetition.is_some()
    }

    /// Growth factors of the repeating template, if any
    pub fn repetition(&self) -> Option<&Repetition> {
        self.repetition.as_ref()
    }
}

impl std::str::FromStr for Policy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_term() -> impl Strategy<Value = String> {
        let age = prop_oneof![
            Just(String::new()),
            (1u32..100, prop::sample::select(vec!["h", "d", "w", "m", "y", ""]))
                .prop_map(|(n, unit)| format!("{}{}", n, unit)),
            (2u32..5).prop_map(|n| format!("{}x", n)),
        ];
        let interval = prop_oneof![
            Just(None),
            Just(Some(String::new())),
            (0u32..10, prop::sample::select(vec!["h", "d", "w"]))
                .prop_map(|(n, unit)| Some(format!("{}{}", n, unit))),
        ];
        (age, interval).prop_map(|(age, interval)| match interval {
            Some(interval) => format!("{}:{}", age, interval),
            None => age,
        })
    }

    proptest! {
        /// Property: every accepted policy has strictly increasing end ages
        #[test]
        fn test_parsed_ages_increase(terms in prop::collection::vec(arb_term(), 1..6)) {
            let text = terms.join(",");
            if let Ok(policy) = Policy::parse(&text) {
                for pair in policy.tiers().windows(2) {
                    prop_assert!(pair[0].end_age < pair[1].end_age, "policy {:?}", text);
                }
                let indefinite = policy.tiers().iter().filter(|t| t.end_age.is_indefinite()).count();
                if policy.repeats() {
                    prop_assert_eq!(indefinite, 0);
                } else {
                    prop_assert_eq!(indefinite, 1);
                    prop_assert!(policy.tiers().last().unwrap().end_age.is_indefinite());
                }
            }
        }

        /// Property: only the last tier may repeat
        #[test]
        fn test_only_last_repeats(terms in prop::collection::vec(arb_term(), 1..6)) {
            if let Ok(policy) = Policy::parse(&terms.join(",")) {
                let (last, rest) = policy.tiers().split_last().unwrap();
                prop_assert!(rest.iter().all(|t| !t.repeats));
                prop_assert_eq!(last.repeats, policy.repeats());
            }
        }
    }
}

//! Configuration for Janitor operations
//!
//! Holds the retention policy text, where entry timestamps come from, and
//! the operational mode of a sweep.

use crate::timestamp::TimestampSource;
use crate::JanitorError;
use purge_domain::{PolicyParser, RetentionPolicy};
use serde::{Deserialize, Serialize};

/// Where an entry's timestamp is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSource {
    /// Inode change time
    #[default]
    Created,
    /// Last modification time
    Modified,
    /// Last access time
    Accessed,
    /// Parsed from the entry's name with `time_pattern`
    Pattern,
}

/// Configuration for the Janitor
///
/// # Examples
///
/// ```
/// use purge_janitor::{JanitorConfig, TimeSource};
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.policy, "w,m,y");
/// assert_eq!(config.time_source, TimeSource::Created);
/// assert!(config.validate().is_ok());
///
/// let config = JanitorConfig::daily_snapshots("snap-%Y-%m-%d");
/// assert_eq!(config.time_source, TimeSource::Pattern);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Retention policy, e.g. `w,m,y`
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Tolerance subtracted from every interval
    #[serde(default = "default_leeway")]
    pub leeway: String,

    /// Timestamp source for entries
    #[serde(default)]
    pub time_source: TimeSource,

    /// strftime pattern, required for [`TimeSource::Pattern`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_pattern: Option<String>,

    /// Match the pattern against the final path component only
    #[serde(default)]
    pub leaf_only: bool,

    /// Dry-run mode: log what would be removed without removing it
    #[serde(default)]
    pub dry_run: bool,

    /// Reject relative terms anywhere but last
    #[serde(default)]
    pub strict_policy: bool,
}

fn default_policy() -> String {
    "w,m,y".to_string()
}

fn default_leeway() -> String {
    "1%".to_string()
}

impl Default for JanitorConfig {
    /// Daily for a week, weekly for a month, monthly for a year, yearly after
    fn default() -> Self {
        Self {
            policy: default_policy(),
            leeway: default_leeway(),
            time_source: TimeSource::default(),
            time_pattern: None,
            leaf_only: false,
            dry_run: false,
            strict_policy: false,
        }
    }
}

impl JanitorConfig {
    /// Keep one entry per day forever, dated by a name pattern
    ///
    /// Suitable for snapshot directories such as `snap-2024-05-01`.
    pub fn daily_snapshots(pattern: &str) -> Self {
        Self {
            policy: String::new(),
            time_source: TimeSource::Pattern,
            time_pattern: Some(pattern.to_string()),
            leaf_only: true,
            ..Self::default()
        }
    }

    /// Parse the policy and leeway
    pub fn retention(&self) -> Result<RetentionPolicy, JanitorError> {
        let parser = if self.strict_policy {
            PolicyParser::strict()
        } else {
            PolicyParser::new()
        };
        Ok(RetentionPolicy::parse_with(parser, &self.policy, &self.leeway)?)
    }

    /// The timestamp source described by this configuration
    pub fn timestamp_source(&self) -> Result<TimestampSource, JanitorError> {
        match self.time_source {
            TimeSource::Created => Ok(TimestampSource::Created),
            TimeSource::Modified => Ok(TimestampSource::Modified),
            TimeSource::Accessed => Ok(TimestampSource::Accessed),
            TimeSource::Pattern => match self.time_pattern.as_deref() {
                Some(format) if !format.is_empty() => Ok(TimestampSource::Pattern {
                    format: format.to_string(),
                    leaf_only: self.leaf_only,
                }),
                _ => Err(JanitorError::Config(
                    "time_source = \"pattern\" requires a time_pattern".to_string(),
                )),
            },
        }
    }

    /// Check that the configuration can drive a sweep
    pub fn validate(&self) -> Result<(), JanitorError> {
        self.retention()?;
        self.timestamp_source()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purge_domain::PolicyError;

    #[test]
    fn test_default_config() {
        let config = JanitorConfig::default();
        assert_eq!(config.policy, "w,m,y");
        assert_eq!(config.leeway, "1%");
        assert_eq!(config.time_source, TimeSource::Created);
        assert!(config.time_pattern.is_none());
        assert!(!config.leaf_only);
        assert!(!config.dry_run);
        assert!(!config.strict_policy);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_daily_snapshots_config() {
        let config = JanitorConfig::daily_snapshots("%Y%m%d");
        assert!(config.leaf_only);
        assert_eq!(
            config.timestamp_source().unwrap(),
            TimestampSource::Pattern {
                format: "%Y%m%d".to_string(),
                leaf_only: true
            }
        );
        assert_eq!(config.retention().unwrap().policy.tiers().len(), 1);
    }

    #[test]
    fn test_pattern_source_requires_pattern() {
        let config = JanitorConfig {
            time_source: TimeSource::Pattern,
            ..JanitorConfig::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let config = JanitorConfig {
            policy: "m,w".to_string(),
            ..JanitorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(JanitorError::Policy(PolicyError::NonMonotonicPolicy(_, _)))
        ));
    }

    #[test]
    fn test_strict_policy_rejects_inner_multiplier() {
        let lenient = JanitorConfig {
            policy: "d,2x,y".to_string(),
            ..JanitorConfig::default()
        };
        assert!(lenient.validate().is_ok());

        let strict = JanitorConfig {
            strict_policy: true,
            ..lenient
        };
        assert!(matches!(
            strict.validate(),
            Err(JanitorError::Policy(PolicyError::MultiplierNotLast(_)))
        ));
    }

    #[test]
    fn test_toml_defaults_fill_missing_fields() {
        let config: JanitorConfig = toml::from_str(
            r#"
            policy = "2d:h,2w,3x"
            time_source = "modified"
            "#,
        )
        .unwrap();
        assert_eq!(config.policy, "2d:h,2w,3x");
        assert_eq!(config.leeway, "1%");
        assert_eq!(config.time_source, TimeSource::Modified);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = JanitorConfig::daily_snapshots("backup-%Y-%m-%dT%H%M");
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: JanitorConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }
}

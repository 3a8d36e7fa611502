//! Timestamp extraction for named entries

use crate::JanitorError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::fs::{self, Metadata};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// How a name is turned into seconds since the Unix epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampSource {
    /// Inode change time
    Created,
    /// Last modification time
    Modified,
    /// Last access time
    Accessed,
    /// Parse the name with a strftime pattern in local time
    Pattern {
        /// The strftime pattern, e.g. `backup-%Y-%m-%d`
        format: String,
        /// Match against the final path component only
        leaf_only: bool,
    },
}

impl TimestampSource {
    /// Timestamp of `name`, in seconds since the Unix epoch
    pub fn timestamp(&self, name: &str) -> Result<f64, JanitorError> {
        match self {
            TimestampSource::Created => metadata(name).and_then(|m| change_time(name, &m)),
            TimestampSource::Modified => {
                let meta = metadata(name)?;
                meta.modified()
                    .map(system_time_secs)
                    .map_err(|e| timestamp_error(name, e))
            }
            TimestampSource::Accessed => {
                let meta = metadata(name)?;
                meta.accessed()
                    .map(system_time_secs)
                    .map_err(|e| timestamp_error(name, e))
            }
            TimestampSource::Pattern { format, leaf_only } => {
                let text = if *leaf_only { leaf(name) } else { name };
                parse_local(text, format)
                    .map(local_secs)
                    .ok_or_else(|| {
                        JanitorError::Timestamp(
                            name.to_string(),
                            format!("does not match pattern '{}'", format),
                        )
                    })
            }
        }
    }
}

fn metadata(name: &str) -> Result<Metadata, JanitorError> {
    fs::metadata(name).map_err(|e| timestamp_error(name, e))
}

fn timestamp_error(name: &str, error: std::io::Error) -> JanitorError {
    JanitorError::Timestamp(name.to_string(), error.to_string())
}

#[cfg(unix)]
fn change_time(_name: &str, meta: &Metadata) -> Result<f64, JanitorError> {
    use std::os::unix::fs::MetadataExt;
    Ok(meta.ctime() as f64 + meta.ctime_nsec() as f64 / 1e9)
}

#[cfg(not(unix))]
fn change_time(name: &str, meta: &Metadata) -> Result<f64, JanitorError> {
    meta.created()
        .map(system_time_secs)
        .map_err(|e| timestamp_error(name, e))
}

/// Seconds since the epoch, negative before it
pub(crate) fn system_time_secs(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => elapsed.as_secs_f64(),
        Err(before) => -before.duration().as_secs_f64(),
    }
}

/// Final path component, or the whole name when there is none
fn leaf(name: &str) -> &str {
    Path::new(name.trim_end_matches('/'))
        .file_name()
        .and_then(|leaf| leaf.to_str())
        .unwrap_or(name)
}

/// Full match of `text` against `format`; date-only formats give midnight
fn parse_local(text: &str, format: &str) -> Option<DateTime<Local>> {
    let naive = match NaiveDateTime::parse_from_str(text, format) {
        Ok(naive) => naive,
        Err(_) => NaiveDate::parse_from_str(text, format)
            .ok()?
            .and_hms_opt(0, 0, 0)?,
    };
    // Ambiguous local times (DST fall-back) resolve to the earlier instant
    Local.from_local_datetime(&naive).earliest()
}

fn local_secs(time: DateTime<Local>) -> f64 {
    time.timestamp() as f64 + f64::from(time.timestamp_subsec_nanos()) / 1e9
}

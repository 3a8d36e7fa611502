//! Explain command implementation.

use crate::error::Result;
use crate::output::Formatter;
use purge_janitor::JanitorConfig;
use std::io::Write;

/// Print the tiers the configured policy resolves to.
pub fn execute_explain<W: Write>(
    config: &JanitorConfig,
    formatter: &Formatter,
    out: &mut W,
) -> Result<()> {
    let retention = config.retention()?;
    writeln!(out, "{}", formatter.format_schedule(&retention)?)?;
    Ok(())
}

//! Purge command implementation: list or remove according to the policy.

use crate::cli::Action;
use crate::config::OutputFormat;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use purge_domain::Verdict;
use purge_janitor::{FsRemover, Janitor, JanitorConfig};
use std::io::Write;

/// Execute a sweep over `names` as of `now`.
///
/// Listing actions print names to `out`. Removal prints nothing in plain
/// format, and reports failures to `err` unless `no_errs` is set.
#[allow(clippy::too_many_arguments)]
pub fn execute_purge<W: Write, E: Write>(
    names: &[String],
    config: JanitorConfig,
    action: Action,
    no_errs: bool,
    now: f64,
    formatter: &Formatter,
    out: &mut W,
    err: &mut E,
) -> Result<()> {
    let mut janitor = Janitor::new(config)?;

    match action {
        Action::ListPurged | Action::ListKept => {
            let show = if action == Action::ListKept {
                Verdict::Keep
            } else {
                Verdict::Purge
            };
            let plan = janitor.plan(names, now);
            write_output(out, &formatter.format_plan(&plan, show)?)?;
        }
        Action::Remove => {
            let report = janitor.sweep(names, now, &mut FsRemover);
            if formatter.format() != OutputFormat::Plain {
                write_output(out, &formatter.format_plan(&report.plan, Verdict::Purge)?)?;
            }
            tracing::debug!("{}", janitor.metrics().summary());

            if janitor.config().dry_run {
                writeln!(
                    err,
                    "{}",
                    formatter.warning("Dry run: nothing was removed")
                )?;
            }
            if !report.failures.is_empty() && !no_errs {
                writeln!(err, "{}", formatter.failures(&report.failures))?;
                return Err(CliError::RemovalFailed(report.failures.len()));
            }
        }
    }

    Ok(())
}

fn write_output<W: Write>(out: &mut W, text: &str) -> Result<()> {
    if !text.is_empty() {
        writeln!(out, "{}", text)?;
    }
    Ok(())
}

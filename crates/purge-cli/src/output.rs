//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use purge_domain::{Quantity, RetentionPolicy, Verdict};
use purge_janitor::{RemovalFailure, SweepPlan};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a plan.
    ///
    /// Plain output lists the names with verdict `show`, one per line; JSON
    /// and table output cover every decision.
    pub fn format_plan(&self, plan: &SweepPlan, show: Verdict) -> Result<String> {
        match self.format {
            OutputFormat::Plain => Ok(self.format_plan_plain(plan, show)),
            OutputFormat::Json => self.format_plan_json(plan),
            OutputFormat::Table => Ok(self.format_plan_table(plan)),
        }
    }

    fn format_plan_plain(&self, plan: &SweepPlan, show: Verdict) -> String {
        let names = match show {
            Verdict::Keep => plan.kept_names(),
            Verdict::Purge => plan.purged_names(),
        };
        names.join("\n")
    }

    fn format_plan_json(&self, plan: &SweepPlan) -> Result<String> {
        let entries: Vec<serde_json::Value> = plan
            .classification
            .entries()
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.entry.id,
                    "timestamp": c.entry.timestamp,
                    "age_secs": c.decision.age,
                    "tier": c.decision.tier,
                    "verdict": c.decision.verdict.as_str(),
                })
            })
            .collect();
        let skipped: Vec<serde_json::Value> = plan
            .skipped
            .iter()
            .map(|s| serde_json::json!({ "name": s.name, "reason": s.reason }))
            .collect();

        Ok(serde_json::to_string_pretty(&serde_json::json!({
            "entries": entries,
            "skipped": skipped,
        }))?)
    }

    fn format_plan_table(&self, plan: &SweepPlan) -> String {
        if plan.classification.is_empty() {
            return self.colorize("No items found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Age", "Tier", "Verdict"]);

        for c in plan.classification.entries() {
            builder.push_record([
                c.entry.id.clone(),
                format_age(c.decision.age),
                c.decision.tier.to_string(),
                self.verdict(c.decision.verdict),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the parsed tiers of a policy, with effective intervals.
    pub fn format_schedule(&self, retention: &RetentionPolicy) -> Result<String> {
        let policy = &retention.policy;
        let rows: Vec<ScheduleRow> = policy
            .tiers()
            .iter()
            .enumerate()
            .map(|(index, tier)| ScheduleRow {
                index,
                end_age: tier.end_age,
                interval: tier.interval,
                effective: retention.leeway.apply(tier.interval),
                note: match policy.repetition() {
                    Some(r) if tier.repeats => format!(
                        "repeats: age x{}, interval x{}",
                        r.age_factor, r.interval_factor
                    ),
                    _ => String::new(),
                },
            })
            .collect();

        match self.format {
            OutputFormat::Plain => Ok(rows
                .iter()
                .map(|row| {
                    let mut line = format!(
                        "{}: up to {} keep one per {} (effective {})",
                        row.index,
                        row.end_age,
                        row.interval,
                        row.effective
                    );
                    if !row.note.is_empty() {
                        line.push_str(&format!("; {}", row.note));
                    }
                    line
                })
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Json => {
                let tiers: Vec<serde_json::Value> = rows
                    .iter()
                    .map(|row| {
                        serde_json::json!({
                            "tier": row.index,
                            "end_age": row.end_age.to_string(),
                            "end_age_secs": finite_secs(row.end_age),
                            "interval": row.interval.to_string(),
                            "interval_secs": finite_secs(row.interval),
                            "effective_secs": finite_secs(row.effective),
                            "repeats": !row.note.is_empty(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&tiers)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Tier", "Up to", "Keep every", "Effective", "Note"]);
                for row in &rows {
                    builder.push_record([
                        row.index.to_string(),
                        row.end_age.to_string(),
                        row.interval.to_string(),
                        row.effective.to_string(),
                        row.note.clone(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format removal failures, one per line.
    pub fn failures(&self, failures: &[RemovalFailure]) -> String {
        failures
            .iter()
            .map(|f| self.error(&format!("Cannot remove {}: {}", f.name, f.error)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn verdict(&self, verdict: Verdict) -> String {
        match verdict {
            Verdict::Keep => self.colorize(verdict.as_str(), "green"),
            Verdict::Purge => self.colorize(verdict.as_str(), "red"),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

struct ScheduleRow {
    index: usize,
    end_age: Quantity,
    interval: Quantity,
    effective: Quantity,
    note: String,
}

/// Human-readable age; entries dated after "now" show as `future`
pub fn format_age(age_secs: f64) -> String {
    if !age_secs.is_finite() {
        "unknown".to_string()
    } else if age_secs < 0.0 {
        "future".to_string()
    } else {
        Quantity::from_secs(age_secs).to_string()
    }
}

fn finite_secs(quantity: Quantity) -> Option<f64> {
    match quantity {
        Quantity::Elapsed(secs) => Some(secs),
        Quantity::Indefinite => None,
    }
}

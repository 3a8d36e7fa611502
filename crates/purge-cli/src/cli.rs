//! Command-line argument parsing.

use crate::config::OutputFormat;
use clap::{ArgGroup, Parser};
use purge_janitor::{JanitorConfig, TimeSource};
use std::path::PathBuf;
use tracing::Level;

/// Selectively remove files or directories on an age-based schedule.
///
/// Names to remove are printed unless `--rm` is given.
#[derive(Debug, Parser)]
#[command(name = "backup-purge")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("time").args(["ctime", "mtime", "atime", "time_pattern"])))]
pub struct Cli {
    /// Files or directories to consider; `-` reads names from stdin
    #[arg(value_name = "NAME", required_unless_present = "explain")]
    pub names: Vec<String>,

    /// Retention policy [default: w,m,y]
    #[arg(short, long, value_name = "POLICY")]
    pub policy: Option<String>,

    /// Tolerance subtracted from every interval [default: 1%]
    #[arg(short, long, value_name = "MARGIN")]
    pub leeway: Option<String>,

    /// Remove items rather than listing items for removal
    #[arg(long, conflicts_with = "show_kept")]
    pub rm: bool,

    /// Print the items to be kept rather than the items to remove
    #[arg(long)]
    pub show_kept: bool,

    /// Increase the detail of log messages (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Do not report errors when removal fails
    #[arg(short = 'Q', long)]
    pub no_errs: bool,

    /// Expand shell wild-card characters in names
    #[arg(short, long)]
    pub glob: bool,

    /// Date items by inode change time (default)
    #[arg(short, long)]
    pub ctime: bool,

    /// Date items by modification time
    #[arg(short, long)]
    pub mtime: bool,

    /// Date items by access time
    #[arg(short, long)]
    pub atime: bool,

    /// Parse the timestamp from the name with a strftime pattern
    #[arg(short, long, value_name = "FORMAT")]
    pub time_pattern: Option<String>,

    /// Only parse the leaf name to extract the timestamp
    #[arg(short = 'L', long)]
    pub leaf_only: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(long, value_name = "PATH", env = "BACKUP_PURGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the resolved tier schedule instead of acting
    #[arg(long)]
    pub explain: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// One name per line (default)
    Plain,
    /// JSON format
    Json,
    /// Table format
    Table,
}

/// What to do with the classified names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Print the names that would be removed
    ListPurged,
    /// Print the names that are kept
    ListKept,
    /// Remove the purge set
    Remove,
}

impl Cli {
    /// The requested action
    pub fn action(&self) -> Action {
        if self.rm {
            Action::Remove
        } else if self.show_kept {
            Action::ListKept
        } else {
            Action::ListPurged
        }
    }

    /// Log level implied by `-q` and `-v`
    pub fn log_level(&self) -> Level {
        if self.quiet {
            return Level::WARN;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    /// The time source flag given, if any
    pub fn time_source(&self) -> Option<TimeSource> {
        if self.time_pattern.is_some() {
            Some(TimeSource::Pattern)
        } else if self.mtime {
            Some(TimeSource::Modified)
        } else if self.atime {
            Some(TimeSource::Accessed)
        } else if self.ctime {
            Some(TimeSource::Created)
        } else {
            None
        }
    }

    /// Overlay command-line flags on configuration-file defaults
    pub fn janitor_config(&self, base: JanitorConfig) -> JanitorConfig {
        let mut config = base;
        if let Some(policy) = &self.policy {
            config.policy = policy.clone();
        }
        if let Some(leeway) = &self.leeway {
            config.leeway = leeway.clone();
        }
        if let Some(source) = self.time_source() {
            config.time_source = source;
        }
        if let Some(pattern) = &self.time_pattern {
            config.time_pattern = Some(pattern.clone());
        }
        if self.leaf_only {
            config.leaf_only = true;
        }
        config
    }
}

impl From<CliFormat> for OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Plain => OutputFormat::Plain,
            CliFormat::Json => OutputFormat::Json,
            CliFormat::Table => OutputFormat::Table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("backup-purge").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["a", "b"]);
        assert_eq!(cli.names, vec!["a", "b"]);
        assert_eq!(cli.action(), Action::ListPurged);
        assert_eq!(cli.log_level(), Level::INFO);
        assert!(cli.time_source().is_none());

        let config = cli.janitor_config(JanitorConfig::default());
        assert_eq!(config, JanitorConfig::default());
    }

    #[test]
    fn test_names_required() {
        assert!(Cli::try_parse_from(["backup-purge"]).is_err());
        assert!(parse(&["--explain"]).names.is_empty());
    }

    #[test]
    fn test_rm_and_show_kept_conflict() {
        assert!(Cli::try_parse_from(["backup-purge", "--rm", "--show-kept", "x"]).is_err());
        assert_eq!(parse(&["--rm", "x"]).action(), Action::Remove);
        assert_eq!(parse(&["--show-kept", "x"]).action(), Action::ListKept);
    }

    #[test]
    fn test_time_sources_are_exclusive() {
        assert!(Cli::try_parse_from(["backup-purge", "-m", "-a", "x"]).is_err());
        assert!(Cli::try_parse_from(["backup-purge", "-c", "-t", "%Y", "x"]).is_err());
        assert_eq!(parse(&["-a", "x"]).time_source(), Some(TimeSource::Accessed));
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["-v", "x"]).log_level(), Level::DEBUG);
        assert_eq!(parse(&["-vv", "x"]).log_level(), Level::TRACE);
        assert_eq!(parse(&["-q", "x"]).log_level(), Level::WARN);
    }

    #[test]
    fn test_flags_override_config() {
        let base = JanitorConfig {
            policy: "d".to_string(),
            leeway: "5%".to_string(),
            time_source: TimeSource::Modified,
            ..JanitorConfig::default()
        };
        let cli = parse(&["-p", "w,m", "-t", "snap-%Y%m%d", "-L", "x"]);
        let config = cli.janitor_config(base);

        assert_eq!(config.policy, "w,m");
        assert_eq!(config.leeway, "5%");
        assert_eq!(config.time_source, TimeSource::Pattern);
        assert_eq!(config.time_pattern.as_deref(), Some("snap-%Y%m%d"));
        assert!(config.leaf_only);
    }

    #[test]
    fn test_stdin_marker_is_a_name() {
        let cli = parse(&["-", "extra"]);
        assert_eq!(cli.names, vec!["-", "extra"]);
    }

    #[test]
    fn test_format_conversion() {
        let format: OutputFormat = CliFormat::Json.into();
        assert_eq!(format, OutputFormat::Json);
    }
}

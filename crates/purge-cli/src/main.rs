//! backup-purge - selectively remove files or directories on a schedule.

use clap::Parser;
use purge_cli::commands;
use purge_cli::input::gather_names;
use purge_cli::{Cli, Config, Formatter};
use purge_janitor::current_timestamp;
use std::io;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> purge_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    let janitor_config = cli.janitor_config(config.janitor);
    let mut out = io::stdout().lock();

    if cli.explain {
        return commands::execute_explain(&janitor_config, &formatter, &mut out);
    }

    let names = gather_names(&cli.names, cli.glob, io::stdin().lock())?;
    tracing::debug!("Considering {} names", names.len());

    commands::execute_purge(
        &names,
        janitor_config,
        cli.action(),
        cli.no_errs,
        current_timestamp(),
        &formatter,
        &mut out,
        &mut io::stderr(),
    )
}

/// Log to stderr at `level`, unless `RUST_LOG` says otherwise
fn init_tracing(level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

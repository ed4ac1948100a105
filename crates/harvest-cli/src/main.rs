//! Promo code harvester CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use harvest_cli::config::Config;
use harvest_cli::error::RunError;
use harvest_cli::logging::{LogConfig, init_logging};
use tracing::error;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod progress;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_extract, run_harvest, run_history};
use crate::progress::ProgressObserver;
use crate::summary::{print_harvest, print_history, print_run_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match execute(&cli, &log_config) {
        Ok(()) => 0,
        Err(error) => report(&error, &log_config),
    };
    std::process::exit(exit_code);
}

fn execute(cli: &Cli, log_config: &LogConfig) -> anyhow::Result<()> {
    let config = Config::discover(cli.config.as_deref()).map_err(RunError::from)?;
    match &cli.command {
        Command::Run(args) => {
            let mut observer = if show_progress(log_config) {
                ProgressObserver::stderr()
            } else {
                ProgressObserver::hidden()
            };
            let report = run_harvest(&config, args, &mut observer)?;
            print_run_summary(&report.outcome, report.dry_run, &report.audit_log);
        }
        Command::Extract(args) => {
            let harvest = run_extract(&config, args)?;
            print_harvest(&harvest);
        }
        Command::History(args) => {
            let (records, total) = run_history(&config, args)?;
            print_history(&records, total);
        }
    }
    Ok(())
}

/// Log a fatal error, returning the exit code for its kind.
///
/// The message also goes to stderr directly unless the log already put it
/// there.
fn report(error: &anyhow::Error, log_config: &LogConfig) -> i32 {
    let exit_code = error
        .downcast_ref::<RunError>()
        .map_or(1, RunError::exit_code);
    error!(exit_code, "{error:#}");
    if !logs_errors_to_stderr(log_config) {
        eprintln!("error: {error:#}");
    }
    exit_code
}

fn logs_errors_to_stderr(log_config: &LogConfig) -> bool {
    log_config.log_file.is_none() && log_config.level_filter != LevelFilter::OFF
}

/// The bar would interleave with log lines on stderr, so it is only drawn
/// while the log goes to a file.
fn show_progress(log_config: &LogConfig) -> bool {
    log_config.log_file.is_some() && io::stderr().is_terminal()
}

/// `--log-level` wins over `-v`/`-q`; `RUST_LOG` only applies when neither
/// was given.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let explicit = cli.log_level.map(LevelFilter::from);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: explicit.unwrap_or_else(|| cli.verbosity.tracing_level_filter()),
        use_env_filter: explicit.is_none() && !cli.verbosity.is_present(),
        with_ansi,
        format: cli.log_format.into(),
        log_file: cli.log_file.clone(),
        ..LogConfig::default()
    }
}

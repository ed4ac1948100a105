//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use harvest_cli::logging::LogFormat;
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(
    name = "code-harvester",
    version,
    about = "Collect promo codes from posts and redeem them on the rewards site",
    long_about = "Search an account's recent posts for code announcements, extract the codes,\n\
                  and submit each one through a browser session on the rewards site.\n\n\
                  Every submission outcome is appended to an audit log."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Credentials and settings file (default: ./credentials.toml, then the user config dir).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Harvest today's codes and submit them on the site.
    Run(RunArgs),

    /// Harvest and print the codes without opening a browser.
    Extract(SourceArgs),

    /// Show past submissions from the audit log.
    History(HistoryArgs),
}

/// Where posts come from.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Read posts from a saved search response instead of calling the API.
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Account to search (default from config).
    #[arg(long, value_name = "NAME")]
    pub account: Option<String>,

    /// Earliest post date to consider (default: today).
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub since: Option<NaiveDate>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Stop after extraction and list the codes that would be submitted.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Show the browser window even if the config asks for headless.
    #[arg(long)]
    pub headed: bool,

    /// Audit log path (overrides the config).
    #[arg(long = "audit-log", value_name = "PATH")]
    pub audit_log: Option<PathBuf>,
}

#[derive(Args)]
pub struct HistoryArgs {
    /// Only show submissions of this code (case-insensitive).
    #[arg(long, value_name = "CODE")]
    pub code: Option<String>,

    /// Show at most this many of the most recent submissions.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Audit log path (overrides the config).
    #[arg(long = "audit-log", value_name = "PATH")]
    pub audit_log: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}

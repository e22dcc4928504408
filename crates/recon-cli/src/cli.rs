//! CLI argument definitions for the ledger reconciler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "recon-ledger",
    version,
    about = "Reconcile shipped and received supply ledgers",
    long_about = "Match an outgoing (shipped) transaction ledger against an incoming\n\
                  (received) one, classify every record as compliant, non-compliant or\n\
                  not received, and write the result table plus summary statistics."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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
    /// Reconcile two ledger CSVs and write the result table.
    Reconcile(ReconcileArgs),

    /// List the recognized input columns and the output layout.
    Columns,
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Outgoing (shipped) ledger CSV.
    #[arg(value_name = "OUTGOING_CSV")]
    pub outgoing: PathBuf,

    /// Incoming (received) ledger CSV.
    #[arg(value_name = "INCOMING_CSV")]
    pub incoming: PathBuf,

    /// Result table path (default: reconciliation.csv).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Product-similarity threshold applied when no document match is
    /// available (0-100).
    #[arg(long = "threshold", value_name = "SCORE", default_value_t = 65.0)]
    pub threshold: f64,

    /// Additional facility-name term to exclude (repeatable).
    #[arg(long = "exclude", value_name = "TERM")]
    pub exclude: Vec<String>,

    /// Disable the built-in facility exclusion list.
    #[arg(long = "no-default-exclusions")]
    pub no_default_exclusions: bool,

    /// Skip the terminal summary tables.
    #[arg(long = "no-summary")]
    pub no_summary: bool,

    /// Disable the progress bar.
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

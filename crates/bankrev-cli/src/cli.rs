//! CLI argument definitions for the review analytics pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "bankrev",
    version,
    about = "Bank review analytics - scrape dumps to sentiment, themes, and charts",
    long_about = "Batch analytics over mobile-app store reviews for three Ethiopian banks.\n\n\
                  Four independent run-once stages: collect (fetch + clean), enrich\n\
                  (sentiment + themes), load (relational store), report (charts)."
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
    /// Fetch raw review dumps, clean them, and write the cleaned CSV.
    Collect(CollectArgs),

    /// Score sentiment and assign themes over the cleaned CSV.
    Enrich(EnrichArgs),

    /// Load the enriched CSV into the relational store.
    Load(LoadArgs),

    /// Aggregate the enriched CSV and render chart images.
    Report(ReportArgs),
}

#[derive(Parser)]
pub struct CollectArgs {
    /// Directory holding one <app_id>.json dump per bank app.
    #[arg(value_name = "DUMP_DIR")]
    pub input_dir: PathBuf,

    /// Cleaned CSV checkpoint to write.
    #[arg(
        long = "output",
        value_name = "PATH",
        default_value = "ethiopian_bank_reviews_cleaned.csv"
    )]
    pub output: PathBuf,

    /// Maximum reviews kept per bank batch.
    #[arg(long = "target-count", value_name = "N", default_value_t = 500)]
    pub target_count: usize,
}

#[derive(Parser)]
pub struct EnrichArgs {
    /// Cleaned CSV checkpoint to read.
    #[arg(
        long = "input",
        value_name = "PATH",
        default_value = "ethiopian_bank_reviews_cleaned.csv"
    )]
    pub input: PathBuf,

    /// Enriched CSV checkpoint to write.
    #[arg(
        long = "output",
        value_name = "PATH",
        default_value = "ethiopian_bank_reviews_analyzed.csv"
    )]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct LoadArgs {
    /// Enriched CSV checkpoint to read.
    #[arg(
        long = "input",
        value_name = "PATH",
        default_value = "ethiopian_bank_reviews_analyzed.csv"
    )]
    pub input: PathBuf,

    /// SQLite database file for the banks/reviews tables.
    #[arg(long = "db-path", value_name = "PATH", default_value = "bank_reviews.db")]
    pub db_path: PathBuf,

    /// Truncate the reviews table before inserting.
    #[arg(long = "reset")]
    pub reset: bool,
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Enriched CSV checkpoint to read.
    #[arg(
        long = "input",
        value_name = "PATH",
        default_value = "ethiopian_bank_reviews_analyzed.csv"
    )]
    pub input: PathBuf,

    /// Directory the chart PNGs are written into.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "visuals")]
    pub output_dir: PathBuf,
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

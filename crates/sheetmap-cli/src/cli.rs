//! CLI argument definitions for the sheetmap tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "sheetmap",
    version,
    about = "Map spreadsheet column headers onto a canonical schema",
    long_about = "Map the column headers of operator spreadsheets onto a canonical schema.\n\n\
                  Each header is resolved by exact name, alias, fuzzy and semantic matching,\n\
                  and gets a confidence and a recommended action (AutoMap, Review, ManualMap)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Map every sheet of a CSV, TSV or JSON workbook and write a JSON report.
    Map(MapArgs),

    /// Show the best schema candidates for a single header label.
    Suggest(SuggestArgs),

    /// Load schema documents and list the merged registry.
    Schema(SchemaArgs),
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Schema document (JSON). Repeat to merge several; later files win on key collisions.
    #[arg(long = "schema", short = 's', value_name = "PATH", required = true)]
    pub schema: Vec<PathBuf>,

    /// Fail when an alias is registered under more than one column.
    #[arg(long = "strict-aliases")]
    pub strict_aliases: bool,
}

#[derive(Args)]
pub struct MatchArgs {
    /// TOML file with matching and header options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Minimum fuzzy score (0-100) for a fuzzy match to count.
    #[arg(long = "fuzzy-threshold", value_name = "SCORE", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub fuzzy_threshold: Option<u8>,

    /// Disable the semantic matching layer.
    #[arg(long = "no-semantic")]
    pub no_semantic: bool,
}

#[derive(Parser)]
pub struct MapArgs {
    /// Spreadsheet to map (.csv, .tsv or .json workbook).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Treat exactly this many leading rows as header instead of detecting them.
    #[arg(long = "header-rows", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub header_rows: Option<u16>,

    /// Upper bound on detected header rows.
    #[arg(long = "max-header-rows", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_header_rows: Option<u16>,

    /// Report path (default: <INPUT-STEM>_mapping_result.json next to the input).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Resolve and summarize without writing the report.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print one row per mapped column in addition to the summary.
    #[arg(long = "details")]
    pub details: bool,
}

#[derive(Parser)]
pub struct SuggestArgs {
    /// Header label to look up.
    #[arg(value_name = "LABEL")]
    pub label: String,

    #[command(flatten)]
    pub schema: SchemaArgs,

    #[command(flatten)]
    pub matching: MatchArgs,

    /// Number of candidates to show.
    #[arg(long = "top", default_value_t = 3)]
    pub top: usize,
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

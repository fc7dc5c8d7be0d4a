//! Command-line argument definitions for census tally
//!
//! Global options (store location, configuration file, verbosity, output
//! format) apply to every subcommand.

use crate::app::models::{Gender, Period};
use crate::app::services::aggregator::{Dimension, PeriodFilter};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the census tally tool
#[derive(Debug, Clone, Parser)]
#[command(
    name = "census-tally",
    version,
    about = "Import, validate, summarize and export wide population tables",
    long_about = "Reconciles population counts supplied as wide area-by-age-by-gender CSV tables \
                  with a normalized record store. Uploads are parsed, checked against the area \
                  catalog and per-bracket totals, expanded into one record per area, bracket, \
                  gender and period, and can be exported back into the same wide layout."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Record store file (JSON lines)
    ///
    /// Defaults to `<data dir>/census-tally/records.jsonl`.
    #[arg(long = "store", value_name = "FILE", global = true)]
    pub store: Option<PathBuf>,

    /// Engine configuration file (JSON)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress output except errors"
    )]
    pub quiet: bool,

    /// Output format for command results
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Validate and import wide-format CSV files into the record store
    Import(ImportArgs),
    /// Validate wide-format CSV files without writing anything
    Validate(ValidateArgs),
    /// Export stored records for a period as a wide table
    Export(ExportArgs),
    /// Grouped totals over stored records
    Summary(SummaryArgs),
    /// Write an import template for the configured catalog and brackets
    Template(TemplateArgs),
    /// Delete every record created by one import batch
    DeleteBatch(DeleteBatchArgs),
}

/// Arguments for the import command
#[derive(Debug, Clone, Parser)]
pub struct ImportArgs {
    /// CSV files or glob patterns
    #[arg(value_name = "FILES", required = true)]
    pub inputs: Vec<String>,

    /// Reporting period as YYYY-MM (defaults to the current month)
    #[arg(short = 'p', long = "period", value_name = "YYYY-MM")]
    pub period: Option<Period>,

    /// Batch id to tag records with (one is generated per file otherwise)
    ///
    /// Only valid with a single input file.
    #[arg(long = "batch-id", value_name = "ID")]
    pub batch_id: Option<String>,

    /// Disable the progress bar
    #[arg(long = "no-progress")]
    pub no_progress: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// CSV files or glob patterns
    #[arg(value_name = "FILES", required = true)]
    pub inputs: Vec<String>,
}

/// Arguments for the export command
#[derive(Debug, Clone, Parser)]
pub struct ExportArgs {
    /// Periods to include: YYYY-MM, YYYY, YYYY-MM..YYYY-MM or "any"
    ///
    /// Defaults to the current month.
    #[arg(short = 'p', long = "period", value_name = "PERIOD")]
    pub period: Option<PeriodFilter>,

    /// Output CSV file (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Leave out the trailing grand-total row
    #[arg(long = "no-total-row")]
    pub no_total_row: bool,
}

/// Arguments for the summary command
#[derive(Debug, Clone, Parser)]
pub struct SummaryArgs {
    /// Grouping dimensions in order (area, bracket, gender, period)
    #[arg(
        short = 'b',
        long = "by",
        value_name = "DIMS",
        value_delimiter = ',',
        default_value = "area"
    )]
    pub by: Vec<Dimension>,

    /// Only these areas
    #[arg(long = "area", value_name = "AREA", value_delimiter = ',')]
    pub areas: Vec<String>,

    /// Only these bracket codes
    #[arg(long = "bracket", value_name = "CODE", value_delimiter = ',')]
    pub brackets: Vec<String>,

    /// Only this gender
    #[arg(long = "gender", value_name = "GENDER")]
    pub gender: Option<Gender>,

    /// Periods to include: YYYY-MM, YYYY, YYYY-MM..YYYY-MM or "any"
    #[arg(short = 'p', long = "period", value_name = "PERIOD", default_value = "any")]
    pub period: PeriodFilter,

    /// Only records from this import batch
    #[arg(long = "batch-id", value_name = "ID")]
    pub batch_id: Option<String>,

    /// Order groups by catalog, bracket and calendar order
    #[arg(long = "sorted")]
    pub sorted: bool,

    /// Include zero-count groups for every catalog value
    #[arg(long = "dense")]
    pub dense: bool,
}

/// Arguments for the template command
#[derive(Debug, Clone, Parser)]
pub struct TemplateArgs {
    /// Output CSV file (stdout when omitted)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Zero-count rows after the example row (configuration default otherwise)
    #[arg(long = "rows", value_name = "COUNT")]
    pub rows: Option<usize>,
}

/// Arguments for the delete-batch command
#[derive(Debug, Clone, Parser)]
pub struct DeleteBatchArgs {
    /// Batch id printed by a previous import
    #[arg(value_name = "ID")]
    pub batch_id: String,
}

/// Output format options for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Args {
    /// Log level implied by `-v` / `-q`
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

//! Shared components for CLI commands
//!
//! Logging setup, configuration and store resolution, input discovery and
//! issue rendering used by more than one subcommand.

use anyhow::{Context, bail};
use colored::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::app::models::ValidationIssue;
use crate::app::services::record_store::JsonlRecordStore;
use crate::cli::args::Args;
use crate::config::EngineConfig;
use crate::constants::{DATA_DIR_NAME, DEFAULT_CONFIG_FILENAME, DEFAULT_STORE_FILENAME};
use crate::{Error, Result};

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("census_tally={}", log_level)));

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load the engine configuration
///
/// `--config` wins; otherwise `<config dir>/census-tally/config.json` is used
/// when it exists, and built-in defaults when it does not.
pub fn load_config(args: &Args) -> anyhow::Result<EngineConfig> {
    let path = match &args.config_file {
        Some(path) => Some(path.clone()),
        None => dirs::config_dir()
            .map(|dir| dir.join(DATA_DIR_NAME).join(DEFAULT_CONFIG_FILENAME))
            .filter(|path| path.exists()),
    };

    let config = match path {
        Some(path) => {
            info!("Using config file: {}", path.display());
            EngineConfig::from_json_file(&path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => {
            info!("No config file found, using defaults");
            EngineConfig::default()
        }
    };

    config.validate()?;
    Ok(config)
}

/// Default record store location under the user data directory
pub fn default_store_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_dir().context("Could not determine user data directory")?;
    Ok(data_dir.join(DATA_DIR_NAME).join(DEFAULT_STORE_FILENAME))
}

/// Open the record store named by `--store`, or the default one
pub async fn open_store(args: &Args) -> anyhow::Result<Arc<JsonlRecordStore>> {
    let path = match &args.store {
        Some(path) => path.clone(),
        None => default_store_path()?,
    };
    let store = JsonlRecordStore::open(&path)
        .await
        .with_context(|| format!("Failed to open record store {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Expand file arguments, treating any argument with glob characters as a pattern
pub fn expand_inputs(inputs: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.contains(['*', '?', '[']) {
            files.push(PathBuf::from(input));
            continue;
        }

        let mut matched = Vec::new();
        for entry in glob::glob(input).with_context(|| format!("Invalid glob pattern '{}'", input))? {
            let path = entry.with_context(|| format!("Failed to read a match of '{}'", input))?;
            if path.is_file() {
                matched.push(path);
            }
        }
        if matched.is_empty() {
            bail!("No files match '{}'", input);
        }
        matched.sort();
        debug!("Pattern '{}' matched {} files", input, matched.len());
        files.extend(matched);
    }

    Ok(files)
}

/// Write CSV text to a file, or to stdout when no path is given
pub fn write_output(output: Option<&Path>, content: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

/// Print validation issues for one file in human form
pub fn print_issues(source: &str, issues: &[ValidationIssue]) {
    println!(
        "{} {} ({} issues)",
        "Rejected".bright_red().bold(),
        source.bright_white(),
        issues.len().to_string().bright_red().bold()
    );
    for issue in issues {
        let value = issue
            .value
            .as_deref()
            .map(|v| format!(" [{}]", v))
            .unwrap_or_default();
        println!(
            "  {} {}: {}{}",
            format!("row {}", issue.row).bright_yellow(),
            issue.field.bright_cyan(),
            issue.message,
            value.bright_black()
        );
    }
}

/// Header for machine-readable issue listings
pub const ISSUE_CSV_HEADER: [&str; 6] = ["source", "row", "field", "kind", "message", "value"];

/// Append issues for one file to a CSV writer
pub fn write_issue_rows<W: Write>(
    writer: &mut csv::Writer<W>,
    source: &str,
    issues: &[ValidationIssue],
) -> anyhow::Result<()> {
    for issue in issues {
        writer
            .write_record([
                source,
                &issue.row.to_string(),
                &issue.field,
                issue.kind.as_str(),
                &issue.message,
                issue.value.as_deref().unwrap_or(""),
            ])
            .context("Failed to write issue row")?;
    }
    Ok(())
}

//! Validate command implementation
//!
//! Parses and validates uploads exactly as `import` would, without touching
//! the record store.

use anyhow::{Context, bail};
use colored::*;
use serde_json::json;
use tracing::info;

use super::shared::{ISSUE_CSV_HEADER, expand_inputs, load_config, print_issues, write_issue_rows};
use crate::app::services::consistency_validator::{ConsistencyValidator, ValidationReport};
use crate::app::services::wide_format_parser::WideFormatParser;
use crate::cli::args::{Args, OutputFormat, ValidateArgs};

pub async fn run_validate(args: &Args, validate: &ValidateArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let validator = ConsistencyValidator::from_config(&config)?;
    let parser = WideFormatParser::new();
    let files = expand_inputs(&validate.inputs)?;

    let mut reports: Vec<(String, ValidationReport)> = Vec::with_capacity(files.len());
    for file in &files {
        let parsed = parser
            .parse_file(file)
            .await
            .with_context(|| format!("Failed to parse {}", file.display()))?;
        info!("{}", parsed.stats.summary());
        reports.push((file.display().to_string(), validator.validate(&parsed.rows)));
    }

    match args.output_format {
        OutputFormat::Human => {
            for (source, report) in &reports {
                if report.is_clean() {
                    println!(
                        "{} {} ({} rows)",
                        "Valid".bright_green().bold(),
                        source.bright_white(),
                        report.rows_checked
                    );
                } else {
                    print_issues(source, &report.issues);
                }
            }
        }
        OutputFormat::Json => {
            let files: Vec<serde_json::Value> = reports
                .iter()
                .map(|(source, report)| {
                    json!({
                        "source": source,
                        "valid": report.is_clean(),
                        "rows_checked": report.rows_checked,
                        "rows_with_issues": report.rows_with_issues(),
                        "issues": report.issues,
                    })
                })
                .collect();
            let text =
                serde_json::to_string_pretty(&files).context("Failed to encode validation report")?;
            println!("{}", text);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .write_record(ISSUE_CSV_HEADER)
                .context("Failed to write issue header")?;
            for (source, report) in &reports {
                write_issue_rows(&mut writer, source, &report.issues)?;
            }
            writer.flush().context("Failed to flush stdout")?;
        }
    }

    let invalid = reports.iter().filter(|(_, r)| !r.is_clean()).count();
    if invalid > 0 {
        bail!("{} of {} files failed validation", invalid, reports.len());
    }
    Ok(())
}

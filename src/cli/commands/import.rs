//! Import command implementation
//!
//! Runs each input file through the import pipeline against the JSON-lines
//! record store. Files are imported one after another; a rejected file does
//! not stop the ones after it, but the command exits with an error.

use anyhow::{Context, bail};
use colored::*;
use serde_json::json;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::shared::{
    ISSUE_CSV_HEADER, expand_inputs, load_config, open_store, print_issues, write_issue_rows,
};
use crate::Error;
use crate::app::models::{BatchId, Period};
use crate::app::services::import_pipeline::{
    BatchResult, ImportOutcome, ImportPipeline, ImportSource,
};
use crate::cli::args::{Args, ImportArgs, OutputFormat};

/// Outcome of one file, kept for the final report
struct FileReport {
    source: String,
    outcome: ImportOutcome,
}

pub async fn run_import(
    args: &Args,
    import: &ImportArgs,
    cancellation: CancellationToken,
) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let config = load_config(args)?;
    let files = expand_inputs(&import.inputs)?;

    if import.batch_id.is_some() && files.len() > 1 {
        bail!("--batch-id can only be used with a single input file");
    }

    let period = import.period.unwrap_or_else(Period::current);
    let store = open_store(args).await?;
    let show_progress =
        !import.no_progress && !args.quiet && args.output_format == OutputFormat::Human;
    let pipeline = ImportPipeline::from_config(store, &config)?
        .with_cancellation(cancellation.clone())
        .with_progress(show_progress);

    info!("Importing {} files for {}", files.len(), period);
    debug!("Import arguments: {:?}", import);

    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        if cancellation.is_cancelled() {
            warn!("Skipping {}: import cancelled", file.display());
            continue;
        }

        let source = ImportSource::File(file.clone());
        let batch_id = import.batch_id.clone().map(BatchId::new);
        let outcome = pipeline
            .run(&source, period, batch_id)
            .await
            .with_context(|| format!("Failed to import {}", file.display()))?;
        reports.push(FileReport {
            source: source.name(),
            outcome,
        });
    }

    match args.output_format {
        OutputFormat::Human => print_human(&reports, config.max_reported_failures),
        OutputFormat::Json => print_json(&reports, config.max_reported_failures)?,
        OutputFormat::Csv => print_csv(&reports)?,
    }
    info!(
        "Import finished in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    let rejected = reports.iter().filter(|r| r.outcome.is_rejected()).count();
    let batches: Vec<&BatchResult> = reports.iter().filter_map(|r| r.outcome.batch()).collect();
    let failed: usize = batches.iter().map(|b| b.failure_count()).sum();

    if batches.iter().any(|b| b.cancelled) || cancellation.is_cancelled() {
        return Err(Error::processing_interrupted("Import cancelled by user").into());
    }
    if rejected > 0 {
        bail!("{} of {} files rejected by validation", rejected, reports.len());
    }
    if failed > 0 {
        bail!("{} records could not be stored", failed);
    }
    Ok(())
}

fn print_human(reports: &[FileReport], max_failures: usize) {
    for report in reports {
        match &report.outcome {
            ImportOutcome::Rejected { issues, .. } => print_issues(&report.source, issues),
            ImportOutcome::Completed(batch) => print_batch(&report.source, batch, max_failures),
        }
    }
}

fn print_batch(source: &str, batch: &BatchResult, max_failures: usize) {
    let status = if batch.is_complete() {
        "Imported".bright_green().bold()
    } else {
        "Partially imported".bright_yellow().bold()
    };
    println!("{} {}", status, source.bright_white());
    println!(
        "  {} {}",
        "Batch:".bright_cyan(),
        batch.batch_id.as_str().bright_white()
    );
    println!(
        "  {} {}",
        "Period:".bright_cyan(),
        batch.period.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Rows:".bright_cyan(),
        batch.rows_imported.to_string().bright_white()
    );
    println!(
        "  {} {} ({} people)",
        "Records created:".bright_cyan(),
        batch.success_count().to_string().bright_white().bold(),
        batch.persisted_population()
    );
    if batch.failure_count() > 0 {
        println!(
            "  {} {}",
            "Records failed:".bright_red(),
            batch.failure_count().to_string().bright_red().bold()
        );
        for message in batch.error_messages(max_failures) {
            println!("    {}", message);
        }
        if batch.failure_count() > max_failures {
            println!(
                "    {}",
                format!("... and {} more", batch.failure_count() - max_failures).bright_black()
            );
        }
    }
    if batch.cancelled {
        println!(
            "  {} {}",
            "Not attempted (cancelled):".bright_red(),
            batch.not_attempted.to_string().bright_red().bold()
        );
    }
}

fn print_json(reports: &[FileReport], max_failures: usize) -> anyhow::Result<()> {
    let files: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| match &report.outcome {
            ImportOutcome::Rejected {
                issues,
                rows_checked,
            } => json!({
                "source": report.source,
                "status": "rejected",
                "rows_checked": rows_checked,
                "issues": issues,
            }),
            ImportOutcome::Completed(batch) => json!({
                "source": report.source,
                "status": if batch.is_complete() { "imported" } else { "partial" },
                "batch_id": batch.batch_id,
                "period": batch.period,
                "rows_imported": batch.rows_imported,
                "records_created": batch.success_count(),
                "records_failed": batch.failure_count(),
                "not_attempted": batch.not_attempted,
                "cancelled": batch.cancelled,
                "population": batch.persisted_population(),
                "errors": batch.error_messages(max_failures),
            }),
        })
        .collect();

    let text = serde_json::to_string_pretty(&files).context("Failed to encode import report")?;
    println!("{}", text);
    Ok(())
}

fn print_csv(reports: &[FileReport]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer
        .write_record(ISSUE_CSV_HEADER)
        .context("Failed to write issue header")?;
    for report in reports {
        write_issue_rows(&mut writer, &report.source, report.outcome.issues())?;
    }
    writer.flush().context("Failed to flush stdout")?;
    Ok(())
}

//! Export command implementation

use anyhow::Context;
use colored::*;
use tracing::info;

use super::shared::{load_config, open_store, write_output};
use crate::app::models::Period;
use crate::app::services::aggregator::{PeriodFilter, RecordFilter};
use crate::app::services::denormalizer::Denormalizer;
use crate::app::services::record_store::RecordStore;
use crate::cli::args::{Args, ExportArgs, OutputFormat};

/// Rebuild the wide table for the requested periods from the record store
pub async fn run_export(args: &Args, export: &ExportArgs) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let store = open_store(args).await?;
    let period = export
        .period
        .unwrap_or_else(|| PeriodFilter::Exact(Period::current()));

    let records = store
        .list(&RecordFilter::all().with_period(period))
        .await
        .context("Failed to list stored records")?;
    info!("Exporting {} records for {}", records.len(), period);

    let table = Denormalizer::from_config(&config)?.denormalize(&records, &period)?;

    let content = match args.output_format {
        OutputFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(&table).context("Failed to encode export")?;
            text.push('\n');
            text.into_bytes()
        }
        OutputFormat::Human | OutputFormat::Csv => {
            let mut buffer = Vec::new();
            if export.no_total_row {
                table.write_csv_without_total(&mut buffer, &config.area_column)?;
            } else {
                table.write_csv(&mut buffer, &config.area_column)?;
            }
            buffer
        }
    };
    write_output(export.output.as_deref(), &content)?;

    if let (Some(path), OutputFormat::Human) = (&export.output, args.output_format) {
        println!(
            "{} {} areas for {} to {}",
            "Exported".bright_green().bold(),
            table.rows().len().to_string().bright_white(),
            period.to_string().bright_white(),
            path.display().to_string().bright_cyan()
        );
        println!(
            "  {} {}",
            "Grand total:".bright_cyan(),
            table.grand_total().total().to_string().bright_white().bold()
        );
        if table.stats().skipped() > 0 {
            println!(
                "  {} {}",
                "Records skipped:".bright_red(),
                table.stats().skipped().to_string().bright_red().bold()
            );
        }
    }
    Ok(())
}

//! Summary command implementation
//!
//! Grouped totals over stored records, the same numbers the analytics views
//! chart.

use anyhow::Context;
use colored::*;
use serde_json::json;
use std::collections::BTreeSet;
use tracing::info;

use super::shared::{load_config, open_store};
use crate::app::models::{AreaCode, BatchId, BracketSet, NormalizedRecord, Period};
use crate::app::services::aggregator::{
    Aggregation, DimensionDomains, RecordFilter, aggregate, check_dimensions,
};
use crate::app::services::area_catalog::AreaCatalog;
use crate::app::services::record_store::RecordStore;
use crate::cli::args::{Args, OutputFormat, SummaryArgs};

pub async fn run_summary(args: &Args, summary: &SummaryArgs) -> anyhow::Result<()> {
    check_dimensions(&summary.by)?;
    let config = load_config(args)?;
    let catalog = config.catalog()?;
    let brackets = config.bracket_set()?;
    let store = open_store(args).await?;

    let filter = build_filter(summary);
    let records = store
        .list(&filter)
        .await
        .context("Failed to list stored records")?;
    info!("Summarizing {} records by {:?}", records.len(), summary.by);

    let mut aggregation = aggregate(&records, &filter, &summary.by)?;
    if summary.dense {
        let domains = dense_domains(summary, &records, &catalog, &brackets);
        aggregation = aggregation.densified(&domains);
    }
    if summary.sorted {
        aggregation = aggregation.sorted(&catalog, &brackets);
    }

    match args.output_format {
        OutputFormat::Human => print_human(&aggregation),
        OutputFormat::Json => {
            let report = json!({
                "dimensions": aggregation.dimensions(),
                "groups": aggregation.groups(),
                "total": aggregation.total(),
            });
            let text = serde_json::to_string_pretty(&report).context("Failed to encode summary")?;
            println!("{}", text);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            let header = aggregation
                .dimensions()
                .iter()
                .map(|d| d.as_str())
                .chain(std::iter::once("total"));
            writer.write_record(header).context("Failed to write header")?;
            for group in aggregation.groups() {
                let record = group
                    .key
                    .values()
                    .iter()
                    .map(ToString::to_string)
                    .chain(std::iter::once(group.total.to_string()));
                writer.write_record(record).context("Failed to write group")?;
            }
            writer.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

fn build_filter(summary: &SummaryArgs) -> RecordFilter {
    let mut filter = RecordFilter::all().with_period(summary.period);
    if !summary.areas.is_empty() {
        filter = filter.with_areas(summary.areas.iter().cloned());
    }
    if !summary.brackets.is_empty() {
        filter = filter.with_brackets(summary.brackets.iter().cloned());
    }
    if let Some(gender) = summary.gender {
        filter = filter.with_genders([gender]);
    }
    if let Some(batch_id) = &summary.batch_id {
        filter = filter.with_batch(BatchId::new(batch_id.as_str()));
    }
    filter
}

/// Catalog domains narrowed to the requested subsets; periods come from the data
fn dense_domains(
    summary: &SummaryArgs,
    records: &[NormalizedRecord],
    catalog: &AreaCatalog,
    brackets: &BracketSet,
) -> DimensionDomains {
    let periods: BTreeSet<Period> = records.iter().map(|r| r.period).collect();
    let mut domains = DimensionDomains::from_catalog(catalog, brackets, periods.into_iter().collect());

    if !summary.areas.is_empty() {
        domains.areas = summary.areas.iter().map(AreaCode::new).collect();
    }
    if !summary.brackets.is_empty() {
        domains.brackets = summary.brackets.clone();
    }
    if let Some(gender) = summary.gender {
        domains.genders = vec![gender];
    }
    domains
}

fn print_human(aggregation: &Aggregation) {
    let heading: Vec<&str> = aggregation.dimensions().iter().map(|d| d.as_str()).collect();
    println!("{}", format!("Totals by {}", heading.join(" / ")).bright_green().bold());

    let width = aggregation
        .groups()
        .iter()
        .map(|g| g.key.to_string().len())
        .max()
        .unwrap_or(0);
    for group in aggregation.groups() {
        println!(
            "  {}  {}",
            format!("{:<width$}", group.key.to_string()).bright_cyan(),
            group.total.to_string().bright_white()
        );
    }
    println!(
        "  {}  {}",
        format!("{:<width$}", "TOTAL").bright_white().bold(),
        aggregation.total().to_string().bright_white().bold()
    );
}

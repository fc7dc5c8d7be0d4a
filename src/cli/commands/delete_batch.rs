//! Delete-batch command implementation

use anyhow::Context;
use colored::*;
use serde_json::json;
use tracing::warn;

use super::shared::open_store;
use crate::app::models::BatchId;
use crate::app::services::record_store::RecordStore;
use crate::cli::args::{Args, DeleteBatchArgs, OutputFormat};

/// Remove every record one import created
pub async fn run_delete_batch(args: &Args, delete: &DeleteBatchArgs) -> anyhow::Result<()> {
    let store = open_store(args).await?;
    let batch_id = BatchId::new(delete.batch_id.trim());

    let removed = store
        .delete_by_batch(&batch_id)
        .await
        .with_context(|| format!("Failed to delete batch {}", batch_id))?;
    if removed == 0 {
        warn!("No records found for batch {}", batch_id);
    }

    match args.output_format {
        OutputFormat::Json => println!("{}", json!({ "batch_id": batch_id, "removed": removed })),
        OutputFormat::Csv => println!("batch_id,removed\n{},{}", batch_id, removed),
        OutputFormat::Human => println!(
            "{} {} records from batch {}",
            "Deleted".bright_green().bold(),
            removed.to_string().bright_white().bold(),
            batch_id.as_str().bright_cyan()
        ),
    }
    Ok(())
}

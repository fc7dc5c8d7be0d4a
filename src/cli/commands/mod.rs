//! Command implementations for the census tally CLI
//!
//! Each subcommand lives in its own module:
//! - `import`: validate uploads and persist them into the record store
//! - `validate`: dry-run validation without writing
//! - `export`: rebuild the wide table for a period
//! - `summary`: grouped totals for analytics views
//! - `template`: blank upload template
//! - `delete_batch`: undo one import

pub mod delete_batch;
pub mod export;
pub mod import;
pub mod shared;
pub mod summary;
pub mod template;
pub mod validate;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Args, Commands};
use shared::setup_logging;

/// Dispatch to the subcommand handler
///
/// Returns `Ok(())` without doing anything when no subcommand was given;
/// `main` shows help in that case.
pub async fn run(args: Args, cancellation: CancellationToken) -> anyhow::Result<()> {
    let Some(command) = &args.command else {
        return Ok(());
    };
    setup_logging(&args)?;

    match command {
        Commands::Import(import) => import::run_import(&args, import, cancellation).await,
        Commands::Validate(validate) => validate::run_validate(&args, validate).await,
        Commands::Export(export) => export::run_export(&args, export).await,
        Commands::Summary(summary) => summary::run_summary(&args, summary).await,
        Commands::Template(template) => template::run_template(&args, template).await,
        Commands::DeleteBatch(delete) => delete_batch::run_delete_batch(&args, delete).await,
    }
}

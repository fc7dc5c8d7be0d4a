//! Import pipeline orchestration
//!
//! parse → validate → normalize → persist, one awaited `create` per record in
//! row order then emission order. Parse errors abort the attempt, validation
//! issues reject it without writing anything, and store failures are caught
//! per record while the loop carries on.

use std::path::PathBuf;
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::result::{BatchResult, FailedRecord, ImportOutcome};
use super::stage::ImportStage;
use crate::app::models::{BatchId, NewRecord, NormalizedRecord, Period};
use crate::app::services::consistency_validator::ConsistencyValidator;
use crate::app::services::normalizer::Normalizer;
use crate::app::services::record_store::RecordStore;
use crate::app::services::wide_format_parser::{ParseResult, WideFormatParser};
use crate::config::EngineConfig;
use crate::{Error, Result};

/// Where an upload comes from
#[derive(Debug, Clone)]
pub enum ImportSource {
    /// A CSV file on disk
    File(PathBuf),
    /// CSV content already in memory
    Inline { name: String, content: String },
}

impl ImportSource {
    pub fn inline(name: impl Into<String>, content: impl Into<String>) -> Self {
        ImportSource::Inline {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ImportSource::File(path) => path.display().to_string(),
            ImportSource::Inline { name, .. } => name.clone(),
        }
    }
}

/// Runs uploads through the full import lifecycle against one record store
pub struct ImportPipeline {
    store: Arc<dyn RecordStore>,
    parser: WideFormatParser,
    validator: ConsistencyValidator,
    cancellation: Option<CancellationToken>,
    show_progress: bool,
}

impl ImportPipeline {
    pub fn new(store: Arc<dyn RecordStore>, validator: ConsistencyValidator) -> Self {
        Self {
            store,
            parser: WideFormatParser::new(),
            validator,
            cancellation: None,
            show_progress: false,
        }
    }

    /// Build a pipeline whose validator follows the engine configuration
    pub fn from_config(store: Arc<dyn RecordStore>, config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(store, ConsistencyValidator::from_config(config)?))
    }

    /// Stop issuing writes once this token is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Show a progress bar while persisting
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn validator(&self) -> &ConsistencyValidator {
        &self.validator
    }

    /// Run one upload for an explicit reporting period
    ///
    /// A fresh batch id is generated when none is given.
    pub async fn run(
        &self,
        source: &ImportSource,
        period: Period,
        batch_id: Option<BatchId>,
    ) -> Result<ImportOutcome> {
        let mut stage = ImportStage::Uploaded;
        info!("Importing {} for {}", source.name(), period);

        let parsed = self.parse(source).await?;
        advance(&mut stage, ImportStage::Parsed)?;

        let report = self.validator.validate(&parsed.rows);
        if !report.is_clean() {
            advance(&mut stage, ImportStage::ValidatedWithErrors)?;
            warn!(
                "Rejected {}: {} validation issues",
                source.name(),
                report.issue_count()
            );
            return Ok(ImportOutcome::Rejected {
                issues: report.issues,
                rows_checked: report.rows_checked,
            });
        }
        advance(&mut stage, ImportStage::ValidatedClean)?;

        let batch_id = batch_id.unwrap_or_else(BatchId::generate);
        let normalizer = Normalizer::new(self.validator.brackets().clone(), period)
            .with_batch_id(batch_id.clone());
        let records = normalizer.normalize_rows(&report.rows);
        advance(&mut stage, ImportStage::Normalized)?;

        advance(&mut stage, ImportStage::Persisting)?;
        let mut batch = BatchResult::new(batch_id, period, report.rows.len());
        self.persist(records, &mut batch).await;
        advance(&mut stage, ImportStage::Persisted)?;

        info!("{}", batch.summary());
        Ok(ImportOutcome::Completed(batch))
    }

    /// Parse only; structural problems come back as errors
    pub async fn parse(&self, source: &ImportSource) -> Result<ParseResult> {
        let parsed = match source {
            ImportSource::File(path) => self.parser.parse_file(path).await?,
            ImportSource::Inline { name, content } => self.parser.parse_str(content, name)?,
        };

        let ignored = parsed
            .column_mapping
            .unrecognized_columns(self.validator.brackets(), self.validator.area_column());
        if !ignored.is_empty() {
            debug!("Ignoring unrecognized columns: {:?}", ignored);
        }
        Ok(parsed)
    }

    /// Write records one at a time, catching failures per record
    pub async fn persist(&self, records: Vec<NewRecord>, batch: &mut BatchResult) {
        let progress = self.progress_bar(records.len() as u64);
        let total = records.len();

        for (index, record) in records.into_iter().enumerate() {
            if self
                .cancellation
                .as_ref()
                .is_some_and(CancellationToken::is_cancelled)
            {
                batch.cancelled = true;
                batch.not_attempted = total - index;
                warn!(
                    "Import cancelled after {} of {} records; {} not attempted",
                    index, total, batch.not_attempted
                );
                break;
            }

            match self.store.create(record.clone()).await {
                Ok(id) => batch.succeeded.push(NormalizedRecord::from_new(id, record)),
                Err(error) => {
                    warn!(
                        "Failed to store {} {} {}: {}",
                        record.area, record.bracket, record.gender, error
                    );
                    batch.failed.push(FailedRecord {
                        input: record,
                        error,
                    });
                }
            }

            if let Some(pb) = &progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
    }

    fn progress_bar(&self, total: u64) -> Option<ProgressBar> {
        if !self.show_progress || total == 0 {
            return None;
        }
        let pb = ProgressBar::new(total);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb.set_message("Storing records...");
        Some(pb)
    }
}

fn advance(stage: &mut ImportStage, next: ImportStage) -> Result<()> {
    if !stage.can_transition_to(next) {
        return Err(Error::processing_interrupted(format!(
            "Illegal import stage transition from {} to {}",
            stage, next
        )));
    }
    debug!("Import stage: {} -> {}", stage, next);
    *stage = next;
    Ok(())
}

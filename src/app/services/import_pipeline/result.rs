//! Batch results for the per-record write loop

use crate::app::models::{BatchId, NewRecord, NormalizedRecord, Period, ValidationIssue};
use crate::app::services::record_store::StoreError;

/// A record whose `create` call failed
#[derive(Debug)]
pub struct FailedRecord {
    pub input: NewRecord,
    pub error: StoreError,
}

impl FailedRecord {
    /// One-line description naming the record and the error
    pub fn message(&self) -> String {
        format!(
            "{} {} {}: {}",
            self.input.area, self.input.bracket, self.input.gender, self.error
        )
    }
}

/// Outcome of persisting one normalized batch
///
/// Writes are independent: `succeeded` records stay in the store even when
/// others failed or the import was cancelled.
#[derive(Debug)]
pub struct BatchResult {
    pub batch_id: BatchId,
    pub period: Period,
    /// Rows that were normalized into this batch
    pub rows_imported: usize,
    pub succeeded: Vec<NormalizedRecord>,
    pub failed: Vec<FailedRecord>,
    /// Records never sent to the store because the import was cancelled
    pub not_attempted: usize,
    pub cancelled: bool,
}

impl BatchResult {
    pub fn new(batch_id: BatchId, period: Period, rows_imported: usize) -> Self {
        Self {
            batch_id,
            period,
            rows_imported,
            succeeded: Vec::new(),
            failed: Vec::new(),
            not_attempted: 0,
            cancelled: false,
        }
    }

    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Records sent to the store, whatever the outcome
    pub fn attempted(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when every record landed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.not_attempted == 0 && !self.cancelled
    }

    /// Sum of the counts that landed
    pub fn persisted_population(&self) -> u64 {
        self.succeeded.iter().map(|r| r.count).sum()
    }

    /// At most `limit` failure messages, in write order
    pub fn error_messages(&self, limit: usize) -> Vec<String> {
        self.failed
            .iter()
            .take(limit)
            .map(FailedRecord::message)
            .collect()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Batch {} for {}: {} rows, {} records created, {} failed",
            self.batch_id,
            self.period,
            self.rows_imported,
            self.success_count(),
            self.failure_count()
        );
        if self.cancelled {
            summary.push_str(&format!(", cancelled with {} not attempted", self.not_attempted));
        }
        summary
    }
}

/// Result of one import attempt that got past parsing
#[derive(Debug)]
pub enum ImportOutcome {
    /// Validation found issues; nothing was written
    Rejected {
        issues: Vec<ValidationIssue>,
        rows_checked: usize,
    },
    /// Validation passed and the write loop ran
    Completed(BatchResult),
}

impl ImportOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, ImportOutcome::Rejected { .. })
    }

    pub fn batch(&self) -> Option<&BatchResult> {
        match self {
            ImportOutcome::Completed(batch) => Some(batch),
            ImportOutcome::Rejected { .. } => None,
        }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            ImportOutcome::Rejected { issues, .. } => issues,
            ImportOutcome::Completed(_) => &[],
        }
    }
}

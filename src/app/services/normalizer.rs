//! Normalizer: wide rows to sparse normalized records
//!
//! Each validated row expands into one record per non-zero (bracket, gender)
//! cell. Brackets are visited in canonical order and genders MALE then
//! FEMALE, so emission order is deterministic. Zero cells produce nothing,
//! which keeps storage sparse; readers treat absent combinations as zero.

use tracing::debug;

use crate::app::models::{BatchId, BracketSet, Gender, NewRecord, Period, WideRow};

/// Expands validated wide rows for one reporting period
#[derive(Debug, Clone)]
pub struct Normalizer {
    brackets: BracketSet,
    period: Period,
    batch_id: Option<BatchId>,
}

impl Normalizer {
    pub fn new(brackets: BracketSet, period: Period) -> Self {
        Self {
            brackets,
            period,
            batch_id: None,
        }
    }

    /// Tag every emitted record with a batch identifier
    pub fn with_batch_id(mut self, batch_id: BatchId) -> Self {
        self.batch_id = Some(batch_id);
        self
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Records for one row, in emission order
    pub fn normalize_row(&self, row: &WideRow) -> Vec<NewRecord> {
        normalize(row, &self.brackets, self.period, self.batch_id.as_ref())
    }

    /// Records for all rows, in row order then emission order
    pub fn normalize_rows(&self, rows: &[WideRow]) -> Vec<NewRecord> {
        let records: Vec<NewRecord> = rows.iter().flat_map(|row| self.normalize_row(row)).collect();
        debug!(
            "Normalized {} rows into {} records for {}",
            rows.len(),
            records.len(),
            self.period
        );
        records
    }
}

/// Expand one row into records, skipping zero cells
pub fn normalize(
    row: &WideRow,
    brackets: &BracketSet,
    period: Period,
    batch_id: Option<&BatchId>,
) -> Vec<NewRecord> {
    let mut records = Vec::new();

    for (index, bracket) in brackets.iter().enumerate() {
        for gender in Gender::ALL {
            let count = row.count(index, gender);
            if count == 0 {
                continue;
            }
            records.push(NewRecord {
                area: row.area.clone(),
                bracket: bracket.code.clone(),
                gender,
                period,
                count,
                batch_id: batch_id.cloned(),
            });
        }
    }

    records
}

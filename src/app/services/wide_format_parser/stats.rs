//! Parsing statistics and result structures for wide-format uploads

use super::column_mapping::ColumnMapping;
use crate::app::models::RawRow;

/// Parsing result with raw rows and basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Display name of the parsed source (usually the file path)
    pub source_name: String,

    /// Header index and classification
    pub column_mapping: ColumnMapping,

    /// Non-blank data rows in file order
    pub rows: Vec<RawRow>,

    /// Basic parsing statistics
    pub stats: ParseStats,
}

/// Simple parsing statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Total number of data records encountered, blank ones included
    pub total_records: usize,

    /// Number of rows handed on to validation
    pub rows_parsed: usize,

    /// Number of fully blank rows skipped
    pub blank_rows_skipped: usize,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of records that carried data, as a percentage
    pub fn data_row_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.rows_parsed as f64 / self.total_records as f64) * 100.0
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Parse Summary: {} records, {} data rows ({:.1}%), {} blank rows skipped",
            self.total_records,
            self.rows_parsed,
            self.data_row_rate(),
            self.blank_rows_skipped
        )
    }
}

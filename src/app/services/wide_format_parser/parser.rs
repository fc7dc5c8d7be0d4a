//! Core wide-format parser implementation
//!
//! Handles file reading, header extraction and record iteration. Blank
//! spreadsheet rows are skipped but still consume a row number so that
//! validation issues point at the row a user sees in their spreadsheet.
//! That includes truly empty lines, which the csv reader drops silently;
//! they are recovered from the reader's byte offsets.

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use super::column_mapping::ColumnMapping;
use super::stats::{ParseResult, ParseStats};
use crate::app::models::RawRow;
use crate::{Error, Result};

/// Byte-order mark written by some spreadsheet exporters
const UTF8_BOM: char = '\u{feff}';

/// Parser for wide-format CSV uploads
#[derive(Debug, Clone, Default)]
pub struct WideFormatParser;

impl WideFormatParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a wide-format file from disk
    pub async fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        info!("Parsing wide-format file: {}", file_path.display());

        let content = tokio::fs::read(file_path).await.map_err(|e| {
            Error::io(format!("Failed to read file {}", file_path.display()), e)
        })?;

        self.parse_bytes(&content, &file_path.display().to_string())
    }

    /// Parse wide-format content held in memory
    pub fn parse_str(&self, content: &str, source_name: &str) -> Result<ParseResult> {
        self.parse_bytes(content.as_bytes(), source_name)
    }

    /// Parse wide-format content from raw bytes
    pub fn parse_bytes(&self, content: &[u8], source_name: &str) -> Result<ParseResult> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(content);

        let headers = csv_reader.headers().map_err(|e| {
            Error::csv_parsing(source_name, "Failed to read header row", Some(e))
        })?;

        let headers: Vec<String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches(UTF8_BOM) } else { h };
                h.trim().to_string()
            })
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(Error::wide_format(source_name, "File has no header row"));
        }

        let column_mapping = ColumnMapping::analyze(&headers, source_name)?;
        let (named, bracket_cells, grand_totals) = column_mapping.stats();
        debug!(
            "Header has {} named columns ({} bracket cells, {} grand totals)",
            named, bracket_cells, grand_totals
        );

        let mut stats = ParseStats::new();
        let mut rows = Vec::new();
        let mut record = csv::StringRecord::new();
        let mut offset = byte_offset(&csv_reader);

        loop {
            let read = csv_reader.read_record(&mut record);
            let next_offset = byte_offset(&csv_reader);
            let empty_lines = skipped_empty_lines(content, offset, next_offset);
            offset = next_offset;

            let row_number = stats.total_records + empty_lines + 1;
            let has_record = read.map_err(|e| {
                Error::csv_parsing(
                    source_name,
                    format!("Malformed data row {}", row_number),
                    Some(e),
                )
            })?;
            if !has_record {
                break;
            }

            stats.total_records = row_number;
            if empty_lines > 0 {
                stats.blank_rows_skipped += empty_lines;
                debug!("Skipped {} empty lines before row {}", empty_lines, row_number);
            }

            if record.iter().all(|field| field.trim().is_empty()) {
                stats.blank_rows_skipped += 1;
                debug!("Skipped blank row {}", row_number);
                continue;
            }

            let values: HashMap<String, String> = column_mapping
                .columns()
                .iter()
                .zip(record.iter())
                .filter(|(name, _)| !name.is_empty())
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect();

            rows.push(RawRow::new(row_number, values));
            stats.rows_parsed += 1;
        }

        if rows.is_empty() {
            return Err(Error::wide_format(source_name, "File contains no data rows"));
        }

        info!(
            "Parsed {} rows from {} ({} blank rows skipped)",
            stats.rows_parsed, source_name, stats.blank_rows_skipped
        );

        Ok(ParseResult {
            source_name: source_name.to_string(),
            column_mapping,
            rows,
            stats,
        })
    }
}

fn byte_offset(reader: &csv::Reader<&[u8]>) -> usize {
    usize::try_from(reader.position().byte()).unwrap_or(usize::MAX)
}

/// Count empty lines between two reader offsets, before the next record starts
///
/// A record ended by CRLF leaves its `\n` for the next read, so an `\n`
/// directly after `\r` closes the previous line rather than opening one.
fn skipped_empty_lines(content: &[u8], start: usize, end: usize) -> usize {
    let end = end.min(content.len());
    let Some(segment) = content.get(start..end) else {
        return 0;
    };

    let mut previous = start.checked_sub(1).and_then(|i| content.get(i)).copied();
    let mut lines = 0;
    for &byte in segment {
        match byte {
            b'\n' if previous == Some(b'\r') => {}
            b'\n' | b'\r' => lines += 1,
            _ => break,
        }
        previous = Some(byte);
    }
    lines
}

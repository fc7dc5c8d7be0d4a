//! Wide-format parser for uploaded population tables
//!
//! Turns an uploaded CSV file into a sequence of raw row maps (column name to
//! raw cell value). The parser performs no semantic interpretation: counts
//! stay strings and area codes are not checked. Structural problems (an
//! unreadable file, a missing header, ragged rows, duplicate column names)
//! are fatal for the whole upload.
//!
//! ## Architecture
//!
//! - [`parser`] - File reading and CSV record iteration
//! - [`column_mapping`] - Header indexing and column classification
//! - [`field_parsers`] - Cell interpretation helpers used by the validator
//! - [`stats`] - Parse statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use census_tally::app::services::wide_format_parser::WideFormatParser;
//!
//! # fn example() -> census_tally::Result<()> {
//! let parser = WideFormatParser::new();
//! let result = parser.parse_str("BARANGAY,UNDER 1 M\nAplaya,10\n", "upload.csv")?;
//! assert_eq!(result.rows.len(), 1);
//! assert_eq!(result.rows[0].get("UNDER 1 M"), Some("10"));
//! # Ok(())
//! # }
//! ```

pub mod column_mapping;
pub mod field_parsers;
pub mod parser;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use column_mapping::{CellPart, ColumnKind, ColumnMapping};
pub use field_parsers::{CellValue, parse_count, parse_text};
pub use parser::WideFormatParser;
pub use stats::{ParseResult, ParseStats};

//! Cell interpretation helpers for wide-format rows
//!
//! The parser keeps cells as raw strings; these helpers give the validator a
//! single definition of what a valid count looks like. Blank cells are
//! missing, never zero.

use crate::constants::MAX_CELL_COUNT;

/// Interpretation of one raw count cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue {
    /// Column absent or cell blank
    Missing,
    /// Not a number at all
    NotANumber,
    /// Numeric but below zero
    Negative,
    /// Numeric with a fractional part
    Fractional,
    /// A whole number above `MAX_CELL_COUNT`
    TooLarge,
    /// A non-negative whole number
    Count(u64),
}

impl CellValue {
    pub fn count(self) -> Option<u64> {
        match self {
            CellValue::Count(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_missing(self) -> bool {
        self == CellValue::Missing
    }
}

/// Interpret a raw cell as a population count
///
/// Accepts plain integers as well as whole-valued decimals such as `12.0`,
/// which spreadsheet exports commonly produce. Counts above `MAX_CELL_COUNT`
/// are `TooLarge`.
pub fn parse_count(raw: Option<&str>) -> CellValue {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return CellValue::Missing;
    };

    if let Ok(count) = value.parse::<u64>() {
        return bounded(count);
    }

    match value.parse::<f64>() {
        Ok(number) if !number.is_finite() => CellValue::NotANumber,
        Ok(number) if number < 0.0 => CellValue::Negative,
        Ok(number) if number.fract() != 0.0 => CellValue::Fractional,
        Ok(number) if number > MAX_CELL_COUNT as f64 => CellValue::TooLarge,
        Ok(number) => bounded(number as u64),
        Err(_) => CellValue::NotANumber,
    }
}

fn bounded(count: u64) -> CellValue {
    if count > MAX_CELL_COUNT {
        CellValue::TooLarge
    } else {
        CellValue::Count(count)
    }
}

/// Trimmed, non-empty text value of a cell
pub fn parse_text(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

//! Test utilities for consistency validator testing

use std::collections::HashMap;

use crate::app::models::{BracketSet, RawRow};
use crate::app::services::area_catalog::AreaCatalog;
use crate::app::services::consistency_validator::ConsistencyValidator;

mod report_tests;

/// Two-bracket set keeping fixtures small
pub fn test_brackets() -> BracketSet {
    BracketSet::from_pairs(&[("UNDER_1", "UNDER 1"), ("1_4", "1-4")]).unwrap()
}

pub fn test_catalog() -> AreaCatalog {
    AreaCatalog::new(["Aplaya", "Balabag", "Binaton"]).unwrap()
}

pub fn test_validator() -> ConsistencyValidator {
    ConsistencyValidator::new(test_catalog(), test_brackets(), "BARANGAY")
}

/// Build a raw row from `(column, value)` pairs
pub fn raw_row(row_number: usize, cells: &[(&str, &str)]) -> RawRow {
    let values: HashMap<String, String> = cells
        .iter()
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .collect();
    RawRow::new(row_number, values)
}

/// A fully valid row for the two-bracket set
pub fn valid_row(row_number: usize, area: &str) -> RawRow {
    raw_row(
        row_number,
        &[
            ("BARANGAY", area),
            ("UNDER 1 M", "10"),
            ("UNDER 1 F", "8"),
            ("UNDER 1 TOTAL", "18"),
            ("1-4 M", "3"),
            ("1-4 F", "0"),
            ("1-4 TOTAL", "3"),
        ],
    )
}

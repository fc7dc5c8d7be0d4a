//! Test utilities for wide-format parser testing
//!
//! Shared fixtures used across the parser test modules.

use std::io::Write;
use tempfile::NamedTempFile;

mod field_parser_tests;

/// Two-bracket wide table with one valid row per area
pub fn create_test_wide_csv() -> String {
    "BARANGAY,UNDER 1 M,UNDER 1 F,UNDER 1 TOTAL,1-4 M,1-4 F,1-4 TOTAL,TOTAL M,TOTAL F,TOTAL\n\
     Aplaya,10,8,18,3,0,3,13,8,21\n\
     Balabag,0,0,0,1,2,3,1,2,3\n"
        .to_string()
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{}", content).unwrap();
    temp_file
}

//! Tests for count cell interpretation

use crate::app::services::wide_format_parser::{CellValue, parse_count, parse_text};

#[test]
fn test_parse_count_accepts_whole_numbers() {
    assert_eq!(parse_count(Some("10")), CellValue::Count(10));
    assert_eq!(parse_count(Some(" 0 ")), CellValue::Count(0));
    assert_eq!(parse_count(Some("12.0")), CellValue::Count(12));
}

#[test]
fn test_parse_count_blank_is_missing_not_zero() {
    assert_eq!(parse_count(None), CellValue::Missing);
    assert_eq!(parse_count(Some("")), CellValue::Missing);
    assert_eq!(parse_count(Some("   ")), CellValue::Missing);
    assert!(parse_count(Some("")).is_missing());
    assert_eq!(parse_count(Some("")).count(), None);
}

#[test]
fn test_parse_count_rejects_invalid_values() {
    assert_eq!(parse_count(Some("abc")), CellValue::NotANumber);
    assert_eq!(parse_count(Some("-3")), CellValue::Negative);
    assert_eq!(parse_count(Some("2.5")), CellValue::Fractional);
    assert_eq!(parse_count(Some("NaN")), CellValue::NotANumber);
    assert_eq!(parse_count(Some("inf")), CellValue::NotANumber);
}

#[test]
fn test_parse_text() {
    assert_eq!(parse_text(Some("  Aplaya ")), Some("Aplaya"));
    assert_eq!(parse_text(Some("  ")), None);
    assert_eq!(parse_text(None), None);
}

#[test]
fn test_parse_count_upper_bound() {
    use crate::constants::MAX_CELL_COUNT;

    let max = MAX_CELL_COUNT.to_string();
    let above = (MAX_CELL_COUNT + 1).to_string();
    assert_eq!(parse_count(Some(&max)), CellValue::Count(MAX_CELL_COUNT));
    assert_eq!(parse_count(Some(&above)), CellValue::TooLarge);
    assert_eq!(parse_count(Some("18446744073709551615")), CellValue::TooLarge);
    assert_eq!(parse_count(Some("99999999999999999999")), CellValue::TooLarge);
    assert_eq!(parse_count(Some("1e13")), CellValue::TooLarge);
}

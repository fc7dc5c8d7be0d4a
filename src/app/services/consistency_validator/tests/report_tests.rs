//! Tests for validation report helpers

use super::*;
use crate::app::models::IssueKind;
use crate::app::services::consistency_validator::ValidationReport;

#[test]
fn test_empty_report_is_clean() {
    let report = ValidationReport::default();
    assert!(report.is_clean());
    assert_eq!(report.rows_with_issues(), 0);
    assert_eq!(report.summary(), "Validation passed: 0 rows checked");
}

#[test]
fn test_report_counts_distinct_rows() {
    let rows = vec![
        raw_row(1, &[("BARANGAY", "Nowhere")]),
        valid_row(2, "Aplaya"),
    ];
    let report = test_validator().validate(&rows);

    // Row 1: unknown area plus four missing cells
    assert_eq!(report.issue_count(), 5);
    assert_eq!(report.rows_with_issues(), 1);
    assert_eq!(report.issues_for_row(1).count(), 5);
    assert_eq!(report.issues_for_row(2).count(), 0);
    assert_eq!(
        report.issues_for_row(1).next().map(|i| i.kind),
        Some(IssueKind::UnknownArea)
    );
    assert_eq!(report.summary(), "Validation failed: 5 issues in 1 of 2 rows");
}

#[test]
fn test_into_clean_rows() {
    let report = test_validator().validate(&[valid_row(1, "Aplaya")]);
    let rows = report.into_clean_rows().unwrap();
    assert_eq!(rows.len(), 1);
}

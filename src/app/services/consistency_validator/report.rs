//! Validation report returned for one upload

use crate::app::models::{ValidationIssue, WideRow};
use std::collections::BTreeSet;

/// Outcome of validating every row of one upload
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Typed rows that passed every check, in file order
    pub rows: Vec<WideRow>,

    /// All issues found, ordered by row then by detection order
    pub issues: Vec<ValidationIssue>,

    /// Number of raw rows examined
    pub rows_checked: usize,
}

impl ValidationReport {
    /// True when no issue was found and the upload may be normalized
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Number of distinct rows carrying at least one issue
    pub fn rows_with_issues(&self) -> usize {
        self.issues
            .iter()
            .map(|issue| issue.row)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Issues reported against one row
    pub fn issues_for_row(&self, row: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |issue| issue.row == row)
    }

    /// Split into the typed rows, failing with the issues if any were found
    pub fn into_clean_rows(self) -> Result<Vec<WideRow>, Vec<ValidationIssue>> {
        if self.issues.is_empty() {
            Ok(self.rows)
        } else {
            Err(self.issues)
        }
    }

    /// Get a summary of the validation
    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!("Validation passed: {} rows checked", self.rows_checked)
        } else {
            format!(
                "Validation failed: {} issues in {} of {} rows",
                self.issue_count(),
                self.rows_with_issues(),
                self.rows_checked
            )
        }
    }
}

//! Core consistency validator implementation

use tracing::{debug, info};

use super::report::ValidationReport;
use crate::app::models::{
    AreaCode, BracketCells, BracketSet, Gender, IssueKind, RawRow, ValidationIssue, WideRow,
};
use crate::app::services::area_catalog::AreaCatalog;
use crate::app::services::wide_format_parser::{CellValue, parse_count, parse_text};
use crate::config::EngineConfig;
use crate::constants::{MAX_CELL_COUNT, grand_total_columns};
use crate::Result;

/// Validator for wide-format rows against an injected catalog and bracket set
#[derive(Debug, Clone)]
pub struct ConsistencyValidator {
    catalog: AreaCatalog,
    brackets: BracketSet,
    area_column: String,
    validate_grand_totals: bool,
}

impl ConsistencyValidator {
    /// Create a validator with grand-total checks disabled
    pub fn new(catalog: AreaCatalog, brackets: BracketSet, area_column: impl Into<String>) -> Self {
        Self {
            catalog,
            brackets,
            area_column: area_column.into(),
            validate_grand_totals: false,
        }
    }

    /// Build a validator from engine configuration
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(
            config.catalog()?,
            config.bracket_set()?,
            config.area_column.clone(),
        )
        .with_grand_total_validation(config.validate_grand_totals))
    }

    /// Enable or disable checks of the `TOTAL M` / `TOTAL F` / `TOTAL` cells
    pub fn with_grand_total_validation(mut self, enabled: bool) -> Self {
        self.validate_grand_totals = enabled;
        self
    }

    pub fn catalog(&self) -> &AreaCatalog {
        &self.catalog
    }

    pub fn brackets(&self) -> &BracketSet {
        &self.brackets
    }

    pub fn area_column(&self) -> &str {
        &self.area_column
    }

    /// Validate every row, collecting all issues
    pub fn validate(&self, rows: &[RawRow]) -> ValidationReport {
        let mut report = ValidationReport {
            rows_checked: rows.len(),
            ..Default::default()
        };

        for row in rows {
            let before = report.issues.len();
            let wide_row = self.validate_row(row, &mut report.issues);

            match wide_row {
                Some(wide_row) if report.issues.len() == before => report.rows.push(wide_row),
                _ => debug!(
                    "Row {} has {} issues",
                    row.row_number,
                    report.issues.len() - before
                ),
            }
        }

        info!("{}", report.summary());
        report
    }

    /// Validate one row, appending its issues; returns the typed row when it could be built
    pub fn validate_row(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) -> Option<WideRow> {
        let area = self.check_area(row, issues);

        // Required cells, all brackets, MALE then FEMALE
        let gender_cells: Vec<[CellValue; 2]> = self
            .brackets
            .iter()
            .map(|bracket| {
                Gender::ALL.map(|gender| {
                    let column = bracket.gender_column(gender);
                    let raw = row.get(&column);
                    let value = parse_count(raw);
                    self.check_count(row.row_number, &column, raw, value, issues);
                    value
                })
            })
            .collect();

        // Bracket totals
        let mut cells = Vec::with_capacity(self.brackets.len());
        for (bracket, [male, female]) in self.brackets.iter().zip(&gender_cells) {
            let column = bracket.total_column();
            let raw = row.get(&column);
            let declared = parse_count(raw);
            if !declared.is_missing() {
                self.check_count(row.row_number, &column, raw, declared, issues);
            }

            if let (Some(m), Some(f), Some(d)) = (male.count(), female.count(), declared.count()) {
                check_sum(
                    row.row_number,
                    &column,
                    m + f,
                    d,
                    IssueKind::TotalMismatch,
                    issues,
                );
            }

            cells.push(BracketCells {
                male: male.count(),
                female: female.count(),
                total: declared.count(),
            });
        }

        let grand_total = self.check_grand_totals(row, &cells, issues);

        let all_counts = cells.iter().all(|c| c.male.is_some() && c.female.is_some());
        match area {
            Some(area) if all_counts => Some(WideRow {
                row_number: row.row_number,
                area,
                cells,
                grand_total,
            }),
            _ => None,
        }
    }

    fn check_area(&self, row: &RawRow, issues: &mut Vec<ValidationIssue>) -> Option<AreaCode> {
        let raw = row.get(&self.area_column);
        let Some(value) = parse_text(raw) else {
            issues.push(ValidationIssue::new(
                row.row_number,
                &self.area_column,
                IssueKind::MissingValue,
                "Area is missing",
                raw.map(str::to_string),
            ));
            return None;
        };

        match self.catalog.get(value) {
            Some(area) => Some(area.clone()),
            None => {
                issues.push(ValidationIssue::new(
                    row.row_number,
                    &self.area_column,
                    IssueKind::UnknownArea,
                    format!(
                        "Invalid area '{}': must be one of {}",
                        value,
                        self.catalog.describe()
                    ),
                    Some(value.to_string()),
                ));
                None
            }
        }
    }

    fn check_count(
        &self,
        row_number: usize,
        column: &str,
        raw: Option<&str>,
        value: CellValue,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let raw_value = raw.map(|r| r.trim().to_string());
        let (kind, message) = match value {
            CellValue::Count(_) => return,
            CellValue::Missing => (IssueKind::MissingValue, "Value is missing".to_string()),
            CellValue::Fractional => (
                IssueKind::InvalidNumber,
                format!("Value '{}' must be a whole number", raw.unwrap_or("").trim()),
            ),
            CellValue::TooLarge => (
                IssueKind::InvalidNumber,
                format!(
                    "Value '{}' exceeds the maximum count of {}",
                    raw.unwrap_or("").trim(),
                    MAX_CELL_COUNT
                ),
            ),
            CellValue::NotANumber | CellValue::Negative => (
                IssueKind::InvalidNumber,
                format!(
                    "Value '{}' must be a non-negative number",
                    raw.unwrap_or("").trim()
                ),
            ),
        };
        issues.push(ValidationIssue::new(row_number, column, kind, message, raw_value));
    }

    fn check_grand_totals(
        &self,
        row: &RawRow,
        cells: &[BracketCells],
        issues: &mut Vec<ValidationIssue>,
    ) -> BracketCells {
        let columns = [
            grand_total_columns::MALE,
            grand_total_columns::FEMALE,
            grand_total_columns::TOTAL,
        ];
        let declared =
            columns.map(|column| (column, row.get(column), parse_count(row.get(column))));
        let grand_total = BracketCells {
            male: declared[0].2.count(),
            female: declared[1].2.count(),
            total: declared[2].2.count(),
        };

        if !self.validate_grand_totals {
            return grand_total;
        }

        for (column, raw, value) in &declared {
            if !value.is_missing() {
                self.check_count(row.row_number, column, *raw, *value, issues);
            }
        }

        let sum_of = |gender: Gender| -> Option<u64> {
            cells.iter().try_fold(0u64, |acc, c| {
                let count = match gender {
                    Gender::Male => c.male?,
                    Gender::Female => c.female?,
                };
                Some(acc + count)
            })
        };
        let male_sum = sum_of(Gender::Male);
        let female_sum = sum_of(Gender::Female);
        let both_sum = male_sum.zip(female_sum).map(|(m, f)| m + f);

        let computed_sums = [male_sum, female_sum, both_sum];
        for ((column, _, value), computed) in declared.iter().zip(computed_sums) {
            if let (Some(computed), Some(declared)) = (computed, value.count()) {
                check_sum(
                    row.row_number,
                    column,
                    computed,
                    declared,
                    IssueKind::GrandTotalMismatch,
                    issues,
                );
            }
        }

        grand_total
    }
}

/// Compare a declared total against the computed one; zero means "not supplied"
fn check_sum(
    row_number: usize,
    column: &str,
    computed: u64,
    declared: u64,
    kind: IssueKind,
    issues: &mut Vec<ValidationIssue>,
) {
    if declared == 0 || declared == computed {
        return;
    }
    issues.push(ValidationIssue::new(
        row_number,
        column,
        kind,
        format!("Total mismatch: computed {} but declared {}", computed, declared),
        Some(declared.to_string()),
    ));
}

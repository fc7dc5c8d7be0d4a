//! Wide export table and its construction from normalized records

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::app::models::{BracketSet, Gender, NormalizedRecord};
use crate::app::services::aggregator::PeriodFilter;
use crate::app::services::area_catalog::AreaCatalog;
use crate::config::EngineConfig;
use crate::constants::GRAND_TOTAL_ROW_LABEL;
use crate::{Error, Result};

/// Male and female counts of one bracket; the total is always derived
///
/// Derived sums saturate, but a [`WideTable`] is only built once its
/// grand-total row is known to fit in `u64`, so no sum inside a table ever
/// reaches the limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportCells {
    pub male: u64,
    pub female: u64,
}

impl ExportCells {
    pub fn new(male: u64, female: u64) -> Self {
        Self { male, female }
    }

    pub fn total(&self) -> u64 {
        self.male.saturating_add(self.female)
    }

    pub fn count(&self, gender: Gender) -> u64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }

    /// Add a count to one gender; `None` on overflow, leaving the cell unchanged
    fn checked_add(&mut self, gender: Gender, count: u64) -> Option<()> {
        let cell = match gender {
            Gender::Male => &mut self.male,
            Gender::Female => &mut self.female,
        };
        *cell = cell.checked_add(count)?;
        Some(())
    }
}

/// One fully populated output row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WideTableRow {
    /// Area code, or the grand-total label
    pub label: String,
    /// Indexed by bracket position
    pub cells: Vec<ExportCells>,
}

impl WideTableRow {
    pub fn zeroed(label: impl Into<String>, brackets: usize) -> Self {
        Self {
            label: label.into(),
            cells: vec![ExportCells::default(); brackets],
        }
    }

    pub fn total_male(&self) -> u64 {
        self.cells.iter().map(|c| c.male).fold(0, u64::saturating_add)
    }

    pub fn total_female(&self) -> u64 {
        self.cells.iter().map(|c| c.female).fold(0, u64::saturating_add)
    }

    pub fn total(&self) -> u64 {
        self.total_male().saturating_add(self.total_female())
    }

    /// Cell values in wide column order, derived totals included
    pub fn values(&self) -> Vec<u64> {
        let mut values = Vec::with_capacity(self.cells.len() * 3 + 3);
        for cell in &self.cells {
            values.extend([cell.male, cell.female, cell.total()]);
        }
        values.extend([self.total_male(), self.total_female(), self.total()]);
        values
    }
}

/// Records left out of an export, and why
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    /// Records handed to the denormalizer
    pub records_seen: usize,
    /// Records added into the table
    pub records_included: usize,
    /// Records excluded by the period filter
    pub records_outside_period: usize,
    /// Records whose area is not a catalog member
    pub unknown_area_records: usize,
    /// Records whose bracket is not in the active set
    pub unknown_bracket_records: usize,
    pub unknown_areas: BTreeSet<String>,
    pub unknown_brackets: BTreeSet<String>,
}

impl ExportStats {
    pub fn skipped(&self) -> usize {
        self.unknown_area_records + self.unknown_bracket_records
    }

    pub fn summary(&self) -> String {
        format!(
            "Export Summary: {} records seen, {} included, {} outside period, {} skipped \
             ({} unknown area, {} unknown bracket)",
            self.records_seen,
            self.records_included,
            self.records_outside_period,
            self.skipped(),
            self.unknown_area_records,
            self.unknown_bracket_records
        )
    }
}

/// Wide table: one row per catalog area plus a trailing grand-total row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WideTable {
    #[serde(skip)]
    brackets: BracketSet,
    rows: Vec<WideTableRow>,
    grand_total: WideTableRow,
    stats: ExportStats,
}

impl WideTable {
    /// Build a table from area rows, deriving the grand-total row
    ///
    /// Fails when any column sum of the grand-total row does not fit in `u64`.
    pub fn from_rows(
        brackets: BracketSet,
        rows: Vec<WideTableRow>,
        stats: ExportStats,
    ) -> Result<Self> {
        let mut grand_total = WideTableRow::zeroed(GRAND_TOTAL_ROW_LABEL, brackets.len());
        for row in &rows {
            for (sum, cell) in grand_total.cells.iter_mut().zip(&row.cells) {
                sum.checked_add(Gender::Male, cell.male)
                    .and_then(|_| sum.checked_add(Gender::Female, cell.female))
                    .ok_or_else(|| overflow(&row.label))?;
            }
        }
        checked_row_total(&grand_total).ok_or_else(|| overflow(GRAND_TOTAL_ROW_LABEL))?;

        Ok(Self {
            brackets,
            rows,
            grand_total,
            stats,
        })
    }

    pub fn brackets(&self) -> &BracketSet {
        &self.brackets
    }

    /// Area rows in catalog order
    pub fn rows(&self) -> &[WideTableRow] {
        &self.rows
    }

    pub fn grand_total(&self) -> &WideTableRow {
        &self.grand_total
    }

    pub fn stats(&self) -> &ExportStats {
        &self.stats
    }

    /// Row for one area
    pub fn row(&self, area: &str) -> Option<&WideTableRow> {
        self.rows.iter().find(|row| row.label == area)
    }

    /// Area rows followed by the grand-total row
    pub fn all_rows(&self) -> impl Iterator<Item = &WideTableRow> {
        self.rows.iter().chain(std::iter::once(&self.grand_total))
    }
}

/// Builds wide tables from normalized records
#[derive(Debug, Clone)]
pub struct Denormalizer {
    catalog: AreaCatalog,
    brackets: BracketSet,
}

impl Denormalizer {
    pub fn new(catalog: AreaCatalog, brackets: BracketSet) -> Self {
        Self { catalog, brackets }
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Ok(Self::new(config.catalog()?, config.bracket_set()?))
    }

    pub fn catalog(&self) -> &AreaCatalog {
        &self.catalog
    }

    pub fn brackets(&self) -> &BracketSet {
        &self.brackets
    }

    /// Pivot records for the matching periods into one row per catalog area
    ///
    /// Counts whose sums overflow `u64` are a `DataValidation` error.
    pub fn denormalize(
        &self,
        records: &[NormalizedRecord],
        period: &PeriodFilter,
    ) -> Result<WideTable> {
        let mut rows: Vec<WideTableRow> = self
            .catalog
            .iter()
            .map(|area| WideTableRow::zeroed(area.as_str(), self.brackets.len()))
            .collect();
        let mut stats = ExportStats {
            records_seen: records.len(),
            ..Default::default()
        };

        for record in records {
            if !period.matches(&record.period) {
                stats.records_outside_period += 1;
                continue;
            }
            let Some(area_index) = self.catalog.position(record.area.as_str()) else {
                stats.unknown_area_records += 1;
                stats.unknown_areas.insert(record.area.to_string());
                continue;
            };
            let Some(bracket_index) = self.brackets.position(&record.bracket) else {
                stats.unknown_bracket_records += 1;
                stats.unknown_brackets.insert(record.bracket.clone());
                continue;
            };

            rows[area_index].cells[bracket_index]
                .checked_add(record.gender, record.count)
                .ok_or_else(|| overflow(record.area.as_str()))?;
            stats.records_included += 1;
        }

        if stats.unknown_area_records > 0 {
            warn!(
                "Skipped {} records with areas outside the catalog: {:?}",
                stats.unknown_area_records, stats.unknown_areas
            );
        }
        if stats.unknown_bracket_records > 0 {
            warn!(
                "Skipped {} records with brackets outside the active set: {:?}",
                stats.unknown_bracket_records, stats.unknown_brackets
            );
        }
        debug!("{}", stats.summary());

        let table = WideTable::from_rows(self.brackets.clone(), rows, stats)?;
        info!(
            "Built wide table for {}: {} areas, grand total {}",
            period,
            table.rows().len(),
            table.grand_total().total()
        );
        Ok(table)
    }
}

/// Row total with every intermediate sum checked
fn checked_row_total(row: &WideTableRow) -> Option<u64> {
    let male = row.cells.iter().try_fold(0u64, |sum, c| sum.checked_add(c.male))?;
    let female = row.cells.iter().try_fold(0u64, |sum, c| sum.checked_add(c.female))?;
    male.checked_add(female)
}

fn overflow(label: &str) -> Error {
    Error::data_validation(format!(
        "Export sums overflow while adding counts for '{}'",
        label
    ))
}

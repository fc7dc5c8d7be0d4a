//! Blank import template generation
//!
//! The template uses the import layout: one fully populated example row for
//! the first catalog area, then further catalog areas with zero counts for
//! the user to fill in. It carries no grand-total row, so a freshly generated
//! template passes validation as-is.

use std::io::Write;

use super::table::{ExportCells, ExportStats, WideTable, WideTableRow};
use crate::app::models::BracketSet;
use crate::app::services::area_catalog::AreaCatalog;
use crate::Result;

/// Build the template rows: an example row plus up to `blank_rows` zero rows
pub fn template_table(
    catalog: &AreaCatalog,
    brackets: &BracketSet,
    blank_rows: usize,
) -> Result<WideTable> {
    let mut areas = catalog.iter();
    let mut rows = Vec::with_capacity(blank_rows + 1);

    if let Some(example_area) = areas.next() {
        let cells = (0..brackets.len() as u64)
            .map(|i| ExportCells::new(i + 1, i + 2))
            .collect();
        rows.push(WideTableRow {
            label: example_area.to_string(),
            cells,
        });
    }

    rows.extend(
        areas
            .take(blank_rows)
            .map(|area| WideTableRow::zeroed(area.as_str(), brackets.len())),
    );

    WideTable::from_rows(brackets.clone(), rows, ExportStats::default())
}

/// Write a template in the import layout
pub fn write_template<W: Write>(
    writer: W,
    catalog: &AreaCatalog,
    brackets: &BracketSet,
    area_column: &str,
    blank_rows: usize,
) -> Result<()> {
    template_table(catalog, brackets, blank_rows)?.write_csv_without_total(writer, area_column)
}

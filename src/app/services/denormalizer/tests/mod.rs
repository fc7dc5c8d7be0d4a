//! Test fixtures for denormalizer testing

use crate::app::models::{AreaCode, BracketSet, Gender, Month, NormalizedRecord, Period, RecordId};
use crate::app::services::area_catalog::AreaCatalog;
use crate::app::services::denormalizer::{Denormalizer, WideTable, WideTableRow};

mod table_tests;

pub fn january() -> Period {
    Period::new(2025, Month::January).unwrap()
}

pub fn catalog() -> AreaCatalog {
    AreaCatalog::new(["Aplaya", "Balabag", "Binaton"]).unwrap()
}

pub fn brackets() -> BracketSet {
    BracketSet::from_pairs(&[("UNDER_1", "UNDER 1"), ("1_4", "1-4")]).unwrap()
}

pub fn denormalizer() -> Denormalizer {
    Denormalizer::new(catalog(), brackets())
}

pub fn record(area: &str, bracket: &str, gender: Gender, count: u64) -> NormalizedRecord {
    NormalizedRecord {
        id: RecordId(0),
        area: AreaCode::new(area),
        bracket: bracket.to_string(),
        gender,
        period: january(),
        count,
        batch_id: None,
    }
}

/// Check the per-row and grand-total invariants of an export
pub fn assert_table_invariants(table: &WideTable) {
    let check_row = |row: &WideTableRow| {
        let values = row.values();
        for bracket in 0..row.cells.len() {
            let (m, f, t) = (values[bracket * 3], values[bracket * 3 + 1], values[bracket * 3 + 2]);
            assert_eq!(t, m + f, "bracket {} of row {}", bracket, row.label);
        }
        assert_eq!(row.total(), row.total_male() + row.total_female());
    };

    table.all_rows().for_each(check_row);

    let area_sum: u64 = table.rows().iter().map(|row| row.total()).sum();
    assert_eq!(table.grand_total().total(), area_sum);
}

//! Tests for wide table construction

use super::*;
use crate::app::services::aggregator::PeriodFilter;

#[test]
fn test_empty_records_give_all_zero_rows() {
    let table = denormalizer().denormalize(&[], &PeriodFilter::Any).unwrap();

    assert_eq!(table.rows().len(), 3);
    assert_eq!(table.all_rows().count(), 4);
    assert!(table.all_rows().all(|row| row.total() == 0));
    assert_eq!(table.grand_total().label, "TOTAL");
    assert_table_invariants(&table);
}

#[test]
fn test_aplaya_scenario() {
    let records = vec![
        record("Aplaya", "UNDER_1", Gender::Male, 10),
        record("Aplaya", "UNDER_1", Gender::Female, 8),
    ];
    let table = denormalizer().denormalize(&records, &PeriodFilter::Exact(january())).unwrap();

    let labels: Vec<&str> = table.rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Aplaya", "Balabag", "Binaton"]);

    let aplaya = table.row("Aplaya").unwrap();
    assert_eq!(aplaya.cells[0].total(), 18);
    assert_eq!(aplaya.cells[1].total(), 0);
    assert_eq!(aplaya.values(), vec![10, 8, 18, 0, 0, 0, 10, 8, 18]);

    assert_eq!(table.row("Balabag").unwrap().total(), 0);
    assert_eq!(table.row("Binaton").unwrap().total(), 0);
    assert_eq!(table.grand_total().cells[0].total(), 18);
    assert_eq!(table.grand_total().total(), 18);
    assert_table_invariants(&table);
}

#[test]
fn test_duplicate_records_add_up() {
    let records = vec![
        record("Balabag", "1_4", Gender::Female, 4),
        record("Balabag", "1_4", Gender::Female, 4),
        record("Aplaya", "1_4", Gender::Male, 1),
    ];
    let table = denormalizer().denormalize(&records, &PeriodFilter::Any).unwrap();

    assert_eq!(table.row("Balabag").unwrap().cells[1].female, 8);
    assert_eq!(table.grand_total().values(), vec![0, 0, 0, 1, 8, 9, 1, 8, 9]);
    assert_table_invariants(&table);
}

#[test]
fn test_period_filter_excludes_other_months() {
    let mut february = record("Aplaya", "UNDER_1", Gender::Male, 5);
    february.period = Period::new(2025, Month::February).unwrap();
    let records = vec![record("Aplaya", "UNDER_1", Gender::Male, 10), february];

    let table = denormalizer().denormalize(&records, &PeriodFilter::Exact(january())).unwrap();
    assert_eq!(table.grand_total().total(), 10);
    assert_eq!(table.stats().records_outside_period, 1);
    assert_eq!(table.stats().records_included, 1);

    let whole_year = denormalizer().denormalize(&records, &PeriodFilter::Year(2025)).unwrap();
    assert_eq!(whole_year.grand_total().total(), 15);
}

#[test]
fn test_unknown_area_and_bracket_skipped() {
    let records = vec![
        record("Elsewhere", "UNDER_1", Gender::Male, 7),
        record("Aplaya", "90_AND_OVER", Gender::Female, 2),
        record("Aplaya", "UNDER_1", Gender::Female, 1),
    ];
    let table = denormalizer().denormalize(&records, &PeriodFilter::Any).unwrap();
    let stats = table.stats();

    assert_eq!(stats.records_seen, 3);
    assert_eq!(stats.records_included, 1);
    assert_eq!(stats.unknown_area_records, 1);
    assert_eq!(stats.unknown_bracket_records, 1);
    assert_eq!(stats.skipped(), 2);
    assert!(stats.unknown_areas.contains("Elsewhere"));
    assert!(stats.unknown_brackets.contains("90_AND_OVER"));
    assert!(table.row("Elsewhere").is_none());
    assert_eq!(table.grand_total().total(), 1);
    assert!(stats.summary().contains("2 skipped"));
}

#[test]
fn test_round_trip_through_normalizer() {
    use crate::app::models::{BracketCells, WideRow};
    use crate::app::services::normalizer::normalize;

    let row = WideRow {
        row_number: 1,
        area: AreaCode::new("Binaton"),
        cells: vec![BracketCells::new(10, 8), BracketCells::new(3, 0)],
        grand_total: BracketCells::default(),
    };
    let records: Vec<NormalizedRecord> = normalize(&row, &brackets(), january(), None)
        .into_iter()
        .enumerate()
        .map(|(i, r)| NormalizedRecord::from_new(RecordId(i as u64 + 1), r))
        .collect();

    let table = denormalizer().denormalize(&records, &PeriodFilter::Exact(january())).unwrap();
    let exported = table.row("Binaton").unwrap();
    for (index, cells) in row.cells.iter().enumerate() {
        assert_eq!(Some(exported.cells[index].male), cells.male);
        assert_eq!(Some(exported.cells[index].female), cells.female);
        assert_eq!(Some(exported.cells[index].total()), cells.total);
    }
    assert_eq!(exported.total(), row.total());
}

#[test]
fn test_from_config_uses_configured_catalog() {
    let config = crate::config::EngineConfig::default().with_areas(["North", "South"]);
    let denormalizer = Denormalizer::from_config(&config).unwrap();
    let table = denormalizer.denormalize(&[], &PeriodFilter::Any).unwrap();

    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.rows()[0].cells.len(), 7);
    assert_eq!(denormalizer.catalog().len(), 2);
    assert_eq!(denormalizer.brackets().len(), 7);
}

#[test]
fn test_overflowing_sums_are_rejected() {
    // Same cell
    let same_cell = vec![
        record("Aplaya", "UNDER_1", Gender::Male, u64::MAX),
        record("Aplaya", "UNDER_1", Gender::Male, 1),
    ];
    let result = denormalizer().denormalize(&same_cell, &PeriodFilter::Any);
    assert!(matches!(result, Err(crate::Error::DataValidation { .. })));

    // Each cell fits, but MALE + FEMALE does not
    let split_cells = vec![
        record("Aplaya", "UNDER_1", Gender::Male, u64::MAX),
        record("Aplaya", "UNDER_1", Gender::Female, 5),
    ];
    let result = denormalizer().denormalize(&split_cells, &PeriodFilter::Any);
    assert!(matches!(result, Err(crate::Error::DataValidation { .. })));

    // Separate areas overflow only in the grand-total row
    let split_areas = vec![
        record("Aplaya", "UNDER_1", Gender::Male, u64::MAX),
        record("Balabag", "UNDER_1", Gender::Male, 1),
    ];
    let result = denormalizer().denormalize(&split_areas, &PeriodFilter::Any);
    assert!(matches!(result, Err(crate::Error::DataValidation { .. })));
}

#[test]
fn test_largest_valid_counts_keep_invariants() {
    use crate::constants::MAX_CELL_COUNT;

    let records: Vec<_> = ["Aplaya", "Balabag", "Binaton"]
        .into_iter()
        .flat_map(|area| {
            ["UNDER_1", "1_4"].into_iter().flat_map(move |bracket| {
                Gender::ALL
                    .into_iter()
                    .map(move |gender| record(area, bracket, gender, MAX_CELL_COUNT))
            })
        })
        .collect();
    let table = denormalizer().denormalize(&records, &PeriodFilter::Any).unwrap();

    assert_table_invariants(&table);
    assert_eq!(table.grand_total().total(), MAX_CELL_COUNT * 12);
}

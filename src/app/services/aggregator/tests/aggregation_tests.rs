//! Tests for canonical ordering and zero-filling

use super::*;
use crate::app::models::{BracketSet, Gender};
use crate::app::services::aggregator::{Dimension, DimensionDomains, RecordFilter, aggregate};
use crate::app::services::area_catalog::AreaCatalog;

fn catalog() -> AreaCatalog {
    AreaCatalog::new(["Aplaya", "Balabag", "Binaton"]).unwrap()
}

fn brackets() -> BracketSet {
    BracketSet::from_pairs(&[("UNDER_1", "UNDER 1"), ("1_4", "1-4")]).unwrap()
}

#[test]
fn test_sorted_uses_canonical_order() {
    let records = sample_records();
    let result = aggregate(
        &records,
        &RecordFilter::all(),
        &[Dimension::Area, Dimension::Bracket],
    )
    .unwrap();
    let sorted = result.sorted(&catalog(), &brackets());

    let keys: Vec<String> = sorted.groups().iter().map(|g| g.key.to_string()).collect();
    assert_eq!(
        keys,
        vec![
            "Aplaya / UNDER_1",
            "Aplaya / 1_4",
            "Balabag / UNDER_1",
            "Balabag / 1_4"
        ]
    );
    assert_eq!(sorted.total(), result.total());
}

#[test]
fn test_sorted_periods_chronologically() {
    let mut records = sample_records();
    records.push(record(7, "Aplaya", "1_4", Gender::Male, period(2024, Month::December), 1));
    let result = aggregate(&records, &RecordFilter::all(), &[Dimension::Period]).unwrap();
    let sorted = result.sorted(&catalog(), &brackets());

    let keys: Vec<String> = sorted.groups().iter().map(|g| g.key.to_string()).collect();
    assert_eq!(keys, vec!["December 2024", "January 2025", "February 2025"]);
}

#[test]
fn test_unknown_values_sort_last() {
    let mut records = sample_records();
    records.insert(0, record(8, "Elsewhere", "UNDER_1", Gender::Male, period(2025, Month::January), 5));
    let result = aggregate(&records, &RecordFilter::all(), &[Dimension::Area]).unwrap();
    let sorted = result.sorted(&catalog(), &brackets());

    let keys: Vec<String> = sorted.groups().iter().map(|g| g.key.to_string()).collect();
    assert_eq!(keys, vec!["Aplaya", "Balabag", "Elsewhere"]);
}

#[test]
fn test_densified_fills_zero_groups() {
    let records = sample_records();
    let result = aggregate(
        &records,
        &RecordFilter::all(),
        &[Dimension::Area, Dimension::Gender],
    )
    .unwrap();
    let domains = DimensionDomains::from_catalog(&catalog(), &brackets(), vec![]);
    let dense = result.densified(&domains);

    assert_eq!(dense.len(), 6);
    let keys: Vec<String> = dense.groups().iter().map(|g| g.key.to_string()).collect();
    assert_eq!(keys[0], "Aplaya / MALE");
    assert_eq!(keys[5], "Binaton / FEMALE");
    assert_eq!(dense.groups()[4].total, 0);
    assert_eq!(dense.total(), result.total());
}

#[test]
fn test_densified_keeps_groups_outside_domains() {
    let records = sample_records();
    let result = aggregate(&records, &RecordFilter::all(), &[Dimension::Area]).unwrap();
    let domains = DimensionDomains {
        areas: vec![AreaCode::new("Aplaya")],
        ..Default::default()
    };
    let dense = result.densified(&domains);

    let keys: Vec<String> = dense.groups().iter().map(|g| g.key.to_string()).collect();
    assert_eq!(keys, vec!["Aplaya", "Balabag"]);
    assert_eq!(dense.total(), result.total());
}

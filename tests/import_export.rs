//! End-to-end tests: wide CSV in, JSON-lines store, wide CSV out
//!
//! These run the library the way the CLI does, with the default engine
//! configuration (14-area catalog, coarse bracket preset).

use census_tally::app::models::{Gender, IssueKind, Month, Period};
use census_tally::app::services::aggregator::{
    Dimension, GroupKey, GroupValue, PeriodFilter, RecordFilter, aggregate,
};
use census_tally::app::services::consistency_validator::ConsistencyValidator;
use census_tally::app::services::denormalizer::{Denormalizer, write_template};
use census_tally::app::services::import_pipeline::{ImportOutcome, ImportPipeline, ImportSource};
use census_tally::app::services::record_store::{JsonlRecordStore, RecordStore};
use census_tally::app::services::wide_format_parser::WideFormatParser;
use census_tally::{AreaCode, EngineConfig};
use std::sync::Arc;
use tempfile::TempDir;

fn period(month: Month) -> Period {
    Period::new(2025, month).unwrap()
}

/// One wide row with derived bracket and grand totals
fn wide_row(area: &str, cells: &[(u64, u64)]) -> String {
    let mut values = vec![area.to_string()];
    let (mut male, mut female) = (0, 0);
    for &(m, f) in cells {
        values.extend([m.to_string(), f.to_string(), (m + f).to_string()]);
        male += m;
        female += f;
    }
    values.extend([male.to_string(), female.to_string(), (male + female).to_string()]);
    values.join(",")
}

fn upload(config: &EngineConfig, rows: &[String]) -> String {
    let brackets = config.bracket_set().unwrap();
    let mut header = vec![config.area_column.clone()];
    header.extend(brackets.wide_columns());

    let mut content = header.join(",");
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    content
}

#[tokio::test]
async fn test_import_then_export_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store").join("records.jsonl");
    let config = EngineConfig::default();

    let aplaya = wide_row("Aplaya", &[(10, 8), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0)]);
    let cogon = wide_row("Cogon", &[(1, 2), (3, 4), (5, 6), (0, 7), (8, 0), (0, 0), (9, 9)]);
    let content = upload(&config, &[aplaya.clone(), cogon.clone()]);

    {
        let store = Arc::new(JsonlRecordStore::open(&store_path).await.unwrap());
        let pipeline = ImportPipeline::from_config(store, &config).unwrap();
        let outcome = pipeline
            .run(&ImportSource::inline("jan.csv", content), period(Month::January), None)
            .await
            .unwrap();

        let batch = outcome.batch().unwrap();
        assert!(batch.is_complete());
        assert_eq!(batch.rows_imported, 2);
        // Sparse: only non-zero cells become records
        assert_eq!(batch.success_count(), 2 + 10);
        assert_eq!(batch.persisted_population(), 18 + 54);
    }

    // Reopen from disk, as a second CLI invocation would
    let store = JsonlRecordStore::open(&store_path).await.unwrap();
    let records = store.list(&RecordFilter::all()).await.unwrap();
    assert_eq!(records.len(), 12);

    let table = Denormalizer::from_config(&config)
        .unwrap()
        .denormalize(&records, &PeriodFilter::Exact(period(Month::January))).unwrap();
    assert_eq!(table.rows().len(), 14);
    assert_eq!(table.stats().skipped(), 0);

    let exported = table.to_csv_string(&config.area_column).unwrap();
    let lines: Vec<&str> = exported.lines().collect();
    assert_eq!(lines.len(), 1 + 14 + 1);
    assert!(lines.contains(&aplaya.as_str()));
    assert!(lines.contains(&cogon.as_str()));
    assert!(lines.contains(&wide_row("Matti", &[(0, 0); 7]).as_str()));
    assert_eq!(lines[15], wide_row("TOTAL", &[(11, 10), (3, 4), (5, 6), (0, 7), (8, 0), (0, 0), (9, 9)]));

    // Other periods export as all zeros
    let february = Denormalizer::from_config(&config)
        .unwrap()
        .denormalize(&records, &PeriodFilter::Exact(period(Month::February))).unwrap();
    assert_eq!(february.grand_total().total(), 0);
    assert_eq!(february.stats().records_outside_period, 12);
}

#[tokio::test]
async fn test_exported_total_row_fails_reimport() {
    let config = EngineConfig::default();
    let denormalizer = Denormalizer::from_config(&config).unwrap();
    let table = denormalizer.denormalize(&[], &PeriodFilter::Any).unwrap();
    let exported = table.to_csv_string(&config.area_column).unwrap();

    let parsed = WideFormatParser::new().parse_str(&exported, "export.csv").unwrap();
    let report = ConsistencyValidator::from_config(&config)
        .unwrap()
        .validate(&parsed.rows);

    assert_eq!(report.issue_count(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::UnknownArea);
    assert_eq!(report.issues[0].row, 15);
    assert_eq!(report.rows.len(), 14);
}

#[tokio::test]
async fn test_template_validates_and_imports() {
    let temp_dir = TempDir::new().unwrap();
    let config = EngineConfig::default();
    let template_path = temp_dir.path().join("template.csv");

    let mut buffer = Vec::new();
    write_template(
        &mut buffer,
        &config.catalog().unwrap(),
        &config.bracket_set().unwrap(),
        &config.area_column,
        config.template_blank_rows,
    )
    .unwrap();
    std::fs::write(&template_path, buffer).unwrap();

    let store = Arc::new(JsonlRecordStore::open(temp_dir.path().join("records.jsonl")).await.unwrap());
    let pipeline = ImportPipeline::from_config(store.clone(), &config).unwrap();
    let outcome = pipeline
        .run(&ImportSource::File(template_path), period(Month::March), None)
        .await
        .unwrap();

    match outcome {
        ImportOutcome::Completed(batch) => {
            assert_eq!(batch.rows_imported, 1 + config.template_blank_rows);
            // Only the example row carries counts
            assert!(batch.succeeded.iter().all(|r| r.area.as_str() == "Aplaya"));
            assert_eq!(batch.success_count(), 14);
        }
        ImportOutcome::Rejected { issues, .. } => panic!("template rejected: {:?}", issues),
    }
}

#[tokio::test]
async fn test_rejected_upload_leaves_store_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("records.jsonl");
    let config = EngineConfig::default();

    // UNDER 1: 10 + 5 declared as 20
    let mut bad = wide_row("Aplaya", &[(10, 5), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0)]);
    bad = bad.replacen(",10,5,15,", ",10,5,20,", 1);
    let content = upload(&config, &[bad]);

    let store = Arc::new(JsonlRecordStore::open(&store_path).await.unwrap());
    let outcome = ImportPipeline::from_config(store.clone(), &config)
        .unwrap()
        .run(&ImportSource::inline("bad.csv", content), period(Month::January), None)
        .await
        .unwrap();

    let issues = outcome.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind, IssueKind::TotalMismatch);
    assert!(issues[0].message.contains("15"));
    assert!(issues[0].message.contains("20"));
    assert!(store.list(&RecordFilter::all()).await.unwrap().is_empty());
    assert!(!store_path.exists());
}

#[tokio::test]
async fn test_summary_across_periods() {
    let config = EngineConfig::default();
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(JsonlRecordStore::open(temp_dir.path().join("records.jsonl")).await.unwrap());
    let pipeline = ImportPipeline::from_config(store.clone(), &config).unwrap();

    for (month, male, female) in [(Month::January, 10, 8), (Month::February, 4, 6)] {
        let row = wide_row("Aplaya", &[(male, female), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0)]);
        pipeline
            .run(&ImportSource::inline("upload.csv", upload(&config, &[row])), period(month), None)
            .await
            .unwrap();
    }

    let records = store.list(&RecordFilter::all()).await.unwrap();
    let filter = RecordFilter::all().with_period(PeriodFilter::Year(2025));
    let by_gender = aggregate(&records, &filter, &[Dimension::Gender]).unwrap();
    assert_eq!(by_gender.get(&GroupKey(vec![GroupValue::Gender(Gender::Male)])), Some(14));
    assert_eq!(by_gender.get(&GroupKey(vec![GroupValue::Gender(Gender::Female)])), Some(14));

    let by_period = aggregate(&records, &filter, &[Dimension::Area, Dimension::Period]).unwrap();
    assert_eq!(
        by_period.get(&GroupKey(vec![
            GroupValue::Area(AreaCode::new("Aplaya")),
            GroupValue::Period(period(Month::February)),
        ])),
        Some(10)
    );
    assert_eq!(by_period.total(), 28);
}

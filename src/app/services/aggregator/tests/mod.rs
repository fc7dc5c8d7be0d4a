//! Test fixtures for aggregation testing

use crate::app::models::{AreaCode, Gender, Month, NormalizedRecord, Period, RecordId};

mod aggregation_tests;

pub fn period(year: i32, month: Month) -> Period {
    Period::new(year, month).unwrap()
}

pub fn record(id: u64, area: &str, bracket: &str, gender: Gender, when: Period, count: u64) -> NormalizedRecord {
    NormalizedRecord {
        id: RecordId(id),
        area: AreaCode::new(area),
        bracket: bracket.to_string(),
        gender,
        period: when,
        count,
        batch_id: None,
    }
}

/// Small mixed data set across two areas, two brackets and two months
pub fn sample_records() -> Vec<NormalizedRecord> {
    let jan = period(2025, Month::January);
    let feb = period(2025, Month::February);
    vec![
        record(1, "Balabag", "1_4", Gender::Female, jan, 4),
        record(2, "Aplaya", "UNDER_1", Gender::Male, jan, 10),
        record(3, "Aplaya", "UNDER_1", Gender::Female, jan, 8),
        record(4, "Aplaya", "1_4", Gender::Male, feb, 3),
        record(5, "Balabag", "UNDER_1", Gender::Male, feb, 6),
        record(6, "Aplaya", "UNDER_1", Gender::Male, feb, 2),
    ]
}

//! Test fixtures for import pipeline testing

use std::sync::Arc;

use crate::app::models::{BracketSet, Month, Period};
use crate::app::services::area_catalog::AreaCatalog;
use crate::app::services::consistency_validator::ConsistencyValidator;
use crate::app::services::import_pipeline::{ImportPipeline, ImportSource};
use crate::app::services::record_store::RecordStore;


pub fn january() -> Period {
    Period::new(2025, Month::January).unwrap()
}

pub fn validator() -> ConsistencyValidator {
    ConsistencyValidator::new(
        AreaCatalog::new(["Aplaya", "Balabag", "Binaton"]).unwrap(),
        BracketSet::from_pairs(&[("UNDER_1", "UNDER 1"), ("1_4", "1-4")]).unwrap(),
        "BARANGAY",
    )
}

pub fn pipeline(store: Arc<dyn RecordStore>) -> ImportPipeline {
    ImportPipeline::new(store, validator())
}

/// The Aplaya scenario: UNDER 1 with 10 male and 8 female, every other bracket zero
pub fn aplaya_upload() -> ImportSource {
    ImportSource::inline(
        "aplaya.csv",
        "BARANGAY,UNDER 1 M,UNDER 1 F,UNDER 1 TOTAL,1-4 M,1-4 F,1-4 TOTAL\n\
         Aplaya,10,8,18,0,0,0\n",
    )
}

/// Two rows producing five records in total
pub fn two_row_upload() -> ImportSource {
    ImportSource::inline(
        "two_rows.csv",
        "BARANGAY,UNDER 1 M,UNDER 1 F,UNDER 1 TOTAL,1-4 M,1-4 F,1-4 TOTAL\n\
         Aplaya,10,8,18,3,0,3\n\
         Balabag,1,0,1,2,0,2\n",
    )
}

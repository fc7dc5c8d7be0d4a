//! Grouping dimensions, group keys and the grouped sum itself

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::aggregation::{Aggregation, Group};
use super::filter::RecordFilter;
use crate::app::models::{AreaCode, Gender, NormalizedRecord, Period};
use crate::{Error, Result};

/// A categorical axis records can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Area,
    Bracket,
    Gender,
    Period,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Area,
        Dimension::Bracket,
        Dimension::Gender,
        Dimension::Period,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Area => "area",
            Dimension::Bracket => "bracket",
            Dimension::Gender => "gender",
            Dimension::Period => "period",
        }
    }

    /// The value of this dimension on one record
    pub fn value_of(self, record: &NormalizedRecord) -> GroupValue {
        match self {
            Dimension::Area => GroupValue::Area(record.area.clone()),
            Dimension::Bracket => GroupValue::Bracket(record.bracket.clone()),
            Dimension::Gender => GroupValue::Gender(record.gender),
            Dimension::Period => GroupValue::Period(record.period),
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "area" | "barangay" => Ok(Dimension::Area),
            "bracket" | "age" | "age_bracket" => Ok(Dimension::Bracket),
            "gender" | "sex" => Ok(Dimension::Gender),
            "period" | "month" => Ok(Dimension::Period),
            other => Err(Error::configuration(format!(
                "Unknown dimension '{}': expected area, bracket, gender or period",
                other
            ))),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of one dimension within a group key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    Area(AreaCode),
    Bracket(String),
    Gender(Gender),
    Period(Period),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Area(area) => write!(f, "{}", area),
            GroupValue::Bracket(code) => f.write_str(code),
            GroupValue::Gender(gender) => write!(f, "{}", gender),
            GroupValue::Period(period) => write!(f, "{}", period),
        }
    }
}

/// One value per requested dimension, in dimension order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GroupKey(pub Vec<GroupValue>);

impl GroupKey {
    pub fn values(&self) -> &[GroupValue] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(" / "))
    }
}

/// Reject empty or repeated dimension lists
pub fn check_dimensions(dimensions: &[Dimension]) -> Result<()> {
    if dimensions.is_empty() {
        return Err(Error::configuration(
            "At least one grouping dimension is required",
        ));
    }
    for (i, dimension) in dimensions.iter().enumerate() {
        if dimensions[..i].contains(dimension) {
            return Err(Error::configuration(format!(
                "Dimension '{}' listed more than once",
                dimension
            )));
        }
    }
    Ok(())
}

/// Sum counts of the filtered records per distinct dimension tuple
///
/// Groups appear in the order their first record was seen.
pub fn aggregate(
    records: &[NormalizedRecord],
    filter: &RecordFilter,
    dimensions: &[Dimension],
) -> Result<Aggregation> {
    check_dimensions(dimensions)?;

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut matched = 0usize;
    let mut grand_total = 0u64;

    for record in filter.apply(records) {
        matched += 1;
        grand_total = add_count(grand_total, record)?;
        let key = GroupKey(dimensions.iter().map(|d| d.value_of(record)).collect());
        match index.get(&key) {
            Some(&position) => {
                let group = &mut groups[position];
                group.total = add_count(group.total, record)?;
            }
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(Group {
                    key,
                    total: record.count,
                });
            }
        }
    }

    debug!(
        "Aggregated {} of {} records into {} groups by {:?}",
        matched,
        records.len(),
        groups.len(),
        dimensions
    );

    Ok(Aggregation::new(dimensions.to_vec(), groups, grand_total))
}

/// Sum of counts over the filtered records
pub fn total(records: &[NormalizedRecord], filter: &RecordFilter) -> Result<u64> {
    filter
        .apply(records)
        .try_fold(0u64, |sum, record| add_count(sum, record))
}

fn add_count(sum: u64, record: &NormalizedRecord) -> Result<u64> {
    sum.checked_add(record.count).ok_or_else(|| {
        Error::data_validation(format!(
            "Count overflow adding {} for {} {} {} {}",
            record.count, record.area, record.bracket, record.gender, record.period
        ))
    })
}

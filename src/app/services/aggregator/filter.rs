//! Record filters shared by the aggregator, the exporter and the record store
//!
//! A filter is a pure predicate over [`NormalizedRecord`]s. Each subset is
//! optional; `None` means "no restriction" while an empty subset matches
//! nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::app::models::{AreaCode, BatchId, Gender, NormalizedRecord, Period};
use crate::{Error, Result};

/// Restriction on the reporting period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodFilter {
    /// Every period
    #[default]
    Any,
    /// One year and month
    Exact(Period),
    /// Every month of one year
    Year(i32),
    /// Inclusive range of periods
    Range { from: Period, to: Period },
}

impl PeriodFilter {
    /// Inclusive range, rejecting `from > to`
    pub fn range(from: Period, to: Period) -> Result<Self> {
        if from > to {
            return Err(Error::data_validation(format!(
                "Invalid period range: {} is after {}",
                from, to
            )));
        }
        Ok(PeriodFilter::Range { from, to })
    }

    pub fn matches(&self, period: &Period) -> bool {
        match self {
            PeriodFilter::Any => true,
            PeriodFilter::Exact(wanted) => period == wanted,
            PeriodFilter::Year(year) => period.year == *year,
            PeriodFilter::Range { from, to } => from <= period && period <= to,
        }
    }
}

impl FromStr for PeriodFilter {
    type Err = Error;

    /// Parse `any`, `2025`, `2025-01`, `January 2025` or `2025-01..2025-06`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") {
            return Ok(PeriodFilter::Any);
        }
        if let Some((from, to)) = trimmed.split_once("..") {
            return PeriodFilter::range(from.parse()?, to.parse()?);
        }
        if let Ok(year) = trimmed.parse::<i32>() {
            if year <= 0 {
                return Err(Error::data_validation(format!(
                    "Invalid year {}: must be positive",
                    year
                )));
            }
            return Ok(PeriodFilter::Year(year));
        }
        Ok(PeriodFilter::Exact(trimmed.parse()?))
    }
}

impl fmt::Display for PeriodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodFilter::Any => f.write_str("all periods"),
            PeriodFilter::Exact(period) => write!(f, "{}", period),
            PeriodFilter::Year(year) => write!(f, "{}", year),
            PeriodFilter::Range { from, to } => write!(f, "{} to {}", from, to),
        }
    }
}

/// Predicate over normalized records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub areas: Option<Vec<AreaCode>>,
    pub brackets: Option<Vec<String>>,
    pub genders: Option<Vec<Gender>>,
    pub period: PeriodFilter,
    pub batch_id: Option<BatchId>,
}

impl RecordFilter {
    /// Filter matching every record
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_areas<I, S>(mut self, areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.areas = Some(areas.into_iter().map(AreaCode::new).collect());
        self
    }

    pub fn with_brackets<I, S>(mut self, brackets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brackets = Some(brackets.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_genders(mut self, genders: impl IntoIterator<Item = Gender>) -> Self {
        self.genders = Some(genders.into_iter().collect());
        self
    }

    pub fn with_period(mut self, period: PeriodFilter) -> Self {
        self.period = period;
        self
    }

    pub fn with_batch(mut self, batch_id: BatchId) -> Self {
        self.batch_id = Some(batch_id);
        self
    }

    pub fn matches(&self, record: &NormalizedRecord) -> bool {
        let excluded_area = self
            .areas
            .as_ref()
            .is_some_and(|areas| !areas.contains(&record.area));
        let excluded_bracket = self
            .brackets
            .as_ref()
            .is_some_and(|brackets| !brackets.contains(&record.bracket));
        let excluded_gender = self
            .genders
            .as_ref()
            .is_some_and(|genders| !genders.contains(&record.gender));
        let excluded_batch = self
            .batch_id
            .as_ref()
            .is_some_and(|batch_id| record.batch_id.as_ref() != Some(batch_id));

        !(excluded_area || excluded_bracket || excluded_gender || excluded_batch)
            && self.period.matches(&record.period)
    }

    /// Records matching this filter, in input order
    pub fn apply<'a>(
        &'a self,
        records: &'a [NormalizedRecord],
    ) -> impl Iterator<Item = &'a NormalizedRecord> + 'a {
        records.iter().filter(move |record| self.matches(record))
    }
}

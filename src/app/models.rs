//! Data models for census tally
//!
//! This module contains the core data structures shared by every service:
//! the categorical dimensions (area, age bracket, gender, period), the
//! normalized record stored by the record store, the transient wide-row
//! structures used during import, and validation issues.

use crate::constants::{self, grand_total_columns, presets, suffixes};
use crate::{Error, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Area Code
// =============================================================================

/// Geographic unit code (barangay-equivalent)
///
/// Membership in the valid set is decided by
/// [`AreaCatalog`](crate::app::services::area_catalog::AreaCatalog), not by
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaCode(String);

impl AreaCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AreaCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AreaCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

// =============================================================================
// Age Brackets
// =============================================================================

/// A categorical age range
///
/// `code` is the identifier stored on normalized records (e.g. `UNDER_1`);
/// `label` is the column prefix used in wide files (e.g. `UNDER 1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgeBracket {
    pub code: String,
    pub label: String,
}

impl AgeBracket {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }

    /// Column name for one gender of this bracket (`"<label> M"` / `"<label> F"`)
    pub fn gender_column(&self, gender: Gender) -> String {
        format!("{} {}", self.label, gender.column_suffix())
    }

    /// Column name for this bracket's declared total (`"<label> TOTAL"`)
    pub fn total_column(&self) -> String {
        format!("{} {}", self.label, suffixes::TOTAL)
    }
}

/// Ordered list of age brackets active for one engine instance
///
/// The order drives iteration in the normalizer and column order on export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AgeBracket>", into = "Vec<AgeBracket>")]
pub struct BracketSet {
    brackets: Vec<AgeBracket>,
}

impl BracketSet {
    /// Create a bracket set, rejecting empty lists and duplicate codes or labels
    pub fn new(brackets: Vec<AgeBracket>) -> Result<Self> {
        if brackets.is_empty() {
            return Err(Error::configuration("Bracket set cannot be empty"));
        }

        let mut codes = HashSet::new();
        let mut labels = HashSet::new();
        for bracket in &brackets {
            if bracket.code.trim().is_empty() || bracket.label.trim().is_empty() {
                return Err(Error::configuration(format!(
                    "Bracket code and label cannot be blank (got code '{}', label '{}')",
                    bracket.code, bracket.label
                )));
            }
            // "TOTAL M" / "TOTAL F" are reserved for the grand-total columns
            if bracket.label.trim().eq_ignore_ascii_case(suffixes::TOTAL) {
                return Err(Error::configuration(format!(
                    "Bracket label '{}' collides with the grand-total columns",
                    bracket.label
                )));
            }
            if !codes.insert(bracket.code.as_str()) {
                return Err(Error::configuration(format!(
                    "Duplicate bracket code '{}'",
                    bracket.code
                )));
            }
            if !labels.insert(bracket.label.as_str()) {
                return Err(Error::configuration(format!(
                    "Duplicate bracket label '{}'",
                    bracket.label
                )));
            }
        }

        Ok(Self { brackets })
    }

    /// Build a bracket set from `(code, label)` pairs
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|(code, label)| AgeBracket::new(*code, *label))
                .collect(),
        )
    }

    /// The coarse preset used by import/export
    pub fn coarse() -> Self {
        Self::from_static(constants::COARSE_BRACKETS)
    }

    /// The fine-grained preset
    pub fn fine() -> Self {
        Self::from_static(constants::FINE_BRACKETS)
    }

    // Presets are checked for uniqueness by the constants tests
    fn from_static(pairs: &[(&str, &str)]) -> Self {
        Self {
            brackets: pairs
                .iter()
                .map(|(code, label)| AgeBracket::new(*code, *label))
                .collect(),
        }
    }

    /// Look up a preset by name (`coarse` or `fine`)
    pub fn preset(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            presets::COARSE => Ok(Self::coarse()),
            presets::FINE => Ok(Self::fine()),
            other => Err(Error::configuration(format!(
                "Unknown bracket preset '{}': expected '{}' or '{}'",
                other,
                presets::COARSE,
                presets::FINE
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.brackets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brackets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgeBracket> {
        self.brackets.iter()
    }

    pub fn get(&self, index: usize) -> Option<&AgeBracket> {
        self.brackets.get(index)
    }

    /// Canonical position of a bracket code
    pub fn position(&self, code: &str) -> Option<usize> {
        self.brackets.iter().position(|b| b.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.brackets.iter().map(|b| b.code.as_str()).collect()
    }

    /// Full wide-format column list after the area column, in export order
    pub fn wide_columns(&self) -> Vec<String> {
        let mut columns = Vec::with_capacity(self.brackets.len() * 3 + 3);
        for bracket in &self.brackets {
            columns.push(bracket.gender_column(Gender::Male));
            columns.push(bracket.gender_column(Gender::Female));
            columns.push(bracket.total_column());
        }
        columns.push(grand_total_columns::MALE.to_string());
        columns.push(grand_total_columns::FEMALE.to_string());
        columns.push(grand_total_columns::TOTAL.to_string());
        columns
    }
}

impl TryFrom<Vec<AgeBracket>> for BracketSet {
    type Error = Error;

    fn try_from(brackets: Vec<AgeBracket>) -> Result<Self> {
        Self::new(brackets)
    }
}

impl From<BracketSet> for Vec<AgeBracket> {
    fn from(set: BracketSet) -> Self {
        set.brackets
    }
}

// =============================================================================
// Gender
// =============================================================================

/// Gender dimension; exactly two values, always iterated MALE then FEMALE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Both genders in canonical order
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Suffix used in wide column names
    pub fn column_suffix(self) -> &'static str {
        match self {
            Gender::Male => suffixes::MALE,
            Gender::Female => suffixes::FEMALE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MALE" | "M" => Ok(Gender::Male),
            "FEMALE" | "F" => Ok(Gender::Female),
            _ => Err(Error::data_validation(format!(
                "Invalid gender '{}': must be MALE or FEMALE",
                s
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Reporting Period
// =============================================================================

/// Calendar month, ordered January through December
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Month number, 1 through 12
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    /// Canonical month name (e.g. "January")
    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Accepts full names and three-letter abbreviations, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|m| {
                let name = m.name().to_ascii_lowercase();
                name == wanted || (wanted.len() == 3 && name.starts_with(&wanted))
            })
            .ok_or_else(|| Error::data_validation(format!("Invalid month name '{}'", s)))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reporting period (year and month), ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    /// Create a period, rejecting non-positive years
    pub fn new(year: i32, month: Month) -> Result<Self> {
        if year <= 0 {
            return Err(Error::data_validation(format!(
                "Invalid period year {}: must be positive",
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// The current local month
    pub fn current() -> Self {
        let now = chrono::Local::now();
        let month = Month::from_number(now.month()).unwrap_or(Month::January);
        Self {
            year: now.year(),
            month,
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    /// Parse `2025-01`, `January 2025`, `2025 January` or `Jan 2025`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || {
            Error::data_validation(format!(
                "Invalid period '{}': expected YYYY-MM or '<Month> YYYY'",
                s
            ))
        };

        if let Some((year, month)) = trimmed.split_once('-') {
            let year: i32 = year.trim().parse().map_err(|_| invalid())?;
            let month: u32 = month.trim().parse().map_err(|_| invalid())?;
            let month = Month::from_number(month).ok_or_else(invalid)?;
            return Period::new(year, month);
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(invalid());
        }
        let (year, month) = match parts[0].parse::<i32>() {
            Ok(year) => (year, parts[1]),
            Err(_) => (parts[1].parse::<i32>().map_err(|_| invalid())?, parts[0]),
        };
        Period::new(year, month.parse()?)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

// =============================================================================
// Normalized Records
// =============================================================================

/// Identifier assigned by the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag shared by all records created by one import
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Generate a fresh random batch identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A normalized record before the store assigns it an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub area: AreaCode,
    /// Bracket code (see [`AgeBracket::code`])
    pub bracket: String,
    pub gender: Gender,
    pub period: Period,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,
}

/// One count for an (area, bracket, gender, period) combination
///
/// The store does not enforce uniqueness of the combination; repeated
/// imports add up at aggregation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub id: RecordId,
    pub area: AreaCode,
    pub bracket: String,
    pub gender: Gender,
    pub period: Period,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<BatchId>,
}

impl NormalizedRecord {
    /// Attach a store-assigned id to a new record
    pub fn from_new(id: RecordId, record: NewRecord) -> Self {
        Self {
            id,
            area: record.area,
            bracket: record.bracket,
            gender: record.gender,
            period: record.period,
            count: record.count,
            batch_id: record.batch_id,
        }
    }
}

/// Partial update applied by [`RecordStore::update`](crate::app::services::record_store::RecordStore::update)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub area: Option<AreaCode>,
    pub bracket: Option<String>,
    pub gender: Option<Gender>,
    pub period: Option<Period>,
    pub count: Option<u64>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self == &RecordPatch::default()
    }

    /// Apply the set fields to a record
    pub fn apply(&self, record: &mut NormalizedRecord) {
        if let Some(area) = &self.area {
            record.area = area.clone();
        }
        if let Some(bracket) = &self.bracket {
            record.bracket = bracket.clone();
        }
        if let Some(gender) = self.gender {
            record.gender = gender;
        }
        if let Some(period) = self.period {
            record.period = period;
        }
        if let Some(count) = self.count {
            record.count = count;
        }
    }
}

// =============================================================================
// Wide Rows (import only)
// =============================================================================

/// One data row of an uploaded wide file, uninterpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based data row number (the header row is not counted)
    pub row_number: usize,
    /// Column name to raw cell value
    pub values: HashMap<String, String>,
}

impl RawRow {
    pub fn new(row_number: usize, values: HashMap<String, String>) -> Self {
        Self { row_number, values }
    }

    /// Raw value of a column, if the column exists in the file
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// The three cells of one bracket (or of the grand totals)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketCells {
    pub male: Option<u64>,
    pub female: Option<u64>,
    pub total: Option<u64>,
}

impl BracketCells {
    pub fn new(male: u64, female: u64) -> Self {
        Self {
            male: Some(male),
            female: Some(female),
            total: Some(male + female),
        }
    }

    /// Cell value for one gender, absent cells counting as zero
    pub fn count(&self, gender: Gender) -> u64 {
        match gender {
            Gender::Male => self.male.unwrap_or(0),
            Gender::Female => self.female.unwrap_or(0),
        }
    }
}

/// Typed, validated import row: an area plus a (bracket, gender) matrix
///
/// `cells` is indexed by bracket position in the active [`BracketSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideRow {
    pub row_number: usize,
    pub area: AreaCode,
    pub cells: Vec<BracketCells>,
    pub grand_total: BracketCells,
}

impl WideRow {
    /// Count for one bracket position and gender (zero when absent)
    pub fn count(&self, bracket_index: usize, gender: Gender) -> u64 {
        self.cells
            .get(bracket_index)
            .map(|cells| cells.count(gender))
            .unwrap_or(0)
    }

    /// Sum over all brackets for one gender
    pub fn gender_total(&self, gender: Gender) -> u64 {
        self.cells.iter().map(|cells| cells.count(gender)).sum()
    }

    /// Sum over all brackets and both genders
    pub fn total(&self) -> u64 {
        Gender::ALL.iter().map(|g| self.gender_total(*g)).sum()
    }
}

// =============================================================================
// Validation Issues
// =============================================================================

/// Issue severity; every validator issue currently blocks the import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blocking,
}

/// Classification of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Area code is not a catalog member
    UnknownArea,
    /// Required cell absent or blank
    MissingValue,
    /// Cell is not a non-negative whole number
    InvalidNumber,
    /// Declared bracket total differs from male + female
    TotalMismatch,
    /// Declared grand total differs from the bracket sums
    GrandTotalMismatch,
}

impl IssueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueKind::UnknownArea => "unknown_area",
            IssueKind::MissingValue => "missing_value",
            IssueKind::InvalidNumber => "invalid_number",
            IssueKind::TotalMismatch => "total_mismatch",
            IssueKind::GrandTotalMismatch => "grand_total_mismatch",
        }
    }
}

/// A row-addressable validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 1-based data row number
    pub row: usize,
    /// Column the issue points at
    pub field: String,
    pub message: String,
    /// Offending raw value, when there was one
    pub value: Option<String>,
    pub severity: Severity,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(
        row: usize,
        field: impl Into<String>,
        kind: IssueKind,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
            value,
            severity: Severity::Blocking,
            kind,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}, {}: {}", self.row, self.field, self.message)
    }
}

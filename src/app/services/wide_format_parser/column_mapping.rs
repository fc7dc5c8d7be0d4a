//! Column mapping and categorization for wide-format headers
//!
//! Indexes header names and classifies each column as a bracket cell
//! (`"<label> M"`, `"<label> F"`, `"<label> TOTAL"`), a grand-total cell
//! (`"TOTAL M"`, `"TOTAL F"`, `"TOTAL"`) or anything else. Classification is
//! purely lexical; whether a label names an active bracket is decided later.

use crate::app::models::{BracketSet, Gender};
use crate::constants::{grand_total_columns, suffixes};
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashMap;

const CELL_COLUMN_PATTERN: &str = r"^(?P<label>.+?)\s+(?P<suffix>M|F|TOTAL)$";

/// Which part of a bracket (or of the grand totals) a column carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellPart {
    Gender(Gender),
    Total,
}

/// Lexical classification of one header column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// `"<label> M|F|TOTAL"` for some bracket label
    BracketCell { label: String, part: CellPart },
    /// `"TOTAL M"`, `"TOTAL F"` or `"TOTAL"`
    GrandTotal(CellPart),
    /// Area column, empty header or anything unrecognized
    Other,
}

/// Column mapping for one uploaded file
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Header names in file order (trimmed)
    columns: Vec<String>,

    /// Column name to index mapping
    name_to_index: HashMap<String, usize>,

    /// Classification, parallel to `columns`
    kinds: Vec<ColumnKind>,
}

impl ColumnMapping {
    /// Index and classify trimmed header names, rejecting duplicates
    pub fn analyze(headers: &[String], source_name: &str) -> Result<Self> {
        let cell_pattern = Regex::new(CELL_COLUMN_PATTERN)
            .map_err(|e| Error::configuration(format!("Invalid column pattern: {}", e)))?;

        let mut name_to_index = HashMap::new();
        let mut kinds = Vec::with_capacity(headers.len());

        for (index, name) in headers.iter().enumerate() {
            if name.is_empty() {
                kinds.push(ColumnKind::Other);
                continue;
            }
            if name_to_index.insert(name.clone(), index).is_some() {
                return Err(Error::wide_format(
                    source_name,
                    format!("Duplicate column '{}' in header", name),
                ));
            }
            kinds.push(classify(&cell_pattern, name));
        }

        Ok(Self {
            columns: headers.to_vec(),
            name_to_index,
            kinds,
        })
    }

    /// Header names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns, including empty headers
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get the index for a given column name
    pub fn get_index(&self, column_name: &str) -> Option<usize> {
        self.name_to_index.get(column_name).copied()
    }

    /// Classification of a named column
    pub fn kind(&self, column_name: &str) -> Option<&ColumnKind> {
        self.get_index(column_name).map(|i| &self.kinds[i])
    }

    /// Non-empty columns that carry no meaning for the active bracket set
    ///
    /// These are ignored on import; the caller usually logs them.
    pub fn unrecognized_columns(&self, brackets: &BracketSet, area_column: &str) -> Vec<&str> {
        self.columns
            .iter()
            .zip(&self.kinds)
            .filter(|(name, _)| !name.is_empty() && name.as_str() != area_column)
            .filter(|(_, kind)| match kind {
                ColumnKind::BracketCell { label, .. } => {
                    !brackets.iter().any(|b| &b.label == label)
                }
                ColumnKind::GrandTotal(_) => false,
                ColumnKind::Other => true,
            })
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Get statistics about the column mapping: (columns, bracket cells, grand totals)
    pub fn stats(&self) -> (usize, usize, usize) {
        let bracket_cells = self
            .kinds
            .iter()
            .filter(|k| matches!(k, ColumnKind::BracketCell { .. }))
            .count();
        let grand_totals = self
            .kinds
            .iter()
            .filter(|k| matches!(k, ColumnKind::GrandTotal(_)))
            .count();
        (self.name_to_index.len(), bracket_cells, grand_totals)
    }
}

fn classify(pattern: &Regex, name: &str) -> ColumnKind {
    if name == grand_total_columns::TOTAL {
        return ColumnKind::GrandTotal(CellPart::Total);
    }

    let Some(captures) = pattern.captures(name) else {
        return ColumnKind::Other;
    };
    let label = captures["label"].trim();
    let part = match &captures["suffix"] {
        s if s == suffixes::MALE => CellPart::Gender(Gender::Male),
        s if s == suffixes::FEMALE => CellPart::Gender(Gender::Female),
        _ => CellPart::Total,
    };

    if label == suffixes::TOTAL {
        ColumnKind::GrandTotal(part)
    } else {
        ColumnKind::BracketCell {
            label: label.to_string(),
            part,
        }
    }
}

//! Area catalog service for membership checks and ordered coverage
//!
//! The catalog is the canonical, ordered list of valid area codes. The
//! validator uses it for membership checks and the exporter uses its order
//! to guarantee that every area appears exactly once in an export.

use crate::app::models::AreaCode;
use crate::constants::{DEFAULT_AREAS, GRAND_TOTAL_ROW_LABEL};
use crate::{Error, Result};
use std::collections::HashMap;

/// Canonical ordered area list with O(1) membership lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaCatalog {
    /// Areas in canonical order
    areas: Vec<AreaCode>,

    /// Position of each area in `areas`
    index: HashMap<String, usize>,
}

impl AreaCatalog {
    /// Create a catalog, rejecting empty lists, blank codes and duplicates
    ///
    /// The grand-total row label is reserved and cannot name an area.
    pub fn new<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut areas = Vec::new();
        let mut index = HashMap::new();

        for code in codes {
            let code: String = code.into();
            if code.trim().is_empty() {
                return Err(Error::configuration("Area codes cannot be blank"));
            }
            if code.trim() != code {
                return Err(Error::configuration(format!(
                    "Area code '{}' has leading or trailing whitespace",
                    code
                )));
            }
            if code == GRAND_TOTAL_ROW_LABEL {
                return Err(Error::configuration(format!(
                    "Area code '{}' is reserved for the grand-total row",
                    code
                )));
            }
            if index.insert(code.clone(), areas.len()).is_some() {
                return Err(Error::configuration(format!(
                    "Duplicate area code '{}' in catalog",
                    code
                )));
            }
            areas.push(AreaCode::new(code));
        }

        if areas.is_empty() {
            return Err(Error::configuration("Area catalog cannot be empty"));
        }

        Ok(Self { areas, index })
    }

    /// Exact (case-sensitive) membership check
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    /// Canonical position of an area
    pub fn position(&self, code: &str) -> Option<usize> {
        self.index.get(code).copied()
    }

    /// Catalog entry for a code
    pub fn get(&self, code: &str) -> Option<&AreaCode> {
        self.position(code).map(|i| &self.areas[i])
    }

    /// Areas in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &AreaCode> {
        self.areas.iter()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Comma-separated allowed set, used in validation messages
    pub fn describe(&self) -> String {
        self.areas
            .iter()
            .map(AreaCode::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for AreaCatalog {
    fn default() -> Self {
        Self {
            areas: DEFAULT_AREAS.iter().map(|a| AreaCode::new(*a)).collect(),
            index: DEFAULT_AREAS
                .iter()
                .enumerate()
                .map(|(i, a)| (a.to_string(), i))
                .collect(),
        }
    }
}

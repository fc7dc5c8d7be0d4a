//! Aggregation results and their opt-in post-processing

use serde::Serialize;
use std::collections::HashMap;

use super::grouping::{Dimension, GroupKey, GroupValue};
use crate::app::models::{AreaCode, BracketSet, Gender, Period};
use crate::app::services::area_catalog::AreaCatalog;

/// One group and its summed count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
    pub key: GroupKey,
    pub total: u64,
}

/// Grouped sums in first-seen order unless post-processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    dimensions: Vec<Dimension>,
    groups: Vec<Group>,
    total: u64,
}

/// Value domains used to zero-fill an aggregation
#[derive(Debug, Clone, Default)]
pub struct DimensionDomains {
    pub areas: Vec<AreaCode>,
    pub brackets: Vec<String>,
    pub genders: Vec<Gender>,
    pub periods: Vec<Period>,
}

impl DimensionDomains {
    /// Domains covering the whole catalog, every bracket, both genders and the given periods
    pub fn from_catalog(catalog: &AreaCatalog, brackets: &BracketSet, periods: Vec<Period>) -> Self {
        Self {
            areas: catalog.iter().cloned().collect(),
            brackets: brackets.iter().map(|b| b.code.clone()).collect(),
            genders: Gender::ALL.to_vec(),
            periods,
        }
    }

    fn values(&self, dimension: Dimension) -> Vec<GroupValue> {
        match dimension {
            Dimension::Area => self.areas.iter().cloned().map(GroupValue::Area).collect(),
            Dimension::Bracket => self.brackets.iter().cloned().map(GroupValue::Bracket).collect(),
            Dimension::Gender => self.genders.iter().copied().map(GroupValue::Gender).collect(),
            Dimension::Period => self.periods.iter().copied().map(GroupValue::Period).collect(),
        }
    }
}

impl Aggregation {
    pub(crate) fn new(dimensions: Vec<Dimension>, groups: Vec<Group>, total: u64) -> Self {
        Self {
            dimensions,
            groups,
            total,
        }
    }

    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum over all groups, computed with checked arithmetic while grouping
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Summed count for one key
    pub fn get(&self, key: &GroupKey) -> Option<u64> {
        self.groups.iter().find(|g| &g.key == key).map(|g| g.total)
    }

    /// Groups ordered canonically: catalog order, bracket order, MALE before
    /// FEMALE and chronological periods; values unknown to the catalog or
    /// bracket set sort after known ones
    pub fn sorted(&self, catalog: &AreaCatalog, brackets: &BracketSet) -> Self {
        let mut groups = self.groups.clone();
        groups.sort_by_cached_key(|group| {
            group
                .key
                .values()
                .iter()
                .map(|value| canonical_rank(value, catalog, brackets))
                .collect::<Vec<_>>()
        });
        Self::new(self.dimensions.clone(), groups, self.total)
    }

    /// Zero-filled cartesian product of the domains, in domain order
    ///
    /// Groups whose key falls outside the domains are kept after the product
    /// so the overall total is unchanged.
    pub fn densified(&self, domains: &DimensionDomains) -> Self {
        let mut existing: HashMap<&GroupKey, u64> =
            self.groups.iter().map(|g| (&g.key, g.total)).collect();

        let mut keys: Vec<Vec<GroupValue>> = vec![Vec::new()];
        for dimension in &self.dimensions {
            let values = domains.values(*dimension);
            keys = keys
                .into_iter()
                .flat_map(|prefix| {
                    values.iter().map(move |value| {
                        let mut key = prefix.clone();
                        key.push(value.clone());
                        key
                    })
                })
                .collect();
        }

        let mut groups: Vec<Group> = keys
            .into_iter()
            .map(|values| {
                let key = GroupKey(values);
                let total = existing.remove(&key).unwrap_or(0);
                Group { key, total }
            })
            .collect();

        groups.extend(
            self.groups
                .iter()
                .filter(|g| existing.contains_key(&g.key))
                .cloned(),
        );

        Self::new(self.dimensions.clone(), groups, self.total)
    }
}

fn canonical_rank(value: &GroupValue, catalog: &AreaCatalog, brackets: &BracketSet) -> (usize, String) {
    match value {
        GroupValue::Area(area) => (
            catalog.position(area.as_str()).unwrap_or(catalog.len()),
            area.as_str().to_string(),
        ),
        GroupValue::Bracket(code) => (
            brackets.position(code).unwrap_or(brackets.len()),
            code.clone(),
        ),
        GroupValue::Gender(gender) => (*gender as usize, String::new()),
        GroupValue::Period(period) => (
            period.year as usize * 12 + period.month.number() as usize,
            String::new(),
        ),
    }
}

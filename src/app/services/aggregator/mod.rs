//! Grouped aggregation over normalized records
//!
//! Answers "total count per (dimension tuple)" questions for analytics views:
//! filter records with a [`RecordFilter`], pick an ordered list of
//! [`Dimension`]s, and sum counts per distinct tuple. Results are computed
//! fresh on every call and never persisted.
//!
//! Groups come back in first-seen order. Canonical ordering
//! ([`Aggregation::sorted`]) and zero-filling ([`Aggregation::densified`])
//! are explicit post-processing steps.
//!
//! ```rust
//! use census_tally::app::services::aggregator::{Dimension, RecordFilter, aggregate, total};
//!
//! # fn example(records: Vec<census_tally::NormalizedRecord>) -> census_tally::Result<()> {
//! let filter = RecordFilter::all();
//! let by_area = aggregate(&records, &filter, &[Dimension::Area])?;
//! assert_eq!(by_area.total(), total(&records, &filter)?);
//! # Ok(())
//! # }
//! ```

pub mod aggregation;
pub mod filter;
pub mod grouping;

#[cfg(test)]
pub mod tests;

pub use aggregation::{Aggregation, DimensionDomains, Group};
pub use filter::{PeriodFilter, RecordFilter};
pub use grouping::{Dimension, GroupKey, GroupValue, aggregate, check_dimensions, total};

//! Denormalization: normalized records back to wide tables
//!
//! Pivots records into one row per catalog area, derives every total, and
//! appends a grand-total row. Output is always fully populated: areas with no
//! records appear as zero rows, so every catalog member is present exactly
//! once. The same rendering produces blank import templates.
//!
//! # Invariants
//!
//! For every output row, the grand-total row included:
//! - each bracket's `TOTAL` equals `M + F`
//! - `TOTAL` equals `TOTAL M + TOTAL F`
//!
//! and the grand-total `TOTAL` equals the sum of all area `TOTAL`s.

pub mod table;
pub mod template;
pub mod writer;

#[cfg(test)]
pub mod tests;

pub use table::{Denormalizer, ExportCells, ExportStats, WideTable, WideTableRow};
pub use template::{template_table, write_template};

//! Consistency validation for parsed wide-format rows
//!
//! Checks every raw row against the area catalog, the active bracket set and
//! the per-bracket arithmetic, collecting every issue rather than stopping at
//! the first. Any issue anywhere blocks the whole upload; rows that passed are
//! still returned so callers can show what would have been imported.
//!
//! # Checks
//!
//! Per row, in this order:
//!
//! 1. **Area membership**: the trimmed area value must exactly match a catalog member
//! 2. **Required cells**: every bracket's `M` and `F` cell must be a non-negative whole number
//! 3. **Bracket totals**: a present, non-zero `TOTAL` cell must equal `M + F`
//! 4. **Grand totals** (opt-in): non-zero `TOTAL M` / `TOTAL F` / `TOTAL` must match the bracket sums

pub mod report;
pub mod validator;

#[cfg(test)]
pub mod tests;

pub use report::ValidationReport;
pub use validator::ConsistencyValidator;

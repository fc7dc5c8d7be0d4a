//! Import pipeline: upload to persisted records
//!
//! Drives one upload through the lifecycle
//! `Uploaded → Parsed → Validated → Normalized → Persisting → Persisted`.
//!
//! # Error tiers
//!
//! 1. **Parse errors** abort the attempt with `Err`; nothing is written.
//! 2. **Validation issues** come back as [`ImportOutcome::Rejected`] with the
//!    complete, row-addressable issue list; nothing is written.
//! 3. **Store failures** are caught per record into [`BatchResult::failed`]
//!    while the loop continues. There is no transaction and no rollback:
//!    partial success is a normal outcome.
//!
//! Repeated or concurrent imports of the same area and period are not
//! deduplicated; their counts add up at aggregation time.

pub mod pipeline;
pub mod result;
pub mod stage;

#[cfg(test)]
pub mod tests;

pub use pipeline::{ImportPipeline, ImportSource};
pub use result::{BatchResult, FailedRecord, ImportOutcome};
pub use stage::ImportStage;

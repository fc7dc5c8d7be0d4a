//! Record store seam
//!
//! The engine persists normalized records through the async [`RecordStore`]
//! trait and never assumes transactions: every `create` is independent, so a
//! failure part-way through an import leaves earlier records in place.
//!
//! Two adapters are provided:
//! - [`MemoryRecordStore`] - mutex-guarded vector, used in tests and one-shot runs
//! - [`JsonlRecordStore`] - JSON-lines file, so records survive between CLI invocations

pub mod jsonl;
pub mod memory;

#[cfg(test)]
pub mod tests;

use async_trait::async_trait;

use crate::app::models::{BatchId, NewRecord, NormalizedRecord, RecordId, RecordPatch};
use crate::app::services::aggregator::RecordFilter;

pub use jsonl::JsonlRecordStore;
pub use memory::MemoryRecordStore;

/// Result type for record store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors raised by record store adapters
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No record with this id
    #[error("Record {id} not found")]
    NotFound { id: RecordId },

    /// Backend refused or failed the operation
    #[error("Store backend error: {message}")]
    Backend { message: String },

    /// I/O failure in a file-backed store
    #[error("Store I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored data could not be encoded or decoded
    #[error("Store serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }
}

/// Persistence for normalized records
///
/// Guarantees:
/// - `create` assigns a fresh id and never merges with existing records.
/// - `list` returns matching records in creation order.
/// - `delete_by_batch` removes exactly the records tagged with that batch.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist one record and return its id
    async fn create(&self, record: NewRecord) -> StoreResult<RecordId>;

    /// Records matching the filter, in creation order
    async fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<NormalizedRecord>>;

    /// One record by id. Returns `StoreError::NotFound` if absent.
    async fn get(&self, id: RecordId) -> StoreResult<NormalizedRecord>;

    /// Apply a partial update and return the updated record
    async fn update(&self, id: RecordId, patch: RecordPatch) -> StoreResult<NormalizedRecord>;

    /// Delete one record. Returns `StoreError::NotFound` if absent.
    async fn delete(&self, id: RecordId) -> StoreResult<()>;

    /// Delete every record created by one import, returning how many were removed
    async fn delete_by_batch(&self, batch_id: &BatchId) -> StoreResult<usize>;
}

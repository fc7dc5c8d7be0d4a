//! In-memory record store

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{RecordStore, StoreError, StoreResult};
use crate::app::models::{BatchId, NewRecord, NormalizedRecord, RecordId, RecordPatch};
use crate::app::services::aggregator::RecordFilter;

#[derive(Debug)]
struct MemoryState {
    records: Vec<NormalizedRecord>,
    next_id: u64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

/// In-memory record store backed by a `Vec` in creation order
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    state: Mutex<MemoryState>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    ///
    /// A poisoned lock still reports the records it holds.
    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::backend("Memory store lock poisoned"))
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, record: NewRecord) -> StoreResult<RecordId> {
        let mut state = self.lock()?;
        let id = RecordId(state.next_id);
        state.next_id += 1;
        state.records.push(NormalizedRecord::from_new(id, record));
        Ok(id)
    }

    async fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<NormalizedRecord>> {
        let state = self.lock()?;
        Ok(filter.apply(&state.records).cloned().collect())
    }

    async fn get(&self, id: RecordId) -> StoreResult<NormalizedRecord> {
        let state = self.lock()?;
        state
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn update(&self, id: RecordId, patch: RecordPatch) -> StoreResult<NormalizedRecord> {
        let mut state = self.lock()?;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        patch.apply(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        let mut state = self.lock()?;
        let position = state
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })?;
        state.records.remove(position);
        Ok(())
    }

    async fn delete_by_batch(&self, batch_id: &BatchId) -> StoreResult<usize> {
        let mut state = self.lock()?;
        let before = state.records.len();
        state
            .records
            .retain(|r| r.batch_id.as_ref() != Some(batch_id));
        Ok(before - state.records.len())
    }
}

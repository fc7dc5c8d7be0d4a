//! Test utilities for record store testing
//!
//! Provides a store wrapper that fails chosen `create` calls, used here and by
//! the import pipeline tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::app::models::{
    AreaCode, BatchId, Gender, Month, NewRecord, NormalizedRecord, Period, RecordId, RecordPatch,
};
use crate::app::services::aggregator::RecordFilter;
use crate::app::services::record_store::{MemoryRecordStore, RecordStore, StoreError, StoreResult};

mod memory_tests;

/// Memory store whose `create` fails on selected 1-based call numbers
#[derive(Debug, Default)]
pub struct FlakyRecordStore {
    inner: MemoryRecordStore,
    fail_on: HashSet<usize>,
    calls: AtomicUsize,
}

impl FlakyRecordStore {
    pub fn failing_on(calls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            fail_on: calls.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for FlakyRecordStore {
    async fn create(&self, record: NewRecord) -> StoreResult<RecordId> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on.contains(&call) {
            return Err(StoreError::backend(format!("simulated failure on call {}", call)));
        }
        self.inner.create(record).await
    }

    async fn list(&self, filter: &RecordFilter) -> StoreResult<Vec<NormalizedRecord>> {
        self.inner.list(filter).await
    }

    async fn get(&self, id: RecordId) -> StoreResult<NormalizedRecord> {
        self.inner.get(id).await
    }

    async fn update(&self, id: RecordId, patch: RecordPatch) -> StoreResult<NormalizedRecord> {
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: RecordId) -> StoreResult<()> {
        self.inner.delete(id).await
    }

    async fn delete_by_batch(&self, batch_id: &BatchId) -> StoreResult<usize> {
        self.inner.delete_by_batch(batch_id).await
    }
}

/// A new record for Aplaya, January 2025
pub fn new_record(bracket: &str, gender: Gender, count: u64) -> NewRecord {
    NewRecord {
        area: AreaCode::new("Aplaya"),
        bracket: bracket.to_string(),
        gender,
        period: Period::new(2025, Month::January).unwrap(),
        count,
        batch_id: None,
    }
}

/// Contract checks shared by every adapter
pub async fn exercise_store_contract(store: &dyn RecordStore) {
    let batch = BatchId::new("batch-a");
    let first = store.create(new_record("UNDER_1", Gender::Male, 10)).await.unwrap();
    let mut tagged = new_record("UNDER_1", Gender::Female, 8);
    tagged.batch_id = Some(batch.clone());
    let second = store.create(tagged.clone()).await.unwrap();
    let third = store.create(tagged).await.unwrap();

    assert_ne!(first, second);
    assert_ne!(second, third);

    // Identical content is not merged
    let all = store.list(&RecordFilter::all()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, first);
    assert_eq!(all[2].id, third);

    let females = store
        .list(&RecordFilter::all().with_genders([Gender::Female]))
        .await
        .unwrap();
    assert_eq!(females.len(), 2);

    let patch = RecordPatch {
        count: Some(11),
        ..Default::default()
    };
    let updated = store.update(first, patch).await.unwrap();
    assert_eq!(updated.count, 11);
    assert_eq!(store.get(first).await.unwrap().count, 11);

    assert_eq!(store.delete_by_batch(&batch).await.unwrap(), 2);
    assert_eq!(store.delete_by_batch(&batch).await.unwrap(), 0);

    store.delete(first).await.unwrap();
    assert!(matches!(
        store.delete(first).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.get(first).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.update(first, RecordPatch::default()).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(store.list(&RecordFilter::all()).await.unwrap().is_empty());
}

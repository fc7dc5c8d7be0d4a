//! Tests for the in-memory store

use super::*;

#[tokio::test]
async fn test_memory_store_contract() {
    let store = MemoryRecordStore::new();
    exercise_store_contract(&store).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_memory_store_ids_not_reused() {
    let store = MemoryRecordStore::new();
    let first = store.create(new_record("A", Gender::Male, 1)).await.unwrap();
    store.delete(first).await.unwrap();
    let second = store.create(new_record("A", Gender::Male, 1)).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_flaky_store_fails_selected_calls() {
    let store = FlakyRecordStore::failing_on([2]);
    assert!(store.create(new_record("A", Gender::Male, 1)).await.is_ok());
    assert!(matches!(
        store.create(new_record("A", Gender::Male, 1)).await,
        Err(StoreError::Backend { .. })
    ));
    assert!(store.create(new_record("A", Gender::Male, 1)).await.is_ok());

    assert_eq!(store.create_calls(), 3);
    assert_eq!(store.list(&RecordFilter::all()).await.unwrap().len(), 2);
}

//! Integration tests for the public facade API
//!
//! These run against the in-memory backends so they need no running services.
use std::sync::Arc;

use backend_facade::{
    Backends, CacheBackend, CacheConfig, CacheFacade, Collection, InMemoryCacheStore,
    InMemoryDocumentStore, StorageError, StoreBackend, StoreConfig, StoreFacade, report,
};
use serde_json::json;
use tokio::sync::Notify;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_on_distinct_keys() {
    // Given one cache facade shared by many tasks
    let cache = Arc::new(CacheFacade::open(Arc::new(InMemoryCacheStore::new())));

    // When each task writes, reads back and deletes its own keys
    let mut handles = Vec::new();
    for task in 0..16 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                let key = format!("task-{task}-key-{i}");
                let value = format!("value-{task}-{i}");
                cache.set(&key, &value, 60).await;
                assert_eq!(cache.get(&key).await, Some(value));
                if i % 2 == 0 {
                    cache.del(&key).await;
                    assert_eq!(cache.get(&key).await, None);
                }
            }
        }));
    }
    for handle in handles {
        handle.await.expect("task panicked");
    }

    // Then every surviving key holds what its writer left there
    for task in 0..16 {
        for i in 0..25 {
            let key = format!("task-{task}-key-{i}");
            let expected = (i % 2 == 1).then(|| format!("value-{task}-{i}"));
            assert_eq!(cache.get(&key).await, expected);
        }
    }
    assert!(cache.is_alive());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_writer_wins_per_key() {
    let cache = Arc::new(CacheFacade::open(Arc::new(InMemoryCacheStore::new())));

    // Writers race on one key; each round is sequenced so the last write is known
    for round in 0..10 {
        let writers: Vec<_> = (0..8)
            .map(|w| {
                let cache = cache.clone();
                tokio::spawn(async move { cache.set("shared", &format!("{round}-{w}"), 60).await })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }
        cache.set("shared", &format!("{round}-final"), 60).await;

        assert_eq!(cache.get("shared").await, Some(format!("{round}-final")));
    }
}

#[tokio::test]
async fn early_calls_wait_for_the_connection() {
    // Given a store whose connection is still being established
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(InMemoryDocumentStore::new().with_connect_gate(gate.clone()));
    backend.insert("users", json!({"email": "early@example.com"})).await;
    let store = Arc::new(StoreFacade::open(backend));

    // When a count is requested before the connection is up
    let pending = {
        let store = store.clone();
        tokio::spawn(async move { store.try_count(Collection::Users).await })
    };
    tokio::task::yield_now().await;
    assert!(!store.is_alive());
    assert!(!pending.is_finished());

    // Then it completes once the connection is established
    gate.notify_one();
    assert_eq!(pending.await.unwrap(), Ok(1));
    assert!(store.is_alive());
}

#[tokio::test]
async fn failure_and_empty_are_distinguishable_through_try_methods() {
    let backend = Arc::new(InMemoryDocumentStore::new());
    let store = StoreFacade::open(backend.clone());

    assert_eq!(store.try_count(Collection::Files).await, Ok(0));

    backend.set_failing(true);
    assert_eq!(store.count_files().await, 0);
    assert!(store.try_count(Collection::Files).await.is_err());
}

#[tokio::test]
async fn status_and_stats_from_memory_backends() {
    // Given both backends configured in memory
    let backends = Backends::from_config(
        &StoreConfig {
            backend: StoreBackend::Memory,
            ..StoreConfig::default()
        },
        &CacheConfig {
            backend: CacheBackend::Memory,
            ..CacheConfig::default()
        },
    )
    .unwrap();
    assert!(backends.ready().await);

    // Then status and stats serialize the way an HTTP layer would return them
    assert_eq!(
        serde_json::to_value(backends.status()).unwrap(),
        json!({"redis": true, "db": true})
    );
    assert_eq!(
        serde_json::to_value(report::stats(&backends.store).await).unwrap(),
        json!({"users": 0, "files": 0})
    );

    backends.close().await;
    assert_eq!(
        backends.cache.try_get("anything").await,
        Err(StorageError::Closed)
    );
}

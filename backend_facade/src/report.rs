//! Status and statistics snapshots built from the facades.

use serde::Serialize;

use crate::cache::CacheFacade;
use crate::store::StoreFacade;

/// Liveness of both backends, serialized as `{"redis": bool, "db": bool}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub redis: bool,
    pub db: bool,
}

/// Document counts, serialized as `{"users": n, "files": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub users: u64,
    pub files: u64,
}

pub fn status(store: &StoreFacade, cache: &CacheFacade) -> Status {
    Status {
        redis: cache.is_alive(),
        db: store.is_alive(),
    }
}

pub async fn stats(store: &StoreFacade) -> Stats {
    let (users, files) = tokio::join!(store.count_users(), store.count_files());
    Stats { users, files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheStore;
    use crate::store::InMemoryDocumentStore;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_status_reports_each_backend() {
        // Given a reachable store and an unreachable cache
        let store = StoreFacade::open(Arc::new(InMemoryDocumentStore::new()));
        let cache_store = Arc::new(InMemoryCacheStore::new());
        cache_store.set_reachable(false);
        let cache = CacheFacade::open(cache_store);
        store.ready().await;
        cache.ready().await;

        // When taking a status snapshot
        let snapshot = status(&store, &cache);

        // Then it reflects each link
        assert_eq!(
            snapshot,
            Status {
                redis: false,
                db: true
            }
        );
        assert_eq!(
            serde_json::to_value(snapshot).unwrap(),
            json!({"redis": false, "db": true})
        );
    }

    #[tokio::test]
    async fn test_stats_counts_both_collections() {
        let backend = Arc::new(InMemoryDocumentStore::new());
        backend.insert("users", json!({"email": "a@example.com"})).await;
        backend.insert("files", json!({"name": "a"})).await;
        backend.insert("files", json!({"name": "b"})).await;
        let store = StoreFacade::open(backend);

        let snapshot = stats(&store).await;

        assert_eq!(
            serde_json::to_value(snapshot).unwrap(),
            json!({"users": 1, "files": 2})
        );
    }
}

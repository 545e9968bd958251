use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::{CacheBackend, CacheConfig};
use crate::errors::StorageError;
use crate::health::{HealthState, Link};

use super::memory::InMemoryCacheStore;
use super::redis::RedisCacheStore;
use super::types::CacheStore;

/// Liveness plus get/set/del with expiry over a key-value cache.
///
/// Like [`crate::StoreFacade`], construction spawns the connection attempt and
/// returns at once. `get`, `set` and `del` absorb every failure; the `try_*`
/// variants return it.
pub struct CacheFacade {
    store: Arc<dyn CacheStore>,
    link: Link,
    connect_task: JoinHandle<()>,
}

impl CacheFacade {
    pub fn open(store: Arc<dyn CacheStore>) -> Self {
        let link = Link::new();
        let connect_task = {
            let store = store.clone();
            link.spawn_connect("cache_store", async move { store.init().await })
        };

        Self {
            store,
            link,
            connect_task,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self, StorageError> {
        tracing::info!(
            "Initializing cache store with type: {}, url: {}",
            config.backend,
            config.url
        );

        let store: Arc<dyn CacheStore> = match config.backend {
            CacheBackend::Redis => Arc::new(RedisCacheStore::new(&config.url)?),
            CacheBackend::Memory => Arc::new(InMemoryCacheStore::new()),
        };
        Ok(Self::open(store))
    }

    pub fn is_alive(&self) -> bool {
        self.health() == HealthState::Connected
    }

    pub fn health(&self) -> HealthState {
        self.link.health()
    }

    /// Waits for the initial connection attempt, then reports liveness.
    pub async fn ready(&self) -> bool {
        self.link.settled().await;
        self.is_alive()
    }

    pub async fn try_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.link.run(self.store.get(key)).await
    }

    pub async fn try_set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<(), StorageError> {
        if ttl_seconds == 0 {
            return Err(StorageError::InvalidInput(
                "TTL must be at least one second".to_string(),
            ));
        }
        self.link
            .run(self.store.put_with_ttl(key, value, ttl_seconds))
            .await
    }

    pub async fn try_del(&self, key: &str) -> Result<(), StorageError> {
        self.link.run(self.store.remove(key)).await
    }

    /// Value stored under `key`; `None` when absent, expired, or on failure.
    pub async fn get(&self, key: &str) -> Option<String> {
        self.try_get(key).await.unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "Error getting key from cache");
            None
        })
    }

    pub async fn set(&self, key: &str, value: &str, ttl_seconds: u64) {
        if let Err(e) = self.try_set(key, value, ttl_seconds).await {
            tracing::error!(key, ttl_seconds, error = %e, "Error setting key in cache");
        }
    }

    pub async fn del(&self, key: &str) {
        if let Err(e) = self.try_del(key).await {
            tracing::error!(key, error = %e, "Error deleting key from cache");
        }
    }

    /// Stops a pending connect attempt and releases the connection. Idempotent.
    pub async fn close(&self) {
        if !self.link.close() {
            return;
        }
        self.connect_task.abort();
        self.store.shutdown().await;
        tracing::info!("Cache store closed");
    }
}

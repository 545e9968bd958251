//! backend_facade - liveness-gated access to a document store and a key-value cache
//!
//! Each facade owns one connection to its backing service, reports whether that
//! connection is usable, and degrades to neutral values (`0`, `None`, no-op)
//! instead of propagating backend failures. The `try_*` methods expose the
//! underlying [`StorageError`] for callers that need to tell "empty" from
//! "failed".

mod cache;
mod config;
mod errors;
mod health;
pub mod report;
mod store;

use std::sync::Arc;

pub use cache::{CacheFacade, CacheStore, InMemoryCacheStore, RedisCacheStore};
pub use config::{
    CacheBackend, CacheConfig, DEFAULT_CACHE_URL, DEFAULT_DB_DATABASE, DEFAULT_DB_HOST,
    DEFAULT_DB_PORT, StoreBackend, StoreConfig,
};
pub use errors::StorageError;
pub use health::HealthState;
pub use store::{
    Collection, DocumentStore, InMemoryDocumentStore, MongoDocumentStore, StoreFacade,
};

/// Both facades, constructed together and handed to the application at startup.
#[derive(Clone)]
pub struct Backends {
    pub store: Arc<StoreFacade>,
    pub cache: Arc<CacheFacade>,
}

impl Backends {
    /// Reads [`StoreConfig`] and [`CacheConfig`] from the environment and opens
    /// both facades. Must be called from within a tokio runtime.
    pub fn from_env() -> Result<Self, StorageError> {
        let store_config = StoreConfig::from_env()?;
        let cache_config = CacheConfig::from_env()?;
        Self::from_config(&store_config, &cache_config)
    }

    pub fn from_config(
        store_config: &StoreConfig,
        cache_config: &CacheConfig,
    ) -> Result<Self, StorageError> {
        let cache = CacheFacade::from_config(cache_config)?;
        let store = StoreFacade::from_config(store_config);
        Ok(Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
        })
    }

    pub fn status(&self) -> report::Status {
        report::status(&self.store, &self.cache)
    }

    pub async fn stats(&self) -> report::Stats {
        report::stats(&self.store).await
    }

    /// Waits for both initial connection attempts; true if both came up.
    pub async fn ready(&self) -> bool {
        let (store, cache) = tokio::join!(self.store.ready(), self.cache.ready());
        store && cache
    }

    pub async fn close(&self) {
        tokio::join!(self.store.close(), self.cache.close());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_backends_from_memory_config() {
        // Given in-memory backends for both services
        let store_config = StoreConfig {
            backend: StoreBackend::Memory,
            ..StoreConfig::default()
        };
        let cache_config = CacheConfig {
            backend: CacheBackend::Memory,
            ..CacheConfig::default()
        };

        // When opening them together
        let backends = Backends::from_config(&store_config, &cache_config).unwrap();

        // Then both come up and report through the bundle
        assert!(backends.ready().await);
        assert_eq!(
            backends.status(),
            report::Status {
                redis: true,
                db: true
            }
        );
        assert_eq!(backends.stats().await, report::Stats { users: 0, files: 0 });

        // And closing shuts both down
        backends.close().await;
        assert_eq!(
            backends.status(),
            report::Status {
                redis: false,
                db: false
            }
        );
    }
}

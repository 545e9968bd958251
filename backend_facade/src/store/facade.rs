use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::{StoreBackend, StoreConfig};
use crate::errors::StorageError;
use crate::health::{HealthState, Link};

use super::memory::InMemoryDocumentStore;
use super::mongo::MongoDocumentStore;
use super::types::{Collection, DocumentStore};

/// Liveness and document counts over a document store.
///
/// Constructing a facade spawns the connection attempt and returns
/// immediately; it must be called from within a tokio runtime. The simple
/// accessors never fail: errors are logged and reported as `0`. Use
/// [`StoreFacade::try_count`] to tell an empty collection from a failure.
pub struct StoreFacade {
    store: Arc<dyn DocumentStore>,
    link: Link,
    connect_task: JoinHandle<()>,
}

impl StoreFacade {
    pub fn open(store: Arc<dyn DocumentStore>) -> Self {
        let link = Link::new();
        let connect_task = {
            let store = store.clone();
            link.spawn_connect("document_store", async move { store.connect().await })
        };

        Self {
            store,
            link,
            connect_task,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        tracing::info!(
            "Initializing data store with type: {}, uri: {}, database: {}",
            config.backend,
            config.uri(),
            config.database
        );

        let store: Arc<dyn DocumentStore> = match config.backend {
            StoreBackend::Mongo => Arc::new(MongoDocumentStore::new(config)),
            StoreBackend::Memory => Arc::new(InMemoryDocumentStore::new()),
        };
        Self::open(store)
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

    pub async fn try_count(&self, collection: Collection) -> Result<u64, StorageError> {
        self.link.run(self.store.count(collection.as_str())).await
    }

    pub async fn count_users(&self) -> u64 {
        self.count_or_zero(Collection::Users).await
    }

    pub async fn count_files(&self) -> u64 {
        self.count_or_zero(Collection::Files).await
    }

    async fn count_or_zero(&self, collection: Collection) -> u64 {
        match self.try_count(collection).await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(collection = %collection, error = %e, "Error fetching document count");
                0
            }
        }
    }

    /// Stops a pending connect attempt and releases the connection. Idempotent.
    pub async fn close(&self) {
        if !self.link.close() {
            return;
        }
        self.connect_task.abort();
        self.store.shutdown().await;
        tracing::info!("Document store closed");
    }
}

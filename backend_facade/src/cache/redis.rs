use async_trait::async_trait;
use redis::{
    AsyncCommands,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::errors::StorageError;

use super::types::CacheStore;

// Retries inside a single connect attempt; the facade keeps retrying on later calls.
const CONNECT_RETRIES: usize = 1;

/// Redis-backed cache.
///
/// Holds one `ConnectionManager`, shared by every caller, which re-establishes
/// the underlying multiplexed connection after it drops. If the server was
/// down when `init` ran, the manager is created by the first call that finds
/// the server up.
pub struct RedisCacheStore {
    client: redis::Client,
    conn: RwLock<Option<ConnectionManager>>,
    closed: AtomicBool,
}

impl RedisCacheStore {
    pub fn new(url: &str) -> Result<Self, StorageError> {
        let client = redis::Client::open(url).map_err(|e| {
            tracing::error!("Failed to create Redis client: {}", e);
            StorageError::Config(format!("Invalid Redis URL {url}: {e}"))
        })?;

        Ok(Self {
            client,
            conn: RwLock::new(None),
            closed: AtomicBool::new(false),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, StorageError> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }
        self.connect().await
    }

    async fn connect(&self) -> Result<ConnectionManager, StorageError> {
        let mut slot = self.conn.write().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }
        if self.closed.load(Ordering::SeqCst) {
            return Err(StorageError::ConnectionUnavailable(
                "Redis store is shut down".to_string(),
            ));
        }

        let config = ConnectionManagerConfig::new().set_number_of_retries(CONNECT_RETRIES);
        let conn = ConnectionManager::new_with_config(self.client.clone(), config).await?;
        tracing::debug!("Redis connection manager created");
        *slot = Some(conn.clone());
        Ok(conn)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        self.connect().await.map(|_| ())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put_with_ttl(&self, key: &str, value: &str, ttl: u64) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(key, value, ttl).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        if self.conn.write().await.take().is_some() {
            tracing::info!("Redis connection released");
        }
    }
}

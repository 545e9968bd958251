use async_trait::async_trait;

use crate::errors::StorageError;

// Trait
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Initialize the store. Called once, from the facade's connect task.
    async fn init(&self) -> Result<(), StorageError>;

    /// Get a value from the store.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Put a value into the store; the store evicts it after `ttl` seconds.
    async fn put_with_ttl(&self, key: &str, value: &str, ttl: u64) -> Result<(), StorageError>;

    /// Remove a value from the store. Removing a missing key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Release the connection.
    async fn shutdown(&self);
}

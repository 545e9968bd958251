use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::StorageError;

use super::types::CacheStore;

struct Entry {
    value: String,
    // None when the deadline lies beyond what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| deadline > now)
    }
}

/// Cache kept in process memory. Entries expire like they would on a cache
/// server: once the deadline passes they are no longer returned.
pub struct InMemoryCacheStore {
    entry: Mutex<HashMap<String, Entry>>,
    reachable: AtomicBool,
}

impl Default for InMemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory cache store");
        Self {
            entry: Mutex::new(HashMap::new()),
            reachable: AtomicBool::new(true),
        }
    }

    /// An unreachable store fails `init` and every operation with a connection error.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Number of entries held. Expired entries count until a read or a write sweeps them.
    pub async fn len(&self) -> usize {
        self.entry.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_reachable(&self) -> Result<(), StorageError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::ConnectionUnavailable(
                "in-memory cache store is unreachable".to_string(),
            ))
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        self.check_reachable()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_reachable()?;

        let mut entries = self.entry.lock().await;
        match entries.get(key) {
            Some(entry) if entry.is_live(Instant::now()) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn put_with_ttl(&self, key: &str, value: &str, ttl: u64) -> Result<(), StorageError> {
        self.check_reachable()?;

        let now = Instant::now();
        let expires_at = now.checked_add(Duration::from_secs(ttl));

        let mut entries = self.entry.lock().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_reachable()?;

        self.entry.lock().await.remove(key);
        Ok(())
    }

    async fn shutdown(&self) {
        tracing::debug!("In-memory cache store shut down");
    }
}

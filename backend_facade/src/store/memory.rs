use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, Notify};

use crate::errors::StorageError;

use super::types::DocumentStore;

/// Document store kept in process memory.
///
/// Reachability and query failures can be toggled at runtime, and the connect
/// step can be held back behind a [`Notify`], which makes it usable as a
/// stand-in for a real server in tests.
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    reachable: AtomicBool,
    failing: AtomicBool,
    connect_gate: Option<Arc<Notify>>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory document store");
        Self {
            collections: Mutex::new(HashMap::new()),
            reachable: AtomicBool::new(true),
            failing: AtomicBool::new(false),
            connect_gate: None,
        }
    }

    /// `connect` will not complete until `gate` is notified.
    pub fn with_connect_gate(mut self, gate: Arc<Notify>) -> Self {
        self.connect_gate = Some(gate);
        self
    }

    pub async fn insert(&self, collection: &str, document: Value) {
        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// An unreachable store refuses to connect and fails every query with a connection error.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// A failing store stays reachable but rejects queries.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_reachable(&self) -> Result<(), StorageError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StorageError::ConnectionUnavailable(
                "in-memory document store is unreachable".to_string(),
            ))
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn connect(&self) -> Result<(), StorageError> {
        if let Some(gate) = &self.connect_gate {
            gate.notified().await;
        }
        self.check_reachable()
    }

    async fn count(&self, collection: &str) -> Result<u64, StorageError> {
        self.check_reachable()?;
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::OperationFailed(format!(
                "count on {collection} rejected"
            )));
        }

        let collections = self.collections.lock().await;
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn shutdown(&self) {
        tracing::debug!("In-memory document store shut down");
    }
}

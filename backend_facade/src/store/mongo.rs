use async_trait::async_trait;
use mongodb::{
    Client,
    bson::{Document, doc},
};
use tokio::sync::OnceCell;

use crate::config::StoreConfig;
use crate::errors::StorageError;

use super::types::DocumentStore;

/// MongoDB-backed document store. Holds a single client for its lifetime.
pub struct MongoDocumentStore {
    uri: String,
    database: String,
    client: OnceCell<Client>,
}

impl MongoDocumentStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            uri: config.uri(),
            database: config.database.clone(),
            client: OnceCell::new(),
        }
    }

    fn client(&self) -> Result<&Client, StorageError> {
        self.client.get().ok_or_else(|| {
            StorageError::ConnectionUnavailable(format!("No MongoDB client for {}", self.uri))
        })
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn connect(&self) -> Result<(), StorageError> {
        tracing::info!(uri = %self.uri, database = %self.database, "Connecting to MongoDB");

        let client = self
            .client
            .get_or_try_init(|| Client::with_uri_str(self.uri.as_str()))
            .await?;

        // The driver connects lazily; a ping forces the first round trip.
        client
            .database(&self.database)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(database = %self.database))]
    async fn count(&self, collection: &str) -> Result<u64, StorageError> {
        let count = self
            .client()?
            .database(&self.database)
            .collection::<Document>(collection)
            .count_documents(doc! {})
            .await?;

        tracing::debug!(count, "Counted documents");
        Ok(count)
    }

    async fn shutdown(&self) {
        if let Some(client) = self.client.get() {
            tracing::info!(uri = %self.uri, "Shutting down MongoDB client");
            client.clone().shutdown().await;
        }
    }
}

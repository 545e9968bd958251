use std::fmt;

use async_trait::async_trait;

use crate::errors::StorageError;

/// The two collections the facade knows how to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Files,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client side of a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Establish the connection. Called once, from the facade's connect task.
    async fn connect(&self) -> Result<(), StorageError>;

    /// Number of documents in `collection`.
    async fn count(&self, collection: &str) -> Result<u64, StorageError>;

    /// Release the connection.
    async fn shutdown(&self);
}

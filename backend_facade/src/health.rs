//! Connection state shared between a facade and its background connect task.

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::errors::StorageError;

/// Liveness as seen by callers of a facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkState {
    Connecting,
    Connected,
    Disconnected,
    Closed,
}

/// Lifecycle of the single connection a facade owns.
///
/// The initial connect attempt moves the link out of `Connecting`; after that,
/// operation outcomes flip it between `Connected` and `Disconnected` until
/// `close` pins it to `Closed`.
#[derive(Debug, Clone)]
pub(crate) struct Link {
    tx: Arc<watch::Sender<LinkState>>,
}

impl Link {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(LinkState::Connecting);
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn state(&self) -> LinkState {
        *self.tx.borrow()
    }

    pub(crate) fn health(&self) -> HealthState {
        match self.state() {
            LinkState::Connected => HealthState::Connected,
            _ => HealthState::Disconnected,
        }
    }

    pub(crate) fn mark_connected(&self) {
        self.transition(LinkState::Connected);
    }

    pub(crate) fn mark_disconnected(&self) {
        self.transition(LinkState::Disconnected);
    }

    /// Returns false if the link was already closed.
    pub(crate) fn close(&self) -> bool {
        self.tx.send_replace(LinkState::Closed) != LinkState::Closed
    }

    fn transition(&self, next: LinkState) {
        self.tx.send_if_modified(|state| {
            if *state == LinkState::Closed || *state == next {
                return false;
            }
            *state = next;
            true
        });
    }

    /// Waits until the initial connect attempt has finished (or the link was closed).
    pub(crate) async fn settled(&self) -> LinkState {
        let mut rx = self.tx.subscribe();
        let settled = rx
            .wait_for(|state| *state != LinkState::Connecting)
            .await
            .map(|state| *state);
        settled.unwrap_or(LinkState::Closed)
    }

    /// Runs one backend round trip once the link has settled and folds the
    /// outcome back into the link state.
    pub(crate) async fn run<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        if self.settled().await == LinkState::Closed {
            return Err(StorageError::Closed);
        }

        let result = op.await;
        // close() may have shut the backend down while the round trip was in flight.
        if self.state() == LinkState::Closed {
            return Err(StorageError::Closed);
        }
        match &result {
            Ok(_) => self.mark_connected(),
            Err(e) if e.is_connection_error() => self.mark_disconnected(),
            Err(_) => {}
        }
        result
    }

    /// Spawns the initial connect attempt. The facade never awaits it directly;
    /// callers observe its outcome through the link.
    pub(crate) fn spawn_connect<F>(&self, service: &'static str, connect: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), StorageError>> + Send + 'static,
    {
        let link = self.clone();
        tokio::spawn(async move {
            match connect.await {
                Ok(()) => {
                    tracing::info!(service, "Connection established");
                    link.mark_connected();
                }
                Err(e @ StorageError::Config(_)) => {
                    tracing::error!(service, error = %e, "Invalid connection configuration");
                    link.mark_disconnected();
                }
                Err(e) => {
                    tracing::error!(service, error = %e, "Failed to connect");
                    link.mark_disconnected();
                }
            }
        })
    }
}

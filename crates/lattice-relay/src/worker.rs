//! Relay worker: consumes a notification stream and dispatches each item.
//!
//! The dispatcher itself is invocation-safe under any concurrency; the
//! worker adds the operational wrapper: a bounded queue, a concurrency cap
//! on in-flight lookups, and graceful shutdown.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use lattice_core::defaults;
use lattice_core::{ChangeNotification, Error, Result};

use crate::dispatcher::RelayDispatcher;

/// Configuration for the relay worker.
#[derive(Debug, Clone)]
pub struct RelayWorkerConfig {
    /// Maximum notifications processed concurrently. Bounds concurrent
    /// calls to the entity lookup service.
    pub max_concurrent: usize,
    /// Whether to process notifications at all.
    pub enabled: bool,
}

impl Default for RelayWorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::RELAY_MAX_CONCURRENT,
            enabled: true,
        }
    }
}

impl RelayWorkerConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `RELAY_WORKER_ENABLED` | `true` | Enable/disable processing |
    /// | `RELAY_MAX_CONCURRENT` | `4` | Max concurrent dispatches |
    pub fn from_env() -> Self {
        let enabled = std::env::var("RELAY_WORKER_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        let max_concurrent = std::env::var("RELAY_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults::RELAY_MAX_CONCURRENT)
            .max(1);

        Self {
            max_concurrent,
            enabled,
        }
    }

    /// Set the concurrency bound.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        self.max_concurrent = max.max(1);
        self
    }

    /// Enable or disable processing.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Handle for controlling a running worker.
pub struct RelayWorkerHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: tokio::task::JoinHandle<()>,
}

impl RelayWorkerHandle {
    /// Signal the worker to stop accepting new notifications, then wait for
    /// the queued and in-flight ones to finish.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(()).await;
        self.join
            .await
            .map_err(|e| Error::Internal(format!("relay worker task failed: {e}")))
    }
}

/// Drives a [`RelayDispatcher`] from an inbound notification queue.
pub struct RelayWorker {
    dispatcher: Arc<RelayDispatcher>,
    config: RelayWorkerConfig,
}

impl RelayWorker {
    pub fn new(dispatcher: Arc<RelayDispatcher>, config: RelayWorkerConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Start the worker on the given notification queue and return a handle
    /// for control. The worker stops when the queue's senders are dropped
    /// or the handle signals shutdown.
    pub fn start(self, notifications: mpsc::Receiver<ChangeNotification>) -> RelayWorkerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let join = tokio::spawn(self.run(notifications, shutdown_rx));
        RelayWorkerHandle { shutdown_tx, join }
    }

    async fn run(
        self,
        mut notifications: mpsc::Receiver<ChangeNotification>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        if !self.config.enabled {
            info!("Relay worker is disabled, not starting");
            return;
        }

        info!(
            max_concurrent = self.config.max_concurrent,
            "Relay worker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut tasks: JoinSet<()> = JoinSet::new();

        loop {
            // Reap finished dispatches so the set does not grow unbounded.
            while let Some(result) = tasks.try_join_next() {
                if let Err(e) = result {
                    error!(error = ?e, "Relay dispatch task panicked");
                }
            }

            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Relay worker received shutdown signal, draining queue");
                    // Stop accepting new notifications; recv keeps yielding
                    // the already-queued ones until the buffer is empty.
                    notifications.close();
                }
                maybe = notifications.recv() => {
                    let Some(notification) = maybe else {
                        debug!("Notification queue closed");
                        break;
                    };
                    let permit = match semaphore.clone().acquire_owned().await {
                        Ok(permit) => permit,
                        Err(_) => break,
                    };
                    let dispatcher = self.dispatcher.clone();
                    tasks.spawn(async move {
                        let _permit = permit;
                        dispatcher.dispatch(notification).await;
                    });
                }
            }
        }

        // Drain in-flight dispatches before reporting stopped.
        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                error!(error = ?e, "Relay dispatch task panicked");
            }
        }
        info!("Relay worker stopped");
    }
}

//! High-level tracker orchestrator.
//!
//! The tracker owns the consumer worker, wires the publisher and store
//! together, and exposes a builder-based API for the request layer.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{Health, LeaderboardEntry, Result, TrackerError, TrackerHandle};
use crate::config::TrackerConfig;
use crate::publisher::EventPublisher;
use crate::store::ScoreStore;
use crate::transport::Transport;
use crate::workers::{ConsumerState, ConsumerStatus, ConsumerWorker, MetricsSnapshot, TrackerMetrics};

/// Score tracker composing the store, publisher and consumer.
///
/// [`TrackerHandle`] provides a cloneable façade for request handlers.
/// Dropping the tracker without calling [`ScoreTracker::shutdown`] still
/// stops the consumer, but does not wait for it.
pub struct ScoreTracker {
    handle: TrackerHandle,
    config: TrackerConfig,

    shutdown_tx: watch::Sender<bool>,
    consumer_handle: Option<JoinHandle<()>>,
}

impl ScoreTracker {
    /// Create a new tracker builder
    pub fn builder() -> ScoreTrackerBuilder {
        ScoreTrackerBuilder::new()
    }

    /// Get a cloneable handle to this tracker
    pub fn handle(&self) -> TrackerHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// See [`TrackerHandle::record_move`].
    pub async fn record_move(&self, player: Option<&str>, chips: Option<i64>) -> String {
        self.handle.record_move(player, chips).await
    }

    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.handle.leaderboard(limit)
    }

    pub fn health(&self) -> Health {
        self.handle.health()
    }

    pub fn consumer_state(&self) -> ConsumerState {
        self.handle.consumer_state()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.handle.metrics()
    }

    /// Stop the consumer and wait for it to release its subscription.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown_tx.send_replace(true);

        if let Some(consumer_handle) = self.consumer_handle {
            consumer_handle.await.map_err(TrackerError::WorkerJoin)?;
        }

        info!("ScoreTracker shut down");
        Ok(())
    }
}

/// Builder for [`ScoreTracker`].
pub struct ScoreTrackerBuilder {
    config: TrackerConfig,
    transport: Option<Arc<dyn Transport>>,
    store: Option<ScoreStore>,
}

impl ScoreTrackerBuilder {
    fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            transport: None,
            store: None,
        }
    }

    /// Override tracker configuration
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach the shared-topic transport.
    ///
    /// Ignored unless the configuration lists at least one broker.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Attach an already shared transport, or `None` when it is unavailable.
    pub fn shared_transport(mut self, transport: Option<Arc<dyn Transport>>) -> Self {
        self.transport = transport;
        self
    }

    /// Use an existing store instead of a fresh one.
    pub fn store(mut self, store: ScoreStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the tracker, starting the consumer when the shared topic is
    /// both configured and available.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn build(self) -> ScoreTracker {
        let config = self.config;
        let store = self.store.unwrap_or_default();
        let metrics = Arc::new(TrackerMetrics::new());

        let transport = match (config.is_enabled(), self.transport) {
            (true, Some(transport)) => Some(transport),
            (true, None) => {
                warn!("Brokers configured but no transport available; shared topic disabled");
                None
            }
            (false, Some(_)) => {
                warn!("Transport supplied without brokers; shared topic disabled");
                None
            }
            (false, None) => None,
        };

        let status = ConsumerStatus::new(if transport.is_some() {
            ConsumerState::Connecting
        } else {
            ConsumerState::Disabled
        });

        let publisher = EventPublisher::new(
            transport.clone(),
            store.clone(),
            Arc::clone(&metrics),
            config.source.clone(),
            config.ack_timeout,
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let consumer_handle = match transport {
            Some(transport) => {
                let worker = ConsumerWorker::new(
                    transport,
                    store.clone(),
                    status.clone(),
                    Arc::clone(&metrics),
                    config.topic.clone(),
                    config.reconnect_backoff,
                    shutdown_rx,
                );

                Some(tokio::spawn(async move {
                    worker.run().await;
                }))
            }
            None => {
                info!("Shared topic disabled; moves are applied locally");
                None
            }
        };

        let handle = TrackerHandle::new(publisher, store, status, metrics);

        ScoreTracker {
            handle,
            config,
            shutdown_tx,
            consumer_handle,
        }
    }
}

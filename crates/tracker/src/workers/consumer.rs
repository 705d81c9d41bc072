//! Shared-topic consumer worker.
//!
//! Subscribes to the shared topic and feeds every received move into the
//! score store. The worker owns the reconnect loop and publishes its state
//! through [`ConsumerStatus`].
//!
//! State machine:
//! - `Disabled` - no shared topic; the worker is never started
//! - `Connecting` → `Ready` on a successful subscription
//! - `Connecting`/`Ready` → `Reconnecting` on any transport error, then back
//!   to `Connecting` after the backoff interval, forever. A lagging
//!   subscription is still live: skipped events are counted and receiving
//!   continues
//! - any state → `Stopped` once shutdown is requested

use std::sync::Arc;
use std::time::Duration;

use strum::Display;
use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::events::{DecodeOutcome, MoveEvent};
use crate::store::ScoreStore;
use crate::transport::{Subscription, Transport, TransportError};
use crate::workers::TrackerMetrics;

/// Lifecycle state of the consumer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConsumerState {
    /// No shared topic configured or no transport available
    Disabled,
    /// Opening a subscription
    Connecting,
    /// Holding a live subscription
    Ready,
    /// Waiting out the backoff after a failure
    Reconnecting,
    /// Shut down; no further attempts
    Stopped,
}

/// Observable consumer state, shared between the worker and readers.
#[derive(Debug, Clone)]
pub struct ConsumerStatus {
    state: Arc<watch::Sender<ConsumerState>>,
}

impl ConsumerStatus {
    pub(crate) fn new(initial: ConsumerState) -> Self {
        Self {
            state: Arc::new(watch::channel(initial).0),
        }
    }

    pub fn state(&self) -> ConsumerState {
        *self.state.borrow()
    }

    /// Whether the consumer currently holds a live subscription.
    pub fn is_ready(&self) -> bool {
        self.state() == ConsumerState::Ready
    }

    /// Receiver notified on every state transition.
    pub fn watch(&self) -> watch::Receiver<ConsumerState> {
        self.state.subscribe()
    }

    /// Wait until the consumer reaches `target`.
    pub async fn wait_for(&self, target: ConsumerState) {
        let mut rx = self.watch();
        // The sender lives in `self`, so the channel can't close while waiting
        let _ = rx.wait_for(|state| *state == target).await;
    }

    pub(crate) fn set(&self, state: ConsumerState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!("Consumer state: {} -> {}", previous, state);
        }
    }
}

enum Flow {
    Shutdown,
    Reconnect(TransportError),
}

/// Background worker that applies shared-topic events to the store.
pub struct ConsumerWorker {
    transport: Arc<dyn Transport>,
    store: ScoreStore,
    status: ConsumerStatus,
    metrics: Arc<TrackerMetrics>,
    topic: String,
    backoff: Duration,
    shutdown_rx: watch::Receiver<bool>,
}

impl ConsumerWorker {
    pub fn new(
        transport: Arc<dyn Transport>,
        store: ScoreStore,
        status: ConsumerStatus,
        metrics: Arc<TrackerMetrics>,
        topic: String,
        backoff: Duration,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            transport,
            store,
            status,
            metrics,
            topic,
            backoff,
            shutdown_rx,
        }
    }

    /// Main worker loop. Returns only after shutdown is requested.
    pub async fn run(mut self) {
        info!(
            "ConsumerWorker started (topic: {}, backoff: {:?})",
            self.topic, self.backoff
        );

        loop {
            if *self.shutdown_rx.borrow() {
                break;
            }

            self.status.set(ConsumerState::Connecting);
            self.metrics.record_connect_attempt();

            let subscribed = tokio::select! {
                biased;
                _ = stop_requested(&mut self.shutdown_rx) => break,
                subscribed = self.transport.subscribe() => subscribed,
            };

            match subscribed {
                Ok(subscription) => {
                    info!("Subscribed to topic {}", self.topic);
                    self.status.set(ConsumerState::Ready);

                    match self.consume(subscription).await {
                        Flow::Shutdown => break,
                        Flow::Reconnect(e) => {
                            warn!("Subscription to {} lost: {}", self.topic, e);
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to subscribe to {}: {}", self.topic, e);
                }
            }

            self.status.set(ConsumerState::Reconnecting);
            self.metrics.record_reconnect();

            tokio::select! {
                biased;
                _ = stop_requested(&mut self.shutdown_rx) => break,
                _ = tokio::time::sleep(self.backoff) => {}
            }
        }

        self.status.set(ConsumerState::Stopped);
        info!("ConsumerWorker stopped (topic: {})", self.topic);
    }

    /// Drains a live subscription until it fails or shutdown is requested.
    ///
    /// The subscription is dropped on return, releasing it in both cases.
    async fn consume(&mut self, mut subscription: Box<dyn Subscription>) -> Flow {
        loop {
            let received = tokio::select! {
                biased;
                _ = stop_requested(&mut self.shutdown_rx) => return Flow::Shutdown,
                received = subscription.recv() => received,
            };

            match received {
                Ok(payload) => self.apply(&payload),
                Err(TransportError::Lagged(skipped)) => {
                    warn!("Consumer on {} lagged, {} events skipped", self.topic, skipped);
                    self.metrics.record_skipped(skipped);
                }
                Err(e) => return Flow::Reconnect(e),
            }
        }
    }

    fn apply(&self, payload: &[u8]) {
        let DecodeOutcome { event, malformed } = MoveEvent::decode_lenient(payload);

        if malformed {
            self.metrics.record_malformed();
            debug!("Defaulted malformed move payload: {:?}", event);
        }

        if event.chips <= 0 {
            self.metrics.record_ignored();
            trace!("Ignoring move without chips for {}", event.player);
            return;
        }

        self.store.increment(&event.player, event.chips);
        self.metrics.record_consumed();

        debug!(
            player = %event.player,
            chips = event.chips,
            source = %event.source,
            "Applied move from shared topic"
        );
    }
}

/// Resolves once shutdown was requested or the signalling side went away.
async fn stop_requested(shutdown_rx: &mut watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

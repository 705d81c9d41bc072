//! Best-effort publication of moves to the shared topic.
//!
//! A move that the shared topic acknowledged is *not* applied locally: it
//! comes back through the consumer like every other instance's moves, so the
//! topic stays the single source of truth. Anything that can't be published
//! is applied straight to the store instead.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::Result;
use crate::events::MoveEvent;
use crate::store::ScoreStore;
use crate::transport::{Transport, TransportError};
use crate::workers::TrackerMetrics;

/// Sends move events to the shared topic, degrading to local application.
#[derive(Clone)]
pub struct EventPublisher {
    transport: Option<Arc<dyn Transport>>,
    store: ScoreStore,
    metrics: Arc<TrackerMetrics>,
    source: String,
    ack_timeout: Duration,
}

impl EventPublisher {
    pub fn new(
        transport: Option<Arc<dyn Transport>>,
        store: ScoreStore,
        metrics: Arc<TrackerMetrics>,
        source: impl Into<String>,
        ack_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            store,
            metrics,
            source: source.into(),
            ack_timeout,
        }
    }

    /// Whether a shared-topic transport is attached at all.
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Publish a move, returning `true` only if the shared topic acknowledged
    /// it within the ack timeout.
    ///
    /// On `false` the move has already been applied to the store exactly once.
    pub async fn publish(&self, player: &str, chips: i64) -> bool {
        let Some(transport) = self.transport.as_deref() else {
            self.apply_locally(player, chips);
            return false;
        };

        let event = MoveEvent::new(player, chips, self.source.as_str());
        match self.send(transport, &event).await {
            Ok(()) => {
                self.metrics.record_published();
                debug!(player, chips, "Move published to shared topic");
                true
            }
            Err(e) => {
                warn!("Publishing move for {} failed, applying locally: {}", player, e);
                self.metrics.record_publish_failure();
                self.apply_locally(player, chips);
                false
            }
        }
    }

    async fn send(&self, transport: &dyn Transport, event: &MoveEvent) -> Result<()> {
        let payload = event.encode()?;

        tokio::time::timeout(self.ack_timeout, transport.publish(&event.player, &payload))
            .await
            .map_err(|_| TransportError::Timeout(self.ack_timeout))??;

        Ok(())
    }

    fn apply_locally(&self, player: &str, chips: i64) {
        self.store.increment(player, chips);
        self.metrics.record_fallback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{InMemoryBroker, Subscription};
    use async_trait::async_trait;

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn publish(&self, _key: &str, _payload: &[u8]) -> std::result::Result<(), TransportError> {
            Err(TransportError::Publish("broker down".to_string()))
        }

        async fn subscribe(&self) -> std::result::Result<Box<dyn Subscription>, TransportError> {
            Err(TransportError::Subscribe("broker down".to_string()))
        }
    }

    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn publish(&self, _key: &str, _payload: &[u8]) -> std::result::Result<(), TransportError> {
            std::future::pending().await
        }

        async fn subscribe(&self) -> std::result::Result<Box<dyn Subscription>, TransportError> {
            std::future::pending().await
        }
    }

    fn publisher(transport: Option<Arc<dyn Transport>>, store: &ScoreStore) -> EventPublisher {
        EventPublisher::new(
            transport,
            store.clone(),
            Arc::new(TrackerMetrics::new()),
            "test",
            Duration::from_millis(50),
        )
    }

    #[tokio::test]
    async fn test_without_transport_applies_locally() {
        let store = ScoreStore::new();
        let publisher = publisher(None, &store);

        assert!(!publisher.is_connected());
        assert!(!publisher.publish("Zed", 4).await);
        assert_eq!(store.total("Zed"), Some(4));
        assert_eq!(publisher.metrics.fallback_applied(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_applies_once() {
        let store = ScoreStore::new();
        let publisher = publisher(Some(Arc::new(FailingTransport)), &store);

        assert!(!publisher.publish("Alice", 5).await);
        assert_eq!(store.total("Alice"), Some(5));

        let snapshot = publisher.metrics.snapshot();
        assert_eq!(snapshot.publish_failures, 1);
        assert_eq!(snapshot.fallback_applied, 1);
        assert_eq!(snapshot.published, 0);
    }

    #[tokio::test]
    async fn test_ack_timeout_applies_once() {
        let store = ScoreStore::new();
        let publisher = publisher(Some(Arc::new(HangingTransport)), &store);

        assert!(!publisher.publish("Alice", 2).await);
        assert_eq!(store.total("Alice"), Some(2));
    }

    #[tokio::test]
    async fn test_acknowledged_publish_leaves_store_untouched() {
        let broker = InMemoryBroker::new();
        let transport = broker.transport("chip-moves");
        let mut subscription = transport.subscribe().await.unwrap();

        let store = ScoreStore::new();
        let publisher = publisher(Some(Arc::new(transport)), &store);

        assert!(publisher.publish("Bob", 7).await);
        assert!(store.is_empty());

        let payload = subscription.recv().await.unwrap();
        let outcome = MoveEvent::decode_lenient(&payload);
        assert_eq!(outcome.event, MoveEvent::new("Bob", 7, "test"));
    }
}

//! In-process broker backed by tokio broadcast channels.
//!
//! Every tracker handed a transport for the same topic sees every event
//! published to it, which makes this broker a drop-in shared topic for
//! single-process deployments and multi-instance tests.
//!
//! Events are only delivered to subscriptions that exist when they are
//! published. Publishing to a topic with no subscribers fails instead of
//! acknowledging an event nobody will see.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{Subscription, Transport, TransportError};

/// Topic-keyed in-process broker.
#[derive(Clone)]
pub struct InMemoryBroker {
    topics: Arc<RwLock<HashMap<String, broadcast::Sender<Vec<u8>>>>>,
    capacity: usize,
}

impl InMemoryBroker {
    /// Creates a broker with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Creates a broker with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            topics: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Transport bound to `topic`, creating the topic on first use.
    pub fn transport(&self, topic: &str) -> InMemoryTransport {
        InMemoryTransport {
            topic: topic.to_string(),
            sender: self.sender(topic),
        }
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn sender(&self, topic: &str) -> broadcast::Sender<Vec<u8>> {
        if let Some(tx) = self
            .topics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(topic)
        {
            return tx.clone();
        }

        self.topics
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

/// [`Transport`] for a single in-process topic.
#[derive(Clone)]
pub struct InMemoryTransport {
    topic: String,
    sender: broadcast::Sender<Vec<u8>>,
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn publish(&self, _key: &str, payload: &[u8]) -> Result<(), TransportError> {
        // Nothing retains events for late subscribers, so an event nobody
        // receives must be reported back to the publisher
        self.sender
            .send(payload.to_vec())
            .map(|_| ())
            .map_err(|_| TransportError::Publish(format!("no subscribers on topic {}", self.topic)))
    }

    async fn subscribe(&self) -> Result<Box<dyn Subscription>, TransportError> {
        Ok(Box::new(InMemorySubscription {
            receiver: self.sender.subscribe(),
        }))
    }
}

/// Receiving end of an in-process topic.
pub struct InMemorySubscription {
    receiver: broadcast::Receiver<Vec<u8>>,
}

#[async_trait]
impl Subscription for InMemorySubscription {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Lagged(skipped) => TransportError::Lagged(skipped),
            broadcast::error::RecvError::Closed => TransportError::Closed,
        })
    }
}

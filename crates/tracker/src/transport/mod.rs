//! Shared-topic transports.
//!
//! The tracker only needs two capabilities from a pub/sub system: publish a
//! keyed payload and wait for the acknowledgment, and open a subscription that
//! yields raw payloads. Delivery is assumed at-least-once with no ordering
//! across partitions.

mod error;
mod memory;

#[cfg(feature = "kafka")]
mod kafka;

use async_trait::async_trait;

pub use error::TransportError;
pub use memory::{InMemoryBroker, InMemorySubscription, InMemoryTransport};

#[cfg(feature = "kafka")]
pub use kafka::KafkaTransport;

/// Publish/subscribe access to one topic.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a payload and return once the broker acknowledged it.
    ///
    /// Callers bound the wait themselves; implementations may also enforce
    /// their own delivery timeout.
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// Open a new subscription to the topic.
    async fn subscribe(&self) -> Result<Box<dyn Subscription>, TransportError>;
}

/// A live subscription. Dropping it releases the underlying resources.
#[async_trait]
pub trait Subscription: Send {
    /// Wait for the next payload.
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError>;
}

use std::time::Duration;

use thiserror::Error;

/// Errors raised by shared-topic transports.
///
/// All of them are recoverable from the tracker's point of view: publish
/// failures fall back to local application, subscription failures trigger a
/// reconnect.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("publish failed: {0}")]
    Publish(String),

    #[error("no acknowledgment within {0:?}")]
    Timeout(Duration),

    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("subscription lagged, {0} events skipped")]
    Lagged(u64),

    #[error("subscription closed")]
    Closed,
}

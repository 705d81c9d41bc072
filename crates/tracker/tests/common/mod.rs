//! Shared test doubles for tracker integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracker::transport::InMemoryTransport;
use tracker::{Subscription, TrackerConfig, Transport, TransportError};

/// Config with a nominal broker so the shared topic counts as configured,
/// and short timings so reconnect tests stay fast.
pub fn shared_config() -> TrackerConfig {
    TrackerConfig::default()
        .with_brokers(["in-memory:0"])
        .with_reconnect_backoff(Duration::from_millis(10))
        .with_ack_timeout(Duration::from_millis(200))
}

/// Poll `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

/// Rejects the first `failures` subscription attempts, then delegates.
pub struct FlakyTransport {
    inner: InMemoryTransport,
    failures: usize,
    attempts: Arc<AtomicUsize>,
}

impl FlakyTransport {
    pub fn new(inner: InMemoryTransport, failures: usize) -> Self {
        Self {
            inner,
            failures,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait]
impl Transport for FlakyTransport {
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<(), TransportError> {
        self.inner.publish(key, payload).await
    }

    async fn subscribe(&self) -> Result<Box<dyn Subscription>, TransportError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            return Err(TransportError::Subscribe(format!(
                "broker unreachable (attempt {attempt})"
            )));
        }
        self.inner.subscribe().await
    }
}

/// Broker that is never reachable.
pub struct DownTransport;

#[async_trait]
impl Transport for DownTransport {
    async fn publish(&self, _key: &str, _payload: &[u8]) -> Result<(), TransportError> {
        Err(TransportError::Publish("connection refused".to_string()))
    }

    async fn subscribe(&self) -> Result<Box<dyn Subscription>, TransportError> {
        Err(TransportError::Subscribe("connection refused".to_string()))
    }
}

/// Each subscription yields the scripted payloads, then fails.
pub struct ScriptedTransport {
    payloads: Vec<Vec<u8>>,
    attempts: Arc<AtomicUsize>,
}

impl ScriptedTransport {
    pub fn new(payloads: Vec<Vec<u8>>) -> Self {
        Self {
            payloads,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn publish(&self, _key: &str, _payload: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }

    async fn subscribe(&self) -> Result<Box<dyn Subscription>, TransportError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        // Only the first subscription replays the script
        let payloads = if attempt == 0 {
            self.payloads.clone()
        } else {
            Vec::new()
        };
        Ok(Box::new(ScriptedSubscription {
            payloads: payloads.into_iter(),
            exhausted: attempt > 0,
        }))
    }
}

struct ScriptedSubscription {
    payloads: std::vec::IntoIter<Vec<u8>>,
    exhausted: bool,
}

#[async_trait]
impl Subscription for ScriptedSubscription {
    async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
        match self.payloads.next() {
            Some(payload) => Ok(payload),
            None if self.exhausted => std::future::pending().await,
            None => {
                self.exhausted = true;
                Err(TransportError::Receive("broker connection reset".to_string()))
            }
        }
    }
}

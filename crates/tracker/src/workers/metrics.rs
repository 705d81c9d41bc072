//! Publish and consume counters.
//!
//! Tracks how moves reach the store (via the shared topic or local fallback)
//! and how often the consumer has had to reconnect.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the publisher and the consumer worker.
///
/// Uses atomics for lock-free access across tasks.
#[derive(Debug, Default)]
pub struct TrackerMetrics {
    /// Events acknowledged by the shared topic
    published: AtomicU64,

    /// Events applied directly to the store instead of published
    fallback_applied: AtomicU64,

    /// Publish attempts that timed out or errored
    publish_failures: AtomicU64,

    /// Events received from the shared topic and applied
    consumed: AtomicU64,

    /// Received events carrying no chips
    ignored: AtomicU64,

    /// Received payloads that needed defaulting
    malformed: AtomicU64,

    /// Events a lagging subscription skipped over
    skipped: AtomicU64,

    /// Subscription attempts, successful or not
    connect_attempts: AtomicU64,

    /// Transitions into the reconnecting state
    reconnects: AtomicU64,
}

impl TrackerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallback_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_publish_failure(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_consumed(&self) {
        self.consumed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self, count: u64) {
        self.skipped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_connect_attempt(&self) {
        self.connect_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::Relaxed);
    }

    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    pub fn fallback_applied(&self) -> u64 {
        self.fallback_applied.load(Ordering::Relaxed)
    }

    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    pub fn connect_attempts(&self) -> u64 {
        self.connect_attempts.load(Ordering::Relaxed)
    }

    /// Creates a snapshot of all counters for display/logging.
    ///
    /// Note: individual fields are read atomically but the snapshot as a
    /// whole may be inconsistent while counters are being updated.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            published: self.published(),
            fallback_applied: self.fallback_applied(),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            consumed: self.consumed(),
            ignored: self.ignored.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            connect_attempts: self.connect_attempts(),
            reconnects: self.reconnects.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub published: u64,
    pub fallback_applied: u64,
    pub publish_failures: u64,
    pub consumed: u64,
    pub ignored: u64,
    pub malformed: u64,
    pub skipped: u64,
    pub connect_attempts: u64,
    pub reconnects: u64,
}

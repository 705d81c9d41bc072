//! Cloneable façade for request handlers.
//!
//! [`TrackerHandle`] hides the publisher, store and consumer plumbing behind
//! the three operations the API layer needs.
use std::sync::Arc;

use super::{Health, LeaderboardEntry};
use crate::publisher::EventPublisher;
use crate::store::ScoreStore;
use crate::workers::{ConsumerState, ConsumerStatus, MetricsSnapshot, TrackerMetrics};

/// Player name used when a move arrives without one.
pub const DEFAULT_PLAYER: &str = "You";

/// Chip count used when a move arrives without one.
pub const DEFAULT_CHIPS: i64 = 1;

/// Client-facing handle to interact with the tracker
#[derive(Clone)]
pub struct TrackerHandle {
    publisher: EventPublisher,
    store: ScoreStore,
    status: ConsumerStatus,
    metrics: Arc<TrackerMetrics>,
}

impl TrackerHandle {
    pub(crate) fn new(
        publisher: EventPublisher,
        store: ScoreStore,
        status: ConsumerStatus,
        metrics: Arc<TrackerMetrics>,
    ) -> Self {
        Self {
            publisher,
            store,
            status,
            metrics,
        }
    }

    /// Record that `player` collected `chips` and return the confirmation
    /// message.
    ///
    /// A missing or blank player becomes [`DEFAULT_PLAYER`], missing chips
    /// become [`DEFAULT_CHIPS`] and negative chips are clamped to zero. The
    /// confirmation does not depend on whether the shared topic accepted the
    /// move; a failed publish has already been applied locally.
    pub async fn record_move(&self, player: Option<&str>, chips: Option<i64>) -> String {
        let player = player
            .map(str::trim)
            .filter(|player| !player.is_empty())
            .unwrap_or(DEFAULT_PLAYER);
        let chips = chips.unwrap_or(DEFAULT_CHIPS).max(0);

        self.publisher.publish(player, chips).await;

        format!("{player} collected {chips} chips!")
    }

    /// Highest totals first; empty until the first move is observed.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.store.top_n(limit)
    }

    /// `Degraded` while a configured shared topic has no live subscription.
    pub fn health(&self) -> Health {
        if self.status.is_ready() || self.status.state() == ConsumerState::Disabled {
            Health::Ok
        } else {
            Health::Degraded
        }
    }

    pub fn consumer_state(&self) -> ConsumerState {
        self.status.state()
    }

    /// Shared consumer status for waiting on state transitions.
    pub fn consumer_status(&self) -> &ConsumerStatus {
        &self.status
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Direct access to the underlying store.
    pub fn store(&self) -> &ScoreStore {
        &self.store
    }
}

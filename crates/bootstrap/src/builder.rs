//! Resolves the shared-topic transport and builds the tracker.
use std::sync::Arc;

use tracker::{LeaderboardEntry, ScoreTracker, TrackerConfig, Transport};

use crate::config::BootstrapConfig;

/// Builder that assembles the tracker and its transport from configuration.
pub struct TrackerBuilder {
    config: BootstrapConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl TrackerBuilder {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Provide the transport explicitly instead of resolving one from the
    /// broker configuration (e.g., an in-process broker).
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub async fn build(self) -> TrackerSetup {
        let transport = self
            .transport
            .or_else(|| resolve_transport(&self.config.tracker));

        let tracker = ScoreTracker::builder()
            .config(self.config.tracker.clone())
            .shared_transport(transport)
            .build()
            .await;

        TrackerSetup {
            config: self.config,
            tracker,
        }
    }
}

pub struct TrackerSetup {
    pub config: BootstrapConfig,
    pub tracker: ScoreTracker,
}

impl TrackerSetup {
    /// Live leaderboard, or the static demo board while nothing has been
    /// recorded yet.
    pub fn leaderboard_or_demo(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let live = self.tracker.leaderboard(limit);
        if live.is_empty() {
            demo_leaderboard().into_iter().take(limit).collect()
        } else {
            live
        }
    }
}

/// Placeholder board shown on a cold start.
pub fn demo_leaderboard() -> Vec<LeaderboardEntry> {
    [("Alice", 10), ("Bob", 7), ("Charlie", 5)]
        .into_iter()
        .map(|(player, chips)| LeaderboardEntry {
            player: player.to_string(),
            chips,
        })
        .collect()
}

/// Pick the broker client for `config`, or `None` when the shared topic is
/// not configured or no client is compiled in.
pub fn resolve_transport(config: &TrackerConfig) -> Option<Arc<dyn Transport>> {
    if !config.is_enabled() {
        tracing::info!("KAFKA_BROKERS not set; running without shared topic");
        return None;
    }

    #[cfg(feature = "kafka")]
    return match tracker::KafkaTransport::new(config) {
        Ok(transport) => Some(Arc::new(transport)),
        Err(e) => {
            tracing::warn!(
                "Failed to initialize Kafka client: {}. Continuing without shared topic.",
                e
            );
            None
        }
    };

    #[cfg(not(feature = "kafka"))]
    {
        tracing::warn!(
            "Brokers configured ({}) but Kafka support is not compiled in (enable the `kafka` feature). Continuing without shared topic.",
            config.bootstrap_servers()
        );
        None
    }
}

//! Tracker configuration shared across the publisher and consumer.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::events::DEFAULT_SOURCE;

/// Where a consumer group with no committed offset starts reading.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OffsetReset {
    Earliest,
    #[default]
    Latest,
}

/// Immutable configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Broker addresses (`host:port`) in priority order. Empty disables the
    /// shared topic entirely.
    pub brokers: Vec<String>,
    pub topic: String,
    pub group_id: String,
    pub offset_reset: OffsetReset,
    /// Source tag stamped on events published by this instance.
    pub source: String,
    /// Upper bound on waiting for a broker acknowledgment.
    pub ack_timeout: Duration,
    /// Pause between failed subscription attempts.
    pub reconnect_backoff: Duration,
}

impl TrackerConfig {
    pub const DEFAULT_TOPIC: &'static str = "chip-moves";
    pub const DEFAULT_GROUP_ID: &'static str = "chip-backend";

    /// Whether any broker is configured.
    pub fn is_enabled(&self) -> bool {
        !self.brokers.is_empty()
    }

    /// Comma-joined broker list in the form client libraries expect.
    pub fn bootstrap_servers(&self) -> String {
        self.brokers.join(",")
    }

    pub fn with_brokers<I, S>(mut self, brokers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.brokers = brokers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_reconnect_backoff(mut self, backoff: Duration) -> Self {
        self.reconnect_backoff = backoff;
        self
    }

    pub fn with_ack_timeout(mut self, timeout: Duration) -> Self {
        self.ack_timeout = timeout;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            brokers: Vec::new(),
            topic: Self::DEFAULT_TOPIC.to_string(),
            group_id: Self::DEFAULT_GROUP_ID.to_string(),
            offset_reset: OffsetReset::default(),
            source: DEFAULT_SOURCE.to_string(),
            ack_timeout: Duration::from_secs(5),
            reconnect_backoff: Duration::from_secs(5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.topic, "chip-moves");
        assert_eq!(config.group_id, "chip-backend");
        assert_eq!(config.offset_reset, OffsetReset::Latest);
        assert_eq!(config.ack_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_offset_reset_parsing() {
        assert_eq!("earliest".parse::<OffsetReset>().unwrap(), OffsetReset::Earliest);
        assert_eq!("LATEST".parse::<OffsetReset>().unwrap(), OffsetReset::Latest);
        assert!("middle".parse::<OffsetReset>().is_err());
        assert_eq!(OffsetReset::Earliest.as_ref(), "earliest");
    }

    #[test]
    fn test_bootstrap_servers_keeps_order() {
        let config = TrackerConfig::default().with_brokers(["b:9092", "a:9092"]);
        assert!(config.is_enabled());
        assert_eq!(config.bootstrap_servers(), "b:9092,a:9092");
    }
}

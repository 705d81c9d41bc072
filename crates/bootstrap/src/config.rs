//! Backend configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;
use tracker::{OffsetReset, TrackerConfig};

/// Configuration required to bootstrap a tracker and its logging.
#[derive(Clone, Debug, Default)]
pub struct BootstrapConfig {
    pub tracker: TrackerConfig,
    pub log_dir: Option<PathBuf>,
}

impl BootstrapConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `KAFKA_BROKERS` - Comma-separated `host:port` list (default: none, shared topic disabled)
    /// - `KAFKA_TOPIC` - Shared topic name (default: chip-moves)
    /// - `KAFKA_GROUP_ID` - Consumer group (default: chip-backend)
    /// - `KAFKA_OFFSET_RESET` - `earliest` or `latest` (default: latest)
    /// - `TRACKER_SOURCE` - Source tag on published events (default: api)
    /// - `TRACKER_ACK_TIMEOUT_MS` - Publish acknowledgment timeout (default: 5000)
    /// - `TRACKER_RECONNECT_BACKOFF_MS` - Pause between subscription attempts (default: 5000)
    /// - `LOG_DIR` - Also write logs to `{LOG_DIR}/chip-backend.log` (default: stderr only)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`BootstrapConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let tracker = &mut config.tracker;

        if let Some(brokers) = lookup("KAFKA_BROKERS") {
            tracker.brokers = parse_brokers(&brokers);
        }

        if let Some(topic) = non_empty(lookup("KAFKA_TOPIC")) {
            tracker.topic = topic;
        }

        if let Some(group_id) = non_empty(lookup("KAFKA_GROUP_ID")) {
            tracker.group_id = group_id;
        }

        if let Some(reset) = non_empty(lookup("KAFKA_OFFSET_RESET")) {
            match reset.parse::<OffsetReset>() {
                Ok(reset) => tracker.offset_reset = reset,
                Err(_) => warn!(
                    "Invalid KAFKA_OFFSET_RESET value {:?}, using default: {}",
                    reset, tracker.offset_reset
                ),
            }
        }

        if let Some(source) = non_empty(lookup("TRACKER_SOURCE")) {
            tracker.source = source;
        }

        if let Some(ms) = read_env::<u64>(&lookup, "TRACKER_ACK_TIMEOUT_MS") {
            tracker.ack_timeout = Duration::from_millis(ms.max(1));
        }

        if let Some(ms) = read_env::<u64>(&lookup, "TRACKER_RECONNECT_BACKOFF_MS") {
            tracker.reconnect_backoff = Duration::from_millis(ms);
        }

        config.log_dir = non_empty(lookup("LOG_DIR")).map(PathBuf::from);

        config
    }
}

/// Split a comma-separated broker list, dropping blank entries.
pub fn parse_brokers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|broker| !broker.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = non_empty(lookup(key))?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Invalid {key} value {raw:?}, using default");
            None
        }
    }
}

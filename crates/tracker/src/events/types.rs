//! Wire representation of a recorded move.

use serde::{Deserialize, Serialize};

use crate::api::{Result, TrackerError};

/// Player name substituted when an inbound event carries none.
pub const UNKNOWN_PLAYER: &str = "Unknown";

/// Source tag stamped on events produced by the local API.
pub const DEFAULT_SOURCE: &str = "api";

/// A "chip collected" event.
///
/// Produced for every recorded move and observed again by every subscribed
/// instance. Never stored as an entity; only its effect on totals survives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub player: String,
    pub chips: i64,
    pub source: String,
}

impl MoveEvent {
    pub fn new(player: impl Into<String>, chips: i64, source: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            chips,
            source: source.into(),
        }
    }

    /// Serialize to the JSON payload published on the shared topic.
    pub fn encode(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(TrackerError::Encode)
    }
}

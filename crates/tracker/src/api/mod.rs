//! Public tracker API surface.
//!
//! This module gathers the types exposed to request handlers so other layers
//! can stay focused on transports, workers, or aggregation.

pub mod errors;
pub mod handle;

use serde::{Deserialize, Serialize};

pub use errors::{Result, TrackerError};
pub use handle::{DEFAULT_CHIPS, DEFAULT_PLAYER, TrackerHandle};

/// Number of leaderboard rows returned when the caller gives no limit.
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

/// A single ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: String,
    pub chips: u64,
}

/// Health of the shared-topic integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Health {
    /// Consumer is ready, or the shared topic is not configured at all.
    Ok,
    /// Shared topic is configured but the consumer holds no subscription.
    Degraded,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        matches!(self, Health::Ok)
    }
}

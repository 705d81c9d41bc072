//! Unified error types surfaced by the tracker API.
//!
//! Recording moves and reading the leaderboard never fail; these errors only
//! come out of lifecycle operations such as building or shutting down.
use thiserror::Error;

use crate::transport::TransportError;

pub type Result<T> = std::result::Result<T, TrackerError>;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("consumer worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to encode move event")]
    Encode(#[source] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

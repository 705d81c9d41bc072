//! Event-sourced chip leaderboard shared across backend instances.
//!
//! This crate wires together the score store, the shared-topic transports,
//! and the background consumer into a cohesive tracker API. Request handlers
//! embed [`ScoreTracker`] (or a cloned [`TrackerHandle`]) to record moves,
//! read the leaderboard, and report consumer health.
//!
//! Modules are organized by responsibility:
//! - [`tracker`] hosts the facade and its builder
//! - [`api`] exposes the types request handlers interact with
//! - [`store`] keeps the in-memory per-player totals
//! - [`events`] defines the move event and its lenient decoding
//! - [`publisher`] sends moves to the shared topic with local fallback
//! - [`transport`] abstracts the pub/sub system (in-process or Kafka)
//! - [`workers`] keeps the consumer loop internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod publisher;
pub mod store;
pub mod tracker;
pub mod transport;

mod workers;

pub use api::{
    DEFAULT_LEADERBOARD_LIMIT, Health, LeaderboardEntry, Result, TrackerError, TrackerHandle,
};
pub use config::{OffsetReset, TrackerConfig};
pub use events::{DecodeOutcome, MoveEvent, UNKNOWN_PLAYER, normalize_chips};
pub use publisher::EventPublisher;
pub use store::ScoreStore;
pub use tracker::{ScoreTracker, ScoreTrackerBuilder};
pub use transport::{InMemoryBroker, Subscription, Transport, TransportError};
pub use workers::{ConsumerState, ConsumerStatus, MetricsSnapshot, TrackerMetrics};

#[cfg(feature = "kafka")]
pub use transport::KafkaTransport;

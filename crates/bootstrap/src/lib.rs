//! Shared bootstrap utilities for backend processes.
//!
//! Provides configuration loading, logging setup, transport resolution, and
//! tracker assembly that request-serving front-ends can reuse.
pub mod builder;
pub mod config;
pub mod logging;

pub use builder::{TrackerBuilder, TrackerSetup, demo_leaderboard, resolve_transport};
pub use config::BootstrapConfig;
pub use logging::setup_logging;

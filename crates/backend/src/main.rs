//! Chip leaderboard backend binary.
//!
//! Composition root that assembles the score tracker from the environment,
//! keeps it running until the process is asked to stop, then shuts the
//! consumer down cleanly. Request serving is layered on top through
//! the tracker handle.
//!
//! # Examples
//!
//! ```bash
//! # Local-only leaderboard
//! cargo run -p chip-backend
//!
//! # Shared leaderboard over Kafka
//! KAFKA_BROKERS=localhost:9092 cargo run -p chip-backend --features kafka
//! ```

use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tracker::DEFAULT_LEADERBOARD_LIMIT;
use tracker_bootstrap::{BootstrapConfig, TrackerBuilder, setup_logging};

const STATUS_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    // 1. Load configuration from environment
    let config = BootstrapConfig::from_env();

    // 2. Setup logging
    let _log_guard = setup_logging(config.log_dir.as_deref())?;

    tracing::info!("Starting chip backend");
    tracing::info!("Brokers: {:?}", config.tracker.brokers);
    tracing::info!(
        "Topic: {} (group: {}, offset reset: {})",
        config.tracker.topic,
        config.tracker.group_id,
        config.tracker.offset_reset
    );

    // 3. Build tracker
    let setup = TrackerBuilder::new(config).build().await;
    let handle = setup.tracker.handle();
    tracing::info!(
        "Tracker ready on {}, consumer: {}",
        setup.tracker.config().topic,
        handle.consumer_state()
    );

    // 4. Run until asked to stop
    let mut status = tokio::time::interval(STATUS_INTERVAL);
    status.tick().await;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = status.tick() => {
                let health = handle.health();
                if !health.is_ok() {
                    tracing::warn!("Shared topic degraded, consumer: {}", handle.consumer_state());
                }
                tracing::info!(
                    "Status: health={:?}, consumer={}, metrics={:?}, top={:?}",
                    health,
                    handle.consumer_state(),
                    handle.metrics(),
                    setup.leaderboard_or_demo(DEFAULT_LEADERBOARD_LIMIT)
                );
            }
        }
    }

    // 5. Shutdown
    setup.tracker.shutdown().await?;
    tracing::info!("Chip backend shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

//! Worker tasks that back the tracker.
//!
//! The consumer worker keeps the shared-topic subscription alive; the
//! metrics are shared between it and the publisher.

mod consumer;
mod metrics;

pub use consumer::{ConsumerState, ConsumerStatus, ConsumerWorker};
pub use metrics::{MetricsSnapshot, TrackerMetrics};

//! Move events carried over the shared topic.
//!
//! Outbound events are strictly typed; inbound payloads are decoded leniently
//! so a malformed record from another instance never stalls the consumer.

mod decode;
mod types;

pub use decode::{DecodeOutcome, normalize_chips};
pub use types::{DEFAULT_SOURCE, MoveEvent, UNKNOWN_PLAYER};

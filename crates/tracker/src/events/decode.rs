//! Lenient decoding of inbound move payloads.
//!
//! Every field falls back to a default instead of failing, which keeps the
//! leniency in this one boundary function.

use serde_json::{Map, Value};

use super::types::{MoveEvent, UNKNOWN_PLAYER};

const UNKNOWN_SOURCE: &str = "unknown";

/// Result of decoding an inbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOutcome {
    pub event: MoveEvent,
    /// At least one field was missing or mis-typed and got defaulted.
    pub malformed: bool,
}

impl MoveEvent {
    /// Decode a payload from the shared topic, defaulting anything unusable.
    ///
    /// Missing or mis-typed `player` becomes [`UNKNOWN_PLAYER`], missing or
    /// mis-typed `chips` becomes 0. Payloads that are not JSON objects decode
    /// to an all-default event.
    pub fn decode_lenient(payload: &[u8]) -> DecodeOutcome {
        let fields = match serde_json::from_slice::<Value>(payload) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        };

        let player = fields
            .get("player")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|player| !player.is_empty());
        let chips = normalize_chips(fields.get("chips"));
        let source = fields
            .get("source")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_SOURCE);

        DecodeOutcome {
            malformed: player.is_none() || chips.is_none(),
            event: MoveEvent::new(
                player.unwrap_or(UNKNOWN_PLAYER),
                chips.unwrap_or(0),
                source,
            ),
        }
    }
}

/// Interpret a loosely typed chip count.
///
/// Accepts integers, floats (truncated toward zero) and numeric strings.
/// Returns `None` for anything else so callers pick their own default.
pub fn normalize_chips(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

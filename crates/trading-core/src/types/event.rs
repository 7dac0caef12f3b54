//! Intrinsic-time price events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of the move that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventDirection {
    Up,
    Down,
}

impl fmt::Display for EventDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDirection::Up => write!(f, "UP"),
            EventDirection::Down => write!(f, "DOWN"),
        }
    }
}

/// A bar whose close moved at least the detection threshold from the
/// previous close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Timestamp of the bar (Unix milliseconds)
    pub timestamp: i64,
    /// Close price of the bar
    pub price: f64,
    /// Relative change from the previous close
    pub change: f64,
    pub direction: EventDirection,
}

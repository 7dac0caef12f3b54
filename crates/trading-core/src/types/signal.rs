//! Trading signal types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Breakout signal for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    /// Price broke above resistance
    Buy,
    /// Price broke below support
    Sell,
    /// No breakout, or not enough evidence
    Hold,
}

impl Signal {
    pub fn is_buy(&self) -> bool {
        matches!(self, Signal::Buy)
    }

    pub fn is_sell(&self) -> bool {
        matches!(self, Signal::Sell)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

/// Support and resistance derived from recent events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakoutLevels {
    pub support: f64,
    pub resistance: f64,
}

impl BreakoutLevels {
    /// Classify a price against the levels. Equality with either level is
    /// not a breakout.
    pub fn classify(&self, price: f64) -> Signal {
        if price > self.resistance {
            Signal::Buy
        } else if price < self.support {
            Signal::Sell
        } else {
            Signal::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_classify() {
        let levels = BreakoutLevels {
            support: 90.0,
            resistance: 110.0,
        };
        assert_eq!(levels.classify(110.5), Signal::Buy);
        assert_eq!(levels.classify(89.9), Signal::Sell);
        assert_eq!(levels.classify(100.0), Signal::Hold);
    }

    #[test]
    fn test_levels_ties_hold() {
        let levels = BreakoutLevels {
            support: 90.0,
            resistance: 110.0,
        };
        assert_eq!(levels.classify(110.0), Signal::Hold);
        assert_eq!(levels.classify(90.0), Signal::Hold);
    }

    #[test]
    fn test_signal_display() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }
}

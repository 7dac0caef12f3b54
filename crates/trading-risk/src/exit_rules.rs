//! Exit rules for held positions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;
use trading_core::types::Position;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Price fell below entry × trailing-stop fraction
    TrailingStop,
    /// Gain reached the ATR-scaled target
    ProfitTarget,
    /// Classifier turned SELL
    ReversalSignal,
    /// Lowest-return position removed over the hard cap
    CapacityPrune,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::TrailingStop => write!(f, "trailing stop"),
            ExitReason::ProfitTarget => write!(f, "profit target"),
            ExitReason::ReversalSignal => write!(f, "reversal signal"),
            ExitReason::CapacityPrune => write!(f, "capacity prune"),
        }
    }
}

/// Price-based exit rules, checked in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitRules {
    /// Exit when price < entry × this fraction
    pub trailing_stop_fraction: Decimal,
    /// Exit when (price − entry)/entry ≥ multiplier × ATR/entry
    pub profit_target_multiplier: Decimal,
}

impl Default for ExitRules {
    fn default() -> Self {
        Self {
            trailing_stop_fraction: dec!(0.95),
            profit_target_multiplier: dec!(1.5),
        }
    }
}

impl ExitRules {
    /// Stop price for an entry.
    pub fn stop_price(&self, entry_price: Decimal) -> Decimal {
        entry_price * self.trailing_stop_fraction
    }

    /// Strictly below the stop price.
    pub fn is_stop_triggered(&self, entry_price: Decimal, current_price: Decimal) -> bool {
        current_price < self.stop_price(entry_price)
    }

    /// `(price − entry)/entry ≥ multiplier × (atr/entry)`.
    pub fn is_target_reached(&self, entry_price: Decimal, current_price: Decimal, atr: Decimal) -> bool {
        if entry_price <= Decimal::ZERO {
            return false;
        }
        let gain = (current_price - entry_price) / entry_price;
        let target = self.profit_target_multiplier * (atr / entry_price);
        gain >= target
    }

    /// First matching price-based rule, trailing stop before profit target.
    ///
    /// The reversal rule needs the classifier and is checked by the caller
    /// when this returns `None`.
    pub fn evaluate(&self, position: &Position, current_price: Decimal, atr: Decimal) -> Option<ExitReason> {
        if self.is_stop_triggered(position.entry_price, current_price) {
            debug!(symbol = %position.symbol, entry = %position.entry_price, %current_price, "trailing stop hit");
            return Some(ExitReason::TrailingStop);
        }
        if self.is_target_reached(position.entry_price, current_price, atr) {
            debug!(symbol = %position.symbol, entry = %position.entry_price, %current_price, %atr, "profit target hit");
            return Some(ExitReason::ProfitTarget);
        }
        None
    }
}

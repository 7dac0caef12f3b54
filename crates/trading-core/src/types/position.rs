//! Held position type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A long position in a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Symbol
    pub symbol: String,
    /// Price observed when the entry order was placed
    pub entry_price: Decimal,
    /// Settled quantity held
    pub quantity: Decimal,
}

impl Position {
    /// Create a new position.
    pub fn new(symbol: impl Into<String>, entry_price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            entry_price,
            quantity,
        }
    }

    /// Unrealized return `(price - entry) / entry`.
    ///
    /// Returns zero when the entry price is zero.
    pub fn unrealized_return(&self, price: Decimal) -> Decimal {
        if self.entry_price.is_zero() {
            return Decimal::ZERO;
        }
        (price - self.entry_price) / self.entry_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_unrealized_return() {
        let position = Position::new("KRW-BTC", dec!(100), dec!(1));
        assert_eq!(position.unrealized_return(dec!(107)), dec!(0.07));
        assert_eq!(position.unrealized_return(dec!(90)), dec!(-0.1));
    }

    #[test]
    fn test_zero_entry_price() {
        let position = Position::new("KRW-BTC", Decimal::ZERO, dec!(1));
        assert_eq!(position.unrealized_return(dec!(10)), Decimal::ZERO);
    }
}

//! Order types and structures.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// How a market order is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum OrderAmount {
    /// Spend a fixed amount of the quote currency
    Notional(Decimal),
    /// Trade a fixed quantity of the instrument
    Quantity(Decimal),
}

impl OrderAmount {
    pub fn value(&self) -> Decimal {
        match self {
            OrderAmount::Notional(v) | OrderAmount::Quantity(v) => *v,
        }
    }
}

/// Market order request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Symbol to trade
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Size of the order
    pub amount: OrderAmount,
}

impl OrderRequest {
    /// Market buy spending `notional` of the quote currency.
    pub fn market_buy(symbol: impl Into<String>, notional: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Buy,
            amount: OrderAmount::Notional(notional),
        }
    }

    /// Market sell of `quantity` units.
    pub fn market_sell(symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side: Side::Sell,
            amount: OrderAmount::Quantity(quantity),
        }
    }
}

/// Acknowledgement of an accepted order.
///
/// Acknowledgement is treated as completion; `fill_price` and
/// `filled_quantity` are informational when the venue reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID
    pub id: Uuid,
    /// Symbol traded
    pub symbol: String,
    /// Buy or sell
    pub side: Side,
    /// Requested size
    pub amount: OrderAmount,
    /// Average fill price, if known
    pub fill_price: Option<Decimal>,
    /// Filled quantity, if known
    pub filled_quantity: Option<Decimal>,
    /// When the order was acknowledged
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create an acknowledgement for a request.
    pub fn from_request(request: &OrderRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol: request.symbol.clone(),
            side: request.side,
            amount: request.amount,
            fill_price: None,
            filled_quantity: None,
            created_at: Utc::now(),
        }
    }

    /// Attach fill information.
    pub fn with_fill(mut self, price: Decimal, quantity: Decimal) -> Self {
        self.fill_price = Some(price);
        self.filled_quantity = Some(quantity);
        self
    }
}

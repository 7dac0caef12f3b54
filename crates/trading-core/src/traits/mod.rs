//! Core traits for the trading system.

mod indicator;
mod market;

pub use indicator::Indicator;
pub use market::{Exchange, MarketData};

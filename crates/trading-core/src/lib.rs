//! Core types and traits for the breakout trader.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Timeframe) and derived price events
//! - Order, position and signal types
//! - The per-instrument evaluation error taxonomy
//! - Gateway traits for market data and order execution

pub mod types;
pub mod traits;
pub mod error;

pub use error::{EvalError, TradingError, TradingResult};
pub use types::*;
pub use traits::*;

//! Technical indicators for the breakout trader.
//!
//! - Simple moving average
//! - Average True Range, as the simple mean of the last `period` true ranges
//! - Intrinsic-time event detection (directional-change sampling)

pub mod intrinsic;
pub mod moving_average;
pub mod volatility;

pub use intrinsic::EventDetector;
pub use moving_average::Sma;
pub use volatility::Atr;

//! Candidate screening and signal classification.
//!
//! - [`VolatilityFilter`]: keeps instruments whose ATR relative to price
//!   exceeds a threshold
//! - [`BreakoutClassifier`]: BUY/SELL/HOLD from intrinsic-time support and
//!   resistance

mod breakout;
mod screener;

pub use breakout::{BreakoutClassifier, BreakoutConfig, Classification};
pub use screener::{VolatilityFilter, VolatilityFilterConfig, VolatilityReading};

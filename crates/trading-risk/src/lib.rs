//! Risk rules for the breakout trader.
//!
//! Provides the price-based exit rules (trailing stop, profit target) and
//! the portfolio capacity limits (entry gate, hard cap, pruning).

mod exit_rules;
mod portfolio_limits;

pub use exit_rules::{ExitReason, ExitRules};
pub use portfolio_limits::{LimitCheck, PortfolioLimits};

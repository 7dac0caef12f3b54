//! Configuration structures.

use config::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use trading_core::types::Timeframe;
use trading_engine::{LoopConfig, ManagerConfig};
use trading_risk::{ExitRules, PortfolioLimits};
use trading_strategies::{BreakoutConfig, VolatilityFilterConfig};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub exchange: ExchangeSettings,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "breakout-trader".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Directory for the daily log file; console only when unset
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            directory: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Exchange and paper account settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    pub quote_currency: String,
    /// Instruments taken from the head of the listing
    pub universe_size: usize,
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub paper_cash: Decimal,
    pub fee_rate: Decimal,
    pub slippage: Decimal,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            quote_currency: "KRW".to_string(),
            universe_size: 100,
            base_url: "https://api.upbit.com".to_string(),
            request_timeout_secs: 10,
            paper_cash: dec!(1000000),
            fee_rate: dec!(0.0005),
            slippage: Decimal::ZERO,
        }
    }
}

/// Signal and sizing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategySettings {
    /// Quote-currency amount per entry
    pub order_amount: Decimal,
    /// Minimum ATR / price ratio (exclusive)
    pub volatility_threshold: f64,
    /// Relative close-to-close move that counts as an event
    pub event_threshold: f64,
    pub atr_period: usize,
    pub timeframe: Timeframe,
    /// Bars fetched for event detection
    pub event_lookback: usize,
    /// Events used for support and resistance
    pub event_window: usize,
    /// Instruments screened concurrently
    pub fetch_concurrency: usize,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            order_amount: dec!(5000),
            volatility_threshold: 0.02,
            event_threshold: 0.01,
            atr_period: 14,
            timeframe: Timeframe::Hour1,
            event_lookback: 100,
            event_window: 10,
            fetch_concurrency: 1,
        }
    }
}

impl StrategySettings {
    pub fn filter_config(&self) -> VolatilityFilterConfig {
        VolatilityFilterConfig {
            threshold: self.volatility_threshold,
            atr_period: self.atr_period,
            timeframe: self.timeframe,
            concurrency: self.fetch_concurrency,
        }
    }

    pub fn breakout_config(&self) -> BreakoutConfig {
        BreakoutConfig {
            event_threshold: self.event_threshold,
            lookback: self.event_lookback,
            window: self.event_window,
            timeframe: self.timeframe,
        }
    }
}

/// Exit and capacity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    pub entry_gate: usize,
    pub hard_cap: usize,
    pub trailing_stop_fraction: Decimal,
    pub profit_target_multiplier: Decimal,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            entry_gate: 5,
            hard_cap: 10,
            trailing_stop_fraction: dec!(0.95),
            profit_target_multiplier: dec!(1.5),
        }
    }
}

impl RiskSettings {
    pub fn exit_rules(&self) -> ExitRules {
        ExitRules {
            trailing_stop_fraction: self.trailing_stop_fraction,
            profit_target_multiplier: self.profit_target_multiplier,
        }
    }

    pub fn limits(&self) -> PortfolioLimits {
        PortfolioLimits {
            entry_gate: self.entry_gate,
            hard_cap: self.hard_cap,
        }
    }
}

/// Loop timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub interval_secs: u64,
    /// Wait between a buy and the balance query
    pub settlement_delay_ms: u64,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            settlement_delay_ms: 1000,
        }
    }
}

impl AppConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.strategy;
        let r = &self.risk;

        let mut problems = Vec::new();
        if s.order_amount <= Decimal::ZERO {
            problems.push(format!("strategy.order_amount must be positive, got {}", s.order_amount));
        }
        if !(s.volatility_threshold > 0.0) {
            problems.push(format!(
                "strategy.volatility_threshold must be positive, got {}",
                s.volatility_threshold
            ));
        }
        if !(s.event_threshold > 0.0) {
            problems.push(format!("strategy.event_threshold must be positive, got {}", s.event_threshold));
        }
        if s.atr_period == 0 {
            problems.push("strategy.atr_period must be at least 1".to_string());
        }
        if s.event_window == 0 {
            problems.push("strategy.event_window must be at least 1".to_string());
        }
        if s.event_lookback < s.event_window + 1 {
            problems.push(format!(
                "strategy.event_lookback ({}) must exceed event_window ({})",
                s.event_lookback, s.event_window
            ));
        }
        if r.entry_gate == 0 {
            problems.push("risk.entry_gate must be at least 1".to_string());
        }
        if r.hard_cap < r.entry_gate {
            problems.push(format!(
                "risk.hard_cap ({}) must not be below risk.entry_gate ({})",
                r.hard_cap, r.entry_gate
            ));
        }
        if r.trailing_stop_fraction <= Decimal::ZERO || r.trailing_stop_fraction >= Decimal::ONE {
            problems.push(format!(
                "risk.trailing_stop_fraction must be in (0, 1), got {}",
                r.trailing_stop_fraction
            ));
        }
        if r.profit_target_multiplier <= Decimal::ZERO {
            problems.push(format!(
                "risk.profit_target_multiplier must be positive, got {}",
                r.profit_target_multiplier
            ));
        }
        if self.exchange.universe_size == 0 {
            problems.push("exchange.universe_size must be at least 1".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(problems.join("; ")))
        }
    }

    /// Settings for the portfolio manager.
    pub fn manager_config(&self) -> ManagerConfig {
        ManagerConfig {
            quote_currency: self.exchange.quote_currency.clone(),
            universe_size: self.exchange.universe_size,
            order_amount: self.strategy.order_amount,
            settlement_delay: Duration::from_millis(self.schedule.settlement_delay_ms),
            filter: self.strategy.filter_config(),
            breakout: self.strategy.breakout_config(),
            exit_rules: self.risk.exit_rules(),
            limits: self.risk.limits(),
        }
    }

    /// Unbounded loop at the configured interval.
    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            interval: Duration::from_secs(self.schedule.interval_secs),
            max_ticks: None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.exchange.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let manager = config.manager_config();
        assert_eq!(manager.order_amount, dec!(5000));
        assert_eq!(manager.limits.entry_gate, 5);
        assert_eq!(manager.limits.hard_cap, 10);
        assert_eq!(manager.filter.threshold, 0.02);
        assert_eq!(manager.breakout.window, 10);
        assert_eq!(manager.settlement_delay, Duration::from_secs(1));
        assert_eq!(config.loop_config().interval, Duration::from_secs(60));
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = AppConfig::default();
        config.strategy.order_amount = Decimal::ZERO;
        config.strategy.event_lookback = 10;
        config.risk.hard_cap = 3;
        config.risk.trailing_stop_fraction = dec!(1);

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("order_amount"));
        assert!(message.contains("event_lookback"));
        assert!(message.contains("hard_cap"));
        assert!(message.contains("trailing_stop_fraction"));
    }

    #[test]
    fn test_rejects_zero_thresholds() {
        let mut config = AppConfig::default();
        config.strategy.volatility_threshold = 0.0;
        config.strategy.event_threshold = -0.01;
        config.strategy.atr_period = 0;

        let message = config.validate().unwrap_err().to_string();
        assert!(message.contains("volatility_threshold"));
        assert!(message.contains("event_threshold"));
        assert!(message.contains("atr_period"));
    }
}

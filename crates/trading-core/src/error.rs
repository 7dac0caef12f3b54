//! Error types for the trading system.

use rust_decimal::Decimal;
use thiserror::Error;

/// Top-level trading system error.
#[derive(Error, Debug)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Market data errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for {symbol}: {reason}")]
    Unavailable { symbol: String, reason: String },

    #[error("Rate limited by data source")]
    RateLimited,

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl DataError {
    /// Shorthand for an unavailable-data error on one instrument.
    pub fn unavailable(symbol: &str, reason: impl Into<String>) -> Self {
        DataError::Unavailable {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

/// Order placement errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Order rejected: {0}")]
    Rejected(String),

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("Insufficient holdings of {symbol}: required {required}, available {available}")]
    InsufficientHoldings {
        symbol: String,
        required: Decimal,
        available: Decimal,
    },

    #[error("No price to fill {0}")]
    NoPrice(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Outcome of evaluating one instrument when it does not succeed.
///
/// Every per-instrument step in the decision engine returns
/// `Result<T, EvalError>`; callers log the error and skip the instrument
/// for the current tick.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Price or bar fetch failed.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// Too few bars or events for the calculation.
    #[error("insufficient data: need {required}, have {available}")]
    InsufficientData { required: usize, available: usize },

    /// Buy or sell was rejected.
    #[error("order failure: {0}")]
    OrderFailure(String),
}

impl From<DataError> for EvalError {
    fn from(err: DataError) -> Self {
        EvalError::DataUnavailable(err.to_string())
    }
}

impl From<IndicatorError> for EvalError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { required, available } => {
                EvalError::InsufficientData { required, available }
            }
            other => EvalError::DataUnavailable(other.to_string()),
        }
    }
}

impl From<OrderError> for EvalError {
    fn from(err: OrderError) -> Self {
        EvalError::OrderFailure(err.to_string())
    }
}

/// Result type alias for trading operations.
pub type TradingResult<T> = Result<T, TradingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_error_maps_to_insufficient_data() {
        let err: EvalError = IndicatorError::InsufficientData {
            required: 15,
            available: 3,
        }
        .into();
        assert_eq!(
            err,
            EvalError::InsufficientData {
                required: 15,
                available: 3
            }
        );
    }

    #[test]
    fn test_data_error_maps_to_unavailable() {
        let err: EvalError = DataError::unavailable("KRW-BTC", "timeout").into();
        assert!(matches!(err, EvalError::DataUnavailable(msg) if msg.contains("KRW-BTC")));
    }

    #[test]
    fn test_order_error_maps_to_order_failure() {
        let err: EvalError = OrderError::Rejected("market closed".into()).into();
        assert!(matches!(err, EvalError::OrderFailure(_)));
    }

    #[test]
    fn test_trading_error_wraps_layer_errors() {
        let err: TradingError = DataError::RateLimited.into();
        assert_eq!(err.to_string(), "Data error: Rate limited by data source");

        let err: TradingError = OrderError::NoPrice("KRW-BTC".into()).into();
        assert!(matches!(err, TradingError::Order(_)));
    }
}

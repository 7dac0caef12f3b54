//! Exchange gateway traits.

use crate::error::{DataError, OrderError};
use crate::types::{Bar, Order, Timeframe};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Read-only market data from an exchange.
///
/// Implementations are expected to bound every call with a timeout; the
/// decision engine never retries.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// List tradeable instruments quoted in `quote_currency`, in the
    /// exchange's own order.
    async fn list_instruments(&self, quote_currency: &str) -> Result<Vec<String>, DataError>;

    /// Fetch up to `count` bars, ordered oldest to newest.
    ///
    /// May return fewer bars than requested.
    async fn get_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        count: usize,
    ) -> Result<Vec<Bar>, DataError>;

    /// Latest traded price.
    async fn current_price(&self, symbol: &str) -> Result<Decimal, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Market data plus order execution.
#[async_trait]
pub trait Exchange: MarketData {
    /// Submit a market buy spending `notional` of the quote currency.
    async fn buy_market(&self, symbol: &str, notional: Decimal) -> Result<Order, OrderError>;

    /// Submit a market sell of `quantity` units.
    async fn sell_market(&self, symbol: &str, quantity: Decimal) -> Result<Order, OrderError>;

    /// Quantity of `symbol` currently held, `None` if nothing is held.
    async fn balance(&self, symbol: &str) -> Result<Option<Decimal>, OrderError>;
}

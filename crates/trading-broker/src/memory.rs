//! In-memory market data source.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use trading_core::error::DataError;
use trading_core::traits::MarketData;
use trading_core::types::{Bar, Timeframe};

#[derive(Debug, Default)]
struct MarketState {
    /// Listing order
    instruments: Vec<String>,
    bars: HashMap<String, Vec<Bar>>,
    prices: HashMap<String, Decimal>,
}

impl MarketState {
    fn register(&mut self, symbol: &str) {
        if !self.instruments.iter().any(|s| s == symbol) {
            self.instruments.push(symbol.to_string());
        }
    }
}

/// Market data held in memory and updated by the caller.
///
/// Bars are served for every timeframe. Symbols are listed in the order
/// they were first registered.
#[derive(Debug, Default)]
pub struct InMemoryMarket {
    state: Mutex<MarketState>,
}

impl InMemoryMarket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bar history of `symbol`, oldest first.
    pub fn set_bars(&self, symbol: &str, bars: Vec<Bar>) {
        let mut state = self.lock();
        state.register(symbol);
        state.bars.insert(symbol.to_string(), bars);
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        let mut state = self.lock();
        state.register(symbol);
        state.prices.insert(symbol.to_string(), price);
    }

    /// Make the price of `symbol` unavailable.
    pub fn remove_price(&self, symbol: &str) {
        self.lock().prices.remove(symbol);
    }

    fn lock(&self) -> MutexGuard<'_, MarketState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl MarketData for InMemoryMarket {
    async fn list_instruments(&self, quote_currency: &str) -> Result<Vec<String>, DataError> {
        let prefix = format!("{quote_currency}-");
        Ok(self
            .lock()
            .instruments
            .iter()
            .filter(|s| s.starts_with(&prefix))
            .cloned()
            .collect())
    }

    async fn get_bars(&self, symbol: &str, _timeframe: Timeframe, count: usize) -> Result<Vec<Bar>, DataError> {
        let state = self.lock();
        let bars = state
            .bars
            .get(symbol)
            .filter(|bars| !bars.is_empty())
            .ok_or_else(|| DataError::unavailable(symbol, "no bars"))?;

        let start = bars.len().saturating_sub(count);
        Ok(bars[start..].to_vec())
    }

    async fn current_price(&self, symbol: &str) -> Result<Decimal, DataError> {
        self.lock()
            .prices
            .get(symbol)
            .copied()
            .ok_or_else(|| DataError::unavailable(symbol, "no price"))
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

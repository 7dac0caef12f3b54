//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use trading_broker::InMemoryMarket;
use trading_core::error::{DataError, OrderError};
use trading_core::traits::{Exchange, MarketData};
use trading_core::types::{Bar, Order, OrderRequest, Position, Timeframe};
use trading_engine::{ManagerConfig, Portfolio, PortfolioManager};

/// An order-path call seen by the exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Buy { symbol: String, notional: Decimal },
    Sell { symbol: String, quantity: Decimal },
    Balance { symbol: String },
}

#[derive(Default)]
struct ScriptState {
    holdings: HashMap<String, Decimal>,
    calls: Vec<Call>,
    failing_sells: HashSet<String>,
    unsettled: HashSet<String>,
}

/// Exchange over an [`InMemoryMarket`] that fills every order at the
/// current price and records each call.
#[derive(Default)]
pub struct ScriptedExchange {
    market: InMemoryMarket,
    state: Mutex<ScriptState>,
}

impl ScriptedExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn market(&self) -> &InMemoryMarket {
        &self.market
    }

    /// Credit holdings as if bought earlier.
    pub fn hold(&self, symbol: &str, quantity: Decimal) {
        self.lock().holdings.insert(symbol.to_string(), quantity);
    }

    /// Reject every sell of `symbol`.
    pub fn fail_sells(&self, symbol: &str) {
        self.lock().failing_sells.insert(symbol.to_string());
    }

    pub fn allow_sells(&self, symbol: &str) {
        self.lock().failing_sells.remove(symbol);
    }

    /// Accept buys of `symbol` but never credit a balance.
    pub fn never_settle(&self, symbol: &str) {
        self.lock().unsettled.insert(symbol.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn sells(&self) -> Vec<(String, Decimal)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Sell { symbol, quantity } => Some((symbol, quantity)),
                _ => None,
            })
            .collect()
    }

    pub fn buys(&self) -> Vec<(String, Decimal)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Buy { symbol, notional } => Some((symbol, notional)),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap()
    }
}

#[async_trait]
impl MarketData for ScriptedExchange {
    async fn list_instruments(&self, quote_currency: &str) -> Result<Vec<String>, DataError> {
        self.market.list_instruments(quote_currency).await
    }

    async fn get_bars(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Result<Vec<Bar>, DataError> {
        self.market.get_bars(symbol, timeframe, count).await
    }

    async fn current_price(&self, symbol: &str) -> Result<Decimal, DataError> {
        self.market.current_price(symbol).await
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[async_trait]
impl Exchange for ScriptedExchange {
    async fn buy_market(&self, symbol: &str, notional: Decimal) -> Result<Order, OrderError> {
        self.lock().calls.push(Call::Buy {
            symbol: symbol.to_string(),
            notional,
        });

        let price = self
            .market
            .current_price(symbol)
            .await
            .map_err(|e| OrderError::NoPrice(e.to_string()))?;
        let quantity = notional / price;

        let mut state = self.lock();
        if !state.unsettled.contains(symbol) {
            *state.holdings.entry(symbol.to_string()).or_default() += quantity;
        }
        Ok(Order::from_request(&OrderRequest::market_buy(symbol, notional)).with_fill(price, quantity))
    }

    async fn sell_market(&self, symbol: &str, quantity: Decimal) -> Result<Order, OrderError> {
        let mut state = self.lock();
        state.calls.push(Call::Sell {
            symbol: symbol.to_string(),
            quantity,
        });

        if state.failing_sells.contains(symbol) {
            return Err(OrderError::Rejected(format!("{symbol}: scripted rejection")));
        }
        let remaining = state.holdings.get(symbol).copied().unwrap_or_default() - quantity;
        if remaining > Decimal::ZERO {
            state.holdings.insert(symbol.to_string(), remaining);
        } else {
            state.holdings.remove(symbol);
        }
        Ok(Order::from_request(&OrderRequest::market_sell(symbol, quantity)))
    }

    async fn balance(&self, symbol: &str) -> Result<Option<Decimal>, OrderError> {
        let mut state = self.lock();
        state.calls.push(Call::Balance {
            symbol: symbol.to_string(),
        });
        Ok(state.holdings.get(symbol).copied())
    }
}

/// Bars with a constant close whose true range is `2 * half_range`.
pub fn ranged_bars(count: usize, close: f64, half_range: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| Bar::new(i as i64 * 3_600_000, close, close + half_range, close - half_range, close, 1.0))
        .collect()
}

/// Closes alternating between `low` and `high`.
pub fn zigzag(count: usize, low: f64, high: f64) -> Vec<Bar> {
    (0..count)
        .map(|i| {
            let close = if i % 2 == 0 { low } else { high };
            Bar::new(i as i64 * 3_600_000, close, close, close, close, 1.0)
        })
        .collect()
}

/// Manager config with no settlement wait.
pub fn test_config() -> ManagerConfig {
    ManagerConfig {
        settlement_delay: Duration::ZERO,
        ..Default::default()
    }
}

/// Manager over `exchange` already holding `positions`, with matching
/// exchange balances.
pub fn manager_holding(
    exchange: &Arc<ScriptedExchange>,
    positions: Vec<Position>,
) -> PortfolioManager<ScriptedExchange> {
    for position in &positions {
        exchange.hold(&position.symbol, position.quantity);
    }
    PortfolioManager::new(exchange.clone(), test_config()).with_portfolio(Portfolio::from_positions(positions))
}

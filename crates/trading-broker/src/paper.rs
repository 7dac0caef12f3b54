//! Paper exchange for simulated trading on real or scripted prices.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};
use trading_core::error::{DataError, OrderError};
use trading_core::traits::{Exchange, MarketData};
use trading_core::types::{Bar, Order, OrderRequest, Timeframe};

/// Cash and holdings of a paper account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperAccount {
    /// Quote currency available
    pub cash: Decimal,
    /// Quantity held per symbol
    pub holdings: BTreeMap<String, Decimal>,
    /// Fees charged so far
    pub fees_paid: Decimal,
}

impl PaperAccount {
    fn new(cash: Decimal) -> Self {
        Self {
            cash,
            holdings: BTreeMap::new(),
            fees_paid: Decimal::ZERO,
        }
    }
}

/// Simulated exchange.
///
/// Prices and bars come from the wrapped market data source; orders fill
/// immediately at the current price adjusted by slippage.
pub struct PaperExchange<M> {
    market: M,
    account: Mutex<PaperAccount>,
    /// Fractional slippage applied against the trader
    slippage: Decimal,
    /// Fee as a fraction of the order notional
    fee_rate: Decimal,
}

impl<M: MarketData> PaperExchange<M> {
    /// Create a paper exchange with starting cash.
    pub fn new(market: M, initial_cash: Decimal) -> Self {
        Self {
            market,
            account: Mutex::new(PaperAccount::new(initial_cash)),
            slippage: Decimal::ZERO,
            fee_rate: dec!(0.0005), // Upbit KRW market fee
        }
    }

    /// Set fractional slippage.
    pub fn with_slippage(mut self, slippage: Decimal) -> Self {
        self.slippage = slippage;
        self
    }

    /// Set the fee rate.
    pub fn with_fee_rate(mut self, fee_rate: Decimal) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Wrapped market data source.
    pub fn market(&self) -> &M {
        &self.market
    }

    /// Get a snapshot of the account.
    pub fn snapshot(&self) -> PaperAccount {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PaperAccount> {
        self.account.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn fill_price(&self, symbol: &str) -> Result<Decimal, OrderError> {
        let price = self
            .market
            .current_price(symbol)
            .await
            .map_err(|e| OrderError::NoPrice(format!("{symbol}: {e}")))?;
        if price <= Decimal::ZERO {
            return Err(OrderError::NoPrice(format!("{symbol}: non-positive price {price}")));
        }
        Ok(price)
    }
}

#[async_trait]
impl<M: MarketData> MarketData for PaperExchange<M> {
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
        self.market.name()
    }
}

#[async_trait]
impl<M: MarketData> Exchange for PaperExchange<M> {
    async fn buy_market(&self, symbol: &str, notional: Decimal) -> Result<Order, OrderError> {
        if notional <= Decimal::ZERO {
            return Err(OrderError::Rejected(format!("non-positive notional {notional}")));
        }

        let market_price = self.fill_price(symbol).await?;
        let fill_price = market_price * (Decimal::ONE + self.slippage);
        let fee = notional * self.fee_rate;
        let quantity = (notional - fee) / fill_price;

        {
            let mut account = self.lock();
            if account.cash < notional {
                return Err(OrderError::InsufficientFunds {
                    required: notional,
                    available: account.cash,
                });
            }
            account.cash -= notional;
            account.fees_paid += fee;
            *account.holdings.entry(symbol.to_string()).or_insert(Decimal::ZERO) += quantity;
        }

        info!(symbol, %notional, %fill_price, %quantity, "paper buy filled");
        Ok(Order::from_request(&OrderRequest::market_buy(symbol, notional)).with_fill(fill_price, quantity))
    }

    async fn sell_market(&self, symbol: &str, quantity: Decimal) -> Result<Order, OrderError> {
        if quantity <= Decimal::ZERO {
            return Err(OrderError::Rejected(format!("non-positive quantity {quantity}")));
        }

        let held = self.lock().holdings.get(symbol).copied().unwrap_or(Decimal::ZERO);
        if held < quantity {
            return Err(OrderError::InsufficientHoldings {
                symbol: symbol.to_string(),
                required: quantity,
                available: held,
            });
        }

        let market_price = self.fill_price(symbol).await?;
        let fill_price = market_price * (Decimal::ONE - self.slippage);
        let gross = fill_price * quantity;
        let fee = gross * self.fee_rate;

        {
            let mut account = self.lock();
            // Re-check: the lock was released while fetching the price
            let held = account.holdings.get(symbol).copied().unwrap_or(Decimal::ZERO);
            if held < quantity {
                return Err(OrderError::InsufficientHoldings {
                    symbol: symbol.to_string(),
                    required: quantity,
                    available: held,
                });
            }
            let remaining = held - quantity;
            if remaining.is_zero() {
                account.holdings.remove(symbol);
            } else {
                account.holdings.insert(symbol.to_string(), remaining);
            }
            account.cash += gross - fee;
            account.fees_paid += fee;
        }

        info!(symbol, %quantity, %fill_price, proceeds = %(gross - fee), "paper sell filled");
        Ok(Order::from_request(&OrderRequest::market_sell(symbol, quantity)).with_fill(fill_price, quantity))
    }

    async fn balance(&self, symbol: &str) -> Result<Option<Decimal>, OrderError> {
        let held = self.lock().holdings.get(symbol).copied();
        debug!(symbol, balance = ?held, "paper balance");
        Ok(held.filter(|q| !q.is_zero()))
    }
}

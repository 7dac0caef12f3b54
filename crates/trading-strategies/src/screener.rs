//! Volatility screening of the instrument universe.

use futures::stream::{self, StreamExt};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use trading_core::error::EvalError;
use trading_core::traits::MarketData;
use trading_core::types::{Bar, Timeframe};
use trading_indicators::Atr;

/// Configuration for the volatility filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityFilterConfig {
    /// Minimum ATR / price ratio (exclusive)
    pub threshold: f64,
    /// ATR averaging period
    pub atr_period: usize,
    /// Bar interval used for ATR
    pub timeframe: Timeframe,
    /// Instruments measured concurrently
    pub concurrency: usize,
}

impl Default for VolatilityFilterConfig {
    fn default() -> Self {
        Self {
            threshold: 0.02,
            atr_period: 14,
            timeframe: Timeframe::Hour1,
            concurrency: 1,
        }
    }
}

/// ATR and price of one instrument at screening time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityReading {
    pub symbol: String,
    pub atr: f64,
    pub price: Decimal,
    /// ATR / price
    pub ratio: f64,
}

/// Filters a candidate set down to volatile instruments.
#[derive(Debug, Clone)]
pub struct VolatilityFilter {
    config: VolatilityFilterConfig,
    atr: Atr,
}

impl VolatilityFilter {
    pub fn new(config: VolatilityFilterConfig) -> Self {
        let atr = Atr::new(config.atr_period);
        Self { config, atr }
    }

    pub fn config(&self) -> &VolatilityFilterConfig {
        &self.config
    }

    /// ATR over already fetched bars.
    pub fn compute_atr(&self, bars: &[Bar]) -> Result<f64, EvalError> {
        Ok(self.atr.latest(bars)?)
    }

    /// Fetch the bars needed for one ATR value and compute it.
    pub async fn fetch_atr<M>(&self, market: &M, symbol: &str) -> Result<f64, EvalError>
    where
        M: MarketData + ?Sized,
    {
        let bars = market
            .get_bars(symbol, self.config.timeframe, self.atr.bars_required())
            .await?;
        let atr = self.compute_atr(&bars)?;
        debug!(symbol, atr, bars = bars.len(), "ATR computed");
        Ok(atr)
    }

    /// Whether an ATR/price pair clears the threshold. The boundary itself
    /// does not pass.
    pub fn passes(&self, atr: f64, price: f64) -> bool {
        price > 0.0 && atr / price > self.config.threshold
    }

    /// Measure ATR and current price for one instrument.
    pub async fn measure<M>(&self, market: &M, symbol: &str) -> Result<VolatilityReading, EvalError>
    where
        M: MarketData + ?Sized,
    {
        let atr = self.fetch_atr(market, symbol).await?;
        let price = market.current_price(symbol).await?;
        let price_f64 = price
            .to_f64()
            .ok_or_else(|| EvalError::DataUnavailable(format!("{symbol}: unrepresentable price {price}")))?;

        let ratio = if price_f64 > 0.0 { atr / price_f64 } else { 0.0 };
        Ok(VolatilityReading {
            symbol: symbol.to_string(),
            atr,
            price,
            ratio,
        })
    }

    /// Keep the instruments whose ATR/price ratio exceeds the threshold.
    ///
    /// Best effort: an instrument whose bars or price cannot be fetched is
    /// logged and left out. Input order is preserved.
    pub async fn filter<M>(&self, market: &M, instruments: &[String]) -> Vec<VolatilityReading>
    where
        M: MarketData + ?Sized,
    {
        info!(count = instruments.len(), "screening for volatility");

        let measured: Vec<(&String, Result<VolatilityReading, EvalError>)> =
            stream::iter(instruments)
                .map(|symbol| async move { (symbol, self.measure(market, symbol).await) })
                .buffered(self.config.concurrency.max(1))
                .collect()
                .await;

        let mut passed = Vec::new();
        for (symbol, result) in measured {
            match result {
                Ok(reading) => {
                    let price = reading.price.to_f64().unwrap_or_default();
                    if self.passes(reading.atr, price) {
                        info!(
                            symbol = %reading.symbol,
                            atr = reading.atr,
                            price = %reading.price,
                            ratio = reading.ratio,
                            "volatility filter passed"
                        );
                        passed.push(reading);
                    } else {
                        debug!(symbol = %reading.symbol, ratio = reading.ratio, "below volatility threshold");
                    }
                }
                Err(e) => warn!(symbol = %symbol, error = %e, "skipping instrument in volatility scan"),
            }
        }

        info!(
            passed = passed.len(),
            symbols = ?passed.iter().map(|r| r.symbol.as_str()).collect::<Vec<_>>(),
            "volatility screening complete"
        );
        passed
    }
}

impl Default for VolatilityFilter {
    fn default() -> Self {
        Self::new(VolatilityFilterConfig::default())
    }
}

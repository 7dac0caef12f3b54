//! Intrinsic-time breakout classification.
//!
//! Support and resistance are the min and max prices of the most recent
//! events. A current price strictly above resistance is a BUY, strictly
//! below support a SELL, anything else HOLD.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use trading_core::error::EvalError;
use trading_core::traits::MarketData;
use trading_core::types::{BreakoutLevels, Event, Signal, Timeframe};
use trading_indicators::EventDetector;

/// Configuration for the breakout classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakoutConfig {
    /// Relative close-to-close move that counts as an event
    pub event_threshold: f64,
    /// Bars fetched for event detection
    pub lookback: usize,
    /// Most recent events used for support/resistance
    pub window: usize,
    /// Bar interval
    pub timeframe: Timeframe,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            event_threshold: 0.01,
            lookback: 100,
            window: 10,
            timeframe: Timeframe::Hour1,
        }
    }
}

/// Full result of classifying one instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub symbol: String,
    pub signal: Signal,
    /// Events found in the lookback window
    pub events: usize,
    /// Levels, when enough events exist
    pub levels: Option<BreakoutLevels>,
    /// Price the levels were compared against
    pub price: Option<Decimal>,
}

/// Stateless BUY/SELL/HOLD classifier.
#[derive(Debug, Clone)]
pub struct BreakoutClassifier {
    config: BreakoutConfig,
    detector: EventDetector,
}

impl BreakoutClassifier {
    pub fn new(config: BreakoutConfig) -> Self {
        let detector = EventDetector::new(config.event_threshold);
        Self { config, detector }
    }

    pub fn config(&self) -> &BreakoutConfig {
        &self.config
    }

    /// Support/resistance over the last `window` events, `None` when fewer
    /// events exist.
    pub fn levels(&self, events: &[Event]) -> Option<BreakoutLevels> {
        if self.config.window == 0 || events.len() < self.config.window {
            return None;
        }

        let recent = &events[events.len() - self.config.window..];
        let support = recent.iter().map(|e| e.price).fold(f64::INFINITY, f64::min);
        let resistance = recent.iter().map(|e| e.price).fold(f64::NEG_INFINITY, f64::max);
        Some(BreakoutLevels { support, resistance })
    }

    /// Pure classification of a price against an event history.
    pub fn classify_events(&self, events: &[Event], price: f64) -> Signal {
        match self.levels(events) {
            Some(levels) => levels.classify(price),
            None => Signal::Hold,
        }
    }

    /// Fetch bars and price for `symbol` and classify it.
    ///
    /// Fails soft: missing bars, too few events or a missing price all
    /// yield HOLD. The only side effect is the market data fetches.
    pub async fn classify<M>(&self, market: &M, symbol: &str) -> Signal
    where
        M: MarketData + ?Sized,
    {
        self.evaluate(market, symbol).await.signal
    }

    /// Like [`classify`](Self::classify) but keeps the intermediate values.
    pub async fn evaluate<M>(&self, market: &M, symbol: &str) -> Classification
    where
        M: MarketData + ?Sized,
    {
        let mut result = Classification {
            symbol: symbol.to_string(),
            signal: Signal::Hold,
            events: 0,
            levels: None,
            price: None,
        };

        let events = match self.fetch_events(market, symbol).await {
            Ok(events) => events,
            Err(e) => {
                warn!(symbol, error = %e, "no event data, HOLD");
                return result;
            }
        };
        result.events = events.len();

        let Some(levels) = self.levels(&events) else {
            info!(symbol, events = events.len(), required = self.config.window, "not enough events, HOLD");
            return result;
        };
        result.levels = Some(levels);

        let price = match market.current_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!(symbol, error = %e, "current price unavailable, HOLD");
                return result;
            }
        };
        result.price = Some(price);

        let Some(price_f64) = price.to_f64() else {
            warn!(symbol, %price, "price not representable, HOLD");
            return result;
        };

        result.signal = levels.classify(price_f64);
        match result.signal {
            Signal::Buy => info!(
                symbol,
                %price,
                resistance = levels.resistance,
                "resistance broken, BUY"
            ),
            Signal::Sell => info!(
                symbol,
                %price,
                support = levels.support,
                "support broken, SELL"
            ),
            Signal::Hold => debug!(
                symbol,
                %price,
                support = levels.support,
                resistance = levels.resistance,
                "inside range, HOLD"
            ),
        }
        result
    }

    async fn fetch_events<M>(&self, market: &M, symbol: &str) -> Result<Vec<Event>, EvalError>
    where
        M: MarketData + ?Sized,
    {
        let bars = market
            .get_bars(symbol, self.config.timeframe, self.config.lookback)
            .await?;
        let events = self.detector.detect(&bars);
        debug!(symbol, bars = bars.len(), events = events.len(), "events detected");
        Ok(events)
    }
}

impl Default for BreakoutClassifier {
    fn default() -> Self {
        Self::new(BreakoutConfig::default())
    }
}

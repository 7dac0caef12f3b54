//! Volatility indicators.

use trading_core::error::IndicatorError;
use trading_core::traits::Indicator;
use trading_core::types::Bar;

use crate::Sma;

/// Average True Range (ATR).
///
/// True range per bar is `max(high - low, |high - prev_close|, |low - prev_close|)`.
/// The ATR is the simple mean of the last `period` true ranges, not
/// Wilder's recursive smoothing, so a value needs `period + 1` bars.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }

    /// Averaging period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Number of bars needed for one ATR value.
    pub fn bars_required(&self) -> usize {
        self.period + 1
    }

    /// True range for every bar that has a predecessor.
    pub fn true_ranges(bars: &[Bar]) -> Vec<f64> {
        bars.windows(2)
            .map(|pair| pair[1].true_range(Some(pair[0].close)))
            .collect()
    }

    /// Rolling ATR over the whole series, one value per full window.
    pub fn calculate_bars(&self, bars: &[Bar]) -> Vec<f64> {
        if bars.len() < self.bars_required() {
            return vec![];
        }
        Sma::new(self.period).calculate(&Self::true_ranges(bars))
    }

    /// ATR at the most recent bar.
    pub fn latest(&self, bars: &[Bar]) -> Result<f64, IndicatorError> {
        if bars.len() < self.bars_required() {
            return Err(IndicatorError::InsufficientData {
                required: self.bars_required(),
                available: bars.len(),
            });
        }

        let tr = Self::true_ranges(bars);
        let recent = &tr[tr.len() - self.period..];
        Sma::new(self.period).latest(recent)
    }
}

//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One interval of one instrument.
/// Uses f64 for fast indicator calculations.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Calculate the bar's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// Calculate the true range (used for ATR).
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        match prev_close {
            Some(pc) => {
                let hl = self.range();
                let hc = (self.high - pc).abs();
                let lc = (self.low - pc).abs();
                hl.max(hc).max(lc)
            }
            None => self.range(),
        }
    }

    /// Relative change of this bar's close against a previous close.
    ///
    /// Returns `None` when the previous close is not positive.
    #[inline]
    pub fn close_change(&self, prev_close: f64) -> Option<f64> {
        if prev_close > 0.0 {
            Some((self.close - prev_close) / prev_close)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_range() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);
        assert!((bar.range() - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_bar_true_range() {
        let bar = Bar::new(1000, 100.0, 110.0, 95.0, 105.0, 1000000.0);

        // Without previous close
        assert!((bar.true_range(None) - 15.0).abs() < 0.001);

        // With previous close that creates gap
        assert!((bar.true_range(Some(90.0)) - 20.0).abs() < 0.001);
        assert!((bar.true_range(Some(120.0)) - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_close_change() {
        let bar = Bar::new(0, 100.0, 103.0, 99.0, 102.0, 1.0);
        assert!((bar.close_change(100.0).unwrap() - 0.02).abs() < 1e-12);
        assert!(bar.close_change(0.0).is_none());
    }

    #[test]
    fn test_datetime() {
        let bar = Bar::new(1_700_000_000_000, 1.0, 1.0, 1.0, 1.0, 0.0);
        assert_eq!(bar.datetime().timestamp(), 1_700_000_000);
    }
}

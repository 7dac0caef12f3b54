//! Intrinsic-time event detection.
//!
//! A fixed-interval bar series is compressed into the sparse sequence of bars
//! whose close moved at least `threshold` (relative) from the previous close.
//! Support and resistance built on these events ignore the noise between
//! them.

use tracing::trace;
use trading_core::types::{Bar, Event, EventDirection};

/// Directional-change event detector.
///
/// Stateless: every call recomputes the events from the given bars.
#[derive(Debug, Clone, Copy)]
pub struct EventDetector {
    threshold: f64,
}

impl EventDetector {
    /// Create a detector firing on relative moves of at least `threshold`.
    pub fn new(threshold: f64) -> Self {
        assert!(threshold > 0.0, "Threshold must be positive");
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Walk consecutive bars and emit an event for every close-to-close
    /// change with `|change| >= threshold`.
    pub fn detect(&self, bars: &[Bar]) -> Vec<Event> {
        self.iter(bars).collect()
    }

    /// Lazy form of [`detect`](Self::detect).
    pub fn iter<'a>(&self, bars: &'a [Bar]) -> impl Iterator<Item = Event> + 'a {
        let threshold = self.threshold;
        bars.windows(2).filter_map(move |pair| {
            let (prev, bar) = (&pair[0], &pair[1]);
            let change = bar.close_change(prev.close)?;
            if change.abs() < threshold {
                return None;
            }

            let direction = if change > 0.0 {
                EventDirection::Up
            } else {
                EventDirection::Down
            };
            trace!(timestamp = bar.timestamp, price = bar.close, change, %direction, "event");

            Some(Event {
                timestamp: bar.timestamp,
                price: bar.close,
                change,
                direction,
            })
        })
    }
}

impl Default for EventDetector {
    fn default() -> Self {
        Self::new(0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closes(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| Bar::new(i as i64 * 3_600_000, p, p, p, p, 1.0))
            .collect()
    }

    #[test]
    fn test_flat_series_has_no_events() {
        let detector = EventDetector::default();
        let bars = closes(&[100.0; 50]);

        assert!(detector.detect(&bars).is_empty());
    }

    #[test]
    fn test_detects_moves_at_or_above_threshold() {
        let detector = EventDetector::new(0.01);
        // +2%, +0.5%, -3%, exactly +1% (on a round base)
        let bars = closes(&[100.0, 102.0, 102.51, 99.4347, 100.0, 101.0]);

        let events = detector.detect(&bars);
        let prices: Vec<f64> = events.iter().map(|e| e.price).collect();

        assert_eq!(prices, vec![102.0, 99.4347, 101.0]);
        assert_eq!(events[0].direction, EventDirection::Up);
        assert_eq!(events[1].direction, EventDirection::Down);
        assert_eq!(events[0].timestamp, 3_600_000);
    }

    #[test]
    fn test_skips_non_positive_previous_close() {
        let detector = EventDetector::new(0.01);
        let bars = closes(&[0.0, 5.0, 10.0]);

        let events = detector.detect(&bars);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].price, 10.0);
    }

    #[test]
    fn test_detection_is_restartable() {
        let detector = EventDetector::new(0.05);
        let bars = closes(&[100.0, 110.0, 100.0, 120.0]);

        assert_eq!(detector.detect(&bars), detector.detect(&bars));
        assert_eq!(detector.iter(&bars).count(), 3);
    }

    #[test]
    fn test_single_bar_has_no_events() {
        let detector = EventDetector::default();
        assert!(detector.detect(&closes(&[100.0])).is_empty());
        assert!(detector.detect(&[]).is_empty());
    }
}

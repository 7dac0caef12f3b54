//! Per-tick reports.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use trading_core::error::EvalError;
use trading_core::types::Order;
use trading_risk::ExitReason;

fn as_display<T: fmt::Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

/// A position closed during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExitRecord {
    pub symbol: String,
    pub reason: ExitReason,
    /// Price that triggered the exit
    pub price: Decimal,
    pub quantity: Decimal,
    pub order: Order,
}

/// A position opened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryRecord {
    pub symbol: String,
    /// Price observed before the buy, recorded as the entry price
    pub price: Decimal,
    /// Settled quantity
    pub quantity: Decimal,
    pub order: Order,
}

/// An instrument left alone for this tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipRecord {
    pub symbol: String,
    #[serde(serialize_with = "as_display")]
    pub error: EvalError,
}

/// What happened during one tick of the trading loop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub started_at: DateTime<Utc>,
    pub exits: Vec<ExitRecord>,
    pub entries: Vec<EntryRecord>,
    pub pruned: Option<ExitRecord>,
    pub skipped: Vec<SkipRecord>,
    /// Positions held after the tick
    pub held: usize,
}

impl TickReport {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            started_at: Utc::now(),
            exits: Vec::new(),
            entries: Vec::new(),
            pruned: None,
            skipped: Vec::new(),
            held: 0,
        }
    }

    pub(crate) fn skip(&mut self, symbol: &str, error: EvalError) {
        self.skipped.push(SkipRecord {
            symbol: symbol.to_string(),
            error,
        });
    }

    /// No orders were placed this tick.
    pub fn is_quiet(&self) -> bool {
        self.exits.is_empty() && self.entries.is_empty() && self.pruned.is_none()
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "tick {}: {} exit(s), {} entry(ies)",
            self.tick,
            self.exits.len(),
            self.entries.len()
        );
        if let Some(pruned) = &self.pruned {
            s.push_str(&format!(", pruned {}", pruned.symbol));
        }
        if !self.skipped.is_empty() {
            s.push_str(&format!(", {} skipped", self.skipped.len()));
        }
        s.push_str(&format!(", {} held", self.held));
        s
    }
}

//! Held positions.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use trading_core::types::Position;

/// Positions keyed by symbol, at most one per symbol.
///
/// Only [`PortfolioManager`](crate::PortfolioManager) adds or removes
/// entries; everything else gets a read-only view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Portfolio {
    positions: BTreeMap<String, Position>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a portfolio from existing positions. A later position for the
    /// same symbol replaces an earlier one.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        Self {
            positions: positions.into_iter().map(|p| (p.symbol.clone(), p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Held symbols, sorted.
    pub fn symbols(&self) -> Vec<String> {
        self.positions.keys().cloned().collect()
    }

    /// Total cost basis at entry prices.
    pub fn cost_basis(&self) -> Decimal {
        self.positions.values().map(|p| p.entry_price * p.quantity).sum()
    }

    pub(crate) fn insert(&mut self, position: Position) -> Option<Position> {
        self.positions.insert(position.symbol.clone(), position)
    }

    pub(crate) fn remove(&mut self, symbol: &str) -> Option<Position> {
        self.positions.remove(symbol)
    }
}

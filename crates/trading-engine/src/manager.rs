//! Portfolio manager: entries, exits and capacity pruning.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use trading_core::error::EvalError;
use trading_core::traits::Exchange;
use trading_core::types::Position;
use trading_risk::{ExitReason, ExitRules, LimitCheck, PortfolioLimits};
use trading_strategies::{BreakoutClassifier, BreakoutConfig, VolatilityFilter, VolatilityFilterConfig};

use crate::portfolio::Portfolio;
use crate::report::{EntryRecord, ExitRecord, TickReport};

/// Portfolio manager configuration.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Quote currency of the traded universe
    pub quote_currency: String,
    /// Instruments taken from the head of the exchange listing
    pub universe_size: usize,
    /// Quote-currency amount spent per entry
    pub order_amount: Decimal,
    /// Wait between a buy and the balance query
    pub settlement_delay: Duration,
    pub filter: VolatilityFilterConfig,
    pub breakout: BreakoutConfig,
    pub exit_rules: ExitRules,
    pub limits: PortfolioLimits,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            quote_currency: "KRW".to_string(),
            universe_size: 100,
            order_amount: dec!(5000),
            settlement_delay: Duration::from_secs(1),
            filter: VolatilityFilterConfig::default(),
            breakout: BreakoutConfig::default(),
            exit_rules: ExitRules::default(),
            limits: PortfolioLimits::default(),
        }
    }
}

/// Owns the portfolio and every decision that changes it.
pub struct PortfolioManager<E> {
    exchange: Arc<E>,
    config: ManagerConfig,
    filter: VolatilityFilter,
    classifier: BreakoutClassifier,
    portfolio: Portfolio,
}

impl<E: Exchange> PortfolioManager<E> {
    pub fn new(exchange: Arc<E>, config: ManagerConfig) -> Self {
        let filter = VolatilityFilter::new(config.filter.clone());
        let classifier = BreakoutClassifier::new(config.breakout.clone());
        Self {
            exchange,
            config,
            filter,
            classifier,
            portfolio: Portfolio::new(),
        }
    }

    /// Start from already held positions.
    pub fn with_portfolio(mut self, portfolio: Portfolio) -> Self {
        self.portfolio = portfolio;
        self
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn exchange(&self) -> &Arc<E> {
        &self.exchange
    }

    /// One full decision cycle: exits, entries, then pruning.
    pub async fn tick(&mut self, tick: u64) -> TickReport {
        let mut report = TickReport::new(tick);
        self.evaluate_exits(&mut report).await;
        self.manage_entries(&mut report).await;
        self.prune_excess(&mut report).await;
        report.held = self.portfolio.len();
        report
    }

    /// Check every held position against the exit rules.
    pub async fn evaluate_exits(&mut self, report: &mut TickReport) {
        for symbol in self.portfolio.symbols() {
            let outcome = match self.check_exit(&symbol).await {
                Ok(Some((reason, price))) => self.exit(&symbol, reason, price).await,
                Ok(None) => continue,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(record) => report.exits.push(record),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "exit evaluation skipped");
                    report.skip(&symbol, e);
                }
            }
        }
    }

    /// First exit rule that fires for `symbol`, with the price it fired at.
    async fn check_exit(&self, symbol: &str) -> Result<Option<(ExitReason, Decimal)>, EvalError> {
        let Some(position) = self.portfolio.get(symbol) else {
            return Ok(None);
        };

        let price = self.exchange.current_price(symbol).await?;
        let atr = self.filter.fetch_atr(self.exchange.as_ref(), symbol).await?;
        let atr = Decimal::from_f64(atr)
            .ok_or_else(|| EvalError::DataUnavailable(format!("{symbol}: unrepresentable ATR {atr}")))?;

        debug!(
            symbol,
            entry = %position.entry_price,
            %price,
            %atr,
            unrealized = %position.unrealized_return(price),
            "checking exits"
        );

        if let Some(reason) = self.config.exit_rules.evaluate(position, price, atr) {
            return Ok(Some((reason, price)));
        }

        if self.classifier.classify(self.exchange.as_ref(), symbol).await.is_sell() {
            return Ok(Some((ExitReason::ReversalSignal, price)));
        }
        Ok(None)
    }

    /// Sell the whole position. It is removed only once the sell is
    /// acknowledged; a failed sell leaves it for the next tick.
    async fn exit(&mut self, symbol: &str, reason: ExitReason, price: Decimal) -> Result<ExitRecord, EvalError> {
        let quantity = match self.portfolio.get(symbol) {
            Some(position) => position.quantity,
            None => return Err(EvalError::OrderFailure(format!("{symbol}: not held"))),
        };

        let order = self.exchange.sell_market(symbol, quantity).await?;
        let position = self.portfolio.remove(symbol);

        info!(
            symbol,
            %reason,
            %price,
            %quantity,
            entry = ?position.map(|p| p.entry_price),
            order_id = %order.id,
            "position closed"
        );
        Ok(ExitRecord {
            symbol: symbol.to_string(),
            reason,
            price,
            quantity,
            order,
        })
    }

    /// Scan the universe for volatile breakouts and buy them.
    ///
    /// The entry gate is checked once against the holdings at the start of
    /// the pass. Buys then continue until the hard cap is reached.
    pub async fn manage_entries(&mut self, report: &mut TickReport) {
        let limits = self.config.limits;
        if let LimitCheck::Blocked { reason } = limits.check_entry_gate(self.portfolio.len()) {
            info!(held = self.portfolio.len(), %reason, "no new entries this tick");
            return;
        }

        let mut universe = match self.exchange.list_instruments(&self.config.quote_currency).await {
            Ok(universe) => universe,
            Err(e) => {
                warn!(quote = %self.config.quote_currency, error = %e, "instrument listing failed");
                report.skip(&self.config.quote_currency, e.into());
                return;
            }
        };
        universe.truncate(self.config.universe_size);
        universe.retain(|symbol| !self.portfolio.contains(symbol));

        let candidates = self.filter.filter(self.exchange.as_ref(), &universe).await;

        for candidate in candidates {
            let symbol = candidate.symbol;
            if let LimitCheck::Blocked { reason } = limits.check_capacity(self.portfolio.len()) {
                info!(held = self.portfolio.len(), %reason, "hard cap reached, entries stopped");
                break;
            }
            if self.portfolio.contains(&symbol) {
                continue;
            }
            if !self.classifier.classify(self.exchange.as_ref(), &symbol).await.is_buy() {
                continue;
            }

            match self.enter(&symbol).await {
                Ok(record) => report.entries.push(record),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "entry failed");
                    report.skip(&symbol, e);
                }
            }
        }
    }

    /// Buy, wait for settlement and record the settled quantity.
    async fn enter(&mut self, symbol: &str) -> Result<EntryRecord, EvalError> {
        let price = self.exchange.current_price(symbol).await?;
        let order = self.exchange.buy_market(symbol, self.config.order_amount).await?;

        if !self.config.settlement_delay.is_zero() {
            tokio::time::sleep(self.config.settlement_delay).await;
        }

        let quantity = match self.exchange.balance(symbol).await? {
            Some(quantity) if quantity > Decimal::ZERO => quantity,
            _ => {
                return Err(EvalError::OrderFailure(format!(
                    "{symbol}: no settled balance after buy {}",
                    order.id
                )))
            }
        };

        self.portfolio.insert(Position::new(symbol, price, quantity));
        info!(
            symbol,
            %price,
            %quantity,
            notional = %self.config.order_amount,
            order_id = %order.id,
            "position opened"
        );
        Ok(EntryRecord {
            symbol: symbol.to_string(),
            price,
            quantity,
            order,
        })
    }

    /// Above the hard cap, sell the position with the lowest unrealized
    /// return. At most one position is pruned per call.
    pub async fn prune_excess(&mut self, report: &mut TickReport) {
        let limits = self.config.limits;
        if !limits.needs_prune(self.portfolio.len()) {
            return;
        }

        let mut ranked: Vec<(String, Decimal, Decimal)> = Vec::with_capacity(self.portfolio.len());
        for position in self.portfolio.iter() {
            match self.exchange.current_price(&position.symbol).await {
                Ok(price) => ranked.push((position.symbol.clone(), position.unrealized_return(price), price)),
                Err(e) => {
                    warn!(symbol = %position.symbol, error = %e, "no price, left out of prune ranking");
                    report.skip(&position.symbol, e.into());
                }
            }
        }

        let Some(worst) = limits.prune_candidate(ranked.iter().map(|(s, r, _)| (s.as_str(), *r))) else {
            warn!(held = self.portfolio.len(), "no prices for any position, prune skipped");
            return;
        };
        let Some((symbol, ret, price)) = ranked.iter().find(|(s, _, _)| s == worst).cloned() else {
            return;
        };

        info!(symbol = %symbol, unrealized = %ret, held = self.portfolio.len(), cap = limits.hard_cap, "pruning");
        match self.exit(&symbol, ExitReason::CapacityPrune, price).await {
            Ok(record) => report.pruned = Some(record),
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "prune sell failed");
                report.skip(&symbol, e);
            }
        }
    }

    /// Log every held position.
    pub fn log_portfolio(&self) {
        info!(
            held = self.portfolio.len(),
            cost_basis = %self.portfolio.cost_basis(),
            "current portfolio"
        );
        for position in self.portfolio.iter() {
            info!(
                symbol = %position.symbol,
                entry = %position.entry_price,
                quantity = %position.quantity,
                "holding"
            );
        }
    }
}

//! Fixed-interval trading loop.

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use trading_core::traits::Exchange;

use crate::manager::PortfolioManager;
use crate::report::TickReport;

/// Loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Sleep between ticks
    pub interval: Duration,
    /// Stop after this many ticks; `None` runs until cancelled
    pub max_ticks: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_ticks: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Drives a [`PortfolioManager`] until cancelled.
///
/// Cancellation is checked between ticks and during the sleep. A tick in
/// progress always runs to completion, so no order call is abandoned.
pub struct TradingLoop<E> {
    manager: PortfolioManager<E>,
    config: LoopConfig,
    shutdown: CancellationToken,
    state: LoopState,
    ticks: u64,
    last_report: Option<TickReport>,
}

impl<E: Exchange> TradingLoop<E> {
    pub fn new(manager: PortfolioManager<E>, config: LoopConfig, shutdown: CancellationToken) -> Self {
        Self {
            manager,
            config,
            shutdown,
            state: LoopState::Stopped,
            ticks: 0,
            last_report: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn manager(&self) -> &PortfolioManager<E> {
        &self.manager
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    fn limit_reached(&self) -> bool {
        self.config.max_ticks.is_some_and(|max| self.ticks >= max)
    }

    /// Run until cancelled or the tick limit is reached. Returns the number
    /// of ticks completed by this call.
    pub async fn run(&mut self) -> u64 {
        let start = self.ticks;
        self.state = LoopState::Running;
        info!(
            interval_secs = self.config.interval.as_secs(),
            max_ticks = ?self.config.max_ticks,
            "trading loop started"
        );

        loop {
            if self.shutdown.is_cancelled() || self.limit_reached() {
                break;
            }

            self.ticks += 1;
            let report = self.manager.tick(self.ticks).await;
            info!(tick = report.tick, "{}", report.summary());
            self.manager.log_portfolio();
            self.last_report = Some(report);

            if self.limit_reached() {
                break;
            }

            tokio::select! {
                () = self.shutdown.cancelled() => {
                    info!("trading loop cancelled");
                    break;
                }
                () = tokio::time::sleep(self.config.interval) => {}
            }
        }

        self.state = LoopState::Stopped;
        info!(ticks = self.ticks, held = self.manager.portfolio().len(), "trading loop stopped");
        self.ticks - start
    }
}

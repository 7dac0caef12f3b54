//! Portfolio decision engine and trading loop.
//!
//! [`PortfolioManager`] owns the held positions and turns signals into
//! entries and exits. [`TradingLoop`] ticks it on a fixed interval until
//! cancelled or a tick limit is reached.

mod manager;
mod portfolio;
mod report;
mod scheduler;

pub use manager::{ManagerConfig, PortfolioManager};
pub use portfolio::Portfolio;
pub use report::{EntryRecord, ExitRecord, SkipRecord, TickReport};
pub use scheduler::{LoopConfig, LoopState, TradingLoop};

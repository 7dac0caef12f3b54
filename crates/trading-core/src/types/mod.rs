//! Core data types for the trading system.

mod event;
mod ohlcv;
mod order;
mod position;
mod signal;
mod timeframe;

pub use event::{Event, EventDirection};
pub use ohlcv::Bar;
pub use order::{Order, OrderAmount, OrderRequest, Side};
pub use position::Position;
pub use signal::{BreakoutLevels, Signal};
pub use timeframe::Timeframe;

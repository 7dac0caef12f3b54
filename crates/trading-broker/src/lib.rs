//! Market data and exchange gateways.
//!
//! - [`UpbitClient`]: public quotation API of the Upbit exchange
//! - [`PaperExchange`]: simulated order execution over any market data source
//! - [`InMemoryMarket`]: scripted market data for tests and dry runs

mod memory;
mod paper;
mod upbit;

pub use memory::InMemoryMarket;
pub use paper::{PaperAccount, PaperExchange};
pub use upbit::{UpbitClient, UpbitConfig};

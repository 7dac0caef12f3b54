//! One-shot screening command implementation.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use trading_broker::{UpbitClient, UpbitConfig};
use trading_config::AppConfig;
use trading_core::traits::MarketData;
use trading_core::types::Signal;
use trading_strategies::{BreakoutClassifier, VolatilityFilter};

use crate::cli::ScanArgs;

#[derive(Serialize)]
struct ScanRow {
    symbol: String,
    price: Decimal,
    atr: f64,
    ratio: f64,
    events: usize,
    support: Option<f64>,
    resistance: Option<f64>,
    signal: Signal,
}

pub async fn run(args: ScanArgs, config: AppConfig) -> Result<()> {
    let market = UpbitClient::new(UpbitConfig::new(&config.exchange.base_url, config.request_timeout()))
        .context("failed to create market data client")?;

    let mut universe = market
        .list_instruments(&config.exchange.quote_currency)
        .await
        .context("failed to list instruments")?;
    universe.truncate(args.limit.unwrap_or(config.exchange.universe_size));
    info!(count = universe.len(), "universe loaded");

    let filter = VolatilityFilter::new(config.strategy.filter_config());
    let classifier = BreakoutClassifier::new(config.strategy.breakout_config());

    let readings = filter.filter(&market, &universe).await;

    if !args.json {
        println!(
            "{:<14} {:>16} {:>14} {:>8} {:>7} {:>7}",
            "SYMBOL", "PRICE", "ATR", "ATR/PX", "EVENTS", "SIGNAL"
        );
    }

    for reading in readings {
        let classification = classifier.evaluate(&market, &reading.symbol).await;
        let row = ScanRow {
            symbol: reading.symbol,
            price: reading.price,
            atr: reading.atr,
            ratio: reading.ratio,
            events: classification.events,
            support: classification.levels.map(|l| l.support),
            resistance: classification.levels.map(|l| l.resistance),
            signal: classification.signal,
        };

        if args.json {
            println!("{}", serde_json::to_string(&row)?);
        } else {
            println!(
                "{:<14} {:>16} {:>14.4} {:>7.2}% {:>7} {:>7}",
                row.symbol,
                row.price,
                row.atr,
                row.ratio * 100.0,
                row.events,
                row.signal.to_string()
            );
        }
    }

    Ok(())
}

//! Trading loop command implementation.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use trading_broker::{PaperExchange, UpbitClient, UpbitConfig};
use trading_config::AppConfig;
use trading_engine::{PortfolioManager, TradingLoop};

use crate::cli::RunArgs;

pub async fn run(args: RunArgs, config: AppConfig) -> Result<()> {
    let market = UpbitClient::new(UpbitConfig::new(&config.exchange.base_url, config.request_timeout()))
        .context("failed to create market data client")?;

    let cash = args.cash.unwrap_or(config.exchange.paper_cash);
    let exchange = Arc::new(
        PaperExchange::new(market, cash)
            .with_fee_rate(config.exchange.fee_rate)
            .with_slippage(config.exchange.slippage),
    );

    let manager = PortfolioManager::new(exchange.clone(), config.manager_config());

    let mut loop_config = config.loop_config();
    loop_config.max_ticks = args.ticks;
    if let Some(secs) = args.interval {
        loop_config.interval = Duration::from_secs(secs);
    }

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, stopping after the current tick");
                interrupt.cancel();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });

    info!(
        app = %config.app.name,
        environment = %config.app.environment,
        exchange = "upbit (paper)",
        %cash,
        order_amount = %config.strategy.order_amount,
        "starting trading loop"
    );

    let mut trading_loop = TradingLoop::new(manager, loop_config, shutdown);
    let ticks = trading_loop.run().await;

    let account = exchange.snapshot();
    println!();
    println!("Ticks run:    {}", ticks);
    println!("Cash:         {}", account.cash.round_dp(2));
    println!("Fees paid:    {}", account.fees_paid.round_dp(2));
    println!("Positions:    {}", trading_loop.manager().portfolio().len());
    for position in trading_loop.manager().portfolio().iter() {
        println!(
            "  {:<14} entry {:>16}  qty {}",
            position.symbol,
            position.entry_price,
            position.quantity.round_dp(8)
        );
    }

    Ok(())
}

//! Breakout trader CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use trading_config::load_config;
use trading_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config);

    // Logging comes up before the config is checked so that a bad file is
    // still reported through it
    let settings = config.as_ref().ok().map(|c| &c.logging);
    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .or_else(|| settings.map(|s| s.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let json = cli.json_logs || settings.is_some_and(|s| s.is_json());
    let log_dir = settings.and_then(|s| s.directory.clone());
    let _guard = setup_logging(&level, json, log_dir.as_deref()).context("failed to set up logging")?;

    match cli.command {
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, config),
        Commands::Run(args) => {
            let config = config.with_context(|| format!("invalid configuration {}", cli.config.display()))?;
            cli::commands::run::run(args, config).await
        }
        Commands::Scan(args) => {
            let config = config.with_context(|| format!("invalid configuration {}", cli.config.display()))?;
            cli::commands::scan::run(args, config).await
        }
    }
}

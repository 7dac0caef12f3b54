//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "breakout")]
#[command(author, version, about = "Volatility breakout trading loop for crypto spot markets")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to logging.level from the configuration)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the trading loop on live market data with a paper account
    Run(RunArgs),
    /// Screen the universe once and print signals without trading
    Scan(ScanArgs),
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Stop after this many ticks (runs until Ctrl-C when omitted)
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Seconds between ticks, overriding schedule.interval_secs
    #[arg(long)]
    pub interval: Option<u64>,

    /// Starting paper cash, overriding exchange.paper_cash
    #[arg(long)]
    pub cash: Option<Decimal>,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Instruments to screen, overriding exchange.universe_size
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print one JSON object per candidate
    #[arg(long)]
    pub json: bool,
}

//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, ExchangeSettings, LoggingConfig, RiskSettings, ScheduleSettings, StrategySettings,
};

pub use config::ConfigError;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;

/// Plain environment variable overriding `strategy.order_amount`.
pub const ORDER_AMOUNT_ENV: &str = "ORDER_AMOUNT";

/// Load configuration from file and environment, then validate it.
///
/// Sources, later ones winning: the TOML file, `TRADING__SECTION__KEY`
/// variables, and `ORDER_AMOUNT`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("TRADING")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("strategy.order_amount", std::env::var(ORDER_AMOUNT_ENV).ok())?;

    finish(builder)
}

/// Parse configuration from a TOML string without consulting the
/// environment.
pub fn parse_config(toml: &str) -> Result<AppConfig, ConfigError> {
    finish(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

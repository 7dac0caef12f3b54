//! Logging setup.

use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Daily log files are named `trading_log.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "trading_log";

/// Setup logging with the given level.
///
/// `RUST_LOG` overrides `level` when set. With a `log_dir`, records are
/// also written to a daily rolling file there; the returned guard must be
/// held until exit or buffered lines are lost.
pub fn setup_logging(level: &str, json: bool, log_dir: Option<&Path>) -> io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(fmt::layer().pretty())
            .init();
    }

    if let Some(dir) = log_dir {
        tracing::info!(dir = %dir.display(), "writing daily log files");
    }
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_is_created() {
        let dir = std::env::temp_dir().join(format!("breakout-logs-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let guard = setup_logging("info", false, Some(&dir)).unwrap();
        tracing::info!("hello");

        assert!(guard.is_some());
        assert!(dir.is_dir());
        drop(guard);
        let _ = std::fs::remove_dir_all(&dir);
    }
}

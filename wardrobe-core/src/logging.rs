//! Logging infrastructure
//!
//! Logs are written to `<data dir>/logs/wardrobe.log`, rotated daily.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::domain::result::{Error, Result};

pub const LOG_FILE_NAME: &str = "wardrobe.log";

/// Directory holding the rolling log files
pub fn log_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}

/// Initialize the logging system
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init(data_dir: &Path, level: &str) -> Result<LoggingGuard> {
    let dir = log_dir(data_dir);
    std::fs::create_dir_all(&dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {}", e)))?;

    tracing::info!(log_dir = %dir.display(), level, "Logging initialized");

    Ok(LoggingGuard { _guard: guard })
}

/// Initialize logging for tests (logs to the test writer)
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flushes pending log writes when dropped
pub struct LoggingGuard {
    _guard: tracing_appender::non_blocking::WorkerGuard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_dir() {
        assert!(log_dir(Path::new("/tmp/wd")).ends_with("logs"));
    }
}

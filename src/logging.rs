//! Logging setup for the `lottery-api` binary.
//!
//! Diagnostics always go to stderr. When a log directory is configured, two
//! daily-rotated files are written there as well:
//!
//! - `lottery-api.<date>.log`: everything that passes the filter
//! - `error.<date>.log`: warnings and errors only (skipped and failed rows)
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the configured
//! level.
//!
//! ```no_run
//! use lottery_api::config::LoggingConfig;
//!
//! lottery_api::logging::init(&LoggingConfig::default()).expect("Failed to initialize logging");
//! tracing::info!("ready");
//! ```

use crate::config::LoggingConfig;
use anyhow::{Context as _, Result};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter, Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

const LOG_FILE_PREFIX: &str = "lottery-api";
const ERROR_FILE_PREFIX: &str = "error";
const MAX_LOG_FILES: usize = 10;

/// Install the global subscriber.
///
/// # Errors
///
/// Returns error if the filter is invalid, the log directory cannot be
/// created, or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (all_logs_layer, error_logs_layer) = match &config.log_dir {
        Some(dir) => {
            let all_logs = file_appender(dir, LOG_FILE_PREFIX)?;
            let error_logs = file_appender(dir, ERROR_FILE_PREFIX)?;
            (
                Some(
                    fmt::layer()
                        .with_target(true)
                        .with_line_number(true)
                        .with_ansi(false)
                        .with_writer(all_logs),
                ),
                Some(
                    fmt::layer()
                        .with_target(true)
                        .with_line_number(true)
                        .with_ansi(false)
                        .with_writer(error_logs)
                        .with_filter(EnvFilter::new("warn")),
                ),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(all_logs_layer)
        .with(error_logs_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(dir) = &config.log_dir {
        tracing::debug!("Logging initialized, log directory: {}", dir.display());
    }

    Ok(())
}

fn file_appender(dir: &Path, prefix: &str) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .build(dir)
        .with_context(|| format!("Failed to create {prefix} log appender"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_appender_creates_directory() -> Result<()> {
        let dir = tempdir()?;
        let log_dir = dir.path().join("logs");
        file_appender(&log_dir, LOG_FILE_PREFIX)?;
        assert!(log_dir.is_dir());
        Ok(())
    }
}

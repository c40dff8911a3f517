//! Logging configuration using tracing
//!
//! The TUI owns the terminal, so logs go to a rolling file only.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Initialize the logging subsystem
///
/// Logs are written to `<local data dir>/flowscope/logs/`.
/// Log level is controlled by the `FLOWSCOPE_LOG` environment variable.
///
/// # Examples
/// ```bash
/// FLOWSCOPE_LOG=debug flowscope
/// FLOWSCOPE_LOG=trace flowscope
/// ```
pub fn init() -> Result<()> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "flowscope.log");

    // Default to info, allow override via FLOWSCOPE_LOG
    let env_filter =
        EnvFilter::try_from_env("FLOWSCOPE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("Flowscope starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(())
}

/// Get the log directory path
fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("flowscope").join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_ends_with_expected_components() {
        let dir = get_log_directory();
        assert!(dir.ends_with("flowscope/logs"));
    }
}

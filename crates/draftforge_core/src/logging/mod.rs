//! Logging infrastructure.
//!
//! This module provides:
//! - Global `tracing` setup for stderr, optionally with a daily log file
//! - Per-run loggers with file + callback output
//!
//! # Example
//!
//! ```no_run
//! use draftforge_core::logging::{RunLogger, LogConfig};
//!
//! let logger = RunLogger::new("my_run", "/path/to/logs", LogConfig::default(), None).unwrap();
//!
//! logger.phase("Scan");
//! logger.info("3 images found");
//! logger.success("Draft written");
//! ```

mod run_logger;
mod types;

use std::path::Path;

pub use run_logger::RunLogger;
pub use types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name prefix for the daily application log.
const APP_LOG_PREFIX: &str = "draftforge.log";

/// Initialize the global tracing subscriber (stderr only).
///
/// `RUST_LOG` wins over `default_level`. Should be called once at startup.
pub fn init_tracing(default_level: LogLevel) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(env_filter(default_level))
        .init();
}

/// Initialize tracing to stderr plus a daily rolling file in `log_dir`.
///
/// Keep the returned guard alive for the program's lifetime; dropping it
/// flushes and stops the file writer.
pub fn init_tracing_with_file(default_level: LogLevel, log_dir: &Path) -> WorkerGuard {
    let appender = tracing_appender::rolling::daily(log_dir, APP_LOG_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_level))
        .init();

    guard
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()))
}

//! Per-run logger with file and callback output.
//!
//! Each generation run gets its own logger that:
//! - Writes to a dedicated log file
//! - Sends messages to a front-end callback (if provided)
//! - Mirrors every line to `tracing`

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Per-run logger with dual output (file + callback).
pub struct RunLogger {
    run_name: String,
    log_path: PathBuf,
    file_writer: Arc<Mutex<Option<BufWriter<File>>>>,
    callback: Arc<Mutex<Option<LogCallback>>>,
    config: LogConfig,
    warnings: Arc<Mutex<usize>>,
}

impl RunLogger {
    /// Create `<log_dir>/<run_name>.log` and a logger writing to it.
    pub fn new(
        run_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let run_name = run_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;
        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&run_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            run_name,
            log_path,
            file_writer: Arc::new(Mutex::new(Some(BufWriter::new(file)))),
            callback: Arc::new(Mutex::new(callback)),
            config,
            warnings: Arc::new(Mutex::new(0)),
        })
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Number of warnings logged so far.
    pub fn warning_count(&self) -> usize {
        *self.warnings.lock()
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => tracing::trace!(run = %self.run_name, "{}", message),
            LogLevel::Debug => tracing::debug!(run = %self.run_name, "{}", message),
            LogLevel::Info => tracing::info!(run = %self.run_name, "{}", message),
            LogLevel::Warn => tracing::warn!(run = %self.run_name, "{}", message),
            LogLevel::Error => tracing::error!(run = %self.run_name, "{}", message),
        }

        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        *self.warnings.lock() += 1;
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    pub fn phase(&self, phase_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Phase.format(phase_name));
    }

    pub fn section(&self, section_name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(section_name));
    }

    pub fn success(&self, message: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Success.format(message));
    }

    /// Flush buffered lines to the log file.
    pub fn try_flush(&self) -> std::io::Result<()> {
        match *self.file_writer.lock() {
            Some(ref mut writer) => writer.flush(),
            None => Ok(()),
        }
    }

    /// Like [`try_flush`](Self::try_flush), reporting failures to `tracing`.
    pub fn flush(&self) {
        if let Err(e) = self.try_flush() {
            tracing::warn!(
                run = %self.run_name,
                "Failed to flush run log {}: {}",
                self.log_path.display(),
                e
            );
        }
    }

    /// Flush and release the log file.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Local::now().format("%H:%M:%S");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if let Some(ref callback) = *self.callback.lock() {
            callback(formatted);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Replace characters that are not valid in file names.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    #[test]
    fn creates_log_file() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("demo_run", dir.path(), LogConfig::default(), None).unwrap();

        assert!(logger.log_path().exists());
        assert!(logger.log_path().ends_with("demo_run.log"));
    }

    #[test]
    fn writes_prefixed_lines() {
        let dir = tempdir().unwrap();
        let config = LogConfig {
            show_timestamps: false,
            ..LogConfig::default()
        };
        let logger = RunLogger::new("run", dir.path(), config, None).unwrap();

        logger.phase("Scan");
        logger.success("done");
        logger.debug("hidden at info level");
        logger.flush();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert_eq!(content, "=== Scan ===\n[SUCCESS] done\n");
    }

    #[test]
    fn counts_warnings_and_calls_callback() {
        let dir = tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let callback: LogCallback = Box::new(move |_msg| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let logger =
            RunLogger::new("run", dir.path(), LogConfig::default(), Some(callback)).unwrap();
        logger.info("one");
        logger.warn("two");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(logger.warning_count(), 1);
    }

    #[test]
    fn flush_writes_buffered_lines() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();
        logger.info("buffered line");
        logger.try_flush().unwrap();

        let content = fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("buffered line"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn flush_failure_is_reported_not_panicked() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), LogConfig::default(), None).unwrap();
        let full = File::options().write(true).open("/dev/full").unwrap();
        *logger.file_writer.lock() = Some(BufWriter::new(full));

        logger.info("lost line");
        assert!(logger.try_flush().is_err());
        logger.flush();
        logger.close();
        assert!(logger.try_flush().is_ok());
    }

    #[test]
    fn sanitizes_filename() {
        assert_eq!(sanitize_filename("normal_name"), "normal_name");
        assert_eq!(sanitize_filename("has/slash"), "has_slash");
        assert_eq!(sanitize_filename("a<b>c"), "a_b_c");
    }
}

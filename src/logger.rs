//! Custom logging module.
//!
//! Captures log records and forwards the formatted lines to a callback: the
//! log pane in the terminal UI, or stderr in headless mode.

use crate::error::{AppError, AppResult};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Maximum number of lines kept by a `LogBuffer`.
///
pub const LOG_CAPACITY: usize = 200;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger that hands every formatted record to a callback.
///
pub struct CustomLogger {
    level: LevelFilter,
    log_callback: Arc<Mutex<Option<Box<dyn Fn(String) + Send + Sync>>>>,
}

impl CustomLogger {
    pub fn new(level: LevelFilter) -> Self {
        CustomLogger {
            level,
            log_callback: Arc::new(Mutex::new(None)),
        }
    }

    pub fn set_log_callback(&self, callback: Box<dyn Fn(String) + Send + Sync>) {
        if let Ok(mut guard) = self.log_callback.lock() {
            *guard = Some(callback);
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(callback) = self.log_callback.lock() {
                if let Some(ref cb) = *callback {
                    cb(format_log(record));
                }
            }
        }
    }

    fn flush(&self) {}
}

/// Install a `CustomLogger` as the global logger.
///
pub fn init(level: LevelFilter, callback: Box<dyn Fn(String) + Send + Sync>) -> AppResult<()> {
    let logger = CustomLogger::new(level);
    logger.set_log_callback(callback);
    log::set_logger(Box::leak(Box::new(logger))).map_err(|e| AppError::Logger(e.to_string()))?;
    log::set_max_level(level);
    Ok(())
}

/// Bounded, shareable buffer of recent log lines.
///
#[derive(Clone, Default)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        LogBuffer::default()
    }

    pub fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == LOG_CAPACITY {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Return up to `count` of the most recent lines, oldest first.
    ///
    pub fn tail(&self, count: usize) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => {
                let skip = lines.len().saturating_sub(count);
                lines.iter().skip(skip).cloned().collect()
            }
            Err(_) => vec![],
        }
    }

    /// Return a callback that appends to this buffer.
    ///
    pub fn sink(&self) -> Box<dyn Fn(String) + Send + Sync> {
        let buffer = self.clone();
        Box::new(move |line| buffer.push(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_log_includes_level_and_message() {
        let line = format_log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("surface missing"))
                .build(),
        );
        assert!(line.contains("WARN surface missing"));
    }

    #[test]
    fn logger_respects_level() {
        let buffer = LogBuffer::new();
        let logger = CustomLogger::new(LevelFilter::Info);
        logger.set_log_callback(buffer.sink());
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("hidden"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("shown"))
                .build(),
        );
        let lines = buffer.tail(10);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("shown"));
    }

    #[test]
    fn log_buffer_is_bounded() {
        let buffer = LogBuffer::new();
        for i in 0..(LOG_CAPACITY + 5) {
            buffer.push(i.to_string());
        }
        let all = buffer.tail(usize::MAX);
        assert_eq!(all.len(), LOG_CAPACITY);
        assert_eq!(all[0], "5");
        assert_eq!(buffer.tail(2), vec![
            (LOG_CAPACITY + 3).to_string(),
            (LOG_CAPACITY + 4).to_string()
        ]);
    }
}

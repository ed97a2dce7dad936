//! Stderr logger for the `log` facade
//!
//! The library only emits through `log` macros. Binaries install
//! [`StderrLogger`] to see them; it stays silent unless enabled by
//! `KATARIBE_DEBUG` or an explicit configuration.

use log::{LevelFilter, Log, Metadata, Record};

/// Environment variable that enables debug logging
pub const DEBUG_ENV: &str = "KATARIBE_DEBUG";

/// Logger configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Enable logging
    pub enabled: bool,
    /// Minimum level written
    pub level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        let level = std::env::var(DEBUG_ENV)
            .ok()
            .and_then(|value| value.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Debug);
        Self {
            enabled: std::env::var(DEBUG_ENV).is_ok(),
            level,
        }
    }
}

impl LogConfig {
    /// Effective filter, `Off` when disabled
    pub fn filter(&self) -> LevelFilter {
        if self.enabled {
            self.level
        } else {
            LevelFilter::Off
        }
    }
}

/// Writes `[LEVEL] target message` lines to stderr
#[derive(Debug, Clone)]
pub struct StderrLogger {
    filter: LevelFilter,
}

impl StderrLogger {
    pub fn new(config: &LogConfig) -> Self {
        Self {
            filter: config.filter(),
        }
    }

    /// Install as the global logger
    pub fn install(config: &LogConfig) -> Result<(), log::SetLoggerError> {
        let logger: &'static Self = Box::leak(Box::new(Self::new(config)));
        log::set_logger(logger)?;
        log::set_max_level(logger.filter);
        Ok(())
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = record.target().rsplit("::").next().unwrap_or_default();
        eprintln!("[{:5}] {:10} {}", record.level(), target, record.args());
    }

    fn flush(&self) {}
}

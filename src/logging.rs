//! Browser logging
//!
//! Installs the rolling logger with a sink that writes to the devtools console,
//! and exposes its recent warnings to the UI.

use std::sync::OnceLock;

use log::{Level, LevelFilter};
use rolling_logger::{LogEntry, RollingLogger, DEFAULT_CAPACITY};

static LOGGER: OnceLock<&'static RollingLogger> = OnceLock::new();

fn console_sink(entry: &LogEntry) {
    let line = entry.to_string().into();
    match entry.level {
        Level::Error => web_sys::console::error_1(&line),
        Level::Warn => web_sys::console::warn_1(&line),
        Level::Info => web_sys::console::info_1(&line),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
    }
}

pub fn init() {
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    match RollingLogger::new(level, DEFAULT_CAPACITY).with_sink(console_sink).install() {
        Ok(logger) => {
            LOGGER.get_or_init(|| logger);
            log::debug!("[APP] Logger installed at {}", level);
        }
        Err(e) => web_sys::console::warn_1(&format!("[APP] Logger already installed: {}", e).into()),
    }
}

/// Newest warnings and errors, oldest first; empty if the logger is not ours
pub fn recent_problems(limit: usize) -> Vec<LogEntry> {
    LOGGER
        .get()
        .map(|logger| logger.recent_at_least(Level::Warn, limit))
        .unwrap_or_default()
}

//! Rolling Logger
//!
//! A `log` backend that keeps the newest entries in a fixed-size circular
//! buffer and forwards every accepted record to a sink (stdout, the browser
//! console, ...).

use std::collections::VecDeque;
use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

pub const DEFAULT_CAPACITY: usize = 200;

/// One captured record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Monotonic sequence number, starting at 0
    pub seq: u64,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {} {}", self.level, self.target, self.message)
    }
}

pub type Sink = Box<dyn Fn(&LogEntry) + Send + Sync>;

struct Buffer {
    entries: VecDeque<LogEntry>,
    next_seq: u64,
}

pub struct RollingLogger {
    level: LevelFilter,
    capacity: usize,
    buffer: Mutex<Buffer>,
    sink: Option<Sink>,
}

impl RollingLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        Self {
            level,
            capacity: capacity.max(1),
            buffer: Mutex::new(Buffer { entries: VecDeque::new(), next_seq: 0 }),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: impl Fn(&LogEntry) + Send + Sync + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Register as the global logger; the logger lives for the rest of the program
    pub fn install(self) -> Result<&'static RollingLogger, SetLoggerError> {
        let level = self.level;
        let logger: &'static RollingLogger = Box::leak(Box::new(self));
        log::set_logger(logger)?;
        log::set_max_level(level);
        Ok(logger)
    }

    /// Oldest first
    pub fn recent(&self) -> Vec<LogEntry> {
        match self.buffer.lock() {
            Ok(buffer) => buffer.entries.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().entries.iter().cloned().collect(),
        }
    }

    /// The newest `limit` entries at `level` or more severe, oldest first
    pub fn recent_at_least(&self, level: Level, limit: usize) -> Vec<LogEntry> {
        let mut entries: Vec<LogEntry> = self.recent().into_iter().filter(|e| e.level <= level).collect();
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
        entries
    }

    fn push(&self, level: Level, target: &str, message: String) -> LogEntry {
        let mut buffer = match self.buffer.lock() {
            Ok(buffer) => buffer,
            Err(poisoned) => poisoned.into_inner(),
        };
        let entry = LogEntry {
            seq: buffer.next_seq,
            level,
            target: target.to_string(),
            message,
        };
        buffer.next_seq += 1;
        if buffer.entries.len() == self.capacity {
            buffer.entries.pop_front();
        }
        buffer.entries.push_back(entry.clone());
        entry
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = self.push(record.level(), record.target(), record.args().to_string());
        if let Some(sink) = &self.sink {
            sink(&entry);
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(logger: &RollingLogger, level: Level, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("test")
                .args(format_args!("{}", message))
                .build(),
        );
    }

    #[test]
    fn test_keeps_newest_entries() {
        let logger = RollingLogger::new(LevelFilter::Trace, 3);
        for i in 0..5 {
            record(&logger, Level::Info, &format!("msg {}", i));
        }

        let recent = logger.recent();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].message, "msg 2");
        assert_eq!(recent[0].seq, 2);
        assert_eq!(recent[2].message, "msg 4");
    }

    #[test]
    fn test_filters_by_level() {
        let logger = RollingLogger::new(LevelFilter::Warn, 10);
        record(&logger, Level::Debug, "noise");
        record(&logger, Level::Error, "boom");

        let recent = logger.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].level, Level::Error);
    }

    #[test]
    fn test_recent_at_least_keeps_newest_severe_entries() {
        let logger = RollingLogger::new(LevelFilter::Debug, 10);
        record(&logger, Level::Warn, "first");
        record(&logger, Level::Info, "chatter");
        record(&logger, Level::Error, "second");
        record(&logger, Level::Warn, "third");

        let messages: Vec<_> = logger
            .recent_at_least(Level::Warn, 2)
            .into_iter()
            .map(|e| e.message)
            .collect();
        assert_eq!(messages, vec!["second", "third"]);
        assert!(logger.recent_at_least(Level::Error, 0).is_empty());
    }

    #[test]
    fn test_sink_receives_accepted_records() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let logger = RollingLogger::new(LevelFilter::Info, 10)
            .with_sink(move |entry| captured.lock().unwrap().push(entry.to_string()));

        record(&logger, Level::Trace, "hidden");
        record(&logger, Level::Warn, "careful");

        assert_eq!(*seen.lock().unwrap(), vec!["[WARN] test careful".to_string()]);
    }
}

//! Caller-supplied structured logging.
//!
//! The builder, the engine and the post-processing dispatcher never log
//! through global state of their own. They receive an
//! `Arc<dyn SimulationLogger>` and emit named events with key/value fields.
//! [`LogFacade`] forwards those events to the `log` crate, so an application
//! that installs `env_logger` sees them like any other log line.

use log::Level;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Sink for structured simulation events
pub trait SimulationLogger: Send + Sync {
    fn log(&self, level: Level, event: &str, fields: &[(&str, &dyn fmt::Display)]);

    fn debug(&self, event: &str, fields: &[(&str, &dyn fmt::Display)]) {
        self.log(Level::Debug, event, fields);
    }

    fn info(&self, event: &str, fields: &[(&str, &dyn fmt::Display)]) {
        self.log(Level::Info, event, fields);
    }

    fn warn(&self, event: &str, fields: &[(&str, &dyn fmt::Display)]) {
        self.log(Level::Warn, event, fields);
    }

    fn error(&self, event: &str, fields: &[(&str, &dyn fmt::Display)]) {
        self.log(Level::Error, event, fields);
    }
}

/// Forwards events to the `log` crate under a fixed target
#[derive(Debug, Clone)]
pub struct LogFacade {
    target: &'static str,
}

impl LogFacade {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    /// Shared handle, ready to pass to a builder
    pub fn shared() -> Arc<dyn SimulationLogger> {
        Arc::new(Self::default())
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        Self::new("hsim")
    }
}

impl SimulationLogger for LogFacade {
    fn log(&self, level: Level, event: &str, fields: &[(&str, &dyn fmt::Display)]) {
        if !log::log_enabled!(target: self.target, level) {
            return;
        }
        let rendered = fields
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        log::log!(target: self.target, level, "{event} {rendered}");
    }
}

/// One captured event
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub event: String,
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything logged so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Records with the given event name, in emission order
    pub fn events_named(&self, event: &str) -> Vec<LogRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.event == event)
            .collect()
    }
}

impl SimulationLogger for MemoryLogger {
    fn log(&self, level: Level, event: &str, fields: &[(&str, &dyn fmt::Display)]) {
        let record = LogRecord {
            level,
            event: event.to_string(),
            fields: fields
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        };
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
    }
}

//! The unit of data every writer, filter, formatter and serializer works on.

use crate::level::Level;
use chrono::{DateTime, Local};

/// Everything a writer needs to render one line.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Full dotted name of the logger the event was issued on; `""` is the root.
    pub logger: String,
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Local>,
    /// Name of the issuing thread, when it has one.
    pub thread: Option<String>,
}

impl LogEvent {
    #[must_use]
    pub fn new(logger: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
            level,
            message: message.into(),
            timestamp: Local::now(),
            thread: std::thread::current().name().map(ToString::to_string),
        }
    }

    /// The root logger's empty name reads badly in output.
    #[must_use]
    pub fn logger_display(&self) -> &str {
        if self.logger.is_empty() {
            "<root>"
        } else {
            &self.logger
        }
    }
}

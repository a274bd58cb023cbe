//! The library's own status channel: a detached logger writing to stderr.
//!
//! Uses `OnceLock` so the logger is installed exactly once, even if several entry
//! points (CLI, embedders, tests) race to call `init`. Before `init`, every call here
//! is a no-op.

use crate::fmt::PatternFormatter;
use crate::level::Level;
use crate::logger::{LogEvent, Logger};
use crate::writer::{ConsoleWriter, Stream};
use std::sync::{Arc, OnceLock};

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

/// `%c` carries the scope passed to each call.
const STATUS_PATTERN: &str = "[loomlog] %p %c: %m%n";

/// Installs the status logger at `level`. Only the first call has any effect.
pub fn init(level: Level) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| build_internal_logger(level));
    if !was_init {
        debug("INTERNAL", &format!("Status logger ready at {level}"));
    }
}

#[must_use]
pub fn is_initialized() -> bool {
    INTERNAL_LOGGER.get().is_some()
}

fn build_internal_logger(level: Level) -> Logger {
    let logger = Logger::detached("loomlog");
    logger.set_level(level);
    logger.add_writer(Arc::new(ConsoleWriter::new(
        "loomlog-status",
        Box::new(PatternFormatter::new(STATUS_PATTERN)),
        Vec::new(),
        Stream::Stderr,
    )));
    logger
}

fn log(level: Level, scope: &str, msg: &str) {
    let Some(logger) = INTERNAL_LOGGER.get() else {
        return;
    };
    if !logger.is_enabled(level) {
        return;
    }
    let event = LogEvent::new(scope, level, msg);
    for writer in logger.writers() {
        // Nowhere left to report a failing stderr.
        let _ = writer.write(&event);
    }
}

pub fn trace(scope: &str, msg: &str) {
    log(Level::Trace, scope, msg);
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

/// Status warnings, e.g. a configuration value that was adjusted.
pub fn warn(scope: &str, msg: &str) {
    log(Level::Warn, scope, msg);
}

pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}

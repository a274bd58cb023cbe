//! Named, hierarchical loggers. A logger fans each event out to its own writers and,
//! while `writes_to_ancestors` holds, to every ancestor's writers as well.

mod event;
mod registry;

pub use event::LogEvent;
pub use registry::{LoggerRegistry, ROOT_LOGGER};

use crate::internal;
use crate::level::Level;
use crate::writer::Writer;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Clone)]
struct LoggerState {
    level: Option<Level>,
    writers: Vec<Arc<dyn Writer>>,
    writes_to_ancestors: bool,
}

impl Default for LoggerState {
    fn default() -> Self {
        Self {
            level: None,
            writers: Vec::new(),
            writes_to_ancestors: true,
        }
    }
}

/// Identity is the name; loggers are retrieved-or-created through a [`LoggerRegistry`], never built directly.
pub struct Logger {
    name: String,
    parent: Option<Arc<Logger>>,
    state: RwLock<LoggerState>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &state.level)
            .field("writers", &state.writers.len())
            .field("writes_to_ancestors", &state.writes_to_ancestors)
            .finish()
    }
}

impl Logger {
    pub(crate) fn new(name: impl Into<String>, parent: Option<Arc<Self>>) -> Self {
        Self {
            name: name.into(),
            parent,
            state: RwLock::new(LoggerState::default()),
        }
    }

    /// A logger outside any registry, used for the library's own status channel.
    #[must_use]
    pub fn detached(name: impl Into<String>) -> Self {
        Self::new(name, None)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, LoggerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, LoggerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.parent.as_ref()
    }

    /// The level set on this logger itself, if any.
    #[must_use]
    pub fn level(&self) -> Option<Level> {
        self.read().level
    }

    /// Nearest level up the ancestor chain; the root falls back to `Info`.
    #[must_use]
    pub fn effective_level(&self) -> Level {
        if let Some(level) = self.level() {
            return level;
        }
        self.parent
            .as_ref()
            .map_or_else(Level::default, |parent| parent.effective_level())
    }

    pub fn set_level(&self, level: Level) {
        self.write_state().level = Some(level);
    }

    pub fn add_writer(&self, writer: Arc<dyn Writer>) {
        self.write_state().writers.push(writer);
    }

    #[must_use]
    pub fn writers(&self) -> Vec<Arc<dyn Writer>> {
        self.read().writers.clone()
    }

    #[must_use]
    pub fn writes_to_ancestors(&self) -> bool {
        self.read().writes_to_ancestors
    }

    pub fn set_writes_to_ancestors(&self, value: bool) {
        self.write_state().writes_to_ancestors = value;
    }

    /// Back to the state of a freshly created logger.
    pub fn reset(&self) {
        *self.write_state() = LoggerState::default();
    }

    /// Adopts another logger's configuration wholesale; existing handles to `self` see the change.
    pub(crate) fn replace_state_from(&self, other: &Self) {
        let staged = other.read().clone();
        *self.write_state() = staged;
    }

    #[must_use]
    pub fn is_enabled(&self, level: Level) -> bool {
        level != Level::Off && level >= self.effective_level()
    }

    /// Filters by effective level, then walks the ancestor chain.
    pub fn log(&self, level: Level, msg: &str) {
        if !self.is_enabled(level) {
            return;
        }

        let event = LogEvent::new(&self.name, level, msg);
        let mut current = Some(self);
        while let Some(logger) = current {
            let (writers, up) = {
                let state = logger.read();
                (state.writers.clone(), state.writes_to_ancestors)
            };
            for writer in &writers {
                if let Err(e) = writer.write(&event) {
                    internal::warn("LOGGER", &format!("Writer '{}' failed: {e}", writer.name()));
                }
            }
            if !up {
                break;
            }
            current = logger.parent.as_deref();
        }
    }

    pub fn trace(&self, msg: &str) {
        self.log(Level::Trace, msg);
    }

    pub fn debug(&self, msg: &str) {
        self.log(Level::Debug, msg);
    }

    pub fn info(&self, msg: &str) {
        self.log(Level::Info, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.log(Level::Warn, msg);
    }

    pub fn error(&self, msg: &str) {
        self.log(Level::Error, msg);
    }

    pub fn fatal(&self, msg: &str) {
        self.log(Level::Fatal, msg);
    }

    /// Buffered writers may lose tail data on abrupt exit without an explicit flush.
    ///
    /// # Errors
    /// Returns the first I/O error encountered across this logger's writers.
    pub fn flush(&self) -> crate::Result<()> {
        for writer in self.writers() {
            writer.flush()?;
        }
        Ok(())
    }
}

use crate::internal;
use crate::level::Level;

/// One non-fatal observation made while building, e.g. a clamped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub level: Level,
    pub origin: String,
    pub message: String,
}

impl std::fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.level, self.origin, self.message)
    }
}

/// Per-run status channel. Entries are also echoed to the internal logger.
#[derive(Debug, Clone, Default)]
pub struct StatusLog {
    entries: Vec<StatusEntry>,
}

impl StatusLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, origin: &str, message: impl Into<String>) {
        self.push(Level::Info, origin, message.into());
    }

    pub fn warn(&mut self, origin: &str, message: impl Into<String>) {
        self.push(Level::Warn, origin, message.into());
    }

    fn push(&mut self, level: Level, origin: &str, message: String) {
        match level {
            Level::Warn => internal::warn(origin, &message),
            _ => internal::info(origin, &message),
        }
        self.entries.push(StatusEntry {
            level,
            origin: origin.to_string(),
            message,
        });
    }

    #[must_use]
    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    #[must_use]
    pub fn warnings(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| e.level >= Level::Warn)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn into_entries(self) -> Vec<StatusEntry> {
        self.entries
    }
}

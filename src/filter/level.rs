use super::{Filter, FilterResult};
use crate::level::Level;
use crate::logger::LogEvent;

/// Denies everything below `level`, stays neutral otherwise.
#[derive(Debug, Clone)]
pub struct LevelThresholdFilter {
    name: String,
    level: Level,
}

impl LevelThresholdFilter {
    #[must_use]
    pub fn new(name: impl Into<String>, level: Level) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }

    #[must_use]
    pub const fn level(&self) -> Level {
        self.level
    }
}

impl Filter for LevelThresholdFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, event: &LogEvent) -> FilterResult {
        if event.level < self.level {
            FilterResult::Deny
        } else {
            FilterResult::Neutral
        }
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Matches one exact level.
#[derive(Debug, Clone)]
pub struct LevelFilter {
    name: String,
    level: Level,
    on_match: FilterResult,
    on_mismatch: FilterResult,
}

impl LevelFilter {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        level: Level,
        on_match: FilterResult,
        on_mismatch: FilterResult,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            on_match,
            on_mismatch,
        }
    }
}

impl Filter for LevelFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, event: &LogEvent) -> FilterResult {
        if event.level == self.level {
            self.on_match
        } else {
            self.on_mismatch
        }
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

use super::{Filter, FilterResult};
use crate::logger::LogEvent;
use regex::Regex;

/// Matches the event message against a compiled expression.
#[derive(Debug, Clone)]
pub struct RegexFilter {
    name: String,
    regex: Regex,
    on_match: FilterResult,
    on_mismatch: FilterResult,
}

impl RegexFilter {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        regex: Regex,
        on_match: FilterResult,
        on_mismatch: FilterResult,
    ) -> Self {
        Self {
            name: name.into(),
            regex,
            on_match,
            on_mismatch,
        }
    }

    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl Filter for RegexFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, event: &LogEvent) -> FilterResult {
        if self.regex.is_match(&event.message) {
            self.on_match
        } else {
            self.on_mismatch
        }
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

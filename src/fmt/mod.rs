//! Turning an event into text. Writers own exactly one formatter each.

mod json;
mod pattern;

pub use json::{JsonFormatter, TimeZone};
pub use pattern::{PatternFormatter, PatternSegment, PatternToken};

use crate::logger::LogEvent;

/// `Send + Sync` because writers are shared between threads.
pub trait Formatter: Send + Sync {
    fn format(&self, event: &LogEvent) -> String;

    /// The pattern text, for formatters that are driven by one.
    fn pattern(&self) -> Option<&str> {
        None
    }

    fn type_name(&self) -> &'static str;
}

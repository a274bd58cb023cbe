//! Per-writer event filters, evaluated in configuration order.

mod duplicate;
mod level;
mod message;

pub use duplicate::DuplicateMessageFilter;
pub use level::{LevelFilter, LevelThresholdFilter};
pub use message::RegexFilter;

use crate::error::Error;
use crate::logger::LogEvent;
use crate::writer::Writer;
use std::str::FromStr;
use std::sync::{Arc, Weak};

/// Outcome of one filter; the first non-neutral result decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterResult {
    Deny,
    Neutral,
    Accept,
}

impl FromStr for FilterResult {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deny" => Ok(Self::Deny),
            "neutral" => Ok(Self::Neutral),
            "accept" => Ok(Self::Accept),
            _ => Err(Error::invalid(
                "filter_result",
                s,
                "expected accept, deny or neutral",
            )),
        }
    }
}

pub trait Filter: Send + Sync {
    fn name(&self) -> &str;

    fn evaluate(&self, event: &LogEvent) -> FilterResult;

    /// Filters that write through their owning writer expose that capability here.
    fn as_writeable(&self) -> Option<&dyn WriteableFilter> {
        None
    }

    fn type_name(&self) -> &'static str;
}

/// A filter holding a back-reference to the writer that owns it. The reference is
/// patched in after the writer exists, so it is weak and set at most once.
pub trait WriteableFilter {
    fn set_writer(&self, writer: Weak<dyn Writer>);

    fn writer(&self) -> Option<Arc<dyn Writer>>;
}

/// Neutral-only chains accept.
#[must_use]
pub fn permits(filters: &[Box<dyn Filter>], event: &LogEvent) -> bool {
    for filter in filters {
        match filter.evaluate(event) {
            FilterResult::Accept => return true,
            FilterResult::Deny => return false,
            FilterResult::Neutral => {}
        }
    }
    true
}

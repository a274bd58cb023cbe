//! Collapses runs of identical messages into one line plus a repeat count.
//!
//! The summary line has to go out through the writer that owns this filter, which
//! doesn't exist yet when the filter is built, so the filter is a [`WriteableFilter`].

use super::{Filter, FilterResult, WriteableFilter};
use crate::internal;
use crate::logger::LogEvent;
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

#[derive(Default)]
struct Run {
    last: Option<LogEvent>,
    repeats: usize,
}

pub struct DuplicateMessageFilter {
    name: String,
    writer: OnceLock<Weak<dyn crate::writer::Writer>>,
    run: Mutex<Run>,
}

impl std::fmt::Debug for DuplicateMessageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuplicateMessageFilter")
            .field("name", &self.name)
            .field("bound", &self.writer.get().is_some())
            .finish_non_exhaustive()
    }
}

impl DuplicateMessageFilter {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            writer: OnceLock::new(),
            run: Mutex::new(Run::default()),
        }
    }
}

impl Filter for DuplicateMessageFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, event: &LogEvent) -> FilterResult {
        let summary = {
            let mut run = self.run.lock().unwrap_or_else(PoisonError::into_inner);
            let same = run
                .last
                .as_ref()
                .is_some_and(|last| last.message == event.message && last.level == event.level);
            if same {
                run.repeats += 1;
                return FilterResult::Deny;
            }
            let repeats = std::mem::take(&mut run.repeats);
            let previous = run.last.replace(event.clone());
            previous.filter(|_| repeats > 0).map(|prev| {
                LogEvent::new(
                    prev.logger,
                    prev.level,
                    format!("The previous message was repeated {repeats} times"),
                )
            })
        };

        // Lock released: the owning writer may re-enter this filter's writer path
        if let Some(summary) = summary
            && let Some(writer) = self.writer()
            && let Err(e) = writer.write_through(&summary)
        {
            internal::warn("FILTER", &format!("Repeat summary not written: {e}"));
        }
        FilterResult::Neutral
    }

    fn as_writeable(&self) -> Option<&dyn WriteableFilter> {
        Some(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl WriteableFilter for DuplicateMessageFilter {
    fn set_writer(&self, writer: Weak<dyn crate::writer::Writer>) {
        if self.writer.set(writer).is_err() {
            internal::warn(
                "FILTER",
                &format!("{} is already bound to a writer", self.name),
            );
        }
    }

    fn writer(&self) -> Option<Arc<dyn crate::writer::Writer>> {
        self.writer.get().and_then(Weak::upgrade)
    }
}

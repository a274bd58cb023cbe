//! Writers are the sinks loggers fan events out to. Every writer owns one formatter
//! and an ordered list of filters; the `Writer` trait lets embedders add their own.

mod console;
mod file;
mod queue;
mod rolling;

pub use console::{ConsoleWriter, Stream};
pub use file::{FileSink, FileWriter, OnStart};
pub use queue::{QueueHub, QueueMessage, QueueWriter};
pub use rolling::RollingFileWriter;

use crate::error::Result;
use crate::filter::{Filter, permits};
use crate::fmt::Formatter;
use crate::logger::LogEvent;

/// `Send + Sync` bounds let one writer serve loggers on every thread.
pub trait Writer: Send + Sync {
    fn name(&self) -> &str;

    fn formatter(&self) -> &dyn Formatter;

    fn filters(&self) -> &[Box<dyn Filter>];

    /// Emits the event without consulting filters.
    ///
    /// # Errors
    /// I/O or serialization errors from the underlying sink.
    fn write_through(&self, event: &LogEvent) -> Result<()>;

    /// # Errors
    /// I/O errors from the underlying sink.
    fn flush(&self) -> Result<()>;

    fn type_name(&self) -> &'static str;

    /// Filter chain first, then the sink.
    ///
    /// # Errors
    /// See [`Self::write_through`].
    fn write(&self, event: &LogEvent) -> Result<()> {
        if permits(self.filters(), event) {
            self.write_through(event)
        } else {
            Ok(())
        }
    }
}

/// The parts every writer shares; concrete writers embed one.
pub struct WriterCore {
    name: String,
    formatter: Box<dyn Formatter>,
    filters: Vec<Box<dyn Filter>>,
}

impl WriterCore {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        formatter: Box<dyn Formatter>,
        filters: Vec<Box<dyn Filter>>,
    ) -> Self {
        Self {
            name: name.into(),
            formatter,
            filters,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    #[must_use]
    pub fn filters(&self) -> &[Box<dyn Filter>] {
        &self.filters
    }

    #[must_use]
    pub fn format(&self, event: &LogEvent) -> String {
        self.formatter.format(event)
    }
}

impl std::fmt::Debug for WriterCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterCore")
            .field("name", &self.name)
            .field("formatter", &self.formatter.type_name())
            .field(
                "filters",
                &self.filters.iter().map(|x| x.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

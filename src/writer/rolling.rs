use super::{FileSink, Writer, WriterCore};
use crate::error::Result;
use crate::filter::Filter;
use crate::fmt::Formatter;
use crate::logger::LogEvent;
use crate::roll::{FileRollTrigger, FileRoller};

/// A file writer that retires its file whenever the trigger fires.
pub struct RollingFileWriter {
    core: WriterCore,
    sink: FileSink,
    roller: Box<dyn FileRoller>,
    /// `None` when the roller is its own trigger.
    trigger: Option<Box<dyn FileRollTrigger>>,
}

impl std::fmt::Debug for RollingFileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollingFileWriter")
            .field("core", &self.core)
            .field("sink", &self.sink)
            .field("roller", &self.roller.type_name())
            .field("trigger", &self.trigger().map(|t| t.type_name()))
            .finish()
    }
}

impl RollingFileWriter {
    /// Callers guarantee a trigger exists: either `trigger` or `roller.as_trigger()`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        formatter: Box<dyn Formatter>,
        filters: Vec<Box<dyn Filter>>,
        sink: FileSink,
        roller: Box<dyn FileRoller>,
        trigger: Option<Box<dyn FileRollTrigger>>,
    ) -> Self {
        Self {
            core: WriterCore::new(name, formatter, filters),
            sink,
            roller,
            trigger,
        }
    }

    #[must_use]
    pub fn sink(&self) -> &FileSink {
        &self.sink
    }

    #[must_use]
    pub fn roller(&self) -> &dyn FileRoller {
        self.roller.as_ref()
    }

    #[must_use]
    pub fn trigger(&self) -> Option<&dyn FileRollTrigger> {
        self.trigger.as_deref().or_else(|| self.roller.as_trigger())
    }
}

impl Writer for RollingFileWriter {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn formatter(&self) -> &dyn Formatter {
        self.core.formatter()
    }

    fn filters(&self) -> &[Box<dyn Filter>] {
        self.core.filters()
    }

    fn write_through(&self, event: &LogEvent) -> Result<()> {
        let text = self.core.format(event);
        self.sink.write_rolling(
            &text,
            |active| {
                self.trigger()
                    .is_some_and(|trigger| trigger.is_triggered(active, event))
            },
            |active| self.roller.roll(active),
        )
    }

    fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

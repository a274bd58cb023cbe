//! Writes to stdout or stderr.

use super::{Writer, WriterCore};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::fmt::Formatter;
use crate::logger::LogEvent;
use std::io::{self, Write};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stream {
    #[default]
    Stdout,
    Stderr,
}

impl FromStr for Stream {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stdout" | "cout" => Ok(Self::Stdout),
            "stderr" | "cerr" => Ok(Self::Stderr),
            _ => Err(Error::invalid(
                "console_writer::stream",
                s,
                "expected stdout or stderr",
            )),
        }
    }
}

#[derive(Debug)]
pub struct ConsoleWriter {
    core: WriterCore,
    stream: Stream,
}

impl ConsoleWriter {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        formatter: Box<dyn Formatter>,
        filters: Vec<Box<dyn Filter>>,
        stream: Stream,
    ) -> Self {
        Self {
            core: WriterCore::new(name, formatter, filters),
            stream,
        }
    }

    #[must_use]
    pub const fn stream(&self) -> Stream {
        self.stream
    }
}

impl Writer for ConsoleWriter {
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
        // Locking once keeps the whole line contiguous under concurrent writers
        match self.stream {
            Stream::Stdout => io::stdout().lock().write_all(text.as_bytes())?,
            Stream::Stderr => io::stderr().lock().write_all(text.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().flush()?,
            Stream::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

//! Plain file output. The file is opened lazily on the first write so that building a
//! writer never touches the filesystem.

use super::{Writer, WriterCore};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::fmt::Formatter;
use crate::internal;
use crate::logger::LogEvent;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What to do with an existing file the first time it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnStart {
    #[default]
    Append,
    Truncate,
}

impl FromStr for OnStart {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "truncate" => Ok(Self::Truncate),
            _ => Err(Error::invalid(
                "file_writer::on_start",
                s,
                "expected append or truncate",
            )),
        }
    }
}

#[derive(Default)]
struct SinkState {
    file: Option<BufWriter<File>>,
    opened_before: bool,
}

/// The open-on-demand file handle shared by the file and rolling file writers.
pub struct FileSink {
    path: PathBuf,
    on_start: OnStart,
    flush: bool,
    state: Mutex<SinkState>,
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("on_start", &self.on_start)
            .field("flush", &self.flush)
            .finish_non_exhaustive()
    }
}

impl FileSink {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, on_start: OnStart, flush: bool) -> Self {
        Self {
            path: path.into(),
            on_start,
            flush,
            state: Mutex::new(SinkState::default()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn on_start(&self) -> OnStart {
        self.on_start
    }

    #[must_use]
    pub const fn flushes(&self) -> bool {
        self.flush
    }

    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Only the very first open honors `on_start`; reopening after a roll always appends.
    fn open(&self, state: &mut SinkState) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
            internal::debug("FILE", &format!("Created directory: {}", parent.display()));
        }

        let truncate = !state.opened_before && self.on_start == OnStart::Truncate;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!truncate)
            .truncate(truncate)
            .open(&self.path)?;
        internal::trace("FILE", &format!("Opened {}", self.path.display()));
        state.file = Some(BufWriter::new(file));
        state.opened_before = true;
        Ok(())
    }

    fn append(&self, state: &mut SinkState, text: &str) -> Result<()> {
        if state.file.is_none() {
            self.open(state)?;
        }
        if let Some(file) = state.file.as_mut() {
            file.write_all(text.as_bytes())?;
            if self.flush {
                file.flush()?;
            }
        }
        Ok(())
    }

    /// # Errors
    /// I/O errors opening or writing the file.
    pub fn write(&self, text: &str) -> Result<()> {
        let mut state = self.lock();
        self.append(&mut state, text)
    }

    /// Checks `should_roll` and runs `roll` with the file closed, all under one lock so
    /// no other write can land between the check and the roll.
    ///
    /// # Errors
    /// Errors from `roll`, or I/O errors reopening and writing the file.
    pub fn write_rolling<C, R>(&self, text: &str, should_roll: C, roll: R) -> Result<()>
    where
        C: FnOnce(&Path) -> bool,
        R: FnOnce(&Path) -> Result<()>,
    {
        let mut state = self.lock();
        // Buffered bytes must be on disk before a size check looks at the file
        if let Some(file) = state.file.as_mut() {
            file.flush()?;
        }
        if should_roll(&self.path) {
            state.file = None;
            roll(&self.path)?;
            internal::debug("FILE", &format!("Rolled {}", self.path.display()));
        }
        self.append(&mut state, text)
    }

    /// # Errors
    /// I/O errors flushing buffered output.
    pub fn flush(&self) -> Result<()> {
        if let Some(file) = self.lock().file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileWriter {
    core: WriterCore,
    sink: FileSink,
}

impl FileWriter {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        formatter: Box<dyn Formatter>,
        filters: Vec<Box<dyn Filter>>,
        sink: FileSink,
    ) -> Self {
        Self {
            core: WriterCore::new(name, formatter, filters),
            sink,
        }
    }

    #[must_use]
    pub fn sink(&self) -> &FileSink {
        &self.sink
    }
}

impl Writer for FileWriter {
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
        self.sink.write(&self.core.format(event))
    }

    fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

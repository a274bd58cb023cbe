//! Field groups shared by several mementos. A memento embeds the group, implements
//! the matching `With*` accessor trait, and lets the group register its handlers.

use super::{Component, HandlerTable, KeySet, Slot};
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::fmt::Formatter;
use crate::internal;
use crate::security::{NAME_TEXT_MAX, PATH_TEXT_MAX, SecurityPolicy, TOKEN_TEXT_MAX};
use crate::writer::{FileSink, OnStart};

fn default_name<T>() -> String {
    std::any::type_name::<T>().to_string()
}

fn checked_name(owner: &str, name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(Error::required(owner, "name"));
    }
    Ok(name)
}

pub trait WithWriterBase {
    fn writer_base(&mut self) -> &mut WriterBase;
}

/// Everything a finished writer needs from [`WriterBase`].
pub struct WriterParts {
    pub name: String,
    pub formatter: Box<dyn Formatter>,
    pub filters: Vec<Box<dyn Filter>>,
}

/// Name, formatter and filter list common to all writers.
pub struct WriterBase {
    name: String,
    formatter: Slot<Box<dyn Formatter>>,
    filters: Vec<Box<dyn Filter>>,
}

impl std::fmt::Debug for WriterBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterBase")
            .field("name", &self.name)
            .field("formatter", &self.formatter.is_filled())
            .field("filters", &self.filters.len())
            .finish()
    }
}

impl WriterBase {
    pub const NAME_KEY: &'static str = "writer::name";

    /// `T` is the writer type being built; its type name is the default writer name.
    pub fn new<T>(policy: &mut SecurityPolicy) -> Self {
        policy.set_text(Self::NAME_KEY, NAME_TEXT_MAX);
        Self {
            name: default_name::<T>(),
            formatter: Slot::new("formatter"),
            filters: Vec::new(),
        }
    }

    pub fn register<M: WithWriterBase>(table: &mut HandlerTable<M>) {
        table.register_handler("name", |m, policy, value| {
            m.writer_base().name = policy.text(Self::NAME_KEY, value)?;
            Ok(())
        });
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keeps formatters and filters, hands anything else back to the caller.
    pub fn offer(&mut self, component: Component) -> Option<Component> {
        match component {
            Component::Formatter(formatter) => {
                if self.formatter.fill(formatter) {
                    internal::debug("MEMENTO", &format!("{}: formatter replaced", self.name));
                }
                None
            }
            Component::Filter(filter) => {
                self.filters.push(filter);
                None
            }
            other => Some(other),
        }
    }

    /// # Errors
    /// `RequiredField` for a missing formatter or an empty name.
    pub fn finish(&mut self, owner: &str) -> Result<WriterParts> {
        let formatter = self.formatter.require(owner)?;
        let name = checked_name(owner, std::mem::take(&mut self.name))?;
        Ok(WriterParts {
            name,
            formatter,
            filters: std::mem::take(&mut self.filters),
        })
    }
}

pub trait WithFilterBase {
    fn filter_base(&mut self) -> &mut FilterBase;
}

#[derive(Debug)]
pub struct FilterBase {
    name: String,
}

impl FilterBase {
    pub const NAME_KEY: &'static str = "filter::name";

    pub fn new<T>(policy: &mut SecurityPolicy) -> Self {
        policy.set_text(Self::NAME_KEY, NAME_TEXT_MAX);
        Self {
            name: default_name::<T>(),
        }
    }

    pub fn register<M: WithFilterBase>(table: &mut HandlerTable<M>) {
        table.register_handler("name", |m, policy, value| {
            m.filter_base().name = policy.text(Self::NAME_KEY, value)?;
            Ok(())
        });
    }

    /// # Errors
    /// `RequiredField` when the name ended up empty.
    pub fn finish(&mut self, owner: &str) -> Result<String> {
        checked_name(owner, std::mem::take(&mut self.name))
    }
}

pub trait WithFileBase {
    fn file_base(&mut self) -> &mut FileBase;
}

/// File name, start mode and flush policy shared by the plain and rolling file writers.
#[derive(Debug)]
pub struct FileBase {
    file_name: Option<String>,
    on_start: OnStart,
    flush: bool,
}

impl FileBase {
    pub const FILE_NAME_KEY: &'static str = "file_writer::file_name";
    pub const ON_START_KEY: &'static str = "file_writer::on_start";
    pub const FLUSH_KEY: &'static str = "file_writer::flush";
    pub const APPEND_KEY: &'static str = "file_writer::append";

    pub fn new(policy: &mut SecurityPolicy) -> Self {
        policy.set_text(Self::FILE_NAME_KEY, PATH_TEXT_MAX);
        policy.set_text(Self::ON_START_KEY, TOKEN_TEXT_MAX);
        policy.set_boolean(Self::FLUSH_KEY);
        policy.set_boolean(Self::APPEND_KEY);
        Self {
            file_name: None,
            on_start: OnStart::Append,
            flush: true,
        }
    }

    /// The legacy key set spells the same fields differently and expresses the start
    /// mode as an `Append` boolean.
    pub fn register<M: WithFileBase>(table: &mut HandlerTable<M>, key_set: KeySet) {
        let (file_name, flush) = match key_set {
            KeySet::Native => ("file_name", "flush"),
            KeySet::Legacy => ("File", "ImmediateFlush"),
        };
        table.register_handler(file_name, |m, policy, value| {
            m.file_base().file_name = Some(policy.text(Self::FILE_NAME_KEY, value)?);
            Ok(())
        });
        table.register_handler(flush, |m, policy, value| {
            m.file_base().flush = policy.boolean(Self::FLUSH_KEY, value)?;
            Ok(())
        });
        match key_set {
            KeySet::Native => table.register_handler("on_start", |m, policy, value| {
                m.file_base().on_start = policy.validate_text(Self::ON_START_KEY, value)?.parse()?;
                Ok(())
            }),
            KeySet::Legacy => table.register_handler("Append", |m, policy, value| {
                m.file_base().on_start = if policy.boolean(Self::APPEND_KEY, value)? {
                    OnStart::Append
                } else {
                    OnStart::Truncate
                };
                Ok(())
            }),
        }
    }

    #[must_use]
    pub const fn on_start(&self) -> OnStart {
        self.on_start
    }

    /// Builds the (still unopened) sink; `~` in the file name is expanded here.
    ///
    /// # Errors
    /// `RequiredField` when no file name was configured.
    pub fn finish(&mut self, owner: &str) -> Result<FileSink> {
        let file_name = self
            .file_name
            .take()
            .ok_or_else(|| Error::required(owner, "file_name"))?;
        let path = shellexpand::tilde(&file_name).into_owned();
        Ok(FileSink::new(path, self.on_start, self.flush))
    }
}

//! The accumulation half of the two-phase build.
//!
//! A memento collects one configuration block's scalars (through a table of named
//! handlers) and its already-built sub-objects (through [`Memento::accept_subobject`]),
//! in document order. Its paired factory consumes it exactly once.

mod mixins;
mod slot;

pub use mixins::{FileBase, FilterBase, WithFileBase, WithFilterBase, WithWriterBase, WriterBase, WriterParts};
pub use slot::Slot;

use crate::compress::FileCompressor;
use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::fmt::Formatter;
use crate::internal;
use crate::logger::Logger;
use crate::roll::{FileRollTrigger, FileRoller};
use crate::security::SecurityPolicy;
use crate::serialize::Serializer;
use crate::writer::Writer;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Which key names (and boolean senses) memento handlers register under.
/// Chosen once per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeySet {
    #[default]
    Native,
    /// The previous logging tool's configuration key names.
    Legacy,
}

impl FromStr for KeySet {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "legacy" => Ok(Self::Legacy),
            _ => Err(Error::invalid("key_set", s, "expected native or legacy")),
        }
    }
}

/// What a built sub-object can be used as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Formatter,
    Filter,
    Compressor,
    Serializer,
    Roller,
    Trigger,
    Writer,
    Logger,
}

impl Capability {
    /// Order in which a parent offers a sub-object to its slots.
    pub const PRIORITY: [Self; 8] = [
        Self::Formatter,
        Self::Filter,
        Self::Compressor,
        Self::Serializer,
        Self::Roller,
        Self::Trigger,
        Self::Writer,
        Self::Logger,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Formatter => "formatter",
            Self::Filter => "filter",
            Self::Compressor => "compressor",
            Self::Serializer => "serializer",
            Self::Roller => "roller",
            Self::Trigger => "trigger",
            Self::Writer => "writer",
            Self::Logger => "logger",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished configurable, tagged by capability. Owned sub-objects are boxed and move
/// into their parent; shareable ones (compressors, writers, loggers) are `Arc`s.
pub enum Component {
    Formatter(Box<dyn Formatter>),
    Filter(Box<dyn Filter>),
    Compressor(Arc<dyn FileCompressor>),
    Serializer(Box<dyn Serializer>),
    Roller(Box<dyn FileRoller>),
    Trigger(Box<dyn FileRollTrigger>),
    Writer(Arc<dyn Writer>),
    Logger(Arc<Logger>),
}

impl Component {
    #[must_use]
    pub const fn capability(&self) -> Capability {
        match self {
            Self::Formatter(_) => Capability::Formatter,
            Self::Filter(_) => Capability::Filter,
            Self::Compressor(_) => Capability::Compressor,
            Self::Serializer(_) => Capability::Serializer,
            Self::Roller(_) => Capability::Roller,
            Self::Trigger(_) => Capability::Trigger,
            Self::Writer(_) => Capability::Writer,
            Self::Logger(_) => Capability::Logger,
        }
    }

    /// Runtime type of the wrapped object, for wiring diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Formatter(x) => x.type_name(),
            Self::Filter(x) => x.type_name(),
            Self::Compressor(x) => x.type_name(),
            Self::Serializer(x) => x.type_name(),
            Self::Roller(x) => x.type_name(),
            Self::Trigger(x) => x.type_name(),
            Self::Writer(x) => x.type_name(),
            Self::Logger(_) => std::any::type_name::<Logger>(),
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component::{}({})", self.capability(), self.type_name())
    }
}

/// Object-safe face of every memento, as seen by the configurator.
pub trait Memento: Any {
    /// Type tag of the configurable this memento builds; used in error messages.
    fn type_name(&self) -> &'static str;

    /// Routes one scalar to its handler, the default handler, or nowhere.
    ///
    /// # Errors
    /// Whatever the handler's validation reports.
    fn accept_scalar(&mut self, policy: &SecurityPolicy, key: &str, value: &str) -> Result<()>;

    /// Offers a finished sub-object. Mementos that take none reject everything.
    ///
    /// # Errors
    /// `Wiring` when no slot of this memento can use `component`.
    fn accept_subobject(&mut self, component: Component) -> Result<()> {
        Err(Error::wiring(self.type_name(), component.type_name()))
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Handlers are plain function pointers so they can be copied out of the table
/// before being called with `&mut` access to the memento that owns the table.
pub type Handler<M> = fn(&mut M, &SecurityPolicy, &str) -> Result<()>;
pub type DefaultHandler<M> = fn(&mut M, &SecurityPolicy, &str, &str) -> Result<()>;

/// Named scalar handlers plus an optional catch-all.
pub struct HandlerTable<M> {
    handlers: HashMap<String, Handler<M>>,
    default: Option<DefaultHandler<M>>,
}

impl<M> Default for HandlerTable<M> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            default: None,
        }
    }
}

impl<M> fmt::Debug for HandlerTable<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("HandlerTable")
            .field("keys", &keys)
            .field("default", &self.default.is_some())
            .finish()
    }
}

/// Result of looking a key up in a [`HandlerTable`].
pub enum Route<M> {
    Handler(Handler<M>),
    Default(DefaultHandler<M>),
    Ignored,
}

impl<M> HandlerTable<M> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A later registration for the same key replaces the earlier one.
    pub fn register_handler(&mut self, key: impl Into<String>, handler: Handler<M>) {
        self.handlers.insert(key.into(), handler);
    }

    pub fn register_default_handler(&mut self, handler: DefaultHandler<M>) {
        self.default = Some(handler);
    }

    #[must_use]
    pub fn route(&self, key: &str) -> Route<M> {
        if let Some(&handler) = self.handlers.get(key) {
            return Route::Handler(handler);
        }
        self.default.map_or(Route::Ignored, Route::Default)
    }

    #[must_use]
    pub fn handles(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }
}

/// Mementos that keep their own handler table.
pub trait HandlesScalars: Sized {
    fn handlers(&self) -> &HandlerTable<Self>;
}

/// Shared `accept_scalar` body. Keys with no handler and no catch-all are logged and
/// otherwise ignored.
///
/// # Errors
/// Whatever the routed handler reports.
pub fn dispatch_scalar<M: HandlesScalars>(
    memento: &mut M,
    owner: &str,
    policy: &SecurityPolicy,
    key: &str,
    value: &str,
) -> Result<()> {
    let route = memento.handlers().route(key);
    match route {
        Route::Handler(handler) => handler(memento, policy, value),
        Route::Default(handler) => handler(memento, policy, key, value),
        Route::Ignored => {
            internal::debug("MEMENTO", &format!("{owner}: ignoring unknown key '{key}'"));
            Ok(())
        }
    }
}

/// Recovers the concrete memento a factory created.
///
/// # Errors
/// `Wiring` when a factory is handed another factory's memento.
pub fn downcast<M: Memento>(memento: Box<dyn Memento>, expected: &str) -> Result<Box<M>> {
    let actual = memento.type_name();
    memento
        .into_any()
        .downcast::<M>()
        .map_err(|_| Error::wiring(expected, actual))
}

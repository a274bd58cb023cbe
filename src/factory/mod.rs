//! The construction half of the two-phase build, and the type-tag registry.
//!
//! Every configurable type has a factory that creates its (empty) memento and later
//! turns the populated memento into the finished object. Factories are stateless;
//! the registry maps type tags to them and is read-only during a configuration run.

/// Implements [`Memento`] for a memento struct holding its handler table in `handlers`.
/// With `accept = method`, sub-objects go to that inherent method; otherwise they are
/// rejected with a wiring error.
macro_rules! impl_memento {
    (@impl $ty:ty, $tag:expr, { $($extra:tt)* }) => {
        impl $crate::memento::HandlesScalars for $ty {
            fn handlers(&self) -> &$crate::memento::HandlerTable<Self> {
                &self.handlers
            }
        }

        impl $crate::memento::Memento for $ty {
            fn type_name(&self) -> &'static str {
                $tag
            }

            fn accept_scalar(
                &mut self,
                policy: &$crate::security::SecurityPolicy,
                key: &str,
                value: &str,
            ) -> $crate::error::Result<()> {
                $crate::memento::dispatch_scalar(self, $tag, policy, key, value)
            }

            $($extra)*

            fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
                self
            }
        }
    };
    ($ty:ty, $tag:expr) => {
        impl_memento!(@impl $ty, $tag, {});
    };
    ($ty:ty, $tag:expr, accept = $accept:ident) => {
        impl_memento!(@impl $ty, $tag, {
            fn accept_subobject(
                &mut self,
                component: $crate::memento::Component,
            ) -> $crate::error::Result<()> {
                self.$accept(component)
            }
        });
    };
}

mod compress;
mod filter;
mod fmt;
mod logger;
mod roll;
mod serialize;
mod status;
mod writer;

pub use compress::{GzipFileCompressorFactory, ZlibFileCompressorFactory};
pub use filter::{
    DuplicateMessageFilterFactory, LevelFilterFactory, LevelThresholdFilterFactory,
    RegexFilterFactory,
};
pub use fmt::{JsonFormatterFactory, PatternFormatterFactory};
pub use logger::LoggerFactory;
pub use roll::{NumberedFileRollerFactory, SizeFileRollTriggerFactory, TimeFileRollerFactory};
pub use serialize::{JsonSerializerFactory, TextSerializerFactory};
pub use status::{StatusEntry, StatusLog};
pub use writer::{
    ConsoleWriterFactory, FileWriterFactory, QueueWriterFactory, RollingFileWriterFactory,
};

use crate::error::{Error, Result};
use crate::level::{Level, ParseLevelError};
use crate::logger::LoggerRegistry;
use crate::memento::{Component, KeySet, Memento};
use crate::security::SecurityPolicy;
use crate::writer::QueueHub;
use std::collections::HashMap;
use std::sync::Arc;

/// Type tags may be written fully qualified, e.g. `loomlog::file_writer`.
const TAG_PREFIX: &str = "loomlog::";

/// What a factory may look at while creating a memento.
pub struct MementoContext<'a> {
    pub policy: &'a mut SecurityPolicy,
    pub key_set: KeySet,
}

/// What a factory may touch while building.
pub struct BuildContext<'a> {
    /// Staging registry loggers are created in; committed by the configurator.
    pub loggers: &'a LoggerRegistry,
    pub queues: &'a QueueHub,
    pub status: &'a mut StatusLog,
}

pub trait ConfigurableFactory: Send + Sync {
    /// The native type tag this factory is registered under.
    fn type_tag(&self) -> &'static str;

    /// Label attached to status entries this factory emits.
    fn status_origin(&self) -> &str {
        self.type_tag()
    }

    /// Creates the paired memento and registers its security constraints.
    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento>;

    /// Consumes a memento from [`Self::create_memento`].
    ///
    /// # Errors
    /// `RequiredField` for unset mandatory fields; `Validation` or `InvalidValue` for
    /// cross-field checks; `Wiring` when handed a foreign memento.
    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Component>;
}

/// Type tag -> factory.
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, Arc<dyn ConfigurableFactory>>,
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}

/// Type names used by the legacy tool's configuration files.
const LEGACY_ALIASES: [(&str, &str); 7] = [
    ("FileAppender", "file_writer"),
    ("ConsoleAppender", "console_writer"),
    ("RollingFileAppender", "rolling_file_writer"),
    ("PatternLayout", "pattern_formatter"),
    ("LogLevelRangeFilter", "level_threshold_filter"),
    ("LogLevelMatchFilter", "level_filter"),
    ("StringMatchFilter", "regex_filter"),
];

impl FactoryRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in configurable plus the legacy aliases.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(LoggerFactory);
        registry.register(ConsoleWriterFactory);
        registry.register(FileWriterFactory);
        registry.register(RollingFileWriterFactory);
        registry.register(QueueWriterFactory);
        registry.register(PatternFormatterFactory);
        registry.register(JsonFormatterFactory);
        registry.register(LevelThresholdFilterFactory);
        registry.register(LevelFilterFactory);
        registry.register(RegexFilterFactory);
        registry.register(DuplicateMessageFilterFactory);
        registry.register(NumberedFileRollerFactory);
        registry.register(TimeFileRollerFactory);
        registry.register(SizeFileRollTriggerFactory);
        registry.register(GzipFileCompressorFactory);
        registry.register(ZlibFileCompressorFactory);
        registry.register(JsonSerializerFactory);
        registry.register(TextSerializerFactory);
        for (alias, tag) in LEGACY_ALIASES {
            registry.alias(alias, tag);
        }
        registry
    }

    /// Registers `factory` under its own type tag, replacing any previous one.
    pub fn register(&mut self, factory: impl ConfigurableFactory + 'static) {
        let factory: Arc<dyn ConfigurableFactory> = Arc::new(factory);
        self.factories
            .insert(factory.type_tag().to_string(), factory);
    }

    /// Makes `alias` resolve to whatever `tag` resolves to. Returns `false` when `tag`
    /// is unknown.
    pub fn alias(&mut self, alias: &str, tag: &str) -> bool {
        let Some(factory) = self.factories.get(tag).map(Arc::clone) else {
            return false;
        };
        self.factories.insert(alias.to_string(), factory);
        true
    }

    /// # Errors
    /// `UnknownType` naming `tag` when nothing is registered under it.
    pub fn get(&self, tag: &str) -> Result<Arc<dyn ConfigurableFactory>> {
        let short = tag.strip_prefix(TAG_PREFIX).unwrap_or(tag);
        self.factories
            .get(short)
            .map(Arc::clone)
            .ok_or_else(|| Error::UnknownType {
                tag: tag.to_string(),
            })
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_ok()
    }

    /// Registered tags, aliases included, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }
}

/// Validated text parsed as a level.
fn level_value(policy: &SecurityPolicy, key: &str, value: &str) -> Result<Level> {
    policy
        .validate_text(key, value)?
        .parse()
        .map_err(|e: ParseLevelError| Error::invalid(key, value, e.to_string()))
}

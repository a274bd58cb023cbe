//! The resolution engine: walks a [`Document`] depth-first, drives each node's memento
//! and factory, and commits the resulting loggers only if the whole document resolved.

use crate::config::{ConfigNode, Document, Format};
use crate::error::{Error, Result};
use crate::factory::{BuildContext, FactoryRegistry, MementoContext, StatusEntry, StatusLog};
use crate::internal;
use crate::logger::LoggerRegistry;
use crate::memento::{Component, KeySet};
use crate::security::SecurityPolicy;
use crate::writer::QueueHub;
use std::fmt;
use std::path::Path;

/// Key under which node depth is bounds-checked.
pub const DEPTH_KEY: &str = "configurator::depth";
pub const DEFAULT_MAX_DEPTH: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfiguratorOptions {
    /// Overrides whatever key set the document asks for.
    pub key_set: Option<KeySet>,
    /// Deepest node level accepted; top-level nodes are level 0.
    pub max_depth: u32,
}

impl Default for ConfiguratorOptions {
    fn default() -> Self {
        Self {
            key_set: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfiguratorState {
    #[default]
    Idle,
    ParsingDocument,
    ResolvingNode { tag: String, depth: u32 },
    Committed,
    Failed,
}

impl fmt::Display for ConfiguratorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::ParsingDocument => f.write_str("parsing document"),
            Self::ResolvingNode { tag, depth } => write!(f, "resolving {tag} at depth {depth}"),
            Self::Committed => f.write_str("committed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct ConfigurationReport {
    /// Every logger the run configured, ancestors included, sorted.
    pub loggers: Vec<String>,
    pub status: Vec<StatusEntry>,
    pub key_set: KeySet,
}

impl ConfigurationReport {
    #[must_use]
    pub fn warnings(&self) -> impl Iterator<Item = &StatusEntry> {
        self.status
            .iter()
            .filter(|e| e.level >= crate::level::Level::Warn)
    }
}

pub struct Configurator {
    factories: FactoryRegistry,
    options: ConfiguratorOptions,
    queues: QueueHub,
    policy: SecurityPolicy,
    state: ConfiguratorState,
}

impl Default for Configurator {
    fn default() -> Self {
        Self::new(FactoryRegistry::with_defaults())
    }
}

impl fmt::Debug for Configurator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configurator")
            .field("options", &self.options)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Configurator {
    #[must_use]
    pub fn new(factories: FactoryRegistry) -> Self {
        Self {
            factories,
            options: ConfiguratorOptions::default(),
            queues: QueueHub::new(),
            policy: SecurityPolicy::new(),
            state: ConfiguratorState::Idle,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ConfiguratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Queue writers built by this configurator publish to `hub`.
    #[must_use]
    pub fn with_queue_hub(mut self, hub: QueueHub) -> Self {
        self.queues = hub;
        self
    }

    #[must_use]
    pub const fn state(&self) -> &ConfiguratorState {
        &self.state
    }

    /// Constraints registered by every memento created so far.
    #[must_use]
    pub const fn policy(&self) -> &SecurityPolicy {
        &self.policy
    }

    #[must_use]
    pub const fn options(&self) -> &ConfiguratorOptions {
        &self.options
    }

    #[must_use]
    pub const fn queue_hub(&self) -> &QueueHub {
        &self.queues
    }

    #[must_use]
    pub const fn factories(&self) -> &FactoryRegistry {
        &self.factories
    }

    fn set_state(&mut self, state: ConfiguratorState) {
        internal::debug("CONFIGURATOR", &format!("{} -> {state}", self.state));
        self.state = state;
    }

    /// Parses `text`, then configures `loggers` from it.
    ///
    /// # Errors
    /// `Parse` for malformed text, otherwise see [`Self::configure`].
    pub fn configure_text(
        &mut self,
        text: &str,
        format: Format,
        loggers: &LoggerRegistry,
    ) -> Result<ConfigurationReport> {
        self.set_state(ConfiguratorState::ParsingDocument);
        match Document::parse(text, format) {
            Ok(document) => self.configure(&document, loggers),
            Err(e) => self.fail(e),
        }
    }

    /// Loads `path` (format by extension), then configures `loggers` from it.
    ///
    /// # Errors
    /// `Io` or `Parse` while loading, otherwise see [`Self::configure`].
    pub fn configure_file(
        &mut self,
        path: &Path,
        loggers: &LoggerRegistry,
    ) -> Result<ConfigurationReport> {
        self.set_state(ConfiguratorState::ParsingDocument);
        internal::debug("CONFIGURATOR", &format!("Loading {}", path.display()));
        match Document::load(path) {
            Ok(document) => self.configure(&document, loggers),
            Err(e) => self.fail(e),
        }
    }

    /// Resolves every top-level node into a staging registry and, if all of them
    /// succeed, commits it into `loggers`. On error `loggers` is left untouched.
    ///
    /// # Errors
    /// The first error met: `UnknownType`, `Validation`, `RequiredField`, `Wiring`,
    /// `InvalidValue`, `SlotConsumed` or `NestingTooDeep`.
    pub fn configure(
        &mut self,
        document: &Document,
        loggers: &LoggerRegistry,
    ) -> Result<ConfigurationReport> {
        let key_set = self
            .options
            .key_set
            .or(document.key_set)
            .unwrap_or_default();
        self.policy
            .set_integer(DEPTH_KEY, 0, i64::from(self.options.max_depth));
        internal::debug(
            "CONFIGURATOR",
            &format!(
                "Resolving {} top-level nodes with the {key_set:?} key set",
                document.roots.len()
            ),
        );

        let staged = LoggerRegistry::new();
        let mut status = StatusLog::new();
        let result = {
            let mut walk = Walk {
                factories: &self.factories,
                policy: &mut self.policy,
                state: &mut self.state,
                key_set,
                max_depth: self.options.max_depth,
                build: BuildContext {
                    loggers: &staged,
                    queues: &self.queues,
                    status: &mut status,
                },
            };
            walk.document(document)
        };

        if let Err(e) = result {
            return self.fail(e);
        }
        loggers.commit(&staged);
        self.set_state(ConfiguratorState::Committed);
        Ok(ConfigurationReport {
            loggers: staged.names(),
            status: status.into_entries(),
            key_set,
        })
    }

    fn fail<T>(&mut self, error: Error) -> Result<T> {
        internal::error("CONFIGURATOR", &error.to_string());
        self.set_state(ConfiguratorState::Failed);
        Err(error)
    }
}

/// One resolution pass. Holds the disjoint pieces of the configurator it needs so the
/// recursion can borrow them independently.
struct Walk<'a> {
    factories: &'a FactoryRegistry,
    policy: &'a mut SecurityPolicy,
    state: &'a mut ConfiguratorState,
    key_set: KeySet,
    max_depth: u32,
    build: BuildContext<'a>,
}

impl Walk<'_> {
    /// Top-level nodes must build loggers; anything else has nowhere to go.
    fn document(&mut self, document: &Document) -> Result<()> {
        for node in &document.roots {
            match self.resolve(node, 0)? {
                Component::Logger(_) => {}
                other => return Err(Error::wiring("document", other.type_name())),
            }
        }
        Ok(())
    }

    fn check_depth(&self, depth: u32) -> Result<()> {
        self.policy
            .validate_integer(DEPTH_KEY, i64::from(depth))
            .map(|_| ())
            .map_err(|_| Error::NestingTooDeep {
                depth,
                max: self.max_depth,
            })
    }

    /// Post-order: children are built and handed to the memento before the node itself.
    /// A bare child whose tag is not registered is offered as an empty scalar instead.
    fn resolve(&mut self, node: &ConfigNode, depth: u32) -> Result<Component> {
        self.check_depth(depth)?;
        *self.state = ConfiguratorState::ResolvingNode {
            tag: node.tag.clone(),
            depth,
        };
        internal::trace("CONFIGURATOR", &format!("Resolving {} at depth {depth}", node.tag));

        let factory = self.factories.get(&node.tag)?;
        let mut memento = factory.create_memento(&mut MementoContext {
            policy: &mut *self.policy,
            key_set: self.key_set,
        });
        for (key, value) in &node.entries {
            memento.accept_scalar(&*self.policy, key, value)?;
        }
        for child in &node.children {
            // A bare key that names no type is an entry left empty
            if child.is_bare() && !self.factories.contains(&child.tag) {
                memento.accept_scalar(&*self.policy, &child.tag, "")?;
                continue;
            }
            let component = self.resolve(child, depth + 1)?;
            memento.accept_subobject(component)?;
        }
        factory.create_configurable(memento, &mut self.build)
    }
}

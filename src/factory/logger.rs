//! Loggers are not built fresh: the factory fetches (or creates) the named logger in the
//! staging registry and configures it in place.

use super::{BuildContext, ConfigurableFactory, MementoContext, level_value};
use crate::error::{Error, Result};
use crate::level::Level;
use crate::logger::ROOT_LOGGER;
use crate::memento::{Component, HandlerTable, KeySet, Memento, downcast};
use crate::security::{NAME_TEXT_MAX, TOKEN_TEXT_MAX};
use crate::writer::Writer;
use std::sync::Arc;

const NAME_KEY: &str = "logger::name";
const LEVEL_KEY: &str = "logger::level";
const WRITES_TO_ANCESTORS_KEY: &str = "logger::writes_to_ancestors";

/// `root` and `<root>` both name the root logger.
fn registry_name(name: &str) -> &str {
    match name {
        "root" | "<root>" => ROOT_LOGGER,
        other => other,
    }
}

struct LoggerMemento {
    handlers: HandlerTable<Self>,
    name: Option<String>,
    level: Option<Level>,
    writes_to_ancestors: Option<bool>,
    writers: Vec<Arc<dyn Writer>>,
}

impl_memento!(LoggerMemento, LoggerFactory::TAG, accept = offer);

impl LoggerMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_text(NAME_KEY, NAME_TEXT_MAX);
        ctx.policy.set_text(LEVEL_KEY, TOKEN_TEXT_MAX);
        ctx.policy.set_boolean(WRITES_TO_ANCESTORS_KEY);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        handlers.register_handler("name", |m, policy, value| {
            m.name = Some(policy.text(NAME_KEY, value)?);
            Ok(())
        });
        handlers.register_handler("level", |m, policy, value| {
            m.level = Some(level_value(policy, LEVEL_KEY, value)?);
            Ok(())
        });
        let ancestors_key = match ctx.key_set {
            KeySet::Native => "writes_to_ancestors",
            KeySet::Legacy => "additivity",
        };
        handlers.register_handler(ancestors_key, |m, policy, value| {
            m.writes_to_ancestors = Some(policy.boolean(WRITES_TO_ANCESTORS_KEY, value)?);
            Ok(())
        });
        Self {
            handlers,
            name: None,
            level: None,
            writes_to_ancestors: None,
            writers: Vec::new(),
        }
    }

    fn offer(&mut self, component: Component) -> Result<()> {
        match component {
            Component::Writer(writer) => {
                self.writers.push(writer);
                Ok(())
            }
            other => Err(Error::wiring(LoggerFactory::TAG, other.type_name())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoggerFactory;

impl LoggerFactory {
    pub const TAG: &'static str = "logger";
}

impl ConfigurableFactory for LoggerFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(LoggerMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let memento = *downcast::<LoggerMemento>(memento, Self::TAG)?;
        let name = memento
            .name
            .as_deref()
            .ok_or_else(|| Error::required(Self::TAG, "name"))?;
        let logger = ctx.loggers.get_or_create(registry_name(name.trim()));
        if let Some(level) = memento.level {
            logger.set_level(level);
        }
        for writer in memento.writers {
            logger.add_writer(writer);
        }
        if let Some(writes_to_ancestors) = memento.writes_to_ancestors {
            logger.set_writes_to_ancestors(writes_to_ancestors);
        }
        Ok(Component::Logger(logger))
    }
}

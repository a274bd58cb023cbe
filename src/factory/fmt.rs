use super::{BuildContext, ConfigurableFactory, MementoContext};
use crate::error::{Error, Result};
use crate::fmt::{JsonFormatter, PatternFormatter, TimeZone};
use crate::memento::{Component, HandlerTable, KeySet, Memento, downcast};
use crate::security::{PATTERN_TEXT_MAX, TOKEN_TEXT_MAX};

const PATTERN_KEY: &str = "pattern_formatter::pattern";

struct PatternFormatterMemento {
    handlers: HandlerTable<Self>,
    pattern: Option<String>,
}

impl_memento!(PatternFormatterMemento, PatternFormatterFactory::TAG);

impl PatternFormatterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_text(PATTERN_KEY, PATTERN_TEXT_MAX);
        let key = match ctx.key_set {
            KeySet::Native => "pattern",
            KeySet::Legacy => "ConversionPattern",
        };
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        handlers.register_handler(key, |m: &mut Self, policy, value| {
            m.pattern = Some(policy.text(PATTERN_KEY, value)?);
            Ok(())
        });
        Self {
            handlers,
            pattern: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFormatterFactory;

impl PatternFormatterFactory {
    pub const TAG: &'static str = "pattern_formatter";
}

impl ConfigurableFactory for PatternFormatterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(PatternFormatterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let memento = downcast::<PatternFormatterMemento>(memento, Self::TAG)?;
        let pattern = memento
            .pattern
            .ok_or_else(|| Error::required(Self::TAG, "pattern"))?;
        Ok(Component::Formatter(Box::new(PatternFormatter::new(
            &pattern,
        ))))
    }
}

const PRETTY_KEY: &str = "json_formatter::pretty";
const TIME_ZONE_KEY: &str = "json_formatter::time_zone";

struct JsonFormatterMemento {
    handlers: HandlerTable<Self>,
    pretty: bool,
    time_zone: TimeZone,
}

impl_memento!(JsonFormatterMemento, JsonFormatterFactory::TAG);

impl JsonFormatterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_boolean(PRETTY_KEY);
        ctx.policy.set_text(TIME_ZONE_KEY, TOKEN_TEXT_MAX);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        handlers.register_handler("pretty", |m: &mut Self, policy, value| {
            m.pretty = policy.boolean(PRETTY_KEY, value)?;
            Ok(())
        });
        handlers.register_handler("time_zone", |m: &mut Self, policy, value| {
            m.time_zone = policy.validate_text(TIME_ZONE_KEY, value)?.parse()?;
            Ok(())
        });
        Self {
            handlers,
            pretty: false,
            time_zone: TimeZone::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatterFactory;

impl JsonFormatterFactory {
    pub const TAG: &'static str = "json_formatter";
}

impl ConfigurableFactory for JsonFormatterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(JsonFormatterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let memento = downcast::<JsonFormatterMemento>(memento, Self::TAG)?;
        Ok(Component::Formatter(Box::new(JsonFormatter::new(
            memento.pretty,
            memento.time_zone,
        ))))
    }
}

use super::{BuildContext, ConfigurableFactory, MementoContext, level_value};
use crate::error::{Error, Result};
use crate::filter::{
    DuplicateMessageFilter, FilterResult, LevelFilter, LevelThresholdFilter, RegexFilter,
};
use crate::level::Level;
use crate::memento::{
    Component, FilterBase, HandlerTable, KeySet, Memento, WithFilterBase, downcast,
};
use crate::security::{PATTERN_TEXT_MAX, SecurityPolicy, TOKEN_TEXT_MAX};
use regex::Regex;

const ON_MATCH_KEY: &str = "filter::on_match";
const ON_MISMATCH_KEY: &str = "filter::on_mismatch";

/// What a matching filter answers on a hit and on a miss.
#[derive(Debug, Clone, Copy)]
struct MatchPolicy {
    on_match: FilterResult,
    on_mismatch: FilterResult,
}

impl MatchPolicy {
    fn new(policy: &mut SecurityPolicy, on_match: FilterResult, on_mismatch: FilterResult) -> Self {
        policy.set_text(ON_MATCH_KEY, TOKEN_TEXT_MAX);
        policy.set_text(ON_MISMATCH_KEY, TOKEN_TEXT_MAX);
        Self {
            on_match,
            on_mismatch,
        }
    }

    fn register<M: WithMatchPolicy>(table: &mut HandlerTable<M>) {
        table.register_handler("on_match", |m, policy, value| {
            m.match_policy().on_match = policy.validate_text(ON_MATCH_KEY, value)?.parse()?;
            Ok(())
        });
        table.register_handler("on_mismatch", |m, policy, value| {
            m.match_policy().on_mismatch = policy.validate_text(ON_MISMATCH_KEY, value)?.parse()?;
            Ok(())
        });
    }
}

trait WithMatchPolicy {
    fn match_policy(&mut self) -> &mut MatchPolicy;
}

const THRESHOLD_LEVEL_KEY: &str = "level_threshold_filter::level";

struct LevelThresholdFilterMemento {
    handlers: HandlerTable<Self>,
    base: FilterBase,
    level: Option<Level>,
}

impl_memento!(LevelThresholdFilterMemento, LevelThresholdFilterFactory::TAG);

impl WithFilterBase for LevelThresholdFilterMemento {
    fn filter_base(&mut self) -> &mut FilterBase {
        &mut self.base
    }
}

impl LevelThresholdFilterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_text(THRESHOLD_LEVEL_KEY, TOKEN_TEXT_MAX);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        FilterBase::register(&mut handlers);
        let key = match ctx.key_set {
            KeySet::Native => "level",
            KeySet::Legacy => "LogLevelMin",
        };
        handlers.register_handler(key, |m: &mut Self, policy, value| {
            m.level = Some(level_value(policy, THRESHOLD_LEVEL_KEY, value)?);
            Ok(())
        });
        Self {
            handlers,
            base: FilterBase::new::<LevelThresholdFilter>(ctx.policy),
            level: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LevelThresholdFilterFactory;

impl LevelThresholdFilterFactory {
    pub const TAG: &'static str = "level_threshold_filter";
}

impl ConfigurableFactory for LevelThresholdFilterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(LevelThresholdFilterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<LevelThresholdFilterMemento>(memento, Self::TAG)?;
        let level = memento
            .level
            .ok_or_else(|| Error::required(Self::TAG, "level"))?;
        let name = memento.base.finish(Self::TAG)?;
        Ok(Component::Filter(Box::new(LevelThresholdFilter::new(
            name, level,
        ))))
    }
}

const MATCH_LEVEL_KEY: &str = "level_filter::level";
const ACCEPT_ON_MATCH_KEY: &str = "level_filter::accept_on_match";

struct LevelFilterMemento {
    handlers: HandlerTable<Self>,
    base: FilterBase,
    matching: MatchPolicy,
    level: Option<Level>,
}

impl_memento!(LevelFilterMemento, LevelFilterFactory::TAG);

impl WithFilterBase for LevelFilterMemento {
    fn filter_base(&mut self) -> &mut FilterBase {
        &mut self.base
    }
}

impl WithMatchPolicy for LevelFilterMemento {
    fn match_policy(&mut self) -> &mut MatchPolicy {
        &mut self.matching
    }
}

impl LevelFilterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_text(MATCH_LEVEL_KEY, TOKEN_TEXT_MAX);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        FilterBase::register(&mut handlers);
        MatchPolicy::register(&mut handlers);
        match ctx.key_set {
            KeySet::Native => {
                handlers.register_handler("level", |m: &mut Self, policy, value| {
                    m.level = Some(level_value(policy, MATCH_LEVEL_KEY, value)?);
                    Ok(())
                });
            }
            KeySet::Legacy => {
                ctx.policy.set_boolean(ACCEPT_ON_MATCH_KEY);
                handlers.register_handler("LogLevelToMatch", |m: &mut Self, policy, value| {
                    m.level = Some(level_value(policy, MATCH_LEVEL_KEY, value)?);
                    Ok(())
                });
                handlers.register_handler("AcceptOnMatch", |m: &mut Self, policy, value| {
                    m.matching.on_match = if policy.boolean(ACCEPT_ON_MATCH_KEY, value)? {
                        FilterResult::Accept
                    } else {
                        FilterResult::Deny
                    };
                    Ok(())
                });
            }
        }
        Self {
            handlers,
            base: FilterBase::new::<LevelFilter>(ctx.policy),
            matching: MatchPolicy::new(ctx.policy, FilterResult::Accept, FilterResult::Neutral),
            level: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LevelFilterFactory;

impl LevelFilterFactory {
    pub const TAG: &'static str = "level_filter";
}

impl ConfigurableFactory for LevelFilterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(LevelFilterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<LevelFilterMemento>(memento, Self::TAG)?;
        let level = memento
            .level
            .ok_or_else(|| Error::required(Self::TAG, "level"))?;
        let name = memento.base.finish(Self::TAG)?;
        Ok(Component::Filter(Box::new(LevelFilter::new(
            name,
            level,
            memento.matching.on_match,
            memento.matching.on_mismatch,
        ))))
    }
}

const REGEX_KEY: &str = "regex_filter::regex";

struct RegexFilterMemento {
    handlers: HandlerTable<Self>,
    base: FilterBase,
    matching: MatchPolicy,
    regex: Option<String>,
}

impl_memento!(RegexFilterMemento, RegexFilterFactory::TAG);

impl WithFilterBase for RegexFilterMemento {
    fn filter_base(&mut self) -> &mut FilterBase {
        &mut self.base
    }
}

impl WithMatchPolicy for RegexFilterMemento {
    fn match_policy(&mut self) -> &mut MatchPolicy {
        &mut self.matching
    }
}

impl RegexFilterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_text(REGEX_KEY, PATTERN_TEXT_MAX);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        FilterBase::register(&mut handlers);
        MatchPolicy::register(&mut handlers);
        let key = match ctx.key_set {
            KeySet::Native => "regex",
            KeySet::Legacy => "StringToMatch",
        };
        handlers.register_handler(key, |m: &mut Self, policy, value| {
            m.regex = Some(policy.text(REGEX_KEY, value)?);
            Ok(())
        });
        Self {
            handlers,
            base: FilterBase::new::<RegexFilter>(ctx.policy),
            matching: MatchPolicy::new(ctx.policy, FilterResult::Accept, FilterResult::Deny),
            regex: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegexFilterFactory;

impl RegexFilterFactory {
    pub const TAG: &'static str = "regex_filter";
}

impl ConfigurableFactory for RegexFilterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(RegexFilterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<RegexFilterMemento>(memento, Self::TAG)?;
        let source = memento
            .regex
            .take()
            .ok_or_else(|| Error::required(Self::TAG, "regex"))?;
        let regex =
            Regex::new(&source).map_err(|e| Error::invalid(REGEX_KEY, &source, e.to_string()))?;
        let name = memento.base.finish(Self::TAG)?;
        Ok(Component::Filter(Box::new(RegexFilter::new(
            name,
            regex,
            memento.matching.on_match,
            memento.matching.on_mismatch,
        ))))
    }
}

struct DuplicateMessageFilterMemento {
    handlers: HandlerTable<Self>,
    base: FilterBase,
}

impl_memento!(DuplicateMessageFilterMemento, DuplicateMessageFilterFactory::TAG);

impl WithFilterBase for DuplicateMessageFilterMemento {
    fn filter_base(&mut self) -> &mut FilterBase {
        &mut self.base
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateMessageFilterFactory;

impl DuplicateMessageFilterFactory {
    pub const TAG: &'static str = "duplicate_message_filter";
}

impl ConfigurableFactory for DuplicateMessageFilterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        let mut handlers: HandlerTable<DuplicateMessageFilterMemento> = HandlerTable::new();
        FilterBase::register(&mut handlers);
        Box::new(DuplicateMessageFilterMemento {
            handlers,
            base: FilterBase::new::<DuplicateMessageFilter>(ctx.policy),
        })
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<DuplicateMessageFilterMemento>(memento, Self::TAG)?;
        let name = memento.base.finish(Self::TAG)?;
        Ok(Component::Filter(Box::new(DuplicateMessageFilter::new(name))))
    }
}

use super::{BuildContext, ConfigurableFactory, MementoContext};
use crate::compress::FileCompressor;
use crate::error::{Error, Result};
use crate::memento::{Component, HandlerTable, KeySet, Memento, Slot, downcast};
use crate::roll::{
    NumberedFileRoller, Period, SizeFileRollTrigger, TimeFileRoller, check_file_name_pattern,
    parse_size,
};
use crate::security::{PATTERN_TEXT_MAX, TOKEN_TEXT_MAX, text_key};
use std::sync::Arc;

/// Rollers accept a single optional compressor.
fn offer_compressor(
    slot: &mut Slot<Arc<dyn FileCompressor>>,
    owner: &str,
    component: Component,
) -> Result<()> {
    match component {
        Component::Compressor(compressor) => {
            slot.fill(compressor);
            Ok(())
        }
        other => Err(Error::wiring(owner, other.type_name())),
    }
}

/// Indices are validated into `[1, 1000]`, so they always fit.
fn index(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

const MIN_INDEX_KEY: &str = "numbered_file_roller::min_index";
const MAX_INDEX_KEY: &str = "numbered_file_roller::max_index";

struct NumberedFileRollerMemento {
    handlers: HandlerTable<Self>,
    min_index: i64,
    max_index: Option<i64>,
    compressor: Slot<Arc<dyn FileCompressor>>,
}

impl_memento!(
    NumberedFileRollerMemento,
    NumberedFileRollerFactory::TAG,
    accept = offer
);

impl NumberedFileRollerMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_numeric(MIN_INDEX_KEY, 1, 1000);
        ctx.policy.set_numeric(MAX_INDEX_KEY, 1, 1000);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        handlers.register_handler("min_index", |m, policy, value| {
            m.min_index = policy.integer(MIN_INDEX_KEY, value)?;
            Ok(())
        });
        let max_key = match ctx.key_set {
            KeySet::Native => "max_index",
            KeySet::Legacy => "MaxBackupIndex",
        };
        handlers.register_handler(max_key, |m, policy, value| {
            m.max_index = Some(policy.integer(MAX_INDEX_KEY, value)?);
            Ok(())
        });
        Self {
            handlers,
            min_index: 1,
            max_index: None,
            compressor: Slot::new("compressor"),
        }
    }

    fn offer(&mut self, component: Component) -> Result<()> {
        offer_compressor(
            &mut self.compressor,
            NumberedFileRollerFactory::TAG,
            component,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberedFileRollerFactory;

impl NumberedFileRollerFactory {
    pub const TAG: &'static str = "numbered_file_roller";
}

impl ConfigurableFactory for NumberedFileRollerFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(NumberedFileRollerMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<NumberedFileRollerMemento>(memento, Self::TAG)?;
        let max_index = memento
            .max_index
            .ok_or_else(|| Error::required(Self::TAG, "max_index"))?;
        if memento.min_index > max_index {
            return Err(Error::invalid(
                MIN_INDEX_KEY,
                &memento.min_index.to_string(),
                format!("must not exceed max_index ({max_index})"),
            ));
        }
        let compressor = memento.compressor.take(Self::TAG)?;
        Ok(Component::Roller(Box::new(NumberedFileRoller::new(
            index(memento.min_index),
            index(max_index),
            compressor,
        ))))
    }
}

const PERIOD_KEY: &str = "time_file_roller::period";
const MAX_HISTORY_KEY: &str = "time_file_roller::max_history";
const FILE_NAME_PATTERN_KEY: &str = "time_file_roller::file_name_pattern";

struct TimeFileRollerMemento {
    handlers: HandlerTable<Self>,
    period: Option<Period>,
    max_history: Option<i64>,
    file_name_pattern: Option<String>,
    compressor: Slot<Arc<dyn FileCompressor>>,
}

impl_memento!(
    TimeFileRollerMemento,
    TimeFileRollerFactory::TAG,
    accept = offer
);

impl TimeFileRollerMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_text(PERIOD_KEY, TOKEN_TEXT_MAX);
        ctx.policy.set_numeric(MAX_HISTORY_KEY, 0, 10_000);
        ctx.policy.set_text(FILE_NAME_PATTERN_KEY, PATTERN_TEXT_MAX);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        handlers.register_handler("period", |m, policy, value| {
            m.period = Some(policy.validate_text(PERIOD_KEY, value)?.parse()?);
            Ok(())
        });
        handlers.register_handler("max_history", |m, policy, value| {
            m.max_history = Some(policy.integer(MAX_HISTORY_KEY, value)?);
            Ok(())
        });
        handlers.register_handler("file_name_pattern", |m, policy, value| {
            m.file_name_pattern = Some(policy.text(FILE_NAME_PATTERN_KEY, value)?);
            Ok(())
        });
        Self {
            handlers,
            period: None,
            max_history: None,
            file_name_pattern: None,
            compressor: Slot::new("compressor"),
        }
    }

    fn offer(&mut self, component: Component) -> Result<()> {
        offer_compressor(&mut self.compressor, TimeFileRollerFactory::TAG, component)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFileRollerFactory;

impl TimeFileRollerFactory {
    pub const TAG: &'static str = "time_file_roller";
}

impl ConfigurableFactory for TimeFileRollerFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(TimeFileRollerMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<TimeFileRollerMemento>(memento, Self::TAG)?;
        let period = memento
            .period
            .ok_or_else(|| Error::required(Self::TAG, "period"))?;
        let max_history = memento
            .max_history
            .ok_or_else(|| Error::required(Self::TAG, "max_history"))?;
        if let Some(pattern) = &memento.file_name_pattern {
            check_file_name_pattern(FILE_NAME_PATTERN_KEY, pattern)?;
        }
        let compressor = memento.compressor.take(Self::TAG)?;
        Ok(Component::Roller(Box::new(TimeFileRoller::new(
            period,
            index(max_history),
            memento.file_name_pattern.take(),
            compressor,
        ))))
    }
}

const MAX_SIZE_KEY: &str = "size_file_roll_trigger::max_size";

struct SizeFileRollTriggerMemento {
    handlers: HandlerTable<Self>,
    max_size: Option<u64>,
}

impl_memento!(SizeFileRollTriggerMemento, SizeFileRollTriggerFactory::TAG);

impl SizeFileRollTriggerMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_numeric(MAX_SIZE_KEY, 1, i64::MAX);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        let key = match ctx.key_set {
            KeySet::Native => "max_size",
            KeySet::Legacy => "MaxFileSize",
        };
        // Size text ("10MB") is length-checked, expanded to bytes, then range-checked.
        handlers.register_handler(key, |m, policy, value| {
            let raw = policy.validate_text(&text_key(MAX_SIZE_KEY), value)?;
            let bytes = parse_size(raw)
                .and_then(|bytes| i64::try_from(bytes).ok())
                .ok_or_else(|| Error::invalid(MAX_SIZE_KEY, raw, "not a size such as 10MB"))?;
            let bytes = policy.validate_integer(MAX_SIZE_KEY, bytes)?;
            m.max_size = Some(bytes.unsigned_abs());
            Ok(())
        });
        Self {
            handlers,
            max_size: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SizeFileRollTriggerFactory;

impl SizeFileRollTriggerFactory {
    pub const TAG: &'static str = "size_file_roll_trigger";
}

impl ConfigurableFactory for SizeFileRollTriggerFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(SizeFileRollTriggerMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let memento = downcast::<SizeFileRollTriggerMemento>(memento, Self::TAG)?;
        let max_size = memento
            .max_size
            .ok_or_else(|| Error::required(Self::TAG, "max_size"))?;
        Ok(Component::Trigger(Box::new(SizeFileRollTrigger::new(
            max_size,
        ))))
    }
}

use super::{BuildContext, ConfigurableFactory, MementoContext};
use crate::error::Result;
use crate::memento::{Component, HandlerTable, Memento, downcast};
use crate::serialize::{JsonSerializer, TextSerializer};

/// Serializers take no settings; the memento only exists to keep the protocol uniform.
struct SerializerMemento {
    handlers: HandlerTable<Self>,
    tag: &'static str,
}

impl crate::memento::HandlesScalars for SerializerMemento {
    fn handlers(&self) -> &HandlerTable<Self> {
        &self.handlers
    }
}

impl Memento for SerializerMemento {
    fn type_name(&self) -> &'static str {
        self.tag
    }

    fn accept_scalar(
        &mut self,
        policy: &crate::security::SecurityPolicy,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let tag = self.tag;
        crate::memento::dispatch_scalar(self, tag, policy, key, value)
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}

fn memento(tag: &'static str) -> Box<dyn Memento> {
    Box::new(SerializerMemento {
        handlers: HandlerTable::new(),
        tag,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializerFactory;

impl JsonSerializerFactory {
    pub const TAG: &'static str = "json_serializer";
}

impl ConfigurableFactory for JsonSerializerFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, _ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        memento(Self::TAG)
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        downcast::<SerializerMemento>(memento, Self::TAG)?;
        Ok(Component::Serializer(Box::new(JsonSerializer)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextSerializerFactory;

impl TextSerializerFactory {
    pub const TAG: &'static str = "text_serializer";
}

impl ConfigurableFactory for TextSerializerFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, _ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        memento(Self::TAG)
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        downcast::<SerializerMemento>(memento, Self::TAG)?;
        Ok(Component::Serializer(Box::new(TextSerializer)))
    }
}

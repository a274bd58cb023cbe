use super::{BuildContext, ConfigurableFactory, MementoContext};
use crate::error::{Error, Result};
use crate::memento::{
    Component, FileBase, HandlerTable, KeySet, Memento, Slot, WithFileBase, WithWriterBase,
    WriterBase, downcast,
};
use crate::roll::{FileRollTrigger, FileRoller};
use crate::security::{NAME_TEXT_MAX, PROPERTY_TEXT_MAX, TOKEN_TEXT_MAX};
use crate::serialize::Serializer;
use crate::writer::{
    ConsoleWriter, FileWriter, QueueWriter, RollingFileWriter, Stream, Writer, WriterCore,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shares the finished writer and points its writeable filters back at it.
fn publish<W: Writer + 'static>(writer: W) -> Component {
    let writer: Arc<dyn Writer> = Arc::new(writer);
    for filter in writer.filters() {
        if let Some(writeable) = filter.as_writeable() {
            writeable.set_writer(Arc::downgrade(&writer));
        }
    }
    Component::Writer(writer)
}

const STREAM_KEY: &str = "console_writer::stream";
const STD_ERR_KEY: &str = "console_writer::log_to_std_err";

struct ConsoleWriterMemento {
    handlers: HandlerTable<Self>,
    base: WriterBase,
    stream: Stream,
}

impl_memento!(ConsoleWriterMemento, ConsoleWriterFactory::TAG, accept = offer);

impl WithWriterBase for ConsoleWriterMemento {
    fn writer_base(&mut self) -> &mut WriterBase {
        &mut self.base
    }
}

impl ConsoleWriterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        WriterBase::register(&mut handlers);
        match ctx.key_set {
            KeySet::Native => {
                ctx.policy.set_text(STREAM_KEY, TOKEN_TEXT_MAX);
                handlers.register_handler("stream", |m, policy, value| {
                    m.stream = policy.validate_text(STREAM_KEY, value)?.parse()?;
                    Ok(())
                });
            }
            KeySet::Legacy => {
                ctx.policy.set_boolean(STD_ERR_KEY);
                handlers.register_handler("logToStdErr", |m, policy, value| {
                    m.stream = if policy.boolean(STD_ERR_KEY, value)? {
                        Stream::Stderr
                    } else {
                        Stream::Stdout
                    };
                    Ok(())
                });
            }
        }
        Self {
            handlers,
            base: WriterBase::new::<ConsoleWriter>(ctx.policy),
            stream: Stream::default(),
        }
    }

    fn offer(&mut self, component: Component) -> Result<()> {
        match self.base.offer(component) {
            None => Ok(()),
            Some(other) => Err(Error::wiring(ConsoleWriterFactory::TAG, other.type_name())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWriterFactory;

impl ConsoleWriterFactory {
    pub const TAG: &'static str = "console_writer";
}

impl ConfigurableFactory for ConsoleWriterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(ConsoleWriterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<ConsoleWriterMemento>(memento, Self::TAG)?;
        let parts = memento.base.finish(Self::TAG)?;
        Ok(publish(ConsoleWriter::new(
            parts.name,
            parts.formatter,
            parts.filters,
            memento.stream,
        )))
    }
}

struct FileWriterMemento {
    handlers: HandlerTable<Self>,
    base: WriterBase,
    file: FileBase,
}

impl_memento!(FileWriterMemento, FileWriterFactory::TAG, accept = offer);

impl WithWriterBase for FileWriterMemento {
    fn writer_base(&mut self) -> &mut WriterBase {
        &mut self.base
    }
}

impl WithFileBase for FileWriterMemento {
    fn file_base(&mut self) -> &mut FileBase {
        &mut self.file
    }
}

impl FileWriterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        WriterBase::register(&mut handlers);
        FileBase::register(&mut handlers, ctx.key_set);
        Self {
            handlers,
            base: WriterBase::new::<FileWriter>(ctx.policy),
            file: FileBase::new(ctx.policy),
        }
    }

    fn offer(&mut self, component: Component) -> Result<()> {
        match self.base.offer(component) {
            None => Ok(()),
            Some(other) => Err(Error::wiring(FileWriterFactory::TAG, other.type_name())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileWriterFactory;

impl FileWriterFactory {
    pub const TAG: &'static str = "file_writer";
}

impl ConfigurableFactory for FileWriterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(FileWriterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<FileWriterMemento>(memento, Self::TAG)?;
        let parts = memento.base.finish(Self::TAG)?;
        let sink = memento.file.finish(Self::TAG)?;
        Ok(publish(FileWriter::new(
            parts.name,
            parts.formatter,
            parts.filters,
            sink,
        )))
    }
}

struct RollingFileWriterMemento {
    handlers: HandlerTable<Self>,
    base: WriterBase,
    file: FileBase,
    roller: Slot<Box<dyn FileRoller>>,
    trigger: Slot<Box<dyn FileRollTrigger>>,
}

impl_memento!(
    RollingFileWriterMemento,
    RollingFileWriterFactory::TAG,
    accept = offer
);

impl WithWriterBase for RollingFileWriterMemento {
    fn writer_base(&mut self) -> &mut WriterBase {
        &mut self.base
    }
}

impl WithFileBase for RollingFileWriterMemento {
    fn file_base(&mut self) -> &mut FileBase {
        &mut self.file
    }
}

impl RollingFileWriterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        WriterBase::register(&mut handlers);
        FileBase::register(&mut handlers, ctx.key_set);
        Self {
            handlers,
            base: WriterBase::new::<RollingFileWriter>(ctx.policy),
            file: FileBase::new(ctx.policy),
            roller: Slot::new("roller"),
            trigger: Slot::new("trigger"),
        }
    }

    fn offer(&mut self, component: Component) -> Result<()> {
        match self.base.offer(component) {
            None => Ok(()),
            Some(Component::Roller(roller)) => {
                self.roller.fill(roller);
                Ok(())
            }
            Some(Component::Trigger(trigger)) => {
                self.trigger.fill(trigger);
                Ok(())
            }
            Some(other) => Err(Error::wiring(
                RollingFileWriterFactory::TAG,
                other.type_name(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RollingFileWriterFactory;

impl RollingFileWriterFactory {
    pub const TAG: &'static str = "rolling_file_writer";
}

impl ConfigurableFactory for RollingFileWriterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(RollingFileWriterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<RollingFileWriterMemento>(memento, Self::TAG)?;
        let parts = memento.base.finish(Self::TAG)?;
        let roller = memento.roller.require(Self::TAG)?;
        let trigger = memento.trigger.take(Self::TAG)?;
        if trigger.is_none() && roller.as_trigger().is_none() {
            return Err(Error::required(Self::TAG, "trigger"));
        }
        let sink = memento.file.finish(Self::TAG)?;
        Ok(publish(RollingFileWriter::new(
            parts.name,
            parts.formatter,
            parts.filters,
            sink,
            roller,
            trigger,
        )))
    }
}

const TOPIC_KEY: &str = "queue_writer::topic";
const PROPERTY_KEY: &str = "queue_writer::property";
const PROPERTY_NAME_KEY: &str = "queue_writer::property_name";

struct QueueWriterMemento {
    handlers: HandlerTable<Self>,
    base: WriterBase,
    topic: Option<String>,
    serializer: Slot<Box<dyn Serializer>>,
    properties: BTreeMap<String, String>,
}

impl_memento!(QueueWriterMemento, QueueWriterFactory::TAG, accept = offer);

impl WithWriterBase for QueueWriterMemento {
    fn writer_base(&mut self) -> &mut WriterBase {
        &mut self.base
    }
}

impl QueueWriterMemento {
    fn new(ctx: &mut MementoContext<'_>) -> Self {
        ctx.policy.set_text(TOPIC_KEY, NAME_TEXT_MAX);
        ctx.policy.set_text(PROPERTY_NAME_KEY, NAME_TEXT_MAX);
        ctx.policy.set_text(PROPERTY_KEY, PROPERTY_TEXT_MAX);
        let mut handlers: HandlerTable<Self> = HandlerTable::new();
        WriterBase::register(&mut handlers);
        handlers.register_handler("topic", |m, policy, value| {
            m.topic = Some(policy.text(TOPIC_KEY, value)?);
            Ok(())
        });
        // Anything else is a broker property, passed through untouched.
        handlers.register_default_handler(|m, policy, key, value| {
            let key = policy.text(PROPERTY_NAME_KEY, key)?;
            let value = policy.text(PROPERTY_KEY, value)?;
            m.properties.insert(key, value);
            Ok(())
        });
        Self {
            handlers,
            base: WriterBase::new::<QueueWriter>(ctx.policy),
            topic: None,
            serializer: Slot::new("serializer"),
            properties: BTreeMap::new(),
        }
    }

    fn offer(&mut self, component: Component) -> Result<()> {
        match self.base.offer(component) {
            None => Ok(()),
            Some(Component::Serializer(serializer)) => {
                self.serializer.fill(serializer);
                Ok(())
            }
            Some(other) => Err(Error::wiring(QueueWriterFactory::TAG, other.type_name())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueWriterFactory;

impl QueueWriterFactory {
    pub const TAG: &'static str = "queue_writer";
}

impl ConfigurableFactory for QueueWriterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        Box::new(QueueWriterMemento::new(ctx))
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let mut memento = downcast::<QueueWriterMemento>(memento, Self::TAG)?;
        let parts = memento.base.finish(Self::TAG)?;
        let topic = memento
            .topic
            .take()
            .ok_or_else(|| Error::required(Self::TAG, "topic"))?;
        let serializer = memento.serializer.require(Self::TAG)?;
        Ok(publish(QueueWriter::new(
            WriterCore::new(parts.name, parts.formatter, parts.filters),
            topic,
            serializer,
            std::mem::take(&mut memento.properties),
            ctx.queues.clone(),
        )))
    }
}

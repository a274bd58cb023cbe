mod common;

use common::configure;
use loomlog::factory::{BuildContext, MementoContext};
use loomlog::fmt::Formatter;
use loomlog::memento::{HandlerTable, HandlesScalars, dispatch_scalar, downcast};
use loomlog::security::SecurityPolicy;
use loomlog::{
    Component, ConfigurableFactory, Configurator, Error, FactoryRegistry, Format, LogEvent,
    LoggerRegistry, Memento, Result,
};

#[test]
fn defaults_cover_every_builtin_tag() {
    let registry = FactoryRegistry::with_defaults();
    for tag in [
        "logger",
        "console_writer",
        "file_writer",
        "rolling_file_writer",
        "queue_writer",
        "pattern_formatter",
        "json_formatter",
        "level_threshold_filter",
        "level_filter",
        "regex_filter",
        "duplicate_message_filter",
        "numbered_file_roller",
        "time_file_roller",
        "size_file_roll_trigger",
        "gzip_file_compressor",
        "zlib_file_compressor",
        "json_serializer",
        "text_serializer",
    ] {
        assert!(registry.contains(tag), "missing {tag}");
    }
}

#[test]
fn legacy_aliases_resolve_to_the_same_factory() {
    let registry = FactoryRegistry::with_defaults();
    let alias = registry.get("FileAppender").unwrap();
    assert_eq!(alias.type_tag(), "file_writer");
}

#[test]
fn unknown_tags_are_reported() {
    let registry = FactoryRegistry::new();
    assert!(matches!(
        registry.get("logger"),
        Err(Error::UnknownType { tag }) if tag == "logger"
    ));
}

#[test]
fn alias_to_unknown_tag_is_refused() {
    let mut registry = FactoryRegistry::new();
    assert!(!registry.alias("Appender", "nothing"));
}

#[test]
fn properties_documents_accept_legacy_names() {
    let text = "
key_set = legacy
logger.r.name = root
logger.r.level = ERROR
logger.r.ConsoleAppender.c.logToStdErr = true
logger.r.ConsoleAppender.c.PatternLayout.p.ConversionPattern = %p %m%n
";
    let (loggers, result) = configure(text, Format::Properties);
    result.unwrap();
    assert_eq!(loggers.root().writers().len(), 1);
}

/// Upper-cases the message; stands in for a user-supplied formatter.
#[derive(Debug)]
struct ShoutFormatter {
    suffix: String,
}

impl Formatter for ShoutFormatter {
    fn format(&self, event: &LogEvent) -> String {
        format!("{}{}", event.message.to_uppercase(), self.suffix)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

struct ShoutMemento {
    handlers: HandlerTable<Self>,
    suffix: String,
}

impl HandlesScalars for ShoutMemento {
    fn handlers(&self) -> &HandlerTable<Self> {
        &self.handlers
    }
}

impl Memento for ShoutMemento {
    fn type_name(&self) -> &'static str {
        ShoutFormatterFactory::TAG
    }

    fn accept_scalar(&mut self, policy: &SecurityPolicy, key: &str, value: &str) -> Result<()> {
        dispatch_scalar(self, ShoutFormatterFactory::TAG, policy, key, value)
    }

    fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
        self
    }
}

struct ShoutFormatterFactory;

impl ShoutFormatterFactory {
    const TAG: &'static str = "shout_formatter";
    const SUFFIX_KEY: &'static str = "shout_formatter::suffix";
}

impl ConfigurableFactory for ShoutFormatterFactory {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn create_memento(&self, ctx: &mut MementoContext<'_>) -> Box<dyn Memento> {
        ctx.policy.set_text(Self::SUFFIX_KEY, 4);
        let mut handlers: HandlerTable<ShoutMemento> = HandlerTable::new();
        handlers.register_handler("suffix", |m, policy, value| {
            m.suffix = policy.text(Self::SUFFIX_KEY, value)?;
            Ok(())
        });
        Box::new(ShoutMemento {
            handlers,
            suffix: "!".to_string(),
        })
    }

    fn create_configurable(
        &self,
        memento: Box<dyn Memento>,
        _ctx: &mut BuildContext<'_>,
    ) -> Result<Component> {
        let memento = downcast::<ShoutMemento>(memento, Self::TAG)?;
        Ok(Component::Formatter(Box::new(ShoutFormatter {
            suffix: memento.suffix,
        })))
    }
}

fn shout_registry() -> FactoryRegistry {
    let mut registry = FactoryRegistry::with_defaults();
    registry.register(ShoutFormatterFactory);
    registry
}

#[test]
fn custom_factories_plug_into_resolution() {
    let doc = "
logger:
  name: app
  console_writer:
    shout_formatter:
      suffix: '?!'
";
    let loggers = LoggerRegistry::new();
    Configurator::new(shout_registry())
        .configure_text(doc, Format::Yaml, &loggers)
        .unwrap();

    let writer = &loggers.get("app").unwrap().writers()[0];
    let event = LogEvent::new("app", loomlog::Level::Info, "hi");
    assert_eq!(writer.formatter().format(&event), "HI?!");
}

#[test]
fn custom_factory_constraints_are_enforced() {
    let doc = "
logger:
  name: app
  console_writer:
    shout_formatter:
      suffix: '!!!!!'
";
    let loggers = LoggerRegistry::new();
    let result = Configurator::new(shout_registry()).configure_text(doc, Format::Yaml, &loggers);
    assert!(matches!(
        result,
        Err(Error::Validation { key, .. }) if key == "shout_formatter::suffix"
    ));
}

mod common;

use common::{configure, yaml};
use loomlog::{
    ConfigNode, Configurator, ConfiguratorOptions, ConfiguratorState, Document, Error, Format,
    Level, LoggerRegistry,
};

#[test]
fn unknown_type_names_the_tag() {
    let (_, result) = yaml("loger:\n  name: app\n");
    match result {
        Err(Error::UnknownType { tag }) => assert_eq!(tag, "loger"),
        other => panic!("expected UnknownType, got {other:?}"),
    }
}

#[test]
fn writer_without_formatter_is_rejected() {
    let doc = "
logger:
  name: app
  console_writer:
    name: out
";
    match yaml(doc).1 {
        Err(Error::RequiredField { owner, field }) => {
            assert_eq!(owner, "console_writer");
            assert_eq!(field, "formatter");
        }
        other => panic!("expected RequiredField, got {other:?}"),
    }
}

#[test]
fn top_level_non_logger_is_a_wiring_error() {
    let doc = "
pattern_formatter:
  pattern: '%m'
";
    match yaml(doc).1 {
        Err(Error::Wiring { parent, .. }) => assert_eq!(parent, "document"),
        other => panic!("expected Wiring, got {other:?}"),
    }
}

#[test]
fn misplaced_child_is_a_wiring_error() {
    let doc = "
logger:
  name: app
  pattern_formatter:
    pattern: '%m'
";
    match yaml(doc).1 {
        Err(Error::Wiring { parent, offered }) => {
            assert_eq!(parent, "logger");
            assert!(offered.contains("PatternFormatter"));
        }
        other => panic!("expected Wiring, got {other:?}"),
    }
}

#[test]
fn overlong_values_fail_validation() {
    let doc = format!("logger:\n  name: {}\n", "x".repeat(300));
    match yaml(&doc).1 {
        Err(Error::Validation { key, .. }) => assert_eq!(key, "logger::name"),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn empty_level_is_an_invalid_value_not_a_type() {
    for doc in ["logger:\n  name: app\n  level:\n", "logger:\n  name: app\n  level: ~\n"] {
        match yaml(doc).1 {
            Err(Error::InvalidValue { key, value, .. }) => {
                assert_eq!(key, "logger::level");
                assert_eq!(value, "");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }
}

#[test]
fn empty_unknown_key_is_ignored() {
    let (loggers, result) = yaml("logger:\n  name: app\n  foo:\n  level: warn\n");
    result.unwrap();
    assert_eq!(loggers.get("app").unwrap().level(), Some(Level::Warn));
}

#[test]
fn bad_level_is_an_invalid_value() {
    match yaml("logger:\n  name: app\n  level: loud\n").1 {
        Err(Error::InvalidValue { key, .. }) => assert_eq!(key, "logger::level"),
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn nesting_beyond_the_limit_fails() {
    let document = Document::new(vec![
        ConfigNode::new("logger").entry("name", "app").child(
            ConfigNode::new("console_writer")
                .child(ConfigNode::new("pattern_formatter").entry("pattern", "%m")),
        ),
    ]);
    let loggers = LoggerRegistry::new();
    let mut configurator = Configurator::default().with_options(ConfiguratorOptions {
        max_depth: 1,
        ..ConfiguratorOptions::default()
    });

    match configurator.configure(&document, &loggers) {
        Err(Error::NestingTooDeep { depth, max }) => {
            assert_eq!(depth, 2);
            assert_eq!(max, 1);
        }
        other => panic!("expected NestingTooDeep, got {other:?}"),
    }
    assert_eq!(*configurator.state(), ConfiguratorState::Failed);
}

#[test]
fn hostile_properties_nesting_is_refused_before_resolution() {
    let text = format!("{}name = x\n", "logger.a.".repeat(2000));
    let loggers = LoggerRegistry::new();
    let mut configurator = Configurator::default();

    match configurator.configure_text(&text, Format::Properties, &loggers) {
        Err(Error::NestingTooDeep { depth, max }) => {
            assert_eq!(depth, 1999);
            assert_eq!(max, 32);
        }
        other => panic!("expected NestingTooDeep, got {other:?}"),
    }
    assert_eq!(*configurator.state(), ConfiguratorState::Failed);
    assert_eq!(loggers.names(), vec![String::new()]);
}

#[test]
fn failed_run_leaves_registry_untouched() {
    let loggers = LoggerRegistry::new();
    let mut configurator = Configurator::default();
    configurator
        .configure_text(
            "logger:\n  name: root\n  level: warn\n",
            Format::Yaml,
            &loggers,
        )
        .unwrap();
    assert_eq!(*configurator.state(), ConfiguratorState::Committed);

    let broken = "
logger:
  - name: root
    level: trace
  - name: other
    bogus_writer: {}
";
    assert!(
        configurator
            .configure_text(broken, Format::Yaml, &loggers)
            .is_err()
    );
    assert_eq!(loggers.root().level(), Some(Level::Warn));
    assert!(loggers.get("other").is_none());
}

#[test]
fn successful_rerun_replaces_previous_configuration() {
    let loggers = LoggerRegistry::new();
    let mut configurator = Configurator::default();
    configurator
        .configure_text(
            "logger:\n  name: root\n  level: warn\n",
            Format::Yaml,
            &loggers,
        )
        .unwrap();
    let root = loggers.root();

    configurator
        .configure_text(
            "logger:\n  name: net\n  level: debug\n",
            Format::Yaml,
            &loggers,
        )
        .unwrap();
    assert_eq!(root.level(), None);
    assert_eq!(loggers.get("net").unwrap().level(), Some(Level::Debug));
}

fn parse_position(text: &str, format: Format) -> (&'static str, usize, usize) {
    match configure(text, format).1 {
        Err(Error::Parse {
            format,
            line,
            column,
            ..
        }) => (format, line, column),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn yaml_syntax_errors_carry_a_position() {
    let (format, line, _) = parse_position("logger:\n  name: [app\n", Format::Yaml);
    assert_eq!(format, "yaml");
    assert!(line >= 2);
}

#[test]
fn json_syntax_errors_carry_a_position() {
    let (format, line, column) =
        parse_position("{\n  \"logger\": {\n    \"name\" \"app\"\n  }\n}", Format::Json);
    assert_eq!(format, "json");
    assert_eq!(line, 3);
    assert!(column > 0);
}

#[test]
fn toml_syntax_errors_carry_a_position() {
    let (format, line, column) = parse_position("[logger]\nname = \n", Format::Toml);
    assert_eq!(format, "toml");
    assert_eq!(line, 2);
    assert!(column > 0);
}

#[test]
fn properties_syntax_errors_carry_a_position() {
    let text = "# comment\nlogger.main.name = app\n  logger.main.level\n";
    assert_eq!(
        parse_position(text, Format::Properties),
        ("properties", 3, 3)
    );
}

#[test]
fn properties_paths_need_tag_id_pairs() {
    let (_, line, _) = parse_position("logger.name = app\n", Format::Properties);
    assert_eq!(line, 1);
}

mod common;

use common::{quoted, yaml};
use loomlog::security::{Constraint, SecurityPolicy};
use loomlog::{
    Configurator, ConfiguratorOptions, Error, Format, KeySet, Level, LoggerRegistry,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn registering_the_same_bound_twice_is_harmless() {
    let mut policy = SecurityPolicy::new();
    policy.set_numeric("file_compressor::min_index", 1, 1000);
    policy.set_numeric("file_compressor::min_index", 1, 1000);
    assert_eq!(
        policy.constraint("file_compressor::min_index"),
        Some(Constraint::Integer { min: 1, max: 1000 })
    );
    assert_eq!(policy.integer("file_compressor::min_index", "1000").unwrap(), 1000);
    assert!(policy.integer("file_compressor::min_index", "0").is_err());
}

#[test]
fn unregistered_keys_are_refused() {
    let policy = SecurityPolicy::new();
    assert!(matches!(
        policy.validate_text("nobody::registered", "x"),
        Err(Error::UnregisteredConstraint { .. })
    ));
}

#[test]
fn configurator_policy_records_memento_constraints() {
    let loggers = LoggerRegistry::new();
    let mut configurator = Configurator::default();
    configurator
        .configure_text("logger:\n  name: app\n", Format::Yaml, &loggers)
        .unwrap();
    assert_eq!(
        configurator.policy().constraint("logger::name"),
        Some(Constraint::Text { max_len: 256 })
    );
}

fn rolling_with_compressor(dir: &TempDir, compressor: &str) -> String {
    format!(
        r#"
logger:
  name: app
  rolling_file_writer:
    file_name: {}
    pattern_formatter: {{ pattern: "%m%n" }}
    size_file_roll_trigger: {{ max_size: 10MB }}
    numbered_file_roller:
      max_index: 3
      {compressor}:
        min_index: 0
"#,
        quoted(&dir.path().join("app.log"))
    )
}

#[test]
fn zlib_rejects_min_index_zero() {
    let tmp = TempDir::new().unwrap();
    match yaml(&rolling_with_compressor(&tmp, "zlib_file_compressor")).1 {
        Err(Error::Validation { key, value, .. }) => {
            assert_eq!(key, "file_compressor::min_index");
            assert_eq!(value, "0");
        }
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[test]
fn gzip_clamps_min_index_zero_with_a_warning() {
    let tmp = TempDir::new().unwrap();
    let (_, result) = yaml(&rolling_with_compressor(&tmp, "gzip_file_compressor"));
    let report = result.unwrap();

    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, Level::Warn);
    assert_eq!(warnings[0].origin, "gzip_file_compressor");
    assert!(warnings[0].message.contains("min_index"));
}

fn legacy_file_doc(path: &std::path::Path, append: bool) -> String {
    format!(
        r#"
key_set: legacy
logger:
  name: app
  additivity: false
  FileAppender:
    File: {}
    Append: {append}
    ImmediateFlush: true
    PatternLayout:
      ConversionPattern: "%m%n"
"#,
        quoted(path)
    )
}

#[test]
fn legacy_append_false_truncates() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.log");
    fs::write(&path, "old\n").unwrap();

    let (loggers, result) = yaml(&legacy_file_doc(&path, false));
    assert_eq!(result.unwrap().key_set, KeySet::Legacy);
    loggers.get_or_create("app").info("new");
    assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
}

#[test]
fn legacy_append_true_keeps_existing_content() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.log");
    fs::write(&path, "old\n").unwrap();

    let (loggers, result) = yaml(&legacy_file_doc(&path, true));
    result.unwrap();
    loggers.get_or_create("app").info("new");
    assert_eq!(fs::read_to_string(&path).unwrap(), "old\nnew\n");
}

#[test]
fn native_keys_are_unknown_under_the_legacy_set() {
    let doc = "
key_set: legacy
logger:
  name: app
  writes_to_ancestors: false
";
    let (loggers, result) = yaml(doc);
    result.unwrap();
    assert!(loggers.get("app").unwrap().writes_to_ancestors());
}

#[test]
fn options_override_the_document_key_set() {
    let doc = "
key_set: legacy
logger:
  name: app
  writes_to_ancestors: false
";
    let loggers = LoggerRegistry::new();
    let mut configurator = Configurator::default().with_options(ConfiguratorOptions {
        key_set: Some(KeySet::Native),
        ..ConfiguratorOptions::default()
    });
    let report = configurator
        .configure_text(doc, Format::Yaml, &loggers)
        .unwrap();
    assert_eq!(report.key_set, KeySet::Native);
    assert!(!loggers.get("app").unwrap().writes_to_ancestors());
}

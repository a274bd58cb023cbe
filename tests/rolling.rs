mod common;

use common::{quoted, yaml};
use flate2::read::GzDecoder;
use loomlog::Error;
use std::fs;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

const LINE: &str = "0123456789";

fn rolling_doc(active: &Path, roller: &str) -> String {
    format!(
        r#"
logger:
  name: app
  rolling_file_writer:
    file_name: {}
    pattern_formatter: {{ pattern: "%m%n" }}
    size_file_roll_trigger: {{ max_size: 10 }}
{roller}
"#,
        quoted(active)
    )
}

#[test]
fn numbered_roller_shifts_and_drops_old_files() {
    let tmp = TempDir::new().unwrap();
    let active = tmp.path().join("app.log");
    let roller = "    numbered_file_roller: { max_index: 2 }";
    let (loggers, result) = yaml(&rolling_doc(&active, roller));
    result.unwrap();

    let app = loggers.get_or_create("app");
    for i in 0..4 {
        app.info(&format!("{LINE}{i}"));
    }

    assert_eq!(fs::read_to_string(&active).unwrap(), format!("{LINE}3\n"));
    assert_eq!(
        fs::read_to_string(tmp.path().join("app.log.1")).unwrap(),
        format!("{LINE}2\n")
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("app.log.2")).unwrap(),
        format!("{LINE}1\n")
    );
    assert!(!tmp.path().join("app.log.3").exists());
}

#[test]
fn rolled_files_are_gzipped() {
    let tmp = TempDir::new().unwrap();
    let active = tmp.path().join("app.log");
    let roller = "    numbered_file_roller:\n      max_index: 3\n      gzip_file_compressor: { min_index: 1 }";
    let (loggers, result) = yaml(&rolling_doc(&active, roller));
    result.unwrap();

    let app = loggers.get_or_create("app");
    for i in 0..3 {
        app.info(&format!("{LINE}{i}"));
    }

    assert!(!tmp.path().join("app.log.1").exists());
    let mut text = String::new();
    GzDecoder::new(fs::File::open(tmp.path().join("app.log.1.gz")).unwrap())
        .read_to_string(&mut text)
        .unwrap();
    assert_eq!(text, format!("{LINE}1\n"));
    assert!(tmp.path().join("app.log.2.gz").exists());
}

#[test]
fn numbered_roller_needs_a_trigger() {
    let tmp = TempDir::new().unwrap();
    let doc = format!(
        r#"
logger:
  name: app
  rolling_file_writer:
    file_name: {}
    pattern_formatter: {{ pattern: "%m%n" }}
    numbered_file_roller: {{ max_index: 2 }}
"#,
        quoted(&tmp.path().join("app.log"))
    );
    match yaml(&doc).1 {
        Err(Error::RequiredField { field, .. }) => assert_eq!(field, "trigger"),
        other => panic!("expected RequiredField, got {other:?}"),
    }
}

#[test]
fn time_roller_is_its_own_trigger() {
    let tmp = TempDir::new().unwrap();
    let doc = format!(
        r#"
logger:
  name: app
  rolling_file_writer:
    file_name: {}
    pattern_formatter: {{ pattern: "%m%n" }}
    time_file_roller:
      period: day
      max_history: 7
"#,
        quoted(&tmp.path().join("app.log"))
    );
    let (loggers, result) = yaml(&doc);
    result.unwrap();
    loggers.get_or_create("app").info("today");
    assert_eq!(
        fs::read_to_string(tmp.path().join("app.log")).unwrap(),
        "today\n"
    );
}

#[test]
fn min_index_above_max_index_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let roller = "    numbered_file_roller: { min_index: 5, max_index: 2 }";
    match yaml(&rolling_doc(&tmp.path().join("app.log"), roller)).1 {
        Err(Error::InvalidValue { key, .. }) => {
            assert_eq!(key, "numbered_file_roller::min_index");
        }
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn size_trigger_rejects_unparsable_sizes() {
    let tmp = TempDir::new().unwrap();
    let doc = rolling_doc(&tmp.path().join("app.log"), "    numbered_file_roller: { max_index: 2 }")
        .replace("max_size: 10", "max_size: lots");
    assert!(matches!(yaml(&doc).1, Err(Error::InvalidValue { .. })));
}

#[test]
fn time_roller_rejects_unrenderable_suffixes() {
    let tmp = TempDir::new().unwrap();
    for pattern in ["%Q", "%Y/%m"] {
        let roller = format!(
            "    time_file_roller: {{ period: day, max_history: 7, file_name_pattern: '{pattern}' }}"
        );
        match yaml(&rolling_doc(&tmp.path().join("app.log"), &roller)).1 {
            Err(Error::InvalidValue { key, value, .. }) => {
                assert_eq!(key, "time_file_roller::file_name_pattern");
                assert_eq!(value, pattern);
            }
            other => panic!("expected InvalidValue for {pattern}, got {other:?}"),
        }
    }
}

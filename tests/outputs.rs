mod common;

use common::{quoted, yaml};
use loomlog::{Configurator, Error, Format, LoggerRegistry, QueueHub};
use std::fs;
use tempfile::TempDir;

fn queue_doc(serializer: &str) -> String {
    format!(
        r#"
logger:
  name: audit
  queue_writer:
    topic: audit-events
    exchange: logs
    durable: "true"
    pattern_formatter: {{ pattern: "%p|%m" }}
    {serializer}: {{}}
"#
    )
}

fn configure_with_hub(text: &str, hub: &QueueHub) -> LoggerRegistry {
    let loggers = LoggerRegistry::new();
    Configurator::default()
        .with_queue_hub(hub.clone())
        .configure_text(text, Format::Yaml, &loggers)
        .unwrap();
    loggers
}

#[test]
fn queue_writer_publishes_json_frames() {
    let hub = QueueHub::new();
    let rx = hub.subscribe("audit-events");
    let loggers = configure_with_hub(&queue_doc("json_serializer"), &hub);

    loggers.get_or_create("audit.login").warn("bad password");
    let message = rx.try_recv().unwrap();

    assert_eq!(message.topic, "audit-events");
    assert_eq!(message.properties.get("exchange").map(String::as_str), Some("logs"));
    assert_eq!(message.properties.get("durable").map(String::as_str), Some("true"));
    assert!(!message.properties.contains_key("topic"));

    let frame: serde_json::Value = serde_json::from_slice(&message.payload).unwrap();
    assert_eq!(frame["level"], "warn");
    assert_eq!(frame["logger"], "audit.login");
    assert_eq!(frame["message"], "WARN|bad password");
    assert_eq!(frame["id"].as_str().unwrap().len(), 26);
}

#[test]
fn queue_writer_text_frames_are_the_formatted_line() {
    let hub = QueueHub::new();
    let rx = hub.subscribe("audit-events");
    let loggers = configure_with_hub(&queue_doc("text_serializer"), &hub);

    loggers.get_or_create("audit").error("denied");
    assert_eq!(rx.try_recv().unwrap().payload, b"ERROR|denied");
}

#[test]
fn queue_writer_requires_a_serializer() {
    let doc = r#"
logger:
  name: audit
  queue_writer:
    topic: t
    pattern_formatter: { pattern: "%m" }
"#;
    match yaml(doc).1 {
        Err(Error::RequiredField { field, .. }) => assert_eq!(field, "serializer"),
        other => panic!("expected RequiredField, got {other:?}"),
    }
}

fn filtered_file(tmp: &TempDir, filters: &str) -> (LoggerRegistry, std::path::PathBuf) {
    let path = tmp.path().join("filtered.log");
    let doc = format!(
        r#"
logger:
  name: root
  level: trace
  file_writer:
    file_name: {}
    pattern_formatter: {{ pattern: "%p %m%n" }}
{filters}
"#,
        quoted(&path)
    );
    let (loggers, result) = yaml(&doc);
    result.unwrap();
    (loggers, path)
}

#[test]
fn threshold_filter_drops_lower_levels() {
    let tmp = TempDir::new().unwrap();
    let (loggers, path) = filtered_file(&tmp, "    level_threshold_filter: { level: warn }");
    let root = loggers.root();
    root.info("skip");
    root.warn("keep");
    root.fatal("keep too");
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "WARN keep\nFATAL keep too\n"
    );
}

#[test]
fn level_filter_matches_exactly_one_level() {
    let tmp = TempDir::new().unwrap();
    let (loggers, path) = filtered_file(
        &tmp,
        "    level_filter: { level: debug, on_match: accept, on_mismatch: deny }",
    );
    let root = loggers.root();
    root.debug("yes");
    root.info("no");
    assert_eq!(fs::read_to_string(path).unwrap(), "DEBUG yes\n");
}

#[test]
fn regex_filter_keeps_matching_messages() {
    let tmp = TempDir::new().unwrap();
    let (loggers, path) = filtered_file(&tmp, r"    regex_filter: { regex: '^user \d+' }");
    let root = loggers.root();
    root.info("user 42 logged in");
    root.info("heartbeat");
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "INFO user 42 logged in\n"
    );
}

#[test]
fn regex_filter_rejects_bad_expressions() {
    let doc = r#"
logger:
  name: root
  console_writer:
    pattern_formatter: { pattern: "%m" }
    regex_filter: { regex: "(" }
"#;
    match yaml(doc).1 {
        Err(Error::InvalidValue { key, .. }) => assert_eq!(key, "regex_filter::regex"),
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn duplicate_filter_summarises_repeats_through_its_writer() {
    let tmp = TempDir::new().unwrap();
    let (loggers, path) = filtered_file(&tmp, "    duplicate_message_filter: {}");
    let root = loggers.root();
    root.info("same");
    root.info("same");
    root.info("same");
    root.info("different");
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "INFO same\nINFO The previous message was repeated 2 times\nINFO different\n"
    );
}

#[test]
fn failing_writer_does_not_starve_its_siblings() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "").unwrap();
    let good = tmp.path().join("good.log");
    let doc = format!(
        r#"
logger:
  name: app
  file_writer:
    - name: broken
      file_name: {}
      pattern_formatter: {{ pattern: "%m%n" }}
    - name: good
      file_name: {}
      pattern_formatter: {{ pattern: "%m%n" }}
"#,
        quoted(&blocker.join("app.log")),
        quoted(&good)
    );
    let (loggers, result) = yaml(&doc);
    result.unwrap();

    let app = loggers.get_or_create("app");
    app.info("still delivered");
    app.flush().unwrap();
    assert_eq!(fs::read_to_string(&good).unwrap(), "still delivered\n");
    assert!(!blocker.join("app.log").exists());
}

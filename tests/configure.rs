mod common;

use common::{configure, quoted, yaml};
use loomlog::{Format, Level};
use std::fs;
use tempfile::TempDir;

#[test]
fn root_logger_with_file_writer() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app.log");
    fs::write(&path, "earlier\n").unwrap();
    let doc = format!(
        r#"
logger:
  name: root
  level: INFO
  file_writer:
    file_name: {}
    on_start: append
    pattern_formatter:
      pattern: "%m%n"
"#,
        quoted(&path)
    );

    let (loggers, result) = yaml(&doc);
    let report = result.unwrap();
    assert_eq!(report.loggers, [""]);

    let root = loggers.root();
    assert_eq!(root.name(), "");
    assert_eq!(root.level(), Some(Level::Info));
    let writers = root.writers();
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0].formatter().pattern(), Some("%m%n"));

    root.info("hello");
    root.debug("hidden");
    root.flush().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "earlier\nhello\n");
}

#[test]
fn writers_keep_document_order() {
    let doc = r#"
logger:
  name: app
  console_writer:
    - name: A
      pattern_formatter: { pattern: "%m" }
    - name: B
      pattern_formatter: { pattern: "%m" }
    - name: C
      pattern_formatter: { pattern: "%m" }
"#;
    let (loggers, result) = yaml(doc);
    result.unwrap();

    let names: Vec<String> = loggers
        .get("app")
        .unwrap()
        .writers()
        .iter()
        .map(|w| w.name().to_string())
        .collect();
    assert_eq!(names, ["A", "B", "C"]);
}

#[test]
fn properties_blocks_keep_first_appearance_order() {
    let text = "\
logger.main.name = app
logger.main.console_writer.b.name = B
logger.main.console_writer.a.name = A
logger.main.console_writer.a.pattern_formatter.p.pattern = %m
logger.main.console_writer.b.pattern_formatter.p.pattern = %m
";
    let (loggers, result) = configure(text, Format::Properties);
    result.unwrap();

    let names: Vec<String> = loggers
        .get("app")
        .unwrap()
        .writers()
        .iter()
        .map(|w| w.name().to_string())
        .collect();
    assert_eq!(names, ["B", "A"]);
}

#[test]
fn unknown_keys_are_ignored() {
    let doc = r#"
logger:
  name: app
  foo: bar
  level: debug
"#;
    let (loggers, result) = yaml(doc);
    result.unwrap();
    assert_eq!(loggers.get("app").unwrap().level(), Some(Level::Debug));
}

#[test]
fn unknown_writer_keys_are_ignored() {
    let doc = r#"
logger:
  name: app
  console_writer:
    name: out
    foo: bar
    pattern_formatter: { pattern: "%m" }
"#;
    let (loggers, result) = yaml(doc);
    result.unwrap();
    let writers = loggers.get("app").unwrap().writers();
    assert_eq!(writers.len(), 1);
    assert_eq!(writers[0].name(), "out");
    assert_eq!(writers[0].formatter().pattern(), Some("%m"));
}

#[test]
fn variables_expand_in_values() {
    let tmp = TempDir::new().unwrap();
    let doc = format!(
        r#"
variables:
  LOG_DIR: {}
logger:
  name: app
  file_writer:
    file_name: "${{LOG_DIR}}/nested/app.log"
    pattern_formatter:
      pattern: "%p %m%n"
"#,
        quoted(tmp.path())
    );
    let (loggers, result) = yaml(&doc);
    result.unwrap();

    loggers.get_or_create("app").warn("disk low");
    let content = fs::read_to_string(tmp.path().join("nested").join("app.log")).unwrap();
    assert_eq!(content, "WARN disk low\n");
}

#[test]
fn child_loggers_write_through_ancestors() {
    let tmp = TempDir::new().unwrap();
    let root_log = tmp.path().join("root.log");
    let net_log = tmp.path().join("net.log");
    let doc = format!(
        r#"
logger:
  - name: root
    level: info
    file_writer:
      file_name: {}
      pattern_formatter: {{ pattern: "root %c %m%n" }}
  - name: net
    level: debug
    writes_to_ancestors: false
    file_writer:
      file_name: {}
      pattern_formatter: {{ pattern: "net %c %m%n" }}
"#,
        quoted(&root_log),
        quoted(&net_log)
    );
    let (loggers, result) = yaml(&doc);
    result.unwrap();

    loggers.get_or_create("net.http").debug("request");
    loggers.get_or_create("db").info("query");
    loggers.get_or_create("db").debug("dropped");

    assert_eq!(
        fs::read_to_string(&net_log).unwrap(),
        "net net.http request\n"
    );
    assert_eq!(fs::read_to_string(&root_log).unwrap(), "root db query\n");
}

#[test]
fn json_documents_configure_loggers() {
    let doc = r#"{
  "logger": {
    "name": "svc",
    "level": "error",
    "console_writer": {
      "stream": "stderr",
      "json_formatter": { "pretty": false, "time_zone": "utc" }
    }
  }
}"#;
    let (loggers, result) = configure(doc, Format::Json);
    result.unwrap();

    let svc = loggers.get("svc").unwrap();
    assert_eq!(svc.level(), Some(Level::Error));
    assert_eq!(svc.writers().len(), 1);
}

#[test]
fn toml_documents_configure_loggers() {
    let doc = r#"
[logger]
name = "svc"
level = "warn"

[logger.console_writer]
name = "out"

[logger.console_writer.pattern_formatter]
pattern = "%d %p %m%n"
"#;
    let (loggers, result) = configure(doc, Format::Toml);
    result.unwrap();

    let svc = loggers.get("svc").unwrap();
    assert_eq!(svc.level(), Some(Level::Warn));
    assert_eq!(svc.writers()[0].name(), "out");
}

#[test]
fn qualified_type_tags_resolve() {
    let doc = r#"
"loomlog::logger":
  name: app
  level: trace
"#;
    let (loggers, result) = yaml(doc);
    result.unwrap();
    assert_eq!(loggers.get("app").unwrap().level(), Some(Level::Trace));
}

#[test]
fn report_lists_configured_loggers() {
    let doc = r#"
logger:
  name: a.b
  level: info
"#;
    let (_, result) = yaml(doc);
    let report = result.unwrap();
    assert_eq!(report.loggers, ["", "a", "a.b"]);
    assert_eq!(report.warnings().count(), 0);
}

#![allow(dead_code)]

use loomlog::{ConfigurationReport, Configurator, Format, LoggerRegistry, Result};
use std::path::Path;

/// Configures a fresh registry from `text`.
pub fn configure(text: &str, format: Format) -> (LoggerRegistry, Result<ConfigurationReport>) {
    let loggers = LoggerRegistry::new();
    let result = Configurator::default().configure_text(text, format, &loggers);
    (loggers, result)
}

pub fn yaml(text: &str) -> (LoggerRegistry, Result<ConfigurationReport>) {
    configure(text, Format::Yaml)
}

/// Paths go into documents single-quoted.
pub fn quoted(path: &Path) -> String {
    format!("'{}'", path.display())
}

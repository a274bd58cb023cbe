use super::load;
use crate::cli::Source;
use crate::configurator::{Configurator, ConfiguratorOptions, DEFAULT_MAX_DEPTH};
use crate::logger::LoggerRegistry;
use crate::memento::KeySet;
use std::process::ExitCode;

/// Handles `loomlog check [PATH] [--format F] [--key-set K] [--max-depth N]`.
#[must_use]
pub fn cmd_check(source: &Source, key_set: Option<KeySet>, max_depth: Option<u32>) -> ExitCode {
    let document = match load(source) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let loggers = LoggerRegistry::new();
    let mut configurator = Configurator::default().with_options(ConfiguratorOptions {
        key_set,
        max_depth: max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
    });
    match configurator.configure(&document, &loggers) {
        Ok(report) => {
            println!("ok ({:?} keys)", report.key_set);
            for name in &report.loggers {
                if let Some(logger) = loggers.get(name) {
                    let shown = if name.is_empty() { "<root>" } else { name };
                    let writers: Vec<String> = logger
                        .writers()
                        .iter()
                        .map(|w| w.name().to_string())
                        .collect();
                    println!(
                        "  {shown}: level {}, writers [{}]",
                        logger.effective_level(),
                        writers.join(", ")
                    );
                }
            }
            for entry in report.warnings() {
                println!("  warning: {entry}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let source = Source {
            path: Some(dir.path().join("missing.yaml")),
            format: None,
        };
        assert_eq!(cmd_check(&source, None, None), ExitCode::FAILURE);
    }

    #[test]
    fn malformed_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.properties");
        std::fs::write(&path, "logger.main.name root\n").unwrap();
        let source = Source {
            path: Some(path),
            format: None,
        };
        assert_eq!(cmd_check(&source, None, None), ExitCode::FAILURE);
    }
}

use super::load;
use crate::cli::Source;
use crate::configurator::Configurator;
use crate::level::Level;
use crate::logger::LoggerRegistry;
use std::process::ExitCode;

/// Handles `loomlog log [--config PATH] [--logger NAME] <level> <message>...`.
#[must_use]
pub fn cmd_log(source: &Source, logger: &str, level: Level, message: &[String]) -> ExitCode {
    let loggers = LoggerRegistry::new();
    let result = load(source)
        .and_then(|doc| Configurator::default().configure(&doc, &loggers));
    if let Err(e) = result {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    let target = loggers.get_or_create(logger);
    target.log(level, &message.join(" "));
    // Flush up the chain; the message may have landed in an ancestor's writers.
    let mut current = Some(&target);
    while let Some(l) = current {
        if let Err(e) = l.flush() {
            eprintln!("error: flush failed: {e}");
            return ExitCode::FAILURE;
        }
        current = l.parent();
    }
    ExitCode::SUCCESS
}

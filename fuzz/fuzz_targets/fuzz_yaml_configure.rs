#![no_main]
use libfuzzer_sys::fuzz_target;
use loomlog::{Configurator, Format, LoggerRegistry};

fuzz_target!(|data: &str| {
    // Whatever the document, a run either commits or fails cleanly
    let loggers = LoggerRegistry::new();
    let _ = Configurator::default().configure_text(data, Format::Yaml, &loggers);
});

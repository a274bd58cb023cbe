#![no_main]
use libfuzzer_sys::fuzz_target;
use loomlog::fmt::{Formatter, PatternFormatter};
use loomlog::{Level, LogEvent};

fuzz_target!(|data: &str| {
    let formatter = PatternFormatter::new(data);
    let event = LogEvent::new("fuzz.target", Level::Warn, "message");
    let _ = formatter.format(&event);
});

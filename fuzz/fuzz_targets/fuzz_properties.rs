#![no_main]
use libfuzzer_sys::fuzz_target;
use loomlog::{Document, Format};

fuzz_target!(|data: &str| {
    // Must not panic on any input, malformed lines included
    let _ = Document::parse(data, Format::Properties);
});

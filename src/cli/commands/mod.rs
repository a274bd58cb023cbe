//! Subcommand implementations. Each prints problems to stderr and returns the process
//! exit code.

mod check;
mod log;
mod tree;
mod types;

pub use check::cmd_check;
pub use log::cmd_log;
pub use tree::cmd_tree;
pub use types::cmd_types;

use super::Source;
use crate::config::{self, Document};
use crate::error::{Error, Result};
use std::path::PathBuf;

/// The explicit path, or the first default location that exists.
fn resolve_path(source: &Source) -> Result<PathBuf> {
    source
        .path
        .clone()
        .or_else(config::default_config_path)
        .ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no document given and no loomlog.* found in the config directory",
            ))
        })
}

fn load(source: &Source) -> Result<Document> {
    let path = resolve_path(source)?;
    match source.format {
        Some(format) => Document::load_as(&path, format),
        None => Document::load(&path),
    }
}

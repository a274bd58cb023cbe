//! Configuration documents: the node tree the configurator walks, and the readers that
//! produce it from YAML, JSON, TOML and properties text.
//!
//! Readers do all the text work up front (syntax, reserved keys, `${VAR}` expansion) so
//! the configurator only ever sees plain tags, keys and values.

mod node;
mod properties;
mod tree;
mod vars;

pub use node::{ConfigNode, Document};
pub use vars::Variables;

use crate::error::{Error, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level key selecting the memento key set.
pub const KEY_SET_KEY: &str = "key_set";
/// Top-level block defining substitution variables.
pub const VARIABLES_KEY: &str = "variables";

/// Candidate file names, in lookup order, under `<config dir>/loomlog/`.
const DEFAULT_FILE_NAMES: [&str; 5] = [
    "loomlog.yaml",
    "loomlog.yml",
    "loomlog.json",
    "loomlog.toml",
    "loomlog.properties",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
    Toml,
    Properties,
}

impl Format {
    /// Guesses the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" | "conf" => Some(Self::Toml),
            "properties" | "props" | "cfg" => Some(Self::Properties),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Properties => "properties",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "properties" | "props" => Ok(Self::Properties),
            _ => Err(Error::invalid(
                "format",
                s,
                "expected yaml, json, toml or properties",
            )),
        }
    }
}

impl Document {
    /// # Errors
    /// `Parse` with the reader's line and column on malformed input.
    pub fn parse(text: &str, format: Format) -> Result<Self> {
        match format {
            Format::Yaml => tree::read_yaml(text),
            Format::Json => tree::read_json(text),
            Format::Toml => tree::read_toml(text),
            Format::Properties => properties::read(text),
        }
    }

    /// Reads and parses `path`, picking the format from its extension.
    ///
    /// # Errors
    /// `InvalidValue` for an unknown extension, `Io` when the file can't be read,
    /// `Parse` on malformed content.
    pub fn load(path: &Path) -> Result<Self> {
        let format = Format::from_path(path).ok_or_else(|| {
            Error::invalid(
                "format",
                &path.display().to_string(),
                "unrecognized file extension",
            )
        })?;
        Self::load_as(path, format)
    }

    /// # Errors
    /// `Io` when the file can't be read, `Parse` on malformed content.
    pub fn load_as(path: &Path, format: Format) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text, format)
    }
}

/// First existing `loomlog.*` file under the user's config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let dir = directories::BaseDirs::new()?.config_dir().join("loomlog");
    DEFAULT_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

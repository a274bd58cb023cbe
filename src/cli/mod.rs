//! Command-line front end: check, inspect and exercise configuration documents.

pub mod commands;

use crate::config::Format;
use crate::level::Level;
use crate::memento::KeySet;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// loomlog - check and inspect logging configuration documents.
#[derive(Parser)]
#[command(name = "loomlog", version, about = "Check and inspect logging configuration documents")]
pub struct Cli {
    /// Print the library's own status messages down to this level
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    pub status_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

/// Where a document comes from and how to read it.
#[derive(clap::Args, Debug, Clone)]
pub struct Source {
    /// Document to read (defaults to loomlog.* in the user config directory)
    pub path: Option<PathBuf>,
    /// Override the format implied by the file extension
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<Format>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve a document and report the loggers it configures.
    Check {
        #[command(flatten)]
        source: Source,
        /// Force the key set, ignoring the document's own choice
        #[arg(long, value_name = "KEY_SET")]
        key_set: Option<KeySet>,
        /// Deepest nesting accepted
        #[arg(long, value_name = "N")]
        max_depth: Option<u32>,
    },
    /// Print the node tree a document parses into.
    Tree {
        #[command(flatten)]
        source: Source,
    },
    /// Configure from a document, then emit one message.
    Log {
        /// Document to read (defaults to loomlog.* in the user config directory)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Override the format implied by the file extension
        #[arg(short, long, value_name = "FORMAT")]
        format: Option<Format>,
        /// Logger name (empty for the root)
        #[arg(short, long, default_value = "")]
        logger: String,
        /// Level of the message
        level: Level,
        /// Message words
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// List the type tags the default factory registry understands.
    Types,
}

pub use commands::{cmd_check, cmd_log, cmd_tree, cmd_types};

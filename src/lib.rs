//! `loomlog` - a logging library whose pipelines are assembled from declarative
//! configuration documents.
//!
//! A document is a tree of typed nodes. Each node is resolved by a factory: the factory
//! first creates a *memento*, which absorbs the node's scalar settings (every value is
//! checked against a [`SecurityPolicy`]) and the components built from its children.
//! Then the factory turns the memento into the live component: a logger, writer,
//! formatter, filter, roller, trigger, compressor or serializer.
//!
//! Resolution is all-or-nothing. Loggers are built into a staging registry, and that
//! registry is committed into yours only when the whole document resolved.
//!
//! # Example
//!
//! ```
//! use loomlog::{Configurator, Format, Level, LoggerRegistry};
//!
//! let yaml = r#"
//! logger:
//!   name: root
//!   level: INFO
//!   console_writer:
//!     stream: stdout
//!     pattern_formatter:
//!       pattern: "%d %p %c: %m%n"
//! "#;
//!
//! let loggers = LoggerRegistry::new();
//! let mut configurator = Configurator::default();
//! configurator.configure_text(yaml, Format::Yaml, &loggers).unwrap();
//!
//! assert_eq!(loggers.root().level(), Some(Level::Info));
//! loggers.get_or_create("app.net").info("connected");
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `loomlog` binary for checking and inspecting documents

pub mod compress;
pub mod config;
pub mod configurator;
pub mod error;
pub mod factory;
pub mod filter;
pub mod fmt;
pub mod internal;
pub mod level;
pub mod logger;
pub mod memento;
pub mod roll;
pub mod security;
pub mod serialize;
pub mod writer;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{ConfigNode, Document, Format, Variables};
pub use configurator::{ConfigurationReport, Configurator, ConfiguratorOptions, ConfiguratorState};
pub use error::{Error, Result};
pub use factory::{ConfigurableFactory, FactoryRegistry, StatusEntry};
pub use level::Level;
pub use logger::{LogEvent, Logger, LoggerRegistry};
pub use memento::{Capability, Component, KeySet, Memento};
pub use security::SecurityPolicy;
pub use writer::{QueueHub, QueueMessage, Writer};

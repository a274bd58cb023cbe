//! Usage:
//!   loomlog check [PATH] [--format F] [--key-set K] [--max-depth N]
//!   loomlog tree [PATH] [--format F]
//!   loomlog log [--config PATH] [--logger NAME] <level> <message>...
//!   loomlog types

use clap::Parser;
use loomlog::cli::{Cli, Command, Source, cmd_check, cmd_log, cmd_tree, cmd_types};
use loomlog::internal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    internal::init(cli.status_level);

    match cli.command {
        Command::Check {
            source,
            key_set,
            max_depth,
        } => cmd_check(&source, key_set, max_depth),
        Command::Tree { source } => cmd_tree(&source),
        Command::Log {
            config,
            format,
            logger,
            level,
            message,
        } => cmd_log(
            &Source {
                path: config,
                format,
            },
            &logger,
            level,
            &message,
        ),
        Command::Types => cmd_types(),
    }
}

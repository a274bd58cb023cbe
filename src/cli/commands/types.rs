use crate::factory::FactoryRegistry;
use std::process::ExitCode;

/// Handles `loomlog types`.
#[must_use]
pub fn cmd_types() -> ExitCode {
    for tag in FactoryRegistry::with_defaults().tags() {
        println!("{tag}");
    }
    ExitCode::SUCCESS
}

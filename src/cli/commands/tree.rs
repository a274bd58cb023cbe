use super::load;
use crate::cli::Source;
use crate::config::ConfigNode;
use std::process::ExitCode;

fn print_node(node: &ConfigNode, indent: usize) {
    let pad = "  ".repeat(indent);
    println!("{pad}{}", node.tag);
    for (key, value) in &node.entries {
        println!("{pad}  {key} = {value}");
    }
    for child in &node.children {
        print_node(child, indent + 1);
    }
}

/// Handles `loomlog tree [PATH] [--format F]`.
#[must_use]
pub fn cmd_tree(source: &Source) -> ExitCode {
    let document = match load(source) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(key_set) = document.key_set {
        println!("key_set = {key_set:?}");
    }
    for (name, value) in document.variables.iter() {
        println!("${name} = {value}");
    }
    for root in &document.roots {
        print_node(root, 0);
    }
    ExitCode::SUCCESS
}

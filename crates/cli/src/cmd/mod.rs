//! CLI command implementations
//!
//! This module contains all command implementations for the hookwright CLI.

pub mod merge;
pub mod resolve;
pub mod symlink;
pub mod validate;

use hookwright_engine::Operation;
use owo_colors::OwoColorize;

/// Print the writes a dry run recorded, one per line, to stderr
pub(crate) fn print_operations(operations: &[Operation]) {
    if operations.is_empty() {
        eprintln!("{}", "No filesystem changes".dimmed());
        return;
    }

    for op in operations {
        let line = match op {
            Operation::WriteFile { path, size } => format!("write   {path} ({size} bytes)"),
            Operation::CreateFile { path, size } => format!("create  {path} ({size} bytes)"),
            Operation::CreateDir { path } => format!("mkdir   {path}"),
            Operation::Symlink { link, target } => {
                format!("link    {link} -> {}", target.display())
            }
            Operation::RemoveSymlink { link } => format!("unlink  {link}"),
            Operation::Rename { from, to } => format!("rename  {from} -> {to}"),
            Operation::ReplaceSymlink { link, target } => {
                format!("relink  {link} -> {}", target.display())
            }
        };
        eprintln!("{} {}", "would".yellow(), line);
    }
}

//! Hookwright CLI library
//!
//! This library contains all the CLI logic for hookwright, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod stats;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use command::Command;
use common::RuntimeContext;

/// Hookwright - provision agent hook settings without clobbering local edits
#[derive(Parser)]
#[command(name = "hookwright")]
#[command(about = "Merge a hook settings template into your local settings")]
#[command(version)]
#[command(long_about = "Merge a hook settings template into your local settings

Resolves a settings template against a source checkout, merges it into an
existing settings file without losing local customizations, and keeps the
shared docs and skills symlinked into the install directory.

Every operation is idempotent: running it again changes nothing.")]
pub struct Cli {
    /// Path to the source directory holding the template and hook scripts
    #[arg(long, env = "HOOKWRIGHT_SOURCE_DIR", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, env = "HOOKWRIGHT_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "HOOKWRIGHT_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for hookwright CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved settings template
    Resolve(cmd::resolve::ResolveCommand),

    /// Merge the resolved template into the target settings file
    #[command(long_about = "Merge the resolved template into the target settings file

The existing file is backed up next to itself before it is replaced.
Hooks and permissions from the template are added; every other setting
already present in the target is left as it is.

Examples:
  • hookwright merge
      → Merge into ~/.claude/settings.json

  • hookwright merge --dry-run
      → Print the merged settings without writing anything

  • hookwright merge --target ./settings.json
      → Merge into a specific file")]
    Merge(cmd::merge::MergeCommand),

    /// Check that every hook command in the template exists
    Validate(cmd::validate::ValidateCommand),

    /// Link shared docs, rules and skills into the install directory
    Symlink(cmd::symlink::SymlinkCommand),
}

/// Main entry point for the CLI logic
///
/// # Errors
///
/// Returns an error if logging cannot be initialized, the source directory
/// or configuration cannot be resolved, or the command fails.
pub fn run(cli: Cli) -> Result<()> {
    hookwright_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let source_dir = determine_source_dir(cli.source.as_deref())?;
    let config = load_config(cli.config.as_deref(), &source_dir)?;
    let context = RuntimeContext::new(config, &source_dir)?;

    execute_command(cli.command, &context)
}

/// Source directory from the CLI, or the current directory
fn determine_source_dir(source: Option<&Path>) -> Result<PathBuf> {
    match source {
        Some(dir) => Ok(hookwright_config::expand_tilde(dir)),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}

/// Load an explicit config file, or `.hookwright.toml` from the source root
fn load_config(config_path: Option<&Path>, source_dir: &Path) -> Result<hookwright_config::Config> {
    match config_path {
        Some(path) => hookwright_config::Config::load(hookwright_config::expand_tilde(path))
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => hookwright_config::Config::load_from_source(source_dir)
            .context("Failed to load configuration"),
    }
}

/// Execute the command based on the command type
fn execute_command(command: Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Resolve(resolve_cmd) => resolve_cmd.execute(context)?,
        Commands::Merge(merge_cmd) => merge_cmd.execute(context)?,
        Commands::Validate(validate_cmd) => validate_cmd.execute(context)?,
        Commands::Symlink(symlink_cmd) => symlink_cmd.execute(context)?,
    }

    Ok(())
}

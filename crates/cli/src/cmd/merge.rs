//! Merge command implementation
//!
//! Reconcile the resolved template into the target settings file.

use clap::Args;
use hookwright_engine::{
    ConfigDocument, DryRunSystem, RealSystem, ReconcileOutcome, reconcile, validate,
};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Merge the resolved template into the target settings file
#[derive(Debug, Clone, Args)]
pub struct MergeCommand {
    /// Template file (default: <source>/settings.template.json)
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Settings file to merge into (default: <install-dir>/settings.json)
    #[arg(long, value_name = "FILE")]
    pub target: Option<PathBuf>,

    /// Dry run - print the merged settings without writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Command for MergeCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let template = context.load_template(self.template.as_deref())?;
        let target = context.target_path(self.target.as_deref())?;

        let outcome = if self.dry_run {
            let system = DryRunSystem::new();
            let outcome = reconcile(&system, &target, &template)?;

            let json = outcome.document.to_json_pretty()?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(json.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(CommandError::Output)?;
            super::print_operations(&system.operations());
            outcome
        } else {
            let outcome = reconcile(&RealSystem, &target, &template)?;
            print_outcome(&outcome);
            outcome
        };

        if context.config.merge.validate_after_merge {
            warn_missing_paths(&outcome.document);
        }

        Ok(())
    }
}

fn print_outcome(outcome: &ReconcileOutcome) {
    if let Some(backup) = &outcome.backup {
        println!("{} Backed up to {}", "●".bright_blue(), backup.dimmed());
    }

    if outcome.created {
        println!(
            "{} Created {}",
            "✓".bright_green(),
            outcome.target.bright_white()
        );
    } else if outcome.changed {
        println!(
            "{} Merged template into {}",
            "✓".bright_green(),
            outcome.target.bright_white()
        );
    } else {
        println!(
            "{} {} already up to date",
            "✓".bright_green(),
            outcome.target.bright_white()
        );
    }
}

// Missing hook commands are reported but do not fail a merge
fn warn_missing_paths(document: &ConfigDocument) {
    let errors = validate(document);
    if errors.is_empty() {
        return;
    }

    warn!(count = errors.len(), "Merged settings reference missing hook commands");
    for error in &errors {
        eprintln!("{} {}", "⚠".yellow(), error);
    }
}

//! Symlink command implementation
//!
//! Link the shared docs, rules and skills from the source root into the
//! install directory.

use clap::Args;
use hookwright_engine::{
    DryRunSystem, LinkOutcome, LinkStatus, ProvisionReport, RealSystem, default_specs, provision,
};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::stats::LinkStats;

/// Link shared docs, rules and skills into the install directory
#[derive(Debug, Clone, Args)]
pub struct SymlinkCommand {
    /// Directory to create the links in (default: ~/.claude)
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<PathBuf>,

    /// Dry run - show what would be linked
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

impl Command for SymlinkCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let install_dir = context.install_dir(self.install_dir.as_deref())?;
        let specs = default_specs()?;

        let report = if self.dry_run {
            let system = DryRunSystem::new();
            let report = provision(&system, &install_dir, context.source_root(), &specs)?;
            super::print_operations(&system.operations());
            report
        } else {
            provision(&RealSystem, &install_dir, context.source_root(), &specs)?
        };

        print_report(&report);
        LinkStats::from_report(&report).print_summary(self.dry_run);

        report.ensure_no_conflicts()?;
        Ok(())
    }
}

fn print_report(report: &ProvisionReport) {
    for outcome in &report.outcomes {
        print_outcome(outcome);
    }
}

fn print_outcome(outcome: &LinkOutcome) {
    let LinkOutcome {
        link,
        target,
        status,
    } = outcome;

    match status {
        LinkStatus::Created => {
            println!("  {} {} → {}", "+".bright_green(), link, target.dimmed());
        }
        LinkStatus::Corrected { previous } => println!(
            "  {} {} → {} {}",
            "~".bright_yellow(),
            link,
            target.dimmed(),
            format!("(was {})", previous.display()).dimmed()
        ),
        LinkStatus::Unchanged => println!("  {} {}", "=".dimmed(), link.dimmed()),
        LinkStatus::Conflict { found } => println!(
            "  {} {} {}",
            "!".bright_red(),
            link,
            format!("({found} in the way)").bright_red()
        ),
    }
}

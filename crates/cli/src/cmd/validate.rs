//! Validate command implementation
//!
//! Check that every hook command in the resolved template exists on disk.

use clap::Args;
use hookwright_engine::validate_report;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Check that every hook command in the template exists
#[derive(Debug, Clone, Args)]
pub struct ValidateCommand {
    /// Template file (default: <source>/settings.template.json)
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,
}

impl Command for ValidateCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let document = context.load_template(self.template.as_deref())?;
        let report = validate_report(&document);

        if report.is_valid() {
            println!(
                "{} All {} hook paths valid",
                "✓".bright_green(),
                report.checked
            );
            return Ok(());
        }

        for error in &report.errors {
            eprintln!("{} {}", "✗".bright_red(), error);
        }

        Err(CommandError::ValidationFailed {
            missing: report.errors.len(),
            checked: report.checked,
        })
    }
}

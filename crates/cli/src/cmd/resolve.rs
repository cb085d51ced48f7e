//! Resolve command implementation
//!
//! Print the settings template with every placeholder replaced by the source root.

use clap::Args;
use hookwright_engine::{RealSystem, System};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::{RuntimeContext, absolutize};
use crate::error::{CommandError, Result};

/// Print the resolved settings template
#[derive(Debug, Clone, Args)]
pub struct ResolveCommand {
    /// Template file (default: <source>/settings.template.json)
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Write the resolved settings to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl Command for ResolveCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let document = context.load_template(self.template.as_deref())?;
        let json = document.to_json_pretty()?;

        match &self.output {
            Some(path) => {
                let output = absolutize(path)?;
                RealSystem.write_atomic(&output, json.as_bytes())?;
                println!(
                    "{} Wrote resolved settings to {}",
                    "✓".bright_green(),
                    output.bright_white()
                );
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout
                    .write_all(json.as_bytes())
                    .and_then(|()| stdout.flush())
                    .map_err(CommandError::Output)?;
            }
        }

        Ok(())
    }
}

//! Hook path validation
//!
//! Every hook `command` must name an existing regular file. The check never
//! stops at the first failure so one run reports every broken binding.

use crate::document::ConfigDocument;
use std::path::{Path, PathBuf};

/// A hook entry whose command is not an existing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Event type the hook is bound to
    pub event: String,
    /// Matcher pattern of the enclosing block
    pub matcher: Option<String>,
    /// The command path as written in the document
    pub command: PathBuf,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.matcher {
            Some(matcher) => write!(
                f,
                "{} [{}]: missing {}",
                self.event,
                matcher,
                self.command.display()
            ),
            None => write!(f, "{}: missing {}", self.event, self.command.display()),
        }
    }
}

/// Result of validating a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of hook entries inspected
    pub checked: usize,
    /// One entry per missing command
    pub errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// True when every command resolved
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check every hook command in `doc`
pub fn validate(doc: &ConfigDocument) -> Vec<ValidationError> {
    validate_report(doc).errors
}

/// Check every hook command in `doc`, also counting what was inspected
pub fn validate_report(doc: &ConfigDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    for binding in doc.hook_bindings() {
        report.checked += 1;
        let command = Path::new(&binding.entry.command);
        if command.is_file() {
            continue;
        }

        tracing::debug!(event = binding.event, command = %command.display(), "Hook command not found");
        report.errors.push(ValidationError {
            event: binding.event.to_string(),
            matcher: binding.matcher.map(str::to_string),
            command: command.to_path_buf(),
        });
    }

    report
}

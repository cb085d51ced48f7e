//! Error types for CLI commands
//!
//! This module defines structured error types using thiserror, providing better
//! type safety and error handling compared to using `anyhow::Error` everywhere.

use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// Settings engine failure (parse, backup, write, symlink)
    #[error(transparent)]
    Engine(#[from] hookwright_engine::Error),

    /// One or more hook commands do not exist
    #[error("Validation failed: {missing} of {checked} hook paths missing")]
    ValidationFailed {
        /// Number of missing commands
        missing: usize,
        /// Number of commands checked
        checked: usize,
    },

    /// Output could not be written to stdout
    #[error("Failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<hookwright_core::Error> for CommandError {
    fn from(err: hookwright_core::Error) -> Self {
        Self::Other(err.into())
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

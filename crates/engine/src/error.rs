//! Error types for hookwright-engine
//!
//! This module defines all error types used throughout the engine.
//! We use `thiserror` for structured error handling with good error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hookwright-engine
#[derive(Error, Debug)]
pub enum Error {
    /// Template file does not exist
    #[error("Template file not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// Template file exists but could not be read
    #[error("Failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A settings document could not be parsed
    ///
    /// Raised both for invalid JSON and for valid JSON with the wrong shape.
    #[error("Failed to parse settings {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// A settings document could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Error reading a file
    #[error("Failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a file
    #[error("Failed to write file {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the pre-merge backup
    #[error("Failed to create backup {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error creating a directory
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error with file metadata
    #[error("Failed to read metadata for {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error creating, reading or removing a symlink
    #[error("Symlink operation failed for {}: {source}", path.display())]
    Symlink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One or more link locations are occupied by something that is not a symlink
    #[error(
        "Refusing to replace non-symlink path(s): {}. Move them aside and re-run.",
        display_paths(paths)
    )]
    SymlinkConflict { paths: Vec<PathBuf> },

    /// Path is not absolute
    #[error("Path must be absolute: {}", path.display())]
    PathNotAbsolute { path: PathBuf },

    /// Path is not relative
    #[error("Path must be relative: {}", path.display())]
    PathNotRelative { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error with context
    #[error("{context}: {source}")]
    Other {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// Convert from hookwright_core::Error
impl From<hookwright_core::Error> for Error {
    fn from(err: hookwright_core::Error) -> Self {
        match err {
            hookwright_core::Error::PathNotAbsolute { path } => Error::PathNotAbsolute { path },
            hookwright_core::Error::PathNotRelative { path } => Error::PathNotRelative { path },
            hookwright_core::Error::Io(e) => Error::Io(e),
            _ => Error::Other {
                context: "Shared error".to_string(),
                source: Box::new(err),
            },
        }
    }
}

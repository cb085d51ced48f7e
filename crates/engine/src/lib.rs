//! # Hookwright Engine
//!
//! Settings reconciliation for agent configuration directories.
//!
//! This crate provides the pieces the `hookwright` CLI composes:
//!
//! - **Document**: Typed view over a settings file that preserves unknown keys
//! - **Resolve**: Placeholder substitution in settings templates
//! - **Merge**: Additive, idempotent merge of a template into existing settings
//! - **Reconcile**: Backup then atomic replacement of the target file
//! - **Validate**: Existence checks for every hook command
//! - **Symlink**: Provisioning of shared docs and skills into the install directory
//! - **System Abstraction**: Filesystem operations abstracted for dry runs and testing

pub mod document;
pub mod error;
pub mod merge;
pub mod reconcile;
pub mod resolve;
pub mod symlink;
pub mod system;
pub mod validate;

// Re-export path types from core
pub use hookwright_core::path::{AbsPath, RelPath};

pub use error::{Error, Result};

// Re-export commonly used types
pub use document::{ConfigDocument, HookEntry, MatcherBlock, PermissionCategory, Permissions};
pub use merge::merge;
pub use reconcile::{ReconcileOutcome, reconcile};
pub use resolve::{PLACEHOLDER, load_template, resolve_str, resolve_text};
pub use symlink::{LinkOutcome, LinkStatus, ProvisionReport, SymlinkSpec, default_specs, provision};
pub use system::{DryRunSystem, Operation, PathState, RealSystem, System};
pub use validate::{ValidationError, ValidationReport, validate, validate_report};

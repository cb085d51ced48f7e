//! Backup and write coordination
//!
//! Reconciling a target settings file means: parse what is there (refusing to
//! continue on malformed input), snapshot the raw bytes to a timestamped
//! sibling, merge the template in, and atomically replace the target.
//!
//! The backup and the final write are two separate steps. A crash in between
//! leaves an extra backup behind, never a half-written target.

use crate::document::ConfigDocument;
use crate::error::{Error, Result};
use crate::merge::merge;
use crate::system::{PathState, System};
use chrono::{DateTime, Local};
use hookwright_core::AbsPath;
use std::path::PathBuf;

/// Infix between the target file name and the timestamp
pub const BACKUP_INFIX: &str = ".backup.";

const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

// Upper bound on `-N` suffixes tried for one timestamp
const MAX_BACKUP_ATTEMPTS: usize = 1000;

/// Result of one reconcile run
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// File that was written
    pub target: AbsPath,
    /// Backup of the previous content, if there was a previous file
    pub backup: Option<AbsPath>,
    /// True when no file existed before
    pub created: bool,
    /// True when the merged document differs from the previous one
    pub changed: bool,
    /// The document that was written
    pub document: ConfigDocument,
}

/// Merge `template` into the settings file at `target`
pub fn reconcile(
    system: &dyn System,
    target: &AbsPath,
    template: &ConfigDocument,
) -> Result<ReconcileOutcome> {
    reconcile_at(system, target, template, Local::now())
}

/// [`reconcile`] with an explicit clock, used for backup naming
pub fn reconcile_at(
    system: &dyn System,
    target: &AbsPath,
    template: &ConfigDocument,
    now: DateTime<Local>,
) -> Result<ReconcileOutcome> {
    let write_path = match system.probe(target)? {
        // Write through a symlinked settings file instead of replacing the link
        PathState::Symlink { target: link_target } => {
            let resolved = match target.parent() {
                Some(parent) => parent.as_path().join(link_target),
                None => link_target,
            };
            tracing::debug!(link = %target, resolved = %resolved.display(), "Target is a symlink");
            AbsPath::new(resolved)?
        }
        _ => target.clone(),
    };

    let previous = match system.probe(&write_path)? {
        PathState::Absent => None,
        _ => {
            let raw = system.read_file(&write_path)?;
            let document = ConfigDocument::parse_named(&write_path, &raw)?;
            Some((raw, document))
        }
    };

    let (document, backup, created, changed) = match previous {
        None => {
            tracing::debug!(target = %write_path, "No existing settings, provisioning from template");
            (template.clone(), None, true, true)
        }
        Some((raw, existing)) => {
            let backup = write_backup(system, &write_path, &raw, now)?;
            tracing::info!(backup = %backup, "Backed up existing settings");

            let merged = merge(existing.clone(), template);
            let changed = merged != existing;
            (merged, Some(backup), false, changed)
        }
    };

    let content = document.to_json_pretty()?;
    system.write_atomic(&write_path, content.as_bytes())?;
    tracing::info!(target = %write_path, created, changed, "Wrote settings");

    Ok(ReconcileOutcome {
        target: write_path,
        backup,
        created,
        changed,
        document,
    })
}

/// Sibling backup path for `target` at `now`, before collision handling
pub fn backup_path(target: &AbsPath, now: DateTime<Local>) -> PathBuf {
    let name = target.file_name().unwrap_or("settings");
    let stamp = now.format(BACKUP_TIMESTAMP_FORMAT);
    target
        .as_path()
        .with_file_name(format!("{name}{BACKUP_INFIX}{stamp}"))
}

fn write_backup(
    system: &dyn System,
    target: &AbsPath,
    raw: &[u8],
    now: DateTime<Local>,
) -> Result<AbsPath> {
    let base = backup_path(target, now);

    for attempt in 0..MAX_BACKUP_ATTEMPTS {
        let candidate = if attempt == 0 {
            base.clone()
        } else {
            let mut name = base.clone().into_os_string();
            name.push(format!("-{attempt}"));
            PathBuf::from(name)
        };
        let candidate = AbsPath::new(candidate)?;

        match system.write_new(&candidate, raw) {
            Ok(()) => return Ok(candidate),
            Err(Error::FileWrite { source, .. })
                if source.kind() == std::io::ErrorKind::AlreadyExists =>
            {
                tracing::debug!(path = %candidate, "Backup name taken, trying next");
            }
            Err(Error::FileWrite { path, source }) => return Err(Error::Backup { path, source }),
            Err(e) => return Err(e),
        }
    }

    Err(Error::Backup {
        path: base,
        source: std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "too many backups with the same timestamp",
        ),
    })
}

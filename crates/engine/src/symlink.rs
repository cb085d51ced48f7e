//! Symlink provisioning
//!
//! Keeps a small fixed set of links under the install directory pointing into
//! the source root. Each link is reconciled independently:
//!
//! | found at link location        | action                 | status      |
//! |-------------------------------|------------------------|-------------|
//! | nothing                       | create link            | `Created`   |
//! | symlink to canonical target   | none                   | `Unchanged` |
//! | symlink to anything else      | relink in place        | `Corrected` |
//! | file, directory, other        | none, report conflict  | `Conflict`  |
//!
//! Conflicts never stop the remaining links from being processed and never
//! delete anything. I/O failures abort the run.

use crate::error::{Error, Result};
use crate::system::{PathState, System};
use hookwright_core::{AbsPath, RelPath};
use std::path::{Path, PathBuf};

/// One link to maintain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkSpec {
    /// Link location, relative to the install directory
    pub link: RelPath,
    /// Canonical target, relative to the source root
    pub target: RelPath,
}

impl SymlinkSpec {
    /// Create a spec from link name and target
    pub fn new(link: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            link: RelPath::new(link.into())?,
            target: RelPath::new(target.into())?,
        })
    }
}

/// The links every installation gets
///
/// - `CLAUDE.md`: shared agent documentation
/// - `rules`: rules directory
/// - `skills/verify`: the verify skill
pub fn default_specs() -> Result<Vec<SymlinkSpec>> {
    [
        ("CLAUDE.md", "CLAUDE.md"),
        ("rules", "rules"),
        ("skills/verify", ".claude/skills/verify"),
    ]
    .into_iter()
    .map(|(link, target)| SymlinkSpec::new(link, target))
    .collect()
}

/// Terminal state of one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    /// Link did not exist and was created
    Created,
    /// Link already pointed at the canonical target
    Unchanged,
    /// Link pointed elsewhere and was replaced
    Corrected {
        /// Target the link had before
        previous: PathBuf,
    },
    /// Location is occupied by something that is not a symlink
    Conflict {
        /// What was found there
        found: &'static str,
    },
}

/// Outcome for one spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    /// Absolute link location
    pub link: AbsPath,
    /// Absolute canonical target
    pub target: AbsPath,
    /// What happened
    pub status: LinkStatus,
}

/// Outcome of a whole provisioning run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// One entry per spec, in spec order
    pub outcomes: Vec<LinkOutcome>,
}

impl ProvisionReport {
    /// Outcomes that ended in a conflict
    pub fn conflicts(&self) -> impl Iterator<Item = &LinkOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, LinkStatus::Conflict { .. }))
    }

    /// True when the run touched the filesystem
    pub fn changed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o.status, LinkStatus::Created | LinkStatus::Corrected { .. }))
    }

    /// Turn recorded conflicts into an error naming every offending path
    pub fn ensure_no_conflicts(&self) -> Result<()> {
        let paths: Vec<PathBuf> = self
            .conflicts()
            .map(|o| o.link.as_path().to_path_buf())
            .collect();
        if paths.is_empty() {
            Ok(())
        } else {
            Err(Error::SymlinkConflict { paths })
        }
    }
}

/// Reconcile `specs` under `install_root`, pointing into `source_root`
pub fn provision(
    system: &dyn System,
    install_root: &AbsPath,
    source_root: &AbsPath,
    specs: &[SymlinkSpec],
) -> Result<ProvisionReport> {
    let mut report = ProvisionReport::default();

    for spec in specs {
        let link = install_root.join(&spec.link);
        let target = source_root.join(&spec.target);

        if !target.as_path().exists() {
            tracing::warn!(target = %target, "Link target does not exist, linking anyway");
        }

        let status = provision_one(system, &link, target.as_path())?;
        match &status {
            LinkStatus::Created => tracing::info!(link = %link, target = %target, "Created link"),
            LinkStatus::Unchanged => tracing::debug!(link = %link, "Link already correct"),
            LinkStatus::Corrected { previous } => tracing::info!(
                link = %link,
                previous = %previous.display(),
                target = %target,
                "Relinked"
            ),
            LinkStatus::Conflict { found } => {
                tracing::warn!(link = %link, found, "Refusing to replace non-symlink");
            }
        }

        report.outcomes.push(LinkOutcome {
            link,
            target,
            status,
        });
    }

    Ok(report)
}

fn provision_one(system: &dyn System, link: &AbsPath, target: &Path) -> Result<LinkStatus> {
    match system.probe(link)? {
        PathState::Absent => {
            if let Some(parent) = link.parent() {
                system.create_dir_all(&parent)?;
            }
            system.symlink(target, link)?;
            Ok(LinkStatus::Created)
        }
        PathState::Symlink { target: current } if current == target => Ok(LinkStatus::Unchanged),
        PathState::Symlink { target: current } => {
            system.replace_symlink(target, link)?;
            Ok(LinkStatus::Corrected { previous: current })
        }
        PathState::File => Ok(LinkStatus::Conflict { found: "file" }),
        PathState::Directory => Ok(LinkStatus::Conflict { found: "directory" }),
        PathState::Other => Ok(LinkStatus::Conflict {
            found: "special file",
        }),
    }
}

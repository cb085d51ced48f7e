//! System abstraction for filesystem operations
//!
//! This module provides a trait-based abstraction over filesystem operations,
//! enabling testing and dry-run mode.

use crate::error::{Error, Result};
use hookwright_core::path::AbsPath;
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What currently occupies a path, without following symlinks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathState {
    /// Nothing exists at the path
    Absent,
    /// A symlink, with its literal target
    Symlink {
        /// Target as stored in the link (not resolved)
        target: PathBuf,
    },
    /// A regular file
    File,
    /// A directory
    Directory,
    /// Any other kind of filesystem object
    Other,
}

/// Abstraction over filesystem operations
///
/// This trait allows us to implement different backends:
/// - `RealSystem`: Actual filesystem operations
/// - `DryRunSystem`: Reads the real filesystem, records writes without executing them
pub trait System {
    /// Read a file's contents
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>>;

    /// Inspect a path without following symlinks
    fn probe(&self, path: &AbsPath) -> Result<PathState>;

    /// Replace `path` with `content` so readers see either the old or the new file
    fn write_atomic(&self, path: &AbsPath, content: &[u8]) -> Result<()>;

    /// Write a file that must not exist yet
    ///
    /// Fails with an `AlreadyExists` I/O error instead of overwriting.
    fn write_new(&self, path: &AbsPath, content: &[u8]) -> Result<()>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &AbsPath) -> Result<()>;

    /// Create a symbolic link at `link` pointing at `target`
    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()>;

    /// Remove a symbolic link (never its target)
    fn remove_symlink(&self, link: &AbsPath) -> Result<()>;

    /// Rename `from` to `to`, replacing `to` if it exists
    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()>;

    /// Point an existing symlink at `target` in one step
    ///
    /// The new link is created next to `link` and renamed over it, so `link`
    /// keeps its previous target if anything fails.
    fn replace_symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        let staged = staging_path(link)?;
        if matches!(self.probe(&staged)?, PathState::Symlink { .. }) {
            self.remove_symlink(&staged)?;
        }

        self.symlink(target, &staged)?;
        if let Err(err) = self.rename(&staged, link) {
            let _ = self.remove_symlink(&staged);
            return Err(err);
        }
        Ok(())
    }
}

/// Sibling of `link` used to stage a replacement link
fn staging_path(link: &AbsPath) -> Result<AbsPath> {
    let (Some(dir), Some(name)) = (link.parent(), link.file_name()) else {
        return Err(Error::Symlink {
            path: link.as_path().to_path_buf(),
            source: std::io::Error::other("link has no parent or file name"),
        });
    };
    Ok(AbsPath::new(dir.as_path().join(format!(".{name}.hookwright-tmp")))?)
}

/// Real filesystem implementation
///
/// This implementation performs actual filesystem operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSystem;

impl System for RealSystem {
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>> {
        fs::read(path.as_path()).map_err(|e| Error::FileRead {
            path: path.as_path().to_path_buf(),
            source: e,
        })
    }

    fn probe(&self, path: &AbsPath) -> Result<PathState> {
        let metadata = match fs::symlink_metadata(path.as_path()) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(PathState::Absent),
            Err(e) => {
                return Err(Error::Metadata {
                    path: path.as_path().to_path_buf(),
                    source: e,
                });
            }
        };

        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            let target = fs::read_link(path.as_path()).map_err(|e| Error::Symlink {
                path: path.as_path().to_path_buf(),
                source: e,
            })?;
            Ok(PathState::Symlink { target })
        } else if file_type.is_file() {
            Ok(PathState::File)
        } else if file_type.is_dir() {
            Ok(PathState::Directory)
        } else {
            Ok(PathState::Other)
        }
    }

    fn write_atomic(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        let write_err = |source: std::io::Error| Error::FileWrite {
            path: path.as_path().to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) => parent,
            None => return Err(write_err(std::io::Error::other("path has no parent"))),
        };
        self.create_dir_all(&dir)?;

        // Temp file lives next to the target so the rename stays on one filesystem
        let mut temp = tempfile::NamedTempFile::new_in(dir.as_path()).map_err(write_err)?;
        temp.write_all(content).map_err(write_err)?;

        #[cfg(unix)]
        if let Ok(existing) = fs::metadata(path.as_path()) {
            temp.as_file()
                .set_permissions(existing.permissions())
                .map_err(write_err)?;
        }

        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(path.as_path())
            .map_err(|err| write_err(err.error))?;

        #[cfg(unix)]
        {
            if let Ok(dir) = fs::File::open(dir.as_path()) {
                let _ = dir.sync_all();
            }
        }

        Ok(())
    }

    fn write_new(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        let write_err = |source: std::io::Error| Error::FileWrite {
            path: path.as_path().to_path_buf(),
            source,
        };

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path.as_path())
            .map_err(write_err)?;
        file.write_all(content).map_err(write_err)?;
        file.sync_all().map_err(write_err)
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        fs::create_dir_all(path.as_path()).map_err(|e| Error::DirectoryCreate {
            path: path.as_path().to_path_buf(),
            source: e,
        })
    }

    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        let symlink_err = |source: std::io::Error| Error::Symlink {
            path: link.as_path().to_path_buf(),
            source,
        };

        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link.as_path()).map_err(symlink_err)
        }

        #[cfg(windows)]
        {
            // On Windows, we need to check if target is a dir or file
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link.as_path()).map_err(symlink_err)
            } else {
                std::os::windows::fs::symlink_file(target, link.as_path()).map_err(symlink_err)
            }
        }
    }

    fn remove_symlink(&self, link: &AbsPath) -> Result<()> {
        let symlink_err = |source: std::io::Error| Error::Symlink {
            path: link.as_path().to_path_buf(),
            source,
        };

        // Directory symlinks on Windows are removed like directories
        #[cfg(windows)]
        if fs::remove_dir(link.as_path()).is_ok() {
            return Ok(());
        }

        fs::remove_file(link.as_path()).map_err(symlink_err)
    }

    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        fs::rename(from.as_path(), to.as_path()).map_err(|e| Error::FileWrite {
            path: to.as_path().to_path_buf(),
            source: e,
        })
    }
}

/// Dry-run system that records operations without executing them
///
/// Reads go to the real filesystem so decisions match a real run; writes are
/// only recorded.
#[derive(Debug, Default)]
pub struct DryRunSystem {
    real: RealSystem,
    operations: RefCell<Vec<Operation>>,
}

/// An operation that would be performed on the filesystem
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Atomically replace a file
    WriteFile {
        /// File that would be written
        path: AbsPath,
        /// Number of bytes
        size: usize,
    },
    /// Create a file that does not exist yet
    CreateFile {
        /// File that would be created
        path: AbsPath,
        /// Number of bytes
        size: usize,
    },
    /// Create a directory
    CreateDir {
        /// Directory that would be created
        path: AbsPath,
    },
    /// Create a symlink
    Symlink {
        /// Link location
        link: AbsPath,
        /// Link target
        target: PathBuf,
    },
    /// Remove a symlink
    RemoveSymlink {
        /// Link location
        link: AbsPath,
    },
    /// Rename a path
    Rename {
        /// Current location
        from: AbsPath,
        /// New location
        to: AbsPath,
    },
    /// Repoint an existing symlink
    ReplaceSymlink {
        /// Link location
        link: AbsPath,
        /// New link target
        target: PathBuf,
    },
}

impl DryRunSystem {
    /// Create a new dry-run system
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the list of operations that would be performed
    pub fn operations(&self) -> Vec<Operation> {
        self.operations.borrow().clone()
    }

    /// Record an operation
    fn record(&self, op: Operation) {
        self.operations.borrow_mut().push(op);
    }
}

impl System for DryRunSystem {
    fn read_file(&self, path: &AbsPath) -> Result<Vec<u8>> {
        self.real.read_file(path)
    }

    fn probe(&self, path: &AbsPath) -> Result<PathState> {
        self.real.probe(path)
    }

    fn write_atomic(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        self.record(Operation::WriteFile {
            path: path.clone(),
            size: content.len(),
        });
        Ok(())
    }

    fn write_new(&self, path: &AbsPath, content: &[u8]) -> Result<()> {
        if self.real.probe(path)? != PathState::Absent {
            return Err(Error::FileWrite {
                path: path.as_path().to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            });
        }
        self.record(Operation::CreateFile {
            path: path.clone(),
            size: content.len(),
        });
        Ok(())
    }

    fn create_dir_all(&self, path: &AbsPath) -> Result<()> {
        if !path.as_path().is_dir() {
            self.record(Operation::CreateDir { path: path.clone() });
        }
        Ok(())
    }

    fn symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        self.record(Operation::Symlink {
            link: link.clone(),
            target: target.to_path_buf(),
        });
        Ok(())
    }

    fn remove_symlink(&self, link: &AbsPath) -> Result<()> {
        self.record(Operation::RemoveSymlink { link: link.clone() });
        Ok(())
    }

    fn rename(&self, from: &AbsPath, to: &AbsPath) -> Result<()> {
        self.record(Operation::Rename {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    fn replace_symlink(&self, target: &Path, link: &AbsPath) -> Result<()> {
        self.record(Operation::ReplaceSymlink {
            link: link.clone(),
            target: target.to_path_buf(),
        });
        Ok(())
    }
}

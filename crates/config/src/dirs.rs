//! Default directory utilities
//!
//! The install directory is where the user's live settings file and the
//! provisioned symlinks live. It defaults to `~/.claude`.

use std::path::{Path, PathBuf};

/// Name of the install directory under `$HOME`
pub const INSTALL_DIR_NAME: &str = ".claude";

/// Get the default install directory
///
/// Returns `~/.claude`, or `None` when the home directory cannot be determined.
#[must_use]
pub fn default_install_dir() -> Option<PathBuf> {
    ::dirs::home_dir().map(|home| home.join(INSTALL_DIR_NAME))
}

/// Expand a leading `~` to the home directory
///
/// Paths without a leading `~` are returned unchanged, as is `~user` syntax.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match ::dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

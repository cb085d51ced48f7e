//! Configuration management
//!
//! This module handles loading the optional `.hookwright.toml` tool configuration.
//!
//! ```toml
//! [general]
//! template = "settings.template.json"
//! target = "~/.claude/settings.json"
//! installDir = "~/.claude"
//!
//! [merge]
//! validateAfterMerge = true
//! ```

use crate::Result;
use crate::dirs::expand_tilde;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the tool configuration inside the source root
pub const CONFIG_FILE_NAME: &str = ".hookwright.toml";

/// Default template file name inside the source root
pub const DEFAULT_TEMPLATE_NAME: &str = "settings.template.json";

/// Default settings file name inside the install directory
pub const DEFAULT_TARGET_NAME: &str = "settings.json";

/// General configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Template path, relative paths resolve against the config file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Settings file the template is merged into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<PathBuf>,

    /// Directory that receives the provisioned symlinks
    #[serde(
        default,
        rename = "installDir",
        skip_serializing_if = "Option::is_none"
    )]
    pub install_dir: Option<PathBuf>,
}

/// Merge behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Check hook command paths after every merge and report missing ones
    #[serde(default = "default_validate_after_merge", rename = "validateAfterMerge")]
    pub validate_after_merge: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            validate_after_merge: default_validate_after_merge(),
        }
    }
}

fn default_validate_after_merge() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Merge settings
    #[serde(default)]
    pub merge: MergeConfig,
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or TOML parsing fails
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            hookwright_core::Error::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_toml_str(&content, base)
    }

    /// Parse configuration from a TOML string
    ///
    /// Relative paths are resolved against `base_dir`.
    pub fn from_toml_str(toml_content: &str, base_dir: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(toml_content).map_err(|e| {
            hookwright_core::Error::Config(format!("Failed to parse config TOML: {e}"))
        })?;
        config.resolve_relative_paths(base_dir);
        Ok(config)
    }

    /// Load `.hookwright.toml` from the source root, or defaults if it is absent
    pub fn load_from_source(source_dir: &Path) -> Result<Self> {
        let config_path = source_dir.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            tracing::debug!(path = %config_path.display(), "Loading configuration");
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        let resolve = |p: &Path| {
            let expanded = expand_tilde(p);
            if expanded.is_absolute() {
                expanded
            } else {
                base_dir.join(expanded)
            }
        };

        self.general.template = self.general.template.as_deref().map(resolve);
        self.general.target = self.general.target.as_deref().map(resolve);
        self.general.install_dir = self.general.install_dir.as_deref().map(resolve);
    }

    /// Template path: configured value or `<source>/settings.template.json`
    pub fn template_path(&self, source_dir: &Path) -> PathBuf {
        self.general
            .template
            .clone()
            .unwrap_or_else(|| source_dir.join(DEFAULT_TEMPLATE_NAME))
    }

    /// Target settings path: configured value or `<install_dir>/settings.json`
    pub fn target_path(&self, install_dir: &Path) -> PathBuf {
        self.general
            .target
            .clone()
            .unwrap_or_else(|| install_dir.join(DEFAULT_TARGET_NAME))
    }

    /// Configured install directory, if any
    pub fn install_dir(&self) -> Option<&PathBuf> {
        self.general.install_dir.as_ref()
    }
}

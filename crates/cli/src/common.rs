//! Common utilities and types shared across CLI commands

use anyhow::{Context, Result};
use hookwright_config::{Config, default_install_dir, expand_tilde};
use hookwright_core::path::AbsPath;
use hookwright_engine::ConfigDocument;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Runtime context for CLI commands
///
/// This struct consolidates common parameters that are passed to every command:
/// the loaded configuration and the canonical source root.
///
/// # Examples
///
/// ```no_run
/// use hookwright::common::RuntimeContext;
/// use hookwright_config::Config;
/// use std::path::Path;
///
/// let context = RuntimeContext::new(Config::default(), Path::new("/opt/hooks"))?;
/// let template = context.template_path(None)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// Shared configuration (uses Arc to avoid cloning)
    pub config: Arc<Config>,
    source_root: AbsPath,
}

impl RuntimeContext {
    /// Create a new runtime context
    ///
    /// The source directory must exist; it is canonicalized so every path
    /// written into settings is absolute and stable.
    ///
    /// # Errors
    ///
    /// Returns an error if the source directory cannot be canonicalized.
    pub fn new(config: Config, source_dir: &Path) -> Result<Self> {
        let canonical = fs::canonicalize(source_dir).with_context(|| {
            format!("Source directory not found: {}", source_dir.display())
        })?;
        Ok(Self {
            config: Arc::new(config),
            source_root: AbsPath::new(canonical)?,
        })
    }

    /// Canonical source root
    #[inline]
    pub fn source_root(&self) -> &AbsPath {
        &self.source_root
    }

    /// Template path: CLI override, config value, or the default under the source root
    pub fn template_path(&self, cli_override: Option<&Path>) -> Result<AbsPath> {
        match cli_override {
            Some(path) => absolutize(path),
            None => absolutize(&self.config.template_path(self.source_root.as_path())),
        }
    }

    /// Install directory: CLI override, config value, or `~/.claude`
    pub fn install_dir(&self, cli_override: Option<&Path>) -> Result<AbsPath> {
        let dir = cli_override
            .map(Path::to_path_buf)
            .or_else(|| self.config.install_dir().cloned())
            .or_else(default_install_dir)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Could not determine install directory (home directory not found). \
                     Please specify with --install-dir or set installDir in config file."
                )
            })?;
        absolutize(&dir)
    }

    /// Target settings path: CLI override, config value, or `<install_dir>/settings.json`
    pub fn target_path(&self, cli_override: Option<&Path>) -> Result<AbsPath> {
        match cli_override {
            Some(path) => absolutize(path),
            None => {
                let install_dir = self.install_dir(None)?;
                absolutize(&self.config.target_path(install_dir.as_path()))
            }
        }
    }

    /// Load and resolve the template against the source root
    pub fn load_template(&self, cli_override: Option<&Path>) -> Result<ConfigDocument> {
        let template = self.template_path(cli_override)?;
        Ok(hookwright_engine::load_template(
            template.as_path(),
            &self.source_root,
        )?)
    }
}

/// Expand `~` and anchor relative paths at the current directory
///
/// The path does not need to exist.
pub fn absolutize(path: &Path) -> Result<AbsPath> {
    AbsPath::from_cwd(&expand_tilde(path)).context("Failed to determine current directory")
}

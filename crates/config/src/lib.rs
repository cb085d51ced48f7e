//! Configuration management for hookwright
//!
//! This crate handles:
//! - Loading `.hookwright.toml` from the source root
//! - Default directory resolution (`~/.claude`, `~` expansion)
//! - Logging initialization

pub mod config;
pub mod dirs;
pub mod logging;

// Re-export error types from core
pub use hookwright_core::{Error, Result};

pub use config::{CONFIG_FILE_NAME, Config, GeneralConfig, MergeConfig};
pub use dirs::{default_install_dir, expand_tilde};

//! Core types and utilities for hookwright
//!
//! This is the foundation crate (Layer 0) that all other hookwright crates depend on.
//! It provides:
//! - Path types (AbsPath, RelPath)
//! - Base error types
//!
//! This crate has no dependencies on other hookwright crates.

pub mod error;
pub mod path;

pub use error::{Error, Result};
pub use path::{AbsPath, RelPath};

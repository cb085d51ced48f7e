//! Template placeholder resolution
//!
//! Templates refer to hook scripts through the `$CLAUDE_CONFIG_DIR` placeholder.
//! Resolution replaces every occurrence with the absolute source root and parses
//! the result, so a resolved template is always a well-formed document.

use crate::document::ConfigDocument;
use crate::error::{Error, Result};
use hookwright_core::AbsPath;
use std::path::Path;

/// Placeholder substituted with the source root
pub const PLACEHOLDER: &str = "$CLAUDE_CONFIG_DIR";

/// Substitute the placeholder in raw template text
///
/// Already-resolved text passes through unchanged.
///
/// ```
/// use hookwright_core::AbsPath;
/// use hookwright_engine::resolve::resolve_text;
///
/// let root = AbsPath::new("/opt/hooks".into()).unwrap();
/// let text = resolve_text(r#"{"command": "$CLAUDE_CONFIG_DIR/scripts/guard.py"}"#, &root);
/// assert_eq!(text, r#"{"command": "/opt/hooks/scripts/guard.py"}"#);
/// ```
pub fn resolve_text(template: &str, source_root: &AbsPath) -> String {
    let root = source_root.as_path().to_string_lossy();
    // Paths end up inside JSON strings
    let escaped = serde_json::to_string(root.as_ref())
        .map(|quoted| quoted[1..quoted.len() - 1].to_string())
        .unwrap_or_else(|_| root.into_owned());
    template.replace(PLACEHOLDER, &escaped)
}

/// Resolve template text and parse it
pub fn resolve_str(template: &str, source_root: &AbsPath) -> Result<ConfigDocument> {
    let resolved = resolve_text(template, source_root);
    ConfigDocument::parse_named("template", resolved.as_bytes())
}

/// Read a template file, resolve it and parse it
///
/// A missing template is reported as [`Error::TemplateNotFound`].
pub fn load_template(path: &Path, source_root: &AbsPath) -> Result<ConfigDocument> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::TemplateNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(Error::TemplateRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    tracing::debug!(template = %path.display(), root = %source_root, "Resolving template");
    let resolved = resolve_text(&text, source_root);
    ConfigDocument::parse_named(format!("template {}", path.display()), resolved.as_bytes())
}

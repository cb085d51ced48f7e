//! Settings document model
//!
//! A [`ConfigDocument`] is the typed form of a settings file:
//!
//! ```json
//! {
//!   "permissions": { "allow": ["Bash(git status)"], "deny": [], "ask": [] },
//!   "hooks": {
//!     "PreToolUse": [
//!       { "matcher": "Bash", "hooks": [{ "type": "command", "command": "/opt/hooks/guard.py" }] }
//!     ]
//!   },
//!   "model": "opus"
//! }
//! ```
//!
//! Only `hooks` and the three permission categories are interpreted. Every other
//! key, at any level the model knows about, is carried through as an opaque JSON
//! value so a parse/serialize round trip never drops user data.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminator used by command hooks
pub const COMMAND_KIND: &str = "command";

/// In-memory form of a settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Permission rules per category
    #[serde(default, skip_serializing_if = "Permissions::is_empty")]
    pub permissions: Permissions,

    /// Hook bindings keyed by event type (e.g. `PreToolUse`)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub hooks: IndexMap<String, Vec<MatcherBlock>>,

    /// Every other top-level setting, kept verbatim
    #[serde(flatten)]
    pub other: IndexMap<String, Value>,
}

/// Permission rule sets
///
/// Each category is an ordered set: uniqueness is restored by the merge,
/// order reflects insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    /// Rules that are allowed without prompting
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allow: Vec<String>,

    /// Rules that are always refused
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deny: Vec<String>,

    /// Rules that require confirmation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ask: Vec<String>,

    /// Other permission keys (`defaultMode`, `additionalDirectories`, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// The three recognised permission categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionCategory {
    /// `allow`
    Allow,
    /// `deny`
    Deny,
    /// `ask`
    Ask,
}

impl PermissionCategory {
    /// All categories in serialization order
    pub const ALL: [PermissionCategory; 3] = [Self::Allow, Self::Deny, Self::Ask];

    /// JSON key of this category
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Ask => "ask",
        }
    }
}

impl std::fmt::Display for PermissionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Permissions {
    /// Rules of one category
    pub fn rules(&self, category: PermissionCategory) -> &[String] {
        match category {
            PermissionCategory::Allow => &self.allow,
            PermissionCategory::Deny => &self.deny,
            PermissionCategory::Ask => &self.ask,
        }
    }

    /// True when no category holds a rule and there are no extra keys
    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.deny.is_empty() && self.ask.is_empty() && self.extra.is_empty()
    }
}

/// A group of hooks scoped to one matcher pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatcherBlock {
    /// Pattern identifying the invocations this block applies to
    ///
    /// Opaque identity key. A block without a matcher is its own identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<String>,

    /// Hooks bound to the pattern, in execution order
    #[serde(default)]
    pub hooks: Vec<HookEntry>,

    /// Unrecognised block keys, kept verbatim
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl MatcherBlock {
    /// Create a block for `pattern` with the given hooks
    pub fn new(pattern: impl Into<String>, hooks: Vec<HookEntry>) -> Self {
        Self {
            matcher: Some(pattern.into()),
            hooks,
            extra: IndexMap::new(),
        }
    }

    /// Pattern used as this block's identity
    pub fn pattern(&self) -> Option<&str> {
        self.matcher.as_deref()
    }
}

/// A single executable binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEntry {
    /// Hook kind, `"command"` for every hook this tool provisions
    ///
    /// Left out on output when the source entry had no `type` key.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Absolute path of the executable; dedup identity inside a block
    pub command: String,

    /// Unrecognised entry keys (`timeout`, ...), kept verbatim
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl HookEntry {
    /// Create a command hook
    pub fn command(path: impl Into<String>) -> Self {
        Self {
            kind: Some(COMMAND_KIND.to_string()),
            command: path.into(),
            extra: IndexMap::new(),
        }
    }
}

/// A hook entry together with where it is bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookBinding<'a> {
    /// Event type the entry is registered under
    pub event: &'a str,
    /// Matcher pattern of the enclosing block
    pub matcher: Option<&'a str>,
    /// The entry itself
    pub entry: &'a HookEntry,
}

impl ConfigDocument {
    /// Parse a document from raw bytes
    ///
    /// Sections may be missing; `{}` is a valid, empty document. JSON with the
    /// wrong shape (e.g. `hooks` as a string) is rejected.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        Self::parse_named("<input>", bytes)
    }

    /// Parse a document, naming its origin in error messages
    pub fn parse_named(origin: impl std::fmt::Display, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| Error::Parse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Serialize with two-space indentation and a trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self).map_err(Error::Serialize)?;
        out.push('\n');
        Ok(out)
    }

    /// True when every section is empty
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.hooks.is_empty() && self.other.is_empty()
    }

    /// Iterate over every hook entry across all event types and blocks
    pub fn hook_bindings(&self) -> impl Iterator<Item = HookBinding<'_>> {
        self.hooks.iter().flat_map(|(event, blocks)| {
            blocks.iter().flat_map(move |block| {
                block.hooks.iter().map(move |entry| HookBinding {
                    event,
                    matcher: block.pattern(),
                    entry,
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serde_json::json;

    fn parse_value(value: &Value) -> Result<ConfigDocument> {
        ConfigDocument::parse(value.to_string().as_bytes())
    }

    #[test]
    fn test_empty_object_parses() {
        let doc = ConfigDocument::parse(b"{}").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc, ConfigDocument::default());
    }

    #[test]
    fn test_partial_sections() {
        let doc = parse_value(&json!({"permissions": {"allow": ["A"]}})).unwrap();
        assert_eq!(doc.permissions.allow, vec!["A"]);
        assert!(doc.permissions.deny.is_empty());
        assert!(doc.hooks.is_empty());
        assert!(doc.other.is_empty());
    }

    #[test]
    fn test_full_document() {
        let doc = parse_value(&json!({
            "permissions": {"allow": ["A"], "deny": ["D"], "ask": ["Q"], "defaultMode": "plan"},
            "hooks": {
                "PreToolUse": [
                    {"matcher": "Bash", "hooks": [{"type": "command", "command": "/x/guard.py", "timeout": 30}]}
                ],
                "SessionStart": [
                    {"hooks": [{"type": "command", "command": "/x/detect.sh"}]}
                ]
            },
            "model": "opus",
            "env": {"FOO": "1"}
        }))
        .unwrap();

        assert_eq!(doc.permissions.rules(PermissionCategory::Ask), ["Q"]);
        assert_eq!(doc.permissions.extra["defaultMode"], json!("plan"));
        let pre = &doc.hooks["PreToolUse"][0];
        assert_eq!(pre.pattern(), Some("Bash"));
        assert_eq!(pre.hooks[0].kind.as_deref(), Some(COMMAND_KIND));
        assert_eq!(pre.hooks[0].extra["timeout"], json!(30));
        assert_eq!(doc.hooks["SessionStart"][0].matcher, None);
        assert_eq!(doc.other["model"], json!("opus"));
        assert_eq!(doc.other["env"], json!({"FOO": "1"}));
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let original = json!({
            "permissions": {"allow": ["A", "B"], "additionalDirectories": ["/tmp"]},
            "hooks": {"Stop": [{"matcher": "", "hooks": [{"type": "command", "command": "/s"}], "note": "x"}]},
            "model": "sonnet",
            "statusLine": {"type": "command", "command": "echo hi"}
        });
        let doc = parse_value(&original).unwrap();
        let text = doc.to_json_pretty().unwrap();
        assert!(text.ends_with('\n'));
        let reparsed = ConfigDocument::parse(text.as_bytes()).unwrap();
        assert_eq!(doc, reparsed);
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), original);
    }

    #[test]
    fn test_hook_without_type_stays_without_type() {
        let original = json!({"hooks": {"Stop": [{"hooks": [{"command": "/s", "timeout": 5}]}]}});
        let doc = parse_value(&original).unwrap();
        assert_eq!(doc.hooks["Stop"][0].hooks[0].kind, None);

        let text = doc.to_json_pretty().unwrap();
        assert!(!text.contains("\"type\""));
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap(), original);
    }

    #[test]
    fn test_command_constructor_sets_type() {
        let value = serde_json::to_value(HookEntry::command("/x/guard.py")).unwrap();
        assert_eq!(value, json!({"type": "command", "command": "/x/guard.py"}));
    }

    #[test]
    fn test_empty_document_serializes_to_empty_object() {
        let text = ConfigDocument::default().to_json_pretty().unwrap();
        assert_eq!(text.trim(), "{}");
    }

    #[test]
    fn test_hooks_as_string_is_rejected() {
        let err = parse_value(&json!({"hooks": "oops"})).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_non_string_rule_is_rejected() {
        assert!(parse_value(&json!({"permissions": {"allow": [1]}})).is_err());
    }

    #[test]
    fn test_hook_without_command_is_rejected() {
        assert!(
            parse_value(&json!({"hooks": {"Stop": [{"hooks": [{"type": "command"}]}]}})).is_err()
        );
    }

    #[test]
    fn test_top_level_array_is_rejected() {
        assert!(ConfigDocument::parse(b"[1, 2]").is_err());
        assert!(ConfigDocument::parse(b"{not json").is_err());
    }

    #[test]
    fn test_parse_named_reports_origin() {
        let err = ConfigDocument::parse_named("/home/u/settings.json", b"{").unwrap_err();
        assert!(err.to_string().contains("/home/u/settings.json"));
    }

    #[test]
    fn test_hook_bindings_walks_everything() {
        let doc = parse_value(&json!({
            "hooks": {
                "PreToolUse": [
                    {"matcher": "Bash", "hooks": [{"command": "/a"}, {"command": "/b"}]},
                    {"matcher": "Edit", "hooks": [{"command": "/c"}]}
                ],
                "Stop": [{"hooks": [{"command": "/d"}]}]
            }
        }))
        .unwrap();

        let seen: Vec<_> = doc
            .hook_bindings()
            .map(|b| (b.event, b.matcher, b.entry.command.as_str()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("PreToolUse", Some("Bash"), "/a"),
                ("PreToolUse", Some("Bash"), "/b"),
                ("PreToolUse", Some("Edit"), "/c"),
                ("Stop", None, "/d"),
            ]
        );
    }
}

//! Property-based tests for merge guarantees

#![allow(clippy::unwrap_used, clippy::panic)]

use hookwright_engine::{ConfigDocument, HookEntry, MatcherBlock, PermissionCategory, Permissions, merge};
use indexmap::IndexMap;
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::HashSet;

// Small vocabularies so generated documents overlap often
fn rule() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Read", "Edit", "Bash(git status)", "WebFetch"]).prop_map(str::to_string)
}

fn rules() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(rule(), 0..5)
}

fn permissions() -> impl Strategy<Value = Permissions> {
    (rules(), rules(), rules()).prop_map(|(allow, deny, ask)| Permissions {
        allow,
        deny,
        ask,
        ..Permissions::default()
    })
}

fn block() -> impl Strategy<Value = MatcherBlock> {
    (
        prop::option::of(prop::sample::select(vec!["Bash", "Edit|Write", ""])),
        prop::collection::vec(
            prop::sample::select(vec!["/h/guard.py", "/h/format.sh", "/h/notify"]),
            0..4,
        ),
    )
        .prop_map(|(matcher, commands)| MatcherBlock {
            matcher: matcher.map(str::to_string),
            hooks: commands.into_iter().map(HookEntry::command).collect(),
            ..MatcherBlock::default()
        })
}

fn hooks() -> impl Strategy<Value = IndexMap<String, Vec<MatcherBlock>>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["PreToolUse", "PostToolUse", "Stop"]),
            prop::collection::vec(block(), 0..3),
        ),
        0..3,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(event, blocks)| (event.to_string(), blocks))
            .collect()
    })
}

fn other() -> impl Strategy<Value = IndexMap<String, Value>> {
    prop::collection::vec(
        (prop::sample::select(vec!["model", "theme", "env"]), 0i64..3),
        0..3,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), json!(value)))
            .collect()
    })
}

fn document() -> impl Strategy<Value = ConfigDocument> {
    (permissions(), hooks(), other()).prop_map(|(permissions, hooks, other)| ConfigDocument {
        permissions,
        hooks,
        other,
    })
}

fn bindings(doc: &ConfigDocument) -> HashSet<(String, Option<String>, String)> {
    doc.hook_bindings()
        .map(|b| {
            (
                b.event.to_string(),
                b.matcher.map(str::to_string),
                b.entry.command.clone(),
            )
        })
        .collect()
}

fn dedup(rules: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    rules.iter().filter(|r| seen.insert(*r)).cloned().collect()
}

proptest! {
    #[test]
    fn merge_is_idempotent(existing in document(), template in document()) {
        let once = merge(existing, &template);
        let twice = merge(once.clone(), &template);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn empty_template_is_identity_on_normalized_documents(existing in document()) {
        let normalized = merge(existing, &ConfigDocument::default());
        prop_assert_eq!(merge(normalized.clone(), &ConfigDocument::default()), normalized);
    }

    #[test]
    fn empty_existing_yields_template(template in document()) {
        let from_empty = merge(ConfigDocument::default(), &template);
        let normalized = merge(template, &ConfigDocument::default());
        prop_assert_eq!(from_empty, normalized);
    }

    #[test]
    fn merge_loses_nothing(existing in document(), template in document()) {
        let merged = merge(existing.clone(), &template);

        for category in PermissionCategory::ALL {
            let rules = merged.permissions.rules(category);
            for rule in existing.permissions.rules(category).iter().chain(template.permissions.rules(category)) {
                prop_assert!(rules.contains(rule), "{category} lost {rule}");
            }
        }

        let merged_bindings = bindings(&merged);
        for binding in bindings(&existing).union(&bindings(&template)) {
            prop_assert!(merged_bindings.contains(binding), "lost {binding:?}");
        }

        for key in template.other.keys() {
            prop_assert!(merged.other.contains_key(key));
        }
    }

    #[test]
    fn merge_never_duplicates(existing in document(), template in document()) {
        let merged = merge(existing, &template);

        for category in PermissionCategory::ALL {
            let rules = merged.permissions.rules(category);
            prop_assert_eq!(dedup(rules).len(), rules.len());
        }

        for blocks in merged.hooks.values() {
            let patterns: HashSet<_> = blocks.iter().map(|b| b.matcher.clone()).collect();
            prop_assert_eq!(patterns.len(), blocks.len());

            for block in blocks {
                let commands: HashSet<_> = block.hooks.iter().map(|h| h.command.as_str()).collect();
                prop_assert_eq!(commands.len(), block.hooks.len());
            }
        }
    }

    #[test]
    fn existing_values_win(existing in document(), template in document()) {
        let merged = merge(existing.clone(), &template);

        for (key, value) in &existing.other {
            prop_assert_eq!(&merged.other[key], value);
        }
        for category in PermissionCategory::ALL {
            let prefix = dedup(existing.permissions.rules(category));
            prop_assert_eq!(&merged.permissions.rules(category)[..prefix.len()], prefix.as_slice());
        }
    }
}

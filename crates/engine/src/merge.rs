//! Merge engine
//!
//! Combines a user's existing settings with a resolved template. The merge is
//! pure and idempotent: applying the same template twice equals applying it once.
//!
//! Policies per section:
//! - **hooks**: union of event types; per event type, blocks are keyed by
//!   matcher pattern. A template block whose pattern already exists contributes
//!   only the commands the existing block lacks; new patterns are appended.
//! - **permissions**: ordered set union per category, existing rules first.
//! - **other settings**: first write wins. A key already present is never
//!   overwritten, and nested objects are not merged.

use crate::document::{ConfigDocument, HookEntry, MatcherBlock, Permissions};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Merge `template` into `existing`
///
/// # Examples
///
/// ```
/// use hookwright_engine::{ConfigDocument, merge};
///
/// let existing = ConfigDocument::parse(br#"{"permissions":{"allow":["A"]},"model":"sonnet"}"#).unwrap();
/// let template = ConfigDocument::parse(br#"{"permissions":{"allow":["A","B"]},"model":"opus"}"#).unwrap();
///
/// let merged = merge(existing, &template);
/// assert_eq!(merged.permissions.allow, ["A", "B"]);
/// assert_eq!(merged.other["model"], "sonnet");
/// assert_eq!(merge(merged.clone(), &template), merged);
/// ```
pub fn merge(existing: ConfigDocument, template: &ConfigDocument) -> ConfigDocument {
    let ConfigDocument {
        permissions,
        hooks,
        other,
    } = existing;

    ConfigDocument {
        permissions: merge_permissions(permissions, &template.permissions),
        hooks: merge_hooks(hooks, &template.hooks),
        other: merge_first_write_wins(other, &template.other),
    }
}

fn merge_permissions(existing: Permissions, template: &Permissions) -> Permissions {
    let Permissions {
        allow,
        deny,
        ask,
        extra,
    } = existing;

    Permissions {
        allow: union(allow, &template.allow),
        deny: union(deny, &template.deny),
        ask: union(ask, &template.ask),
        extra: merge_first_write_wins(extra, &template.extra),
    }
}

/// Ordered set union, `existing` rules first
fn union(existing: Vec<String>, template: &[String]) -> Vec<String> {
    let mut rules = OrderedSet::default();
    rules.extend(existing);
    rules.extend(template.iter().cloned());
    rules.into_vec()
}

fn merge_hooks(
    existing: IndexMap<String, Vec<MatcherBlock>>,
    template: &IndexMap<String, Vec<MatcherBlock>>,
) -> IndexMap<String, Vec<MatcherBlock>> {
    let mut merged: IndexMap<String, BlockList> = IndexMap::with_capacity(existing.len());

    for (event, blocks) in existing {
        let list = merged.entry(event).or_default();
        for block in blocks {
            list.absorb(block);
        }
    }

    for (event, blocks) in template {
        let list = merged.entry(event.clone()).or_default();
        for block in blocks {
            list.absorb(block.clone());
        }
    }

    merged
        .into_iter()
        .map(|(event, list)| (event, list.blocks))
        .collect()
}

fn merge_first_write_wins(
    mut existing: IndexMap<String, Value>,
    template: &IndexMap<String, Value>,
) -> IndexMap<String, Value> {
    for (key, value) in template {
        if !existing.contains_key(key) {
            existing.insert(key.clone(), value.clone());
        }
    }
    existing
}

/// Insertion-ordered set backed by a membership index
#[derive(Default)]
struct OrderedSet {
    seen: HashSet<String>,
    items: Vec<String>,
}

impl OrderedSet {
    fn insert(&mut self, item: String) -> bool {
        if self.seen.contains(&item) {
            return false;
        }
        self.seen.insert(item.clone());
        self.items.push(item);
        true
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

impl Extend<String> for OrderedSet {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

/// Matcher blocks of one event type, at most one per pattern
#[derive(Default)]
struct BlockList {
    blocks: Vec<MatcherBlock>,
    by_pattern: HashMap<Option<String>, usize>,
    commands: Vec<HashSet<String>>,
}

impl BlockList {
    /// Fold `block` into the list
    ///
    /// A known pattern gains the commands it does not have yet; the incoming
    /// block's other keys are dropped in favour of the first occurrence.
    fn absorb(&mut self, block: MatcherBlock) {
        if let Some(&index) = self.by_pattern.get(&block.matcher) {
            for hook in block.hooks {
                self.push_hook(index, hook);
            }
            return;
        }

        let MatcherBlock {
            matcher,
            hooks,
            extra,
        } = block;
        let index = self.blocks.len();
        self.by_pattern.insert(matcher.clone(), index);
        self.blocks.push(MatcherBlock {
            matcher,
            hooks: Vec::with_capacity(hooks.len()),
            extra,
        });
        self.commands.push(HashSet::with_capacity(hooks.len()));
        for hook in hooks {
            self.push_hook(index, hook);
        }
    }

    fn push_hook(&mut self, index: usize, hook: HookEntry) {
        if self.commands[index].insert(hook.command.clone()) {
            self.blocks[index].hooks.push(hook);
        }
    }
}

//! Diff identity extraction for sibling groups.

use std::collections::HashSet;

use crate::node::Node;

/// Primary identity attribute recognized by the differ.
pub const KEY_ATTRIBUTE: &str = "data-key";

/// Legacy spelling, treated as equivalent to [`KEY_ATTRIBUTE`].
pub const LEGACY_KEY_ATTRIBUTE: &str = "dj-key";

/// The diff identity of one child within a sibling group.
///
/// `Positional` carries the raw index in the sibling list. In a mixed group
/// the differ matches positional members by their index *within the
/// positional subset*, so they cannot steal matches from keyed siblings after
/// an insertion or removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Explicit(String),
    Positional(usize),
}

impl Key {
    pub fn is_explicit(&self) -> bool {
        matches!(self, Key::Explicit(_))
    }
}

/// Compute the parallel key list for a sibling group.
pub fn extract_keys(siblings: &[Node]) -> Vec<Key> {
    siblings
        .iter()
        .enumerate()
        .map(|(index, child)| match child.key() {
            Some(value) => Key::Explicit(value.to_string()),
            None => Key::Positional(index),
        })
        .collect()
}

/// Whether any member of the group declares an explicit key.
pub fn group_is_keyed(siblings: &[Node]) -> bool {
    siblings.iter().any(|child| child.key().is_some())
}

/// Key-consistency report for one sibling group, consumed by Diagnostics.
#[derive(Clone, Debug)]
pub struct GroupScan {
    pub keys: Vec<Key>,
    /// Explicit values shared by two or more siblings, each reported once.
    pub duplicates: Vec<String>,
    /// Some siblings are keyed and some are not.
    pub mixed: bool,
    pub explicit_count: usize,
}

/// Scan a sibling group for duplicate and mixed keying.
///
/// Neither condition is fatal: the differ still proceeds, with the first
/// occurrence of a duplicated key winning the match and later ones treated as
/// fresh nodes.
pub fn scan_group(siblings: &[Node]) -> GroupScan {
    let keys = extract_keys(siblings);
    let mut duplicates = Vec::new();
    let mut explicit_count = 0;
    {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for key in &keys {
            if let Key::Explicit(value) = key {
                explicit_count += 1;
                if !seen.insert(value.as_str()) && reported.insert(value.as_str()) {
                    duplicates.push(value.clone());
                }
            }
        }
    }

    let mixed = explicit_count > 0 && explicit_count < siblings.len();
    GroupScan {
        keys,
        duplicates,
        mixed,
        explicit_count,
    }
}

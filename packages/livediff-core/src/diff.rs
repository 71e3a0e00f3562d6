//! Tree diffing with keyed and positional sibling reconciliation.
//!
//! `diff` never mutates its inputs; it reads both trees and produces an
//! ordered patch list that, applied sequentially to a DOM matching `old`,
//! yields a DOM matching `new`.

use std::collections::HashMap;

use crate::key::{extract_keys, group_is_keyed, Key};
use crate::node::{Element, Node};
use crate::patch::{NodePath, Patch};

/// Diff two trees rooted at the same logical view.
pub fn diff(old: &Node, new: &Node) -> Vec<Patch> {
    diff_at(Some(old), new, NodePath::root())
}

/// Diff with an explicit base address and an optional old tree.
///
/// `old = None` covers first mount: the whole subtree is emitted as a single
/// `Replace` at `base`.
pub fn diff_at(old: Option<&Node>, new: &Node, base: NodePath) -> Vec<Patch> {
    let Some(old) = old else {
        return vec![Patch::Replace {
            path: base,
            node: new.clone(),
        }];
    };

    // Structurally equal subtrees need no patches at all.
    if old == new {
        return Vec::new();
    }

    match (old, new) {
        (Node::Text { .. }, Node::Text { content })
        | (Node::Comment { .. }, Node::Comment { content }) => vec![Patch::SetText {
            path: base,
            text: content.clone(),
        }],
        (Node::Element(old_el), Node::Element(new_el)) if old_el.tag == new_el.tag => {
            let mut patches = diff_attrs(old_el, new_el, &base);
            patches.extend(diff_children(&old_el.children, &new_el.children, &base));
            patches
        }
        // Tag changes and node-kind changes replace the whole subtree; patching
        // attribute-by-attribute across tags can produce illegal combinations.
        _ => vec![Patch::Replace {
            path: base,
            node: new.clone(),
        }],
    }
}

fn diff_attrs(old: &Element, new: &Element, base: &NodePath) -> Vec<Patch> {
    let mut patches = Vec::new();

    for (name, old_value) in old.attrs.iter() {
        match new.attrs.get(name) {
            None => patches.push(Patch::RemoveAttr {
                path: base.clone(),
                name: name.to_string(),
            }),
            Some(new_value) if new_value != old_value => patches.push(Patch::SetAttr {
                path: base.clone(),
                name: name.to_string(),
                value: new_value.to_string(),
            }),
            Some(_) => {}
        }
    }

    for (name, value) in new.attrs.iter() {
        if !old.attrs.contains(name) {
            patches.push(Patch::SetAttr {
                path: base.clone(),
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    patches
}

fn diff_children(old: &[Node], new: &[Node], base: &NodePath) -> Vec<Patch> {
    if group_is_keyed(old) || group_is_keyed(new) {
        diff_keyed_children(old, new, base)
    } else {
        diff_positional_children(old, new, base)
    }
}

/// Indexed walk for groups with no explicit keys.
///
/// Removing the head of a long list morphs every surviving position and drops
/// the tail: this is the documented cost of unkeyed lists, and the reason
/// keying exists.
fn diff_positional_children(old: &[Node], new: &[Node], base: &NodePath) -> Vec<Patch> {
    let mut patches = Vec::new();
    let shared = old.len().min(new.len());

    for index in 0..shared {
        patches.extend(diff_at(Some(&old[index]), &new[index], base.child(index)));
    }

    // Tail removals run high-to-low so earlier removals never shift the
    // addresses of later ones.
    for index in (new.len()..old.len()).rev() {
        patches.push(Patch::RemoveChild {
            path: base.child(index),
        });
    }

    for (index, node) in new.iter().enumerate().skip(old.len()) {
        patches.push(Patch::InsertChild {
            parent: base.clone(),
            index,
            node: node.clone(),
        });
    }

    patches
}

/// A slot in the simulated client child list during keyed reconciliation.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Survivor, identified by its index in the old sibling list.
    Old(usize),
    /// Freshly inserted node, identified by its index in the new list.
    New(usize),
}

/// Keyed reconciliation for groups where either side declares explicit keys.
///
/// Emission order is what makes sequential client application sound:
///
/// 1. removals of unmatched old children, descending old index;
/// 2. a structure pass over the new list — inserts at final indices and
///    key-addressed moves, validated against a scratch model of the client's
///    child list so every emitted index is correct at its point in the stream;
/// 3. a content pass recursing into matched pairs, once all survivors sit at
///    their final indices.
fn diff_keyed_children(old: &[Node], new: &[Node], base: &NodePath) -> Vec<Patch> {
    let old_keys = extract_keys(old);
    let new_keys = extract_keys(new);

    // Explicit key -> old index; first occurrence wins on duplicates.
    let mut by_key: HashMap<&str, usize> = HashMap::new();
    for (index, key) in old_keys.iter().enumerate() {
        if let Key::Explicit(value) = key {
            by_key.entry(value.as_str()).or_insert(index);
        }
    }

    // Positional members match by their rank among positional members only,
    // never by raw child index.
    let positional_old: Vec<usize> = old_keys
        .iter()
        .enumerate()
        .filter(|(_, key)| !key.is_explicit())
        .map(|(index, _)| index)
        .collect();

    let mut consumed = vec![false; old.len()];
    let mut matches: Vec<Option<usize>> = Vec::with_capacity(new.len());
    let mut positional_cursor = 0;

    for key in &new_keys {
        let matched = match key {
            Key::Explicit(value) => match by_key.get(value.as_str()) {
                Some(&index) if !consumed[index] => Some(index),
                // Unknown key, or a duplicate whose first occurrence already
                // claimed the old node: treat as a fresh insert.
                _ => None,
            },
            Key::Positional(_) => {
                let matched = positional_old.get(positional_cursor).copied();
                positional_cursor += 1;
                matched
            }
        };
        if let Some(index) = matched {
            consumed[index] = true;
        }
        matches.push(matched);
    }

    let mut patches = Vec::new();

    for index in (0..old.len()).rev() {
        if !consumed[index] {
            patches.push(Patch::RemoveChild {
                path: base.child(index),
            });
        }
    }

    // Scratch model of the client's child list after the removals above.
    let mut working: Vec<Slot> = (0..old.len())
        .filter(|&index| consumed[index])
        .map(Slot::Old)
        .collect();

    for (new_index, matched) in matches.iter().enumerate() {
        let Some(old_index) = *matched else {
            patches.push(Patch::InsertChild {
                parent: base.clone(),
                index: new_index,
                node: new[new_index].clone(),
            });
            working.insert(new_index, Slot::New(new_index));
            continue;
        };

        match &new_keys[new_index] {
            Key::Explicit(key) => {
                let Some(current) = position_of(&working, Slot::Old(old_index)) else {
                    continue;
                };
                if current != new_index || old_index != new_index {
                    patches.push(Patch::MoveChild {
                        parent: base.clone(),
                        key: key.clone(),
                        to: new_index,
                    });
                    let slot = working.remove(current);
                    working.insert(new_index, slot);
                }
            }
            Key::Positional(_) => {
                // A positional member cannot be addressed by a move. Displace
                // keyed blockers to the tail until it surfaces at its slot;
                // each blocker is repositioned when its own turn comes. The
                // blocker is always a keyed, not-yet-placed survivor: placed
                // children sit left of `new_index`, and the first unplaced
                // positional survivor is this child itself.
                loop {
                    match position_of(&working, Slot::Old(old_index)) {
                        Some(current) if current > new_index => {
                            let Slot::Old(blocker) = working[new_index] else {
                                debug_assert!(false, "inserted nodes are always placed");
                                break;
                            };
                            let Key::Explicit(blocker_key) = &old_keys[blocker] else {
                                debug_assert!(false, "blocker must be keyed");
                                break;
                            };
                            patches.push(Patch::MoveChild {
                                parent: base.clone(),
                                key: blocker_key.clone(),
                                to: working.len() - 1,
                            });
                            let slot = working.remove(new_index);
                            working.push(slot);
                        }
                        _ => break,
                    }
                }
            }
        }
    }

    for (new_index, matched) in matches.iter().enumerate() {
        if let Some(old_index) = *matched {
            patches.extend(diff_at(
                Some(&old[old_index]),
                &new[new_index],
                base.child(new_index),
            ));
        }
    }

    patches
}

fn position_of(working: &[Slot], slot: Slot) -> Option<usize> {
    working.iter().position(|&candidate| candidate == slot)
}

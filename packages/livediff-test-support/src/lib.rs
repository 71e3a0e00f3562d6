#![forbid(unsafe_code)]
//! Shared builders and assertion helpers for the livediff test suites.

use std::collections::HashMap;

use livediff_core::{Node, Patch};

pub fn txt(content: &str) -> Node {
    Node::text(content)
}

/// `<tag>` wrapping one `<child_tag>` per text, unkeyed.
pub fn item_list(tag: &str, child_tag: &str, texts: &[&str]) -> Node {
    Node::element(tag).with_children(
        texts
            .iter()
            .map(|text| Node::element(child_tag).with_child(Node::text(*text)))
            .collect(),
    )
}

/// `<tag>` wrapping one keyed `<child_tag>` per `(key, text)` entry.
pub fn keyed_list(tag: &str, child_tag: &str, entries: &[(&str, &str)]) -> Node {
    Node::element(tag).with_children(
        entries
            .iter()
            .map(|(key, text)| {
                Node::element(child_tag)
                    .with_key(*key)
                    .with_child(Node::text(*text))
            })
            .collect(),
    )
}

/// Histogram of patch kinds, for shape assertions.
pub fn count_patch_kinds(patches: &[Patch]) -> HashMap<&'static str, usize> {
    let mut counts = HashMap::new();
    for patch in patches {
        *counts.entry(patch.kind()).or_insert(0) += 1;
    }
    counts
}

use livediff_core::{
    analyze, apply_patches, diff, DiagnosticCode, DiagnosticsConfig, Node, Patch,
};

fn keyed_item(key: &str, text: &str) -> Node {
    Node::element("li")
        .with_key(key)
        .with_child(Node::text(text))
}

fn list(children: Vec<Node>) -> Node {
    Node::element("ul").with_children(children)
}

fn kinds(patches: &[Patch]) -> Vec<&'static str> {
    patches.iter().map(Patch::kind).collect()
}

#[test]
fn reversing_a_keyed_list_is_moves_only() {
    let old = list(vec![
        keyed_item("a", "alpha"),
        keyed_item("b", "beta"),
        keyed_item("c", "gamma"),
        keyed_item("d", "delta"),
    ]);
    let new = list(vec![
        keyed_item("d", "delta"),
        keyed_item("c", "gamma"),
        keyed_item("b", "beta"),
        keyed_item("a", "alpha"),
    ]);

    let patches = diff(&old, &new);

    // one move per child, nothing rewritten
    assert_eq!(patches.len(), 4);
    assert!(patches
        .iter()
        .all(|patch| matches!(patch, Patch::MoveChild { .. })));

    let mut dom = old.clone();
    apply_patches(&mut dom, &patches).unwrap();
    assert_eq!(dom, new);
}

#[test]
fn moved_child_updates_at_its_new_address() {
    let old = list(vec![
        keyed_item("a", "alpha"),
        keyed_item("b", "beta"),
        keyed_item("c", "gamma"),
    ]);
    let new = list(vec![
        keyed_item("c", "gamma prime"),
        keyed_item("a", "alpha"),
        keyed_item("b", "beta"),
    ]);

    let patches = diff(&old, &new);

    assert!(patches.iter().any(|patch| matches!(
        patch,
        Patch::MoveChild { key, to: 0, .. } if key == "c"
    )));
    assert!(patches.iter().any(|patch| matches!(
        patch,
        Patch::SetText { path, text } if path.as_slice() == [0, 0] && text == "gamma prime"
    )));
    // the content patch must come after the move that placed its target
    let move_pos = patches
        .iter()
        .position(|p| matches!(p, Patch::MoveChild { key, .. } if key == "c"))
        .unwrap();
    let text_pos = patches
        .iter()
        .position(|p| matches!(p, Patch::SetText { .. }))
        .unwrap();
    assert!(move_pos < text_pos);

    let mut dom = old.clone();
    apply_patches(&mut dom, &patches).unwrap();
    assert_eq!(dom, new);
}

#[test]
fn keyed_insert_and_removal() {
    let old = list(vec![
        keyed_item("a", "alpha"),
        keyed_item("b", "beta"),
        keyed_item("c", "gamma"),
    ]);
    let new = list(vec![
        keyed_item("c", "gamma"),
        keyed_item("x", "fresh"),
        keyed_item("a", "alpha"),
    ]);

    let patches = diff(&old, &new);

    // b leaves, x arrives whole, c moves to the front
    assert!(patches.iter().any(|patch| matches!(
        patch,
        Patch::RemoveChild { path } if path.as_slice() == [1]
    )));
    assert!(patches.iter().any(|patch| matches!(
        patch,
        Patch::InsertChild { index: 1, node, .. } if node.key() == Some("x")
    )));
    assert!(patches.iter().any(|patch| matches!(
        patch,
        Patch::MoveChild { key, to: 0, .. } if key == "c"
    )));

    let mut dom = old.clone();
    apply_patches(&mut dom, &patches).unwrap();
    assert_eq!(dom, new);
}

#[test]
fn duplicate_key_first_occurrence_wins() {
    let old = list(vec![keyed_item("a", "original"), keyed_item("b", "beta")]);
    let new = list(vec![
        keyed_item("a", "first"),
        keyed_item("a", "second"),
        keyed_item("b", "beta"),
    ]);

    let patches = diff(&old, &new);

    // the first `a` in document order matched the old node and morphs in
    // place; the second is a fresh insert
    assert!(patches.iter().any(|patch| matches!(
        patch,
        Patch::SetText { path, text } if path.as_slice() == [0, 0] && text == "first"
    )));
    assert!(patches.iter().any(|patch| matches!(
        patch,
        Patch::InsertChild { index: 1, node, .. }
            if node.children().first() == Some(&Node::text("second"))
    )));
    assert!(!patches
        .iter()
        .any(|patch| matches!(patch, Patch::Replace { .. })));

    let mut dom = old.clone();
    apply_patches(&mut dom, &patches).unwrap();
    assert_eq!(dom, new);

    let findings = analyze(&new, &patches, &DiagnosticsConfig::default());
    assert!(findings
        .iter()
        .any(|finding| finding.code == DiagnosticCode::DuplicateKey));
}

#[test]
fn mixed_group_keeps_keyed_content_attached_to_its_key() {
    let old = list(vec![
        keyed_item("a", "alpha"),
        Node::element("li").with_child(Node::text("filler one")),
        keyed_item("b", "beta"),
        Node::element("li").with_child(Node::text("filler two")),
        keyed_item("c", "gamma"),
    ]);
    // one unkeyed child inserted at the front, every keyed child's text
    // changed — each rewrite must land on the matching key's subtree
    let new = list(vec![
        Node::element("li").with_child(Node::text("newcomer")),
        keyed_item("a", "alpha 2"),
        Node::element("li").with_child(Node::text("filler one")),
        keyed_item("b", "beta 2"),
        Node::element("li").with_child(Node::text("filler two")),
        keyed_item("c", "gamma 2"),
    ]);

    let patches = diff(&old, &new);

    // keyed children are matched, never replaced or re-inserted
    for patch in &patches {
        if let Patch::InsertChild { node, .. } = patch {
            assert_eq!(node.key(), None, "keyed child re-inserted: {patch:?}");
        }
        assert!(
            !matches!(patch, Patch::Replace { .. }),
            "unexpected replace: {patch:?}"
        );
    }

    let mut dom = old.clone();
    apply_patches(&mut dom, &patches).unwrap();
    assert_eq!(dom, new);

    for (key, text) in [("a", "alpha 2"), ("b", "beta 2"), ("c", "gamma 2")] {
        let li = dom
            .children()
            .iter()
            .find(|child| child.key() == Some(key))
            .unwrap();
        assert_eq!(li.children().to_vec(), vec![Node::text(text)]);
    }
}

#[test]
fn old_keyed_list_emptied_of_keys_falls_back_cleanly() {
    let old = list(vec![keyed_item("a", "alpha"), keyed_item("b", "beta")]);
    let new = list(vec![
        Node::element("li").with_child(Node::text("plain one")),
        Node::element("li").with_child(Node::text("plain two")),
    ]);

    let patches = diff(&old, &new);
    assert_eq!(
        kinds(&patches),
        vec!["RemoveChild", "RemoveChild", "InsertChild", "InsertChild"]
    );

    let mut dom = old.clone();
    apply_patches(&mut dom, &patches).unwrap();
    assert_eq!(dom, new);
}

#[test]
fn legacy_key_attribute_matches_primary() {
    let old = list(vec![
        Node::element("li")
            .with_attr("dj-key", "a")
            .with_child(Node::text("alpha")),
        Node::element("li")
            .with_attr("dj-key", "b")
            .with_child(Node::text("beta")),
    ]);
    let new = list(vec![
        Node::element("li")
            .with_attr("dj-key", "b")
            .with_child(Node::text("beta")),
        Node::element("li")
            .with_attr("dj-key", "a")
            .with_child(Node::text("alpha")),
    ]);

    let patches = diff(&old, &new);
    assert!(patches
        .iter()
        .all(|patch| matches!(patch, Patch::MoveChild { .. })));

    let mut dom = old.clone();
    apply_patches(&mut dom, &patches).unwrap();
    assert_eq!(dom, new);
}

use livediff_core::{apply_patches, diff, Node};
use proptest::prelude::*;

const KEY_POOL: &[&str] = &["a", "b", "c", "d", "e", "f", "g", "h"];
const TAGS: &[&str] = &["div", "span", "p", "ul"];
const ATTR_NAMES: &[&str] = &["class", "style", "href", "title", "role"];

/// Arbitrary unkeyed trees, depth-bounded.
fn arb_tree() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[a-z ]{0,8}".prop_map(|content| Node::text(content)),
        Just(Node::element("hr")),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop::sample::select(TAGS),
            prop::collection::vec(
                (prop::sample::select(ATTR_NAMES), "[a-z0-9]{0,6}"),
                0..=3,
            ),
            prop::collection::vec(inner, 0..=4),
        )
            .prop_map(|(tag, attrs, children)| {
                let mut node = Node::element(tag);
                for (name, value) in attrs {
                    node = node.with_attr(name, value);
                }
                node.with_children(children)
            })
    })
}

/// Sibling groups mixing keyed and unkeyed members in random order, with
/// unique keys drawn from a shared pool so independently generated old and
/// new lists share identities.
fn arb_mixed_list(label: &'static str) -> impl Strategy<Value = Node> {
    (
        prop::sample::subsequence(KEY_POOL.to_vec(), 0..=KEY_POOL.len()),
        0usize..4,
    )
        .prop_flat_map(move |(keys, unkeyed)| {
            let mut tokens: Vec<Option<&'static str>> = keys.into_iter().map(Some).collect();
            tokens.extend(std::iter::repeat(None).take(unkeyed));
            Just(tokens).prop_shuffle().prop_map(move |tokens| {
                Node::element("ul").with_children(
                    tokens
                        .iter()
                        .enumerate()
                        .map(|(index, token)| match token {
                            Some(key) => Node::element("li")
                                .with_key(*key)
                                .with_child(Node::text(format!("{label} {key}"))),
                            None => Node::element("li")
                                .with_child(Node::text(format!("{label} filler {index}"))),
                        })
                        .collect(),
                )
            })
        })
}

fn uppercase_texts(node: &Node) -> Node {
    match node {
        Node::Text { content } => Node::text(content.to_uppercase()),
        Node::Comment { content } => Node::comment(content.clone()),
        Node::Element(element) => {
            let mut copy = element.clone();
            copy.children = element.children.iter().map(uppercase_texts).collect();
            Node::Element(copy)
        }
    }
}

proptest! {
    /// diff(t, t) is always empty.
    #[test]
    fn no_op_diff_is_empty(tree in arb_tree()) {
        prop_assert!(diff(&tree, &tree.clone()).is_empty());
    }

    /// Applying diff(old, new) to a DOM equal to old yields new, for
    /// arbitrary unkeyed tree pairs.
    #[test]
    fn unkeyed_diff_replays(old in arb_tree(), new in arb_tree()) {
        let patches = diff(&old, &new);
        let mut dom = old.clone();
        apply_patches(&mut dom, &patches).unwrap();
        prop_assert_eq!(dom, new);
    }

    /// Same, over keyed and mixed sibling groups: reorders, insertions,
    /// removals, and content changes all at once.
    #[test]
    fn keyed_diff_replays(
        old in arb_mixed_list("old"),
        new in arb_mixed_list("new"),
    ) {
        let patches = diff(&old, &new);
        let mut dom = old.clone();
        apply_patches(&mut dom, &patches).unwrap();
        prop_assert_eq!(dom, new);
    }

    /// Pure reorders of fully keyed groups never rewrite content.
    #[test]
    fn keyed_reorder_is_structure_only(
        keys in prop::sample::subsequence(KEY_POOL.to_vec(), 1..=KEY_POOL.len()),
    ) {
        let build = |order: &[&str]| {
            Node::element("ul").with_children(
                order
                    .iter()
                    .map(|key| {
                        Node::element("li")
                            .with_key(*key)
                            .with_child(Node::text(format!("item {key}")))
                    })
                    .collect(),
            )
        };
        let old = build(&keys);
        let reversed: Vec<&str> = keys.iter().rev().copied().collect();
        let new = build(&reversed);

        let patches = diff(&old, &new);
        prop_assert!(patches.iter().all(|p| p.kind() == "MoveChild"));

        let mut dom = old.clone();
        apply_patches(&mut dom, &patches).unwrap();
        prop_assert_eq!(dom, new);
    }

    /// A content-only patch list is idempotent: replaying it against the
    /// result is a no-op.
    #[test]
    fn content_patches_replay_idempotently(tree in arb_tree()) {
        let new = uppercase_texts(&tree);
        let patches = diff(&tree, &new);

        let mut once = tree.clone();
        apply_patches(&mut once, &patches).unwrap();
        prop_assert_eq!(&once, &new);

        let mut twice = once.clone();
        apply_patches(&mut twice, &patches).unwrap();
        prop_assert_eq!(twice, new);
    }
}

use crate::error::{Error, Result};
use crate::key::{KEY_ATTRIBUTE, LEGACY_KEY_ATTRIBUTE};
use crate::patch::NodePath;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Insertion-ordered attribute map.
///
/// Rendered markup carries few attributes per element, so a vector with linear
/// lookup wins over a hash map while keeping the order attributes appeared in,
/// which in turn keeps attribute patch emission deterministic.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AttrList(Vec<(String, String)>);

impl AttrList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing in place so the original position is kept.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.0.iter().position(|(existing, _)| existing == name)?;
        Some(self.0.remove(index).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for AttrList {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut attrs = AttrList::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

/// An element node: tag, ordered attributes, ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    pub tag: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "AttrList::is_empty"))]
    pub attrs: AttrList,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: AttrList::new(),
            children: Vec::new(),
        }
    }

    /// The diff identity of this element, if it declares one.
    ///
    /// `data-key` wins over the legacy `dj-key` spelling; empty values count
    /// as absent. Plain `id` attributes are deliberately not identities —
    /// keying is an explicit opt-in.
    pub fn key(&self) -> Option<&str> {
        self.attrs
            .get(KEY_ATTRIBUTE)
            .or_else(|| self.attrs.get(LEGACY_KEY_ATTRIBUTE))
            .filter(|value| !value.is_empty())
    }
}

/// A parsed node of rendered markup.
///
/// The tree handed to the differ is immutable by contract: diffing borrows
/// `old` and `new` and only ever allocates patches.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Node {
    Element(Element),
    Text { content: String },
    Comment { content: String },
}

impl Node {
    pub fn element(tag: impl Into<String>) -> Self {
        Node::Element(Element::new(tag))
    }

    pub fn text(content: impl Into<String>) -> Self {
        Node::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        Node::Comment {
            content: content.into(),
        }
    }

    /// Builder: set an attribute. No effect on text and comment nodes.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let Node::Element(element) = &mut self {
            element.attrs.set(name, value);
        }
        self
    }

    /// Builder: declare the diff identity via the primary key attribute.
    pub fn with_key(self, key: impl Into<String>) -> Self {
        self.with_attr(KEY_ATTRIBUTE, key)
    }

    /// Builder: append a child. No effect on text and comment nodes.
    pub fn with_child(mut self, child: Node) -> Self {
        if let Node::Element(element) = &mut self {
            element.children.push(child);
        }
        self
    }

    /// Builder: replace the child list. No effect on text and comment nodes.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        if let Node::Element(element) = &mut self {
            element.children = children;
        }
        self
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text { .. })
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Node::Element(element) => Some(element.tag.as_str()),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// The declared diff identity, if any (elements only).
    pub fn key(&self) -> Option<&str> {
        self.as_element().and_then(Element::key)
    }

    /// Children of this node; leaves have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(element) => &element.children,
            _ => &[],
        }
    }

    /// Resolve a structural address against this tree.
    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        let mut current = self;
        for &index in path.as_slice() {
            current = current.children().get(index)?;
        }
        Some(current)
    }

    /// Defensive bound on tree depth, checked before a tree enters a diff
    /// cycle. Iterative so the check itself cannot overflow the stack on the
    /// trees it exists to reject.
    pub fn ensure_depth(&self, max_depth: usize) -> Result<()> {
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            if depth > max_depth {
                return Err(Error::TreeTooDeep {
                    depth,
                    max: max_depth,
                });
            }
            for child in node.children() {
                stack.push((child, depth + 1));
            }
        }
        Ok(())
    }
}

//! The serializable DOM mutation instruction set.

use std::fmt;

use crate::node::Node;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural address of a node: child indices from the diff root.
///
/// Paths are resolved against the client's live DOM at the moment the patch
/// is applied; the differ's emission order guarantees every address is valid
/// when its patch is reached.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// The address of the `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Split into parent address and final child index; `None` at the root.
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (&last, parent) = self.0.split_last()?;
        Some((Self(parent.to_vec()), last))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for index in &self.0 {
            write!(f, "/{index}")?;
        }
        Ok(())
    }
}

/// One atomic, ordered DOM mutation.
///
/// A patch list is applied strictly in emitted order; later addresses assume
/// earlier patches already landed. `MoveChild` names its subject by key so a
/// client can perform a true move (preserving focus, scroll, and selection)
/// without ever consulting a stale source index.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum Patch {
    /// Replace the whole subtree at `path` with `node`.
    Replace { path: NodePath, node: Node },
    /// Overwrite the content of the text or comment node at `path`.
    SetText { path: NodePath, text: String },
    SetAttr {
        path: NodePath,
        name: String,
        value: String,
    },
    RemoveAttr { path: NodePath, name: String },
    /// Insert `node` as the `index`-th child of `parent`.
    InsertChild {
        parent: NodePath,
        index: usize,
        node: Node,
    },
    /// Remove the child at `path` from its parent.
    RemoveChild { path: NodePath },
    /// Move the child of `parent` carrying `key` to position `to`.
    MoveChild {
        parent: NodePath,
        key: String,
        to: usize,
    },
}

impl Patch {
    pub fn kind(&self) -> &'static str {
        match self {
            Patch::Replace { .. } => "Replace",
            Patch::SetText { .. } => "SetText",
            Patch::SetAttr { .. } => "SetAttr",
            Patch::RemoveAttr { .. } => "RemoveAttr",
            Patch::InsertChild { .. } => "InsertChild",
            Patch::RemoveChild { .. } => "RemoveChild",
            Patch::MoveChild { .. } => "MoveChild",
        }
    }
}

//! Reference patch applier.
//!
//! Mirrors the client-side application contract: patches land strictly in
//! emitted order, and `MoveChild` resolves its subject by key under the
//! parent and splices it — a true move, never remove-and-recreate. The
//! property suites drive this applier to prove replay correctness.

use crate::error::{Error, Result};
use crate::node::{Element, Node};
use crate::patch::{NodePath, Patch};

/// Apply a patch list to a tree, in order.
pub fn apply_patches(root: &mut Node, patches: &[Patch]) -> Result<()> {
    for patch in patches {
        apply_patch(root, patch)?;
    }
    Ok(())
}

/// Apply a single patch. Address failures are reported, not ignored.
pub fn apply_patch(root: &mut Node, patch: &Patch) -> Result<()> {
    match patch {
        Patch::Replace { path, node } => {
            *resolve_mut(root, path)? = node.clone();
        }
        Patch::SetText { path, text } => match resolve_mut(root, path)? {
            Node::Text { content } | Node::Comment { content } => *content = text.clone(),
            Node::Element(_) => {
                return Err(Error::PatchAddress(format!(
                    "SetText target at {path} is an element"
                )))
            }
        },
        Patch::SetAttr { path, name, value } => {
            element_mut(root, path, "SetAttr")?
                .attrs
                .set(name.clone(), value.clone());
        }
        Patch::RemoveAttr { path, name } => {
            element_mut(root, path, "RemoveAttr")?.attrs.remove(name);
        }
        Patch::InsertChild {
            parent,
            index,
            node,
        } => {
            let element = element_mut(root, parent, "InsertChild")?;
            if *index > element.children.len() {
                return Err(Error::PatchAddress(format!(
                    "insert index {index} out of bounds under {parent}"
                )));
            }
            element.children.insert(*index, node.clone());
        }
        Patch::RemoveChild { path } => {
            let Some((parent, index)) = path.split_last() else {
                return Err(Error::PatchAddress("cannot remove the root node".into()));
            };
            let element = element_mut(root, &parent, "RemoveChild")?;
            if index >= element.children.len() {
                return Err(Error::PatchAddress(format!(
                    "remove index {index} out of bounds under {parent}"
                )));
            }
            element.children.remove(index);
        }
        Patch::MoveChild { parent, key, to } => {
            let element = element_mut(root, parent, "MoveChild")?;
            let Some(from) = element
                .children
                .iter()
                .position(|child| child.key() == Some(key.as_str()))
            else {
                return Err(Error::PatchAddress(format!(
                    "no child with key {key:?} under {parent}"
                )));
            };
            let node = element.children.remove(from);
            if *to > element.children.len() {
                return Err(Error::PatchAddress(format!(
                    "move destination {to} out of bounds under {parent}"
                )));
            }
            element.children.insert(*to, node);
        }
    }
    Ok(())
}

fn resolve_mut<'a>(root: &'a mut Node, path: &NodePath) -> Result<&'a mut Node> {
    let mut current = root;
    for &index in path.as_slice() {
        let children = match current {
            Node::Element(element) => &mut element.children,
            _ => {
                return Err(Error::PatchAddress(format!(
                    "path {path} descends into a leaf node"
                )))
            }
        };
        current = children.get_mut(index).ok_or_else(|| {
            Error::PatchAddress(format!("index {index} of path {path} out of bounds"))
        })?;
    }
    Ok(current)
}

fn element_mut<'a>(root: &'a mut Node, path: &NodePath, op: &str) -> Result<&'a mut Element> {
    match resolve_mut(root, path)? {
        Node::Element(element) => Ok(element),
        _ => Err(Error::PatchAddress(format!(
            "{op} target at {path} is not an element"
        ))),
    }
}

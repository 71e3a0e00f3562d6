//! HTML parsing into the node model (feature `html`).
//!
//! Comment nodes and whitespace-only text nodes are dropped during
//! conversion. Renderers emit indentation between elements freely; keeping it
//! in the tree would make every reformat look like a content change to the
//! differ.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{Error, Result};
use crate::node::{AttrList, Element, Node};

/// Parse an HTML fragment into a tree rooted at its first element.
pub fn parse_html(html: &str) -> Result<Node> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .map_err(|err| Error::Parse(format!("failed to read input: {err}")))?;

    let root = find_content_root(&dom.document);
    convert(&root).ok_or_else(|| Error::Parse("document contains no element content".into()))
}

/// html5ever wraps fragments in `<html><head/><body>...</body></html>`; the
/// caller wants the actual content element.
fn find_content_root(document: &Handle) -> Handle {
    for child in document.children.borrow().iter() {
        if tag_is(child, "html") {
            for html_child in child.children.borrow().iter() {
                if tag_is(html_child, "body") {
                    for body_child in html_child.children.borrow().iter() {
                        if matches!(body_child.data, NodeData::Element { .. }) {
                            return body_child.clone();
                        }
                    }
                }
            }
        }
    }

    for child in document.children.borrow().iter() {
        if matches!(child.data, NodeData::Element { .. }) {
            return child.clone();
        }
    }
    document.clone()
}

fn tag_is(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, NodeData::Element { name, .. } if name.local.as_ref() == tag)
}

fn convert(handle: &Handle) -> Option<Node> {
    match &handle.data {
        NodeData::Text { contents } => Some(Node::text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(name.local.to_string());
            element.attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect::<AttrList>();

            for child in handle.children.borrow().iter() {
                if matches!(child.data, NodeData::Comment { .. }) {
                    continue;
                }
                let Some(converted) = convert(child) else {
                    continue;
                };
                if let Node::Text { content } = &converted {
                    if content.chars().all(char::is_whitespace) {
                        continue;
                    }
                }
                element.children.push(converted);
            }

            Some(Node::Element(element))
        }
        _ => None,
    }
}

//! HTML serialization for the full-replace wire mode.

use crate::node::Node;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Serialize a tree back to HTML.
pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text { content } => escape_text(content, out),
        Node::Comment { content } => {
            out.push_str("<!--");
            out.push_str(content);
            out.push_str("-->");
        }
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in element.attrs.iter() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr(value, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                return;
            }
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape_text(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_nested_markup() {
        let tree = Node::element("div")
            .with_attr("class", "panel")
            .with_children(vec![
                Node::element("span").with_child(Node::text("Hello")),
                Node::comment("marker"),
            ]);
        assert_eq!(
            to_html(&tree),
            "<div class=\"panel\"><span>Hello</span><!--marker--></div>"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let tree = Node::element("a")
            .with_attr("title", "a \"b\" & c")
            .with_child(Node::text("1 < 2 & 3 > 2"));
        assert_eq!(
            to_html(&tree),
            "<a title=\"a &quot;b&quot; &amp; c\">1 &lt; 2 &amp; 3 &gt; 2</a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let tree = Node::element("p").with_children(vec![
            Node::element("input").with_attr("type", "text"),
            Node::element("br"),
        ]);
        assert_eq!(to_html(&tree), "<p><input type=\"text\"><br></p>");
    }
}

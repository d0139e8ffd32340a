//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Produces the markup returned by the `innerHTML` and `outerHTML` getters.
//! Feeding the output of [`inner_html`] back through
//! [`parse_fragment_into`](crate::parse_fragment_into) rebuilds an equivalent
//! subtree, which is what a "from scratch" rebuild of a page relies on.

use reflow_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::parser::core::VOID_ELEMENTS;

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element ... then append the value of current node's
/// data IDL attribute literally."
const LITERAL_TEXT_PARENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes", "plaintext",
];

/// Serialize the children of `id`.
#[must_use]
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    // "If the node is a template element, then let the node instead be the
    // template element's template contents" - templates are plain elements here.
    for &child in tree.children(id) {
        serialize_node(tree, child, &mut out);
    }
    out
}

/// Serialize `id` itself together with its children.
#[must_use]
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_node(tree, id, &mut out);
    out
}

fn serialize_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else { return };
    match &node.node_type {
        NodeType::Document => {
            for &child in tree.children(id) {
                serialize_node(tree, child, out);
            }
        }
        NodeType::Element(data) => serialize_element(tree, id, data, out),
        NodeType::Text(text) => {
            let literal = node
                .parent
                .and_then(|parent| tree.as_element(parent))
                .is_some_and(|parent| LITERAL_TEXT_PARENTS.contains(&parent.tag_name.as_str()));
            if literal {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        // "Append the literal string "<!--", followed by the value of current
        // node's data IDL attribute, followed by the literal string "-->"."
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
    }
}

fn serialize_element(tree: &DomTree, id: NodeId, data: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&data.tag_name);
    for (name, value) in data.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');

    // "If current node serializes as void, then continue on to the next child node"
    if VOID_ELEMENTS.contains(&data.tag_name.as_str()) {
        return;
    }

    for &child in tree.children(id) {
        serialize_node(tree, child, out);
    }

    out.push_str("</");
    out.push_str(&data.tag_name);
    out.push('>');
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// "Replace any occurrence of the "&" character by the string "&amp;".
/// Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the string "&nbsp;".
/// If the algorithm was invoked in attribute mode, replace any occurrences of the
/// """ character by the string "&quot;".
/// If the algorithm was not invoked in attribute mode, replace any occurrences of
/// the "<" character by the string "&lt;", and any occurrences of the ">"
/// character by the string "&gt;"."
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

//! Document → HTML serialization.
//!
//! Writes the (possibly mutated) document back out as markup so a page host
//! can hand it to whatever renders it. Inline style maps are re-emitted as a
//! `style` attribute.

use super::{Document, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text content is raw and must not be entity-escaped.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Serializes the whole document.
pub fn to_html(doc: &Document) -> String {
    let mut out = String::new();
    write_node(doc, doc.root(), &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    if let Some(text) = doc.text(node) {
        out.push_str(&escape_text(text));
        return;
    }
    let Some(element) = doc.element(node) else {
        return;
    };

    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attribute(value));
        out.push('"');
    }
    if !element.style.is_empty() {
        let style: Vec<String> = element
            .style
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        out.push_str(" style=\"");
        out.push_str(&escape_attribute(&style.join("; ")));
        out.push('"');
    }
    out.push('>');

    let children = doc.children(node);
    if VOID_ELEMENTS.contains(&element.tag.as_str()) && children.is_empty() {
        return;
    }
    if RAW_TEXT_ELEMENTS.contains(&element.tag.as_str()) {
        for &child in children {
            out.push_str(doc.text(child).unwrap_or_default());
        }
    } else {
        for &child in children {
            write_node(doc, child, out);
        }
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

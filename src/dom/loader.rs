//! HTML → document conversion.
//!
//! Parsing proper is delegated to `scraper` (html5ever underneath), so real
//! page markup with all its tag-soup quirks arrives here as a well-formed
//! element tree; this module only transcribes that tree into the arena.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html};

use super::{Document, NodeId};

/// Parses page markup into a [`Document`].
///
/// Whitespace-only text runs are dropped; element structure is what the
/// engine operates on. Comments and doctype nodes are skipped.
pub fn parse_html(html: &str) -> Document {
    let parsed = Html::parse_document(html);
    let root = parsed.root_element();

    let mut doc = Document::from_root(root.value().name());
    let doc_root = doc.root();
    copy_attributes(&mut doc, doc_root, &root);

    let mut stack: Vec<(ElementRef<'_>, NodeId)> = vec![(root, doc_root)];
    while let Some((element, node)) = stack.pop() {
        for child in element.children() {
            if let Some(child_element) = ElementRef::wrap(child) {
                let child_node = doc.create_element(child_element.value().name());
                copy_attributes(&mut doc, child_node, &child_element);
                doc.append_child(node, child_node);
                stack.push((child_element, child_node));
            } else if let scraper::Node::Text(text) = child.value() {
                if !text.trim().is_empty() {
                    let text_node = doc.create_text(text);
                    doc.append_child(node, text_node);
                }
            }
        }
    }
    doc
}

fn copy_attributes(doc: &mut Document, node: NodeId, element: &ElementRef<'_>) {
    for (name, value) in element.value().attrs() {
        if name.eq_ignore_ascii_case("style") {
            for (property, css_value) in parse_inline_style(value) {
                doc.set_style_property(node, &property, &css_value);
            }
        } else {
            doc.set_attribute(node, name, value);
        }
    }
}

/// Splits an inline `style` attribute into property/value pairs.
pub(crate) fn parse_inline_style(value: &str) -> BTreeMap<String, String> {
    value
        .split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .map(|(name, val)| (name.trim().to_ascii_lowercase(), val.trim().to_string()))
        .filter(|(name, val)| !name.is_empty() && !val.is_empty())
        .collect()
}

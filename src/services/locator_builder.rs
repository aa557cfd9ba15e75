//! Structural locator construction.
//!
//! A locator is a root-to-leaf path of selector segments joined by `" > "`.
//! An id is treated as unique and terminates the upward walk. Validating
//! uniqueness would change the meaning of previously persisted locators, so
//! the assumption is inherited as-is.

use crate::dom::{Document, NodeId};

/// Builds a structural locator for a document node.
///
/// Returns `None` for non-element nodes. Each segment is the element's tag,
/// qualified by `#id` (which stops the walk) or by `:nth-of-type(k)` when the
/// element is not the first of its tag among its siblings.
pub fn build(doc: &Document, node: NodeId) -> Option<String> {
    if !doc.is_element(node) {
        return None;
    }

    let mut path: Vec<String> = Vec::new();
    let mut cur = Some(node);
    while let Some(element) = cur {
        let tag = doc.tag(element)?;
        let mut selector = tag.to_string();
        if let Some(id) = doc.id(element) {
            selector.push('#');
            selector.push_str(id);
            path.push(selector);
            break;
        }
        let nth = doc.nth_of_type(element);
        if nth != 1 {
            selector.push_str(&format!(":nth-of-type({})", nth));
        }
        path.push(selector);
        cur = doc.parent_element(element);
    }

    path.reverse();
    Some(path.join(" > "))
}

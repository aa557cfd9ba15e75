//! Arena-based mutable document model.
//!
//! Nodes are addressed by [`NodeId`] into a flat arena. Detaching a node
//! unlinks its subtree from the tree without reclaiming arena slots; a page
//! session performs a bounded number of mutations, so slots are never reused.

pub mod loader;
pub mod query;
pub mod serialize;

use std::collections::BTreeMap;

/// ID used to address nodes in the document arena.
pub type NodeId = usize;

/// Payload of an element node: tag name, attributes, and parsed inline style.
///
/// The `style` map holds the element's inline style declarations; it is kept
/// separate from `attributes` so individual properties can be set and removed
/// the way script code pokes at `element.style`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
        }
    }
}

/// A document node: an element or a run of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A mutable element tree with a single root element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Creates an empty document: `<html>` root with `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self::from_root("html");
        let head = doc.create_element("head");
        doc.append_child(doc.root, head);
        let body = doc.create_element("body");
        doc.append_child(doc.root, body);
        doc
    }

    /// Creates a document consisting of just a root element.
    pub fn from_root(tag: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: 0,
        };
        doc.root = doc.alloc(NodeData::Element(ElementData::new(tag)));
        doc
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        self.nodes.len() - 1
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Allocates a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element(ElementData::new(tag)))
    }

    /// Allocates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    /// Appends `child` as the last child of `parent`, re-parenting if needed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent >= self.nodes.len() || child >= self.nodes.len() || parent == child {
            return;
        }
        self.detach(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
    }

    /// Unlinks a node (and implicitly its subtree) from its parent.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        self.nodes[parent].children.retain(|&c| c != node);
        self.nodes[node].parent = None;
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// The nearest ancestor that is an element (in this model, any parent).
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|&p| self.is_element(p))
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(node).map(|n| &n.data),
            Some(NodeData::Element(_))
        )
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(node).map(|n| &n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(node).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.nodes.get(node).map(|n| &n.data) {
            Some(NodeData::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    /// The element's id attribute, if present and non-empty.
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "id").filter(|id| !id.is_empty())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.remove(name);
        }
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    pub fn style_property(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| el.style.get(name))
            .map(String::as_str)
    }

    pub fn set_style_property(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.style.insert(name.to_string(), value.to_string());
        }
    }

    pub fn remove_style_property(&mut self, node: NodeId, name: &str) {
        if let Some(el) = self.element_mut(node) {
            el.style.remove(name);
        }
    }

    /// All nodes of the subtree rooted at `node`, in document order.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            for &child in self.children(cur).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// All attached elements, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|&n| self.is_element(n))
            .collect()
    }

    /// True when `node` is `ancestor` or lies inside its subtree.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// First attached element with the given id, in document order.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|&n| self.id(n) == Some(id))
    }

    fn root_child_with_tag(&self, tag: &str) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .find(|&n| self.tag(n) == Some(tag))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.root_child_with_tag("head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.root_child_with_tag("body")
    }

    /// 1-based position of an element among its same-tag element siblings.
    pub fn nth_of_type(&self, node: NodeId) -> usize {
        let Some(tag) = self.tag(node) else {
            return 1;
        };
        let Some(parent) = self.parent(node) else {
            return 1;
        };
        let mut nth = 0;
        for &sibling in self.children(parent) {
            if self.tag(sibling) == Some(tag) {
                nth += 1;
            }
            if sibling == node {
                break;
            }
        }
        nth.max(1)
    }

    /// Replaces the node's children with a single text node.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) {
        for child in self.children(node).to_vec() {
            self.detach(child);
        }
        let text_node = self.create_text(text);
        self.append_child(node, text_node);
    }

    /// Concatenated text of the subtree rooted at `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .iter()
            .filter_map(|&n| self.text(n))
            .collect()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

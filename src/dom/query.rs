//! Matching of structural locators against the document.
//!
//! The locator grammar is the one the locator builder emits: segments joined
//! by `" > "` (child combinator), each segment being `tag`, `tag#id`, or
//! `tag:nth-of-type(k)`. Matching follows CSS child-combinator semantics: the
//! chain must match a contiguous parent path, and the first segment may sit at
//! any depth.

use super::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Qualifier {
    None,
    Id(String),
    Nth(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment {
    pub tag: String,
    pub qualifier: Qualifier,
}

fn parse_segment(raw: &str) -> Option<Segment> {
    let raw = raw.trim();
    if let Some((tag, id)) = raw.split_once('#') {
        if tag.is_empty() || id.is_empty() {
            return None;
        }
        return Some(Segment {
            tag: tag.to_ascii_lowercase(),
            qualifier: Qualifier::Id(id.to_string()),
        });
    }
    if let Some((tag, rest)) = raw.split_once(":nth-of-type(") {
        let nth = rest.strip_suffix(')')?.parse::<usize>().ok()?;
        if tag.is_empty() || nth == 0 {
            return None;
        }
        return Some(Segment {
            tag: tag.to_ascii_lowercase(),
            qualifier: Qualifier::Nth(nth),
        });
    }
    if raw.is_empty() || raw.contains(|c: char| c.is_whitespace()) {
        return None;
    }
    Some(Segment {
        tag: raw.to_ascii_lowercase(),
        qualifier: Qualifier::None,
    })
}

/// Parses a locator into segments; `None` when any segment is malformed.
pub(crate) fn parse_locator(locator: &str) -> Option<Vec<Segment>> {
    let segments: Option<Vec<Segment>> = locator.split(" > ").map(parse_segment).collect();
    segments.filter(|segs| !segs.is_empty())
}

fn segment_matches(doc: &Document, node: NodeId, segment: &Segment) -> bool {
    if doc.tag(node) != Some(segment.tag.as_str()) {
        return false;
    }
    match &segment.qualifier {
        Qualifier::None => true,
        Qualifier::Id(id) => doc.id(node) == Some(id.as_str()),
        Qualifier::Nth(nth) => doc.nth_of_type(node) == *nth,
    }
}

fn matches_chain(doc: &Document, node: NodeId, segments: &[Segment]) -> bool {
    let mut idx = segments.len();
    let mut cur = node;
    loop {
        idx -= 1;
        if !segment_matches(doc, cur, &segments[idx]) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match doc.parent_element(cur) {
            Some(parent) => cur = parent,
            None => return false,
        }
    }
}

/// All attached elements matching the locator, in document order.
///
/// A malformed locator selects nothing; stored rules whose structure no
/// longer exists simply stop matching, they never error.
pub fn select_all(doc: &Document, locator: &str) -> Vec<NodeId> {
    let Some(segments) = parse_locator(locator) else {
        return Vec::new();
    };
    doc.elements()
        .into_iter()
        .filter(|&node| matches_chain(doc, node, &segments))
        .collect()
}

/// First match of the locator, in document order.
pub fn select_first(doc: &Document, locator: &str) -> Option<NodeId> {
    select_all(doc, locator).into_iter().next()
}

//! Unit tests for the arena document model and locator matching.

use pagetrim::dom::loader::parse_html;
use pagetrim::dom::{query, Document};

fn fixture() -> Document {
    parse_html(
        "<html><head><title>t</title></head><body>\
         <div id=\"ad\">AD<span>inner</span></div>\
         <ul><li>one</li><li>two</li><li>three</li></ul>\
         <div class=\"content\"><p>text</p><p>more</p></div>\
         </body></html>",
    )
}

// ─── Tree structure ───

#[test]
fn test_head_and_body_lookup() {
    let doc = fixture();
    assert!(doc.head().is_some());
    assert!(doc.body().is_some());
}

#[test]
fn test_parent_and_contains() {
    let doc = fixture();
    let ad = doc.get_element_by_id("ad").unwrap();
    let body = doc.body().unwrap();
    assert_eq!(doc.parent_element(ad), Some(body));
    assert!(doc.contains(body, ad));
    assert!(doc.contains(ad, ad));
    assert!(!doc.contains(ad, body));
}

#[test]
fn test_detach_removes_subtree_from_traversal() {
    let mut doc = fixture();
    let ad = doc.get_element_by_id("ad").unwrap();
    let before = doc.elements().len();
    doc.detach(ad);
    // div#ad and its span are gone from document order.
    assert_eq!(doc.elements().len(), before - 2);
    assert_eq!(doc.get_element_by_id("ad"), None);
}

#[test]
fn test_nth_of_type_counts_same_tag_only() {
    let doc = fixture();
    let body = doc.body().unwrap();
    let children = doc.children(body);
    // body children: div#ad, ul, div.content
    assert_eq!(doc.nth_of_type(children[0]), 1); // first div
    assert_eq!(doc.nth_of_type(children[1]), 1); // only ul
    assert_eq!(doc.nth_of_type(children[2]), 2); // second div
}

#[test]
fn test_set_text_content_replaces_children() {
    let mut doc = fixture();
    let ad = doc.get_element_by_id("ad").unwrap();
    doc.set_text_content(ad, "fresh");
    assert_eq!(doc.text_content(ad), "fresh");
    assert_eq!(doc.children(ad).len(), 1);
}

#[test]
fn test_reparenting_moves_node() {
    let mut doc = Document::new();
    let body = doc.body().unwrap();
    let head = doc.head().unwrap();
    let div = doc.create_element("div");
    doc.append_child(head, div);
    doc.append_child(body, div);
    assert_eq!(doc.parent(div), Some(body));
    assert!(doc.children(head).is_empty());
}

// ─── Locator matching ───

#[test]
fn test_select_by_id_segment() {
    let doc = fixture();
    let matches = query::select_all(&doc, "div#ad");
    assert_eq!(matches, vec![doc.get_element_by_id("ad").unwrap()]);
}

#[test]
fn test_select_by_nth_of_type_chain() {
    let doc = fixture();
    let matches = query::select_all(&doc, "html > body > ul > li:nth-of-type(2)");
    assert_eq!(matches.len(), 1);
    assert_eq!(doc.text_content(matches[0]), "two");
}

#[test]
fn test_chain_head_may_sit_at_any_depth() {
    // The first segment is not anchored to the root: "ul > li" matches even
    // though ul is not the document root.
    let doc = fixture();
    assert_eq!(query::select_all(&doc, "ul > li").len(), 3);
}

#[test]
fn test_child_combinator_requires_direct_parent() {
    let doc = fixture();
    assert!(query::select_all(&doc, "body > li").is_empty());
    assert!(query::select_all(&doc, "body > span").is_empty());
}

#[test]
fn test_bare_tag_matches_every_position() {
    let doc = fixture();
    assert_eq!(query::select_all(&doc, "li").len(), 3);
    assert_eq!(query::select_all(&doc, "div").len(), 2);
}

#[test]
fn test_malformed_locator_selects_nothing() {
    let doc = fixture();
    assert!(query::select_all(&doc, "").is_empty());
    assert!(query::select_all(&doc, "div > > p").is_empty());
    assert!(query::select_all(&doc, "li:nth-of-type(zero)").is_empty());
}

#[test]
fn test_matches_are_in_document_order() {
    let doc = fixture();
    let items = query::select_all(&doc, "li");
    let texts: Vec<String> = items.iter().map(|&n| doc.text_content(n)).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

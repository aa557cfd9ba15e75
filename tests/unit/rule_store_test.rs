//! Unit tests for the per-site rule store.

use std::sync::Arc;

use rstest::rstest;

use pagetrim::services::rule_store::RuleStore;
use pagetrim::storage::MemoryStore;
use pagetrim::types::rules::normalize_scale;

fn setup() -> RuleStore {
    RuleStore::new(Arc::new(MemoryStore::new()))
}

const SITE: &str = "news.example.com";

// ─── Defaults ───

#[tokio::test]
async fn test_defaults_for_unconfigured_site() {
    let store = setup();
    assert!(store.get_active(SITE).await.unwrap());
    assert!(store.get_hidden(SITE).await.unwrap().is_empty());
    assert!(store.get_resized(SITE).await.unwrap().is_empty());
}

// ─── Active flag ───

#[tokio::test]
async fn test_active_flag_roundtrip() {
    let store = setup();
    store.set_active(SITE, false).await.unwrap();
    assert!(!store.get_active(SITE).await.unwrap());
    store.set_active(SITE, true).await.unwrap();
    assert!(store.get_active(SITE).await.unwrap());
}

// ─── Hidden list ───

#[tokio::test]
async fn test_add_hidden_appends_in_order() {
    let store = setup();
    assert!(store.add_hidden(SITE, "div#ad").await.unwrap());
    assert!(store.add_hidden(SITE, "html > body > aside").await.unwrap());
    assert_eq!(
        store.get_hidden(SITE).await.unwrap(),
        vec!["div#ad".to_string(), "html > body > aside".to_string()]
    );
}

#[tokio::test]
async fn test_add_hidden_is_idempotent() {
    let store = setup();
    assert!(store.add_hidden(SITE, "div#ad").await.unwrap());
    assert!(!store.add_hidden(SITE, "div#ad").await.unwrap());
    assert!(!store.add_hidden(SITE, "div#ad").await.unwrap());
    assert_eq!(store.get_hidden(SITE).await.unwrap(), vec!["div#ad".to_string()]);
}

#[tokio::test]
async fn test_remove_hidden_reports_presence() {
    let store = setup();
    store.add_hidden(SITE, "div#ad").await.unwrap();
    assert!(store.remove_hidden(SITE, "div#ad").await.unwrap());
    assert!(!store.remove_hidden(SITE, "div#ad").await.unwrap());
    assert!(store.get_hidden(SITE).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_hidden_lists_are_partitioned_by_site() {
    let store = setup();
    store.add_hidden("a.example", "div#ad").await.unwrap();
    assert!(store.get_hidden("b.example").await.unwrap().is_empty());
}

// ─── Resize map ───

#[tokio::test]
async fn test_set_scale_clamps_below_minimum() {
    let store = setup();
    store.set_scale(SITE, "div#ad", 0.05).await.unwrap();
    let resized = store.get_resized(SITE).await.unwrap();
    assert_eq!(resized.get("div#ad"), Some(&0.2));
}

#[tokio::test]
async fn test_set_scale_clamps_above_maximum() {
    let store = setup();
    store.set_scale(SITE, "div#ad", 9.7).await.unwrap();
    assert_eq!(store.get_resized(SITE).await.unwrap().get("div#ad"), Some(&5.0));
}

#[tokio::test]
async fn test_set_scale_rounds_to_tenths() {
    let store = setup();
    let stored = store.set_scale(SITE, "div#ad", 1.2499).await.unwrap();
    assert_eq!(stored, 1.2);
    assert_eq!(store.get_resized(SITE).await.unwrap().get("div#ad"), Some(&1.2));
}

#[tokio::test]
async fn test_default_scale_removes_the_entry() {
    let store = setup();
    store.set_scale(SITE, "div#ad", 1.5).await.unwrap();
    store.set_scale(SITE, "div#ad", 1.0).await.unwrap();
    assert!(store.get_resized(SITE).await.unwrap().is_empty());
}

/// The clamp-and-round ladder used by every scale write.
#[rstest]
#[case(0.05, 0.2)]
#[case(0.2, 0.2)]
#[case(0.25, 0.3)]
#[case(1.0, 1.0)]
#[case(1.44, 1.4)]
#[case(3.333, 3.3)]
#[case(5.0, 5.0)]
#[case(9.9, 5.0)]
fn test_scale_normalization_cases(#[case] raw: f64, #[case] expected: f64) {
    assert_eq!(normalize_scale(raw), expected);
}

#[tokio::test]
async fn test_near_default_scale_rounds_to_removal() {
    let store = setup();
    store.set_scale(SITE, "div#ad", 1.04).await.unwrap();
    assert!(store.get_resized(SITE).await.unwrap().is_empty());
}

// ─── Site lifecycle ───

#[tokio::test]
async fn test_clear_site_removes_all_three_fields() {
    let store = setup();
    store.add_hidden(SITE, "div#ad").await.unwrap();
    store.set_scale(SITE, "p", 2.0).await.unwrap();
    store.set_active(SITE, false).await.unwrap();

    store.clear_site(SITE).await.unwrap();

    assert!(store.get_hidden(SITE).await.unwrap().is_empty());
    assert!(store.get_resized(SITE).await.unwrap().is_empty());
    assert!(store.get_active(SITE).await.unwrap());
}

#[tokio::test]
async fn test_clear_all_restores_defaults_everywhere() {
    let store = setup();
    store.add_hidden("a.example", "div#ad").await.unwrap();
    store.set_scale("b.example", "p", 0.5).await.unwrap();
    store.set_active("c.example", false).await.unwrap();

    store.clear_all().await.unwrap();

    assert!(store.get_hidden("a.example").await.unwrap().is_empty());
    assert!(store.get_resized("b.example").await.unwrap().is_empty());
    assert!(store.get_active("c.example").await.unwrap());
    assert!(store.list_sites().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_sites_ignores_status_only_entries() {
    let store = setup();
    store.add_hidden("a.example", "div#ad").await.unwrap();
    store.set_scale("b.example", "p", 2.0).await.unwrap();
    store.set_active("c.example", false).await.unwrap();

    assert_eq!(
        store.list_sites().await.unwrap(),
        vec!["a.example".to_string(), "b.example".to_string()]
    );
}

#[tokio::test]
async fn test_snapshot_aggregates_all_fields() {
    let store = setup();
    store.add_hidden(SITE, "div#ad").await.unwrap();
    store.set_scale(SITE, "p", 0.5).await.unwrap();

    let rules = store.snapshot(SITE).await.unwrap();
    assert!(rules.active);
    assert_eq!(rules.hidden, vec!["div#ad".to_string()]);
    assert_eq!(rules.resized.get("p"), Some(&0.5));
}

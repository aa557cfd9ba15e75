//! Unit tests for the popup-facing command channel.

use std::sync::Arc;

use serde_json::json;

use pagetrim::command_handler::handle_action;
use pagetrim::dom::loader::parse_html;
use pagetrim::services::style_applier::STYLE_ELEMENT_ID;
use pagetrim::session::PageSession;
use pagetrim::storage::{KeyValueStore, MemoryStore};
use pagetrim::types::modes::ModeState;

const SITE: &str = "news.example.com";

async fn setup() -> (PageSession, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let doc = parse_html(
        "<html><head></head><body><div id=\"ad\">AD</div><p>text</p></body></html>",
    );
    let kv: Arc<dyn KeyValueStore> = store.clone();
    let mut session = PageSession::new(doc, SITE, kv);
    session.init().await;
    (session, store)
}

// ─── get_status ───

#[tokio::test]
async fn test_status_defaults() {
    let (mut session, _) = setup().await;
    let status = handle_action(&mut session, "get_status", &json!({})).await.unwrap();
    assert_eq!(status, json!({"active": true, "ghostViewActive": false}));
}

#[tokio::test]
async fn test_status_reflects_ghost_view() {
    let (mut session, _) = setup().await;
    handle_action(&mut session, "toggle_visibility", &json!({"state": true}))
        .await
        .unwrap();
    let status = handle_action(&mut session, "get_status", &json!({})).await.unwrap();
    assert_eq!(status, json!({"active": true, "ghostViewActive": true}));
}

// ─── toggle_site_active ───

#[tokio::test]
async fn test_deactivating_clears_rendering_and_persists() {
    let (mut session, _) = setup().await;
    session.store().add_hidden(SITE, "div#ad").await.unwrap();
    session.apply_all().await.unwrap();
    assert!(session.document().get_element_by_id(STYLE_ELEMENT_ID).is_some());

    handle_action(&mut session, "toggle_site_active", &json!({"state": false}))
        .await
        .unwrap();

    assert!(!session.is_active());
    assert!(session.document().get_element_by_id(STYLE_ELEMENT_ID).is_none());
    assert!(!session.store().get_active(SITE).await.unwrap());
}

#[tokio::test]
async fn test_reactivating_rerenders() {
    let (mut session, _) = setup().await;
    session.store().add_hidden(SITE, "div#ad").await.unwrap();
    handle_action(&mut session, "toggle_site_active", &json!({"state": false}))
        .await
        .unwrap();
    handle_action(&mut session, "toggle_site_active", &json!({"state": true}))
        .await
        .unwrap();
    assert!(session.document().get_element_by_id(STYLE_ELEMENT_ID).is_some());
}

#[tokio::test]
async fn test_toggle_requires_state_field() {
    let (mut session, _) = setup().await;
    let err = handle_action(&mut session, "toggle_site_active", &json!({})).await;
    assert!(err.is_err());
}

// ─── activate_mode ───

#[tokio::test]
async fn test_activate_mode_enters_marking() {
    let (mut session, _) = setup().await;
    let reply = handle_action(&mut session, "activate_mode", &json!({"mode": "mark"}))
        .await
        .unwrap();
    assert_eq!(reply, json!({"ok": true}));
    assert_eq!(session.mode_state(), ModeState::Marking);
}

#[tokio::test]
async fn test_activate_mode_rejected_with_notice_when_inactive() {
    let (mut session, _) = setup().await;
    handle_action(&mut session, "toggle_site_active", &json!({"state": false}))
        .await
        .unwrap();

    let reply = handle_action(&mut session, "activate_mode", &json!({"mode": "rescale"}))
        .await
        .unwrap();

    assert_eq!(reply["ok"], json!(false));
    assert!(reply["notice"].as_str().unwrap().contains("disabled"));
    assert_eq!(session.mode_state(), ModeState::Idle);
}

#[tokio::test]
async fn test_activate_mode_rejects_unknown_mode() {
    let (mut session, _) = setup().await;
    let err = handle_action(&mut session, "activate_mode", &json!({"mode": "cleaner"})).await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_activate_mode_exits_ghost_view() {
    let (mut session, _) = setup().await;
    session.store().add_hidden(SITE, "div#ad").await.unwrap();
    handle_action(&mut session, "toggle_visibility", &json!({"state": true}))
        .await
        .unwrap();

    handle_action(&mut session, "activate_mode", &json!({"mode": "mark"}))
        .await
        .unwrap();

    assert_eq!(session.mode_state(), ModeState::Marking);
    assert!(!session.is_ghost_view());
    let doc = session.document();
    let style = doc.get_element_by_id(STYLE_ELEMENT_ID).unwrap();
    assert_eq!(doc.text_content(style), "div#ad { display: none !important; }");
}

// ─── toggle_visibility ───

#[tokio::test]
async fn test_toggle_visibility_noop_while_inactive() {
    let (mut session, _) = setup().await;
    handle_action(&mut session, "toggle_site_active", &json!({"state": false}))
        .await
        .unwrap();
    handle_action(&mut session, "toggle_visibility", &json!({"state": true}))
        .await
        .unwrap();
    assert!(!session.is_ghost_view());
}

// ─── reload_rules ───

#[tokio::test]
async fn test_reload_rules_resets_active_and_requests_reload() {
    let (mut session, _) = setup().await;
    handle_action(&mut session, "toggle_site_active", &json!({"state": false}))
        .await
        .unwrap();

    let reply = handle_action(&mut session, "reload_rules", &json!({})).await.unwrap();

    assert_eq!(reply, json!({"ok": true, "reload": true}));
    assert!(session.is_active());
}

// ─── settings surface ───

#[tokio::test]
async fn test_list_sites_and_delete_site() {
    let (mut session, _) = setup().await;
    session.store().add_hidden(SITE, "div#ad").await.unwrap();
    session.store().add_hidden("other.example", "p").await.unwrap();

    let reply = handle_action(&mut session, "list_sites", &json!({})).await.unwrap();
    assert_eq!(reply, json!({"sites": ["news.example.com", "other.example"]}));

    let reply = handle_action(&mut session, "delete_site", &json!({"site": "other.example"}))
        .await
        .unwrap();
    assert_eq!(reply, json!({"ok": true, "reload": false}));

    let reply = handle_action(&mut session, "delete_site", &json!({"site": SITE}))
        .await
        .unwrap();
    assert_eq!(reply, json!({"ok": true, "reload": true}));
    assert!(session.store().list_sites().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reset_all_wipes_every_site() {
    let (mut session, store) = setup().await;
    session.store().add_hidden(SITE, "div#ad").await.unwrap();
    session.store().set_scale("other.example", "p", 2.0).await.unwrap();
    session.store().set_active("third.example", false).await.unwrap();

    let reply = handle_action(&mut session, "reset_all", &json!({})).await.unwrap();
    assert_eq!(reply, json!({"ok": true, "reload": true}));

    assert!(store.keys().await.unwrap().is_empty());
    assert!(session.store().get_active("third.example").await.unwrap());
}

// ─── protocol errors ───

#[tokio::test]
async fn test_unknown_action_is_an_error() {
    let (mut session, _) = setup().await;
    let err = handle_action(&mut session, "explode", &json!({})).await;
    assert!(err.is_err());
    assert!(err.unwrap_err().to_string().contains("explode"));
}

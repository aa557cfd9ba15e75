//! PageTrim CLI — drives the engine over newline-delimited JSON.
//!
//! Loads a page (local file or `http(s)` URL) into the document model, then
//! reads one JSON object per line from stdin:
//!
//! Command:  {"action":"activate_mode","mode":"mark"}       → {"result":{...}}
//! Event:    {"event":"click","selector":"div#ad"}          → {"result":{"consumed":true}}
//! Also:     {"event":"dump"} (serialized document), {"event":"rules"}
//!
//! Replies carrying `"reload": true` make the CLI rebuild the document from
//! the original source and re-initialize the session, standing in for a full
//! page reload.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;

use pagetrim::command_handler::handle_action;
use pagetrim::dom::loader::parse_html;
use pagetrim::dom::{query, serialize};
use pagetrim::session::PageSession;
use pagetrim::storage::{KeyValueStore, SqliteStore};
use pagetrim::types::errors::LoadError;
use pagetrim::types::events::PointerEvent;
use pagetrim::types::site::site_id;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    let Some(source) = std::env::args().nth(1) else {
        eprintln!("usage: pagetrim <file-or-url>");
        std::process::exit(2);
    };

    let (html, page_url) = match load_source(&source).await {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    let store: Arc<dyn KeyValueStore> =
        Arc::new(SqliteStore::open_default().expect("Failed to open the PageTrim rule store"));
    let site = site_id(&page_url);

    let mut session = PageSession::new(parse_html(&html), site.clone(), store.clone());
    session.init().await;

    let ready = json!({"event": "ready", "site": site, "version": env!("CARGO_PKG_VERSION")});
    println!("{}", ready);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        let request: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                println!("{}", json!({"error": format!("parse error: {}", e)}));
                continue;
            }
        };

        if let Some(event) = request.get("event").and_then(|v| v.as_str()) {
            let reply = handle_host_event(&mut session, event, &request).await;
            println!("{}", reply);
            continue;
        }

        let action = request.get("action").and_then(|v| v.as_str()).unwrap_or("");
        let reply = match handle_action(&mut session, action, &request).await {
            Ok(result) => {
                let reload = result.get("reload").and_then(|v| v.as_bool()).unwrap_or(false);
                let reply = json!({"result": result});
                if reload {
                    session = PageSession::new(parse_html(&html), site.clone(), store.clone());
                    session.init().await;
                }
                reply
            }
            Err(err) => json!({"error": err.to_string()}),
        };
        println!("{}", reply);
    }
}

/// Host-side inputs that are not part of the command protocol: synthetic
/// pointer events plus debugging dumps.
async fn handle_host_event(session: &mut PageSession, event: &str, request: &Value) -> Value {
    match event {
        "click" | "hover" | "unhover" => {
            let Some(selector) = request.get("selector").and_then(|v| v.as_str()) else {
                return json!({"error": "missing selector"});
            };
            let Some(target) = query::select_first(session.document(), selector) else {
                return json!({"error": format!("no element matches {}", selector)});
            };
            let pointer_event = match event {
                "click" => PointerEvent::Click(target),
                "hover" => PointerEvent::Over(target),
                _ => PointerEvent::Out(target),
            };
            let outcome = session.dispatch(pointer_event).await;
            json!({"result": {"consumed": outcome.is_consumed()}})
        }
        "dump" => json!({"result": {"html": serialize::to_html(session.document())}}),
        "rules" => match session.store().snapshot(session.site()).await {
            Ok(rules) => json!({"result": rules}),
            Err(err) => json!({"error": err.to_string()}),
        },
        "status" => json!({"result": {
            "mode": session.mode_state().name(),
            "active": session.is_active(),
            "site": session.site(),
        }}),
        _ => json!({"error": format!("unknown event: {}", event)}),
    }
}

/// Reads the page source and derives the URL the site identifier comes from.
async fn load_source(source: &str) -> Result<(String, String), LoadError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let response = reqwest::get(source)
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;
        let html = response
            .text()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?;
        return Ok((html, source.to_string()));
    }

    let path = PathBuf::from(source);
    let html = std::fs::read_to_string(&path).map_err(|e| LoadError::Io(e.to_string()))?;
    let absolute = path
        .canonicalize()
        .map_err(|e| LoadError::Io(e.to_string()))?;
    let page_url = Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| absolute.to_string_lossy().into_owned());
    Ok((html, page_url))
}

//! Command channel handler for the popup-facing protocol.
//!
//! Dispatches named actions against a [`PageSession`] and shapes the JSON
//! replies. Storage failures inside an action are logged and suppressed:
//! persistence is best-effort, and the collaborator never sees a storage
//! error. Failures degrade to "no visible change".

use serde_json::{json, Value};

use log::warn;

use crate::session::PageSession;
use crate::types::errors::{CommandError, EngineError};
use crate::types::modes::EditMode;

/// Dispatches one command against the session.
///
/// Returns `Ok(reply)` for protocol-level success (including rejected mode
/// entries, which reply with a notice) or `Err` for malformed requests.
/// Replies carrying `"reload": true` ask the page host to fully reload the
/// page afterwards.
pub async fn handle_action(
    session: &mut PageSession,
    action: &str,
    params: &Value,
) -> Result<Value, CommandError> {
    match action {
        // ─── Status ───
        "get_status" => Ok(json!({
            "active": session.is_active(),
            "ghostViewActive": session.is_ghost_view(),
        })),

        // ─── Site on/off ───
        "toggle_site_active" => {
            let state = require_bool(params, "state")?;
            if let Err(err) = session.set_site_active(state).await {
                warn!("toggle_site_active: {}", err);
            }
            Ok(json!({"ok": true}))
        }

        // ─── Edit modes ───
        "activate_mode" => {
            let name = require_str(params, "mode")?;
            let mode = EditMode::from_name(name)
                .ok_or_else(|| CommandError::InvalidPayload(format!("unknown mode: {}", name)))?;
            match session.activate_mode(mode).await {
                Ok(()) => Ok(json!({"ok": true})),
                Err(EngineError::SiteInactive) => Ok(json!({
                    "ok": false,
                    "notice": EngineError::SiteInactive.to_string(),
                })),
                Err(EngineError::Store(err)) => {
                    warn!("activate_mode: {}", err);
                    Ok(json!({"ok": true}))
                }
            }
        }

        // ─── Ghost view ───
        "toggle_visibility" => {
            let state = require_bool(params, "state")?;
            if let Err(err) = session.set_ghost_view(state).await {
                warn!("toggle_visibility: {}", err);
            }
            Ok(json!({"ok": true}))
        }

        // ─── Reset / reload ───
        "reload_rules" => {
            if let Err(err) = session.reload_rules().await {
                warn!("reload_rules: {}", err);
            }
            Ok(json!({"ok": true, "reload": true}))
        }

        // ─── Settings surface ───
        "list_sites" => {
            let sites = match session.store().list_sites().await {
                Ok(sites) => sites,
                Err(err) => {
                    warn!("list_sites: {}", err);
                    Vec::new()
                }
            };
            Ok(json!({"sites": sites}))
        }
        "delete_site" => {
            let site = require_str(params, "site")?.to_string();
            if let Err(err) = session.store().clear_site(&site).await {
                warn!("delete_site: {}", err);
            }
            let is_current = site == session.site();
            if is_current {
                if let Err(err) = session.reload_rules().await {
                    warn!("delete_site re-render: {}", err);
                }
            }
            Ok(json!({"ok": true, "reload": is_current}))
        }
        "reset_all" => {
            if let Err(err) = session.store().clear_all().await {
                warn!("reset_all: {}", err);
            }
            if let Err(err) = session.reload_rules().await {
                warn!("reset_all re-render: {}", err);
            }
            Ok(json!({"ok": true, "reload": true}))
        }

        _ => Err(CommandError::UnknownAction(action.to_string())),
    }
}

fn require_bool(params: &Value, field: &str) -> Result<bool, CommandError> {
    params
        .get(field)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| CommandError::InvalidPayload(format!("missing {}", field)))
}

fn require_str<'a>(params: &'a Value, field: &str) -> Result<&'a str, CommandError> {
    params
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| CommandError::InvalidPayload(format!("missing {}", field)))
}

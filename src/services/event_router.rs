//! Routing of pointer events to the active mode's handler.
//!
//! Clicks are treated as capture-phase, highest priority: whenever a branch
//! acts (or an edit mode owns the click), the outcome is `Consumed` and the
//! page's own default action must be suppressed. Events targeting the
//! engine's own transient UI never reach the mode branches; the UI's controls
//! (badge Finish, adjustment +/−/dismiss) are routed to their actions
//! instead.

use log::debug;

use super::locator_builder;
use super::mode_controller::{
    ModeController, FINISH_BUTTON_ID, TOOLBAR_CLOSE_ID, ZOOM_IN_ID, ZOOM_OUT_ID,
};
use super::rule_store::RuleStore;
use super::style_applier;
use crate::dom::{Document, NodeId};
use crate::types::errors::StoreError;
use crate::types::events::{DispatchOutcome, PointerEvent};
use crate::types::modes::EditMode;
use crate::types::rules::DEFAULT_SCALE;

/// Dispatches one pointer event against the session's state.
pub async fn handle(
    controller: &mut ModeController,
    doc: &mut Document,
    store: &RuleStore,
    site: &str,
    event: PointerEvent,
) -> Result<DispatchOutcome, StoreError> {
    match event {
        PointerEvent::Over(target) => Ok(handle_over(controller, doc, target)),
        PointerEvent::Out(target) => Ok(handle_out(controller, doc, target)),
        PointerEvent::Click(target) => handle_click(controller, doc, store, site, target).await,
    }
}

/// Hover decoration: outline and cursor in the active mode's color.
///
/// Suppressed while Restoring, where the ghost stylesheet provides the cursor
/// affordance, and for targets inside the engine's own UI.
fn handle_over(controller: &ModeController, doc: &mut Document, target: NodeId) -> DispatchOutcome {
    if controller.is_restoring() || !controller.hover_listener_attached() {
        return DispatchOutcome::Ignored;
    }
    let Some(mode) = controller.mode() else {
        return DispatchOutcome::Ignored;
    };
    if in_own_ui(controller, doc, target) || !doc.is_element(target) {
        return DispatchOutcome::Ignored;
    }
    doc.set_style_property(target, "outline", &format!("3px solid {}", mode.accent_color()));
    doc.set_style_property(target, "cursor", mode.cursor());
    DispatchOutcome::Consumed
}

fn handle_out(controller: &ModeController, doc: &mut Document, target: NodeId) -> DispatchOutcome {
    if controller.is_restoring() || !controller.hover_listener_attached() {
        return DispatchOutcome::Ignored;
    }
    if controller.mode().is_none() {
        return DispatchOutcome::Ignored;
    }
    doc.remove_style_property(target, "outline");
    doc.remove_style_property(target, "cursor");
    DispatchOutcome::Consumed
}

async fn handle_click(
    controller: &mut ModeController,
    doc: &mut Document,
    store: &RuleStore,
    site: &str,
    target: NodeId,
) -> Result<DispatchOutcome, StoreError> {
    if !controller.click_listener_attached() {
        return Ok(DispatchOutcome::Ignored);
    }

    // The engine's own UI: route control clicks, swallow the rest.
    if let Some(badge) = controller.badge_node() {
        if doc.contains(badge, target) {
            if hits_control(doc, badge, target, FINISH_BUTTON_ID) {
                controller.exit_edit_mode(doc);
                return Ok(DispatchOutcome::Consumed);
            }
            return Ok(DispatchOutcome::Ignored);
        }
    }
    if let Some(toolbar) = controller.control().map(|c| c.node) {
        if doc.contains(toolbar, target) {
            if hits_control(doc, toolbar, target, ZOOM_OUT_ID) {
                controller.step_scale(doc, store, site, -1.0).await?;
                return Ok(DispatchOutcome::Consumed);
            }
            if hits_control(doc, toolbar, target, ZOOM_IN_ID) {
                controller.step_scale(doc, store, site, 1.0).await?;
                return Ok(DispatchOutcome::Consumed);
            }
            if hits_control(doc, toolbar, target, TOOLBAR_CLOSE_ID) {
                controller.close_adjust_control(doc);
                return Ok(DispatchOutcome::Consumed);
            }
            return Ok(DispatchOutcome::Ignored);
        }
    }

    if controller.is_restoring() {
        restore_click(doc, store, site, target).await?;
        return Ok(DispatchOutcome::Consumed);
    }

    let Some(mode) = controller.mode() else {
        return Ok(DispatchOutcome::Ignored);
    };
    let Some(locator) = locator_builder::build(doc, target) else {
        return Ok(DispatchOutcome::Consumed);
    };

    match mode {
        EditMode::Mark => {
            if store.add_hidden(site, &locator).await? {
                debug!("hid {}", locator);
                style_applier::render_hidden(doc, store, site, false).await?;
            }
        }
        EditMode::Rescale => {
            let resized = store.get_resized(site).await?;
            let scale = resized.get(&locator).copied().unwrap_or(DEFAULT_SCALE);
            controller.open_adjust_control(doc, target, locator, scale);
        }
    }
    Ok(DispatchOutcome::Consumed)
}

/// Restore click: un-hide the clicked element, or the nearest hidden
/// ancestor when the click landed inside a ghosted block. No match means no
/// mutation.
async fn restore_click(
    doc: &mut Document,
    store: &RuleStore,
    site: &str,
    target: NodeId,
) -> Result<(), StoreError> {
    let Some(locator) = locator_builder::build(doc, target) else {
        return Ok(());
    };
    let hidden = store.get_hidden(site).await?;

    let mut found = hidden.iter().find(|l| **l == locator).cloned();
    if found.is_none() {
        let mut cur = doc.parent_element(target);
        while let Some(ancestor) = cur {
            if doc.tag(ancestor) == Some("body") {
                break;
            }
            if let Some(ancestor_locator) = locator_builder::build(doc, ancestor) {
                if hidden.iter().any(|l| *l == ancestor_locator) {
                    found = Some(ancestor_locator);
                    break;
                }
            }
            cur = doc.parent_element(ancestor);
        }
    }

    if let Some(selector) = found {
        store.remove_hidden(site, &selector).await?;
        debug!("restored {}", selector);
        style_applier::render_hidden(doc, store, site, true).await?;
    }
    Ok(())
}

/// Whether the click target is the given control or sits inside it.
fn hits_control(doc: &Document, ui_root: NodeId, target: NodeId, control_id: &str) -> bool {
    let mut cur = Some(target);
    while let Some(node) = cur {
        if doc.id(node) == Some(control_id) {
            return true;
        }
        if node == ui_root {
            return false;
        }
        cur = doc.parent(node);
    }
    false
}

/// Whether the node lies inside the badge or the adjustment control.
fn in_own_ui(controller: &ModeController, doc: &Document, node: NodeId) -> bool {
    if let Some(badge) = controller.badge_node() {
        if doc.contains(badge, node) {
            return true;
        }
    }
    if let Some(control) = controller.control() {
        if doc.contains(control.node, node) {
            return true;
        }
    }
    false
}

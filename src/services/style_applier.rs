//! Rendering of the persisted rule set onto the live document.
//!
//! Hiding is rendered as one injected `<style>` element whose single rule
//! lists every hidden locator; rescaling is rendered as an inline `zoom`
//! property plus a marker attribute on each matched element. Rendering is
//! always a full rebuild: the old stylesheet is removed and recreated, never
//! edited in place, so repeated renders cannot accumulate duplicates.

use log::debug;

use super::mode_controller::ModeController;
use super::rule_store::RuleStore;
use crate::dom::{query, Document};
use crate::types::errors::StoreError;
use crate::types::rules::format_scale;

/// id of the injected hiding stylesheet.
pub const STYLE_ELEMENT_ID: &str = "pagetrim-hidden-style";
/// Attribute tagging rescaled elements with their current scale.
pub const SCALE_ATTR: &str = "data-pagetrim-scale";

/// Rule body hiding elements outright.
const HIDDEN_RULE_BODY: &str = "display: none !important;";

/// Rule body for the ghost view: hidden elements are shown translucently and
/// stay clickable so a restore click can reach them.
const GHOST_RULE_BODY: &str = "display: block !important; opacity: 0.6 !important; \
     outline: 2px dashed #27ae60 !important; \
     background-color: rgba(39, 174, 96, 0.1) !important; \
     pointer-events: auto !important; cursor: alias !important; \
     transition: all 0.3s;";

/// Removes the injected hiding stylesheet, if present.
pub fn remove_hidden_style(doc: &mut Document) {
    if let Some(style) = doc.get_element_by_id(STYLE_ELEMENT_ID) {
        doc.detach(style);
    }
}

/// Renders the hidden-locator list as an injected stylesheet.
///
/// With `show_ghost` false the rule hides matches outright; with it true the
/// ghost rule keeps them visible and clickable for un-hiding. An empty list
/// renders no stylesheet at all.
pub async fn render_hidden(
    doc: &mut Document,
    store: &RuleStore,
    site: &str,
    show_ghost: bool,
) -> Result<(), StoreError> {
    let selectors = store.get_hidden(site).await?;
    remove_hidden_style(doc);
    if selectors.is_empty() {
        return Ok(());
    }

    let body = if show_ghost {
        GHOST_RULE_BODY
    } else {
        HIDDEN_RULE_BODY
    };
    let css = format!("{} {{ {} }}", selectors.join(", "), body);

    let style = doc.create_element("style");
    doc.set_attribute(style, "id", STYLE_ELEMENT_ID);
    doc.set_text_content(style, &css);
    let parent = doc.head().unwrap_or_else(|| doc.root());
    doc.append_child(parent, style);

    debug!(
        "rendered {} hidden rule(s) for {} (ghost: {})",
        selectors.len(),
        site,
        show_ghost
    );
    Ok(())
}

/// Clears the inline scale override on every element carrying the marker
/// attribute.
pub fn reset_zoom(doc: &mut Document) {
    for node in doc.elements() {
        if doc.has_attribute(node, SCALE_ATTR) {
            doc.remove_style_property(node, "zoom");
        }
    }
}

/// Applies the resize map: every element matching a stored locator gets the
/// scale as an inline zoom plus the marker attribute recording it.
pub async fn render_resized(
    doc: &mut Document,
    store: &RuleStore,
    site: &str,
) -> Result<(), StoreError> {
    let resized = store.get_resized(site).await?;
    for (locator, scale) in &resized {
        let formatted = format_scale(*scale);
        for node in query::select_all(doc, locator) {
            doc.set_style_property(node, "zoom", &formatted);
            doc.set_attribute(node, SCALE_ATTR, &formatted);
        }
    }
    if !resized.is_empty() {
        debug!("rendered {} resize rule(s) for {}", resized.len(), site);
    }
    Ok(())
}

/// Single orchestration entry point: makes the document reflect the site's
/// rule set. An inactive site clears all styling and forces the controller to
/// Idle instead.
pub async fn apply_all(
    doc: &mut Document,
    store: &RuleStore,
    controller: &mut ModeController,
    site: &str,
    active: bool,
) -> Result<(), StoreError> {
    if !active {
        remove_hidden_style(doc);
        reset_zoom(doc);
        controller.force_idle(doc);
        return Ok(());
    }
    render_hidden(doc, store, site, controller.is_restoring()).await?;
    render_resized(doc, store, site).await
}

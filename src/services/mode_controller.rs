//! Interaction state machine over Idle, Marking, Rescaling, and Restoring.
//!
//! The controller owns the transient in-page UI (status badge, floating
//! adjustment control) and the listener registrations that belong to each
//! state. All transitions are driven by external commands or by clicks on the
//! controller's own UI controls, never by timers.
//!
//! Internally the state is `mode: Option<EditMode>` plus `restoring: bool`;
//! the pair is kept mutually exclusive by policy: entering an edit mode
//! force-exits Restoring, and entering Restoring force-exits any edit mode.

use log::debug;

use super::rule_store::RuleStore;
use super::style_applier::{self, SCALE_ATTR};
use crate::dom::{Document, NodeId};
use crate::types::errors::{EngineError, StoreError};
use crate::types::modes::{EditMode, ModeState};
use crate::types::rules::{format_scale, SCALE_STEP};

/// id of the status badge shown while an edit mode is active.
pub const BADGE_ID: &str = "pagetrim-badge";
/// id of the badge's "Finish" control.
pub const FINISH_BUTTON_ID: &str = "pagetrim-finish";
/// id of the floating adjustment control.
pub const TOOLBAR_ID: &str = "pagetrim-toolbar";
/// ids of the adjustment control's buttons and value readout.
pub const ZOOM_OUT_ID: &str = "pagetrim-zoom-out";
pub const ZOOM_IN_ID: &str = "pagetrim-zoom-in";
pub const ZOOM_VALUE_ID: &str = "pagetrim-zoom-value";
pub const TOOLBAR_CLOSE_ID: &str = "pagetrim-toolbar-close";

/// The open adjustment control: its DOM node plus the element it adjusts.
pub(crate) struct AdjustControl {
    pub node: NodeId,
    pub target: NodeId,
    pub locator: String,
    pub scale: f64,
}

/// State machine and transient-UI owner for one page session.
#[derive(Default)]
pub struct ModeController {
    mode: Option<EditMode>,
    restoring: bool,
    hover_listener: bool,
    click_listener: bool,
    badge: Option<NodeId>,
    control: Option<AdjustControl>,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<EditMode> {
        self.mode
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn hover_listener_attached(&self) -> bool {
        self.hover_listener
    }

    pub fn click_listener_attached(&self) -> bool {
        self.click_listener
    }

    /// The collapsed, externally visible state.
    pub fn state(&self) -> ModeState {
        if self.restoring {
            return ModeState::Restoring;
        }
        match self.mode {
            Some(EditMode::Mark) => ModeState::Marking,
            Some(EditMode::Rescale) => ModeState::Rescaling,
            None => ModeState::Idle,
        }
    }

    pub(crate) fn badge_node(&self) -> Option<NodeId> {
        self.badge
    }

    pub(crate) fn control(&self) -> Option<&AdjustControl> {
        self.control.as_ref()
    }

    /// Enters Marking or Rescaling.
    ///
    /// Rejected with [`EngineError::SiteInactive`] when rules are disabled on
    /// the site. An active Restoring state is exited first and the hiding
    /// rules re-rendered in their normal (non-ghost) form.
    pub async fn enter_edit_mode(
        &mut self,
        doc: &mut Document,
        store: &RuleStore,
        site: &str,
        mode: EditMode,
        site_active: bool,
    ) -> Result<(), EngineError> {
        if !site_active {
            return Err(EngineError::SiteInactive);
        }
        if self.restoring {
            self.restoring = false;
            self.click_listener = false;
            style_applier::render_hidden(doc, store, site, false).await?;
        }
        self.apply_mode(doc, Some(mode));
        debug!("entered {} mode", mode.name());
        Ok(())
    }

    /// Returns to Idle from any edit mode. Restoring, if separately active,
    /// keeps its click listener.
    pub fn exit_edit_mode(&mut self, doc: &mut Document) {
        self.apply_mode(doc, None);
        debug!("exited edit mode");
    }

    /// Enters or leaves Restoring (the ghost view).
    ///
    /// Entering exits any edit mode and attaches the click listener so ghost
    /// elements can be clicked to un-hide; leaving detaches it unless an edit
    /// mode is active. Hiding rules are re-rendered in the matching form.
    pub async fn set_restoring(
        &mut self,
        doc: &mut Document,
        store: &RuleStore,
        site: &str,
        restoring: bool,
    ) -> Result<(), StoreError> {
        if restoring {
            self.restoring = true;
            self.apply_mode(doc, None);
            self.click_listener = true;
        } else {
            self.restoring = false;
            if self.mode.is_none() {
                self.click_listener = false;
            }
        }
        style_applier::render_hidden(doc, store, site, self.restoring).await
    }

    /// Drops straight to Idle: no mode, no Restoring, no listeners, no UI.
    /// Used when the site is deactivated.
    pub fn force_idle(&mut self, doc: &mut Document) {
        self.restoring = false;
        self.apply_mode(doc, None);
    }

    /// Core transition: tear down the previous mode's UI and decorations,
    /// then set up the new one.
    fn apply_mode(&mut self, doc: &mut Document, mode: Option<EditMode>) {
        self.mode = mode;

        self.remove_badge(doc);
        self.close_adjust_control(doc);

        // Stale hover decorations are swept document-wide, but not while the
        // ghost view owns the outlines.
        if !self.restoring {
            clear_hover_decorations(doc);
        }

        match self.mode {
            Some(mode) => {
                self.hover_listener = true;
                self.click_listener = true;
                self.show_badge(doc, mode);
            }
            None => {
                self.hover_listener = false;
                if !self.restoring {
                    self.click_listener = false;
                }
            }
        }
    }

    fn show_badge(&mut self, doc: &mut Document, mode: EditMode) {
        let badge = doc.create_element("div");
        doc.set_attribute(badge, "id", BADGE_ID);
        doc.set_style_property(badge, "position", "fixed");
        doc.set_style_property(badge, "bottom", "20px");
        doc.set_style_property(badge, "right", "20px");
        doc.set_style_property(badge, "background", mode.accent_color());
        doc.set_style_property(badge, "color", "white");
        doc.set_style_property(badge, "z-index", "2147483647");

        let label = doc.create_element("span");
        doc.set_text_content(label, mode.badge_label());
        doc.append_child(badge, label);

        let finish = doc.create_element("button");
        doc.set_attribute(finish, "id", FINISH_BUTTON_ID);
        doc.set_text_content(finish, "Finish");
        doc.append_child(badge, finish);

        let parent = doc.body().unwrap_or_else(|| doc.root());
        doc.append_child(parent, badge);
        self.badge = Some(badge);
    }

    fn remove_badge(&mut self, doc: &mut Document) {
        if let Some(badge) = self.badge.take() {
            doc.detach(badge);
        }
    }

    /// Opens (or replaces) the adjustment control for `target`, showing the
    /// given starting scale.
    pub(crate) fn open_adjust_control(
        &mut self,
        doc: &mut Document,
        target: NodeId,
        locator: String,
        scale: f64,
    ) {
        self.close_adjust_control(doc);

        let toolbar = doc.create_element("div");
        doc.set_attribute(toolbar, "id", TOOLBAR_ID);
        doc.set_attribute(toolbar, "data-anchor", &locator);
        doc.set_style_property(toolbar, "position", "absolute");
        doc.set_style_property(toolbar, "z-index", "2147483647");
        doc.set_style_property(toolbar, "background", "#34495e");

        let zoom_out = doc.create_element("button");
        doc.set_attribute(zoom_out, "id", ZOOM_OUT_ID);
        doc.set_text_content(zoom_out, "-");
        doc.append_child(toolbar, zoom_out);

        let value = doc.create_element("span");
        doc.set_attribute(value, "id", ZOOM_VALUE_ID);
        doc.set_text_content(value, &percent_label(scale));
        doc.append_child(toolbar, value);

        let zoom_in = doc.create_element("button");
        doc.set_attribute(zoom_in, "id", ZOOM_IN_ID);
        doc.set_text_content(zoom_in, "+");
        doc.append_child(toolbar, zoom_in);

        let close = doc.create_element("span");
        doc.set_attribute(close, "id", TOOLBAR_CLOSE_ID);
        doc.set_text_content(close, "\u{2715}");
        doc.append_child(toolbar, close);

        let parent = doc.body().unwrap_or_else(|| doc.root());
        doc.append_child(parent, toolbar);
        self.control = Some(AdjustControl {
            node: toolbar,
            target,
            locator,
            scale,
        });
    }

    pub(crate) fn close_adjust_control(&mut self, doc: &mut Document) {
        if let Some(control) = self.control.take() {
            doc.detach(control.node);
        }
    }

    /// Steps the open control's scale by one increment, persisting and
    /// applying the result immediately. A no-op when no control is open.
    pub(crate) async fn step_scale(
        &mut self,
        doc: &mut Document,
        store: &RuleStore,
        site: &str,
        direction: f64,
    ) -> Result<(), StoreError> {
        let Some(control) = self.control.as_mut() else {
            return Ok(());
        };
        let stored = store
            .set_scale(site, &control.locator, control.scale + direction * SCALE_STEP)
            .await?;
        control.scale = stored;

        let formatted = format_scale(stored);
        doc.set_style_property(control.target, "zoom", &formatted);
        doc.set_attribute(control.target, SCALE_ATTR, &formatted);
        if let Some(value) = doc.get_element_by_id(ZOOM_VALUE_ID) {
            doc.set_text_content(value, &percent_label(stored));
        }
        Ok(())
    }
}

/// Removes hover outline/cursor decoration from every element.
///
/// A bounded, infrequent full-document sweep on mode transitions; callers
/// skip it while Restoring, where the ghost stylesheet owns the outlines.
fn clear_hover_decorations(doc: &mut Document) {
    for node in doc.elements() {
        doc.remove_style_property(node, "outline");
        doc.remove_style_property(node, "cursor");
    }
}

fn percent_label(scale: f64) -> String {
    format!("{}%", (scale * 100.0).round() as i64)
}

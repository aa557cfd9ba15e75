//! Page session: the explicit context object for one page injection.
//!
//! Owns the document, the rule store handle, the mode controller, the site
//! identifier, and the cached active flag. All engine state lives here, one
//! instance per page; nothing is module-level.

use std::sync::Arc;

use log::warn;

use crate::dom::Document;
use crate::services::event_router;
use crate::services::mode_controller::ModeController;
use crate::services::rule_store::RuleStore;
use crate::services::style_applier;
use crate::storage::KeyValueStore;
use crate::types::errors::{EngineError, StoreError};
use crate::types::events::{DispatchOutcome, PointerEvent};
use crate::types::modes::{EditMode, ModeState};

/// One page's engine instance.
pub struct PageSession {
    document: Document,
    store: RuleStore,
    controller: ModeController,
    site: String,
    active: bool,
}

impl PageSession {
    /// Creates a session for a loaded document. Call [`init`](Self::init)
    /// before dispatching anything.
    pub fn new(document: Document, site: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            document,
            store: RuleStore::new(store),
            controller: ModeController::new(),
            site: site.into(),
            active: true,
        }
    }

    /// Page-load initialization: reads the active flag from storage, then
    /// renders the stored rules. Storage failures degrade to defaults.
    pub async fn init(&mut self) {
        match self.store.get_active(&self.site).await {
            Ok(active) => self.active = active,
            Err(err) => {
                warn!("failed to read active flag for {}: {}", self.site, err);
                self.active = true;
            }
        }
        if let Err(err) = self.apply_all().await {
            warn!("initial render for {} failed: {}", self.site, err);
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_ghost_view(&self) -> bool {
        self.controller.is_restoring()
    }

    pub fn mode_state(&self) -> ModeState {
        self.controller.state()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Re-renders the full rule set onto the document.
    pub async fn apply_all(&mut self) -> Result<(), StoreError> {
        style_applier::apply_all(
            &mut self.document,
            &self.store,
            &mut self.controller,
            &self.site,
            self.active,
        )
        .await
    }

    /// Enables or disables all rules on this site, persisting the flag and
    /// re-rendering. Disabling forces the controller to Idle.
    pub async fn set_site_active(&mut self, active: bool) -> Result<(), StoreError> {
        self.active = active;
        self.store.set_active(&self.site, active).await?;
        self.apply_all().await
    }

    /// Enters Marking or Rescaling; rejected while the site is inactive.
    pub async fn activate_mode(&mut self, mode: EditMode) -> Result<(), EngineError> {
        self.controller
            .enter_edit_mode(&mut self.document, &self.store, &self.site, mode, self.active)
            .await
    }

    /// Enters or leaves the ghost view. A no-op while the site is inactive.
    pub async fn set_ghost_view(&mut self, on: bool) -> Result<(), StoreError> {
        if !self.active {
            return Ok(());
        }
        self.controller
            .set_restoring(&mut self.document, &self.store, &self.site, on)
            .await
    }

    /// Resets the in-memory active flag to true and re-renders. The page host
    /// is expected to follow up with a full page reload.
    pub async fn reload_rules(&mut self) -> Result<(), StoreError> {
        self.active = true;
        self.apply_all().await
    }

    /// Routes one pointer event. Storage failures are suppressed here; a
    /// lost mutation degrades to "no visible change", never an error surface.
    pub async fn dispatch(&mut self, event: PointerEvent) -> DispatchOutcome {
        let result = event_router::handle(
            &mut self.controller,
            &mut self.document,
            &self.store,
            &self.site,
            event,
        )
        .await;
        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!("event dispatch failed: {}", err);
                DispatchOutcome::Ignored
            }
        }
    }
}

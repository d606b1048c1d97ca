//! Pending-config store: the draft, its baseline and the staged save flow.
//!
//! The store never talks to the network.  Its save operations return a
//! [`SaveDecision`] and the caller (the config session) turns a
//! [`SaveDecision::Send`] into a persist command.  This keeps every state
//! transition testable without a runtime.
//!
//! ```text
//!            handle_save()
//!   Idle ───────────────────────┬──▶ NoChanges           (stay Idle)
//!                               ├──▶ EnvWarning(paths) ──confirm──▶ Saving
//!                               │                       ──dismiss──▶ Idle
//!                               └──▶ Saving ──succeeded/failed──▶ Idle
//! ```

use serde_json::Value;

use super::{ConfigDocument, EnvOverrides};
use crate::api::ConfigEnvelope;

// ---------------------------------------------------------------------------
// SaveStage / SaveDecision
// ---------------------------------------------------------------------------

/// Where the store is in the save flow.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SaveStage {
    #[default]
    Idle,
    /// Waiting for the user to confirm saving over env-managed paths.
    EnvWarning(Vec<String>),
    /// Persist request in flight.
    Saving,
}

/// Outcome of a save request against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveDecision {
    /// Draft equals baseline; nothing to send.
    NoChanges,
    /// Changed paths include env-managed ones; confirmation required.
    NeedsEnvConfirmation(Vec<String>),
    /// Send this document to the backend.
    Send(ConfigDocument),
    /// A save is already in flight or awaiting confirmation.
    Busy,
}

// ---------------------------------------------------------------------------
// PendingConfigStore
// ---------------------------------------------------------------------------

/// Owns the draft configuration and the snapshot it is diffed against.
#[derive(Debug, Clone, Default)]
pub struct PendingConfigStore {
    baseline: ConfigDocument,
    draft: ConfigDocument,
    env: EnvOverrides,
    stage: SaveStage,
    /// Payload of the save in flight; only these leaves become baseline.
    in_flight: Option<ConfigDocument>,
    loaded: bool,
}

impl PendingConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace baseline, draft and env snapshot with a fresh fetch.
    /// Unsaved edits are dropped.
    pub fn load(&mut self, envelope: ConfigEnvelope) {
        log::info!(
            "configuration loaded ({} env overrides)",
            envelope.env_overrides.len()
        );
        self.baseline = envelope.config;
        self.draft = self.baseline.clone();
        self.env = EnvOverrides::new(envelope.env_overrides);
        self.stage = SaveStage::Idle;
        self.in_flight = None;
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn draft(&self) -> &ConfigDocument {
        &self.draft
    }

    pub fn baseline(&self) -> &ConfigDocument {
        &self.baseline
    }

    pub fn env(&self) -> &EnvOverrides {
        &self.env
    }

    pub fn stage(&self) -> &SaveStage {
        &self.stage
    }

    pub fn is_saving(&self) -> bool {
        self.stage == SaveStage::Saving
    }

    /// Paths waiting for env-warning confirmation, if any.
    pub fn env_warning_paths(&self) -> Option<&[String]> {
        match &self.stage {
            SaveStage::EnvWarning(paths) => Some(paths),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Field access
    // -----------------------------------------------------------------------

    /// Write `value` into the draft at `path`.  No validation happens here.
    pub fn set_field(&mut self, path: &[&str], value: Value) {
        self.draft.set(path, value);
    }

    pub fn get_field(&self, path: &[&str]) -> Option<&Value> {
        self.draft.get(path)
    }

    /// Dotted paths that differ between draft and baseline.
    pub fn changed_paths(&self) -> Vec<String> {
        self.draft.changed_paths(&self.baseline)
    }

    pub fn has_changes(&self) -> bool {
        !self.changed_paths().is_empty()
    }

    /// Throw away every unsaved edit.
    pub fn discard_changes(&mut self) {
        self.draft = self.baseline.clone();
        if matches!(self.stage, SaveStage::EnvWarning(_)) {
            self.stage = SaveStage::Idle;
        }
    }

    // -----------------------------------------------------------------------
    // Save flow
    // -----------------------------------------------------------------------

    /// Decide what a click on *Save* does.
    pub fn handle_save(&mut self) -> SaveDecision {
        if self.stage != SaveStage::Idle {
            return SaveDecision::Busy;
        }
        let changed = self.changed_paths();
        if changed.is_empty() {
            return SaveDecision::NoChanges;
        }
        let managed = self.env.overridden_among(&changed);
        if !managed.is_empty() {
            log::info!("save touches env-managed paths: {}", managed.join(", "));
            self.stage = SaveStage::EnvWarning(managed.clone());
            return SaveDecision::NeedsEnvConfirmation(managed);
        }
        SaveDecision::Send(self.begin_persist(&changed))
    }

    /// The user accepted saving over env-managed paths.
    ///
    /// Returns `None` when no warning was pending.
    pub fn handle_confirm_env_warning(&mut self) -> Option<ConfigDocument> {
        if !matches!(self.stage, SaveStage::EnvWarning(_)) {
            return None;
        }
        let changed = self.changed_paths();
        if changed.is_empty() {
            self.stage = SaveStage::Idle;
            return None;
        }
        Some(self.begin_persist(&changed))
    }

    /// The user backed out of the env warning.  The draft is kept.
    pub fn handle_dismiss_env_warning(&mut self) {
        if matches!(self.stage, SaveStage::EnvWarning(_)) {
            self.stage = SaveStage::Idle;
        }
    }

    fn begin_persist(&mut self, changed: &[String]) -> ConfigDocument {
        let mut payload = self.draft.subset(changed);
        payload.strip_previews();
        self.stage = SaveStage::Saving;
        self.in_flight = Some(payload.clone());
        payload
    }

    /// The backend accepted the save.  `server` is the sanitized document it
    /// returned, used to refresh the `*_preview` keys.
    ///
    /// Only the leaves that were sent move into the baseline; edits made
    /// while the request was out stay pending.  Ignored when no save is in
    /// flight.
    pub fn save_succeeded(&mut self, server: Option<&ConfigDocument>) {
        if !self.is_saving() {
            log::debug!("save result without a save in flight; ignored");
            return;
        }
        if let Some(sent) = self.in_flight.take() {
            self.baseline.overlay(&sent);
        }
        if let Some(server) = server {
            self.baseline.merge_previews_from(server);
            self.draft.merge_previews_from(server);
        }
        self.stage = SaveStage::Idle;
    }

    /// The backend rejected the save or could not be reached.  The draft is
    /// left as it was so the user can retry.
    pub fn save_failed(&mut self) {
        if self.is_saving() {
            self.in_flight = None;
            self.stage = SaveStage::Idle;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Editor state for the LLM prompt pair.
//!
//! Prompts are stored apart from the config document and saved on their own
//! endpoint, so they keep their own original/edited copies.

use crate::api::{ApiError, Prompts};

#[derive(Debug, Clone, Default)]
pub struct PromptEditor {
    original: Prompts,
    pub edited: Prompts,
    loading: bool,
    saving: bool,
    loaded: bool,
}

impl PromptEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Mark a fetch in flight.
    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    /// Apply a fetch result.  Returns the toast text on failure.
    pub fn loaded(&mut self, result: Result<Prompts, ApiError>) -> Option<String> {
        self.loading = false;
        match result {
            Ok(prompts) => {
                self.original = prompts.clone();
                self.edited = prompts;
                self.loaded = true;
                None
            }
            Err(e) => Some(e.user_message("Failed to load prompts")),
        }
    }

    pub fn has_changes(&self) -> bool {
        self.edited != self.original
    }

    /// Snapshot to send, or `None` when there is nothing to save.
    pub fn begin_save(&mut self) -> Option<Prompts> {
        if self.saving || !self.has_changes() {
            return None;
        }
        self.saving = true;
        Some(self.edited.clone())
    }

    /// Apply a save result.  On success the saved pair becomes the new
    /// original; edits made while saving stay as changes.
    pub fn saved(&mut self, result: Result<Prompts, ApiError>) -> Result<&'static str, String> {
        self.saving = false;
        match result {
            Ok(prompts) => {
                self.original = prompts;
                Ok("Prompts saved successfully")
            }
            Err(e) => Err(e.user_message("Failed to save prompts")),
        }
    }

    pub fn reset(&mut self) {
        self.edited = self.original.clone();
    }
}

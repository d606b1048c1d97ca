//! Environment-override lookup.
//!
//! The backend reports, next to the configuration document, which dotted
//! config paths are currently supplied by environment variables.  Those
//! values win over whatever is saved, so editing them in the console only
//! lasts until the environment changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EnvOverrideEntry
// ---------------------------------------------------------------------------

/// One overridden path as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvOverrideEntry {
    /// Name of the variable supplying the value (e.g. `LLM_API_KEY`).
    #[serde(default)]
    pub env_var: String,
    /// Plain value, sent for non-secret overrides.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    /// Masked value (`sk-a...wxyz`), sent for secrets.
    #[serde(default)]
    pub value_preview: Option<String>,
    #[serde(default)]
    pub is_secret: bool,
}

impl EnvOverrideEntry {
    /// What to show next to the field: the preview when there is one,
    /// otherwise the plain value.
    pub fn display_value(&self) -> Option<String> {
        if let Some(preview) = self.value_preview.as_deref().filter(|p| !p.is_empty()) {
            return Some(preview.to_string());
        }
        match &self.value {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) if s.is_empty() => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// EnvOverrides
// ---------------------------------------------------------------------------

/// Snapshot of all env overrides, keyed by dotted path.
///
/// Replaced wholesale on each configuration load; there is no partial
/// invalidation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    entries: BTreeMap<String, EnvOverrideEntry>,
}

impl EnvOverrides {
    pub fn new(entries: BTreeMap<String, EnvOverrideEntry>) -> Self {
        Self { entries }
    }

    /// The override for `path`, if the environment supplies it.
    pub fn get_env_hint(&self, path: &str) -> Option<&EnvOverrideEntry> {
        self.entries.get(path)
    }

    pub fn is_overridden(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// The subset of `paths` that is environment-managed, order preserved.
    pub fn overridden_among(&self, paths: &[String]) -> Vec<String> {
        paths
            .iter()
            .filter(|p| self.is_overridden(p))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Request / response shapes of the backend REST API.
//!
//! Field names follow the backend's JSON exactly.  Everything the console
//! only displays is `#[serde(default)]` so a backend that omits a counter does
//! not break the whole page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::{ConfigDocument, EnvOverrideEntry};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// `GET /api/config` body: the document plus the env-override snapshot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigEnvelope {
    pub config: ConfigDocument,
    #[serde(default)]
    pub env_overrides: BTreeMap<String, EnvOverrideEntry>,
}

/// `POST /api/config/test-llm` and `/test-whisper` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProbeResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One entry of `GET /api/config/copilot-models`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CopilotModel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cost_multiplier: Option<f64>,
}

impl CopilotModel {
    /// Label for the model list; falls back to the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// A zero cost multiplier marks a model included with the subscription.
    pub fn is_premium(&self) -> bool {
        self.cost_multiplier == Some(0.0)
    }

    /// `"1x"`, `"0.33x"`, or an em-dash when unknown.
    pub fn cost_label(&self) -> String {
        match self.cost_multiplier {
            Some(m) => format!("{m}x"),
            None => "—".to_string(),
        }
    }
}

/// `GET /api/config/copilot-models` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopilotModelsResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub models: Vec<CopilotModel>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET|PUT /api/config/prompts` body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prompts {
    pub system_prompt: String,
    pub user_prompt_template: String,
}

// ---------------------------------------------------------------------------
// Backups
// ---------------------------------------------------------------------------

/// `GET /api/backup/status` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackupStatus {
    pub backup_dir: String,
    pub backup_count: u64,
    pub backup_files: Vec<String>,
    pub last_success_at: Option<String>,
    pub enabled: bool,
    pub interval_hours: u64,
    pub retention_count: u64,
}

/// `POST /api/backup/run` body.  The backend answers 500 with `ok: false`
/// on failure, which the client surfaces as an error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackupRunResult {
    pub ok: bool,
    pub path: Option<String>,
    pub timestamp: Option<String>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Billing / version
// ---------------------------------------------------------------------------

/// `GET /api/billing/summary` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BillingSummary {
    pub feeds_in_use: u64,
    pub feed_allowance: u64,
}

/// `GET /api/version` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VersionInfo {
    pub version: String,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedStats {
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EpisodeStats {
    pub total: u64,
    pub processed: u64,
    pub unprocessed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TranscriptStats {
    pub total_segments: u64,
    pub total_transcribed_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelCallStats {
    pub total: u64,
    pub by_model: BTreeMap<String, u64>,
    pub by_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AdDetectionStats {
    pub total_identifications: u64,
    pub ad_identifications: u64,
    pub estimated_ad_minutes: f64,
    pub estimated_ad_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct JobStats {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub success_rate_percent: Option<f64>,
}

/// `GET /api/stats` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsResponse {
    pub feeds: FeedStats,
    pub episodes: EpisodeStats,
    pub transcript: TranscriptStats,
    pub model_calls: ModelCallStats,
    pub ad_detection: AdDetectionStats,
    pub processing_jobs: JobStats,
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

/// `GET /api/auth/status` body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthStatus {
    pub require_auth: bool,
    pub landing_page_enabled: bool,
}

/// A console user as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Body of `GET /api/auth/me` and `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

/// Body of `GET /api/auth/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Body of `POST /api/auth/users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_tolerates_missing_sections() {
        let json = r#"{"feeds":{"total":3},"episodes":{"total":10,"processed":7,"unprocessed":3}}"#;
        let stats: StatsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(stats.feeds.total, 3);
        assert_eq!(stats.episodes.processed, 7);
        assert_eq!(stats.model_calls.total, 0);
        assert!(stats.processing_jobs.success_rate_percent.is_none());
    }

    #[test]
    fn envelope_without_overrides() {
        let env: ConfigEnvelope =
            serde_json::from_str(r#"{"config":{"llm":{"llm_model":"gpt-4o"}}}"#).unwrap();
        assert!(env.env_overrides.is_empty());
        assert_eq!(
            env.config.get(&["llm", "llm_model"]),
            Some(&serde_json::json!("gpt-4o"))
        );
    }

    #[test]
    fn copilot_model_labels() {
        let m: CopilotModel =
            serde_json::from_str(r#"{"id":"gpt-4.1","name":"","cost_multiplier":0}"#).unwrap();
        assert_eq!(m.display_name(), "gpt-4.1");
        assert!(m.is_premium());
        assert_eq!(m.cost_label(), "0x");

        let m: CopilotModel = serde_json::from_str(r#"{"id":"o3","name":"o3 (preview)"}"#).unwrap();
        assert_eq!(m.display_name(), "o3 (preview)");
        assert!(!m.is_premium());
        assert_eq!(m.cost_label(), "—");
    }

    #[test]
    fn user_role_defaults_to_user() {
        let u: User = serde_json::from_str(r#"{"username":"ann"}"#).unwrap();
        assert_eq!(u.role, "user");
        assert!(!u.is_admin());
    }
}

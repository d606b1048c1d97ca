//! Field catalog for the form tabs.
//!
//! Each entry binds a config path to a label, an optional hint, an input kind
//! and the value shown when the document has no value yet.  The catalog is
//! also the source of human-readable labels for the env-warning dialog.

use serde_json::Value;

use super::controller::ConfigTab;
use crate::store::{dotted, ConfigDocument, NumberInput};

// ---------------------------------------------------------------------------
// FieldSpec
// ---------------------------------------------------------------------------

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text { placeholder: &'static str },
    /// Write-only secret; the placeholder shows the server preview.
    Secret,
    Number(NumberInput),
    Toggle,
}

/// Value shown when the path is absent from the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    None,
    Str(&'static str),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::None => Value::Null,
            FieldDefault::Str(s) => Value::from(s),
            FieldDefault::Int(i) => Value::from(i),
            FieldDefault::Float(f) => Value::from(f),
            FieldDefault::Bool(b) => Value::from(b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub path: &'static [&'static str],
    pub label: &'static str,
    pub hint: Option<&'static str>,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub fn dotted(&self) -> String {
        dotted(self.path)
    }

    /// Current value in `doc`, or the default.
    pub fn value_in(&self, doc: &ConfigDocument) -> Value {
        match doc.get(self.path) {
            Some(v) if !v.is_null() => v.clone(),
            Some(_) if self.default == FieldDefault::None => Value::Null,
            _ => self.default.to_value(),
        }
    }

    /// Text for an input box: strings as-is, numbers formatted, null empty.
    pub fn display_text(&self, doc: &ConfigDocument) -> String {
        match self.value_in(doc) {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        }
    }

    pub fn bool_in(&self, doc: &ConfigDocument) -> bool {
        self.value_in(doc).as_bool().unwrap_or(false)
    }
}

const fn text(
    path: &'static [&'static str],
    label: &'static str,
    placeholder: &'static str,
    default: FieldDefault,
) -> FieldSpec {
    FieldSpec {
        path,
        label,
        hint: None,
        kind: FieldKind::Text { placeholder },
        default,
    }
}

const fn number(
    path: &'static [&'static str],
    label: &'static str,
    hint: Option<&'static str>,
    input: NumberInput,
    default: FieldDefault,
) -> FieldSpec {
    FieldSpec {
        path,
        label,
        hint,
        kind: FieldKind::Number(input),
        default,
    }
}

const fn toggle(
    path: &'static [&'static str],
    label: &'static str,
    hint: Option<&'static str>,
    default: bool,
) -> FieldSpec {
    FieldSpec {
        path,
        label,
        hint,
        kind: FieldKind::Toggle,
        default: FieldDefault::Bool(default),
    }
}

use FieldDefault::{Float, Int, Str};
use NumberInput::{Nullable, Required};

// ---------------------------------------------------------------------------
// LLM
// ---------------------------------------------------------------------------

/// Suggestions offered under the model box.
pub const LLM_MODEL_ALIASES: &[&str] = &[
    "openai/gpt-4",
    "openai/gpt-4o",
    "anthropic/claude-3.5-sonnet",
    "anthropic/claude-3.5-haiku",
    "gemini/gemini-3-flash-preview",
    "gemini/gemini-2.0-flash",
    "gemini/gemini-1.5-pro",
    "gemini/gemini-1.5-flash",
    "groq/openai/gpt-oss-120b",
];

pub static LLM_API_KEY: FieldSpec = FieldSpec {
    path: &["llm", "llm_api_key"],
    label: "API Key",
    hint: None,
    kind: FieldKind::Secret,
    default: FieldDefault::None,
};

pub static LLM_BASE_URL: FieldSpec = FieldSpec {
    path: &["llm", "openai_base_url"],
    label: "OpenAI Base URL",
    hint: Some(
        "Only needed for OpenAI-compatible endpoints. Leave empty for providers \
         selected by model prefix (groq/, anthropic/, gemini/).",
    ),
    kind: FieldKind::Text {
        placeholder: "https://api.openai.com/v1",
    },
    default: FieldDefault::None,
};

pub static LLM_MODEL: FieldSpec = text(
    &["llm", "llm_model"],
    "Model",
    "e.g. groq/openai/gpt-oss-120b",
    FieldDefault::None,
);

pub const LLM_FIELDS: &[FieldSpec] = &[
    number(&["llm", "openai_timeout"], "OpenAI Timeout (sec)", None, Required, Int(300)),
    number(&["llm", "openai_max_tokens"], "OpenAI Max Tokens", None, Required, Int(4096)),
    number(
        &["llm", "llm_max_concurrent_calls"],
        "Max Concurrent LLM Calls",
        None,
        Required,
        Int(3),
    ),
    number(&["llm", "llm_max_retry_attempts"], "Max Retry Attempts", None, Required, Int(5)),
    toggle(
        &["llm", "llm_enable_token_rate_limiting"],
        "Enable Token Rate Limiting",
        None,
        false,
    ),
    toggle(
        &["llm", "enable_boundary_refinement"],
        "Enable Boundary Refinement",
        Some("LLM-based ad boundary refinement for improved precision"),
        true,
    ),
    toggle(
        &["llm", "enable_word_level_boundary_refinder"],
        "Enable Word-Level Boundary Refiner",
        Some("Uses a word-position heuristic to estimate the ad start time within a transcript segment"),
        false,
    ),
    number(
        &["llm", "llm_max_input_tokens_per_call"],
        "Max Input Tokens Per Call (optional)",
        None,
        Nullable,
        FieldDefault::None,
    ),
    number(
        &["llm", "llm_max_input_tokens_per_minute"],
        "Max Input Tokens Per Minute (optional)",
        None,
        Nullable,
        FieldDefault::None,
    ),
];

/// Both keys the backend accepts for the Copilot token.
pub const GITHUB_PAT_PATHS: [&[&str]; 2] = [&["llm", "github_pat"], &["llm", "llm_github_pat"]];

// ---------------------------------------------------------------------------
// Whisper
// ---------------------------------------------------------------------------

pub static WHISPER_API_KEY: FieldSpec = FieldSpec {
    path: &["whisper", "api_key"],
    label: "API Key",
    hint: None,
    kind: FieldKind::Secret,
    default: FieldDefault::None,
};

pub const WHISPER_FIELDS: &[FieldSpec] = &[
    text(&["whisper", "model"], "Model", "whisper-1", Str("whisper-1")),
    text(
        &["whisper", "base_url"],
        "Base URL",
        "https://api.openai.com/v1",
        FieldDefault::None,
    ),
    text(&["whisper", "language"], "Language", "en", Str("en")),
    number(&["whisper", "timeout_sec"], "Timeout (sec)", None, Required, Int(600)),
    number(&["whisper", "chunksize_mb"], "Chunk Size (MB)", None, Required, Int(24)),
];

// ---------------------------------------------------------------------------
// Processing & Output
// ---------------------------------------------------------------------------

pub const PROCESSING_FIELDS: &[FieldSpec] = &[number(
    &["processing", "num_segments_to_input_to_prompt"],
    "Segments per Prompt",
    Some(
        "Number of transcript segments batched together in each LLM ad-detection call. \
         Higher values reduce the number of API calls but increase per-call cost and prompt size.",
    ),
    Required,
    Int(30),
)];

pub const OUTPUT_FIELDS: &[FieldSpec] = &[
    number(
        &["output", "fade_ms"],
        "Fade (ms)",
        Some("Duration of the audio crossfade at each ad cut point, in milliseconds. Set to 0 to disable fading."),
        Required,
        Int(3000),
    ),
    number(
        &["output", "min_ad_segement_separation_seconds"],
        "Min Segment Separation (sec)",
        Some("Adjacent ad segments closer than this are merged into a single cut. Prevents choppy back-to-back cuts."),
        Required,
        Int(60),
    ),
    number(
        &["output", "min_ad_segment_length_seconds"],
        "Min Segment Length (sec)",
        Some("Ad segments shorter than this duration are ignored. Prevents very short false-positive cuts."),
        Required,
        Int(14),
    ),
    number(
        &["output", "min_confidence"],
        "Min Confidence",
        Some(
            "Minimum LLM confidence score (0-1) required to classify a segment as an ad. \
             Higher values produce fewer but more certain cuts.",
        ),
        Required,
        Float(0.8),
    ),
];

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub const APP_FIELDS: &[FieldSpec] = &[
    number(
        &["app", "background_update_interval_minute"],
        "Feed Refresh Interval (min)",
        Some("How often Podly polls your subscribed RSS feeds for new episodes, in minutes."),
        Nullable,
        FieldDefault::None,
    ),
    number(
        &["app", "post_cleanup_retention_days"],
        "Cleanup Retention (days)",
        Some(
            "Processed audio files older than this many days are automatically deleted. \
             Set to 0 to keep files indefinitely.",
        ),
        Nullable,
        FieldDefault::None,
    ),
    toggle(
        &["app", "automatically_whitelist_new_episodes"],
        "Auto-whitelist new episodes",
        Some("When a new episode is detected in a subscribed feed, automatically queue it for ad removal processing."),
        false,
    ),
    toggle(
        &["app", "autoprocess_on_download"],
        "Autoprocess on download",
        Some(
            "Include all feed episodes in the RSS output. When a client downloads an unprocessed \
             episode, trigger ad removal processing automatically.",
        ),
        false,
    ),
    number(
        &["app", "number_of_episodes_to_whitelist_from_archive_of_new_feed"],
        "Archive episodes on new feed",
        Some(
            "When you subscribe to a new feed, this many of the most recent existing episodes \
             are immediately whitelisted and queued for processing.",
        ),
        Required,
        Int(1),
    ),
    toggle(
        &["app", "enable_public_landing_page"],
        "Enable public landing page",
        Some("Show a public landing page to unauthenticated visitors instead of redirecting them to the login screen."),
        false,
    ),
];

pub const BACKUP_FIELDS: &[FieldSpec] = &[
    toggle(
        &["app", "db_backup_enabled"],
        "Enable database backups",
        Some("Periodically copy the database into the backup directory."),
        false,
    ),
    number(
        &["app", "db_backup_interval_hours"],
        "Backup interval (hours)",
        None,
        Required,
        Int(24),
    ),
    number(
        &["app", "db_backup_retention_count"],
        "Backups to keep",
        Some("Older backup files beyond this count are deleted."),
        Required,
        Int(7),
    ),
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Every catalogued field of `tab`, secrets and free text included.
pub fn fields_for(tab: ConfigTab) -> Vec<&'static FieldSpec> {
    let mut out: Vec<&'static FieldSpec> = Vec::new();
    match tab {
        ConfigTab::Llm => {
            out.extend([&LLM_API_KEY, &LLM_BASE_URL, &LLM_MODEL]);
            out.extend(LLM_FIELDS);
        }
        ConfigTab::Whisper => {
            out.push(&WHISPER_API_KEY);
            out.extend(WHISPER_FIELDS);
        }
        ConfigTab::Output => {
            out.extend(PROCESSING_FIELDS);
            out.extend(OUTPUT_FIELDS);
        }
        ConfigTab::App => {
            out.extend(APP_FIELDS);
            out.extend(BACKUP_FIELDS);
        }
        ConfigTab::Prompts | ConfigTab::Users => {}
    }
    out
}

/// Label of the field at dotted `path`, for dialogs that list paths.
pub fn label_for_path(path: &str) -> Option<&'static str> {
    ConfigTab::ALL
        .iter()
        .flat_map(|tab| fields_for(*tab))
        .find(|f| f.dotted() == path)
        .map(|f| f.label)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_apply_to_missing_values() {
        let doc = ConfigDocument::from_value(json!({"llm": {}}));
        let timeout = &LLM_FIELDS[0];
        assert_eq!(timeout.value_in(&doc), json!(300));
        assert_eq!(timeout.display_text(&doc), "300");
    }

    #[test]
    fn nullable_without_default_shows_empty() {
        let doc = ConfigDocument::from_value(json!({"app": {"post_cleanup_retention_days": null}}));
        let retention = &APP_FIELDS[1];
        assert_eq!(retention.display_text(&doc), "");
    }

    #[test]
    fn boundary_refinement_defaults_on() {
        let doc = ConfigDocument::new();
        let f = LLM_FIELDS
            .iter()
            .find(|f| f.path == ["llm", "enable_boundary_refinement"])
            .unwrap();
        assert!(f.bool_in(&doc));
    }

    #[test]
    fn present_value_wins_over_default() {
        let doc = ConfigDocument::from_value(json!({"output": {"min_confidence": 0.65}}));
        assert_eq!(OUTPUT_FIELDS[3].display_text(&doc), "0.65");
    }

    #[test]
    fn labels_resolve_for_env_paths() {
        assert_eq!(label_for_path("whisper.timeout_sec"), Some("Timeout (sec)"));
        assert_eq!(label_for_path("llm.llm_api_key"), Some("API Key"));
        assert_eq!(label_for_path("nope.nothing"), None);
    }

    #[test]
    fn every_path_is_unique() {
        let mut seen = std::collections::HashSet::new();
        for tab in ConfigTab::ALL {
            for f in fields_for(tab) {
                assert!(seen.insert(f.dotted()), "duplicate {}", f.dotted());
            }
        }
    }
}

//! Console settings structs, defaults and TOML persistence.
//!
//! These are local preferences of the console itself (which backend to talk
//! to, theme, refresh cadence).  The podcast service configuration edited in
//! the Config page lives on the backend and never touches this file.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::shell::Theme;

/// Environment variable that overrides [`ServerConfig::base_url`] at startup.
pub const SERVER_URL_ENV: &str = "PODLY_SERVER_URL";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Connection settings for the backend REST API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the backend, without the `/api` prefix
    /// (e.g. `http://localhost:5001`).
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.  This is the only
    /// timeout a connection probe is subject to.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".into(),
            request_timeout_secs: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Window and dashboard preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Light or dark visuals.
    pub theme: Theme,
    /// Last window size `(width, height)`.  `None` uses the built-in default.
    pub window_size: Option<(f32, f32)>,
    /// Seconds between automatic refreshes of the Stats page.
    pub stats_refresh_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            window_size: None,
            stats_refresh_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// ConsoleSettings  (top-level)
// ---------------------------------------------------------------------------

/// Top-level console settings, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use podly_console::config::ConsoleSettings;
///
/// // Load (returns Default when file is missing)
/// let settings = ConsoleSettings::load().unwrap();
/// println!("{}", settings.server.base_url);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Backend connection settings.
    pub server: ServerConfig,
    /// UI preferences.
    pub ui: UiConfig,
}

impl ConsoleSettings {
    /// Load settings from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(ConsoleSettings::default())` when the file does not exist
    /// yet, so first launch needs no special casing.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to the platform-appropriate `settings.toml`, creating
    /// parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply an override of the backend URL, typically the value of
    /// [`SERVER_URL_ENV`].  Blank values are ignored and a trailing `/` is
    /// trimmed.
    pub fn with_server_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value {
            let url = url.trim().trim_end_matches('/');
            if !url.is_empty() {
                self.server.base_url = url.to_string();
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

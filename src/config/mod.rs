//! Local console configuration.
//!
//! Provides [`ConsoleSettings`] (backend URL, UI preferences), [`AppPaths`]
//! for the platform config directory, and TOML persistence via
//! `ConsoleSettings::load` / `ConsoleSettings::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{ConsoleSettings, ServerConfig, UiConfig, SERVER_URL_ENV};

//! Light/dark theme.

use eframe::egui;
use serde::{Deserialize, Serialize};

/// Console colour scheme, persisted in `settings.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Hover text of the header toggle button.
    pub fn toggle_hint(self) -> &'static str {
        match self {
            Theme::Light => "Switch to dark mode",
            Theme::Dark => "Switch to light mode",
        }
    }

    /// Glyph on the header toggle button.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀",
        }
    }

    pub fn visuals(self) -> egui::Visuals {
        match self {
            Theme::Light => egui::Visuals::light(),
            Theme::Dark => egui::Visuals::dark(),
        }
    }

    /// Apply to `ctx`.  Cheap enough to call every frame.
    pub fn apply(self, ctx: &egui::Context) {
        ctx.set_visuals(self.visuals());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }

    #[test]
    fn serialises_lowercase() {
        #[derive(Serialize, Deserialize)]
        struct Wrap {
            theme: Theme,
        }
        let s = toml::to_string(&Wrap { theme: Theme::Dark }).unwrap();
        assert_eq!(s.trim(), "theme = \"dark\"");
        let w: Wrap = toml::from_str("theme = \"light\"").unwrap();
        assert_eq!(w.theme, Theme::Light);
    }

    #[test]
    fn dark_visuals_are_dark() {
        assert!(Theme::Dark.visuals().dark_mode);
        assert!(!Theme::Light.visuals().dark_mode);
    }
}

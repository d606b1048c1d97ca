//! Changelog modal opened from the version label in the header.

use crate::api::{ApiError, VersionInfo};

#[derive(Debug, Clone, Default)]
pub struct ChangelogView {
    open: bool,
    loading: bool,
    text: Option<String>,
    error: Option<String>,
    version: Option<String>,
}

impl ChangelogView {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Backend version, once known.  The header hides the button until then.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn version_loaded(&mut self, result: Result<VersionInfo, ApiError>) {
        match result {
            Ok(info) if !info.version.is_empty() => self.version = Some(info.version),
            Ok(_) => {}
            Err(e) => log::debug!("version unavailable: {e}"),
        }
    }

    /// Open the modal.  Returns `true` when the caller should fetch; the
    /// changelog is refetched on every open.
    pub fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        self.loading = true;
        self.error = None;
        true
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn loaded(&mut self, result: Result<String, ApiError>) {
        self.loading = false;
        match result {
            Ok(text) => self.text = Some(text),
            Err(e) => self.error = Some(e.user_message("Failed to load changelog")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reopening_refetches() {
        let mut view = ChangelogView::default();
        assert!(view.open());
        assert!(!view.open(), "already open");
        view.loaded(Ok("## 1.4.0".into()));
        assert_eq!(view.text(), Some("## 1.4.0"));
        view.close();
        assert!(view.open());
        assert!(view.is_loading());
    }

    #[test]
    fn failed_fetch_shows_fallback() {
        let mut view = ChangelogView::default();
        view.open();
        view.loaded(Err(ApiError::from_status_body(404, "")));
        assert_eq!(view.error(), Some("Failed to load changelog"));
        assert!(!view.is_loading());
    }

    #[test]
    fn empty_version_is_ignored() {
        let mut view = ChangelogView::default();
        view.version_loaded(Ok(VersionInfo {
            version: String::new(),
        }));
        assert!(view.version().is_none());
        view.version_loaded(Ok(VersionInfo {
            version: "1.4.0".into(),
        }));
        assert_eq!(view.version(), Some("1.4.0"));
    }
}

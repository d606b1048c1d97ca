//! Which config tab is active, and who may see it.
//!
//! The active tab lives only in the `tab` query parameter of the current
//! location.  Reading it always goes through [`resolve_tab`], so a stale or
//! hand-edited location can never show a forbidden tab.

use crate::shell::{AccessContext, History};

/// Query parameter holding the active tab.
pub const TAB_QUERY_KEY: &str = "tab";

// ---------------------------------------------------------------------------
// ConfigTab
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigTab {
    Whisper,
    Llm,
    Output,
    App,
    Prompts,
    Users,
}

impl ConfigTab {
    /// Display order.
    pub const ALL: [ConfigTab; 6] = [
        ConfigTab::Whisper,
        ConfigTab::Llm,
        ConfigTab::Output,
        ConfigTab::App,
        ConfigTab::Prompts,
        ConfigTab::Users,
    ];

    /// Tab used when the query names nothing usable.
    pub const FALLBACK: ConfigTab = ConfigTab::Whisper;

    pub fn id(self) -> &'static str {
        match self {
            ConfigTab::Whisper => "whisper",
            ConfigTab::Llm => "llm",
            ConfigTab::Output => "output",
            ConfigTab::App => "app",
            ConfigTab::Prompts => "prompts",
            ConfigTab::Users => "users",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfigTab::Whisper => "Whisper",
            ConfigTab::Llm => "LLM",
            ConfigTab::Output => "Processing & Output",
            ConfigTab::App => "App",
            ConfigTab::Prompts => "Prompts",
            ConfigTab::Users => "User Management",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn admin_only(self) -> bool {
        self == ConfigTab::Users
    }

    /// Users only exist when the backend requires auth, and only admins
    /// manage them.
    pub fn is_allowed(self, access: AccessContext) -> bool {
        match self {
            ConfigTab::Users => access.require_auth && access.is_admin,
            _ => true,
        }
    }
}

/// Active tab for a `tab` query value.
pub fn resolve_tab(query: Option<&str>, access: AccessContext) -> ConfigTab {
    query
        .and_then(ConfigTab::from_id)
        .filter(|tab| tab.is_allowed(access))
        .unwrap_or(ConfigTab::FALLBACK)
}

/// Tabs to render in the tab bar, in display order.
pub fn visible_tabs(access: AccessContext) -> Vec<ConfigTab> {
    ConfigTab::ALL
        .into_iter()
        .filter(|tab| tab.is_allowed(access))
        .collect()
}

// ---------------------------------------------------------------------------
// TabController
// ---------------------------------------------------------------------------

/// Binds the tab rules to the location history.
#[derive(Debug, Clone, Copy)]
pub struct TabController {
    access: AccessContext,
}

impl TabController {
    pub fn new(access: AccessContext) -> Self {
        Self { access }
    }

    pub fn access(&self) -> AccessContext {
        self.access
    }

    pub fn active_tab(&self, history: &History) -> ConfigTab {
        resolve_tab(history.current().query_param(TAB_QUERY_KEY), self.access)
    }

    pub fn visible_tabs(&self) -> Vec<ConfigTab> {
        visible_tabs(self.access)
    }

    /// Switch tabs by rewriting the current location.  No history entry is
    /// added.
    pub fn set_active_tab(&self, history: &mut History, tab: ConfigTab) {
        let next = history
            .current()
            .with_query_param(TAB_QUERY_KEY, tab.id());
        history.replace(next);
    }

    /// Adopt new access rights and move off a tab that is no longer allowed.
    ///
    /// Returns `true` when the location was rewritten.
    pub fn revalidate(&mut self, access: AccessContext, history: &mut History) -> bool {
        self.access = access;
        let requested = history
            .current()
            .query_param(TAB_QUERY_KEY)
            .and_then(ConfigTab::from_id);
        match requested {
            Some(tab) if !tab.is_allowed(access) => {
                log::debug!("tab '{}' not allowed, falling back", tab.id());
                self.set_active_tab(history, ConfigTab::FALLBACK);
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::Location;

    const USER: AccessContext = AccessContext {
        require_auth: true,
        is_admin: false,
    };
    const ADMIN: AccessContext = AccessContext {
        require_auth: true,
        is_admin: true,
    };

    fn history(raw: &str) -> History {
        let mut h = History::new(Location::parse("/"));
        h.push(Location::parse(raw));
        h
    }

    #[test]
    fn missing_or_invalid_query_falls_back_to_whisper() {
        assert_eq!(resolve_tab(None, ADMIN), ConfigTab::Whisper);
        assert_eq!(resolve_tab(Some("bogus"), ADMIN), ConfigTab::Whisper);
        assert_eq!(resolve_tab(Some("llm"), USER), ConfigTab::Llm);
    }

    #[test]
    fn users_tab_needs_admin_and_auth() {
        assert_eq!(resolve_tab(Some("users"), USER), ConfigTab::Whisper);
        assert_eq!(resolve_tab(Some("users"), AccessContext::OPEN), ConfigTab::Whisper);
        assert_eq!(resolve_tab(Some("users"), ADMIN), ConfigTab::Users);
    }

    #[test]
    fn visible_tabs_per_access() {
        assert_eq!(visible_tabs(ADMIN).len(), 6);
        assert!(!visible_tabs(USER).contains(&ConfigTab::Users));
        assert!(!visible_tabs(AccessContext::OPEN).contains(&ConfigTab::Users));
        assert_eq!(visible_tabs(USER)[0], ConfigTab::Whisper);
    }

    #[test]
    fn set_active_tab_replaces_current_entry() {
        let mut h = history("/config?tab=whisper");
        let len = h.len();
        let tabs = TabController::new(ADMIN);

        tabs.set_active_tab(&mut h, ConfigTab::Prompts);
        assert_eq!(h.len(), len);
        assert_eq!(h.current().to_string(), "/config?tab=prompts");
        assert_eq!(tabs.active_tab(&h), ConfigTab::Prompts);
    }

    #[test]
    fn non_admin_on_users_tab_is_redirected_without_new_entry() {
        let mut h = history("/config?tab=users");
        let len = h.len();
        let mut tabs = TabController::new(ADMIN);
        assert_eq!(tabs.active_tab(&h), ConfigTab::Users);

        assert!(tabs.revalidate(USER, &mut h));
        assert_eq!(h.len(), len);
        assert_eq!(h.current().query_param(TAB_QUERY_KEY), Some("whisper"));
        assert_eq!(tabs.active_tab(&h), ConfigTab::Whisper);
    }

    #[test]
    fn revalidate_leaves_allowed_tab_alone() {
        let mut h = history("/config?tab=llm");
        let mut tabs = TabController::new(ADMIN);
        assert!(!tabs.revalidate(USER, &mut h));
        assert_eq!(h.current().to_string(), "/config?tab=llm");
    }

    #[test]
    fn ids_round_trip() {
        for tab in ConfigTab::ALL {
            assert_eq!(ConfigTab::from_id(tab.id()), Some(tab));
        }
        assert!(ConfigTab::Users.admin_only());
        assert_eq!(ConfigTab::Output.label(), "Processing & Output");
    }
}

//! Authentication context: auth mode, session user and the access rules
//! derived from them.

use crate::api::{SessionInfo, User};

/// What the access rules need to know about the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessContext {
    pub require_auth: bool,
    pub is_admin: bool,
}

impl AccessContext {
    /// Auth disabled: everyone is an admin.
    pub const OPEN: AccessContext = AccessContext {
        require_auth: false,
        is_admin: true,
    };
}

/// Session state owned by the app shell.
///
/// Starts in the loading state; the shell shows a spinner until the first
/// session fetch settles.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    loading: bool,
    require_auth: bool,
    landing_page_enabled: bool,
    user: Option<User>,
    /// Last load failure, shown on the loading screen with a retry button.
    pub load_error: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            loading: true,
            require_auth: false,
            landing_page_enabled: false,
            user: None,
            load_error: None,
        }
    }
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn require_auth(&self) -> bool {
        self.require_auth
    }

    pub fn landing_page_enabled(&self) -> bool {
        self.landing_page_enabled
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Apply the result of a session fetch.
    pub fn apply_session(&mut self, info: SessionInfo) {
        self.loading = false;
        self.load_error = None;
        self.require_auth = info.status.require_auth;
        self.landing_page_enabled = info.status.landing_page_enabled;
        self.user = info.user;
    }

    /// The session fetch failed; stay on the loading screen.
    pub fn session_failed(&mut self, message: String) {
        self.load_error = Some(message);
    }

    /// Back to the loading state before a refetch.
    pub fn begin_reload(&mut self) {
        self.loading = true;
        self.load_error = None;
    }

    pub fn logged_in(&mut self, user: User) {
        log::info!("logged in as {}", user.username);
        self.user = Some(user);
    }

    pub fn logged_out(&mut self) {
        self.user = None;
    }

    /// No login needed, or somebody is logged in.
    pub fn is_authenticated(&self) -> bool {
        !self.require_auth || self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        !self.require_auth || self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Username and logout button are only shown for a real session.
    pub fn show_session_controls(&self) -> bool {
        self.require_auth && self.user.is_some()
    }

    pub fn show_config_link(&self) -> bool {
        self.is_admin()
    }

    pub fn show_jobs_link(&self) -> bool {
        self.is_admin()
    }

    pub fn show_billing_link(&self) -> bool {
        self.require_auth && !self.is_admin()
    }

    /// Billing summary is fetched for logged-in non-admins only.
    pub fn wants_billing(&self) -> bool {
        self.show_session_controls() && !self.is_admin()
    }

    pub fn access(&self) -> AccessContext {
        AccessContext {
            require_auth: self.require_auth,
            is_admin: self.is_admin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::AuthStatus;

    fn user(role: &str) -> User {
        User {
            id: Some(7),
            username: "ann".into(),
            role: role.into(),
        }
    }

    fn session(require_auth: bool, user: Option<User>) -> AuthState {
        let mut auth = AuthState::new();
        auth.apply_session(SessionInfo {
            status: AuthStatus {
                require_auth,
                landing_page_enabled: false,
            },
            user,
        });
        auth
    }

    #[test]
    fn starts_loading() {
        assert!(AuthState::new().is_loading());
    }

    #[test]
    fn open_mode_is_admin_without_user() {
        let auth = session(false, None);
        assert!(!auth.is_loading());
        assert!(auth.is_authenticated());
        assert!(auth.is_admin());
        assert!(!auth.show_billing_link());
        assert!(!auth.show_session_controls());
        assert_eq!(auth.access(), AccessContext::OPEN);
    }

    #[test]
    fn regular_user_sees_billing_not_config() {
        let auth = session(true, Some(user("user")));
        assert!(auth.is_authenticated());
        assert!(!auth.is_admin());
        assert!(auth.show_billing_link());
        assert!(!auth.show_config_link());
        assert!(auth.wants_billing());
    }

    #[test]
    fn admin_sees_config_not_billing() {
        let auth = session(true, Some(user("admin")));
        assert!(auth.show_config_link());
        assert!(auth.show_jobs_link());
        assert!(!auth.show_billing_link());
        assert!(!auth.wants_billing());
    }

    #[test]
    fn logout_drops_authentication() {
        let mut auth = session(true, Some(user("admin")));
        auth.logged_out();
        assert!(!auth.is_authenticated());
        assert!(!auth.is_admin());
    }
}

//! Login form state.

use crate::api::{ApiError, User};

/// Shown when the backend rejects the credentials without saying why.
pub const LOGIN_FALLBACK: &str = "Invalid username or password.";

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    submitting: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.username.trim().is_empty() && !self.password.is_empty()
    }

    /// Credentials to send, or `None` when the form is incomplete or a
    /// request is already out.
    pub fn begin_submit(&mut self) -> Option<(String, String)> {
        if !self.can_submit() {
            return None;
        }
        self.submitting = true;
        self.error = None;
        Some((self.username.trim().to_string(), self.password.clone()))
    }

    /// Apply the login result.  The fields are cleared on success and the
    /// user is handed back to the caller.
    pub fn finished(&mut self, result: Result<User, ApiError>) -> Option<User> {
        self.submitting = false;
        match result {
            Ok(user) => {
                self.username.clear();
                self.password.clear();
                Some(user)
            }
            Err(e) => {
                self.error = Some(e.user_message(LOGIN_FALLBACK));
                None
            }
        }
    }
}

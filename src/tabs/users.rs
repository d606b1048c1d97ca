//! User-management tab state.

use crate::api::{ApiError, NewUser, User};

pub const ROLES: [&str; 2] = ["user", "admin"];

/// The "add user" form.
#[derive(Debug, Clone)]
pub struct NewUserForm {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl Default for NewUserForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            role: ROLES[0].to_string(),
        }
    }
}

impl NewUserForm {
    /// Validate and build the request body.
    pub fn build(&self) -> Result<NewUser, &'static str> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err("Username is required");
        }
        if self.password.is_empty() {
            return Err("Password is required");
        }
        Ok(NewUser {
            username: username.to_string(),
            password: self.password.clone(),
            role: self.role.clone(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserAdmin {
    pub users: Vec<User>,
    pub form: NewUserForm,
    loading: bool,
    busy: bool,
    /// User awaiting delete confirmation.
    pub confirm_delete: Option<String>,
}

impl UserAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn loaded(&mut self, result: Result<Vec<User>, ApiError>) -> Option<String> {
        self.loading = false;
        match result {
            Ok(mut users) => {
                users.sort_by(|a, b| a.username.cmp(&b.username));
                self.users = users;
                None
            }
            Err(e) => Some(e.user_message("Failed to load users")),
        }
    }

    /// Validate the form and mark a create in flight.
    pub fn begin_create(&mut self) -> Result<NewUser, &'static str> {
        let user = self.form.build()?;
        self.busy = true;
        Ok(user)
    }

    /// Apply a create result.  The form is cleared on success.
    pub fn created(&mut self, username: &str, result: Result<(), ApiError>) -> Result<String, String> {
        self.busy = false;
        match result {
            Ok(()) => {
                self.form = NewUserForm::default();
                Ok(format!("User {username} created"))
            }
            Err(e) => Err(e.user_message("Failed to create user")),
        }
    }

    pub fn begin_delete(&mut self) -> Option<String> {
        let username = self.confirm_delete.take()?;
        self.busy = true;
        Some(username)
    }

    pub fn deleted(&mut self, username: &str, result: Result<(), ApiError>) -> Result<String, String> {
        self.busy = false;
        match result {
            Ok(()) => {
                self.users.retain(|u| u.username != username);
                Ok(format!("User {username} deleted"))
            }
            Err(e) => Err(e.user_message("Failed to delete user")),
        }
    }
}

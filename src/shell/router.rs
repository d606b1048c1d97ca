//! In-app location history and route gating.
//!
//! Locations look like URLs without a host: `/config?tab=llm`.  The history
//! supports both push (new entry) and replace (rewrite current entry) so
//! tab switches and redirects do not pile up back-button entries.

use std::fmt;

use url::form_urlencoded;

use super::auth::AuthState;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A path plus ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Parse `"/config?tab=llm"`.  A missing leading `/` is added.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((p, q)) => (p, q),
            None => (raw, ""),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        let query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { path, query }
    }

    /// First value of `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Copy with `key` set to `value`, keeping every other parameter.
    pub fn with_query_param(&self, key: &str, value: &str) -> Self {
        let mut next = self.clone();
        match next.query.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.to_string(),
            None => next.query.push((key.to_string(), value.to_string())),
        }
        next
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            return f.write_str(&self.path);
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        write!(f, "{}?{}", self.path, query)
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Back/forward stack of locations.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
    index: usize,
}

impl History {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Number of entries, forward entries included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigate to `location`, dropping any forward entries.
    pub fn push(&mut self, location: Location) {
        if *self.current() == location {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index += 1;
    }

    /// Rewrite the current entry in place.
    pub fn replace(&mut self, location: Location) {
        self.entries[self.index] = location;
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn back(&mut self) -> bool {
        if self.can_go_back() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// Pages of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Jobs,
    Config,
    Stats,
    Billing,
    Login,
    Landing,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home | Route::Landing => "/",
            Route::Jobs => "/jobs",
            Route::Config => "/config",
            Route::Stats => "/stats",
            Route::Billing => "/billing",
            Route::Login => "/login",
        }
    }
}

/// What the shell should do with the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    /// Replace the current location with this path.
    Redirect(&'static str),
}

/// Match `path` against the routes available to `auth`.
///
/// Callers must handle the auth loading state first.
pub fn resolve_route(path: &str, auth: &AuthState) -> RouteDecision {
    if !auth.is_authenticated() {
        if path == "/login" {
            return RouteDecision::Render(Route::Login);
        }
        if auth.landing_page_enabled() {
            return RouteDecision::Render(Route::Landing);
        }
        return RouteDecision::Redirect("/login");
    }

    let route = match path {
        "/" => Some(Route::Home),
        p if p.starts_with("/feeds/") => Some(Route::Home),
        "/billing" if auth.show_billing_link() => Some(Route::Billing),
        "/jobs" if auth.show_jobs_link() => Some(Route::Jobs),
        "/config" if auth.show_config_link() => Some(Route::Config),
        "/stats" if auth.show_config_link() => Some(Route::Stats),
        _ => None,
    };
    match route {
        Some(route) => RouteDecision::Render(route),
        None => RouteDecision::Redirect("/"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

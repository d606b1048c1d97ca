//! Podly console: the egui/eframe application.
//!
//! # Architecture
//!
//! [`ConsoleApp`] is the top-level [`eframe::App`].  It owns every piece of
//! UI state and two channel endpoints:
//!
//! * `api`    sends [`ApiCommand`]s to the worker on the tokio runtime.
//! * `events` receives [`ApiEvent`]s back; they are drained every frame.
//!
//! ```text
//!   update() ──► poll_events ──► sync_route ──► draw header / page / overlays
//!                    ▲                │
//!                    │          ApiCommand (try_send)
//!                ApiEvent             ▼
//!                    └──────────  api worker  ──► backend REST API
//! ```
//!
//! Pages with their own lifetime:
//!
//! | Route | State | Dropped when |
//! |-------|-------|--------------|
//! | `/config` | [`ConfigSession`] | navigating away (unsaved edits lost) |
//! | `/`, `/jobs`, `/stats` | [`StatsView`] polling | never; polling pauses |
//! | header | [`BillingView`] | logout |
//!
//! The config page and the billing fetch send through scoped handles
//! ([`ApiHandle::scoped`]).  A reply whose scope has been retired is dropped,
//! so a request still in flight cannot touch state created after it.

use std::time::{Duration, Instant};

use chrono::Local;
use eframe::egui;
use tokio::sync::mpsc;

use crate::api::{ApiCommand, ApiEvent, ApiHandle};
use crate::config::ConsoleSettings;
use crate::shell::{
    resolve_route, AccessContext, AuthState, History, Location, Route, RouteDecision, Theme, Toasts,
};
use crate::tabs::ConfigSession;
use crate::ui::{self, HeaderAction, PageAction};
use crate::views::{BillingView, ChangelogView, LoginForm, StatsView};

// ---------------------------------------------------------------------------
// ConsoleApp
// ---------------------------------------------------------------------------

pub struct ConsoleApp {
    // ── Channels ─────────────────────────────────────────────────────────
    api: ApiHandle,
    events: mpsc::Receiver<ApiEvent>,

    // ── Shell ────────────────────────────────────────────────────────────
    settings: ConsoleSettings,
    auth: AuthState,
    history: History,
    toasts: Toasts,
    /// Access rights the open config page was last checked against.
    last_access: Option<AccessContext>,
    /// Last scope handed out; replies tagged with a retired scope are dropped.
    last_scope: u64,

    // ── Pages ────────────────────────────────────────────────────────────
    config: Option<ConfigSession>,
    stats: StatsView,
    billing: BillingView,
    changelog: ChangelogView,
    login: LoginForm,
}

impl ConsoleApp {
    /// Create the app and request the session and backend version.
    pub fn new(api: ApiHandle, events: mpsc::Receiver<ApiEvent>, settings: ConsoleSettings) -> Self {
        let refresh = Duration::from_secs(settings.ui.stats_refresh_secs.max(1));
        api.send(ApiCommand::LoadSession);
        api.send(ApiCommand::LoadVersion);
        Self {
            api,
            events,
            settings,
            auth: AuthState::new(),
            history: History::new(Location::parse("/")),
            toasts: Toasts::new(),
            last_access: None,
            last_scope: 0,
            config: None,
            stats: StatsView::new(refresh),
            billing: BillingView::default(),
            changelog: ChangelogView::default(),
            login: LoginForm::default(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.settings.ui.theme
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Push a new location, as following a link does.
    pub fn navigate(&mut self, path: &str) {
        self.history.push(Location::parse(path));
    }

    fn next_scope(&mut self) -> u64 {
        self.last_scope += 1;
        self.last_scope
    }

    // ── Channel polling ──────────────────────────────────────────────────

    /// Drain all pending worker events (non-blocking).
    fn poll_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Session(Ok(info)) => {
                self.auth.apply_session(info);
                self.billing.reset();
            }
            ApiEvent::Session(Err(e)) => {
                let msg = e.user_message("Failed to load authentication status");
                log::warn!("session: {msg}");
                self.auth.session_failed(msg);
            }
            ApiEvent::LoggedIn(result) => {
                if let Some(user) = self.login.finished(result) {
                    self.auth.logged_in(user);
                    self.billing.reset();
                }
            }
            ApiEvent::LoggedOut(result) => {
                if let Err(e) = result {
                    self.toasts.error(e.user_message("Logout failed"));
                }
                self.auth.logged_out();
                self.billing.reset();
                self.config = None;
            }
            ApiEvent::Version(result) => self.changelog.version_loaded(result),
            ApiEvent::Changelog(result) => self.changelog.loaded(result),
            ApiEvent::Stats(result) => self.stats.loaded(result, Local::now()),
            ApiEvent::Scoped { scope, event } => self.apply_scoped(scope, *event),
            _ => log::debug!("unscoped reply dropped"),
        }
    }

    /// Route a reply to the billing fetch or config page that asked for it.
    fn apply_scoped(&mut self, scope: u64, event: ApiEvent) {
        if let ApiEvent::Billing(result) = event {
            if !self.billing.loaded(scope, result) {
                log::debug!("stale billing reply dropped (scope {scope})");
            }
            return;
        }
        match self.config.as_mut() {
            Some(session) if session.scope() == Some(scope) => {
                session.apply(event, &mut self.toasts);
            }
            _ => log::debug!("reply for a closed config page dropped (scope {scope})"),
        }
    }

    // ── Routing ──────────────────────────────────────────────────────────

    /// Resolve the current location, following redirects, and bring page
    /// state in line with the result.  `None` while auth is loading.
    fn sync_route(&mut self, now: Instant) -> Option<Route> {
        if self.auth.is_loading() {
            return None;
        }
        let route = loop {
            match resolve_route(&self.history.current().path, &self.auth) {
                RouteDecision::Render(route) => break route,
                RouteDecision::Redirect(path) => {
                    log::debug!("redirect {} -> {path}", self.history.current());
                    self.history.replace(Location::parse(path));
                }
            }
        };

        let access = self.auth.access();
        if route == Route::Config {
            match self.config.as_mut() {
                Some(session) => {
                    if self.last_access != Some(access) {
                        session.revalidate(access, &mut self.history);
                    }
                }
                None => {
                    let scope = self.next_scope();
                    let mut session = ConfigSession::new(self.api.scoped(scope), access);
                    session.mount();
                    session.revalidate(access, &mut self.history);
                    self.config = Some(session);
                }
            }
            self.last_access = Some(access);
        } else if self.config.take().is_some() {
            log::debug!("left config page; draft discarded");
        }

        if matches!(route, Route::Home | Route::Jobs | Route::Stats) && self.auth.is_admin() {
            if self.stats.poll_due(now) {
                self.stats.begin_load(now);
                self.api.send(ApiCommand::LoadStats);
            }
        } else {
            self.stats.pause();
        }

        if self.billing.should_fetch(self.auth.wants_billing()) {
            let scope = self.next_scope();
            self.billing.expect_reply(scope);
            self.api.scoped(scope).send(ApiCommand::LoadBilling);
        }
        Some(route)
    }

    // ── Actions ──────────────────────────────────────────────────────────

    fn toggle_theme(&mut self) {
        self.settings.ui.theme = self.settings.ui.theme.toggled();
    }

    fn on_header(&mut self, action: HeaderAction) {
        match action {
            HeaderAction::Navigate(path) => self.navigate(path),
            HeaderAction::OpenChangelog => {
                if self.changelog.open() {
                    self.api.send(ApiCommand::LoadChangelog);
                }
            }
            HeaderAction::ToggleTheme => self.toggle_theme(),
            HeaderAction::Logout => {
                self.api.send(ApiCommand::Logout);
            }
        }
    }

    fn on_page(&mut self, action: PageAction) {
        match action {
            PageAction::Navigate(path) => self.navigate(path),
            PageAction::RefreshStats => self.stats.refresh_now(),
            PageAction::Login => {
                if let Some((username, password)) = self.login.begin_submit() {
                    self.api.send(ApiCommand::Login { username, password });
                }
            }
            PageAction::RetrySession => {
                self.auth.begin_reload();
                self.api.send(ApiCommand::LoadSession);
            }
            PageAction::ToggleTheme => self.toggle_theme(),
        }
    }

    /// Alt+Left / Alt+Right walk the location history.
    fn handle_history_keys(&mut self, ctx: &egui::Context) {
        let (back, forward) = ctx.input(|i| {
            (
                i.modifiers.alt && i.key_pressed(egui::Key::ArrowLeft),
                i.modifiers.alt && i.key_pressed(egui::Key::ArrowRight),
            )
        });
        if back {
            self.history.back();
        } else if forward {
            self.history.forward();
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────

    fn draw_page(&mut self, ui: &mut egui::Ui, route: Route) -> Option<PageAction> {
        match route {
            Route::Home if self.auth.is_admin() => ui::pages::home(ui, &self.stats),
            Route::Home => {
                let name = self.auth.user().map(|u| u.username.as_str()).unwrap_or("there");
                ui.heading(format!("Welcome, {name}"));
                None
            }
            Route::Jobs => ui::pages::jobs(ui, &self.stats),
            Route::Stats => ui::pages::stats(ui, &self.stats),
            Route::Billing => {
                ui::pages::billing(ui, &self.billing);
                None
            }
            Route::Config => {
                if let Some(session) = self.config.as_mut() {
                    ui::config_page::draw(ui, session, &mut self.history, &mut self.toasts);
                }
                None
            }
            Route::Login => ui::pages::login(ui, &mut self.login, self.settings.ui.theme),
            Route::Landing => ui::pages::landing(ui),
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context, now: Instant) {
        let mut wait = Duration::from_secs(5);
        if !self.toasts.is_empty() {
            wait = wait.min(Duration::from_millis(250));
        }
        if let Some(next) = self.stats.until_next_poll(now) {
            wait = wait.min(next.max(Duration::from_millis(100)));
        }
        ctx.request_repaint_after(wait);
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for ConsoleApp {
    /// Called every frame by eframe.  Drains events, resolves the route,
    /// then renders.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        // --- Poll worker events -------------------------------------------
        self.poll_events();
        self.toasts.expire(now);
        self.handle_history_keys(ctx);
        self.settings.ui.theme.apply(ctx);
        if let Some(rect) = ctx.input(|i| i.viewport().inner_rect) {
            self.settings.ui.window_size = Some((rect.width(), rect.height()));
        }

        // --- Route ---------------------------------------------------------
        let Some(route) = self.sync_route(now) else {
            let mut action = None;
            egui::CentralPanel::default().show(ctx, |ui| {
                action = ui::pages::loading(ui, &self.auth);
            });
            if let Some(action) = action {
                self.on_page(action);
            }
            return;
        };

        // --- Header (only behind the auth gate) ----------------------------
        if !matches!(route, Route::Login | Route::Landing) {
            let mut header = None;
            egui::TopBottomPanel::top("header").show(ctx, |ui| {
                ui.add_space(4.0);
                header = ui::header::draw(
                    ui,
                    &self.auth,
                    Some(route),
                    self.settings.ui.theme,
                    &self.billing,
                    &self.changelog,
                );
                ui.add_space(4.0);
            });
            if let Some(action) = header {
                self.on_header(action);
            }
        }

        // --- Page ----------------------------------------------------------
        let frame = egui::Frame::central_panel(&ctx.style()).inner_margin(egui::Margin::same(16));
        let mut page = None;
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            page = self.draw_page(ui, route);
        });
        if let Some(action) = page {
            self.on_page(action);
        }

        // --- Overlays ------------------------------------------------------
        if ui::overlays::changelog(ctx, &self.changelog) {
            self.changelog.close();
        }
        ui::overlays::toasts(ctx, &self.toasts);

        self.schedule_repaint(ctx, now);
    }

    /// Persist theme and window size.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("podly console closing");
        if let Err(e) = self.settings.save() {
            log::warn!("failed to save settings: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

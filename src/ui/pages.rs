//! Pages outside the config flow.  Each returns the user's intent instead
//! of sending commands itself; [`crate::app::ConsoleApp`] acts on it.

use eframe::egui;

use super::widgets::{self, big_number, card, status_pill, MUTED};
use crate::shell::{AuthState, Theme};
use crate::views::{
    format_count, headline_cards, models_by_calls, success_rate_label, BillingView, LoginForm,
    StatsView,
};

/// Something a page asks the app to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageAction {
    Navigate(&'static str),
    RefreshStats,
    Login,
    RetrySession,
    ToggleTheme,
}

// ---------------------------------------------------------------------------
// Auth screens
// ---------------------------------------------------------------------------

/// Spinner while the first session fetch is out, with retry on failure.
pub fn loading(ui: &mut egui::Ui, auth: &AuthState) -> Option<PageAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.35);
        match &auth.load_error {
            Some(err) => {
                ui.label(egui::RichText::new(err).color(widgets::ERROR));
                if ui.button("Retry").clicked() {
                    action = Some(PageAction::RetrySession);
                }
            }
            None => {
                ui.spinner();
                ui.label(egui::RichText::new("Loading authentication…").color(MUTED));
            }
        }
    });
    action
}

pub fn login(ui: &mut egui::Ui, form: &mut LoginForm, theme: Theme) -> Option<PageAction> {
    let mut action = None;
    ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
        if ui
            .button(theme.toggle_icon())
            .on_hover_text(theme.toggle_hint())
            .clicked()
        {
            action = Some(PageAction::ToggleTheme);
        }
    });
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.2);
        ui.set_max_width(360.0);
        card(ui, "Podly", |ui| {
            ui.heading("Sign in to Podly");
            ui.add_space(8.0);
            if let Some(err) = form.error() {
                widgets::error_banner(ui, err);
                ui.add_space(6.0);
            }
            let submitting = form.is_submitting();
            ui.label("Username");
            ui.add_enabled(
                !submitting,
                egui::TextEdit::singleline(&mut form.username).desired_width(f32::INFINITY),
            );
            ui.label("Password");
            let pw = ui.add_enabled(
                !submitting,
                egui::TextEdit::singleline(&mut form.password)
                    .password(true)
                    .desired_width(f32::INFINITY),
            );
            let enter = pw.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if submitting { "Signing in…" } else { "Sign in" };
                if ui
                    .add_enabled(form.can_submit(), egui::Button::new(label))
                    .clicked()
                    || (enter && form.can_submit())
                {
                    action = Some(PageAction::Login);
                }
                if submitting {
                    ui.spinner();
                }
            });
        });
    });
    action
}

pub fn landing(ui: &mut egui::Ui) -> Option<PageAction> {
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.25);
        ui.heading(egui::RichText::new("Podly").size(32.0));
        ui.label("Ad-free podcasts, delivered to your favourite player.");
        ui.add_space(16.0);
        if ui.button("Sign in").clicked() {
            action = Some(PageAction::Navigate("/login"));
        }
    });
    action
}

// ---------------------------------------------------------------------------
// Dashboards
// ---------------------------------------------------------------------------

fn stats_header(ui: &mut egui::Ui, title: &str, subtitle: &str, stats: &StatsView) -> bool {
    let mut refresh = false;
    ui.horizontal(|ui| {
        ui.vertical(|ui| {
            ui.heading(title);
            ui.label(egui::RichText::new(subtitle).color(MUTED).size(12.0));
        });
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Refresh").clicked() {
                refresh = true;
            }
            if let Some(updated) = stats.updated_label() {
                ui.label(egui::RichText::new(updated).color(MUTED).size(11.0));
            }
        });
    });
    if let Some(err) = stats.error() {
        ui.add_space(6.0);
        widgets::error_banner(ui, err);
    }
    if stats.is_first_load() {
        ui.add_space(12.0);
        ui.spinner();
    }
    refresh
}

fn headline(ui: &mut egui::Ui, stats: &StatsView) {
    let Some(data) = stats.data() else { return };
    let cards = headline_cards(data);
    ui.columns(cards.len(), |cols| {
        for (col, c) in cols.iter_mut().zip(cards.iter()) {
            card(col, c.title, |ui| {
                ui.set_width(ui.available_width());
                big_number(ui, &c.value, c.label, c.sub.as_deref());
            });
        }
    });
}

fn jobs_card(ui: &mut egui::Ui, stats: &StatsView) {
    let Some(data) = stats.data() else { return };
    let jobs = &data.processing_jobs;
    card(ui, "Processing Jobs", |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            big_number(ui, &format_count(jobs.total), "total jobs", None);
            ui.add_space(24.0);
            if let Some(rate) = success_rate_label(jobs) {
                big_number(ui, &rate, "success rate", None);
            }
        });
        ui.horizontal_wrapped(|ui| {
            for (status, count) in &jobs.by_status {
                status_pill(ui, status, &format_count(*count));
            }
        });
    });
}

pub fn home(ui: &mut egui::Ui, stats: &StatsView) -> Option<PageAction> {
    let refresh = stats_header(ui, "Podly", "Overview of this instance", stats);
    ui.add_space(8.0);
    headline(ui, stats);
    refresh.then_some(PageAction::RefreshStats)
}

pub fn jobs(ui: &mut egui::Ui, stats: &StatsView) -> Option<PageAction> {
    let refresh = stats_header(ui, "Jobs", "Processing jobs by status", stats);
    ui.add_space(8.0);
    jobs_card(ui, stats);
    refresh.then_some(PageAction::RefreshStats)
}

pub fn stats(ui: &mut egui::Ui, stats: &StatsView) -> Option<PageAction> {
    let refresh = stats_header(ui, "Stats", "Aggregate activity for this Podly instance", stats);
    ui.add_space(8.0);
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            headline(ui, stats);
            let Some(data) = stats.data() else { return };
            ui.add_space(8.0);
            let calls = &data.model_calls;
            card(ui, "LLM Model Calls", |ui| {
                ui.set_width(ui.available_width());
                big_number(ui, &format_count(calls.total), "total calls", None);
                let rows = models_by_calls(calls);
                if !rows.is_empty() {
                    ui.add_space(6.0);
                    ui.label(egui::RichText::new("BY MODEL").color(MUTED).size(11.0));
                    egui::Grid::new("calls_by_model")
                        .num_columns(2)
                        .striped(true)
                        .show(ui, |ui| {
                            for (model, count) in rows {
                                ui.label(egui::RichText::new(model).monospace().size(11.0));
                                ui.label(format_count(count));
                                ui.end_row();
                            }
                        });
                }
                ui.horizontal_wrapped(|ui| {
                    for (status, count) in &calls.by_status {
                        status_pill(ui, status, &format_count(*count));
                    }
                });
            });
            ui.add_space(8.0);
            jobs_card(ui, stats);
        });
    refresh.then_some(PageAction::RefreshStats)
}

pub fn billing(ui: &mut egui::Ui, billing: &BillingView) {
    ui.heading("Billing");
    ui.add_space(8.0);
    if let Some(err) = billing.error() {
        widgets::error_banner(ui, err);
    }
    match billing.summary() {
        Some(summary) => {
            card(ui, "Your plan", |ui| {
                ui.set_width(ui.available_width());
                big_number(
                    ui,
                    &format!("{}/{}", summary.feeds_in_use, summary.feed_allowance),
                    "feeds in use",
                    billing
                        .remaining()
                        .map(|n| format!("{n} remaining"))
                        .as_deref(),
                );
            });
        }
        None if billing.error().is_none() => {
            ui.spinner();
        }
        None => {}
    }
}

//! Shared egui building blocks: colours, cards, section frames, field rows.

use eframe::egui;
use serde_json::Value;

use crate::store::{EnvOverrideEntry, ProbeStatus};
use crate::tabs::{ConfigSession, FieldKind, FieldSpec};

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(79, 70, 229);
pub const OK: egui::Color32 = egui::Color32::from_rgb(34, 160, 90);
pub const ERROR: egui::Color32 = egui::Color32::from_rgb(220, 60, 60);
pub const WARN: egui::Color32 = egui::Color32::from_rgb(217, 140, 20);
pub const MUTED: egui::Color32 = egui::Color32::from_rgb(130, 130, 130);

/// Card background for the active theme.
pub fn surface(ui: &egui::Ui) -> egui::Color32 {
    if ui.visuals().dark_mode {
        egui::Color32::from_rgb(31, 41, 55)
    } else {
        egui::Color32::WHITE
    }
}

pub fn border(ui: &egui::Ui) -> egui::Color32 {
    if ui.visuals().dark_mode {
        egui::Color32::from_rgb(55, 65, 81)
    } else {
        egui::Color32::from_rgb(229, 231, 235)
    }
}

pub fn probe_color(status: ProbeStatus) -> egui::Color32 {
    match status {
        ProbeStatus::Loading => MUTED,
        ProbeStatus::Ok => OK,
        ProbeStatus::Error => ERROR,
    }
}

/// Colour of a job/call status pill.
pub fn status_color(status: &str) -> egui::Color32 {
    match status {
        "completed" => OK,
        "running" => egui::Color32::from_rgb(59, 130, 246),
        "pending" => WARN,
        "failed" => ERROR,
        "skipped" => egui::Color32::from_rgb(147, 51, 234),
        _ => MUTED,
    }
}

// ---------------------------------------------------------------------------
// Frames
// ---------------------------------------------------------------------------

/// Bordered card with a small uppercase title.
pub fn card<R>(
    ui: &mut egui::Ui,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::new()
        .fill(surface(ui))
        .stroke(egui::Stroke::new(1.0, border(ui)))
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(title.to_uppercase())
                    .color(MUTED)
                    .size(11.0)
                    .strong(),
            );
            ui.add_space(6.0);
            add_contents(ui)
        })
        .inner
}

/// Config section frame with a heading.
pub fn section<R>(
    ui: &mut egui::Ui,
    title: &str,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::new()
        .fill(surface(ui))
        .stroke(egui::Stroke::new(1.0, border(ui)))
        .corner_radius(egui::CornerRadius::same(4))
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(title).strong().size(14.0));
            ui.add_space(8.0);
            add_contents(ui)
        })
        .inner
}

/// Large number with a caption and an optional sub line.
pub fn big_number(ui: &mut egui::Ui, value: &str, label: &str, sub: Option<&str>) {
    ui.vertical(|ui| {
        ui.label(egui::RichText::new(value).size(22.0).strong());
        ui.label(egui::RichText::new(label).color(MUTED).size(12.0));
        if let Some(sub) = sub {
            ui.label(egui::RichText::new(sub).color(MUTED).size(11.0));
        }
    });
}

pub fn status_pill(ui: &mut egui::Ui, status: &str, count: &str) {
    ui.horizontal(|ui| {
        egui::Frame::new()
            .fill(status_color(status).gamma_multiply(0.2))
            .corner_radius(egui::CornerRadius::same(4))
            .inner_margin(egui::Margin::symmetric(6, 2))
            .show(ui, |ui| {
                ui.label(
                    egui::RichText::new(status)
                        .color(status_color(status))
                        .size(11.0),
                );
            });
        ui.label(egui::RichText::new(count).size(11.0));
    });
}

pub fn error_banner(ui: &mut egui::Ui, text: &str) {
    egui::Frame::new()
        .fill(ERROR.gamma_multiply(0.12))
        .stroke(egui::Stroke::new(1.0, ERROR.gamma_multiply(0.5)))
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(12, 8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(text).color(ERROR));
        });
}

/// `"Managed by VAR (preview)"` under a field label.
pub fn env_hint_label(entry: &EnvOverrideEntry) -> String {
    let var = if entry.env_var.is_empty() {
        "deployment environment"
    } else {
        entry.env_var.as_str()
    };
    match entry.display_value() {
        Some(value) => format!("Managed by {var} ({value})"),
        None => format!("Managed by {var}"),
    }
}

// ---------------------------------------------------------------------------
// Field rows
// ---------------------------------------------------------------------------

/// One labelled config field bound to the session draft.
pub fn field_row(ui: &mut egui::Ui, session: &mut ConfigSession, spec: &FieldSpec) {
    ui.horizontal_top(|ui| {
        ui.vertical(|ui| {
            ui.set_width(240.0);
            ui.label(egui::RichText::new(spec.label).strong());
            if let Some(hint) = spec.hint {
                ui.label(egui::RichText::new(hint).color(MUTED).size(11.0));
            }
            if let Some(entry) = session.env_hint(spec) {
                ui.label(
                    egui::RichText::new(env_hint_label(entry))
                        .color(WARN)
                        .size(11.0),
                );
            }
        });
        field_input(ui, session, spec);
    });
    ui.add_space(6.0);
}

fn field_input(ui: &mut egui::Ui, session: &mut ConfigSession, spec: &FieldSpec) {
    let width = ui.available_width().min(420.0);
    match spec.kind {
        FieldKind::Text { placeholder } => {
            let mut text = spec.display_text(session.store.draft());
            let edit = egui::TextEdit::singleline(&mut text)
                .hint_text(placeholder)
                .desired_width(width);
            if ui.add(edit).changed() {
                session.set_field(spec.path, Value::from(text));
            }
        }
        FieldKind::Secret => {
            let placeholder = session.secret_placeholder(spec);
            let mut text = session
                .store
                .draft()
                .get_str(spec.path)
                .unwrap_or_default()
                .to_string();
            let edit = egui::TextEdit::singleline(&mut text)
                .password(true)
                .hint_text(placeholder)
                .desired_width(width);
            if ui.add(edit).changed() {
                session.set_field(spec.path, Value::from(text));
            }
        }
        FieldKind::Number(_) => {
            let mut text = session.number_text(spec);
            let valid = session.number_is_valid(spec);
            let mut edit = egui::TextEdit::singleline(&mut text).desired_width(width.min(160.0));
            if !valid {
                edit = edit.text_color(ERROR);
            }
            let response = ui.add(edit);
            if response.changed() {
                session.set_number_text(spec, text);
            }
            if !valid {
                response.on_hover_text("Enter a number");
            }
        }
        FieldKind::Toggle => {
            let mut on = spec.bool_in(session.store.draft());
            if ui.checkbox(&mut on, "").changed() {
                session.set_field(spec.path, Value::Bool(on));
            }
        }
    }
}

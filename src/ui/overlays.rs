//! Floating layers: toasts and the changelog window.

use eframe::egui;

use super::widgets::{self, MUTED};
use crate::shell::{ToastKind, Toasts};
use crate::views::ChangelogView;

pub fn toasts(ctx: &egui::Context, toasts: &Toasts) {
    if toasts.is_empty() {
        return;
    }
    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::CENTER_TOP, [0.0, 56.0])
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            for toast in toasts.iter() {
                let color = match toast.kind {
                    ToastKind::Info => MUTED,
                    ToastKind::Success => widgets::OK,
                    ToastKind::Error => widgets::ERROR,
                };
                egui::Frame::new()
                    .fill(widgets::surface(ui))
                    .stroke(egui::Stroke::new(1.0, color))
                    .corner_radius(egui::CornerRadius::same(6))
                    .inner_margin(egui::Margin::symmetric(12, 6))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&toast.text).color(color));
                    });
                ui.add_space(4.0);
            }
        });
}

/// Returns `true` when the user closed the window.
pub fn changelog(ctx: &egui::Context, view: &ChangelogView) -> bool {
    if !view.is_open() {
        return false;
    }
    let mut open = true;
    let mut close = false;
    egui::Window::new("Changelog")
        .open(&mut open)
        .collapsible(false)
        .default_size([640.0, 480.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .max_height(ui.available_height() - 32.0)
                .show(ui, |ui| {
                    if view.is_loading() {
                        ui.label(egui::RichText::new("Loading changelog...").color(MUTED));
                    } else if let Some(err) = view.error() {
                        ui.label(egui::RichText::new(err).color(widgets::ERROR));
                    } else if let Some(text) = view.text() {
                        ui.label(egui::RichText::new(text).monospace().size(12.0));
                    }
                });
            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });
    close || !open
}

//! Top navigation bar.

use eframe::egui;

use super::widgets::{self, MUTED};
use crate::shell::{AuthState, Route, Theme};
use crate::views::{BillingView, ChangelogView};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderAction {
    Navigate(&'static str),
    OpenChangelog,
    ToggleTheme,
    Logout,
}

/// Navigation entries visible to `auth`, in display order.
pub fn nav_links(auth: &AuthState) -> Vec<(&'static str, Route)> {
    let mut links = vec![("Home", Route::Home)];
    if auth.show_billing_link() {
        links.push(("Billing", Route::Billing));
    }
    if auth.show_jobs_link() {
        links.push(("Jobs", Route::Jobs));
    }
    if auth.show_config_link() {
        links.push(("Stats", Route::Stats));
        links.push(("Config", Route::Config));
    }
    links
}

pub fn draw(
    ui: &mut egui::Ui,
    auth: &AuthState,
    current: Option<Route>,
    theme: Theme,
    billing: &BillingView,
    changelog: &ChangelogView,
) -> Option<HeaderAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        if ui
            .add(egui::Label::new(egui::RichText::new("Podly").strong().size(18.0)).sense(egui::Sense::click()))
            .clicked()
        {
            action = Some(HeaderAction::Navigate(Route::Home.path()));
        }
        if let Some(version) = changelog.version() {
            if ui
                .add(egui::Button::new(egui::RichText::new(version).color(MUTED).size(11.0)).frame(false))
                .on_hover_text("View changelog")
                .clicked()
            {
                action = Some(HeaderAction::OpenChangelog);
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if auth.show_session_controls() {
                if ui.button("Logout").clicked() {
                    action = Some(HeaderAction::Logout);
                }
                if let Some(user) = auth.user() {
                    ui.label(egui::RichText::new(&user.username).color(MUTED));
                }
                if !auth.is_admin() {
                    if let Some(badge) = billing.badge() {
                        if ui.small_button("Change plan").clicked() {
                            action = Some(HeaderAction::Navigate(Route::Billing.path()));
                        }
                        ui.label(egui::RichText::new(badge).color(widgets::ACCENT).size(12.0))
                            .on_hover_text("Feeds included in your plan");
                    }
                }
            }
            if ui
                .button(theme.toggle_icon())
                .on_hover_text(theme.toggle_hint())
                .clicked()
            {
                action = Some(HeaderAction::ToggleTheme);
            }
            ui.separator();
            for (label, route) in nav_links(auth).into_iter().rev() {
                if ui.selectable_label(current == Some(route), label).clicked() {
                    action = Some(HeaderAction::Navigate(route.path()));
                }
            }
        });
    });
    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthStatus, SessionInfo, User};

    fn auth(require_auth: bool, role: &str) -> AuthState {
        let mut a = AuthState::new();
        a.apply_session(SessionInfo {
            status: AuthStatus {
                require_auth,
                landing_page_enabled: false,
            },
            user: Some(User {
                id: None,
                username: "sam".into(),
                role: role.into(),
            }),
        });
        a
    }

    fn labels(a: &AuthState) -> Vec<&'static str> {
        nav_links(a).into_iter().map(|(l, _)| l).collect()
    }

    #[test]
    fn admin_sees_everything_but_billing() {
        assert_eq!(labels(&auth(true, "admin")), vec!["Home", "Jobs", "Stats", "Config"]);
        assert_eq!(labels(&auth(false, "user")), vec!["Home", "Jobs", "Stats", "Config"]);
    }

    #[test]
    fn regular_user_sees_billing_only() {
        assert_eq!(labels(&auth(true, "user")), vec!["Home", "Billing"]);
    }
}

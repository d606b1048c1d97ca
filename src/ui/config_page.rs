//! The Config page: provider cards, tab bar, per-tab sections and the
//! env-override confirmation dialog.

use eframe::egui;

use super::widgets::{self, field_row, section, MUTED, WARN};
use crate::shell::{History, Toasts};
use crate::store::{ProbeStatus, Provider};
use crate::tabs::fields::{
    APP_FIELDS, BACKUP_FIELDS, LLM_API_KEY, LLM_BASE_URL, LLM_FIELDS, LLM_MODEL,
    LLM_MODEL_ALIASES, OUTPUT_FIELDS, PROCESSING_FIELDS, WHISPER_API_KEY, WHISPER_FIELDS,
};
use crate::tabs::{label_for_path, ConfigSession, ConfigTab, FieldSpec, ROLES};

pub fn draw(ui: &mut egui::Ui, session: &mut ConfigSession, history: &mut History, toasts: &mut Toasts) {
    draw_toolbar(ui, session, toasts);
    ui.add_space(8.0);

    if !session.store.is_loaded() {
        if let Some(err) = session.load_error().map(str::to_string) {
            widgets::error_banner(ui, &err);
            if ui.button("Retry").clicked() {
                session.mount();
            }
        } else {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading configuration…");
            });
        }
        return;
    }

    draw_status_cards(ui, session);
    ui.add_space(8.0);

    let active = session.tabs.active_tab(history);
    ui.horizontal_wrapped(|ui| {
        for tab in session.tabs.visible_tabs() {
            if ui.selectable_label(tab == active, tab.label()).clicked() && tab != active {
                session.tabs.set_active_tab(history, tab);
            }
        }
    });
    ui.separator();
    session.ensure_tab_data(active);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| match active {
            ConfigTab::Whisper => draw_whisper(ui, session),
            ConfigTab::Llm => draw_llm(ui, session),
            ConfigTab::Output => draw_output(ui, session),
            ConfigTab::App => draw_app(ui, session),
            ConfigTab::Prompts => draw_prompts(ui, session),
            ConfigTab::Users => draw_users(ui, session, toasts),
        });

    draw_env_warning(ui.ctx(), session, toasts);
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_toolbar(ui: &mut egui::Ui, session: &mut ConfigSession, toasts: &mut Toasts) {
    ui.horizontal(|ui| {
        ui.heading("Configuration");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let saving = session.store.is_saving();
            let label = if saving { "Saving..." } else { "Save" };
            let save = egui::Button::new(egui::RichText::new(label).color(egui::Color32::WHITE))
                .fill(widgets::ACCENT);
            if ui.add_enabled(!saving && session.store.is_loaded(), save).clicked() {
                session.handle_save(toasts);
            }
            if session.store.has_changes() {
                if ui.add_enabled(!saving, egui::Button::new("Discard")).clicked() {
                    session.discard_changes();
                }
                ui.label(egui::RichText::new("Unsaved changes").color(WARN).size(12.0));
            }
        });
    });
}

fn draw_status_cards(ui: &mut egui::Ui, session: &mut ConfigSession) {
    let mut retry = false;
    ui.columns(Provider::ALL.len(), |cols| {
        for (col, provider) in cols.iter_mut().zip(Provider::ALL) {
            let status = session.probe.status(provider);
            let color = widgets::probe_color(status.status);
            egui::Frame::new()
                .fill(widgets::surface(col))
                .stroke(egui::Stroke::new(1.0, color))
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::symmetric(12, 8))
                .show(col, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        match status.status {
                            ProbeStatus::Loading => {
                                ui.spinner();
                            }
                            ProbeStatus::Ok => {
                                ui.label(egui::RichText::new("✔").color(color));
                            }
                            ProbeStatus::Error => {
                                ui.label(egui::RichText::new("✖").color(color));
                            }
                        }
                        ui.label(egui::RichText::new(provider.title()).strong());
                        ui.label(egui::RichText::new(provider.subtitle()).color(MUTED).size(11.0));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("Retry").clicked() {
                                retry = true;
                            }
                        });
                    });
                    ui.label(
                        egui::RichText::new(status.display_message(provider))
                            .color(color)
                            .size(12.0),
                    );
                });
        }
    });
    if retry {
        session.probe_connections();
    }
}

fn fields(ui: &mut egui::Ui, session: &mut ConfigSession, specs: &[FieldSpec]) {
    for spec in specs {
        field_row(ui, session, spec);
    }
}

fn test_button(ui: &mut egui::Ui, session: &mut ConfigSession, provider: Provider) {
    let busy = session.probe.status(provider).status == ProbeStatus::Loading;
    let label = format!("Test {}", provider.title());
    if ui.add_enabled(!busy, egui::Button::new(label)).clicked() {
        session.test_provider(provider);
    }
}

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

fn draw_whisper(ui: &mut egui::Ui, session: &mut ConfigSession) {
    section(ui, "Whisper", |ui| {
        field_row(ui, session, &WHISPER_API_KEY);
        fields(ui, session, WHISPER_FIELDS);
        test_button(ui, session, Provider::Whisper);
    });
}

fn draw_llm(ui: &mut egui::Ui, session: &mut ConfigSession) {
    section(ui, "LLM", |ui| {
        field_row(ui, session, &LLM_API_KEY);
        field_row(ui, session, &LLM_BASE_URL);
        field_row(ui, session, &LLM_MODEL);
        ui.horizontal_wrapped(|ui| {
            ui.label(egui::RichText::new("Suggestions:").color(MUTED).size(11.0));
            for alias in LLM_MODEL_ALIASES {
                if ui.small_button(*alias).clicked() {
                    session.select_model(alias);
                }
            }
        });
        ui.add_space(6.0);
        fields(ui, session, LLM_FIELDS);
        test_button(ui, session, Provider::Llm);
    });
    ui.add_space(8.0);
    draw_copilot(ui, session);
}

fn draw_copilot(ui: &mut egui::Ui, session: &mut ConfigSession) {
    section(ui, "GitHub Copilot", |ui| {
        ui.label(
            egui::RichText::new("Use a GitHub personal access token to list the models available to your Copilot plan.")
                .color(MUTED)
                .size(11.0),
        );
        let mut pat = session.copilot.pat.clone();
        ui.horizontal(|ui| {
            let edit = egui::TextEdit::singleline(&mut pat)
                .password(true)
                .hint_text("ghp_…")
                .desired_width(320.0);
            if ui.add(edit).changed() {
                session.set_github_pat(pat);
            }
            if ui
                .add_enabled(session.copilot.can_fetch(), egui::Button::new("Fetch models"))
                .clicked()
            {
                session.fetch_copilot_models();
            }
            if session.copilot.is_loading() {
                ui.spinner();
            }
        });

        if session.copilot.models.is_empty() {
            return;
        }
        let current = session.store.draft().get_str(LLM_MODEL.path).map(str::to_string);
        let mut picked: Option<String> = None;
        egui::Grid::new("copilot_models")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                for model in &session.copilot.models {
                    let selected = current.as_deref() == Some(model.id.as_str());
                    if ui.selectable_label(selected, model.display_name()).clicked() {
                        picked = Some(model.id.clone());
                    }
                    ui.label(egui::RichText::new(&model.id).monospace().size(11.0));
                    let cost = if model.is_premium() {
                        "included".to_string()
                    } else {
                        model.cost_label()
                    };
                    ui.label(egui::RichText::new(cost).color(MUTED).size(11.0));
                    ui.end_row();
                }
            });
        if let Some(id) = picked {
            session.select_model(&id);
        }
    });
}

fn draw_output(ui: &mut egui::Ui, session: &mut ConfigSession) {
    section(ui, "Processing", |ui| fields(ui, session, PROCESSING_FIELDS));
    ui.add_space(8.0);
    section(ui, "Output", |ui| fields(ui, session, OUTPUT_FIELDS));
}

fn draw_app(ui: &mut egui::Ui, session: &mut ConfigSession) {
    section(ui, "App", |ui| fields(ui, session, APP_FIELDS));
    ui.add_space(8.0);
    section(ui, "Database Backups", |ui| {
        fields(ui, session, BACKUP_FIELDS);
        ui.separator();
        if session.backup.is_loading() && session.backup.status.is_none() {
            ui.spinner();
        }
        if let Some(status) = &session.backup.status {
            egui::Grid::new("backup_status").num_columns(2).show(ui, |ui| {
                ui.label("Directory");
                ui.label(egui::RichText::new(&status.backup_dir).monospace());
                ui.end_row();
                ui.label("Backups on disk");
                ui.label(status.backup_count.to_string());
                ui.end_row();
                ui.label("Last success");
                ui.label(session.backup.last_success_label());
                ui.end_row();
            });
        }
        ui.horizontal(|ui| {
            let running = session.backup.is_running();
            let label = if running { "Backing up…" } else { "Run backup now" };
            if ui.add_enabled(!running, egui::Button::new(label)).clicked() {
                session.run_backup();
            }
            if running {
                ui.spinner();
            }
        });
    });
}

fn draw_prompts(ui: &mut egui::Ui, session: &mut ConfigSession) {
    if !session.prompts.is_loaded() {
        ui.label(egui::RichText::new("Loading prompts...").color(MUTED));
        return;
    }
    section(ui, "LLM Prompts", |ui| {
        ui.label(egui::RichText::new("System Prompt").strong());
        ui.label(
            egui::RichText::new(
                "Defines the LLM's role and instructions for identifying ads in podcast transcripts.",
            )
            .color(MUTED)
            .size(11.0),
        );
        ui.add(
            egui::TextEdit::multiline(&mut session.prompts.edited.system_prompt)
                .code_editor()
                .desired_rows(15)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);
        ui.label(egui::RichText::new("User Prompt Template").strong());
        ui.label(
            egui::RichText::new(
                "Jinja2 template rendered for each transcript chunk. Variables: podcast_title, podcast_topic, transcript.",
            )
            .color(MUTED)
            .size(11.0),
        );
        ui.add(
            egui::TextEdit::multiline(&mut session.prompts.edited.user_prompt_template)
                .code_editor()
                .desired_rows(8)
                .desired_width(f32::INFINITY),
        );
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let saving = session.prompts.is_saving();
            let changed = session.prompts.has_changes();
            let label = if saving { "Saving..." } else { "Save Prompts" };
            if ui.add_enabled(changed && !saving, egui::Button::new(label)).clicked() {
                session.save_prompts();
            }
            if ui.add_enabled(changed, egui::Button::new("Reset")).clicked() {
                session.prompts.reset();
            }
        });
        ui.add_space(6.0);
        ui.label(
            egui::RichText::new(
                "Warning: changing these prompts affects how ads are identified. \
                 Changes apply to new processing jobs immediately.",
            )
            .color(WARN)
            .size(12.0),
        );
    });
}

fn draw_users(ui: &mut egui::Ui, session: &mut ConfigSession, toasts: &mut Toasts) {
    section(ui, "Users", |ui| {
        if session.users.is_loading() && session.users.users.is_empty() {
            ui.spinner();
        }
        let busy = session.users.is_busy();
        let mut delete: Option<String> = None;
        egui::Grid::new("users").num_columns(3).striped(true).show(ui, |ui| {
            for user in &session.users.users {
                ui.label(&user.username);
                ui.label(egui::RichText::new(&user.role).color(MUTED));
                if ui.add_enabled(!busy, egui::Button::new("Delete")).clicked() {
                    delete = Some(user.username.clone());
                }
                ui.end_row();
            }
        });
        if delete.is_some() {
            session.users.confirm_delete = delete;
        }
    });
    ui.add_space(8.0);
    section(ui, "Add user", |ui| {
        let form = &mut session.users.form;
        egui::Grid::new("new_user").num_columns(2).show(ui, |ui| {
            ui.label("Username");
            ui.text_edit_singleline(&mut form.username);
            ui.end_row();
            ui.label("Password");
            ui.add(egui::TextEdit::singleline(&mut form.password).password(true));
            ui.end_row();
            ui.label("Role");
            egui::ComboBox::from_id_salt("new_user_role")
                .selected_text(form.role.clone())
                .show_ui(ui, |ui| {
                    for role in ROLES {
                        ui.selectable_value(&mut form.role, role.to_string(), role);
                    }
                });
            ui.end_row();
        });
        let busy = session.users.is_busy();
        if ui.add_enabled(!busy, egui::Button::new("Create user")).clicked() {
            session.create_user(toasts);
        }
    });

    let Some(username) = session.users.confirm_delete.clone() else {
        return;
    };
    let mut decision: Option<bool> = None;
    egui::Window::new("Delete user")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ui.ctx(), |ui| {
            ui.label(format!("Delete user {username}? This cannot be undone."));
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    decision = Some(false);
                }
                if ui.button(egui::RichText::new("Delete").color(widgets::ERROR)).clicked() {
                    decision = Some(true);
                }
            });
        });
    match decision {
        Some(true) => session.confirm_delete_user(),
        Some(false) => session.users.confirm_delete = None,
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Env warning
// ---------------------------------------------------------------------------

fn draw_env_warning(ctx: &egui::Context, session: &mut ConfigSession, toasts: &mut Toasts) {
    let Some(paths) = session.store.env_warning_paths().map(<[String]>::to_vec) else {
        return;
    };
    let mut confirm = None;
    egui::Window::new("Environment-managed settings")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_max_width(460.0);
            ui.label(
                "These fields are controlled by environment variables. Your change will be saved, \
                 but it is overwritten whenever the environment changes. Update the variables \
                 (or deployment secrets) to make it permanent.",
            );
            ui.add_space(6.0);
            for path in &paths {
                egui::Frame::new()
                    .fill(WARN.gamma_multiply(0.12))
                    .corner_radius(egui::CornerRadius::same(4))
                    .inner_margin(egui::Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(egui::RichText::new(label_for_path(path).unwrap_or(path.as_str())).strong());
                        let hint = match session.store.env().get_env_hint(path) {
                            Some(entry) => widgets::env_hint_label(entry),
                            None => "Managed by deployment environment".to_string(),
                        };
                        ui.label(egui::RichText::new(hint).size(11.0));
                    });
                ui.add_space(4.0);
            }
            ui.horizontal(|ui| {
                if ui.button("Go back").clicked() {
                    confirm = Some(false);
                }
                let save = egui::Button::new(egui::RichText::new("Save anyway").color(egui::Color32::WHITE))
                    .fill(widgets::ACCENT);
                if ui.add(save).clicked() {
                    confirm = Some(true);
                }
            });
        });
    match confirm {
        Some(true) => session.handle_confirm_env_warning(toasts),
        Some(false) => session.handle_dismiss_env_warning(),
        None => {}
    }
}

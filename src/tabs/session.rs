//! The config page as one unit of state.
//!
//! [`ConfigSession`] composes the pending-config store, the connection
//! probe, the tab controller and the per-tab editors, and is the only place
//! that turns user intents into [`ApiCommand`]s and [`ApiEvent`]s back into
//! state.  It is created when the Config page mounts and dropped when the
//! user navigates away, which discards unsaved edits.

use std::collections::{HashMap, HashSet};

use serde_json::{json, Value};

use super::backup::BackupPanel;
use super::controller::{ConfigTab, TabController};
use super::fields::{FieldKind, FieldSpec, GITHUB_PAT_PATHS, LLM_MODEL};
use super::prompts::PromptEditor;
use super::users::UserAdmin;
use crate::api::{ApiCommand, ApiError, ApiEvent, ApiHandle, CopilotModel};
use crate::shell::{AccessContext, History, Toasts};
use crate::store::{
    coerce_number, ConnectionProbe, EnvOverrideEntry, PendingConfigStore, Provider, SaveDecision,
};

// ---------------------------------------------------------------------------
// CopilotModels
// ---------------------------------------------------------------------------

/// GitHub token entry and the model list fetched with it.
#[derive(Debug, Clone, Default)]
pub struct CopilotModels {
    pub pat: String,
    pub models: Vec<CopilotModel>,
    loading: bool,
}

impl CopilotModels {
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn can_fetch(&self) -> bool {
        !self.loading && !self.pat.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ConfigSession
// ---------------------------------------------------------------------------

pub struct ConfigSession {
    api: ApiHandle,
    pub store: PendingConfigStore,
    pub probe: ConnectionProbe,
    pub tabs: TabController,
    pub prompts: PromptEditor,
    pub users: UserAdmin,
    pub backup: BackupPanel,
    pub copilot: CopilotModels,
    /// Raw text of numeric inputs being typed, keyed by dotted path.
    number_buffers: HashMap<String, String>,
    loading: bool,
    load_error: Option<String>,
    probe_after_load: bool,
    /// Providers whose next probe result is also announced as a toast.
    announce: HashSet<Provider>,
    users_requested: bool,
}

impl ConfigSession {
    /// Scope tag of this session's requests, if its handle has one.
    pub fn scope(&self) -> Option<u64> {
        self.api.scope()
    }

    pub fn new(api: ApiHandle, access: AccessContext) -> Self {
        Self {
            api,
            store: PendingConfigStore::new(),
            probe: ConnectionProbe::new(),
            tabs: TabController::new(access),
            prompts: PromptEditor::new(),
            users: UserAdmin::new(),
            backup: BackupPanel::default(),
            copilot: CopilotModels::default(),
            number_buffers: HashMap::new(),
            loading: false,
            load_error: None,
            probe_after_load: false,
            announce: HashSet::new(),
            users_requested: false,
        }
    }

    /// Fetch the configuration; both providers are probed once it arrives.
    pub fn mount(&mut self) {
        self.loading = true;
        self.load_error = None;
        self.probe_after_load = true;
        self.api.send(ApiCommand::LoadConfig);
    }

    pub fn is_loading(&self) -> bool {
        self.loading || !self.store.is_loaded()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Lazily fetch what `tab` shows beyond the config document.
    pub fn ensure_tab_data(&mut self, tab: ConfigTab) {
        match tab {
            ConfigTab::Prompts if !self.prompts.is_loaded() && !self.prompts.is_loading() => {
                self.prompts.begin_load();
                self.api.send(ApiCommand::LoadPrompts);
            }
            ConfigTab::App if self.backup.status.is_none() && !self.backup.is_loading() => {
                self.backup.begin_load();
                self.api.send(ApiCommand::LoadBackupStatus);
            }
            ConfigTab::Users if !self.users_requested => {
                self.users_requested = true;
                self.load_users();
            }
            _ => {}
        }
    }

    /// Adopt new access rights; moves off a tab that is no longer allowed.
    pub fn revalidate(&mut self, access: AccessContext, history: &mut History) -> bool {
        self.tabs.revalidate(access, history)
    }

    // -----------------------------------------------------------------------
    // Field editing
    // -----------------------------------------------------------------------

    pub fn set_field(&mut self, path: &[&str], value: Value) {
        self.store.set_field(path, value);
    }

    pub fn get_field(&self, path: &[&str]) -> Option<&Value> {
        self.store.get_field(path)
    }

    pub fn env_hint(&self, spec: &FieldSpec) -> Option<&EnvOverrideEntry> {
        self.store.env().get_env_hint(&spec.dotted())
    }

    /// Text shown in a numeric input: what the user typed, or the draft.
    pub fn number_text(&self, spec: &FieldSpec) -> String {
        self.number_buffers
            .get(&spec.dotted())
            .cloned()
            .unwrap_or_else(|| spec.display_text(self.store.draft()))
    }

    /// Take raw input for a numeric field.  The draft is only updated when
    /// the text parses; returns whether it did.
    pub fn set_number_text(&mut self, spec: &FieldSpec, text: String) -> bool {
        let FieldKind::Number(kind) = spec.kind else {
            return false;
        };
        let parsed = coerce_number(&text, kind);
        self.number_buffers.insert(spec.dotted(), text);
        match parsed {
            Some(value) => {
                self.store.set_field(spec.path, value);
                true
            }
            None => false,
        }
    }

    pub fn number_is_valid(&self, spec: &FieldSpec) -> bool {
        match (spec.kind, self.number_buffers.get(&spec.dotted())) {
            (FieldKind::Number(kind), Some(text)) => coerce_number(text, kind).is_some(),
            _ => true,
        }
    }

    /// Placeholder for a secret input: the server preview, else the env
    /// override's display value.
    pub fn secret_placeholder(&self, spec: &FieldSpec) -> String {
        let (section, key) = match spec.path {
            [section, key] => (*section, *key),
            _ => return String::new(),
        };
        let preview_key = format!("{key}{}", crate::store::PREVIEW_SUFFIX);
        if let Some(preview) = self
            .store
            .draft()
            .get_str(&[section, preview_key.as_str()])
            .filter(|p| !p.is_empty())
        {
            return preview.to_string();
        }
        self.env_hint(spec)
            .and_then(EnvOverrideEntry::display_value)
            .unwrap_or_default()
    }

    pub fn set_github_pat(&mut self, pat: String) {
        for path in GITHUB_PAT_PATHS {
            self.store.set_field(path, Value::from(pat.as_str()));
        }
        self.copilot.pat = pat;
    }

    pub fn fetch_copilot_models(&mut self) {
        if !self.copilot.can_fetch() {
            return;
        }
        self.copilot.loading = true;
        self.api.send(ApiCommand::FetchCopilotModels {
            github_pat: self.copilot.pat.clone(),
        });
    }

    pub fn select_model(&mut self, id: &str) {
        if !id.is_empty() {
            self.store.set_field(LLM_MODEL.path, Value::from(id));
        }
    }

    // -----------------------------------------------------------------------
    // Save flow
    // -----------------------------------------------------------------------

    pub fn handle_save(&mut self, toasts: &mut Toasts) {
        match self.store.handle_save() {
            SaveDecision::NoChanges => toasts.info("No changes to save"),
            SaveDecision::NeedsEnvConfirmation(_) | SaveDecision::Busy => {}
            SaveDecision::Send(payload) => self.send_save(payload, toasts),
        }
    }

    pub fn handle_confirm_env_warning(&mut self, toasts: &mut Toasts) {
        if let Some(payload) = self.store.handle_confirm_env_warning() {
            self.send_save(payload, toasts);
        }
    }

    pub fn handle_dismiss_env_warning(&mut self) {
        self.store.handle_dismiss_env_warning();
    }

    pub fn discard_changes(&mut self) {
        self.store.discard_changes();
        self.number_buffers.clear();
    }

    fn send_save(&mut self, payload: crate::store::ConfigDocument, toasts: &mut Toasts) {
        log::info!("config: saving {} section(s)", payload.as_map().len());
        if !self.api.send(ApiCommand::SaveConfig(payload)) {
            self.store.save_failed();
            toasts.error("Failed to save configuration");
        }
    }

    // -----------------------------------------------------------------------
    // Probes
    // -----------------------------------------------------------------------

    /// Re-test both providers with the draft settings.
    pub fn probe_connections(&mut self) {
        self.probe.start();
        for provider in Provider::ALL {
            self.send_probe(provider);
        }
    }

    /// The per-section *Test* button: probe one provider and announce the
    /// result.
    pub fn test_provider(&mut self, provider: Provider) {
        self.probe.begin(provider);
        self.announce.insert(provider);
        self.send_probe(provider);
    }

    fn send_probe(&mut self, provider: Provider) {
        let section = self
            .store
            .get_field(&[provider.section()])
            .cloned()
            .unwrap_or_else(|| json!({}));
        if !self.api.send(ApiCommand::Probe { provider, section }) {
            self.announce.remove(&provider);
            self.probe.resolve(
                provider,
                Err(ApiError::Transport("request could not be queued".into())),
            );
        }
    }

    // -----------------------------------------------------------------------
    // Prompts / users / backups
    // -----------------------------------------------------------------------

    pub fn save_prompts(&mut self) {
        if let Some(prompts) = self.prompts.begin_save() {
            self.api.send(ApiCommand::SavePrompts(prompts));
        }
    }

    pub fn load_users(&mut self) {
        self.users.begin_load();
        self.api.send(ApiCommand::LoadUsers);
    }

    pub fn create_user(&mut self, toasts: &mut Toasts) {
        match self.users.begin_create() {
            Ok(user) => {
                self.api.send(ApiCommand::CreateUser(user));
            }
            Err(msg) => toasts.error(msg),
        }
    }

    pub fn confirm_delete_user(&mut self) {
        if let Some(username) = self.users.begin_delete() {
            self.api.send(ApiCommand::DeleteUser { username });
        }
    }

    pub fn run_backup(&mut self) {
        if self.backup.begin_run() {
            self.api.send(ApiCommand::RunBackup);
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    /// Apply a worker event.  Returns `false` for events the config page
    /// does not own.
    pub fn apply(&mut self, event: ApiEvent, toasts: &mut Toasts) -> bool {
        match event {
            ApiEvent::ConfigLoaded(Ok(envelope)) => {
                self.loading = false;
                self.number_buffers.clear();
                self.store.load(envelope);
                self.copilot.pat = GITHUB_PAT_PATHS
                    .iter()
                    .filter_map(|p| self.store.draft().get_str(p))
                    .find(|s| !s.is_empty())
                    .unwrap_or_default()
                    .to_string();
                if std::mem::take(&mut self.probe_after_load) {
                    self.probe_connections();
                }
            }
            ApiEvent::ConfigLoaded(Err(e)) => {
                self.loading = false;
                let msg = e.user_message("Failed to load configuration");
                toasts.error(msg.clone());
                self.load_error = Some(msg);
            }
            ApiEvent::ConfigSaved(_) if !self.store.is_saving() => {
                log::debug!("config: save result with no save in flight; ignored");
            }
            ApiEvent::ConfigSaved(Ok(server)) => {
                self.store.save_succeeded(Some(&server));
                self.number_buffers.clear();
                toasts.success("Configuration saved");
            }
            ApiEvent::ConfigSaved(Err(e)) => {
                self.store.save_failed();
                toasts.error(e.user_message("Failed to save configuration"));
            }
            ApiEvent::ProbeFinished { provider, result } => {
                if self.announce.remove(&provider) {
                    match &result {
                        Ok(resp) if resp.ok => toasts.success(
                            resp.message
                                .clone()
                                .unwrap_or_else(|| format!("{} connection OK", provider.title())),
                        ),
                        Ok(resp) => toasts.error(
                            resp.error
                                .clone()
                                .unwrap_or_else(|| provider.failure_fallback().to_string()),
                        ),
                        Err(e) => toasts.error(e.user_message(provider.failure_fallback())),
                    }
                }
                self.probe.resolve(provider, result);
            }
            ApiEvent::CopilotModels(result) => {
                self.copilot.loading = false;
                match result {
                    Ok(resp) if resp.ok => {
                        self.copilot.models = resp.models;
                        toasts.success("Fetched models");
                    }
                    Ok(resp) => {
                        toasts.error(resp.error.unwrap_or_else(|| "Failed to fetch models".into()))
                    }
                    Err(e) => toasts.error(e.user_message("Failed to fetch models")),
                }
            }
            ApiEvent::PromptsLoaded(result) => {
                if let Some(msg) = self.prompts.loaded(result) {
                    toasts.error(msg);
                }
            }
            ApiEvent::PromptsSaved(result) => match self.prompts.saved(result) {
                Ok(msg) => toasts.success(msg),
                Err(msg) => toasts.error(msg),
            },
            ApiEvent::Users(result) => {
                if let Some(msg) = self.users.loaded(result) {
                    toasts.error(msg);
                }
            }
            ApiEvent::UserCreated { username, result } => {
                match self.users.created(&username, result) {
                    Ok(msg) => {
                        toasts.success(msg);
                        self.load_users();
                    }
                    Err(msg) => toasts.error(msg),
                }
            }
            ApiEvent::UserDeleted { username, result } => {
                match self.users.deleted(&username, result) {
                    Ok(msg) => toasts.success(msg),
                    Err(msg) => toasts.error(msg),
                }
            }
            ApiEvent::BackupStatus(result) => {
                if let Some(msg) = self.backup.loaded(result) {
                    toasts.error(msg);
                }
            }
            ApiEvent::BackupRun(result) => {
                match self.backup.finished(result) {
                    Ok(msg) => toasts.success(msg),
                    Err(msg) => toasts.error(msg),
                }
                self.backup.begin_load();
                self.api.send(ApiCommand::LoadBackupStatus);
            }
            _ => return false,
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::worker::tests::MockApi;
    use crate::api::{execute, ApiError, ApiRequest, ConfigEnvelope, ProbeResponse};
    use crate::shell::Location;
    use crate::store::{ConfigDocument, ProbeStatus, SaveStage};
    use tokio::sync::mpsc;

    fn session() -> (ConfigSession, mpsc::Receiver<ApiRequest>) {
        let (tx, rx) = mpsc::channel(32);
        (ConfigSession::new(ApiHandle::new(tx), AccessContext::OPEN), rx)
    }

    fn envelope() -> ConfigEnvelope {
        serde_json::from_value(json!({
            "config": {
                "llm": {"llm_model": "groq/openai/gpt-oss-120b", "llm_api_key_preview": "sk-a...wxyz"},
                "whisper": {"model": "whisper-1", "timeout_sec": 600},
                "output": {"fade_ms": 3000}
            },
            "env_overrides": {
                "whisper.timeout_sec": {"env_var": "WHISPER_REMOTE_TIMEOUT_SEC", "value": "900"},
                "whisper.api_key": {"env_var": "WHISPER_REMOTE_API_KEY", "is_secret": true, "value_preview": "sk-e...0000"}
            }
        }))
        .unwrap()
    }

    fn drain(rx: &mut mpsc::Receiver<ApiRequest>) -> Vec<ApiCommand> {
        let mut out = Vec::new();
        while let Ok(req) = rx.try_recv() {
            out.push(req.command);
        }
        out
    }

    /// Session with the config loaded and the mount-time probes drained.
    fn loaded() -> (ConfigSession, mpsc::Receiver<ApiRequest>, Toasts) {
        let (mut s, mut rx) = session();
        let mut toasts = Toasts::new();
        s.mount();
        assert!(s.apply(ApiEvent::ConfigLoaded(Ok(envelope())), &mut toasts));
        drain(&mut rx);
        (s, rx, toasts)
    }

    #[test]
    fn mount_loads_config_then_probes_both_providers() {
        let (mut s, mut rx) = session();
        let mut toasts = Toasts::new();
        s.mount();
        assert!(s.is_loading());
        assert!(matches!(drain(&mut rx).as_slice(), [ApiCommand::LoadConfig]));

        s.apply(ApiEvent::ConfigLoaded(Ok(envelope())), &mut toasts);
        assert!(!s.is_loading());
        let sent = drain(&mut rx);
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|c| matches!(c, ApiCommand::Probe { .. })));
        assert_eq!(s.probe.status(Provider::Llm).status, ProbeStatus::Loading);
    }

    #[test]
    fn set_field_reads_back_before_save() {
        let (mut s, mut rx, _) = loaded();
        s.set_field(&["output", "fade_ms"], json!(500));
        assert_eq!(s.get_field(&["output", "fade_ms"]), Some(&json!(500)));
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn save_without_changes_sends_nothing() {
        let (mut s, mut rx, mut toasts) = loaded();
        let baseline = s.store.baseline().clone();
        s.handle_save(&mut toasts);
        assert!(drain(&mut rx).is_empty());
        assert_eq!(s.store.baseline(), &baseline);
        assert_eq!(toasts.latest(), Some("No changes to save"));
    }

    #[test]
    fn env_managed_edit_waits_for_confirm() {
        let (mut s, mut rx, mut toasts) = loaded();
        s.set_field(&["whisper", "timeout_sec"], json!(30));
        s.handle_save(&mut toasts);
        assert!(drain(&mut rx).is_empty(), "nothing sent before confirmation");
        assert_eq!(
            s.store.env_warning_paths(),
            Some(&["whisper.timeout_sec".to_string()][..])
        );

        s.handle_confirm_env_warning(&mut toasts);
        match drain(&mut rx).as_slice() {
            [ApiCommand::SaveConfig(doc)] => {
                assert_eq!(doc, &ConfigDocument::from_value(json!({"whisper": {"timeout_sec": 30}})));
            }
            other => panic!("unexpected commands: {other:?}"),
        }
    }

    #[test]
    fn dismiss_sends_nothing_and_keeps_draft() {
        let (mut s, mut rx, mut toasts) = loaded();
        s.set_field(&["whisper", "timeout_sec"], json!(30));
        s.handle_save(&mut toasts);
        let draft = s.store.draft().clone();

        s.handle_dismiss_env_warning();
        assert!(drain(&mut rx).is_empty());
        assert_eq!(s.store.draft(), &draft);
        assert_eq!(s.store.stage(), &SaveStage::Idle);
    }

    #[tokio::test]
    async fn gpt_4o_round_trip_through_worker() {
        let api = MockApi::default();
        *api.config.lock().unwrap() =
            serde_json::from_value(json!({"config": {"llm": {}}})).unwrap();

        let (mut s, mut rx) = session();
        let mut toasts = Toasts::new();
        s.mount();
        for cmd in drain(&mut rx) {
            let event = execute(&api, cmd).await;
            s.apply(event, &mut toasts);
        }
        drain(&mut rx);

        s.set_field(&["llm", "llm_model"], json!("gpt-4o"));
        s.handle_save(&mut toasts);
        assert!(s.store.env_warning_paths().is_none());
        for cmd in drain(&mut rx) {
            let event = execute(&api, cmd).await;
            s.apply(event, &mut toasts);
        }

        assert_eq!(
            s.store.baseline(),
            &ConfigDocument::from_value(json!({"llm": {"llm_model": "gpt-4o"}}))
        );
        assert_eq!(api.saved.lock().unwrap().len(), 1);
        assert_eq!(toasts.latest(), Some("Configuration saved"));
    }

    #[test]
    fn failed_save_keeps_draft_and_reports() {
        let (mut s, mut rx, mut toasts) = loaded();
        s.set_field(&["output", "fade_ms"], json!(100));
        s.handle_save(&mut toasts);
        drain(&mut rx);
        s.apply(
            ApiEvent::ConfigSaved(Err(ApiError::from_status_body(400, r#"{"error":"Invalid fade"}"#))),
            &mut toasts,
        );
        assert_eq!(toasts.latest(), Some("Invalid fade"));
        assert!(s.store.has_changes());
        assert_eq!(s.store.stage(), &SaveStage::Idle);
    }

    #[test]
    fn probe_uses_draft_sections_and_settles() {
        let (mut s, mut rx, mut toasts) = loaded();
        s.probe.resolve(Provider::Llm, Ok(ProbeResponse { ok: true, ..Default::default() }));
        s.set_field(&["whisper", "model"], json!("whisper-large"));

        s.probe_connections();
        assert_eq!(s.probe.status(Provider::Llm).status, ProbeStatus::Loading);
        let sent = drain(&mut rx);
        let whisper_body = sent.iter().find_map(|c| match c {
            ApiCommand::Probe {
                provider: Provider::Whisper,
                section,
            } => Some(section.clone()),
            _ => None,
        });
        assert_eq!(whisper_body.unwrap()["model"], json!("whisper-large"));

        s.apply(
            ApiEvent::ProbeFinished {
                provider: Provider::Whisper,
                result: Err(ApiError::Transport("connection refused".into())),
            },
            &mut toasts,
        );
        s.apply(
            ApiEvent::ProbeFinished {
                provider: Provider::Llm,
                result: Ok(ProbeResponse { ok: true, ..Default::default() }),
            },
            &mut toasts,
        );
        assert_eq!(s.probe.status(Provider::Whisper).status, ProbeStatus::Error);
        assert_eq!(s.probe.status(Provider::Llm).status, ProbeStatus::Ok);
        assert!(toasts.is_empty(), "card probes are silent");
    }

    #[test]
    fn test_button_announces_result() {
        let (mut s, mut rx, mut toasts) = loaded();
        s.test_provider(Provider::Llm);
        assert_eq!(drain(&mut rx).len(), 1);
        s.apply(
            ApiEvent::ProbeFinished {
                provider: Provider::Llm,
                result: Ok(ProbeResponse { ok: true, ..Default::default() }),
            },
            &mut toasts,
        );
        assert_eq!(toasts.latest(), Some("LLM connection OK"));
    }

    #[test]
    fn invalid_number_leaves_draft_unchanged() {
        let (mut s, _rx, _) = loaded();
        let fade = &super::super::fields::OUTPUT_FIELDS[0];
        assert!(!s.set_number_text(fade, "12x".into()));
        assert_eq!(s.get_field(&["output", "fade_ms"]), Some(&json!(3000)));
        assert!(!s.number_is_valid(fade));
        assert_eq!(s.number_text(fade), "12x");

        assert!(s.set_number_text(fade, "250".into()));
        assert_eq!(s.get_field(&["output", "fade_ms"]), Some(&json!(250)));
    }

    #[test]
    fn secret_placeholder_prefers_preview_then_env() {
        let (s, _rx, _) = loaded();
        assert_eq!(s.secret_placeholder(&super::super::fields::LLM_API_KEY), "sk-a...wxyz");
        assert_eq!(s.secret_placeholder(&super::super::fields::WHISPER_API_KEY), "sk-e...0000");
    }

    #[test]
    fn github_pat_sets_both_keys() {
        let (mut s, mut rx, _) = loaded();
        s.set_github_pat("ghp_123".into());
        assert_eq!(s.store.draft().get_str(&["llm", "github_pat"]), Some("ghp_123"));
        assert_eq!(s.store.draft().get_str(&["llm", "llm_github_pat"]), Some("ghp_123"));
        s.fetch_copilot_models();
        assert!(s.copilot.is_loading());
        assert!(matches!(
            drain(&mut rx).as_slice(),
            [ApiCommand::FetchCopilotModels { github_pat }] if github_pat == "ghp_123"
        ));
        s.select_model("gpt-4.1");
        assert_eq!(s.store.draft().get_str(&["llm", "llm_model"]), Some("gpt-4.1"));
    }

    #[test]
    fn prompts_fetched_once_when_tab_shown() {
        let (mut s, mut rx, _) = loaded();
        s.ensure_tab_data(ConfigTab::Prompts);
        s.ensure_tab_data(ConfigTab::Prompts);
        assert!(matches!(drain(&mut rx).as_slice(), [ApiCommand::LoadPrompts]));
    }

    #[test]
    fn revalidate_moves_off_users_tab() {
        let (tx, _rx) = mpsc::channel(4);
        let admin = AccessContext {
            require_auth: true,
            is_admin: true,
        };
        let mut s = ConfigSession::new(ApiHandle::new(tx), admin);
        let mut h = History::new(Location::parse("/config?tab=users"));
        assert_eq!(s.tabs.active_tab(&h), ConfigTab::Users);

        let demoted = AccessContext {
            require_auth: true,
            is_admin: false,
        };
        assert!(s.revalidate(demoted, &mut h));
        assert_eq!(h.len(), 1);
        assert_eq!(s.tabs.active_tab(&h), ConfigTab::Whisper);
    }

    #[test]
    fn save_result_without_pending_save_keeps_edits() {
        let (mut s, _rx, mut toasts) = loaded();
        s.set_field(&["output", "fade_ms"], json!(5));
        assert!(s.apply(ApiEvent::ConfigSaved(Ok(ConfigDocument::new())), &mut toasts));
        assert!(s.store.has_changes());
        assert!(toasts.is_empty());
    }

    #[test]
    fn connection_test_that_cannot_be_queued_settles_error() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let mut s = ConfigSession::new(ApiHandle::new(tx), AccessContext::OPEN);
        s.test_provider(Provider::Llm);
        let status = s.probe.status(Provider::Llm);
        assert_eq!(status.status, ProbeStatus::Error);
        assert!(status.error.is_some());
    }

    #[test]
    fn unrelated_events_are_not_consumed() {
        let (mut s, _rx, mut toasts) = loaded();
        assert!(!s.apply(ApiEvent::LoggedOut(Ok(())), &mut toasts));
    }
}

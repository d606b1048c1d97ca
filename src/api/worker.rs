//! Async worker that executes API commands off the UI thread.
//!
//! # Flow
//!
//! ```text
//! UI thread                      tokio runtime
//! ─────────                      ─────────────
//! ApiHandle::send(cmd) ──mpsc──▶ run_worker()
//!                                  └─ spawn(execute(cmd))
//!                                        └─ ConsoleApi call
//! drain events each frame ◀─mpsc── ApiEvent + repaint()
//! ```
//!
//! One task per command: a slow probe never holds up a save.  Nothing is
//! cancelled; events arrive in completion order and the UI applies them as
//! they come.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use super::client::ConsoleApi;
use super::error::ApiError;
use super::types::{
    AuthStatus, BackupRunResult, BackupStatus, BillingSummary, ConfigEnvelope,
    CopilotModelsResponse, NewUser, ProbeResponse, Prompts, StatsResponse, User, VersionInfo,
};
use crate::store::{ConfigDocument, Provider};

/// Called after every event so the UI wakes up and drains it.
pub type RepaintNotifier = Arc<dyn Fn() + Send + Sync>;

/// Capacity of both command and event channels.
pub const CHANNEL_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// ApiCommand / ApiEvent
// ---------------------------------------------------------------------------

/// A request from the UI.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    LoadConfig,
    SaveConfig(ConfigDocument),
    /// Test one provider with its candidate section from the draft.
    Probe { provider: Provider, section: Value },
    FetchCopilotModels { github_pat: String },
    LoadPrompts,
    SavePrompts(Prompts),
    LoadBilling,
    LoadVersion,
    LoadStats,
    LoadBackupStatus,
    RunBackup,
    LoadChangelog,
    /// Auth mode plus the current session user.
    LoadSession,
    Login { username: String, password: String },
    Logout,
    LoadUsers,
    CreateUser(NewUser),
    DeleteUser { username: String },
}

/// Who is using the console, as far as the backend is concerned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionInfo {
    pub status: AuthStatus,
    /// `None` when auth is off or nobody is logged in.
    pub user: Option<User>,
}

/// A completed request, delivered back to the UI.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    ConfigLoaded(Result<ConfigEnvelope, ApiError>),
    ConfigSaved(Result<ConfigDocument, ApiError>),
    ProbeFinished {
        provider: Provider,
        result: Result<ProbeResponse, ApiError>,
    },
    CopilotModels(Result<CopilotModelsResponse, ApiError>),
    PromptsLoaded(Result<Prompts, ApiError>),
    PromptsSaved(Result<Prompts, ApiError>),
    Billing(Result<BillingSummary, ApiError>),
    Version(Result<VersionInfo, ApiError>),
    Stats(Result<StatsResponse, ApiError>),
    BackupStatus(Result<BackupStatus, ApiError>),
    BackupRun(Result<BackupRunResult, ApiError>),
    Changelog(Result<String, ApiError>),
    Session(Result<SessionInfo, ApiError>),
    LoggedIn(Result<User, ApiError>),
    LoggedOut(Result<(), ApiError>),
    Users(Result<Vec<User>, ApiError>),
    UserCreated {
        username: String,
        result: Result<(), ApiError>,
    },
    UserDeleted {
        username: String,
        result: Result<(), ApiError>,
    },
    /// Reply to a request sent through a scoped [`ApiHandle`].  The owner
    /// drops it when that scope no longer exists.
    Scoped { scope: u64, event: Box<ApiEvent> },
}

/// What travels over the command channel: the command and the scope of the
/// handle that sent it.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub scope: Option<u64>,
    pub command: ApiCommand,
}

// ---------------------------------------------------------------------------
// ApiHandle
// ---------------------------------------------------------------------------

/// UI-side sender for [`ApiCommand`]s.  Never blocks.
///
/// A scoped handle tags every request; its replies come back wrapped in
/// [`ApiEvent::Scoped`].
#[derive(Clone)]
pub struct ApiHandle {
    tx: mpsc::Sender<ApiRequest>,
    scope: Option<u64>,
}

impl ApiHandle {
    pub fn new(tx: mpsc::Sender<ApiRequest>) -> Self {
        Self { tx, scope: None }
    }

    /// A handle on the same channel whose replies carry `scope`.
    pub fn scoped(&self, scope: u64) -> Self {
        Self {
            tx: self.tx.clone(),
            scope: Some(scope),
        }
    }

    pub fn scope(&self) -> Option<u64> {
        self.scope
    }

    /// Queue `command`.  Returns `false` if the worker is gone or the queue
    /// is full; the command is dropped in that case.
    pub fn send(&self, command: ApiCommand) -> bool {
        let request = ApiRequest {
            scope: self.scope,
            command,
        };
        match self.tx.try_send(request) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("api: command dropped: {e}");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Worker loop
// ---------------------------------------------------------------------------

/// Run until `commands` is closed.  Spawn this on the tokio runtime from
/// `main()`.
pub async fn run_worker(
    api: Arc<dyn ConsoleApi>,
    mut requests: mpsc::Receiver<ApiRequest>,
    events: mpsc::Sender<ApiEvent>,
    repaint: RepaintNotifier,
) {
    while let Some(ApiRequest { scope, command }) = requests.recv().await {
        log::debug!("api: {}", command_name(&command));
        let api = Arc::clone(&api);
        let events = events.clone();
        let repaint = Arc::clone(&repaint);
        tokio::spawn(async move {
            let event = execute(api.as_ref(), command).await;
            let event = match scope {
                Some(scope) => ApiEvent::Scoped {
                    scope,
                    event: Box::new(event),
                },
                None => event,
            };
            if events.send(event).await.is_err() {
                log::debug!("api: event receiver dropped");
                return;
            }
            repaint();
        });
    }
    log::info!("api: command channel closed, worker shutting down");
}

/// Perform one command against `api`.
pub async fn execute(api: &dyn ConsoleApi, command: ApiCommand) -> ApiEvent {
    match command {
        ApiCommand::LoadConfig => ApiEvent::ConfigLoaded(api.get_config().await),
        ApiCommand::SaveConfig(changes) => ApiEvent::ConfigSaved(api.put_config(&changes).await),
        ApiCommand::Probe { provider, section } => {
            let result = match provider {
                Provider::Llm => api.test_llm(&section).await,
                Provider::Whisper => api.test_whisper(&section).await,
            };
            ApiEvent::ProbeFinished { provider, result }
        }
        ApiCommand::FetchCopilotModels { github_pat } => {
            ApiEvent::CopilotModels(api.copilot_models(&github_pat).await)
        }
        ApiCommand::LoadPrompts => ApiEvent::PromptsLoaded(api.get_prompts().await),
        ApiCommand::SavePrompts(prompts) => {
            let result = api.put_prompts(&prompts).await.map(|()| prompts);
            ApiEvent::PromptsSaved(result)
        }
        ApiCommand::LoadBilling => ApiEvent::Billing(api.billing_summary().await),
        ApiCommand::LoadVersion => ApiEvent::Version(api.version().await),
        ApiCommand::LoadStats => ApiEvent::Stats(api.stats().await),
        ApiCommand::LoadBackupStatus => ApiEvent::BackupStatus(api.backup_status().await),
        ApiCommand::RunBackup => ApiEvent::BackupRun(api.run_backup().await),
        ApiCommand::LoadChangelog => ApiEvent::Changelog(api.changelog().await),
        ApiCommand::LoadSession => ApiEvent::Session(load_session(api).await),
        ApiCommand::Login { username, password } => {
            ApiEvent::LoggedIn(api.login(&username, &password).await)
        }
        ApiCommand::Logout => ApiEvent::LoggedOut(api.logout().await),
        ApiCommand::LoadUsers => ApiEvent::Users(api.list_users().await),
        ApiCommand::CreateUser(user) => {
            let result = api.create_user(&user).await;
            ApiEvent::UserCreated {
                username: user.username,
                result,
            }
        }
        ApiCommand::DeleteUser { username } => {
            let result = api.delete_user(&username).await;
            ApiEvent::UserDeleted { username, result }
        }
    }
}

/// Auth status, then the current user when auth is on.  A 401 from
/// `/api/auth/me` means "not logged in", not a failure.
async fn load_session(api: &dyn ConsoleApi) -> Result<SessionInfo, ApiError> {
    let status = api.auth_status().await?;
    if !status.require_auth {
        return Ok(SessionInfo { status, user: None });
    }
    match api.me().await {
        Ok(user) => Ok(SessionInfo {
            status,
            user: Some(user),
        }),
        Err(ApiError::Status { status: 401, .. }) => Ok(SessionInfo { status, user: None }),
        Err(e) => Err(e),
    }
}

/// Short name for logging; keeps passwords out of the log.
fn command_name(command: &ApiCommand) -> &'static str {
    match command {
        ApiCommand::LoadConfig => "load_config",
        ApiCommand::SaveConfig(_) => "save_config",
        ApiCommand::Probe {
            provider: Provider::Llm,
            ..
        } => "test_llm",
        ApiCommand::Probe {
            provider: Provider::Whisper,
            ..
        } => "test_whisper",
        ApiCommand::FetchCopilotModels { .. } => "copilot_models",
        ApiCommand::LoadPrompts => "load_prompts",
        ApiCommand::SavePrompts(_) => "save_prompts",
        ApiCommand::LoadBilling => "billing_summary",
        ApiCommand::LoadVersion => "version",
        ApiCommand::LoadStats => "stats",
        ApiCommand::LoadBackupStatus => "backup_status",
        ApiCommand::RunBackup => "run_backup",
        ApiCommand::LoadChangelog => "changelog",
        ApiCommand::LoadSession => "session",
        ApiCommand::Login { .. } => "login",
        ApiCommand::Logout => "logout",
        ApiCommand::LoadUsers => "list_users",
        ApiCommand::CreateUser(_) => "create_user",
        ApiCommand::DeleteUser { .. } => "delete_user",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // -----------------------------------------------------------------------
    // Test double
    // -----------------------------------------------------------------------

    /// In-memory backend.  Records every persisted document and probe body.
    #[derive(Default)]
    pub(crate) struct MockApi {
        pub config: Mutex<ConfigEnvelope>,
        pub saved: Mutex<Vec<ConfigDocument>>,
        pub probed: Mutex<Vec<(Provider, Value)>>,
        pub require_auth: bool,
        pub me: Option<User>,
        pub fail_probes: bool,
    }

    fn unsupported<T>() -> Result<T, ApiError> {
        Err(ApiError::Status {
            status: 404,
            error: None,
            message: None,
        })
    }

    #[async_trait]
    impl ConsoleApi for MockApi {
        async fn get_config(&self) -> Result<ConfigEnvelope, ApiError> {
            Ok(self.config.lock().unwrap().clone())
        }
        async fn put_config(&self, changes: &ConfigDocument) -> Result<ConfigDocument, ApiError> {
            self.saved.lock().unwrap().push(changes.clone());
            Ok(changes.clone())
        }
        async fn test_llm(&self, llm: &Value) -> Result<ProbeResponse, ApiError> {
            self.probed.lock().unwrap().push((Provider::Llm, llm.clone()));
            if self.fail_probes {
                return Err(ApiError::from_status_body(400, r#"{"ok":false,"error":"bad key"}"#));
            }
            Ok(ProbeResponse {
                ok: true,
                message: Some("LLM connection OK".into()),
                error: None,
            })
        }
        async fn test_whisper(&self, whisper: &Value) -> Result<ProbeResponse, ApiError> {
            self.probed
                .lock()
                .unwrap()
                .push((Provider::Whisper, whisper.clone()));
            Ok(ProbeResponse {
                ok: true,
                message: None,
                error: None,
            })
        }
        async fn copilot_models(&self, _pat: &str) -> Result<CopilotModelsResponse, ApiError> {
            unsupported()
        }
        async fn get_prompts(&self) -> Result<Prompts, ApiError> {
            unsupported()
        }
        async fn put_prompts(&self, _prompts: &Prompts) -> Result<(), ApiError> {
            Ok(())
        }
        async fn billing_summary(&self) -> Result<BillingSummary, ApiError> {
            Ok(BillingSummary {
                feeds_in_use: 2,
                feed_allowance: 5,
            })
        }
        async fn version(&self) -> Result<VersionInfo, ApiError> {
            Ok(VersionInfo {
                version: "1.4.0".into(),
            })
        }
        async fn stats(&self) -> Result<StatsResponse, ApiError> {
            unsupported()
        }
        async fn backup_status(&self) -> Result<BackupStatus, ApiError> {
            unsupported()
        }
        async fn run_backup(&self) -> Result<BackupRunResult, ApiError> {
            unsupported()
        }
        async fn changelog(&self) -> Result<String, ApiError> {
            unsupported()
        }
        async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
            Ok(AuthStatus {
                require_auth: self.require_auth,
                landing_page_enabled: false,
            })
        }
        async fn me(&self) -> Result<User, ApiError> {
            match &self.me {
                Some(user) => Ok(user.clone()),
                None => Err(ApiError::from_status_body(401, r#"{"error":"Authentication required."}"#)),
            }
        }
        async fn login(&self, _u: &str, _p: &str) -> Result<User, ApiError> {
            unsupported()
        }
        async fn logout(&self) -> Result<(), ApiError> {
            Ok(())
        }
        async fn list_users(&self) -> Result<Vec<User>, ApiError> {
            Ok(Vec::new())
        }
        async fn create_user(&self, _user: &NewUser) -> Result<(), ApiError> {
            Ok(())
        }
        async fn delete_user(&self, _username: &str) -> Result<(), ApiError> {
            Ok(())
        }
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn execute_save_returns_server_document() {
        let api = MockApi::default();
        let changes = ConfigDocument::from_value(json!({"llm": {"llm_model": "gpt-4o"}}));
        let event = execute(&api, ApiCommand::SaveConfig(changes.clone())).await;
        match event {
            ApiEvent::ConfigSaved(Ok(doc)) => assert_eq!(doc, changes),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(api.saved.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn execute_probe_routes_by_provider() {
        let api = MockApi::default();
        let event = execute(
            &api,
            ApiCommand::Probe {
                provider: Provider::Whisper,
                section: json!({"model": "whisper-1"}),
            },
        )
        .await;
        assert!(matches!(
            event,
            ApiEvent::ProbeFinished {
                provider: Provider::Whisper,
                result: Ok(_)
            }
        ));
        let probed = api.probed.lock().unwrap();
        assert_eq!(probed[0], (Provider::Whisper, json!({"model": "whisper-1"})));
    }

    #[tokio::test]
    async fn session_without_auth_has_no_user() {
        let api = MockApi::default();
        let info = load_session(&api).await.expect("session");
        assert!(!info.status.require_auth);
        assert!(info.user.is_none());
    }

    #[tokio::test]
    async fn session_unauthorized_is_logged_out_not_error() {
        let api = MockApi {
            require_auth: true,
            ..Default::default()
        };
        let info = load_session(&api).await.expect("session");
        assert!(info.status.require_auth);
        assert!(info.user.is_none());
    }

    #[tokio::test]
    async fn session_with_user() {
        let api = MockApi {
            require_auth: true,
            me: Some(User {
                id: Some(1),
                username: "admin".into(),
                role: "admin".into(),
            }),
            ..Default::default()
        };
        let info = load_session(&api).await.expect("session");
        assert!(info.user.expect("user").is_admin());
    }

    #[tokio::test]
    async fn worker_delivers_events_and_repaints() {
        let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (evt_tx, mut evt_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let repaints = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&repaints);
        let repaint: RepaintNotifier = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let worker = tokio::spawn(run_worker(
            Arc::new(MockApi::default()),
            cmd_rx,
            evt_tx,
            repaint,
        ));

        let handle = ApiHandle::new(cmd_tx);
        assert!(handle.send(ApiCommand::LoadVersion));
        assert!(handle.send(ApiCommand::LoadBilling));

        let mut got_version = false;
        let mut got_billing = false;
        for _ in 0..2 {
            match evt_rx.recv().await.expect("event") {
                ApiEvent::Version(Ok(v)) => {
                    assert_eq!(v.version, "1.4.0");
                    got_version = true;
                }
                ApiEvent::Billing(Ok(b)) => {
                    assert_eq!(b.feed_allowance, 5);
                    got_billing = true;
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
        assert!(got_version && got_billing);

        drop(handle);
        worker.await.expect("worker exits when senders drop");
        assert_eq!(repaints.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn scoped_handle_tags_replies() {
        let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (evt_tx, mut evt_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let worker = tokio::spawn(run_worker(
            Arc::new(MockApi::default()),
            cmd_rx,
            evt_tx,
            Arc::new(|| {}),
        ));

        let handle = ApiHandle::new(cmd_tx).scoped(7);
        assert_eq!(handle.scope(), Some(7));
        assert!(handle.send(ApiCommand::LoadVersion));
        match evt_rx.recv().await.expect("event") {
            ApiEvent::Scoped { scope, event } => {
                assert_eq!(scope, 7);
                assert!(matches!(*event, ApiEvent::Version(Ok(_))));
            }
            other => panic!("unexpected event: {other:?}"),
        }

        drop(handle);
        worker.await.expect("worker exits");
    }

    #[test]
    fn send_after_worker_gone_returns_false() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        assert!(!ApiHandle::new(tx).send(ApiCommand::LoadStats));
    }

    #[test]
    fn command_name_hides_credentials() {
        let cmd = ApiCommand::Login {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert_eq!(command_name(&cmd), "login");
    }
}

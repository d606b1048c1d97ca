//! `ConsoleApi` trait and the `reqwest`-backed `HttpConsoleApi`.
//!
//! Every endpoint the console calls goes through this trait so views and the
//! worker can be tested against an in-memory double.  `HttpConsoleApi` keeps
//! the session cookie issued by `/api/auth/login` in its cookie store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::error::ApiError;
use super::types::{
    AuthStatus, BackupRunResult, BackupStatus, BillingSummary, ConfigEnvelope,
    CopilotModelsResponse, NewUser, ProbeResponse, Prompts, StatsResponse, User, UserEnvelope,
    UserList, VersionInfo,
};
use crate::config::ServerConfig;
use crate::store::ConfigDocument;

// ---------------------------------------------------------------------------
// ConsoleApi trait
// ---------------------------------------------------------------------------

/// Async access to the backend REST API.
///
/// Implementors must be `Send + Sync`; the worker shares one instance across
/// all in-flight requests as `Arc<dyn ConsoleApi>`.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    // -- configuration ------------------------------------------------------
    async fn get_config(&self) -> Result<ConfigEnvelope, ApiError>;
    /// Persist a partial document.  Returns the sanitized full document.
    async fn put_config(&self, changes: &ConfigDocument) -> Result<ConfigDocument, ApiError>;
    /// `llm` is the candidate `llm` section from the draft.
    async fn test_llm(&self, llm: &Value) -> Result<ProbeResponse, ApiError>;
    /// `whisper` is the candidate `whisper` section from the draft.
    async fn test_whisper(&self, whisper: &Value) -> Result<ProbeResponse, ApiError>;
    async fn copilot_models(&self, github_pat: &str) -> Result<CopilotModelsResponse, ApiError>;
    async fn get_prompts(&self) -> Result<Prompts, ApiError>;
    async fn put_prompts(&self, prompts: &Prompts) -> Result<(), ApiError>;

    // -- dashboards ---------------------------------------------------------
    async fn billing_summary(&self) -> Result<BillingSummary, ApiError>;
    async fn version(&self) -> Result<VersionInfo, ApiError>;
    async fn stats(&self) -> Result<StatsResponse, ApiError>;
    async fn backup_status(&self) -> Result<BackupStatus, ApiError>;
    async fn run_backup(&self) -> Result<BackupRunResult, ApiError>;
    /// Raw markdown of the release notes.
    async fn changelog(&self) -> Result<String, ApiError>;

    // -- auth ---------------------------------------------------------------
    async fn auth_status(&self) -> Result<AuthStatus, ApiError>;
    async fn me(&self) -> Result<User, ApiError>;
    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError>;
    async fn delete_user(&self, username: &str) -> Result<(), ApiError>;
}

// ---------------------------------------------------------------------------
// HttpConsoleApi
// ---------------------------------------------------------------------------

/// Talks to a live backend over HTTP.
pub struct HttpConsoleApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpConsoleApi {
    /// Build a client from the console's server settings.
    ///
    /// The HTTP client carries the per-request timeout and a cookie store for
    /// the session.  Falls back to a default client if the builder fails.
    pub fn from_config(config: &ServerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .cookie_store(true)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("http client builder failed ({e}); using defaults");
                reqwest::Client::new()
            });

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Send `req`; map non-2xx to [`ApiError::Status`] and decode the body.
    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let text = self.fetch_text(req).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`fetch`](Self::fetch) but ignores the body of a 2xx response.
    async fn fetch_unit(&self, req: RequestBuilder) -> Result<(), ApiError> {
        self.fetch_text(req).await.map(|_| ())
    }

    async fn fetch_text(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            log::debug!("api: {} -> {}", status, body.chars().take(200).collect::<String>());
            return Err(ApiError::from_status_body(status.as_u16(), &body));
        }
        Ok(body)
    }
}

#[async_trait]
impl ConsoleApi for HttpConsoleApi {
    async fn get_config(&self) -> Result<ConfigEnvelope, ApiError> {
        self.fetch(self.request(Method::GET, "/api/config")).await
    }

    async fn put_config(&self, changes: &ConfigDocument) -> Result<ConfigDocument, ApiError> {
        self.fetch(self.request(Method::PUT, "/api/config").json(changes))
            .await
    }

    async fn test_llm(&self, llm: &Value) -> Result<ProbeResponse, ApiError> {
        let body = json!({ "llm": llm });
        self.fetch(self.request(Method::POST, "/api/config/test-llm").json(&body))
            .await
    }

    async fn test_whisper(&self, whisper: &Value) -> Result<ProbeResponse, ApiError> {
        let body = json!({ "whisper": whisper });
        self.fetch(self.request(Method::POST, "/api/config/test-whisper").json(&body))
            .await
    }

    async fn copilot_models(&self, github_pat: &str) -> Result<CopilotModelsResponse, ApiError> {
        let req = self
            .request(Method::GET, "/api/config/copilot-models")
            .query(&[("github_pat", github_pat)]);
        self.fetch(req).await
    }

    async fn get_prompts(&self) -> Result<Prompts, ApiError> {
        self.fetch(self.request(Method::GET, "/api/config/prompts"))
            .await
    }

    async fn put_prompts(&self, prompts: &Prompts) -> Result<(), ApiError> {
        self.fetch_unit(self.request(Method::PUT, "/api/config/prompts").json(prompts))
            .await
    }

    async fn billing_summary(&self) -> Result<BillingSummary, ApiError> {
        self.fetch(self.request(Method::GET, "/api/billing/summary"))
            .await
    }

    async fn version(&self) -> Result<VersionInfo, ApiError> {
        self.fetch(self.request(Method::GET, "/api/version")).await
    }

    async fn stats(&self) -> Result<StatsResponse, ApiError> {
        self.fetch(self.request(Method::GET, "/api/stats")).await
    }

    async fn backup_status(&self) -> Result<BackupStatus, ApiError> {
        self.fetch(self.request(Method::GET, "/api/backup/status"))
            .await
    }

    async fn run_backup(&self) -> Result<BackupRunResult, ApiError> {
        self.fetch(self.request(Method::POST, "/api/backup/run"))
            .await
    }

    async fn changelog(&self) -> Result<String, ApiError> {
        // Timestamp query defeats intermediary caches.
        let stamp = chrono::Utc::now().timestamp_millis().to_string();
        let req = self
            .request(Method::GET, "/CHANGELOG.md")
            .query(&[("t", stamp.as_str())]);
        self.fetch_text(req).await
    }

    async fn auth_status(&self) -> Result<AuthStatus, ApiError> {
        self.fetch(self.request(Method::GET, "/api/auth/status"))
            .await
    }

    async fn me(&self) -> Result<User, ApiError> {
        let env: UserEnvelope = self.fetch(self.request(Method::GET, "/api/auth/me")).await?;
        Ok(env.user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let body = json!({ "username": username, "password": password });
        let env: UserEnvelope = self
            .fetch(self.request(Method::POST, "/api/auth/login").json(&body))
            .await?;
        Ok(env.user)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.fetch_unit(self.request(Method::POST, "/api/auth/logout"))
            .await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let list: UserList = self
            .fetch(self.request(Method::GET, "/api/auth/users"))
            .await?;
        Ok(list.users)
    }

    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError> {
        self.fetch_unit(self.request(Method::POST, "/api/auth/users").json(user))
            .await
    }

    async fn delete_user(&self, username: &str) -> Result<(), ApiError> {
        let path = format!("/api/auth/users/{}", encode_segment(username));
        self.fetch_unit(self.request(Method::DELETE, &path)).await
    }
}

/// Percent-encode one path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(server: &MockServer) -> HttpConsoleApi {
        HttpConsoleApi::from_config(&ServerConfig {
            base_url: server.uri(),
            request_timeout_secs: 5,
        })
    }

    /// Verify that `HttpConsoleApi` is usable as `dyn ConsoleApi`.
    #[test]
    fn api_is_object_safe() {
        let api = HttpConsoleApi::from_config(&ServerConfig::default());
        let _boxed: Box<dyn ConsoleApi> = Box::new(api);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = HttpConsoleApi::from_config(&ServerConfig {
            base_url: "http://nas:5001/".into(),
            request_timeout_secs: 5,
        });
        assert_eq!(api.base_url(), "http://nas:5001");
    }

    #[test]
    fn path_segment_encoding() {
        assert_eq!(encode_segment("ann smith"), "ann%20smith");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }

    #[tokio::test]
    async fn get_config_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "config": {"llm": {"llm_model": "gpt-4o", "llm_api_key_preview": "sk-a...wxyz"}},
                "env_overrides": {
                    "llm.llm_api_key": {"env_var": "LLM_API_KEY", "is_secret": true, "value_preview": "sk-a...wxyz"}
                }
            })))
            .mount(&server)
            .await;

        let env = api_for(&server).get_config().await.expect("config");
        assert_eq!(env.config.get_str(&["llm", "llm_model"]), Some("gpt-4o"));
        assert_eq!(env.env_overrides["llm.llm_api_key"].env_var, "LLM_API_KEY");
    }

    #[tokio::test]
    async fn put_config_sends_partial_document() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/config"))
            .and(body_json(json!({"llm": {"llm_model": "gpt-4o"}})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"llm": {"llm_model": "gpt-4o"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let changes = ConfigDocument::from_value(json!({"llm": {"llm_model": "gpt-4o"}}));
        let saved = api_for(&server).put_config(&changes).await.expect("saved");
        assert_eq!(saved.get_str(&["llm", "llm_model"]), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn probe_failure_carries_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/config/test-whisper"))
            .and(body_json(json!({"whisper": {"model": "whisper-1"}})))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"ok": false, "error": "Missing whisper api_key"})),
            )
            .mount(&server)
            .await;

        let err = api_for(&server)
            .test_whisper(&json!({"model": "whisper-1"}))
            .await
            .expect_err("400");
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.user_message("fallback"), "Missing whisper api_key");
    }

    #[tokio::test]
    async fn probe_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/config/test-llm"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"ok": true, "message": "LLM connection OK"})),
            )
            .mount(&server)
            .await;

        let resp = api_for(&server).test_llm(&json!({})).await.expect("ok");
        assert!(resp.ok);
        assert_eq!(resp.message.as_deref(), Some("LLM connection OK"));
    }

    #[tokio::test]
    async fn copilot_models_passes_token_as_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/config/copilot-models"))
            .and(query_param("github_pat", "ghp_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "models": [{"id": "gpt-4.1", "name": "GPT-4.1", "cost_multiplier": 0}]
            })))
            .mount(&server)
            .await;

        let resp = api_for(&server).copilot_models("ghp_abc").await.expect("models");
        assert_eq!(resp.models.len(), 1);
        assert!(resp.models[0].is_premium());
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = api_for(&server).version().await.expect_err("decode");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn login_returns_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"username": "admin", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": 1, "username": "admin", "role": "admin"}
            })))
            .mount(&server)
            .await;

        let user = api_for(&server).login("admin", "pw").await.expect("login");
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn delete_user_hits_encoded_path() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/auth/users/ann%20smith"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        api_for(&server).delete_user("ann smith").await.expect("deleted");
    }

    #[tokio::test]
    async fn changelog_is_cache_busted_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/CHANGELOG.md"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# 1.2.0\n- fixes"))
            .mount(&server)
            .await;

        let text = api_for(&server).changelog().await.expect("changelog");
        assert!(text.starts_with("# 1.2.0"));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let api = HttpConsoleApi::from_config(&ServerConfig {
            base_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 2,
        });
        let err = api.auth_status().await.expect_err("no server");
        assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout));
    }
}

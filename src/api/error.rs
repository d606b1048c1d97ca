//! Error type for calls against the backend REST API.

use thiserror::Error;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the backend.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Connection refused, DNS failure, broken pipe, ...
    #[error("{0}")]
    Transport(String),

    /// The request did not complete within the client timeout.
    #[error("request timed out")]
    Timeout,

    /// The backend answered with a non-2xx status.  `error` / `message` are
    /// lifted from a JSON body of the form `{"error": ..., "message": ...}`
    /// when one is present.
    #[error("server returned {status}")]
    Status {
        status: u16,
        error: Option<String>,
        message: Option<String>,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl ApiError {
    /// Build a [`ApiError::Status`] from a status code and raw body text.
    ///
    /// Non-JSON bodies (HTML error pages, empty bodies) leave both fields
    /// `None`.
    pub fn from_status_body(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let field = |key: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(key))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        ApiError::Status {
            status,
            error: field("error"),
            message: field("message"),
        }
    }

    /// HTTP status code, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The text shown to the user for this failure.
    ///
    /// Priority: server `error`, server `message`, transport error text,
    /// then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { error, message, .. } => error
                .clone()
                .or_else(|| message.clone())
                .unwrap_or_else(|| fallback.to_string()),
            ApiError::Transport(msg) | ApiError::Decode(msg) if !msg.is_empty() => msg.clone(),
            ApiError::Timeout => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_wins_over_message() {
        let e = ApiError::from_status_body(400, r#"{"error":"Missing llm_api_key","message":"x"}"#);
        assert_eq!(e.user_message("LLM connection failed"), "Missing llm_api_key");
    }

    #[test]
    fn server_message_used_without_error() {
        let e = ApiError::from_status_body(500, r#"{"message":"writer busy"}"#);
        assert_eq!(e.user_message("fallback"), "writer busy");
    }

    #[test]
    fn empty_error_field_is_skipped() {
        let e = ApiError::from_status_body(400, r#"{"error":"","message":"second"}"#);
        assert_eq!(e.user_message("fallback"), "second");
    }

    #[test]
    fn html_body_falls_back() {
        let e = ApiError::from_status_body(502, "<html>Bad Gateway</html>");
        assert_eq!(e.user_message("Whisper connection failed"), "Whisper connection failed");
        assert_eq!(e.status(), Some(502));
    }

    #[test]
    fn transport_message_before_fallback() {
        let e = ApiError::Transport("connection refused".into());
        assert_eq!(e.user_message("fallback"), "connection refused");

        let e = ApiError::Transport(String::new());
        assert_eq!(e.user_message("fallback"), "fallback");
    }

    #[test]
    fn timeout_has_readable_text() {
        assert_eq!(ApiError::Timeout.user_message("fallback"), "request timed out");
        assert!(ApiError::Timeout.status().is_none());
    }
}

//! Connection probe state for the two external providers.
//!
//! A probe is one test call per provider (`test-llm`, `test-whisper`) made
//! with the candidate settings from the draft.  This module holds only the
//! tri-state result; the calls themselves go through the API worker.
//!
//! ```text
//! start() ──▶ Loading ──resolve(Ok{ok:true})──▶ Ok
//!                     ──resolve(anything else)─▶ Error
//! ```
//!
//! Responses are applied in arrival order.  If two probes overlap, whichever
//! response lands last is what the card shows.

use crate::api::{ApiError, ProbeResponse};

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// The external services the console can probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Llm,
    Whisper,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Whisper, Provider::Llm];

    /// Config section carrying this provider's settings.
    pub fn section(self) -> &'static str {
        match self {
            Provider::Llm => "llm",
            Provider::Whisper => "whisper",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Provider::Llm => "LLM",
            Provider::Whisper => "Whisper",
        }
    }

    /// Role shown under the card title.
    pub fn subtitle(self) -> &'static str {
        match self {
            Provider::Llm => "· Ad Identification",
            Provider::Whisper => "· Transcription",
        }
    }

    /// Message used when neither the server nor the transport said anything
    /// useful.
    pub fn failure_fallback(self) -> &'static str {
        match self {
            Provider::Llm => "LLM connection failed",
            Provider::Whisper => "Whisper connection failed",
        }
    }
}

// ---------------------------------------------------------------------------
// ProbeStatus / ProviderStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProbeStatus {
    #[default]
    Loading,
    Ok,
    Error,
}

/// What one connection card shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderStatus {
    pub status: ProbeStatus,
    pub message: String,
    pub error: Option<String>,
}

impl ProviderStatus {
    /// The single line rendered on the card.
    pub fn display_message(&self, provider: Provider) -> String {
        match self.status {
            ProbeStatus::Loading => "Testing connection…".to_string(),
            ProbeStatus::Ok if self.message.is_empty() => {
                format!("{} connected", provider.title())
            }
            ProbeStatus::Ok => self.message.clone(),
            ProbeStatus::Error => self
                .error
                .clone()
                .unwrap_or_else(|| format!("{} connection failed", provider.title())),
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionProbe
// ---------------------------------------------------------------------------

/// Status of both provider cards.
#[derive(Debug, Clone, Default)]
pub struct ConnectionProbe {
    llm: ProviderStatus,
    whisper: ProviderStatus,
}

impl ConnectionProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, provider: Provider) -> &ProviderStatus {
        match provider {
            Provider::Llm => &self.llm,
            Provider::Whisper => &self.whisper,
        }
    }

    fn status_mut(&mut self, provider: Provider) -> &mut ProviderStatus {
        match provider {
            Provider::Llm => &mut self.llm,
            Provider::Whisper => &mut self.whisper,
        }
    }

    /// Put both providers back into `Loading`.
    pub fn start(&mut self) {
        for provider in Provider::ALL {
            self.begin(provider);
        }
    }

    /// Put one provider back into `Loading`.
    pub fn begin(&mut self, provider: Provider) {
        *self.status_mut(provider) = ProviderStatus::default();
    }

    /// Settle `provider` from the outcome of its test call.
    pub fn resolve(&mut self, provider: Provider, outcome: Result<ProbeResponse, ApiError>) {
        let next = match outcome {
            Ok(resp) if resp.ok => ProviderStatus {
                status: ProbeStatus::Ok,
                message: resp.message.unwrap_or_default(),
                error: None,
            },
            Ok(resp) => ProviderStatus {
                status: ProbeStatus::Error,
                message: String::new(),
                error: Some(
                    resp.error
                        .or(resp.message)
                        .unwrap_or_else(|| provider.failure_fallback().to_string()),
                ),
            },
            Err(e) => ProviderStatus {
                status: ProbeStatus::Error,
                message: String::new(),
                error: Some(e.user_message(provider.failure_fallback())),
            },
        };
        log::debug!("{} probe settled: {:?}", provider.title(), next.status);
        *self.status_mut(provider) = next;
    }

    /// `true` while at least one provider is still waiting.
    pub fn is_busy(&self) -> bool {
        Provider::ALL
            .iter()
            .any(|p| self.status(*p).status == ProbeStatus::Loading)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

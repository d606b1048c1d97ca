//! Backend REST API access.
//!
//! - [`ConsoleApi`] / [`HttpConsoleApi`]: one async method per endpoint.
//! - [`run_worker`]: executes [`ApiCommand`]s on the tokio runtime and
//!   reports [`ApiEvent`]s back to the UI thread.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//! use podly_console::api::{run_worker, ApiCommand, ApiHandle, HttpConsoleApi, CHANNEL_CAPACITY};
//! use podly_console::config::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = Arc::new(HttpConsoleApi::from_config(&ServerConfig::default()));
//!     let (cmd_tx, cmd_rx) = mpsc::channel(CHANNEL_CAPACITY);
//!     let (evt_tx, mut evt_rx) = mpsc::channel(CHANNEL_CAPACITY);
//!
//!     tokio::spawn(run_worker(api, cmd_rx, evt_tx, Arc::new(|| {})));
//!
//!     ApiHandle::new(cmd_tx).send(ApiCommand::LoadConfig);
//!     let event = evt_rx.recv().await;
//!     println!("{event:?}");
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;
pub mod worker;

pub use client::{ConsoleApi, HttpConsoleApi};
pub use error::ApiError;
pub use types::{
    AdDetectionStats, AuthStatus, BackupRunResult, BackupStatus, BillingSummary, ConfigEnvelope,
    CopilotModel, CopilotModelsResponse, EpisodeStats, FeedStats, JobStats, ModelCallStats,
    NewUser, ProbeResponse, Prompts, StatsResponse, TranscriptStats, User, UserEnvelope, UserList,
    VersionInfo,
};
pub use worker::{
    execute, run_worker, ApiCommand, ApiEvent, ApiHandle, ApiRequest, RepaintNotifier, SessionInfo,
    CHANNEL_CAPACITY,
};

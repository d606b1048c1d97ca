//! Database backup panel on the App tab.

use chrono::{DateTime, NaiveDateTime};

use crate::api::{ApiError, BackupRunResult, BackupStatus};

#[derive(Debug, Clone, Default)]
pub struct BackupPanel {
    pub status: Option<BackupStatus>,
    running: bool,
    loading: bool,
}

impl BackupPanel {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn loaded(&mut self, result: Result<BackupStatus, ApiError>) -> Option<String> {
        self.loading = false;
        match result {
            Ok(status) => {
                self.status = Some(status);
                None
            }
            Err(e) => Some(e.user_message("Failed to load backup status")),
        }
    }

    /// `false` if a backup is already running.
    pub fn begin_run(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Apply a run result; returns the toast text.  The caller refreshes the
    /// status afterwards.
    pub fn finished(&mut self, result: Result<BackupRunResult, ApiError>) -> Result<String, String> {
        self.running = false;
        match result {
            Ok(run) if run.ok => Ok(match run.path {
                Some(path) => format!("Backup written to {path}"),
                None => "Backup completed".to_string(),
            }),
            Ok(run) => Err(run.error.unwrap_or_else(|| "Backup failed".to_string())),
            Err(e) => Err(e.user_message("Backup failed")),
        }
    }

    /// "Last success" line for the panel.
    pub fn last_success_label(&self) -> String {
        match self.status.as_ref().and_then(|s| s.last_success_at.as_deref()) {
            Some(ts) => format_timestamp(ts),
            None => "Never".to_string(),
        }
    }
}

/// Render a backend ISO-8601 timestamp as `YYYY-MM-DD HH:MM UTC`.
///
/// The backend writes naive UTC timestamps; offsets are accepted too.
/// Unparseable input is shown verbatim.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.naive_utc().format("%Y-%m-%d %H:%M UTC").to_string();
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        Err(_) => raw.to_string(),
    }
}

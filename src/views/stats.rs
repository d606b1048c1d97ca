//! Stats dashboard state and formatting.
//!
//! The page polls `GET /api/stats` on a fixed interval while it is shown.
//! The Home and Jobs pages reuse the same snapshot.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use crate::api::{ApiError, EpisodeStats, JobStats, ModelCallStats, StatsResponse};

/// Polling interval when the settings do not say otherwise.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `1234567` -> `"1,234,567"`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_hours(hours: f64) -> String {
    format!("{hours:.1}")
}

pub fn episodes_breakdown(episodes: &EpisodeStats) -> String {
    format!(
        "{} processed · {} unprocessed",
        episodes.processed, episodes.unprocessed
    )
}

/// Per-model call counts, busiest first; ties by name.
pub fn models_by_calls(calls: &ModelCallStats) -> Vec<(&str, u64)> {
    let mut rows: Vec<(&str, u64)> = calls
        .by_model
        .iter()
        .map(|(model, count)| (model.as_str(), *count))
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    rows
}

pub fn success_rate_label(jobs: &JobStats) -> Option<String> {
    jobs.success_rate_percent.map(|rate| format!("{rate}%"))
}

/// One headline card of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
    pub label: &'static str,
    pub sub: Option<String>,
}

/// The four cards across the top of the page.
pub fn headline_cards(stats: &StatsResponse) -> [StatCard; 4] {
    let ads = &stats.ad_detection;
    [
        StatCard {
            title: "Feeds",
            value: format_count(stats.feeds.total),
            label: "total feeds",
            sub: None,
        },
        StatCard {
            title: "Episodes",
            value: format_count(stats.episodes.total),
            label: "total episodes",
            sub: Some(episodes_breakdown(&stats.episodes)),
        },
        StatCard {
            title: "Transcription",
            value: format_hours(stats.transcript.total_transcribed_hours),
            label: "hours transcribed",
            sub: Some(format!(
                "{} segments",
                format_count(stats.transcript.total_segments)
            )),
        },
        StatCard {
            title: "Ad Detection",
            value: format!("{} hrs", format_hours(ads.estimated_ad_hours)),
            label: "est. ads removed",
            sub: Some(format!(
                "{:.0} min · {} ad identifications",
                ads.estimated_ad_minutes,
                format_count(ads.ad_identifications)
            )),
        },
    ]
}

// ---------------------------------------------------------------------------
// StatsView
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StatsView {
    data: Option<StatsResponse>,
    error: Option<String>,
    loading: bool,
    last_refreshed: Option<DateTime<Local>>,
    next_poll: Option<Instant>,
    interval: Duration,
}

impl StatsView {
    pub fn new(interval: Duration) -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
            last_refreshed: None,
            next_poll: None,
            interval,
        }
    }

    pub fn data(&self) -> Option<&StatsResponse> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Nothing to show yet and a request is out.
    pub fn is_first_load(&self) -> bool {
        self.loading && self.data.is_none()
    }

    /// `"Updated 14:03:12"` once a snapshot has arrived.
    pub fn updated_label(&self) -> Option<String> {
        self.last_refreshed
            .map(|t| format!("Updated {}", t.format("%H:%M:%S")))
    }

    /// Whether a fetch should go out at `now`.
    pub fn poll_due(&self, now: Instant) -> bool {
        !self.loading && self.next_poll.map_or(true, |at| now >= at)
    }

    /// Time until the next scheduled fetch, for repaint scheduling.
    pub fn until_next_poll(&self, now: Instant) -> Option<Duration> {
        self.next_poll.map(|at| at.saturating_duration_since(now))
    }

    pub fn begin_load(&mut self, now: Instant) {
        self.loading = true;
        self.next_poll = Some(now + self.interval);
    }

    /// Manual refresh: fetch on the next frame.
    pub fn refresh_now(&mut self) {
        self.next_poll = None;
    }

    /// Stop polling; the next visit fetches immediately.
    pub fn pause(&mut self) {
        self.next_poll = None;
    }

    /// Apply a fetch result.  A failure keeps the last good snapshot.
    pub fn loaded(&mut self, result: Result<StatsResponse, ApiError>, at: DateTime<Local>) {
        self.loading = false;
        match result {
            Ok(stats) => {
                self.data = Some(stats);
                self.error = None;
                self.last_refreshed = Some(at);
            }
            Err(e) => {
                let msg = e.user_message("Failed to load stats");
                log::warn!("stats: {msg}");
                self.error = Some(msg);
            }
        }
    }
}

impl Default for StatsView {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatsResponse {
        serde_json::from_str(
            r#"{
                "feeds": {"total": 3},
                "episodes": {"total": 10, "processed": 7, "unprocessed": 3},
                "transcript": {"total_segments": 12840, "total_transcribed_hours": 41.26},
                "model_calls": {"total": 900, "by_model": {"gpt-4o": 120, "groq/llama": 780}, "by_status": {}},
                "ad_detection": {"ad_identifications": 2210, "estimated_ad_minutes": 95.4, "estimated_ad_hours": 1.59},
                "processing_jobs": {"total": 12, "by_status": {"completed": 11, "failed": 1}, "success_rate_percent": 91.7}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn headline_cards_for_sample() {
        let cards = headline_cards(&sample());
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[1].sub.as_deref(), Some("7 processed · 3 unprocessed"));
        assert_eq!(cards[2].value, "41.3");
        assert_eq!(cards[2].sub.as_deref(), Some("12,840 segments"));
        assert_eq!(cards[3].value, "1.6 hrs");
        assert_eq!(cards[3].sub.as_deref(), Some("95 min · 2,210 ad identifications"));
    }

    #[test]
    fn models_sorted_busiest_first() {
        let stats = sample();
        let rows = models_by_calls(&stats.model_calls);
        assert_eq!(rows, vec![("groq/llama", 780), ("gpt-4o", 120)]);
    }

    #[test]
    fn success_rate_only_when_known() {
        let stats = sample();
        assert_eq!(success_rate_label(&stats.processing_jobs).as_deref(), Some("91.7%"));
        assert!(success_rate_label(&JobStats::default()).is_none());
    }

    #[test]
    fn polls_on_interval() {
        let mut view = StatsView::new(Duration::from_secs(30));
        let t0 = Instant::now();
        assert!(view.poll_due(t0));

        view.begin_load(t0);
        assert!(view.is_first_load());
        assert!(!view.poll_due(t0), "request in flight");

        view.loaded(Ok(sample()), Local::now());
        assert!(!view.poll_due(t0 + Duration::from_secs(10)));
        assert!(view.poll_due(t0 + Duration::from_secs(30)));
        assert!(view.updated_label().is_some());

        view.refresh_now();
        assert!(view.poll_due(t0));
    }

    #[test]
    fn failure_keeps_last_snapshot() {
        let mut view = StatsView::default();
        view.begin_load(Instant::now());
        view.loaded(Ok(sample()), Local::now());
        view.begin_load(Instant::now());
        view.loaded(Err(ApiError::Transport("connection refused".into())), Local::now());
        assert_eq!(view.error(), Some("connection refused"));
        assert_eq!(view.data().map(|d| d.feeds.total), Some(3));
    }
}

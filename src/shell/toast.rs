//! Short-lived notifications shown at the top of the window.

use std::time::{Duration, Instant};

/// How long a toast stays on screen.
pub const TOAST_DURATION: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    shown_at: Instant,
}

/// Queue of visible toasts, oldest first.
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Info, text.into(), Instant::now());
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text.into(), Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::warn!("{text}");
        self.push(ToastKind::Error, text, Instant::now());
    }

    fn push(&mut self, kind: ToastKind, text: String, shown_at: Instant) {
        self.items.push(Toast {
            kind,
            text,
            shown_at,
        });
    }

    /// Drop toasts older than [`TOAST_DURATION`] as of `now`.
    pub fn expire(&mut self, now: Instant) {
        self.items
            .retain(|t| now.saturating_duration_since(t.shown_at) < TOAST_DURATION);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Text of the newest toast, if any.
    pub fn latest(&self) -> Option<&str> {
        self.items.last().map(|t| t.text.as_str())
    }
}

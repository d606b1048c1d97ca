//! Feed-allowance badge and billing page state.
//!
//! Fetched once per authenticated session, for logged-in non-admins only.

use crate::api::{ApiError, BillingSummary};

#[derive(Debug, Clone, Default)]
pub struct BillingView {
    summary: Option<BillingSummary>,
    requested: bool,
    /// Scope of the fetch still out; replies under any other scope are stale.
    awaiting: Option<u64>,
    error: Option<String>,
}

impl BillingView {
    pub fn summary(&self) -> Option<&BillingSummary> {
        self.summary.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `true` exactly once per session while `wanted` holds; the caller
    /// sends the fetch when it does.
    pub fn should_fetch(&mut self, wanted: bool) -> bool {
        if !wanted || self.requested {
            return false;
        }
        self.requested = true;
        true
    }

    /// Remember the scope the fetch went out under.
    pub fn expect_reply(&mut self, scope: u64) {
        self.awaiting = Some(scope);
    }

    /// Apply a reply.  Returns `false`, leaving state alone, when `scope`
    /// is not the fetch this session is waiting for.
    pub fn loaded(&mut self, scope: u64, result: Result<BillingSummary, ApiError>) -> bool {
        if self.awaiting != Some(scope) {
            return false;
        }
        self.awaiting = None;
        match result {
            Ok(summary) => {
                self.summary = Some(summary);
                self.error = None;
            }
            Err(e) => {
                let msg = e.user_message("Failed to load billing summary");
                log::warn!("billing: {msg}");
                self.error = Some(msg);
            }
        }
        true
    }

    /// Forget the session's summary (logout, or a different user).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Header badge text, `"Feeds 2/5"`.
    pub fn badge(&self) -> Option<String> {
        self.summary
            .as_ref()
            .map(|s| format!("Feeds {}/{}", s.feeds_in_use, s.feed_allowance))
    }

    /// Feeds still available under the plan.
    pub fn remaining(&self) -> Option<u64> {
        self.summary
            .as_ref()
            .map(|s| s.feed_allowance.saturating_sub(s.feeds_in_use))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetches_once_per_session() {
        let mut view = BillingView::default();
        assert!(!view.should_fetch(false));
        assert!(view.should_fetch(true));
        assert!(!view.should_fetch(true));

        view.reset();
        assert!(view.should_fetch(true));
    }

    #[test]
    fn badge_text() {
        let mut view = BillingView::default();
        assert!(view.badge().is_none());
        view.expect_reply(1);
        assert!(view.loaded(
            1,
            Ok(BillingSummary {
                feeds_in_use: 2,
                feed_allowance: 5,
            })
        ));
        assert_eq!(view.badge().as_deref(), Some("Feeds 2/5"));
        assert_eq!(view.remaining(), Some(3));
    }

    #[test]
    fn over_allowance_saturates() {
        let mut view = BillingView::default();
        view.expect_reply(1);
        view.loaded(
            1,
            Ok(BillingSummary {
                feeds_in_use: 7,
                feed_allowance: 5,
            }),
        );
        assert_eq!(view.remaining(), Some(0));
    }

    #[test]
    fn reply_from_previous_session_is_dropped() {
        let mut view = BillingView::default();
        assert!(view.should_fetch(true));
        view.expect_reply(3);
        view.reset();

        let summary = BillingSummary {
            feeds_in_use: 4,
            feed_allowance: 5,
        };
        assert!(!view.loaded(3, Ok(summary.clone())));
        assert!(view.badge().is_none());

        assert!(view.should_fetch(true));
        view.expect_reply(4);
        assert!(!view.loaded(3, Ok(summary.clone())));
        assert!(view.loaded(4, Ok(summary)));
        assert_eq!(view.badge().as_deref(), Some("Feeds 4/5"));
    }
}

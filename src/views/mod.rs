//! State of the pages outside the config flow: stats, billing, changelog
//! and login.

pub mod billing;
pub mod changelog;
pub mod login;
pub mod stats;

pub use billing::BillingView;
pub use changelog::ChangelogView;
pub use login::{LoginForm, LOGIN_FALLBACK};
pub use stats::{
    episodes_breakdown, format_count, format_hours, headline_cards, models_by_calls,
    success_rate_label, StatCard, StatsView, DEFAULT_REFRESH,
};

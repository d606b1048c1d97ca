//! Client-side configuration state.
//!
//! Everything here is plain data owned by the UI thread: the draft document
//! and its baseline ([`PendingConfigStore`]), the env-override snapshot
//! ([`EnvOverrides`]) and the provider probe cards ([`ConnectionProbe`]).

pub mod document;
pub mod env;
pub mod pending;
pub mod probe;

pub use document::{coerce_number, dotted, ConfigDocument, NumberInput, PREVIEW_SUFFIX};
pub use env::{EnvOverrideEntry, EnvOverrides};
pub use pending::{PendingConfigStore, SaveDecision, SaveStage};
pub use probe::{ConnectionProbe, ProbeStatus, Provider, ProviderStatus};

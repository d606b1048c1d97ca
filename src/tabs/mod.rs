//! The configuration page: tab routing, field catalogue and per-tab state.

pub mod backup;
pub mod controller;
pub mod fields;
pub mod prompts;
pub mod session;
pub mod users;

pub use backup::{format_timestamp, BackupPanel};
pub use controller::{resolve_tab, visible_tabs, ConfigTab, TabController, TAB_QUERY_KEY};
pub use fields::{fields_for, label_for_path, FieldDefault, FieldKind, FieldSpec};
pub use prompts::PromptEditor;
pub use session::{ConfigSession, CopilotModels};
pub use users::{NewUserForm, UserAdmin, ROLES};

//! Podly console: a desktop admin client for a Podly podcast ad-removal
//! server.
//!
//! - [`api`]: REST client and the background request worker.
//! - [`store`]: pending-config store, connection probes, env overrides.
//! - [`tabs`]: config page state (tabs, prompts, users, backups).
//! - [`shell`] and [`views`]: routing, auth, and the non-config pages.
//! - [`ui`]: egui rendering; [`app::ConsoleApp`] ties it together.

pub mod api;
pub mod app;
pub mod config;
pub mod shell;
pub mod store;
pub mod tabs;
pub mod ui;
pub mod views;

//! egui rendering.  Functions here read state and report what the user did;
//! they never talk to the backend directly.

pub mod config_page;
pub mod header;
pub mod overlays;
pub mod pages;
pub mod widgets;

pub use header::HeaderAction;
pub use pages::PageAction;

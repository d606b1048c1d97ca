//! Application entry point for the Podly console.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`ConsoleSettings`] from disk (defaults on first run), then apply
//!    the `PODLY_SERVER_URL` override.
//! 3. Create the [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the HTTP client and the command/event channels.
//! 5. Run [`eframe::run_native`]; the API worker is spawned once the egui
//!    context exists so it can request repaints.

use std::sync::Arc;

use eframe::egui;
use podly_console::{
    api::{run_worker, ApiHandle, HttpConsoleApi, RepaintNotifier, CHANNEL_CAPACITY},
    app::ConsoleApp,
    config::{ConsoleSettings, SERVER_URL_ENV},
};
use tokio::sync::mpsc;

const DEFAULT_WINDOW_SIZE: (f32, f32) = (1200.0, 800.0);

fn native_options(settings: &ConsoleSettings) -> eframe::NativeOptions {
    let (w, h) = settings.ui.window_size.unwrap_or(DEFAULT_WINDOW_SIZE);
    let vp = egui::ViewportBuilder::default()
        .with_title("Podly Console")
        .with_inner_size([w, h])
        .with_min_inner_size([720.0, 480.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Podly console starting up");

    // 2. Settings
    let settings = ConsoleSettings::load()
        .unwrap_or_else(|e| {
            log::warn!("Failed to load settings ({e}); using defaults");
            ConsoleSettings::default()
        })
        .with_server_override(std::env::var(SERVER_URL_ENV).ok());
    log::info!("backend: {}", settings.server.base_url);

    // 3. Tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    // 4. API client and channels
    let api = Arc::new(HttpConsoleApi::from_config(&settings.server));
    let (command_tx, command_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_tx, event_rx) = mpsc::channel(CHANNEL_CAPACITY);

    // 5. Run the UI (blocks until the window is closed)
    let options = native_options(&settings);
    let handle = rt.handle().clone();
    eframe::run_native(
        "Podly Console",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let repaint: RepaintNotifier = Arc::new(move || ctx.request_repaint());
            handle.spawn(run_worker(api, command_rx, event_tx, repaint));
            Ok(Box::new(ConsoleApp::new(ApiHandle::new(command_tx), event_rx, settings)))
        }),
    )
}

//! Heatmap Server – keeps one heatmap controller alive and serves it over
//! HTTP so a browser front end can draw, hover and edit it.
//!
//! This binary:
//! 1. Reads configuration from `heatmap.conf`
//! 2. Builds the controller (theme and profile store included)
//! 3. Runs an axum HTTP server until Ctrl-C.

mod server;

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use heatmap_core::config::{self, Settings};
use heatmap_core::controller::HeatmapController;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── load config ──────────────────────────────────────────────────
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| Settings::default_path().to_string());
    let settings = if Path::new(&config_path).exists() {
        config::load(Path::new(&config_path)).context("Config load failed")?
    } else {
        info!("No config at {config_path}, using defaults");
        Settings::default()
    };

    info!(
        "Heatmap Server starting (listen={}, year={}, birth={})",
        settings.listen_addr, settings.year, settings.birth
    );

    // ── build controller ─────────────────────────────────────────────
    let controller = HeatmapController::from_settings(&settings, settings.year)?;

    // ── ctrl-c ───────────────────────────────────────────────────────
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_handler = shutdown.clone();
    ctrlc::set_handler(move || {
        shutdown_handler.store(true, Ordering::Relaxed);
        info!("Shutdown signal received");
    })
    .context("Cannot set Ctrl-C handler")?;

    // ── start HTTP server ────────────────────────────────────────────
    let listen_addr = settings.listen_addr.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server::run(controller, &listen_addr, shutdown).await {
            tracing::error!("HTTP server error: {e:#}");
        }
    });

    let _ = server_handle.await;
    info!("Heatmap Server stopped");

    Ok(())
}

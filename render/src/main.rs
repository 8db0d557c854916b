//! Heatmap Render – scores a year and writes it to a PNG or SVG file.
//!
//! Usage:
//!   heatmap-render [config] [out.png|out.svg] [year]
//!
//! The config defaults to `/etc/heatmap/heatmap.conf`; a missing default
//! file falls back to built-in settings. The output format follows the file
//! extension.

mod png;
mod svg;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use heatmap_core::config::{self, Settings};
use heatmap_core::controller::HeatmapController;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // ── load config ──────────────────────────────────────────────────
    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.first() {
        Some(path) => config::load(Path::new(path)).context("Config load failed")?,
        None if Path::new(Settings::default_path()).exists() => {
            config::load(Path::new(Settings::default_path())).context("Config load failed")?
        }
        None => Settings::default(),
    };
    let out_path = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("heatmap.svg"));
    let year = match args.get(2) {
        Some(y) => y.parse().with_context(|| format!("Invalid year {y:?}"))?,
        None => settings.year,
    };

    // ── build controller ─────────────────────────────────────────────
    let controller = HeatmapController::from_settings(&settings, year)?;

    let state = controller.state();
    info!(
        "Rendering {} for birth date {} ({} day(s), {} truncated)",
        state.year, state.birth, state.occupied, state.truncated_days
    );

    // ── draw ─────────────────────────────────────────────────────────
    let cmds = controller.render();
    match out_path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("png") => png::write(&cmds, &out_path)?,
        Some(ext) if ext.eq_ignore_ascii_case("svg") => svg::write(&cmds, &out_path)?,
        _ => anyhow::bail!("Unsupported output {} (expected .png or .svg)", out_path.display()),
    }

    info!("Heatmap written to {}", out_path.display());
    Ok(())
}

//! Configuration parsing – reads a `KEY=VALUE` file (`heatmap.conf`).
//!
//! ```text
//! # canvas
//! WIDTH=800
//! HEIGHT=300
//! COLS=53
//! PADDING=2
//! LABEL_MARGIN=60
//! PALETTE="#F2B652,#E8E284,#ACE08C,#54D99F,#26C4A5"
//!
//! # state
//! BIRTH_DATE=1990-06-15
//! YEAR=2025
//! STORE_PATH=/var/lib/heatmap/profile.json
//! THEME_FILE=/etc/heatmap/theme.toml
//! SEED=42
//!
//! # server
//! LISTEN_ADDR=0.0.0.0:8090
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use thiserror::Error;
use tracing::{info, warn};

use crate::color::{Color, ColorParseError, ColorScale};
use crate::grid::{DEFAULT_COLS, ROWS};

/// Upper bound on `cols`; a year never needs more than 54 weeks.
pub const MAX_COLS: usize = 1000;
use crate::profile::BirthProfile;

/// Geometry or palette settings the heatmap cannot be drawn with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("at least one column is required")]
    ZeroColumns,

    #[error("{cols} columns exceed the maximum of {max}")]
    TooManyColumns { cols: usize, max: usize },

    #[error("colour palette is empty")]
    EmptyPalette,

    #[error(transparent)]
    BadColor(#[from] ColorParseError),

    #[error("cells would be {width:.2}×{height:.2}px; enlarge the canvas or reduce padding/cols")]
    CellTooSmall { width: f64, height: f64 },
}

/// Rendering surface accepted by the controller.
///
/// `rows` is always [`ROWS`]; everything else is tunable.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapConfig {
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub padding: f64,
    pub label_margin: f64,
    pub scale: ColorScale,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            cols: DEFAULT_COLS,
            padding: 2.0,
            label_margin: 60.0,
            scale: ColorScale::default(),
        }
    }
}

impl HeatmapConfig {
    pub fn cell_width(&self) -> f64 {
        (self.width - self.padding * (self.cols as f64 + 1.0)) / self.cols as f64
    }

    pub fn cell_height(&self) -> f64 {
        (self.height - self.padding * (ROWS as f64 + 1.0)) / ROWS as f64
    }

    /// Full drawing surface, including the label margin.
    pub fn canvas_width(&self) -> f64 {
        self.width + self.label_margin
    }

    pub fn canvas_height(&self) -> f64 {
        self.height + self.label_margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 {
            return Err(ConfigError::ZeroColumns);
        }
        if self.cols > MAX_COLS {
            return Err(ConfigError::TooManyColumns {
                cols: self.cols,
                max: MAX_COLS,
            });
        }
        let (w, h) = (self.cell_width(), self.cell_height());
        if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
            return Err(ConfigError::CellTooSmall { width: w, height: h });
        }
        Ok(())
    }
}

/// Parse a comma-separated list of hex colours into a scale.
pub fn parse_palette(s: &str) -> Result<ColorScale, ConfigError> {
    let colors = s
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(Color::from_hex)
        .collect::<Result<Vec<_>, _>>()?;
    ColorScale::new(colors).ok_or(ConfigError::EmptyPalette)
}

/// Application settings, shared between the render CLI and the server.
#[derive(Debug, Clone)]
pub struct Settings {
    pub heatmap: HeatmapConfig,

    // ── state ────────────────────────────────────────────────────────
    pub birth: BirthProfile,
    pub year: i32,
    pub store_path: Option<PathBuf>,
    pub theme_file: Option<PathBuf>,
    /// Seed for reproducible jitter. `None` draws from OS entropy.
    pub seed: Option<u64>,

    // ── server ───────────────────────────────────────────────────────
    pub listen_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            heatmap: HeatmapConfig::default(),
            birth: BirthProfile::default(),
            year: chrono::Local::now().year(),
            store_path: None,
            theme_file: None,
            seed: None,
            listen_addr: "0.0.0.0:8090".into(),
        }
    }
}

impl Settings {
    /// Default config path.
    pub fn default_path() -> &'static str {
        "/etc/heatmap/heatmap.conf"
    }
}

/// Load and validate a `KEY=VALUE` configuration file.
///
/// Unknown keys are ignored. Malformed numbers fall back to their default
/// with a warning; an invalid birth date, palette or geometry is an error.
pub fn load(path: &Path) -> Result<Settings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config: {}", path.display()))?;
    let settings = from_str(&text)?;
    info!("Loaded config from {}", path.display());
    Ok(settings)
}

/// Parse settings from config text.
pub fn from_str(text: &str) -> Result<Settings> {
    let map = parse_conf(text);
    let defaults = Settings::default();

    let get = |key: &str| -> Option<String> { map.get(key).cloned().filter(|v| !v.is_empty()) };
    fn parsed<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> T {
        match raw {
            Some(v) => v.parse().unwrap_or_else(|_| {
                warn!("Ignoring malformed {key}={v:?}");
                default
            }),
            None => default,
        }
    }

    let scale = match get("PALETTE") {
        Some(p) => parse_palette(&p).context("Invalid PALETTE")?,
        None => defaults.heatmap.scale.clone(),
    };
    let heatmap = HeatmapConfig {
        width: parsed("WIDTH", get("WIDTH"), defaults.heatmap.width),
        height: parsed("HEIGHT", get("HEIGHT"), defaults.heatmap.height),
        cols: parsed("COLS", get("COLS"), defaults.heatmap.cols),
        padding: parsed("PADDING", get("PADDING"), defaults.heatmap.padding),
        label_margin: parsed("LABEL_MARGIN", get("LABEL_MARGIN"), defaults.heatmap.label_margin),
        scale,
    };
    heatmap.validate().context("Invalid heatmap geometry")?;

    let birth = match get("BIRTH_DATE") {
        Some(b) => b
            .parse()
            .with_context(|| format!("Invalid BIRTH_DATE {b:?}"))?,
        None => defaults.birth,
    };

    Ok(Settings {
        heatmap,
        birth,
        year: parsed("YEAR", get("YEAR"), defaults.year),
        store_path: get("STORE_PATH").map(PathBuf::from),
        theme_file: get("THEME_FILE").map(PathBuf::from),
        seed: get("SEED").and_then(|v| match v.parse() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!("Ignoring malformed SEED={v:?}, drawing from entropy");
                None
            }
        }),
        listen_addr: get("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
    })
}

/// Parse `KEY=VALUE` lines into a map, stripping optional double-quotes.
fn parse_conf(text: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            let key = key.trim();
            let val = val.trim().trim_matches('"');
            map.insert(key.to_string(), val.to_string());
        }
    }
    map
}

// ─── tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_conf() {
        let text = r##"
# comment
WIDTH=1060
PALETTE="#000000, #ffffff"
LISTEN_ADDR=127.0.0.1:9000
"##;
        let map = parse_conf(text);
        assert_eq!(map["WIDTH"], "1060");
        assert_eq!(map["PALETTE"], "#000000, #ffffff");
        assert_eq!(map["LISTEN_ADDR"], "127.0.0.1:9000");
    }

    #[test]
    fn test_defaults() {
        let s = from_str("").unwrap();
        assert_eq!(s.heatmap, HeatmapConfig::default());
        assert_eq!(s.birth, BirthProfile::default());
        assert_eq!(s.listen_addr, "0.0.0.0:8090");
        assert!(s.seed.is_none());
    }

    #[test]
    fn test_full_config() {
        let text = "WIDTH=1060\nCOLS=52\nBIRTH_DATE=1985-11-03\nYEAR=2024\nSEED=9\n\
                    PALETTE=#000,#fff\nSTORE_PATH=/tmp/p.json\n";
        let s = from_str(text).unwrap();
        assert_eq!(s.heatmap.width, 1060.0);
        assert_eq!(s.heatmap.cols, 52);
        assert_eq!(s.birth, BirthProfile::new(1985, 11, 3).unwrap());
        assert_eq!(s.year, 2024);
        assert_eq!(s.seed, Some(9));
        assert_eq!(s.heatmap.scale.palette().len(), 2);
        assert_eq!(s.store_path, Some(PathBuf::from("/tmp/p.json")));
    }

    #[test]
    fn test_malformed_number_falls_back() {
        let s = from_str("WIDTH=wide\n").unwrap();
        assert_eq!(s.heatmap.width, 800.0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(from_str("BIRTH_DATE=1990-02-30\n").is_err());
        assert!(from_str("COLS=0\n").is_err());
        assert!(from_str("PALETTE=#12\n").is_err());
        assert!(from_str("PALETTE= , \n").is_err());
        assert!(from_str("WIDTH=50\n").is_err());
    }

    #[test]
    fn test_column_cap() {
        let err = from_str("PADDING=0\nCOLS=100000000000\n").unwrap_err();
        assert!(format!("{err:#}").contains("exceed the maximum"));

        let c = HeatmapConfig {
            cols: MAX_COLS + 1,
            padding: 0.0,
            ..HeatmapConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::TooManyColumns {
                cols: MAX_COLS + 1,
                max: MAX_COLS
            })
        );
        let c = HeatmapConfig {
            cols: MAX_COLS,
            padding: 0.0,
            ..HeatmapConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_seed_parsing() {
        assert_eq!(from_str("SEED=7\n").unwrap().seed, Some(7));
        assert_eq!(from_str("SEED=lucky\n").unwrap().seed, None);
    }

    #[test]
    fn test_cell_geometry() {
        let c = HeatmapConfig::default();
        // (800 - 2 * 54) / 53
        assert!((c.cell_width() - 692.0 / 53.0).abs() < 1e-9);
        // (300 - 2 * 8) / 7
        assert!((c.cell_height() - 284.0 / 7.0).abs() < 1e-9);
        assert_eq!(c.canvas_width(), 860.0);
        assert_eq!(c.canvas_height(), 360.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_load_file() {
        let dir = std::env::temp_dir().join("heatmap_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("test.conf");
        std::fs::write(&path, "YEAR=2023\n").unwrap();
        assert_eq!(load(&path).unwrap().year, 2023);
        assert!(load(&dir.join("missing.conf")).is_err());
    }
}

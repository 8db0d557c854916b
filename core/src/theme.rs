//! Visual theme – colours and label texts, optionally loaded from TOML.
//!
//! ```toml
//! palette = ["#F2B652", "#E8E284", "#ACE08C", "#54D99F", "#26C4A5"]
//! empty_fill = "#f8f8f8"
//! stroke = "#e0e0e0"
//! label = "#666666"
//! font_size = 12.0
//! weekday_labels = ["", "Tue", "", "Thu", "", "Sat", ""]
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::color::{Color, ColorScale};

const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Full English weekday name for a row (Monday = 0).
pub fn weekday_name(row: usize) -> &'static str {
    match row {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        6 => "Sunday",
        _ => "?",
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Overrides the configured palette when present.
    pub palette: Option<Vec<Color>>,
    pub empty_fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    pub label: Color,
    pub font_size: f64,
    /// Per-row text; empty strings are not drawn.
    pub weekday_labels: [String; 7],
    pub month_labels: [String; 12],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: None,
            empty_fill: Color::new(0xf8, 0xf8, 0xf8),
            stroke: Color::new(0xe0, 0xe0, 0xe0),
            stroke_width: 1.0,
            label: Color::new(0x66, 0x66, 0x66),
            font_size: 12.0,
            weekday_labels: WEEKDAY_NAMES.map(|name| match name {
                "Tue" | "Thu" | "Sat" => name.to_string(),
                _ => String::new(),
            }),
            month_labels: [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ]
            .map(String::from),
        }
    }
}

impl Theme {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read theme: {}", path.display()))?;
        let theme: Theme = toml::from_str(&text)
            .with_context(|| format!("Invalid theme: {}", path.display()))?;
        if matches!(&theme.palette, Some(p) if p.is_empty()) {
            anyhow::bail!("Theme {} has an empty palette", path.display());
        }
        info!("Loaded theme from {}", path.display());
        Ok(theme)
    }

    /// Theme palette if set, otherwise `fallback`.
    pub fn scale_or(&self, fallback: &ColorScale) -> ColorScale {
        self.palette
            .clone()
            .and_then(ColorScale::new)
            .unwrap_or_else(|| fallback.clone())
    }

    pub fn month_label(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|i| self.month_labels.get(i as usize))
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn weekday_label(&self, row: usize) -> &str {
        self.weekday_labels.get(row).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels() {
        let t = Theme::default();
        assert_eq!(t.weekday_label(0), "");
        assert_eq!(t.weekday_label(1), "Tue");
        assert_eq!(t.weekday_label(5), "Sat");
        assert_eq!(t.weekday_label(9), "");
        assert_eq!(t.month_label(1), "Jan");
        assert_eq!(t.month_label(12), "Dec");
        assert_eq!(t.month_label(0), "?");
        assert_eq!(weekday_name(6), "Sunday");
    }

    #[test]
    fn test_partial_toml() {
        let t: Theme = toml::from_str(
            r##"
palette = ["#000000", "#ffffff"]
font_size = 14.0
"##,
        )
        .unwrap();
        assert_eq!(t.font_size, 14.0);
        assert_eq!(t.stroke, Theme::default().stroke);
        let scale = t.scale_or(&ColorScale::default());
        assert_eq!(scale.palette().len(), 2);
    }

    #[test]
    fn test_bad_color_rejected() {
        assert!(toml::from_str::<Theme>(r##"stroke = "#zzzzzz""##).is_err());
    }

    #[test]
    fn test_scale_fallback() {
        let t = Theme::default();
        assert_eq!(t.scale_or(&ColorScale::default()), ColorScale::default());
    }

    #[test]
    fn test_load_rejects_empty_palette() {
        let dir = std::env::temp_dir().join("heatmap_theme_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.toml");
        std::fs::write(&path, "palette = []\n").unwrap();
        assert!(Theme::load(&path).is_err());
    }
}

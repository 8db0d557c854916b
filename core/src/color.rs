//! Colours and the value → palette bucketing used by the heatmap.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("colour {0:?} must look like #RRGGBB or #RGB")]
    BadFormat(String),
}

/// 8-bit RGB colour. Serialises as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (leading `#` optional, case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let bad = || ColorParseError::BadFormat(s.to_string());
        let hex = s.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let channel = |i: usize, len: usize| -> Result<u8, ColorParseError> {
            let v = u8::from_str_radix(&hex[i..i + len], 16).map_err(|_| bad())?;
            Ok(if len == 1 { v * 17 } else { v })
        };
        match hex.len() {
            6 => Ok(Self::new(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
            3 => Ok(Self::new(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
            _ => Err(bad()),
        }
    }

    /// Lower-case `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_hex()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Warm-to-teal default palette.
pub const DEFAULT_PALETTE: [Color; 5] = [
    Color::new(0xF2, 0xB6, 0x52),
    Color::new(0xE8, 0xE2, 0x84),
    Color::new(0xAC, 0xE0, 0x8C),
    Color::new(0x54, 0xD9, 0x9F),
    Color::new(0x26, 0xC4, 0xA5),
];

/// Ordered, non-empty palette indexed by a normalised value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScale {
    palette: Vec<Color>,
}

impl ColorScale {
    /// `None` for an empty palette.
    pub fn new(palette: Vec<Color>) -> Option<Self> {
        if palette.is_empty() {
            None
        } else {
            Some(Self { palette })
        }
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    /// Bucket `floor(value * (n - 1))`, clamped into the palette.
    ///
    /// Out-of-range and NaN inputs clamp instead of failing; only `1.0` (or
    /// above) reaches the last bucket.
    pub fn bucket(&self, value: f64) -> usize {
        let last = self.palette.len() - 1;
        let raw = (value * last as f64).floor();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as usize).min(last)
        }
    }

    pub fn color_for(&self, value: f64) -> Color {
        self.palette[self.bucket(value)]
    }
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

/// Gauge colour for a total score, used by tooltip consumers.
pub fn gauge_color(total: u8) -> Color {
    match total {
        80.. => Color::new(0x27, 0xae, 0x60),
        60..=79 => Color::new(0xf3, 0x9c, 0x12),
        40..=59 => Color::new(0xe6, 0x7e, 0x22),
        _ => Color::new(0xe7, 0x4c, 0x3c),
    }
}

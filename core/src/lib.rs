//! Fortune heatmap core: scores every day of a year against a birth date and
//! lays the results out as a 7 × N weekday/week grid ready for drawing.
//!
//! Data flows one way:
//! `BirthProfile` + year → [`grid::CalendarGridBuilder`] (scoring each day with
//! [`score::FortuneScoreEngine`]) → [`grid::Grid`] → [`layout::HeatmapLayout`]
//! → [`render::RenderCommands`] for an external backend.

pub mod color;
pub mod config;
pub mod controller;
pub mod grid;
pub mod layout;
pub mod profile;
pub mod protocol;
pub mod random;
pub mod render;
pub mod score;
pub mod store;
pub mod theme;
pub mod tooltip;

pub use color::{Color, ColorScale};
pub use config::{ConfigError, HeatmapConfig, Settings};
pub use controller::{HeatmapController, Phase};
pub use grid::{CalendarGridBuilder, DayCell, Grid, ROWS};
pub use layout::{HeatmapLayout, Rect};
pub use profile::{BirthProfile, ValidationError};
pub use random::{ChaChaSource, RandomSource, RngSource, SequenceRandom};
pub use render::{RenderCommand, RenderCommands};
pub use score::{FortuneScoreEngine, ScoreBreakdown};

//! Heatmap controller – owns the current year, birth profile, grid and
//! layout, and rebuilds them wholesale whenever an input changes.
//!
//! There is no incremental patching: every day's score depends on the
//! profile, so a profile or year change rescores the full year. Rebuilds are
//! synchronous; a new grid simply replaces the old one.

use anyhow::Context;
use tracing::{debug, info, warn};

use crate::config::{ConfigError, HeatmapConfig, Settings};
use crate::grid::{CalendarGridBuilder, DayCell, Grid};
use crate::layout::HeatmapLayout;
use crate::profile::BirthProfile;
use crate::protocol::{CellInfo, StateResponse, TooltipResponse};
use crate::random::{ChaChaSource, RandomSource};
use crate::render::{build_commands, RenderCommands};
use crate::score::FortuneScoreEngine;
use crate::store::{JsonFileStore, ProfileStore};
use crate::theme::Theme;
use crate::tooltip::TooltipPlacement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Rebuilding,
}

pub struct HeatmapController<R> {
    config: HeatmapConfig,
    theme: Theme,
    engine: FortuneScoreEngine<R>,
    profile: BirthProfile,
    year: i32,
    grid: Grid,
    layout: HeatmapLayout,
    phase: Phase,
    generation: u64,
    store: Option<Box<dyn ProfileStore>>,
}

impl<R: RandomSource> HeatmapController<R> {
    pub fn new(
        config: HeatmapConfig,
        profile: BirthProfile,
        year: i32,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = HeatmapLayout::new(&config);
        let mut this = Self {
            grid: Grid::empty(year, config.cols),
            config,
            theme: Theme::default(),
            engine: FortuneScoreEngine::new(rng),
            profile,
            year,
            layout,
            phase: Phase::Idle,
            generation: 0,
            store: None,
        };
        this.rebuild();
        Ok(this)
    }

    /// Replace the theme. A theme palette overrides the configured one.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.config.scale = theme.scale_or(&self.config.scale);
        self.theme = theme;
        self
    }

    /// Attach a persistence adapter and adopt its stored profile, if any.
    ///
    /// A stored profile that cannot be read is logged and ignored.
    pub fn attach_store(&mut self, store: Box<dyn ProfileStore>) {
        match store.load() {
            Ok(Some(profile)) => {
                info!("Using stored birth profile {profile}");
                self.profile = profile;
                self.store = Some(store);
                self.rebuild();
            }
            Ok(None) => self.store = Some(store),
            Err(e) => {
                warn!("Ignoring stored birth profile: {e:#}");
                self.store = Some(store);
            }
        }
    }

    // ── accessors ────────────────────────────────────────────────────

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn profile(&self) -> &BirthProfile {
        &self.profile
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &HeatmapLayout {
        &self.layout
    }

    pub fn config(&self) -> &HeatmapConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of completed rebuilds.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn state(&self) -> StateResponse {
        StateResponse {
            year: self.year,
            birth: self.profile,
            generation: self.generation,
            occupied: self.grid.occupied(),
            truncated_days: self.grid.truncated_days(),
        }
    }

    // ── transitions ──────────────────────────────────────────────────

    pub fn set_year(&mut self, year: i32) {
        self.year = year;
        self.rebuild();
    }

    /// Replace the profile, rebuild, and report it to the store.
    pub fn set_birth_profile(&mut self, profile: BirthProfile) {
        self.profile = profile;
        self.rebuild();
        if let Some(store) = &self.store {
            if let Err(e) = store.save(&profile) {
                warn!("Cannot persist birth profile {profile}: {e:#}");
            }
        }
    }

    /// Rescore with fresh randomness; inputs unchanged.
    pub fn regenerate(&mut self) {
        self.rebuild();
    }

    /// Change the drawing area. Only geometry is recomputed.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Result<(), ConfigError> {
        let resized = HeatmapConfig {
            width,
            height,
            ..self.config.clone()
        };
        resized.validate()?;
        self.config = resized;
        self.layout = HeatmapLayout::new(&self.config);
        debug!("Canvas resized to {width}×{height}");
        Ok(())
    }

    fn rebuild(&mut self) {
        self.phase = Phase::Rebuilding;
        self.grid =
            CalendarGridBuilder::build(self.year, &self.profile, &mut self.engine, self.config.cols);
        self.layout = HeatmapLayout::new(&self.config);
        self.generation += 1;
        self.phase = Phase::Idle;
        debug!(
            "Rebuilt heatmap (year={}, birth={}, generation={}, cells={})",
            self.year,
            self.profile,
            self.generation,
            self.grid.occupied()
        );
    }

    // ── queries ──────────────────────────────────────────────────────

    /// Day under a canvas pixel.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<&DayCell> {
        let (row, col) = self.layout.cell_at(&self.grid, x, y)?;
        self.grid.get(row, col)
    }

    pub fn cell_info_at(&self, x: f64, y: f64) -> Option<CellInfo> {
        self.cell_at(x, y).map(CellInfo::from)
    }

    /// Tooltip data for the cell under a pixel, anchored at the cell centre.
    pub fn tooltip_at(&self, x: f64, y: f64, viewport: (f64, f64)) -> Option<TooltipResponse> {
        let cell = self.cell_at(x, y)?;
        let anchor = self.layout.cell_rect(cell.row, cell.col).center();
        Some(TooltipResponse::new(
            CellInfo::from(cell),
            TooltipPlacement::beside(anchor, viewport),
        ))
    }

    pub fn render(&self) -> RenderCommands {
        build_commands(&self.grid, &self.layout, &self.config.scale, &self.theme)
    }
}

impl HeatmapController<ChaChaSource> {
    /// Controller wired from loaded settings: seeded or entropy RNG, the
    /// optional theme file and the optional JSON profile store.
    pub fn from_settings(settings: &Settings, year: i32) -> anyhow::Result<Self> {
        let rng = match settings.seed {
            Some(seed) => ChaChaSource::seeded(seed),
            None => ChaChaSource::from_entropy(),
        };
        let mut controller = Self::new(settings.heatmap.clone(), settings.birth, year, rng)
            .context("Invalid heatmap configuration")?;
        if let Some(theme_path) = &settings.theme_file {
            controller = controller.with_theme(Theme::load(theme_path)?);
        }
        if let Some(store_path) = &settings.store_path {
            controller.attach_store(Box::new(JsonFileStore::new(store_path)));
        }
        Ok(controller)
    }
}

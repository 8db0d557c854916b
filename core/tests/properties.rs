//! Property tests for the scoring engine, grid builder and layout.

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;

use heatmap_core::config::HeatmapConfig;
use heatmap_core::grid::{CalendarGridBuilder, ROWS};
use heatmap_core::layout::HeatmapLayout;
use heatmap_core::profile::BirthProfile;
use heatmap_core::random::{RngSource, SequenceRandom};
use heatmap_core::score::FortuneScoreEngine;

fn birth_strategy() -> impl Strategy<Value = BirthProfile> {
    (1900i32..2100, 1u32..=12, 1u32..=31)
        .prop_map(|(y, m, d)| BirthProfile::clamped(y, m, d).expect("clamped profile is valid"))
}

fn target_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..(365 * 300)).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() + Duration::days(offset)
    })
}

proptest! {
    #[test]
    fn scores_are_bounded(birth in birth_strategy(), target in target_strategy(), seed in any::<u64>()) {
        let mut engine = FortuneScoreEngine::new(RngSource::seeded(seed));
        let s = engine.score(&birth, target);
        for v in [s.total, s.career, s.family, s.friendship] {
            prop_assert!(v <= 100);
        }
    }

    #[test]
    fn constant_source_is_pure(birth in birth_strategy(), target in target_strategy(), f in 0.0f64..1.0) {
        let mut engine = FortuneScoreEngine::new(SequenceRandom::constant(f));
        prop_assert_eq!(engine.score(&birth, target), engine.score(&birth, target));
    }

    #[test]
    fn grid_positions_unique_and_ordered(year in 1900i32..2100, cols in 50usize..60) {
        let mut engine = FortuneScoreEngine::new(SequenceRandom::constant(0.5));
        let grid = CalendarGridBuilder::build(year, &BirthProfile::default(), &mut engine, cols);

        let mut seen = std::collections::HashSet::new();
        for cell in grid.cells() {
            prop_assert!(seen.insert((cell.row, cell.col)));
            prop_assert_eq!(cell.date.year(), year);
        }

        let dates: Vec<_> = grid.cells_by_column().map(|c| c.date).collect();
        prop_assert!(dates.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));

        let days = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() { 366 } else { 365 };
        prop_assert_eq!(grid.occupied() as u32 + grid.truncated_days(), days);
        prop_assert!(grid.occupied() <= ROWS * cols);
    }

    #[test]
    fn cell_at_inverts_cell_rect(
        year in 1950i32..2050,
        width in 400.0f64..1600.0,
        height in 120.0f64..600.0,
        padding in 0.0f64..4.0,
        margin in 0.0f64..80.0,
    ) {
        let config = HeatmapConfig { width, height, padding, label_margin: margin, ..HeatmapConfig::default() };
        prop_assume!(config.validate().is_ok());
        let layout = HeatmapLayout::new(&config);
        let mut engine = FortuneScoreEngine::new(SequenceRandom::constant(0.5));
        let grid = CalendarGridBuilder::build(year, &BirthProfile::default(), &mut engine, config.cols);

        for cell in grid.cells() {
            let (x, y) = layout.cell_rect(cell.row, cell.col).center();
            prop_assert_eq!(layout.cell_at(&grid, x, y), Some((cell.row, cell.col)));
        }
    }

    #[test]
    fn month_labels_increase_and_mark_first_column(year in 1900i32..2100) {
        let config = HeatmapConfig::default();
        let layout = HeatmapLayout::new(&config);
        let mut engine = FortuneScoreEngine::new(SequenceRandom::constant(0.5));
        let grid = CalendarGridBuilder::build(year, &BirthProfile::default(), &mut engine, config.cols);

        let labels = layout.month_label_positions(&grid);
        prop_assert_eq!(labels.len(), 12);
        prop_assert!(labels.windows(2).all(|w| w[0].month < w[1].month));
        for label in &labels {
            let first = grid.cells().filter(|c| c.month == label.month).map(|c| c.col).min();
            prop_assert_eq!(Some(label.col), first);
        }
    }
}

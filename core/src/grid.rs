//! Year → 7 × cols grid of day cells.
//!
//! Rows are weekdays (Monday = 0 … Sunday = 6) and columns are weeks
//! counted from the week containing January 1st. Slots before Jan 1 and
//! after Dec 31 stay empty.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::profile::BirthProfile;
use crate::random::RandomSource;
use crate::score::{FortuneScoreEngine, ScoreBreakdown};

/// Weekday rows.
pub const ROWS: usize = 7;

/// Enough columns for any year whose last partial week fits.
pub const DEFAULT_COLS: usize = 53;

/// A scored day at a fixed grid slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub row: usize,
    pub col: usize,
    /// `breakdown.total / 100`.
    pub value: f64,
    pub breakdown: ScoreBreakdown,
    pub month: u32,
}

/// Fixed-shape, index-addressed matrix of optional cells (row-major).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    year: i32,
    cols: usize,
    slots: Vec<Option<DayCell>>,
    truncated: u32,
}

impl Grid {
    pub fn empty(year: i32, cols: usize) -> Self {
        Self {
            year,
            cols,
            slots: vec![None; ROWS * cols],
            truncated: 0,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, col)`; `None` for empty or out-of-range slots.
    pub fn get(&self, row: usize, col: usize) -> Option<&DayCell> {
        if row >= ROWS || col >= self.cols {
            return None;
        }
        self.slots[row * self.cols + col].as_ref()
    }

    /// Days of the year that did not fit in the configured columns.
    pub fn truncated_days(&self) -> u32 {
        self.truncated
    }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &DayCell> + '_ {
        self.slots.iter().flatten()
    }

    /// Occupied cells column by column, top to bottom: chronological order.
    pub fn cells_by_column(&self) -> impl Iterator<Item = &DayCell> + '_ {
        (0..self.cols).flat_map(move |c| (0..ROWS).filter_map(move |r| self.get(r, c)))
    }

    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// `(row, col)` of every occupied slot.
    pub fn occupancy(&self) -> Vec<(usize, usize)> {
        self.cells().map(|c| (c.row, c.col)).collect()
    }

    fn put(&mut self, cell: DayCell) {
        let idx = cell.row * self.cols + cell.col;
        self.slots[idx] = Some(cell);
    }
}

/// Lays a year out onto the weekday × week grid, scoring every placed day.
pub struct CalendarGridBuilder;

impl CalendarGridBuilder {
    /// Build the grid for `year`.
    ///
    /// Iteration stops as soon as the week index reaches `cols`; days past
    /// that point are dropped (counted in [`Grid::truncated_days`]) rather
    /// than reported as an error. A year chrono cannot represent yields an
    /// empty grid.
    pub fn build<R: RandomSource>(
        year: i32,
        birth: &BirthProfile,
        engine: &mut FortuneScoreEngine<R>,
        cols: usize,
    ) -> Grid {
        let mut grid = Grid::empty(year, cols);
        let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            warn!("Year {year} is outside the supported calendar range");
            return grid;
        };

        let mut date = first;
        let mut weekday = first.weekday().num_days_from_monday() as usize;
        let mut week = 0usize;
        let mut placed = 0u32;

        while date.year() == year && week < cols {
            let breakdown = engine.score(birth, date);
            grid.put(DayCell {
                date,
                row: weekday,
                col: week,
                value: breakdown.normalized(),
                breakdown,
                month: date.month(),
            });
            placed += 1;

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
            weekday += 1;
            if weekday == ROWS {
                weekday = 0;
                week += 1;
            }
        }

        let days_in_year = first.with_ordinal(366).map_or(365, |_| 366);
        grid.truncated = days_in_year - placed;
        if grid.truncated > 0 {
            // Trailing days beyond the last column are dropped, not wrapped.
            warn!(
                "Grid for {year} truncated: {} day(s) do not fit in {cols} column(s)",
                grid.truncated
            );
        }
        debug!("Built grid for {year}: {placed} cell(s), {cols} column(s)");
        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SequenceRandom;

    fn build(year: i32, cols: usize) -> Grid {
        let mut engine = FortuneScoreEngine::new(SequenceRandom::constant(0.5));
        CalendarGridBuilder::build(year, &BirthProfile::default(), &mut engine, cols)
    }

    #[test]
    fn test_leap_year_fills_366() {
        let g = build(2024, DEFAULT_COLS);
        assert_eq!(g.occupied(), 366);
        assert_eq!(g.truncated_days(), 0);
    }

    #[test]
    fn test_common_year_fills_365() {
        let g = build(2023, DEFAULT_COLS);
        assert_eq!(g.occupied(), 365);
    }

    #[test]
    fn test_first_day_position() {
        // 2024-01-01 is a Monday, 2023-01-01 a Sunday.
        let g = build(2024, DEFAULT_COLS);
        assert_eq!(g.get(0, 0).unwrap().date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let g = build(2023, DEFAULT_COLS);
        assert!(g.get(0, 0).is_none());
        assert_eq!(g.get(6, 0).unwrap().date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(g.get(0, 1).unwrap().date, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        // Dec 31 2023 is a Sunday in week 52.
        assert_eq!(g.get(6, 52).unwrap().date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_truncation_cols_52() {
        // 52 full weeks starting Monday hold 364 days; Dec 30 and 31 drop.
        let g = build(2024, 52);
        assert_eq!(g.occupied(), 52 * 7);
        assert_eq!(g.truncated_days(), 2);
        let last = g.cells_by_column().last().unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 12, 29).unwrap());
    }

    #[test]
    fn test_truncation_with_default_cols() {
        // 2012 starts on a Sunday and is a leap year: 54 weeks are touched.
        let g = build(2012, DEFAULT_COLS);
        assert_eq!(g.occupied(), 365);
        assert_eq!(g.truncated_days(), 1);
        let dec31 = NaiveDate::from_ymd_opt(2012, 12, 31).unwrap();
        assert!(g.cells().all(|c| c.date != dec31));
    }

    #[test]
    fn test_zero_cols_is_empty() {
        let g = build(2024, 0);
        assert_eq!(g.occupied(), 0);
        assert_eq!(g.truncated_days(), 366);
    }

    #[test]
    fn test_unrepresentable_year() {
        let g = build(i32::MAX, DEFAULT_COLS);
        assert_eq!(g.occupied(), 0);
    }

    #[test]
    fn test_chronological_column_major() {
        let g = build(2025, DEFAULT_COLS);
        let dates: Vec<_> = g.cells_by_column().map(|c| c.date).collect();
        assert_eq!(dates.len(), 365);
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_cell_fields() {
        let g = build(2024, DEFAULT_COLS);
        for c in g.cells() {
            assert_eq!(c.row, c.date.weekday().num_days_from_monday() as usize);
            assert_eq!(c.month, c.date.month());
            assert_eq!(c.value, c.breakdown.total as f64 / 100.0);
            assert_eq!(g.get(c.row, c.col), Some(c));
        }
        assert!(g.get(7, 0).is_none());
        assert!(g.get(0, 53).is_none());
    }
}

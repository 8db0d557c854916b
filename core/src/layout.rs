//! Pixel geometry for a heatmap grid: cell rectangles, label anchors and
//! the inverse pixel → slot lookup.
//!
//! Cell `(r, c)` starts at
//! `margin + padding + c·(cell_w + padding)` horizontally and
//! `margin + padding + r·(cell_h + padding)` vertically.

use serde::{Deserialize, Serialize};

use crate::config::HeatmapConfig;
use crate::grid::{Grid, ROWS};

/// Baseline of the month labels.
pub const MONTH_LABEL_Y: f64 = 10.0;
/// Gap between the weekday labels' right edge and the grid margin.
pub const WEEKDAY_LABEL_GAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthLabel {
    pub month: u32,
    pub col: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeekdayLabel {
    pub row: usize,
    pub x: f64,
    pub y: f64,
}

/// Derived geometry; owns no grid data and is rebuilt whenever the canvas
/// size or column count changes.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapLayout {
    cols: usize,
    cell_width: f64,
    cell_height: f64,
    padding: f64,
    margin: f64,
    canvas_width: f64,
    canvas_height: f64,
}

impl HeatmapLayout {
    /// Expects a validated config.
    pub fn new(config: &HeatmapConfig) -> Self {
        Self {
            cols: config.cols,
            cell_width: config.cell_width(),
            cell_height: config.cell_height(),
            padding: config.padding,
            margin: config.label_margin,
            canvas_width: config.canvas_width(),
            canvas_height: config.canvas_height(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn canvas_size(&self) -> (f64, f64) {
        (self.canvas_width, self.canvas_height)
    }

    fn col_x(&self, col: usize) -> f64 {
        self.margin + self.padding + col as f64 * (self.cell_width + self.padding)
    }

    fn row_y(&self, row: usize) -> f64 {
        self.margin + self.padding + row as f64 * (self.cell_height + self.padding)
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        Rect {
            x: self.col_x(col),
            y: self.row_y(row),
            width: self.cell_width,
            height: self.cell_height,
        }
    }

    /// Slot under a pixel, regardless of occupancy.
    ///
    /// Subtracts the margin and divides by the cell pitch; the padding strip
    /// after a cell belongs to that cell.
    pub fn slot_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = ((x - self.margin) / (self.cell_width + self.padding)).floor();
        let row = ((y - self.margin) / (self.cell_height + self.padding)).floor();
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < ROWS && col < self.cols).then_some((row, col))
    }

    /// Occupied slot under a pixel; `None` off-grid or on an empty slot.
    pub fn cell_at(&self, grid: &Grid, x: f64, y: f64) -> Option<(usize, usize)> {
        let (row, col) = self.slot_at(x, y)?;
        grid.get(row, col).map(|_| (row, col))
    }

    /// One label per month change, scanning columns left to right and each
    /// column top to bottom.
    pub fn month_label_positions(&self, grid: &Grid) -> Vec<MonthLabel> {
        let mut labels = Vec::new();
        let mut last_month = 0;
        for col in 0..grid.cols().min(self.cols) {
            let changed = (0..ROWS)
                .filter_map(|row| grid.get(row, col))
                .find(|cell| cell.month != last_month);
            if let Some(cell) = changed {
                labels.push(MonthLabel {
                    month: cell.month,
                    col,
                    x: self.col_x(col) + self.cell_width / 2.0,
                    y: MONTH_LABEL_Y,
                });
                last_month = cell.month;
            }
        }
        labels
    }

    /// Anchor (right-aligned, vertically centred) for every weekday row.
    pub fn weekday_label_positions(&self) -> Vec<WeekdayLabel> {
        (0..ROWS)
            .map(|row| WeekdayLabel {
                row,
                x: self.margin - WEEKDAY_LABEL_GAP,
                y: self.row_y(row) + self.cell_height / 2.0,
            })
            .collect()
    }
}

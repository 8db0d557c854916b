//! Shared HTTP protocol types between the heatmap server and its clients.

use serde::{Deserialize, Serialize};

use crate::color::{gauge_color, Color};
use crate::grid::DayCell;
use crate::score::ScoreBreakdown;
use crate::theme::weekday_name;
use crate::tooltip::TooltipPlacement;

/// Hit-test result for a hovered cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellInfo {
    pub row: usize,
    pub col: usize,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub weekday: String,
    pub value: f64,
    pub scores: ScoreBreakdown,
}

impl From<&DayCell> for CellInfo {
    fn from(cell: &DayCell) -> Self {
        CellInfo {
            row: cell.row,
            col: cell.col,
            date: cell.date.format("%Y-%m-%d").to_string(),
            weekday: weekday_name(cell.row).to_string(),
            value: cell.value,
            scores: cell.breakdown,
        }
    }
}

/// Everything a tooltip renderer needs: the cell, where to put the box and
/// the gauge colour for the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipResponse {
    pub cell: CellInfo,
    pub placement: TooltipPlacement,
    pub gauge_color: Color,
}

impl TooltipResponse {
    pub fn new(cell: CellInfo, placement: TooltipPlacement) -> Self {
        let gauge_color = gauge_color(cell.scores.total);
        Self {
            cell,
            placement,
            gauge_color,
        }
    }
}

/// Health-check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

/// Body of `PUT /api/year`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YearRequest {
    pub year: i32,
}

/// Body of `PUT /api/canvas`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CanvasRequest {
    pub width: f64,
    pub height: f64,
}

/// Current controller state, returned after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateResponse {
    pub year: i32,
    pub birth: crate::profile::BirthProfile,
    pub generation: u64,
    pub occupied: usize,
    pub truncated_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_info_from_day_cell() {
        let breakdown = ScoreBreakdown {
            total: 83,
            career: 70,
            family: 60,
            friendship: 90,
        };
        let cell = DayCell {
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            row: 3,
            col: 4,
            value: 0.83,
            breakdown,
            month: 2,
        };
        let info = CellInfo::from(&cell);
        assert_eq!(info.date, "2024-02-01");
        assert_eq!(info.weekday, "Thursday");

        let t = TooltipResponse::new(info, TooltipPlacement::beside((0.0, 300.0), (800.0, 600.0)));
        assert_eq!(t.gauge_color.to_hex(), "#27ae60");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["cell"]["scores"]["friendship"], 90);
        assert_eq!(json["gauge_color"], "#27ae60");
    }
}

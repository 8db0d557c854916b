//! Declarative draw list handed to an external backend.
//!
//! The core never touches a drawing surface; backends (PNG, SVG, a browser
//! canvas) execute these commands in order.

use serde::{Deserialize, Serialize};

use crate::color::{Color, ColorScale};
use crate::grid::{Grid, ROWS};
use crate::layout::{HeatmapLayout, Rect};
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextBaseline {
    Top,
    Middle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: Color,
        font_size: f64,
        align: TextAlign,
        baseline: TextBaseline,
    },
}

/// Ordered commands plus the surface size they assume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderCommands {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<RenderCommand>,
}

impl RenderCommands {
    pub fn fills(&self) -> impl Iterator<Item = (&Rect, &Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::FillRect { rect, color } => Some((rect, color)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Weekday labels, then month labels, then every slot (fill + stroke).
pub fn build_commands(
    grid: &Grid,
    layout: &HeatmapLayout,
    scale: &ColorScale,
    theme: &Theme,
) -> RenderCommands {
    let (width, height) = layout.canvas_size();
    let mut commands = Vec::with_capacity(ROWS * layout.cols() * 2 + 24);

    for label in layout.weekday_label_positions() {
        let text = theme.weekday_label(label.row);
        if text.is_empty() {
            continue;
        }
        commands.push(RenderCommand::Text {
            x: label.x,
            y: label.y,
            text: text.to_string(),
            color: theme.label,
            font_size: theme.font_size,
            align: TextAlign::Right,
            baseline: TextBaseline::Middle,
        });
    }

    for label in layout.month_label_positions(grid) {
        commands.push(RenderCommand::Text {
            x: label.x,
            y: label.y,
            text: theme.month_label(label.month).to_string(),
            color: theme.label,
            font_size: theme.font_size,
            align: TextAlign::Center,
            baseline: TextBaseline::Top,
        });
    }

    for row in 0..ROWS {
        for col in 0..layout.cols() {
            let rect = layout.cell_rect(row, col);
            let color = grid
                .get(row, col)
                .map(|cell| scale.color_for(cell.value))
                .unwrap_or(theme.empty_fill);
            commands.push(RenderCommand::FillRect { rect, color });
            commands.push(RenderCommand::StrokeRect {
                rect,
                color: theme.stroke,
                line_width: theme.stroke_width,
            });
        }
    }

    RenderCommands {
        width,
        height,
        commands,
    }
}

//! Raster backend – executes `RenderCommands` onto an RGB image.
//!
//! Rectangles only; text commands are skipped since no font rasteriser is
//! bundled. Use the SVG backend when labels matter.

use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use tracing::debug;

use heatmap_core::color::Color;
use heatmap_core::layout::Rect;
use heatmap_core::render::{RenderCommand, RenderCommands};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

fn rgb(c: &Color) -> Rgb<u8> {
    Rgb([c.r, c.g, c.b])
}

/// Pixel span `[start, end)` covered by `[pos, pos + len)`, clipped to `max`.
fn span(pos: f64, len: f64, max: u32) -> (u32, u32) {
    let start = pos.round().clamp(0.0, max as f64) as u32;
    let end = (pos + len).round().clamp(0.0, max as f64) as u32;
    (start, end.max(start))
}

fn fill(img: &mut RgbImage, rect: &Rect, color: Rgb<u8>) {
    let (x0, x1) = span(rect.x, rect.width, img.width());
    let (y0, y1) = span(rect.y, rect.height, img.height());
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}

fn stroke(img: &mut RgbImage, rect: &Rect, color: Rgb<u8>, line_width: f64) {
    let lw = line_width.max(1.0);
    let edges = [
        Rect { height: lw, ..*rect },
        Rect { y: rect.y + rect.height - lw, height: lw, ..*rect },
        Rect { width: lw, ..*rect },
        Rect { x: rect.x + rect.width - lw, width: lw, ..*rect },
    ];
    for edge in &edges {
        fill(img, edge, color);
    }
}

/// Rasterise the command list.
pub fn rasterize(cmds: &RenderCommands) -> RgbImage {
    let w = cmds.width.ceil().max(1.0) as u32;
    let h = cmds.height.ceil().max(1.0) as u32;
    let mut img = RgbImage::from_pixel(w, h, BACKGROUND);

    let mut skipped = 0usize;
    for cmd in &cmds.commands {
        match cmd {
            RenderCommand::FillRect { rect, color } => fill(&mut img, rect, rgb(color)),
            RenderCommand::StrokeRect { rect, color, line_width } => {
                stroke(&mut img, rect, rgb(color), *line_width)
            }
            RenderCommand::Text { .. } => skipped += 1,
        }
    }
    debug!("Rasterised {}×{} image ({skipped} text command(s) skipped)", w, h);
    img
}

/// Rasterise and write a PNG.
pub fn write(cmds: &RenderCommands, out_path: &Path) -> Result<()> {
    let img = rasterize(cmds);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    img.save(out_path)
        .with_context(|| format!("Cannot write heatmap to {}", out_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect { x, y, width, height }
    }

    #[test]
    fn test_fill_and_stroke() {
        let red = Color::new(255, 0, 0);
        let grey = Color::new(10, 10, 10);
        let cmds = RenderCommands {
            width: 20.0,
            height: 20.0,
            commands: vec![
                RenderCommand::FillRect { rect: rect(5.0, 5.0, 10.0, 10.0), color: red },
                RenderCommand::StrokeRect { rect: rect(5.0, 5.0, 10.0, 10.0), color: grey, line_width: 1.0 },
            ],
        };
        let img = rasterize(&cmds);
        assert_eq!(img.dimensions(), (20, 20));
        assert_eq!(*img.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*img.get_pixel(10, 10), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(5, 10), Rgb([10, 10, 10]));
        assert_eq!(*img.get_pixel(14, 10), Rgb([10, 10, 10]));
        assert_eq!(*img.get_pixel(15, 10), BACKGROUND);
    }

    #[test]
    fn test_clips_to_canvas() {
        let cmds = RenderCommands {
            width: 4.0,
            height: 4.0,
            commands: vec![RenderCommand::FillRect {
                rect: rect(-10.0, 2.0, 100.0, 100.0),
                color: Color::new(1, 2, 3),
            }],
        };
        let img = rasterize(&cmds);
        assert_eq!(*img.get_pixel(0, 3), Rgb([1, 2, 3]));
        assert_eq!(*img.get_pixel(3, 1), BACKGROUND);
    }
}

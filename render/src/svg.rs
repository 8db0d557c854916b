//! Vector backend – executes `RenderCommands` as an SVG document, labels
//! included.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use heatmap_core::render::{RenderCommand, RenderCommands, TextAlign, TextBaseline};

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn to_svg(cmds: &RenderCommands) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = cmds.width,
        h = cmds.height
    );
    let _ = writeln!(out, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##);

    for cmd in &cmds.commands {
        let _ = match cmd {
            RenderCommand::FillRect { rect, color } => writeln!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{color}"/>"#,
                rect.x, rect.y, rect.width, rect.height
            ),
            RenderCommand::StrokeRect { rect, color, line_width } => writeln!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="{color}" stroke-width="{line_width}"/>"#,
                rect.x, rect.y, rect.width, rect.height
            ),
            RenderCommand::Text { x, y, text, color, font_size, align, baseline } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let baseline = match baseline {
                    TextBaseline::Top => "hanging",
                    TextBaseline::Middle => "middle",
                };
                writeln!(
                    out,
                    r#"<text x="{x:.2}" y="{y:.2}" fill="{color}" font-size="{font_size}" font-family="Arial, sans-serif" text-anchor="{anchor}" dominant-baseline="{baseline}">{}</text>"#,
                    escape(text)
                )
            }
        };
    }
    out.push_str("</svg>\n");
    out
}

pub fn write(cmds: &RenderCommands, out_path: &Path) -> Result<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out_path, to_svg(cmds))
        .with_context(|| format!("Cannot write heatmap to {}", out_path.display()))
}

//! Tooltip placement next to a hovered cell.

use serde::{Deserialize, Serialize};

pub const TOOLTIP_WIDTH: f64 = 320.0;
pub const TOOLTIP_HEIGHT: f64 = 220.0;
/// Horizontal gap between anchor and tooltip.
const OFFSET: f64 = 15.0;
/// Minimum distance kept from the viewport's top and bottom edges.
const EDGE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl TooltipPlacement {
    /// Place a `width × height` box beside `(anchor_x, anchor_y)`.
    ///
    /// Goes to the right of the anchor, vertically centred on it; flips to
    /// the left when it would cross the viewport's right edge, then keeps
    /// [`EDGE`] pixels from the top and bottom.
    pub fn compute(
        anchor: (f64, f64),
        viewport: (f64, f64),
        size: (f64, f64),
    ) -> Self {
        let (ax, ay) = anchor;
        let (vw, vh) = viewport;
        let (width, height) = size;

        let mut x = ax + OFFSET;
        let mut y = ay - height / 2.0;
        if x + width > vw {
            x = ax - width - OFFSET;
        }
        if y < 0.0 {
            y = EDGE;
        }
        if y + height > vh {
            y = vh - height - EDGE;
        }
        Self { x, y, width, height }
    }

    /// Placement with the default tooltip size.
    pub fn beside(anchor: (f64, f64), viewport: (f64, f64)) -> Self {
        Self::compute(anchor, viewport, (TOOLTIP_WIDTH, TOOLTIP_HEIGHT))
    }
}

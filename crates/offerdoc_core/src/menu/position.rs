//! Menu placement relative to the caret.

use crate::model::geometry::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Spacing rules for menu placement, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Distance between the anchor and the menu edge.
    pub gap: f32,
    /// Minimum distance kept from the right and bottom viewport edges.
    pub margin: f32,
    /// The menu top never goes above this coordinate.
    pub min_top: f32,
    /// Caret line height; a flipped menu clears the whole line.
    pub line_height: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            gap: 4.0,
            margin: 8.0,
            min_top: 8.0,
            line_height: 20.0,
        }
    }
}

/// Keeps a preferred menu rectangle inside the visible area.
///
/// Implemented by the editing surface when it owns richer layout rules.
pub trait ViewportClamp {
    fn clamp_to_viewport(&self, preferred: Rect, anchor: Point) -> Rect;
}

/// Plain viewport with flip-above and right-edge clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Size,
    pub placement: PlacementConfig,
}

impl Viewport {
    pub fn new(size: Size, placement: PlacementConfig) -> Self {
        Self { size, placement }
    }
}

impl ViewportClamp for Viewport {
    fn clamp_to_viewport(&self, preferred: Rect, anchor: Point) -> Rect {
        let config = &self.placement;
        let mut rect = preferred;

        if rect.bottom() > self.size.height - config.margin {
            rect.y = anchor.y - config.line_height - config.gap - rect.height;
        }
        if rect.right() > self.size.width - config.margin {
            rect.x = (self.size.width - rect.width - config.margin).max(0.0);
        }
        rect.y = rect.y.max(config.min_top);
        rect
    }
}

/// Places a menu of `size` below `anchor`, then clamps it to the viewport.
///
/// `anchor` is the bottom-left corner of the caret.
pub fn place_menu(
    anchor: Point,
    size: Size,
    placement: &PlacementConfig,
    viewport: &dyn ViewportClamp,
) -> Rect {
    let preferred = Rect::new(anchor.x, anchor.y + placement.gap, size.width, size.height);
    viewport.clamp_to_viewport(preferred, anchor)
}

//! Placement-preserving positioning for elements that must not be skewed.
//!
//! The element is scaled uniformly by `min(width ratio, height ratio)` and
//! then re-anchored with the first heuristic that applies:
//!
//! ```text
//! 1. edge snap   touches a canvas edge (< 1px)  → keep touching it
//! 2. centered    left/right halves within 5%    → keep the center point
//! 3. quadrant    otherwise                      → keep the nearest edges
//! ```

use serde::{Deserialize, Serialize};

use crate::{AdaptConfig, CanvasElement, Size};

/// Position and extent of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// X position (pixels from left).
    pub left: f64,
    /// Y position (pixels from top).
    pub top: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Bounds {
    /// Create bounds.
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether every field is exactly zero.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.left == 0.0 && self.top == 0.0 && self.width == 0.0 && self.height == 0.0
    }
}

/// Compute where an element lands in `target` without distorting it.
///
/// Width and height are returned in the element's own (unscaled) units when
/// the element snaps to an edge, and in canvas pixels otherwise.
#[must_use]
pub fn values_without_skewing(
    reference: Size,
    target: Size,
    element: &CanvasElement,
    config: &AdaptConfig,
) -> Bounds {
    let top = element.top.unwrap_or(0.0);
    let left = element.left.unwrap_or(0.0);
    let scale_x = element.scale_x.unwrap_or(1.0);
    let scale_y = element.scale_y.unwrap_or(1.0);
    let width = element.width.unwrap_or(1.0) * scale_x;
    let height = element.height.unwrap_or(1.0) * scale_y;

    let scale_factor = (target.width / reference.width).min(target.height / reference.height);
    let new_width = (width * scale_factor).ceil();
    let new_height = (height * scale_factor).ceil();

    let threshold = config.alignment_threshold;
    let right_aligned = (left + width - reference.width).abs() < threshold;
    let bottom_aligned = (top + height - reference.height).abs() < threshold;
    let left_aligned = left.abs() < threshold;
    let top_aligned = top.abs() < threshold;

    if right_aligned || left_aligned || bottom_aligned || top_aligned {
        let new_left = if right_aligned {
            target.width - new_width
        } else if left_aligned {
            0.0
        } else {
            (left / reference.width * target.width).ceil()
        };
        let new_top = if bottom_aligned {
            target.height - new_height
        } else if top_aligned {
            0.0
        } else {
            (top / reference.height * target.height).ceil()
        };
        return Bounds::new(new_left, new_top, new_width / scale_x, new_height / scale_y);
    }

    let center_x = left + width / 2.0;
    let center_y = top + height / 2.0;
    let right = left + width;
    let bottom = top + height;
    let canvas_center_x = reference.width / 2.0;
    let canvas_center_y = reference.height / 2.0;

    let visible_height = (bottom.min(reference.height) - top.max(0.0)).max(0.0);
    let left_area = (right.min(canvas_center_x) - left.max(0.0)).max(0.0) * visible_height;
    let right_area = (right.min(reference.width) - left.max(canvas_center_x)).max(0.0) * visible_height;

    // 0/0 leaves the comparison false, so fully clipped elements fall through.
    let centered = (left_area - right_area).abs() / (left_area + right_area) < config.center_threshold;
    if centered {
        let new_center_x = center_x / reference.width * target.width;
        let new_center_y = center_y / reference.height * target.height;
        return Bounds::new(
            new_center_x - new_width / 2.0,
            new_center_y - new_height / 2.0,
            new_width,
            new_height,
        );
    }

    let in_right_half = center_x > canvas_center_x;
    let in_bottom_half = center_y > canvas_center_y;
    let edge_x = if in_right_half { right } else { left };
    let edge_y = if in_bottom_half { bottom } else { top };
    let anchor_x = edge_x / reference.width * target.width;
    let anchor_y = edge_y / reference.height * target.height;

    Bounds::new(
        if in_right_half { anchor_x - new_width } else { anchor_x },
        if in_bottom_half { anchor_y - new_height } else { anchor_y },
        new_width,
        new_height,
    )
}

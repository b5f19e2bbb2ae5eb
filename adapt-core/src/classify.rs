//! Skew eligibility.
//!
//! Large elements and elements spanning a full canvas side are stretched per
//! axis (the skew path); everything else keeps its proportions and is
//! re-anchored by [`crate::position`].

use crate::{AdaptConfig, CanvasElement, DataType, Size};

/// Which transform an element receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptPath {
    /// Scale every coordinate independently per axis.
    Skew,
    /// Scale uniformly and preserve qualitative placement.
    NonSkew,
}

/// Raw element lengths used by the full-span test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceLengths {
    /// Element left edge.
    pub left: f64,
    /// Element top edge.
    pub top: f64,
    /// Element width, unscaled.
    pub width: f64,
    /// Element height, unscaled.
    pub height: f64,
    /// Reference canvas width.
    pub canvas_width: f64,
    /// Reference canvas height.
    pub canvas_height: f64,
}

impl ReferenceLengths {
    /// Collect the lengths of an element on a canvas.
    ///
    /// Missing position defaults to 0, missing extent to 1.
    #[must_use]
    pub fn of(element: &CanvasElement, canvas: Size) -> Self {
        Self {
            left: element.left.unwrap_or(0.0),
            top: element.top.unwrap_or(0.0),
            width: element.width.unwrap_or(1.0),
            height: element.height.unwrap_or(1.0),
            canvas_width: canvas.width,
            canvas_height: canvas.height,
        }
    }
}

/// Percentage of the canvas covered by the element's bounding box.
///
/// Missing `width`, `height` and `scaleY` count as 1. A missing `scaleX`
/// does not: the result is NaN, which never passes the skew threshold.
#[must_use]
pub fn area_percentage(element: &CanvasElement, canvas: Size) -> f64 {
    let width = element.width.unwrap_or(1.0) * element.scale_x.unwrap_or(f64::NAN);
    let height = element.height.unwrap_or(1.0) * element.scale_y.unwrap_or(1.0);
    let top = element.top.unwrap_or(0.0);
    let left = element.left.unwrap_or(0.0);

    let canvas_area = canvas.area();
    if canvas_area == 0.0 {
        return 0.0;
    }
    // f64::min/max drop NaN operands, so propagate explicitly.
    if width.is_nan() || height.is_nan() {
        return f64::NAN;
    }

    let intersection_width = (left + width).min(canvas.width) - left.max(0.0);
    let intersection_height = (top + height).min(canvas.height) - top.max(0.0);
    let intersection_area = intersection_width.max(0.0) * intersection_height.max(0.0);

    (intersection_area / canvas_area * 100.0).round()
}

/// Decide whether an element takes the skew path.
#[must_use]
pub fn should_skew(
    area_percentage: f64,
    lengths: &ReferenceLengths,
    data_type: &DataType,
    config: &AdaptConfig,
) -> bool {
    if *data_type == DataType::Group {
        return false;
    }
    if area_percentage > config.skew_area_threshold {
        return true;
    }

    let spans_full_width =
        lengths.left.floor() <= 0.0 && lengths.width.floor() >= lengths.canvas_width;
    let spans_full_height =
        lengths.top.floor() <= 0.0 && lengths.height.floor() >= lengths.canvas_height;

    spans_full_width || spans_full_height
}

/// Classify an element against the reference canvas.
#[must_use]
pub fn classify(element: &CanvasElement, canvas: Size, config: &AdaptConfig) -> AdaptPath {
    let area = area_percentage(element, canvas);
    let lengths = ReferenceLengths::of(element, canvas);
    if should_skew(area, &lengths, &element.data_type, config) {
        AdaptPath::Skew
    } else {
        AdaptPath::NonSkew
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size::new(1280.0, 720.0);

    fn shape(left: f64, top: f64, width: f64, height: f64) -> CanvasElement {
        CanvasElement::new(DataType::Shape)
            .with_frame(left, top, width, height)
            .with_scale(1.0, 1.0)
    }

    #[test]
    fn test_area_full_cover_is_100() {
        let element = shape(0.0, 0.0, 1280.0, 720.0);
        assert!((area_percentage(&element, CANVAS) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_area_outside_canvas_is_0() {
        for element in [
            shape(-500.0, 0.0, 400.0, 400.0),
            shape(1300.0, 100.0, 50.0, 50.0),
            shape(100.0, 800.0, 50.0, 50.0),
            shape(100.0, -60.0, 50.0, 50.0),
        ] {
            assert!(area_percentage(&element, CANVAS).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_area_is_clipped_and_scaled() {
        // Half of a quarter-canvas element hangs off the left edge.
        let element = shape(-320.0, 0.0, 640.0, 360.0);
        assert!((area_percentage(&element, CANVAS) - 13.0).abs() < f64::EPSILON);

        let scaled = shape(0.0, 0.0, 320.0, 180.0).with_scale(2.0, 2.0);
        assert!((area_percentage(&scaled, CANVAS) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_area_on_empty_canvas_is_0() {
        let element = shape(0.0, 0.0, 10.0, 10.0);
        assert!(area_percentage(&element, Size::new(0.0, 720.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_scale_x_yields_nan() {
        let mut element = shape(0.0, 0.0, 1280.0, 720.0);
        element.scale_x = None;
        assert!(area_percentage(&element, CANVAS).is_nan());

        element.scale_y = None;
        element.scale_x = Some(1.0);
        assert!((area_percentage(&element, CANVAS) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_group_never_skews() {
        let lengths = ReferenceLengths::of(&shape(0.0, 0.0, 1280.0, 720.0), CANVAS);
        let config = AdaptConfig::default();
        assert!(!should_skew(100.0, &lengths, &DataType::Group, &config));
        assert!(should_skew(100.0, &lengths, &DataType::Image, &config));
    }

    #[test]
    fn test_full_span_skews() {
        let config = AdaptConfig::default();
        let banner = ReferenceLengths::of(&shape(-0.5, 300.0, 1280.4, 100.0), CANVAS);
        assert!(should_skew(10.0, &banner, &DataType::Shape, &config));

        let column = ReferenceLengths::of(&shape(200.0, 0.0, 100.0, 720.0), CANVAS);
        assert!(should_skew(10.0, &column, &DataType::Text, &config));

        let inset = ReferenceLengths::of(&shape(40.0, 340.0, 1200.0, 40.0), CANVAS);
        assert!(!should_skew(5.0, &inset, &DataType::Text, &config));
    }

    #[test]
    fn test_nan_area_falls_back_to_span_test() {
        let config = AdaptConfig::default();
        let mut element = CanvasElement::new(DataType::Image).with_frame(100.0, 100.0, 1000.0, 600.0);
        assert_eq!(classify(&element, CANVAS, &config), AdaptPath::NonSkew);

        element = element.with_scale(1.0, 1.0);
        // 1000x600 of 1280x720 is 65%, still below the threshold.
        assert_eq!(classify(&element, CANVAS, &config), AdaptPath::NonSkew);

        let bleed = CanvasElement::new(DataType::Image).with_frame(0.0, 0.0, 1280.0, 720.0);
        assert_eq!(classify(&bleed, CANVAS, &config), AdaptPath::Skew);
    }
}

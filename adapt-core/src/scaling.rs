//! Scalar transforms for style properties that carry pixel lengths.

use crate::{Border, CanvasElement, DataType, Padding, Radius, WordStyle};

/// Auto-fit bounds used when an element has none (or malformed ones).
pub const FALLBACK_AUTO_FIT_SIZES: [f64; 2] = [1.0, f64::INFINITY];

/// Stroke color a scaled border falls back to.
pub const DEFAULT_BORDER_STROKE: &str = "rgba(0, 0, 0, 1)";

/// Dash pattern a scaled border falls back to.
pub const DEFAULT_BORDER_DASH_ARRAY: [f64; 2] = [0.0, 0.0];

const PIXEL_UNIT: &str = "px";
const PERCENT_UNIT: &str = "%";

/// Scale all four corners; missing corners become 0. Unknown keys are kept.
#[must_use]
pub fn scale_corner_radius(radius: Option<&Radius>, ratio: f64) -> Radius {
    let corner = |value: Option<f64>| Some(value.unwrap_or(0.0) * ratio);
    let radius = radius.cloned().unwrap_or_default();
    Radius {
        tl: corner(radius.tl),
        tr: corner(radius.tr),
        bl: corner(radius.bl),
        br: corner(radius.br),
        extra: radius.extra,
    }
}

/// Scale all four sides; missing or zero sides become 0.
#[must_use]
pub fn scale_padding(padding: Option<&Padding>, ratio: f64) -> Padding {
    let side = |value: Option<f64>| Some(nonzero(value).map_or(0.0, |v| v * ratio));
    let padding = padding.cloned().unwrap_or_default();
    Padding {
        top: side(padding.top),
        right: side(padding.right),
        bottom: side(padding.bottom),
        left: side(padding.left),
        ..padding
    }
}

/// Scale the element's stroke width, merged over the default border.
///
/// Returns `None` when there is nothing to scale: the element has no border,
/// a zero stroke width, or is a creative box, group or audio track.
#[must_use]
pub fn scaled_border(element: &CanvasElement, ratio: f64) -> Option<Border> {
    if matches!(
        element.data_type,
        DataType::CreativeBox | DataType::Group | DataType::Audio
    ) {
        return None;
    }
    let border = element.border.as_ref()?;
    let stroke_width = nonzero(border.stroke_width)?;

    Some(Border {
        stroke: border
            .stroke
            .clone()
            .or_else(|| Some(DEFAULT_BORDER_STROKE.to_string())),
        stroke_dash_array: border
            .stroke_dash_array
            .clone()
            .or_else(|| Some(DEFAULT_BORDER_DASH_ARRAY.to_vec())),
        stroke_width: Some(stroke_width * ratio),
        ..border.clone()
    })
}

/// Scale pixel font sizes of inline style runs; percentage sizes are relative
/// and stay as they are.
#[must_use]
pub fn adapt_word_style_font_sizes(word_style: &[WordStyle], ratio: f64) -> Vec<WordStyle> {
    word_style
        .iter()
        .map(|style| {
            let Some(props) = style.data.as_ref().and_then(|data| data.styles.as_ref()) else {
                return style.clone();
            };
            let Some(font_size) = nonzero(props.font_size) else {
                return style.clone();
            };

            let unit = props
                .font_size_unit
                .clone()
                .unwrap_or_else(|| PERCENT_UNIT.to_string());
            let adapted = if unit == PIXEL_UNIT {
                (font_size * ratio).round()
            } else {
                font_size
            };

            let mut style = style.clone();
            if let Some(props) = style.data.as_mut().and_then(|data| data.styles.as_mut()) {
                props.font_size = Some(adapted);
                props.font_size_unit = Some(unit);
            }
            style
        })
        .collect()
}

/// Scale `[min, max]` auto-fit bounds, filling missing bounds from
/// `fallback_height`.
#[must_use]
pub fn scale_auto_fit_sizes(sizes: Option<&[Option<f64>]>, ratio: f64, fallback_height: f64) -> [f64; 2] {
    match sizes {
        Some(&[min, max]) => [
            (min.unwrap_or(fallback_height) * ratio).ceil(),
            (max.unwrap_or(fallback_height) * ratio).ceil(),
        ],
        _ => FALLBACK_AUTO_FIT_SIZES,
    }
}

/// Treat zero and NaN like a missing value.
pub(crate) fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WordStyleData, WordStyleProps};

    fn run(font_size: Option<f64>, unit: Option<&str>) -> WordStyle {
        WordStyle {
            data: Some(WordStyleData {
                styles: Some(WordStyleProps {
                    font_size,
                    font_size_unit: unit.map(str::to_string),
                    ..WordStyleProps::default()
                }),
                ..WordStyleData::default()
            }),
            ..WordStyle::default()
        }
    }

    fn props(style: &WordStyle) -> &WordStyleProps {
        style
            .data
            .as_ref()
            .and_then(|d| d.styles.as_ref())
            .expect("styled run")
    }

    #[test]
    fn test_corner_radius_defaults_missing_corners() {
        let radius = Radius {
            tl: Some(10.0),
            br: Some(4.0),
            ..Radius::default()
        };
        let scaled = scale_corner_radius(Some(&radius), 0.5);
        assert_eq!(scaled.tl, Some(5.0));
        assert_eq!(scaled.tr, Some(0.0));
        assert_eq!(scaled.bl, Some(0.0));
        assert_eq!(scaled.br, Some(2.0));
        assert_eq!(scale_corner_radius(None, 2.0), Radius {
            tl: Some(0.0),
            tr: Some(0.0),
            bl: Some(0.0),
            br: Some(0.0),
            ..Radius::default()
        });
    }

    #[test]
    fn test_padding_scales_sides_and_keeps_shorthand() {
        let padding = Padding {
            all: Some(8.0),
            top: Some(8.0),
            left: Some(0.0),
            ..Padding::default()
        };
        let scaled = scale_padding(Some(&padding), 2.0);
        assert_eq!(scaled.all, Some(8.0));
        assert_eq!(scaled.top, Some(16.0));
        assert_eq!(scaled.left, Some(0.0));
        assert_eq!(scaled.right, Some(0.0));

        let empty = scale_padding(None, 3.0);
        assert_eq!(empty.bottom, Some(0.0));
        assert_eq!(empty.all, None);
    }

    #[test]
    fn test_border_merges_defaults_and_scales_width() {
        let mut element = CanvasElement::new(DataType::Image);
        element.border = Some(Border {
            stroke_width: Some(4.0),
            style: Some("dashed".to_string()),
            ..Border::default()
        });
        let border = scaled_border(&element, 0.5).expect("border with stroke");
        assert_eq!(border.stroke_width, Some(2.0));
        assert_eq!(border.stroke.as_deref(), Some(DEFAULT_BORDER_STROKE));
        assert_eq!(border.stroke_dash_array, Some(vec![0.0, 0.0]));
        assert_eq!(border.style.as_deref(), Some("dashed"));
    }

    #[test]
    fn test_border_skipped_without_stroke_or_for_excluded_kinds() {
        let mut element = CanvasElement::new(DataType::Text);
        assert!(scaled_border(&element, 2.0).is_none());

        element.border = Some(Border {
            stroke_width: Some(0.0),
            ..Border::default()
        });
        assert!(scaled_border(&element, 2.0).is_none());

        for data_type in [DataType::CreativeBox, DataType::Group, DataType::Audio] {
            let mut excluded = CanvasElement::new(data_type);
            excluded.border = Some(Border {
                stroke_width: Some(3.0),
                ..Border::default()
            });
            assert!(scaled_border(&excluded, 2.0).is_none());
        }
    }

    #[test]
    fn test_word_style_pixel_sizes_scale_and_percentages_stay() {
        let runs = vec![
            run(Some(40.0), Some("px")),
            run(Some(120.0), Some("%")),
            run(Some(90.0), None),
            run(None, Some("px")),
            WordStyle::default(),
        ];
        let adapted = adapt_word_style_font_sizes(&runs, 0.5625);

        assert_eq!(props(&adapted[0]).font_size, Some(23.0));
        assert_eq!(props(&adapted[1]).font_size, Some(120.0));
        assert_eq!(props(&adapted[2]).font_size, Some(90.0));
        assert_eq!(props(&adapted[2]).font_size_unit.as_deref(), Some("%"));
        assert_eq!(adapted[3], runs[3]);
        assert_eq!(adapted[4], runs[4]);
    }

    #[test]
    fn test_auto_fit_sizes() {
        assert_eq!(scale_auto_fit_sizes(Some([Some(10.0), Some(50.0)].as_slice()), 0.5, 720.0), [5.0, 25.0]);
        assert_eq!(scale_auto_fit_sizes(Some([None, Some(15.0)].as_slice()), 0.5, 720.0), [360.0, 8.0]);
        assert_eq!(scale_auto_fit_sizes(Some([Some(10.0)].as_slice()), 0.5, 720.0), FALLBACK_AUTO_FIT_SIZES);
        assert_eq!(scale_auto_fit_sizes(None, 0.5, 720.0), FALLBACK_AUTO_FIT_SIZES);
    }
}

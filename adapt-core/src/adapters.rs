//! Per-kind adaptation handlers.
//!
//! Every element kind the engine understands has one [`KindAdapter`]. A
//! handler knows how to move the element's frame on each of the three paths
//! and which of its style fields carry pixel lengths. Kinds without a handler
//! are passed through unchanged by the driver.
//!
//! ```text
//!                    frame                    style ratio   offsets (x, y)
//! skew          ×(width, height) ratio         scaling       width, height
//! place         from placement heuristic       scaling       width, height
//! group child   ×scaling                       scaling       scaling, scaling
//! ```

use crate::scaling::{
    adapt_word_style_font_sizes, nonzero, scale_auto_fit_sizes, scale_corner_radius,
    scale_padding, scaled_border,
};
use crate::{Bounds, CanvasElement, ElementKind, Size};

/// Ratios between a reference canvas and a target canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratios {
    /// `target width / reference width`.
    pub width: f64,
    /// `target height / reference height`.
    pub height: f64,
    /// `min(width, height)`; the uniform ratio for lengths with no axis.
    pub scaling: f64,
    /// The reference canvas.
    pub reference: Size,
    /// The target canvas.
    pub target: Size,
}

impl Ratios {
    /// Compute the ratios that take `reference` to `target`.
    #[must_use]
    pub fn between(reference: Size, target: Size) -> Self {
        let width = target.width / reference.width;
        let height = target.height / reference.height;
        Self {
            width,
            height,
            scaling: width.min(height),
            reference,
            target,
        }
    }
}

/// Ratios applied to style fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleScale {
    /// Ratio for axis-free lengths (font size, radius, stroke).
    pub scaling: f64,
    /// Ratio for horizontal offsets inside the element.
    pub x: f64,
    /// Ratio for vertical offsets inside the element.
    pub y: f64,
    /// Height used for missing auto-fit bounds.
    pub fallback_height: f64,
}

impl StyleScale {
    /// Offsets follow their axis.
    #[must_use]
    pub fn per_axis(ratios: &Ratios) -> Self {
        Self {
            scaling: ratios.scaling,
            x: ratios.width,
            y: ratios.height,
            fallback_height: ratios.reference.height,
        }
    }

    /// Everything follows the uniform ratio.
    #[must_use]
    pub fn uniform(ratios: &Ratios) -> Self {
        Self {
            scaling: ratios.scaling,
            x: ratios.scaling,
            y: ratios.scaling,
            fallback_height: ratios.reference.height,
        }
    }
}

/// Adaptation handler for one element kind.
///
/// Implementors provide [`KindAdapter::restyle`]; the frame methods default
/// to moving `left`/`top`/`width`/`height`.
pub trait KindAdapter: Send + Sync {
    /// The kind this handler adapts.
    fn kind(&self) -> ElementKind;

    /// Scale kind-specific style fields in place.
    fn restyle(&self, element: &mut CanvasElement, scale: &StyleScale);

    /// Move the frame independently per axis.
    fn skew_frame(&self, element: &mut CanvasElement, ratios: &Ratios) {
        element.skew_box(ratios.width, ratios.height);
    }

    /// Move the frame to computed bounds.
    fn place_frame(&self, element: &mut CanvasElement, bounds: Bounds, _ratios: &Ratios) {
        element.set_bounds(bounds);
    }

    /// Move the frame uniformly.
    fn scale_frame(&self, element: &mut CanvasElement, ratios: &Ratios) {
        element.scale_box(ratios.scaling);
    }

    /// Skew path: stretch per axis.
    fn skew(&self, element: &CanvasElement, ratios: &Ratios) -> CanvasElement {
        let mut adapted = element.clone();
        self.skew_frame(&mut adapted, ratios);
        self.restyle(&mut adapted, &StyleScale::per_axis(ratios));
        adapted
    }

    /// Non-skew path: land on bounds from the placement heuristic.
    fn place(&self, element: &CanvasElement, bounds: Bounds, ratios: &Ratios) -> CanvasElement {
        let mut adapted = element.clone();
        self.place_frame(&mut adapted, bounds, ratios);
        self.restyle(&mut adapted, &StyleScale::per_axis(ratios));
        adapted
    }

    /// Group child path: scale uniformly relative to the stored geometry.
    fn scale_uniform(&self, element: &CanvasElement, ratios: &Ratios) -> CanvasElement {
        let mut adapted = element.clone();
        self.scale_frame(&mut adapted, ratios);
        self.restyle(&mut adapted, &StyleScale::uniform(ratios));
        adapted
    }
}

/// Text containers.
#[derive(Debug, Clone, Copy)]
pub struct TextAdapter;

impl KindAdapter for TextAdapter {
    fn kind(&self) -> ElementKind {
        ElementKind::Text
    }

    fn restyle(&self, element: &mut CanvasElement, scale: &StyleScale) {
        let ratio = scale.scaling;
        element.word_spacing = Some(nonzero(element.word_spacing).map_or(0.0, |w| w * ratio));
        element.padding = Some(scale_padding(element.padding.as_ref(), ratio));
        element.corner_radius = Some(scale_corner_radius(element.corner_radius.as_ref(), ratio));
        apply_border(element, ratio);
        let auto_fit = scale_auto_fit_sizes(element.auto_fit_sizes.as_deref(), ratio, scale.fallback_height);
        element.auto_fit_sizes = Some(auto_fit.map(Some).to_vec());
        element.font_size = element.font_size.map(|size| size * ratio);
        element.word_style = Some(adapt_word_style_font_sizes(
            element.word_style.as_deref().unwrap_or_default(),
            ratio,
        ));
    }
}

/// Image containers and SVG containers; only images carry a corner radius.
#[derive(Debug, Clone, Copy)]
pub struct ImageAdapter {
    kind: ElementKind,
    rounded: bool,
}

impl KindAdapter for ImageAdapter {
    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn restyle(&self, element: &mut CanvasElement, scale: &StyleScale) {
        element.image_scale = Some(element.image_scale.unwrap_or(1.0) * scale.scaling);
        element.image_left = Some(element.image_left.unwrap_or(0.0) * scale.x);
        element.image_top = Some(element.image_top.unwrap_or(0.0) * scale.y);
        if self.rounded {
            element.corner_radius =
                Some(scale_corner_radius(element.corner_radius.as_ref(), scale.scaling));
        }
        apply_border(element, scale.scaling);
    }
}

/// Rounded rectangles.
#[derive(Debug, Clone, Copy)]
pub struct RoundedRectAdapter;

impl KindAdapter for RoundedRectAdapter {
    fn kind(&self) -> ElementKind {
        ElementKind::RoundedRect
    }

    fn restyle(&self, element: &mut CanvasElement, scale: &StyleScale) {
        element.corner_radius = Some(scale_corner_radius(element.corner_radius.as_ref(), scale.scaling));
        apply_border(element, scale.scaling);
    }
}

/// Path shapes, sized through `scaleX`/`scaleY` instead of width/height.
#[derive(Debug, Clone, Copy)]
pub struct PathAdapter;

impl KindAdapter for PathAdapter {
    fn kind(&self) -> ElementKind {
        ElementKind::Path
    }

    fn restyle(&self, element: &mut CanvasElement, scale: &StyleScale) {
        apply_border(element, scale.scaling);
    }

    fn skew_frame(&self, element: &mut CanvasElement, ratios: &Ratios) {
        element.left = element.left.map(|v| v * ratios.width);
        element.top = element.top.map(|v| v * ratios.height);
        rescale(element, ratios.width, ratios.height);
    }

    fn place_frame(&self, element: &mut CanvasElement, bounds: Bounds, ratios: &Ratios) {
        element.left = Some(bounds.left);
        element.top = Some(bounds.top);
        rescale(element, ratios.scaling, ratios.scaling);
    }

    fn scale_frame(&self, element: &mut CanvasElement, ratios: &Ratios) {
        element.left = element.left.map(|v| v * ratios.scaling);
        element.top = element.top.map(|v| v * ratios.scaling);
        rescale(element, ratios.scaling, ratios.scaling);
    }
}

/// Group containers. Children are adapted by the driver.
#[derive(Debug, Clone, Copy)]
pub struct GroupAdapter;

impl KindAdapter for GroupAdapter {
    fn kind(&self) -> ElementKind {
        ElementKind::Group
    }

    fn restyle(&self, _element: &mut CanvasElement, _scale: &StyleScale) {}
}

static TEXT: TextAdapter = TextAdapter;
static IMAGE: ImageAdapter = ImageAdapter {
    kind: ElementKind::Image,
    rounded: true,
};
static SVG: ImageAdapter = ImageAdapter {
    kind: ElementKind::SvgContainer,
    rounded: false,
};
static ROUNDED_RECT: RoundedRectAdapter = RoundedRectAdapter;
static PATH: PathAdapter = PathAdapter;
static GROUP: GroupAdapter = GroupAdapter;

/// Look up the handler for a kind.
///
/// `None` means the kind has no geometry the engine adapts and the element
/// must be passed through unchanged.
#[must_use]
pub fn adapter_for(kind: ElementKind) -> Option<&'static dyn KindAdapter> {
    let adapter: &'static dyn KindAdapter = match kind {
        ElementKind::Text => &TEXT,
        ElementKind::Image => &IMAGE,
        ElementKind::SvgContainer => &SVG,
        ElementKind::RoundedRect => &ROUNDED_RECT,
        ElementKind::Path => &PATH,
        ElementKind::Group => &GROUP,
        ElementKind::CreativeBox | ElementKind::Audio | ElementKind::Video | ElementKind::Unhandled => {
            return None;
        }
    };
    Some(adapter)
}

fn apply_border(element: &mut CanvasElement, ratio: f64) {
    if let Some(border) = scaled_border(element, ratio) {
        element.border = Some(border);
    }
}

fn rescale(element: &mut CanvasElement, x: f64, y: f64) {
    element.scale_x = Some(element.scale_x.unwrap_or(1.0) * x);
    element.scale_y = Some(element.scale_y.unwrap_or(1.0) * y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Border, DataType, Radius, SVG_CONTAINER};

    const LANDSCAPE: Size = Size::new(1280.0, 720.0);
    const PORTRAIT: Size = Size::new(720.0, 1280.0);

    fn ratios() -> Ratios {
        Ratios::between(LANDSCAPE, PORTRAIT)
    }

    fn adapter(kind: ElementKind) -> &'static dyn KindAdapter {
        adapter_for(kind).expect("handled kind")
    }

    #[test]
    fn test_ratios() {
        let r = ratios();
        assert!((r.width - 0.5625).abs() < f64::EPSILON);
        assert!((r.height - 1280.0 / 720.0).abs() < f64::EPSILON);
        assert!((r.scaling - 0.5625).abs() < f64::EPSILON);
    }

    #[test]
    fn test_lookup_covers_handled_kinds_only() {
        for kind in [
            ElementKind::Text,
            ElementKind::Image,
            ElementKind::SvgContainer,
            ElementKind::RoundedRect,
            ElementKind::Path,
            ElementKind::Group,
        ] {
            assert_eq!(adapter(kind).kind(), kind);
        }
        for kind in [
            ElementKind::CreativeBox,
            ElementKind::Audio,
            ElementKind::Video,
            ElementKind::Unhandled,
        ] {
            assert!(adapter_for(kind).is_none());
        }
    }

    #[test]
    fn test_text_skew_scales_frame_and_type() {
        let mut text = CanvasElement::new(DataType::Text).with_frame(40.0, 340.0, 1200.0, 40.0);
        text.font_size = Some(48.0);
        text.word_spacing = Some(8.0);
        let adapted = adapter(ElementKind::Text).skew(&text, &ratios());

        assert_eq!(adapted.font_size, Some(27.0));
        assert_eq!(adapted.word_spacing, Some(4.5));
        assert!((adapted.left.expect("left") - 22.5).abs() < 1e-9);
        assert!((adapted.width.expect("width") - 675.0).abs() < 1e-9);
        assert!((adapted.top.expect("top") - 340.0 * 1280.0 / 720.0).abs() < 1e-9);
        assert_eq!(adapted.auto_fit_sizes, Some(vec![Some(1.0), Some(f64::INFINITY)]));
        assert_eq!(adapted.padding.and_then(|p| p.top), Some(0.0));
        // The source record is untouched.
        assert_eq!(text.font_size, Some(48.0));
    }

    #[test]
    fn test_text_place_uses_bounds() {
        let mut text = CanvasElement::new(DataType::Text).with_frame(100.0, 100.0, 200.0, 50.0);
        text.auto_fit_sizes = Some(vec![Some(12.0), None]);
        let bounds = Bounds::new(1.0, 2.0, 3.0, 4.0);
        let adapted = adapter(ElementKind::Text).place(&text, bounds, &ratios());
        assert_eq!((adapted.left, adapted.top), (Some(1.0), Some(2.0)));
        assert_eq!((adapted.width, adapted.height), (Some(3.0), Some(4.0)));
        // ceil(12 * 0.5625) = 7, ceil(720 * 0.5625) = 405
        assert_eq!(adapted.auto_fit_sizes, Some(vec![Some(7.0), Some(405.0)]));
    }

    #[test]
    fn test_image_offsets_follow_axes_except_for_group_children() {
        let mut image = CanvasElement::new(DataType::Image).with_frame(0.0, 0.0, 400.0, 400.0);
        image.image_scale = Some(2.0);
        image.image_left = Some(-100.0);
        image.image_top = Some(-72.0);
        image.corner_radius = Some(Radius {
            tl: Some(16.0),
            ..Radius::default()
        });
        let r = ratios();

        let placed = adapter(ElementKind::Image).place(&image, Bounds::new(0.0, 0.0, 225.0, 225.0), &r);
        assert_eq!(placed.image_scale, Some(1.125));
        assert_eq!(placed.image_left, Some(-56.25));
        assert!((placed.image_top.expect("offset") + 128.0).abs() < 1e-9);
        assert_eq!(placed.corner_radius.and_then(|c| c.tl), Some(9.0));

        let child = adapter(ElementKind::Image).scale_uniform(&image, &r);
        assert_eq!(child.image_top, Some(-40.5));
        assert_eq!(child.width, Some(225.0));
    }

    #[test]
    fn test_svg_container_has_no_corner_radius() {
        let svg = CanvasElement::new(DataType::Shape)
            .with_shape_type(SVG_CONTAINER)
            .with_frame(10.0, 10.0, 100.0, 100.0);
        let adapted = adapter(svg.kind()).skew(&svg, &ratios());
        assert_eq!(adapted.corner_radius, None);
        assert_eq!(adapted.image_scale, Some(0.5625));
        assert_eq!(adapted.image_left, Some(0.0));
    }

    #[test]
    fn test_path_uses_scale_not_extent() {
        let mut path = CanvasElement::new(DataType::Shape)
            .with_shape_type("path")
            .with_frame(100.0, 100.0, 50.0, 50.0);
        path.scale_x = Some(2.0);
        path.border = Some(Border {
            stroke_width: Some(2.0),
            ..Border::default()
        });
        let r = ratios();

        let skewed = adapter(ElementKind::Path).skew(&path, &r);
        assert_eq!(skewed.width, Some(50.0));
        assert_eq!(skewed.scale_x, Some(1.125));
        assert!((skewed.scale_y.expect("scale") - 1280.0 / 720.0).abs() < 1e-9);
        assert_eq!(skewed.border.and_then(|b| b.stroke_width), Some(1.125));

        let placed = adapter(ElementKind::Path).place(&path, Bounds::new(5.0, 6.0, 7.0, 8.0), &r);
        assert_eq!((placed.left, placed.top), (Some(5.0), Some(6.0)));
        assert_eq!((placed.width, placed.height), (Some(50.0), Some(50.0)));
        assert_eq!(placed.scale_y, Some(0.5625));
    }

    #[test]
    fn test_group_container_scales_uniformly_without_border() {
        let mut group = CanvasElement::new(DataType::Group)
            .with_frame(100.0, 200.0, 400.0, 300.0)
            .with_objects(["a"]);
        group.border = Some(Border {
            stroke_width: Some(5.0),
            ..Border::default()
        });
        let adapted = adapter(ElementKind::Group).scale_uniform(&group, &ratios());
        assert_eq!(adapted.left, Some(56.25));
        assert_eq!(adapted.top, Some(112.5));
        assert_eq!(adapted.border, group.border);
        assert_eq!(adapted.objects, group.objects);
    }
}

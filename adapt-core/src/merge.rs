//! Layout-only merge.
//!
//! Copies geometry from a reference layout onto a base layout while keeping
//! the base's content and styling. Which fields count as layout depends on
//! the element kind:
//!
//! ```text
//! every kind     left top width height angle scaleX scaleY visible
//! TEXT           + fontSize wordSpacing padding autoFitSizes
//! IMAGE, SVG     + imageScale imageLeft imageTop
//! rounded rect   + cornerRadius
//! ```
//!
//! A field the reference does not carry keeps the base value.

use crate::{CanvasElement, ElementKind, Elements};

const VISIBLE: &str = "visible";

/// Merge the layout fields of `reference` into a copy of `base`.
///
/// Creative boxes and audio tracks are returned unchanged.
#[must_use]
pub fn merge_layout_from_reference(base: &CanvasElement, reference: &CanvasElement) -> CanvasElement {
    let kind = base.kind();
    if matches!(kind, ElementKind::CreativeBox | ElementKind::Audio) {
        return base.clone();
    }

    let mut merged = base.clone();
    copy(&mut merged.left, reference.left.as_ref());
    copy(&mut merged.top, reference.top.as_ref());
    copy(&mut merged.width, reference.width.as_ref());
    copy(&mut merged.height, reference.height.as_ref());
    copy(&mut merged.angle, reference.angle.as_ref());
    copy(&mut merged.scale_x, reference.scale_x.as_ref());
    copy(&mut merged.scale_y, reference.scale_y.as_ref());
    if let Some(visible) = reference.extra.get(VISIBLE) {
        merged.extra.insert(VISIBLE.to_string(), visible.clone());
    }

    match kind {
        ElementKind::Text => {
            copy(&mut merged.font_size, reference.font_size.as_ref());
            copy(&mut merged.word_spacing, reference.word_spacing.as_ref());
            copy(&mut merged.padding, reference.padding.as_ref());
            copy(&mut merged.auto_fit_sizes, reference.auto_fit_sizes.as_ref());
        }
        ElementKind::Image | ElementKind::SvgContainer => {
            copy(&mut merged.image_scale, reference.image_scale.as_ref());
            copy(&mut merged.image_left, reference.image_left.as_ref());
            copy(&mut merged.image_top, reference.image_top.as_ref());
        }
        ElementKind::RoundedRect => copy(&mut merged.corner_radius, reference.corner_radius.as_ref()),
        _ => {}
    }
    merged
}

/// Merge two element collections by ID.
///
/// Base entries without a reference counterpart are kept as they are;
/// reference entries missing from the base are ignored.
#[must_use]
pub fn merge_layout_from_reference_objects(base: &Elements, reference: &Elements) -> Elements {
    base.iter()
        .map(|(id, element)| {
            let merged = match reference.get(id) {
                Some(reference) => merge_layout_from_reference(element, reference),
                None => {
                    tracing::debug!("Element {id} has no reference layout, keeping it");
                    element.clone()
                }
            };
            (id.clone(), merged)
        })
        .collect()
}

fn copy<T: Clone>(target: &mut Option<T>, source: Option<&T>) {
    if let Some(value) = source {
        *target = Some(value.clone());
    }
}

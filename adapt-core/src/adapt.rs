//! The adaptation driver.
//!
//! Walks every element of a layout once, picks the skew or non-skew path for
//! it and hands it to the handler of its kind. Groups are placed as a unit and
//! their children follow with the uniform ratio.
//!
//! ```text
//! element ─┬─ CREATIVE_BOX ──────────────────────────► target size
//!          ├─ AUDIO / no handler ────────────────────► unchanged
//!          ├─ group child / nested group ────────────► via its group
//!          └─ classify ─┬─ Skew ────► handler.skew
//!                       └─ NonSkew ─► placement ─► handler.place ─► children
//! ```

use std::collections::{HashMap, HashSet};

use crate::adapters::{adapter_for, KindAdapter, Ratios};
use crate::classify::{classify, AdaptPath};
use crate::position::values_without_skewing;
use crate::size::{find_closest_size_with_matches, resolve_reference_size, ClosestSize};
use crate::{
    AdaptConfig, AdaptError, AdaptResult, AdaptedLayout, CanvasElement, ElementId, ElementKind,
    Elements, LayoutSnapshot, Size,
};

/// Adapts layouts between canvas sizes.
///
/// Immutable after construction; a single adapter can serve any number of
/// independent calls.
#[derive(Debug, Clone, Default)]
pub struct LayoutAdapter {
    config: AdaptConfig,
}

/// Working state of one `adapt_elements` call.
struct Pass<'a> {
    elements: &'a Elements,
    ratios: Ratios,
    adapted: HashMap<ElementId, CanvasElement>,
    visited: HashSet<ElementId>,
}

impl LayoutAdapter {
    /// Create an adapter with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an adapter with a custom configuration.
    #[must_use]
    pub fn with_config(config: AdaptConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &AdaptConfig {
        &self.config
    }

    /// Adapt every element from the `reference` canvas to the `target` canvas.
    ///
    /// The input is not modified. The output has the same IDs in the same
    /// order; elements the engine does not adapt are copied unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::InvalidSize`] if `reference` has a zero or
    /// non-finite side, and [`AdaptError::DegeneratePlacement`] if the
    /// placement heuristic collapses an element to an all-zero box.
    pub fn adapt_elements(
        &self,
        elements: &Elements,
        reference: Size,
        target: Size,
    ) -> AdaptResult<Elements> {
        if reference.is_degenerate() {
            tracing::warn!("Cannot adapt from reference {reference}: it has no area");
            return Err(AdaptError::InvalidSize(reference.to_string()));
        }

        let claimed = claimed_by_groups(elements);
        let mut pass = Pass {
            elements,
            ratios: Ratios::between(reference, target),
            adapted: HashMap::with_capacity(elements.len()),
            visited: HashSet::new(),
        };

        for (id, element) in elements {
            if element.is_nested_group() || claimed.contains(id) {
                continue;
            }

            let kind = element.kind();
            let adapted = match kind {
                ElementKind::CreativeBox => {
                    let mut creative_box = element.clone();
                    creative_box.width = Some(target.width);
                    creative_box.height = Some(target.height);
                    creative_box
                }
                _ => match adapter_for(kind) {
                    Some(adapter) => self.adapt_top_level(&mut pass, id, element, adapter)?,
                    None => {
                        tracing::debug!("Element {id} ({}) passes through", element.data_type);
                        element.clone()
                    }
                },
            };
            pass.adapted.insert(id.clone(), adapted);
        }

        let mut output = Elements::with_capacity(elements.len());
        for (id, element) in elements {
            let adapted = pass.adapted.remove(id).unwrap_or_else(|| {
                tracing::warn!("Element {id} was not reached by any group, copying it unchanged");
                element.clone()
            });
            output.insert(id.clone(), adapted);
        }
        Ok(output)
    }

    /// Synthesize the layout of `snapshot` for a new size.
    ///
    /// `target` is `"WxH"` or a symbolic size name. The reference is
    /// `requested_reference` when it names an existing size, otherwise the
    /// best match.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is not a size, the snapshot has no sizes,
    /// or an element cannot be placed.
    pub fn generate_layout_for_size(
        &self,
        snapshot: &LayoutSnapshot,
        target: &str,
        requested_reference: Option<&str>,
    ) -> AdaptResult<AdaptedLayout> {
        let target: Size = target.parse()?;
        let reference_id = resolve_reference_size(&snapshot.sizes, &target, requested_reference)?;
        let reference = snapshot
            .sizes
            .get(&reference_id)
            .copied()
            .ok_or(AdaptError::NoCandidateSizes)?;

        let objects = self.adapt_elements(&snapshot.objects, reference, target)?;
        tracing::info!(
            "Adapted {} elements from {reference_id} ({reference}) to {target}",
            objects.len()
        );

        Ok(AdaptedLayout {
            reference_id,
            reference,
            target,
            objects,
        })
    }

    /// Score every size of `snapshot` against `target` and pick a reference.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is not a size or the snapshot has no sizes.
    pub fn closest_size(&self, snapshot: &LayoutSnapshot, target: &str) -> AdaptResult<ClosestSize> {
        let target: Size = target.parse()?;
        find_closest_size_with_matches(&snapshot.sizes, &target, &self.config)
    }

    fn adapt_top_level(
        &self,
        pass: &mut Pass<'_>,
        id: &ElementId,
        element: &CanvasElement,
        adapter: &dyn KindAdapter,
    ) -> AdaptResult<CanvasElement> {
        let reference = pass.ratios.reference;
        let path = classify(element, reference, &self.config);
        tracing::debug!("Element {id} ({}) takes the {path:?} path", element.data_type);

        match path {
            AdaptPath::Skew => Ok(adapter.skew(element, &pass.ratios)),
            AdaptPath::NonSkew => {
                let bounds = values_without_skewing(reference, pass.ratios.target, element, &self.config);
                if bounds.is_degenerate() {
                    return Err(AdaptError::DegeneratePlacement { id: id.to_string() });
                }
                let placed = adapter.place(element, bounds, &pass.ratios);
                if adapter.kind() == ElementKind::Group {
                    pass.visited.insert(id.clone());
                    pass.adapt_children(element);
                }
                Ok(placed)
            }
        }
    }
}

impl Pass<'_> {
    /// Scale the children of `group` uniformly, recursing into nested groups.
    fn adapt_children(&mut self, group: &CanvasElement) {
        let elements = self.elements;
        for child_id in group.children() {
            if !self.visited.insert(child_id.clone()) {
                tracing::warn!("Group child {child_id} was already adapted, skipping");
                continue;
            }
            let Some(child) = elements.get(child_id) else {
                tracing::warn!("Group child {child_id} is missing from the layout");
                continue;
            };

            let adapted = adapter_for(child.kind())
                .map_or_else(|| child.clone(), |adapter| adapter.scale_uniform(child, &self.ratios));
            self.adapted.insert(child_id.clone(), adapted);

            if child.kind() == ElementKind::Group {
                self.adapt_children(child);
            }
        }
    }
}

/// IDs reachable from the `objects` of any top-level group.
fn claimed_by_groups(elements: &Elements) -> HashSet<&ElementId> {
    let mut claimed = HashSet::new();
    let mut pending: Vec<&ElementId> = elements
        .values()
        .filter(|element| element.kind() == ElementKind::Group && !element.is_nested_group())
        .flat_map(CanvasElement::children)
        .collect();

    while let Some(id) = pending.pop() {
        if claimed.insert(id) {
            if let Some(child) = elements.get(id) {
                pending.extend(child.children());
            }
        }
    }
    claimed
}

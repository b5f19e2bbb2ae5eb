//! Serialized engine input and output.
//!
//! A [`LayoutSnapshot`] holds what the engine needs from a document: the size
//! table and the element collection of one size, already flattened.
//!
//! ```json
//! {
//!   "sizes": { "a": { "width": 1280, "height": 720 } },
//!   "objects": { "title": { "dataType": "TEXT", "left": 40, "fontSize": 48 } }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{AdaptError, AdaptResult, CanvasElement, ElementId, Size, SizeTable};

/// Element collection keyed by element ID, in stored order.
pub type Elements = IndexMap<ElementId, CanvasElement>;

/// Sizes and elements of a document, as read by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Available sizes, keyed by size ID.
    #[serde(default)]
    pub sizes: SizeTable,
    /// Elements of the layout to adapt.
    #[serde(default)]
    pub objects: Elements,
}

impl LayoutSnapshot {
    /// Create a snapshot from its parts.
    #[must_use]
    pub fn new(sizes: SizeTable, objects: Elements) -> Self {
        Self { sizes, objects }
    }

    /// Parse a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> AdaptResult<Self> {
        serde_json::from_str(json).map_err(AdaptError::Serialization)
    }

    /// Serialize the snapshot to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> AdaptResult<String> {
        serde_json::to_string(self).map_err(AdaptError::Serialization)
    }
}

/// A layout synthesized for a new size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptedLayout {
    /// ID of the size the layout was adapted from.
    pub reference_id: String,
    /// The reference canvas.
    pub reference: Size,
    /// The requested canvas.
    pub target: Size,
    /// Adapted elements, same IDs and order as the input.
    pub objects: Elements,
}

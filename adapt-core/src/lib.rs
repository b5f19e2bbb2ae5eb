//! # Auto-Adapt Core
//!
//! Layout auto-adaptation engine: synthesizes the layout of a canvas size
//! from the layout of another size of the same document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 adapt-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Size Matching   │  Adaptation Driver       │
//! │  - Normalization │  - Skew classification   │
//! │  - Scoring       │  - Non-skew placement    │
//! │  - Reference pick│  - Group recursion       │
//! ├─────────────────────────────────────────────┤
//! │  Kind Adapters   │  Layout Merge            │
//! │  - Text / Image  │  - Per-kind whitelists   │
//! │  - Shapes / Group│  - Collection merge      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use adapt_core::{LayoutAdapter, LayoutSnapshot};
//!
//! let snapshot = LayoutSnapshot::from_json(r#"{
//!     "sizes": {"a": {"width": 1280, "height": 720}},
//!     "objects": {"title": {"dataType": "TEXT", "left": 40, "top": 340,
//!                           "width": 1200, "height": 40, "fontSize": 48}}
//! }"#)?;
//! let layout = LayoutAdapter::new().generate_layout_for_size(&snapshot, "portrait", None)?;
//! assert_eq!(layout.objects["title"].font_size, Some(27.0));
//! # Ok::<(), adapt_core::AdaptError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapt;
pub mod adapters;
pub mod classify;
pub mod config;
pub mod document;
pub mod element;
pub mod error;
pub mod merge;
pub mod position;
pub mod scaling;
pub mod size;

pub use adapt::LayoutAdapter;
pub use adapters::{adapter_for, KindAdapter, Ratios, StyleScale};
pub use classify::{area_percentage, classify, should_skew, AdaptPath, ReferenceLengths};
pub use config::AdaptConfig;
pub use document::{AdaptedLayout, Elements, LayoutSnapshot};
pub use element::{
    Border, CanvasElement, DataType, ElementId, ElementKind, Padding, Radius, WordStyle,
    WordStyleData, WordStyleProps, ROUNDED_RECT, SVG_CONTAINER,
};
pub use error::{AdaptError, AdaptResult};
pub use merge::{merge_layout_from_reference, merge_layout_from_reference_objects};
pub use position::{values_without_skewing, Bounds};
pub use size::{
    distance_between, find_closest_size_with_matches, normalize_size_value, pick_best_reference,
    resolve_reference_size, ClosestSize, Size, SizeMatch, SizeTable,
};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

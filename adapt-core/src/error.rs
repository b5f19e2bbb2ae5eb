//! Error types for adaptation operations.

use thiserror::Error;

/// Result type for adaptation operations.
pub type AdaptResult<T> = Result<T, AdaptError>;

/// Errors that can occur while adapting a layout to a new size.
#[derive(Debug, Error)]
pub enum AdaptError {
    /// The document has no sizes to use as a reference frame.
    #[error("No candidate sizes available to pick a reference from")]
    NoCandidateSizes,

    /// A size string could not be parsed as `WxH` or a symbolic name, or the
    /// reference size has no area.
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// The placement heuristic produced an all-zero box for an element.
    #[error("Placement heuristic produced a degenerate box for element {id}")]
    DegeneratePlacement {
        /// Element whose placement collapsed.
        id: String,
    },

    /// Snapshot or config serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Tunable thresholds and weights for the adaptation heuristics.

use serde::{Deserialize, Serialize};

use crate::{AdaptError, AdaptResult};

/// Area percentage above which an element is always scaled per axis.
pub const THRESHOLD_FOR_NOT_SKEWING: f64 = 90.0;

/// Distance in pixels under which an element counts as touching a canvas edge.
pub const ALIGNMENT_THRESHOLD: f64 = 1.0;

/// Relative left/right area difference under which an element counts as centered.
pub const CENTER_THRESHOLD: f64 = 0.05;

/// Weight of aspect-ratio similarity in a match percentage.
pub const ASPECT_RATIO_WEIGHT: f64 = 0.9;

/// Weight of absolute-size similarity in a match percentage.
pub const SCALE_DISTANCE_WEIGHT: f64 = 0.1;

/// Floor of a reported match percentage.
pub const MIN_MATCH_PERCENTAGE: u8 = 20;

/// Ceiling of a reported match percentage.
pub const MAX_MATCH_PERCENTAGE: u8 = 100;

/// Configuration for layout adaptation.
///
/// Every field is optional when deserialized; missing fields take the
/// values of [`AdaptConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdaptConfig {
    /// Area percentage above which an element takes the skew path.
    pub skew_area_threshold: f64,
    /// Edge alignment tolerance in reference pixels.
    pub alignment_threshold: f64,
    /// Tolerance for horizontal centering detection.
    pub center_threshold: f64,
    /// Weight of aspect-ratio similarity when scoring sizes.
    pub aspect_ratio_weight: f64,
    /// Weight of Euclidean size similarity when scoring sizes.
    pub scale_distance_weight: f64,
    /// Lowest match percentage reported for a candidate size.
    pub min_match_percentage: u8,
    /// Highest match percentage reported for a candidate size.
    pub max_match_percentage: u8,
}

impl Default for AdaptConfig {
    fn default() -> Self {
        Self {
            skew_area_threshold: THRESHOLD_FOR_NOT_SKEWING,
            alignment_threshold: ALIGNMENT_THRESHOLD,
            center_threshold: CENTER_THRESHOLD,
            aspect_ratio_weight: ASPECT_RATIO_WEIGHT,
            scale_distance_weight: SCALE_DISTANCE_WEIGHT,
            min_match_percentage: MIN_MATCH_PERCENTAGE,
            max_match_percentage: MAX_MATCH_PERCENTAGE,
        }
    }
}

impl AdaptConfig {
    /// Load a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> AdaptResult<Self> {
        serde_json::from_str(json).map_err(AdaptError::Serialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AdaptConfig::from_json(r#"{"skewAreaThreshold": 75}"#).expect("valid config");
        assert!((config.skew_area_threshold - 75.0).abs() < f64::EPSILON);
        assert!((config.center_threshold - CENTER_THRESHOLD).abs() < f64::EPSILON);
        assert_eq!(config.min_match_percentage, MIN_MATCH_PERCENTAGE);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(matches!(
            AdaptConfig::from_json("{"),
            Err(AdaptError::Serialization(_))
        ));
    }
}

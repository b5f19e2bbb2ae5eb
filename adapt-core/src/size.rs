//! Canvas sizes and reference-size matching.
//!
//! A document stores one layout per size. To synthesize a layout for a new
//! size, the engine starts from the existing size whose aspect ratio is
//! closest to the requested one:
//!
//! ```text
//! candidates        target 720x1280 (ratio 0.5625)
//!   a: 720x720   →  |0.5625 - 1.0000| = 0.4375   ← picked
//!   b: 1280x720  →  |0.5625 - 1.7778| = 1.2153
//! ```
//!
//! Euclidean distance between the `(width, height)` points only breaks
//! ties. The weighted [`SizeMatch::percentage`] is a report for callers and
//! never drives the pick.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{AdaptConfig, AdaptError, AdaptResult};

/// Sizes of a document, keyed by size ID, in stored order.
pub type SizeTable = IndexMap<String, Size>;

/// A canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` when the height is zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.height == 0.0 {
            None
        } else {
            Some(self.width / self.height)
        }
    }

    /// True when either side is zero or not finite, so no ratio can be
    /// taken against this size.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width == 0.0
            || self.height == 0.0
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    /// Area in square pixels.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Euclidean distance between the two `(width, height)` points.
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        let width_difference = other.width - self.width;
        let height_difference = other.height - self.height;
        (width_difference * width_difference + height_difference * height_difference).sqrt()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = AdaptError;

    /// Parse `"WxH"` or one of the symbolic names.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_size_value(value.trim());
        let invalid = || AdaptError::InvalidSize(value.to_string());
        let (width, height) = normalized.split_once('x').ok_or_else(invalid)?;
        let width = width.trim().parse::<f64>().map_err(|_| invalid())?;
        let height = height.trim().parse::<f64>().map_err(|_| invalid())?;
        if !width.is_finite() || !height.is_finite() {
            return Err(invalid());
        }
        Ok(Self::new(width, height))
    }
}

/// Map a symbolic size name to its `WxH` form; other values pass through.
#[must_use]
pub fn normalize_size_value(value: &str) -> &str {
    match value {
        "square" => "720x720",
        "landscape" => "1280x720",
        "portrait" => "720x1280",
        other => other,
    }
}

/// Euclidean distance between two size strings.
///
/// # Errors
///
/// Returns [`AdaptError::InvalidSize`] if either string is not a size.
pub fn distance_between(first: &str, second: &str) -> AdaptResult<f64> {
    let first: Size = first.parse()?;
    let second: Size = second.parse()?;
    Ok(first.distance(&second))
}

/// How well one candidate size matches a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeMatch {
    /// Size ID in the document.
    pub id: String,
    /// The candidate size.
    pub size: Size,
    /// Blended similarity, clamped to the configured percentage range.
    pub percentage: u8,
    /// `|target ratio - candidate ratio|`, `None` when either ratio is undefined.
    pub aspect_ratio_distance: Option<f64>,
    /// Distance between the `(width, height)` points.
    pub euclidean_distance: f64,
}

/// The picked reference size with the full match report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestSize {
    /// ID of the best reference size.
    pub id: String,
    /// Every candidate, best percentage first.
    pub matches: Vec<SizeMatch>,
}

/// Score every candidate against the target.
///
/// Candidates without a defined aspect ratio are reported at the configured
/// minimum percentage. The result is sorted by percentage, highest first;
/// equal percentages keep the input order.
#[must_use]
pub fn score_candidates(candidates: &SizeTable, target: &Size, config: &AdaptConfig) -> Vec<SizeMatch> {
    let target_ratio = target.aspect_ratio();
    let measured: Vec<(&String, &Size, Option<f64>, f64)> = candidates
        .iter()
        .map(|(id, size)| {
            let aspect = target_ratio
                .zip(size.aspect_ratio())
                .map(|(target_ratio, ratio)| (target_ratio - ratio).abs());
            (id, size, aspect, size.distance(target))
        })
        .collect();

    let aspect_range = range(measured.iter().filter_map(|m| m.2));
    let euclidean_range = range(measured.iter().filter(|m| m.2.is_some()).map(|m| m.3));
    let floor = f64::from(config.min_match_percentage);
    let ceiling = f64::from(config.max_match_percentage);

    let mut matches: Vec<SizeMatch> = measured
        .into_iter()
        .map(|(id, size, aspect, euclidean)| {
            let percentage = aspect.map_or(floor, |aspect| {
                let score = config.aspect_ratio_weight * normalized(aspect, aspect_range)
                    + config.scale_distance_weight * normalized(euclidean, euclidean_range);
                (score * 100.0).clamp(floor, ceiling).round()
            });
            SizeMatch {
                id: id.clone(),
                size: *size,
                percentage: to_percentage(percentage),
                aspect_ratio_distance: aspect,
                euclidean_distance: euclidean,
            }
        })
        .collect();

    matches.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    matches
}

/// Pick the reference size for a target.
///
/// A single candidate is returned as is. Otherwise the smallest aspect-ratio
/// distance wins, then the smallest Euclidean distance, then input order.
/// Degenerate input falls back to the first candidate.
///
/// # Errors
///
/// Returns [`AdaptError::NoCandidateSizes`] if `candidates` is empty.
pub fn pick_best_reference(candidates: &SizeTable, target: &Size) -> AdaptResult<String> {
    let Some(first) = candidates.keys().next() else {
        return Err(AdaptError::NoCandidateSizes);
    };
    if candidates.len() == 1 {
        return Ok(first.clone());
    }

    if let Some(id) = closest_by_aspect_ratio(candidates, target) {
        Ok(id.clone())
    } else {
        tracing::warn!(
            "Could not rank {} candidate sizes against {target}, falling back to {first}",
            candidates.len()
        );
        Ok(first.clone())
    }
}

/// Pick the reference size and report how every candidate scored.
///
/// # Errors
///
/// Returns [`AdaptError::NoCandidateSizes`] if `candidates` is empty.
pub fn find_closest_size_with_matches(
    candidates: &SizeTable,
    target: &Size,
    config: &AdaptConfig,
) -> AdaptResult<ClosestSize> {
    let id = pick_best_reference(candidates, target)?;
    Ok(ClosestSize {
        id,
        matches: score_candidates(candidates, target, config),
    })
}

/// Resolve the reference size ID, honoring an explicit request when it exists.
///
/// A requested ID that is not in the table is logged and replaced by the
/// best match.
///
/// # Errors
///
/// Returns [`AdaptError::NoCandidateSizes`] if `candidates` is empty.
pub fn resolve_reference_size(
    candidates: &SizeTable,
    target: &Size,
    requested: Option<&str>,
) -> AdaptResult<String> {
    match requested {
        Some(id) if candidates.contains_key(id) => Ok(id.to_string()),
        Some(id) => {
            tracing::warn!("Requested reference size {id} not found, using best match instead");
            pick_best_reference(candidates, target)
        }
        None => pick_best_reference(candidates, target),
    }
}

fn closest_by_aspect_ratio<'a>(candidates: &'a SizeTable, target: &Size) -> Option<&'a String> {
    let target_ratio = target.aspect_ratio()?;
    candidates
        .iter()
        .filter_map(|(id, size)| {
            let aspect = (target_ratio - size.aspect_ratio()?).abs();
            (!aspect.is_nan()).then(|| (id, aspect, size.distance(target)))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.2.total_cmp(&b.2)))
        .map(|(id, _, _)| id)
}

fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    })
}

/// 1 at zero distance, 0 at the largest; 1 for all when every distance is equal.
fn normalized(distance: f64, (min, max): (f64, f64)) -> f64 {
    if max <= min {
        1.0
    } else {
        1.0 - distance / max
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to a u8 range
fn to_percentage(value: f64) -> u8 {
    value.clamp(0.0, f64::from(u8::MAX)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, f64, f64)]) -> SizeTable {
        entries
            .iter()
            .map(|(id, w, h)| ((*id).to_string(), Size::new(*w, *h)))
            .collect()
    }

    #[test]
    fn test_normalize_symbolic_names() {
        assert_eq!(normalize_size_value("square"), "720x720");
        assert_eq!(normalize_size_value("landscape"), "1280x720");
        assert_eq!(normalize_size_value("portrait"), "720x1280");
        assert_eq!(normalize_size_value("1080x1920"), "1080x1920");
        assert_eq!(normalize_size_value("banner"), "banner");
    }

    #[test]
    fn test_parse_sizes() {
        let size: Size = "portrait".parse().expect("symbolic size");
        assert_eq!(size, Size::new(720.0, 1280.0));
        let size: Size = "300x250".parse().expect("explicit size");
        assert_eq!(size, Size::new(300.0, 250.0));
        assert_eq!(size.to_string(), "300x250");
        assert!(matches!("banner".parse::<Size>(), Err(AdaptError::InvalidSize(_))));
        assert!(matches!("12xabc".parse::<Size>(), Err(AdaptError::InvalidSize(_))));
    }

    #[test]
    fn test_degenerate_sizes() {
        assert!(Size::new(0.0, 720.0).is_degenerate());
        assert!(Size::new(720.0, f64::INFINITY).is_degenerate());
        assert!(!Size::new(720.0, 1280.0).is_degenerate());
    }

    #[test]
    fn test_distance_between_names_and_values() {
        let d = distance_between("square", "1280x720").expect("valid sizes");
        assert!((d - 560.0).abs() < 1e-9);
        let d = distance_between("landscape", "1280x720").expect("valid sizes");
        assert!(d.abs() < f64::EPSILON);
    }

    #[test]
    fn test_single_candidate_is_returned_unconditionally() {
        let sizes = table(&[("only", 100.0, 0.0)]);
        let target = Size::new(720.0, 1280.0);
        assert_eq!(pick_best_reference(&sizes, &target).expect("one candidate"), "only");
    }

    #[test]
    fn test_empty_candidates_is_an_error() {
        let sizes = SizeTable::new();
        assert!(matches!(
            pick_best_reference(&sizes, &Size::new(1.0, 1.0)),
            Err(AdaptError::NoCandidateSizes)
        ));
    }

    #[test]
    fn test_aspect_ratio_beats_euclidean_distance() {
        // b is much closer in absolute size but has the wrong shape.
        let sizes = table(&[("a", 2000.0, 4000.0), ("b", 700.0, 700.0)]);
        let target = Size::new(720.0, 1280.0);
        assert_eq!(pick_best_reference(&sizes, &target).expect("ranked"), "a");
    }

    #[test]
    fn test_equal_ratio_tie_broken_by_euclidean_distance() {
        let sizes = table(&[("big", 2160.0, 3840.0), ("small", 540.0, 960.0)]);
        let target = Size::new(720.0, 1280.0);
        assert_eq!(pick_best_reference(&sizes, &target).expect("ranked"), "small");
    }

    #[test]
    fn test_degenerate_candidates_fall_back_to_first() {
        let sizes = table(&[("x", 100.0, 0.0), ("y", 200.0, 0.0)]);
        let target = Size::new(720.0, 1280.0);
        assert_eq!(pick_best_reference(&sizes, &target).expect("fallback"), "x");
    }

    #[test]
    fn test_scores_are_sorted_and_clamped() {
        let sizes = table(&[
            ("landscape", 1280.0, 720.0),
            ("flat", 500.0, 0.0),
            ("portrait", 720.0, 1280.0),
            ("square", 720.0, 720.0),
        ]);
        let target = Size::new(1080.0, 1920.0);
        let matches = score_candidates(&sizes, &target, &AdaptConfig::default());

        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["portrait", "square", "landscape", "flat"]);
        assert_eq!(matches[0].percentage, 94);
        assert_eq!(matches[1].percentage, 58);
        assert_eq!(matches[2].percentage, 20);
        assert_eq!(matches[3].percentage, 20);
        assert_eq!(matches[3].aspect_ratio_distance, None);
        assert!(matches.iter().all(|m| (20..=100).contains(&m.percentage)));
    }

    #[test]
    fn test_equal_distances_score_full() {
        let sizes = table(&[("one", 720.0, 1280.0), ("two", 720.0, 1280.0)]);
        let matches = score_candidates(&sizes, &Size::new(360.0, 640.0), &AdaptConfig::default());
        assert!(matches.iter().all(|m| m.percentage == 100));
        assert_eq!(matches[0].id, "one");
    }

    #[test]
    fn test_requested_reference_wins_when_present() {
        let sizes = table(&[("a", 720.0, 720.0), ("b", 1280.0, 720.0)]);
        let target = Size::new(720.0, 1280.0);
        assert_eq!(resolve_reference_size(&sizes, &target, Some("b")).expect("present"), "b");
        assert_eq!(resolve_reference_size(&sizes, &target, Some("zzz")).expect("fallback"), "a");
        assert_eq!(resolve_reference_size(&sizes, &target, None).expect("best"), "a");
    }

    #[test]
    fn test_closest_size_report() {
        let sizes = table(&[("a", 720.0, 720.0), ("b", 1280.0, 720.0)]);
        let closest =
            find_closest_size_with_matches(&sizes, &Size::new(720.0, 1280.0), &AdaptConfig::default())
                .expect("report");
        assert_eq!(closest.id, "a");
        assert_eq!(closest.matches.len(), 2);
        assert_eq!(closest.matches[0].id, "a");
    }
}

//! Comparison tolerances.
//!
//! A [`Tolerance`] is an immutable value built once and passed into every
//! comparison. Each limit is optional and independent: a missing limit means
//! no tolerance on that axis.
//!
//! - `color_distance_limit` - largest RGBA distance still counted as the same color
//! - `shift_distance_limit` - radius of the neighborhood searched for a displaced pixel
//! - `area_size_limit` - largest difference box (in pixels) still counted as equal
//! - `crop` - compare only the top-left `width` x `height` region
//! - `region_search` - strategy used to measure the difference box
//!
//! # Loading from YAML
//!
//! ```rust
//! use shotdiff_ops::{RegionSearch, Tolerance};
//!
//! let tol = Tolerance::from_yaml_str(
//!     "color_distance_limit: 4.5\narea_size_limit: 12\ncrop: { width: 800, height: 600 }\n",
//! ).unwrap();
//! assert_eq!(tol.area_size_limit, Some(12));
//! assert_eq!(tol.region_search, RegionSearch::Narrowing);
//! ```

use crate::{OpsError, OpsResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Strategy used to measure the difference bounding box.
///
/// Both strategies return the same box. `Narrowing` stops scanning columns
/// that can no longer move an edge; `Exhaustive` visits every pixel, so its
/// [`Metrics`](crate::Metrics) cover the whole image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionSearch {
    /// Two-phase narrowing scan (default).
    #[default]
    Narrowing,
    /// Full scan tracking min/max x and y of every differing pixel.
    Exhaustive,
}

/// Size of the top-left region compared when cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl CropSize {
    /// Creates a crop size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Limits applied when deciding whether two snapshots are the same.
///
/// The default value requires an exact match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tolerance {
    /// Largest color distance treated as a match.
    pub color_distance_limit: Option<f64>,
    /// Largest ring radius searched for a displaced pixel.
    pub shift_distance_limit: Option<u32>,
    /// Largest difference area (pixels) treated as equal.
    pub area_size_limit: Option<u64>,
    /// Compare only this top-left region.
    pub crop: Option<CropSize>,
    /// Bounding box strategy.
    pub region_search: RegionSearch,
}

impl Tolerance {
    /// Exact comparison: no limits at all.
    pub fn exact() -> Self {
        Self::default()
    }

    /// Sets the color distance limit.
    pub fn with_color_distance_limit(mut self, limit: f64) -> Self {
        self.color_distance_limit = Some(limit);
        self
    }

    /// Sets the shift distance limit.
    pub fn with_shift_distance_limit(mut self, limit: u32) -> Self {
        self.shift_distance_limit = Some(limit);
        self
    }

    /// Sets the area size limit.
    pub fn with_area_size_limit(mut self, limit: u64) -> Self {
        self.area_size_limit = Some(limit);
        self
    }

    /// Compares only the top-left `width` x `height` region.
    pub fn with_crop(mut self, width: u32, height: u32) -> Self {
        self.crop = Some(CropSize::new(width, height));
        self
    }

    /// Sets the bounding box strategy.
    pub fn with_region_search(mut self, search: RegionSearch) -> Self {
        self.region_search = search;
        self
    }

    /// Returns `true` if a color or shift limit can absorb pixel differences.
    #[inline]
    pub fn has_pixel_tolerance(&self) -> bool {
        self.color_distance_limit.is_some() || self.shift_distance_limit.is_some()
    }

    /// Decides whether a measured color distance counts as a match.
    ///
    /// Zero always matches. Otherwise a positive color limit is required and
    /// the distance must not exceed it.
    #[inline]
    pub fn color_matches(&self, distance: f64) -> bool {
        distance == 0.0
            || self
                .color_distance_limit
                .is_some_and(|limit| limit > 0.0 && distance <= limit)
    }

    /// Checks that every configured limit is usable.
    pub fn validate(&self) -> OpsResult<()> {
        if let Some(limit) = self.color_distance_limit {
            if !limit.is_finite() || limit < 0.0 {
                return Err(OpsError::InvalidTolerance(format!(
                    "color_distance_limit must be a finite non-negative number, got {}",
                    limit
                )));
            }
        }
        if let Some(crop) = self.crop {
            if crop.width == 0 || crop.height == 0 {
                return Err(OpsError::InvalidTolerance(format!(
                    "crop must be non-empty, got {}x{}",
                    crop.width, crop.height
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a YAML tolerance document.
    pub fn from_yaml_str(yaml: &str) -> OpsResult<Self> {
        let tolerance: Tolerance =
            serde_yaml::from_str(yaml).map_err(|e| OpsError::Config(e.to_string()))?;
        tolerance.validate()?;
        Ok(tolerance)
    }

    /// Loads and validates a YAML tolerance file.
    pub fn load<P: AsRef<Path>>(path: P) -> OpsResult<Self> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| OpsError::file("read", path, e))?;
        Self::from_yaml_str(&text)
    }

    /// Serializes to YAML.
    pub fn to_yaml_string(&self) -> OpsResult<String> {
        serde_yaml::to_string(self).map_err(|e| OpsError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_exact() {
        let tol = Tolerance::default();
        assert_eq!(tol, Tolerance::exact());
        assert!(!tol.has_pixel_tolerance());
        assert!(tol.color_matches(0.0));
        assert!(!tol.color_matches(0.1));
    }

    #[test]
    fn test_color_matches_needs_positive_limit() {
        let zero = Tolerance::exact().with_color_distance_limit(0.0);
        assert!(zero.has_pixel_tolerance());
        assert!(!zero.color_matches(0.5));

        let tol = Tolerance::exact().with_color_distance_limit(10.0);
        assert!(tol.color_matches(10.0));
        assert!(!tol.color_matches(10.01));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(Tolerance::exact().with_color_distance_limit(-1.0).validate().is_err());
        assert!(Tolerance::exact().with_color_distance_limit(f64::NAN).validate().is_err());
        assert!(Tolerance::exact().with_crop(0, 10).validate().is_err());
        assert!(Tolerance::exact().with_crop(10, 10).validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let tol = Tolerance::exact()
            .with_shift_distance_limit(2)
            .with_crop(320, 240)
            .with_region_search(RegionSearch::Exhaustive);
        let yaml = tol.to_yaml_string().unwrap();
        assert!(yaml.contains("exhaustive"));
        assert_eq!(Tolerance::from_yaml_str(&yaml).unwrap(), tol);
    }

    #[test]
    fn test_yaml_rejects_unknown_keys() {
        let err = Tolerance::from_yaml_str("colour_distance_limit: 3\n").unwrap_err();
        assert!(matches!(err, OpsError::Config(_)));
    }

    #[test]
    fn test_yaml_validates() {
        let err = Tolerance::from_yaml_str("color_distance_limit: -2\n").unwrap_err();
        assert!(matches!(err, OpsError::InvalidTolerance(_)));
    }
}

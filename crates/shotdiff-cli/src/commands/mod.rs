//! CLI command implementations

pub mod batch;
pub mod compare;
pub mod metrics;

use crate::ToleranceArgs;
use anyhow::{Context, Result};
use shotdiff_ops::{Metrics, RegionSearch, SnapshotPaths, Tolerance};
use std::path::{Path, PathBuf};

impl ToleranceArgs {
    /// Builds the tolerance: config file first, then flag overrides.
    pub fn to_tolerance(&self) -> Result<Tolerance> {
        let mut tolerance = match &self.config {
            Some(path) => Tolerance::load(path)
                .with_context(|| format!("Failed to load tolerance: {}", path.display()))?,
            None => Tolerance::exact(),
        };
        if let Some(limit) = self.color_distance {
            tolerance.color_distance_limit = Some(limit);
        }
        if let Some(limit) = self.shift_distance {
            tolerance.shift_distance_limit = Some(limit);
        }
        if let Some(limit) = self.area_size {
            tolerance.area_size_limit = Some(limit);
        }
        if let Some(crop) = self.crop {
            tolerance.crop = Some(crop);
        }
        if self.exhaustive {
            tolerance.region_search = RegionSearch::Exhaustive;
        }
        tolerance.validate().context("Invalid tolerance")?;
        Ok(tolerance)
    }
}

/// Default snapshot paths, with an optional explicit baseline.
pub fn snapshot_paths(candidate: &Path, baseline: Option<&PathBuf>) -> SnapshotPaths {
    let paths = SnapshotPaths::for_candidate(candidate);
    match baseline {
        Some(baseline) => paths.with_baseline(baseline),
        None => paths,
    }
}

/// One-line metrics summary.
pub fn format_metrics(metrics: &Metrics) -> String {
    match metrics.max_shift_distance {
        Some(shift) => format!(
            "max color distance {:.3}, max shift distance {}",
            metrics.max_color_distance, shift
        ),
        None => format!("max color distance {:.3}", metrics.max_color_distance),
    }
}

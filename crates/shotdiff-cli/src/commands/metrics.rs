//! Distance metrics of a snapshot pair

use crate::MetricsArgs;
use anyhow::{Context, Result, bail};
use shotdiff_ops::SnapshotComparison;
use tracing::trace;

pub fn run(args: MetricsArgs, _verbose: u8) -> Result<()> {
    trace!(candidate = %args.candidate.display(), "metrics::run");
    let tolerance = args.tolerance.to_tolerance()?;
    let paths = super::snapshot_paths(&args.candidate, args.baseline.as_ref());
    if !paths.has_baseline() {
        bail!("No baseline: {}", paths.baseline.display());
    }

    let mut cmp = SnapshotComparison::new(paths, tolerance);
    let metrics = cmp
        .metrics()
        .with_context(|| format!("Failed to measure: {}", args.candidate.display()))?;

    println!("{} vs {}", cmp.paths().baseline.display(), args.candidate.display());
    println!("  Max color distance: {:.6}", metrics.max_color_distance);
    match metrics.max_shift_distance {
        Some(shift) => println!("  Max shift distance: {}", shift),
        None => println!("  Max shift distance: n/a (no --shift-distance)"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToleranceArgs;
    use shotdiff_core::{Image, Pixel};
    use tempfile::tempdir;

    #[test]
    fn test_missing_baseline() {
        let dir = tempdir().unwrap();
        let candidate = dir.path().join("view.png");
        shotdiff_io::write(&candidate, &Image::filled(4, 4, Pixel::WHITE)).unwrap();
        let args = MetricsArgs { candidate, baseline: None, tolerance: ToleranceArgs::default() };
        assert!(run(args, 0).is_err());
    }

    #[test]
    fn test_measures_without_touching_files() {
        let dir = tempdir().unwrap();
        let candidate = dir.path().join("view.png");
        let mut new = Image::filled(8, 8, Pixel::WHITE);
        new.set_pixel(1, 1, Pixel::BLACK);
        shotdiff_io::write(dir.path().join("view.png~"), &Image::filled(8, 8, Pixel::WHITE)).unwrap();
        shotdiff_io::write(&candidate, &new).unwrap();

        let args = MetricsArgs { candidate, baseline: None, tolerance: ToleranceArgs::default() };
        assert!(run(args, 0).is_ok());
        assert!(dir.path().join("view.png~").exists());
        assert!(!dir.path().join("view_0.png~").exists());
    }
}

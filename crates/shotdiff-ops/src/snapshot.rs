//! Snapshot files on disk.
//!
//! A snapshot pair is a freshly captured candidate PNG and the baseline it
//! replaced. By default the baseline sits next to the candidate with a `~`
//! suffix, and annotated copies are written as `<name>_0.png~` (old) and
//! `<name>_1.png~` (new):
//!
//! ```text
//! login.png          candidate
//! login.png~         baseline
//! login_0.png~       baseline with the difference outlined
//! login_1.png~       candidate with the difference outlined
//! ```
//!
//! When a pair compares [`Outcome::Equal`] the baseline bytes are copied back
//! over the candidate and the temporary files are removed, so an unchanged
//! view never churns the stored snapshot.

use crate::compare::{Comparison, Outcome};
use crate::matcher::Metrics;
use crate::{OpsError, OpsResult, Tolerance};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Paths of the files belonging to one snapshot pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    /// Freshly captured image.
    pub candidate: PathBuf,
    /// Previously stored image.
    pub baseline: PathBuf,
    /// Baseline with the difference outlined.
    pub annotated_old: PathBuf,
    /// Candidate with the difference outlined.
    pub annotated_new: PathBuf,
    /// Baseline is the derived `~` file, removed by [`clean_up`](Self::clean_up).
    temporary_baseline: bool,
}

impl SnapshotPaths {
    /// Derives the default file names from the candidate path.
    ///
    /// ```rust
    /// use shotdiff_ops::SnapshotPaths;
    /// use std::path::Path;
    ///
    /// let paths = SnapshotPaths::for_candidate("shots/home.png");
    /// assert_eq!(paths.baseline, Path::new("shots/home.png~"));
    /// assert_eq!(paths.annotated_old, Path::new("shots/home_0.png~"));
    /// assert_eq!(paths.annotated_new, Path::new("shots/home_1.png~"));
    /// ```
    ///
    /// Only a lowercase `.png` extension is replaced; `SHOT.PNG` gets
    /// `SHOT.PNG_0.png~`.
    pub fn for_candidate<P: AsRef<Path>>(candidate: P) -> Self {
        let candidate = candidate.as_ref();
        let stem = match candidate.extension() {
            Some(ext) if ext == "png" => candidate.with_extension(""),
            _ => candidate.to_path_buf(),
        };
        Self {
            candidate: candidate.to_path_buf(),
            baseline: suffixed(candidate, "~"),
            annotated_old: suffixed(&stem, "_0.png~"),
            annotated_new: suffixed(&stem, "_1.png~"),
            temporary_baseline: true,
        }
    }

    /// Overrides the baseline path.
    ///
    /// An explicit baseline is a stored file and survives
    /// [`clean_up`](Self::clean_up).
    pub fn with_baseline<P: Into<PathBuf>>(mut self, baseline: P) -> Self {
        self.baseline = baseline.into();
        self.temporary_baseline = false;
        self
    }

    /// Overrides both annotated output paths.
    pub fn with_annotated<P: Into<PathBuf>, Q: Into<PathBuf>>(mut self, old: P, new: Q) -> Self {
        self.annotated_old = old.into();
        self.annotated_new = new.into();
        self
    }

    /// Returns `true` if the baseline file exists.
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_file()
    }

    /// Returns `true` if the baseline is the derived `~` file.
    #[inline]
    pub fn has_temporary_baseline(&self) -> bool {
        self.temporary_baseline
    }

    /// Copies the baseline over the candidate and removes any annotated
    /// files. A derived `~` baseline is removed as well; an explicit one is
    /// kept. Missing files are skipped.
    pub fn clean_up(&self) -> OpsResult<()> {
        trace!(candidate = %self.candidate.display(), "clean_up");
        if self.has_baseline() {
            fs::copy(&self.baseline, &self.candidate)
                .map_err(|e| OpsError::file("copy", &self.baseline, e))?;
        }
        if self.temporary_baseline {
            remove_if_exists(&self.baseline)?;
        }
        remove_if_exists(&self.annotated_old)?;
        remove_if_exists(&self.annotated_new)?;
        Ok(())
    }

    fn read_pair(&self) -> OpsResult<(Vec<u8>, Vec<u8>)> {
        let old = fs::read(&self.baseline).map_err(|e| OpsError::file("read", &self.baseline, e))?;
        let new = fs::read(&self.candidate).map_err(|e| OpsError::file("read", &self.candidate, e))?;
        Ok((old, new))
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> OpsResult<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(OpsError::file("remove", path, e)),
    }
}

/// Comparison of a snapshot pair stored on disk.
///
/// Wraps a [`Comparison`] with the file handling around it: byte-level
/// shortcuts, decoding, writing annotated copies and cleaning up.
#[derive(Debug, Clone)]
pub struct SnapshotComparison {
    paths: SnapshotPaths,
    session: Comparison,
}

impl SnapshotComparison {
    /// Creates a comparison for `paths` under `tolerance`.
    pub fn new(paths: SnapshotPaths, tolerance: Tolerance) -> Self {
        Self {
            paths,
            session: Comparison::new(tolerance),
        }
    }

    /// Shorthand for default paths derived from `candidate`.
    pub fn for_candidate<P: AsRef<Path>>(candidate: P, tolerance: Tolerance) -> Self {
        Self::new(SnapshotPaths::for_candidate(candidate), tolerance)
    }

    /// The files of this pair.
    #[inline]
    pub fn paths(&self) -> &SnapshotPaths {
        &self.paths
    }

    /// The in-memory session of the last comparison.
    #[inline]
    pub fn session(&self) -> &Comparison {
        &self.session
    }

    /// Fast verdict without side effects on disk.
    ///
    /// `None` if there is no baseline, otherwise whether the pair is equal
    /// under the tolerance.
    pub fn quick_equal(&mut self) -> OpsResult<Option<bool>> {
        trace!(candidate = %self.paths.candidate.display(), "quick_equal");
        self.session.reset();
        if !self.paths.has_baseline() {
            return Ok(None);
        }
        let (old_bytes, new_bytes) = self.paths.read_pair()?;
        if old_bytes == new_bytes {
            debug!("identical files");
            self.session.settle_identical();
            return Ok(Some(true));
        }
        let old = shotdiff_io::decode_png(&old_bytes)?;
        let new = shotdiff_io::decode_png(&new_bytes)?;
        Ok(Some(self.session.quick_equal_images(&old, &new)?))
    }

    /// Compares the pair and updates the files.
    ///
    /// On [`Outcome::Equal`] the pair is cleaned up; on
    /// [`Outcome::Different`] the annotated copies are written. Baseline and
    /// candidate are left untouched when they differ, so comparing again
    /// gives the same result.
    pub fn compare(&mut self) -> OpsResult<Outcome> {
        trace!(candidate = %self.paths.candidate.display(), "compare");
        self.session.reset();
        if !self.paths.has_baseline() {
            info!(candidate = %self.paths.candidate.display(), "no baseline");
            return Ok(Outcome::NoBaseline);
        }

        let (old_bytes, new_bytes) = self.paths.read_pair()?;
        if old_bytes == new_bytes {
            debug!("identical files");
            self.session.settle_identical();
            self.paths.clean_up()?;
            return Ok(Outcome::Equal);
        }

        let old = shotdiff_io::decode_png(&old_bytes)?;
        let new = shotdiff_io::decode_png(&new_bytes)?;
        let outcome = self.session.compare_images(&old, &new)?;
        match outcome {
            Outcome::Equal => self.paths.clean_up()?,
            Outcome::Different(bbox) => {
                if let Some((old_marked, new_marked)) = self.session.annotated_pair() {
                    shotdiff_io::write(&self.paths.annotated_old, old_marked)?;
                    shotdiff_io::write(&self.paths.annotated_new, new_marked)?;
                }
                info!(
                    candidate = %self.paths.candidate.display(),
                    bbox = %bbox,
                    "snapshot differs"
                );
            }
            Outcome::NoBaseline => {}
        }
        Ok(outcome)
    }

    /// Largest color and shift distances of the pair.
    ///
    /// Reuses the last comparison if there was one. Otherwise the pair is
    /// read and measured without comparing it, leaving the files as they
    /// are.
    pub fn metrics(&mut self) -> OpsResult<Metrics> {
        if !self.session.has_state() && self.paths.has_baseline() {
            let (old_bytes, new_bytes) = self.paths.read_pair()?;
            if old_bytes == new_bytes {
                self.session.settle_identical();
            } else {
                let old = shotdiff_io::decode_png(&old_bytes)?;
                let new = shotdiff_io::decode_png(&new_bytes)?;
                self.session.load_pair(&old, &new)?;
            }
        }
        Ok(self.session.metrics())
    }

    /// Largest color distance of the pair.
    pub fn max_color_distance(&mut self) -> OpsResult<f64> {
        Ok(self.metrics()?.max_color_distance)
    }

    /// Largest shift distance of the pair, `None` without a shift limit.
    pub fn max_shift_distance(&mut self) -> OpsResult<Option<f64>> {
        Ok(self.metrics()?.max_shift_distance_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotdiff_core::{BoundingBox, Image, Pixel};
    use tempfile::TempDir;

    fn white_with(width: u32, height: u32, dots: &[(u32, u32)]) -> Image {
        let mut img = Image::filled(width, height, Pixel::WHITE);
        for &(x, y) in dots {
            img.set_pixel(x, y, Pixel::BLACK);
        }
        img
    }

    fn pair(dir: &TempDir, old: &Image, new: &Image) -> SnapshotPaths {
        let paths = SnapshotPaths::for_candidate(dir.path().join("view.png"));
        shotdiff_io::write(&paths.baseline, old).unwrap();
        shotdiff_io::write(&paths.candidate, new).unwrap();
        paths
    }

    #[test]
    fn test_default_paths() {
        let paths = SnapshotPaths::for_candidate("a/b/shot.png");
        assert_eq!(paths.candidate, Path::new("a/b/shot.png"));
        assert_eq!(paths.baseline, Path::new("a/b/shot.png~"));
        assert_eq!(paths.annotated_old, Path::new("a/b/shot_0.png~"));
        assert_eq!(paths.annotated_new, Path::new("a/b/shot_1.png~"));

        assert!(paths.has_temporary_baseline());

        let paths = SnapshotPaths::for_candidate("shot").with_baseline("old/shot.png");
        assert_eq!(paths.baseline, Path::new("old/shot.png"));
        assert_eq!(paths.annotated_old, Path::new("shot_0.png~"));
        assert!(!paths.has_temporary_baseline());
    }

    #[test]
    fn test_uppercase_extension_is_kept() {
        let paths = SnapshotPaths::for_candidate("out/SHOT.PNG");
        assert_eq!(paths.baseline, Path::new("out/SHOT.PNG~"));
        assert_eq!(paths.annotated_old, Path::new("out/SHOT.PNG_0.png~"));
        assert_eq!(paths.annotated_new, Path::new("out/SHOT.PNG_1.png~"));
    }

    #[test]
    fn test_clean_up_keeps_explicit_baseline() {
        let dir = TempDir::new().unwrap();
        let img = white_with(6, 6, &[]);
        let golden = dir.path().join("golden.png");
        shotdiff_io::write(&golden, &img).unwrap();
        let paths = SnapshotPaths::for_candidate(dir.path().join("view.png")).with_baseline(&golden);
        shotdiff_io::write(&paths.candidate, &img).unwrap();
        fs::write(&paths.annotated_old, b"stale").unwrap();

        let mut cmp = SnapshotComparison::new(paths.clone(), Tolerance::exact());
        assert_eq!(cmp.compare().unwrap(), Outcome::Equal);
        assert!(golden.exists());
        assert!(paths.candidate.exists());
        assert!(!paths.annotated_old.exists());
    }

    #[test]
    fn test_no_baseline() {
        let dir = TempDir::new().unwrap();
        let paths = SnapshotPaths::for_candidate(dir.path().join("new.png"));
        shotdiff_io::write(&paths.candidate, &white_with(4, 4, &[])).unwrap();

        let mut cmp = SnapshotComparison::new(paths, Tolerance::exact());
        assert_eq!(cmp.quick_equal().unwrap(), None);
        assert_eq!(cmp.compare().unwrap(), Outcome::NoBaseline);
        assert_eq!(cmp.max_color_distance().unwrap(), 0.0);
        assert!(cmp.paths().candidate.exists());
    }

    #[test]
    fn test_equal_cleans_up() {
        let dir = TempDir::new().unwrap();
        let img = white_with(8, 8, &[]);
        let paths = pair(&dir, &img, &img);
        fs::write(&paths.annotated_old, b"stale").unwrap();
        fs::write(&paths.annotated_new, b"stale").unwrap();

        let mut cmp = SnapshotComparison::new(paths.clone(), Tolerance::exact());
        assert_eq!(cmp.quick_equal().unwrap(), Some(true));
        assert_eq!(cmp.compare().unwrap(), Outcome::Equal);
        assert!(paths.candidate.exists());
        assert!(!paths.baseline.exists());
        assert!(!paths.annotated_old.exists());
        assert!(!paths.annotated_new.exists());
    }

    #[test]
    fn test_equal_within_tolerance_keeps_baseline_bytes() {
        let dir = TempDir::new().unwrap();
        let old = white_with(8, 8, &[]);
        let mut new = old.clone();
        new.set_pixel(3, 3, Pixel::rgb(254, 254, 254));
        let paths = pair(&dir, &old, &new);
        let baseline_bytes = fs::read(&paths.baseline).unwrap();

        let tol = Tolerance::exact().with_color_distance_limit(2.0);
        let mut cmp = SnapshotComparison::new(paths.clone(), tol);
        assert_eq!(cmp.compare().unwrap(), Outcome::Equal);
        assert_eq!(fs::read(&paths.candidate).unwrap(), baseline_bytes);
        assert!(!paths.baseline.exists());
    }

    #[test]
    fn test_different_writes_annotations() {
        let dir = TempDir::new().unwrap();
        let old = white_with(100, 100, &[]);
        let dots: Vec<_> = (10..=12).flat_map(|y| (10..=12).map(move |x| (x, y))).collect();
        let new = white_with(100, 100, &dots);
        let paths = pair(&dir, &old, &new);
        let old_bytes = fs::read(&paths.baseline).unwrap();
        let new_bytes = fs::read(&paths.candidate).unwrap();

        let mut cmp = SnapshotComparison::new(paths.clone(), Tolerance::exact());
        let expected = Outcome::Different(BoundingBox::new(10, 10, 12, 12));
        assert_eq!(cmp.compare().unwrap(), expected);
        assert_eq!(fs::read(&paths.baseline).unwrap(), old_bytes);
        assert_eq!(fs::read(&paths.candidate).unwrap(), new_bytes);

        let marked = shotdiff_io::read(&paths.annotated_new).unwrap();
        assert_eq!(marked.pixel(9, 9), Pixel::RED);
        assert_eq!(marked.pixel(11, 11), Pixel::BLACK);
        let marked = shotdiff_io::read(&paths.annotated_old).unwrap();
        assert_eq!(marked.pixel(13, 13), Pixel::RED);
        assert_eq!(marked.pixel(11, 11), Pixel::WHITE);

        // Unmodified pair: same result again.
        assert_eq!(cmp.compare().unwrap(), expected);
        assert_eq!(cmp.quick_equal().unwrap(), Some(false));
    }

    #[test]
    fn test_metrics_without_compare() {
        let dir = TempDir::new().unwrap();
        let old = white_with(5, 5, &[(1, 1)]);
        let new = white_with(5, 5, &[(2, 1)]);
        let paths = pair(&dir, &old, &new);

        let tol = Tolerance::exact().with_shift_distance_limit(4);
        let mut cmp = SnapshotComparison::new(paths.clone(), tol);
        assert_eq!(cmp.max_shift_distance().unwrap(), Some(1.0));
        assert!(cmp.max_color_distance().unwrap() > 400.0);
        assert!(paths.baseline.exists());
        assert!(!paths.annotated_old.exists());
    }

    #[test]
    fn test_corrupt_baseline() {
        let dir = TempDir::new().unwrap();
        let paths = SnapshotPaths::for_candidate(dir.path().join("x.png"));
        shotdiff_io::write(&paths.candidate, &white_with(2, 2, &[])).unwrap();
        fs::write(&paths.baseline, b"not a png").unwrap();

        let mut cmp = SnapshotComparison::new(paths, Tolerance::exact());
        let err = cmp.compare().unwrap_err();
        assert!(matches!(err, OpsError::Codec(shotdiff_io::IoError::DecodeError(_))));
    }
}

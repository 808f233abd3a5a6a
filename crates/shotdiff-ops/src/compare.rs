//! In-memory comparison sessions.
//!
//! A [`Comparison`] takes two decoded images and a [`Tolerance`] and decides
//! whether they are the same. It keeps the state of the last comparison
//! (cropped pair, bounding box, running metrics) until the next one starts.
//! Nothing here touches the filesystem; see [`crate::snapshot`] for that.
//!
//! Checks run cheapest first:
//!
//! 1. identical pixel buffers
//! 2. crop to [`Tolerance::crop`], then compare dimensions
//! 3. identical pixel buffers after cropping
//! 4. pixel scan through [`PixelMatcher`]

use crate::annotate::annotate;
use crate::color::color_distance;
use crate::matcher::{Metrics, PixelMatcher};
use crate::region::{find_diff_rectangle, find_top};
use crate::shift::{shift_distance_at, ShiftDistance};
use crate::tolerance::{CropSize, Tolerance};
use crate::OpsResult;
use shotdiff_core::{BoundingBox, Image};
use tracing::{debug, info, trace};

/// Result of comparing a candidate against its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// There was nothing to compare against.
    NoBaseline,
    /// Same within tolerance.
    Equal,
    /// Different; the box encloses the difference in baseline coordinates.
    Different(BoundingBox),
}

impl Outcome {
    /// Returns `true` for [`Outcome::Equal`].
    #[inline]
    pub fn is_equal(&self) -> bool {
        matches!(self, Self::Equal)
    }

    /// Returns `true` for [`Outcome::Different`].
    #[inline]
    pub fn is_different(&self) -> bool {
        matches!(self, Self::Different(_))
    }

    /// The difference box, if any.
    #[inline]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            Self::Different(bbox) => Some(*bbox),
            _ => None,
        }
    }
}

/// A single-use comparison of two images.
///
/// Every call to [`quick_equal_images`](Self::quick_equal_images) or
/// [`compare_images`](Self::compare_images) starts from a clean state.
///
/// # Example
///
/// ```rust
/// use shotdiff_core::{BoundingBox, Image, Pixel};
/// use shotdiff_ops::{Comparison, Outcome, Tolerance};
///
/// let old = Image::filled(8, 8, Pixel::WHITE);
/// let mut new = old.clone();
/// new.set_pixel(3, 4, Pixel::BLACK);
///
/// let mut session = Comparison::new(Tolerance::exact());
/// let outcome = session.compare_images(&old, &new).unwrap();
/// assert_eq!(outcome, Outcome::Different(BoundingBox::point(3, 4)));
/// assert!(session.annotated_pair().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Comparison {
    tolerance: Tolerance,
    pair: Option<(Image, Image)>,
    scan: Option<Metrics>,
    bounds: Option<BoundingBox>,
    annotated: Option<(Image, Image)>,
}

impl Comparison {
    /// Creates a session applying `tolerance`.
    pub fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            pair: None,
            scan: None,
            bounds: None,
            annotated: None,
        }
    }

    /// The tolerance applied by this session.
    #[inline]
    pub fn tolerance(&self) -> &Tolerance {
        &self.tolerance
    }

    /// Difference box found by the last comparison.
    #[inline]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Annotated (old, new) copies from the last [`Outcome::Different`].
    #[inline]
    pub fn annotated_pair(&self) -> Option<&(Image, Image)> {
        self.annotated.as_ref()
    }

    /// Drops all state of the previous comparison.
    pub fn reset(&mut self) {
        self.pair = None;
        self.scan = None;
        self.bounds = None;
        self.annotated = None;
    }

    /// Returns `true` if a comparison has run since the last reset.
    pub(crate) fn has_state(&self) -> bool {
        self.scan.is_some() || self.pair.is_some()
    }

    /// Marks the last comparison as one between identical images.
    pub(crate) fn settle_identical(&mut self) {
        self.reset();
        self.scan = Some(Metrics::identical(&self.tolerance));
    }

    /// Crops and stores a pair for on-demand metrics without comparing it.
    pub(crate) fn load_pair(&mut self, old: &Image, new: &Image) -> OpsResult<()> {
        self.reset();
        self.pair = Some(self.prepare(old, new)?);
        Ok(())
    }

    fn prepare(&self, old: &Image, new: &Image) -> OpsResult<(Image, Image)> {
        Ok((
            crop_to(old, self.tolerance.crop)?,
            crop_to(new, self.tolerance.crop)?,
        ))
    }

    /// Fast verdict: `true` if the images are equal under the tolerance.
    ///
    /// Only scans as much as needed. With an area limit the difference box
    /// is measured; without one the first differing pixel decides.
    pub fn quick_equal_images(&mut self, old: &Image, new: &Image) -> OpsResult<bool> {
        trace!(old = ?old.dimensions(), new = ?new.dimensions(), "quick_equal_images");
        if old.same_pixels(new) {
            debug!("identical pixels");
            self.settle_identical();
            return Ok(true);
        }

        self.reset();
        let (old, new) = self.prepare(old, new)?;
        let verdict = self.quick_verdict(&old, &new);
        self.pair = Some((old, new));
        Ok(verdict)
    }

    fn quick_verdict(&mut self, old: &Image, new: &Image) -> bool {
        if old.dimensions() != new.dimensions() {
            info!(
                old = ?old.dimensions(),
                new = ?new.dimensions(),
                "image size changed"
            );
            return false;
        }
        if old.same_pixels(new) {
            debug!("identical pixels after crop");
            self.scan = Some(Metrics::identical(&self.tolerance));
            return true;
        }
        if !self.tolerance.has_pixel_tolerance() {
            debug!("pixels differ and no color or shift tolerance");
            return false;
        }

        let tolerance = self.tolerance.clone();
        let mut matcher = PixelMatcher::new(&tolerance);
        let verdict = match find_top(&mut matcher, old, new) {
            None => true,
            Some((x, y)) => match tolerance.area_size_limit {
                Some(limit) => {
                    let bbox = find_diff_rectangle(&mut matcher, old, new, Some(BoundingBox::point(x, y)));
                    self.bounds = bbox;
                    bbox.is_none_or(|b| b.area() <= limit)
                }
                None => {
                    self.bounds = Some(BoundingBox::point(x, y));
                    false
                }
            },
        };
        self.scan = Some(matcher.metrics());
        debug!(verdict, "pixel scan");
        verdict
    }

    /// Full comparison of two decoded images.
    ///
    /// Images whose (cropped) dimensions differ are always
    /// [`Outcome::Different`], with a box covering the whole old image.
    /// On `Different` the annotated copies are kept for
    /// [`annotated_pair`](Self::annotated_pair).
    pub fn compare_images(&mut self, old: &Image, new: &Image) -> OpsResult<Outcome> {
        trace!(old = ?old.dimensions(), new = ?new.dimensions(), "compare_images");
        if old.same_pixels(new) {
            debug!("identical pixels");
            self.settle_identical();
            return Ok(Outcome::Equal);
        }

        self.reset();
        let (old, new) = self.prepare(old, new)?;
        let outcome = self.decide(&old, &new);
        if let Outcome::Different(bbox) = outcome {
            self.annotated = Some((annotate(&old, bbox), annotate(&new, bbox)));
        }
        self.pair = Some((old, new));
        info!(outcome = ?outcome, "comparison finished");
        Ok(outcome)
    }

    fn decide(&mut self, old: &Image, new: &Image) -> Outcome {
        if old.dimensions() != new.dimensions() {
            info!(
                old = ?old.dimensions(),
                new = ?new.dimensions(),
                "image size changed"
            );
            let bbox = old.bounds();
            self.bounds = Some(bbox);
            return Outcome::Different(bbox);
        }
        if old.same_pixels(new) {
            debug!("identical pixels after crop");
            self.scan = Some(Metrics::identical(&self.tolerance));
            return Outcome::Equal;
        }

        let tolerance = self.tolerance.clone();
        let mut matcher = PixelMatcher::new(&tolerance);
        let bbox = find_diff_rectangle(&mut matcher, old, new, None);
        self.scan = Some(matcher.metrics());
        self.bounds = bbox;

        match (bbox, tolerance.area_size_limit) {
            (None, _) => Outcome::Equal,
            (Some(b), Some(limit)) if b.area() <= limit => {
                debug!(area = b.area(), limit, "difference within area limit");
                Outcome::Equal
            }
            (Some(b), _) => Outcome::Different(b),
        }
    }

    /// Largest color and shift distances of the last comparison.
    ///
    /// Returns the values recorded while scanning if a scan ran. Otherwise
    /// they are computed over the stored pair (restricted to the overlapping
    /// area if the sizes differ) and cached. Without any comparison the
    /// metrics of identical images are returned.
    pub fn metrics(&mut self) -> Metrics {
        if let Some(metrics) = self.scan {
            return metrics;
        }
        let metrics = match &self.pair {
            Some((old, new)) => full_metrics(&self.tolerance, old, new),
            None => Metrics::identical(&self.tolerance),
        };
        self.scan = Some(metrics);
        metrics
    }

    /// Largest color distance of the last comparison.
    pub fn max_color_distance(&mut self) -> f64 {
        self.metrics().max_color_distance
    }

    /// Largest shift distance of the last comparison.
    ///
    /// `None` when no shift limit is configured, infinity when some pixel
    /// has no match anywhere in the other image.
    pub fn max_shift_distance(&mut self) -> Option<f64> {
        self.metrics().max_shift_distance_f64()
    }
}

/// Crops to the top-left `crop` region unless the image is smaller than it
/// in either dimension or already has exactly that size.
fn crop_to(image: &Image, crop: Option<CropSize>) -> OpsResult<Image> {
    match crop {
        Some(c)
            if image.width() >= c.width
                && image.height() >= c.height
                && image.dimensions() != (c.width, c.height) =>
        {
            debug!(width = c.width, height = c.height, "cropping");
            Ok(image.crop(0, 0, c.width, c.height)?)
        }
        _ => Ok(image.clone()),
    }
}

fn full_metrics(tolerance: &Tolerance, old: &Image, new: &Image) -> Metrics {
    if old.same_pixels(new) {
        return Metrics::identical(tolerance);
    }
    let width = old.width().min(new.width());
    let height = old.height().min(new.height());
    trace!(width, height, "computing full metrics");

    let mut max_color = 0.0f64;
    for y in 0..height {
        for x in 0..width {
            max_color = max_color.max(color_distance(old.pixel(x, y), new.pixel(x, y)));
        }
    }

    let max_shift = tolerance.shift_distance_limit.map(|_| {
        let mut max_shift = ShiftDistance::ZERO;
        'scan: for y in 0..height {
            for x in 0..width {
                let shift = shift_distance_at(old, new, x, y, tolerance.color_distance_limit);
                max_shift = max_shift.max(shift);
                if max_shift.is_unreachable() {
                    break 'scan;
                }
            }
        }
        max_shift
    });

    Metrics {
        max_color_distance: max_color,
        max_shift_distance: max_shift,
    }
}

//! Per-pixel tolerance test and running metrics.
//!
//! [`PixelMatcher::same_color`] is the single decision point every region
//! scan goes through. As a side effect it records the largest color distance
//! and, with a shift limit, the largest shift distance seen so far. Those
//! maxima are diagnostics only: the match decision is made on color alone.

use crate::color::color_distance;
use crate::shift::{nearest_color_distance, shift_distance_at, ShiftDistance};
use crate::Tolerance;
use shotdiff_core::Image;

/// Largest distances observed during a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    /// Largest color distance seen.
    pub max_color_distance: f64,
    /// Largest shift distance seen, `None` without a shift limit.
    pub max_shift_distance: Option<ShiftDistance>,
}

impl Metrics {
    /// Metrics of two identical images under `tolerance`.
    pub fn identical(tolerance: &Tolerance) -> Self {
        Self {
            max_color_distance: 0.0,
            max_shift_distance: tolerance.shift_distance_limit.map(|_| ShiftDistance::ZERO),
        }
    }

    /// Largest shift distance as a float (`inf` when unreachable).
    pub fn max_shift_distance_f64(&self) -> Option<f64> {
        self.max_shift_distance.map(ShiftDistance::as_f64)
    }

    fn record_color(&mut self, distance: f64) {
        if distance > self.max_color_distance {
            self.max_color_distance = distance;
        }
    }

    fn record_shift(&mut self, shift: ShiftDistance) {
        match self.max_shift_distance {
            Some(current) if current >= shift => {}
            _ => self.max_shift_distance = Some(shift),
        }
    }
}

/// Applies a [`Tolerance`] pixel by pixel and accumulates [`Metrics`].
///
/// A matcher lives for one comparison only.
#[derive(Debug)]
pub struct PixelMatcher<'t> {
    tolerance: &'t Tolerance,
    metrics: Metrics,
}

impl<'t> PixelMatcher<'t> {
    /// Creates a matcher with zeroed metrics.
    pub fn new(tolerance: &'t Tolerance) -> Self {
        Self {
            tolerance,
            metrics: Metrics::identical(tolerance),
        }
    }

    /// The tolerance being applied.
    #[inline]
    pub fn tolerance(&self) -> &'t Tolerance {
        self.tolerance
    }

    /// Metrics accumulated so far.
    #[inline]
    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    /// Returns `true` if the pixel at (x, y) matches under the color limit.
    ///
    /// With a shift limit the distance is the smallest one found in the
    /// `limit`-radius neighborhood of (x, y), so a pixel displaced by at most
    /// the limit compares as its exact color. The shift distance of the
    /// pixel itself (0 when its own color matches) is then measured for the
    /// metrics, until it has become unreachable once.
    pub fn same_color(&mut self, old: &Image, new: &Image, x: u32, y: u32) -> bool {
        let distance = match self.tolerance.shift_distance_limit {
            Some(limit) => nearest_color_distance(old, new, x, y, limit),
            None => color_distance(old.pixel(x, y), new.pixel(x, y)),
        };
        self.metrics.record_color(distance);

        let matches = self.tolerance.color_matches(distance);
        if self.tolerance.shift_distance_limit.is_none()
            || self
                .metrics
                .max_shift_distance
                .is_some_and(ShiftDistance::is_unreachable)
        {
            return matches;
        }

        // Ring 0 is the pixel itself, so a direct match costs one probe.
        let shift = shift_distance_at(old, new, x, y, self.tolerance.color_distance_limit);
        self.metrics.record_shift(shift);
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotdiff_core::Pixel;

    fn white(width: u32, height: u32) -> Image {
        Image::filled(width, height, Pixel::WHITE)
    }

    #[test]
    fn test_exact_match() {
        let tol = Tolerance::exact();
        let img = white(3, 3);
        let mut m = PixelMatcher::new(&tol);
        assert!(m.same_color(&img, &img, 1, 1));
        assert_eq!(m.metrics().max_color_distance, 0.0);
        assert_eq!(m.metrics().max_shift_distance, None);
    }

    #[test]
    fn test_records_max_color_distance() {
        let tol = Tolerance::exact().with_color_distance_limit(20.0);
        let old = white(3, 1);
        let mut new = white(3, 1);
        new.set_pixel(0, 0, Pixel::rgb(245, 255, 255));
        new.set_pixel(2, 0, Pixel::rgb(255, 225, 255));

        let mut m = PixelMatcher::new(&tol);
        assert!(m.same_color(&old, &new, 0, 0));
        assert!(!m.same_color(&old, &new, 2, 0));
        assert!(m.same_color(&old, &new, 1, 0));
        assert_eq!(m.metrics().max_color_distance, 30.0);
    }

    #[test]
    fn test_zero_color_limit_is_exact() {
        let tol = Tolerance::exact().with_color_distance_limit(0.0);
        let old = white(1, 1);
        let new = Image::filled(1, 1, Pixel::rgb(254, 255, 255));
        let mut m = PixelMatcher::new(&tol);
        assert!(!m.same_color(&old, &new, 0, 0));
    }

    #[test]
    fn test_shift_limit_absorbs_displacement() {
        let tol = Tolerance::exact().with_shift_distance_limit(2);
        let mut old = white(7, 7);
        old.set_pixel(3, 3, Pixel::BLACK);
        let mut new = white(7, 7);
        new.set_pixel(5, 3, Pixel::BLACK);

        let mut m = PixelMatcher::new(&tol);
        assert!(m.same_color(&old, &new, 3, 3));
        assert!(m.same_color(&old, &new, 5, 3));
        assert!(m.same_color(&old, &new, 0, 0));
        assert_eq!(m.metrics().max_color_distance, 0.0);
        assert_eq!(m.metrics().max_shift_distance, Some(ShiftDistance::Within(2)));
    }

    #[test]
    fn test_shift_recorded_for_mismatch() {
        let tol = Tolerance::exact().with_shift_distance_limit(1);
        let mut old = white(9, 1);
        old.set_pixel(0, 0, Pixel::BLACK);
        let mut new = white(9, 1);
        new.set_pixel(4, 0, Pixel::BLACK);

        let mut m = PixelMatcher::new(&tol);
        assert!(!m.same_color(&old, &new, 0, 0));
        assert_eq!(m.metrics().max_shift_distance, Some(ShiftDistance::Within(4)));
        assert_eq!(m.metrics().max_shift_distance_f64(), Some(4.0));
    }

    #[test]
    fn test_unreachable_stops_shift_tracking() {
        let tol = Tolerance::exact().with_shift_distance_limit(1);
        let mut old = white(4, 1);
        old.set_pixel(0, 0, Pixel::BLACK);
        let new = white(4, 1);

        let mut m = PixelMatcher::new(&tol);
        assert!(!m.same_color(&old, &new, 0, 0));
        assert_eq!(m.metrics().max_shift_distance, Some(ShiftDistance::Unreachable));
        assert!(m.same_color(&old, &new, 1, 0));
        assert_eq!(m.metrics().max_shift_distance, Some(ShiftDistance::Unreachable));
    }
}

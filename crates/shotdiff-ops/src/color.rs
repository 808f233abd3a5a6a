//! Color distance metric.
//!
//! Distance between two pixels is the Euclidean norm of their channel
//! differences, alpha included:
//!
//! ```text
//! d = sqrt((r1-r2)² + (g1-g2)² + (b1-b2)² + (a1-a2)²)
//! ```
//!
//! The largest possible distance (transparent black vs opaque white) is 510.

use shotdiff_core::Pixel;

/// Largest distance two RGBA pixels can have.
pub const MAX_COLOR_DISTANCE: f64 = 510.0;

/// Euclidean RGBA distance between two pixels.
///
/// # Example
///
/// ```rust
/// use shotdiff_core::Pixel;
/// use shotdiff_ops::color::color_distance;
///
/// assert_eq!(color_distance(Pixel::WHITE, Pixel::WHITE), 0.0);
/// assert_eq!(color_distance(Pixel::rgba(3, 0, 0, 0), Pixel::rgba(0, 4, 0, 0)), 5.0);
/// ```
#[inline]
pub fn color_distance(a: Pixel, b: Pixel) -> f64 {
    let sum: u32 = a
        .0
        .iter()
        .zip(b.0.iter())
        .map(|(&ca, &cb)| {
            let d = ca.abs_diff(cb) as u32;
            d * d
        })
        .sum();
    (sum as f64).sqrt()
}

//! Shift matching: tolerating pixels that moved a little.
//!
//! Rendering jitter often moves a glyph or border by a pixel or two without
//! changing its color. The shift matcher looks for the baseline color in the
//! candidate image on square rings of growing radius around the original
//! position:
//!
//! ```text
//!   r = 2  ┌───────────┐
//!          │ ┌───────┐ │
//!          │ │ ┌───┐ │ │   r = 0 is the pixel itself,
//!          │ │ │ x │ │ │   r = 1 the 8 pixels around it,
//!          │ │ └───┘ │ │   r = 2 the next 16, ...
//!          │ └───────┘ │
//!          └───────────┘
//! ```
//!
//! [`probe_ring`] tests exactly one ring; [`shift_distance_at`] walks the
//! rings outward and stops at the first match or once a ring lies entirely
//! outside the image. The radius therefore never exceeds
//! `max(width, height)`.

use crate::color::color_distance;
use shotdiff_core::{Image, Pixel};
use std::cmp::Ordering;
use std::fmt;

/// Ring radius at which a displaced pixel was found.
///
/// `Unreachable` sorts after every finite radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShiftDistance {
    /// Matching pixel found on the ring of this radius.
    Within(u32),
    /// No pixel in the image matches.
    Unreachable,
}

impl ShiftDistance {
    /// No displacement.
    pub const ZERO: ShiftDistance = ShiftDistance::Within(0);

    /// Converts to a float, `Unreachable` becoming infinity.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Within(r) => r as f64,
            Self::Unreachable => f64::INFINITY,
        }
    }

    /// Returns `true` for `Unreachable`.
    #[inline]
    pub fn is_unreachable(self) -> bool {
        matches!(self, Self::Unreachable)
    }

    /// Returns `true` if the distance does not exceed `limit`.
    #[inline]
    pub fn within(self, limit: u32) -> bool {
        self.cmp(&Self::Within(limit)) != Ordering::Greater
    }
}

impl fmt::Display for ShiftDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Within(r) => write!(f, "{}", r),
            Self::Unreachable => f.write_str("inf"),
        }
    }
}

/// Result of testing a single ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingProbe {
    /// A pixel on the ring matches.
    Match,
    /// Part of the ring is inside the image but nothing matches.
    Miss,
    /// All four edges of the ring are outside the image.
    OutOfBounds,
}

/// Color test used while searching rings.
///
/// Without a limit the candidate must equal the target exactly.
#[inline]
fn candidate_matches(target: Pixel, candidate: Pixel, color_limit: Option<f64>) -> bool {
    match color_limit {
        None => candidate == target,
        Some(limit) => color_distance(target, candidate) <= limit,
    }
}

/// Tests the ring of radius `radius` centered at (x, y) in `new`.
///
/// Edges are visited top, left, bottom, right; for `radius == 0` only the
/// center pixel is tested. Each edge is clipped to the image; the corners
/// belong to the top and bottom edges.
pub fn probe_ring(
    new: &Image,
    target: Pixel,
    x: u32,
    y: u32,
    radius: u32,
    color_limit: Option<f64>,
) -> RingProbe {
    let (w, h) = (new.width() as i64, new.height() as i64);
    let (cx, cy, r) = (x as i64, y as i64, radius as i64);
    let hits = |px: i64, py: i64| candidate_matches(target, new.pixel(px as u32, py as u32), color_limit);

    let x_span = (cx - r).max(0)..=(cx + r).min(w - 1);
    let y_span = (cy - r + 1).max(0)..=(cy + r - 1).min(h - 1);
    let mut breached = 0;

    // top
    let top = cy - r;
    if top >= 0 {
        if x_span.clone().any(|px| hits(px, top)) {
            return RingProbe::Match;
        }
    } else {
        breached += 1;
    }

    if r == 0 {
        return RingProbe::Miss;
    }

    // left
    let left = cx - r;
    if left >= 0 {
        if y_span.clone().any(|py| hits(left, py)) {
            return RingProbe::Match;
        }
    } else {
        breached += 1;
    }

    // bottom
    let bottom = cy + r;
    if bottom < h {
        if x_span.clone().any(|px| hits(px, bottom)) {
            return RingProbe::Match;
        }
    } else {
        breached += 1;
    }

    // right
    let right = cx + r;
    if right < w {
        if y_span.clone().any(|py| hits(right, py)) {
            return RingProbe::Match;
        }
    } else {
        breached += 1;
    }

    if breached == 4 {
        RingProbe::OutOfBounds
    } else {
        RingProbe::Miss
    }
}

/// Smallest ring radius at which `new` holds the color of `old` at (x, y).
///
/// Both images must share dimensions, or at least contain (x, y).
pub fn shift_distance_at(
    old: &Image,
    new: &Image,
    x: u32,
    y: u32,
    color_limit: Option<f64>,
) -> ShiftDistance {
    let target = old.pixel(x, y);
    let max_radius = new.width().max(new.height());
    for radius in 0..=max_radius {
        match probe_ring(new, target, x, y, radius, color_limit) {
            RingProbe::Match => return ShiftDistance::Within(radius),
            RingProbe::Miss => {}
            RingProbe::OutOfBounds => break,
        }
    }
    ShiftDistance::Unreachable
}

/// Smallest color distance between `old` at (x, y) and any pixel of `new`
/// within Chebyshev distance `radius`, clipped to the image.
pub fn nearest_color_distance(old: &Image, new: &Image, x: u32, y: u32, radius: u32) -> f64 {
    let target = old.pixel(x, y);
    let x0 = x.saturating_sub(radius);
    let x1 = x.saturating_add(radius).min(new.width() - 1);
    let y0 = y.saturating_sub(radius);
    let y1 = y.saturating_add(radius).min(new.height() - 1);

    let mut best = f64::INFINITY;
    for py in y0..=y1 {
        for px in x0..=x1 {
            let d = color_distance(target, new.pixel(px, py));
            if d < best {
                best = d;
                if best == 0.0 {
                    return best;
                }
            }
        }
    }
    best
}

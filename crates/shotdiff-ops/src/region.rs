//! Difference region search.
//!
//! All scans go through [`PixelMatcher::same_color`] in row-major order
//! (top-to-bottom, left-to-right within a row). That order decides which
//! differing pixel is reported first and must not change.
//!
//! # Narrowing search
//!
//! [`RegionSearch::Narrowing`] finds the box in two phases:
//!
//! 1. Top-down, each row is scanned forward from column 0 up to the current
//!    `left` edge and backward from the last column down to the current
//!    `right` edge. Any hit pushes that edge outward and moves the provisional
//!    `bottom` to the row. Once the edges have converged, rows only cost the
//!    columns outside `[left, right]`.
//! 2. Bottom-up, rows below the provisional bottom are scanned inside
//!    `[left, right]` only; the first hit is the final bottom.
//!
//! Every pixel skipped by phase 1 lies inside the column range reached so
//! far, and every skipped pixel below the provisional bottom is inside the
//! final range that phase 2 scans, so both strategies return the same box.
//! They differ in which pixels are visited: narrowing skips pixels that cannot
//! move an edge, which also leaves them out of the running [`Metrics`].
//! [`RegionSearch::Exhaustive`] visits every pixel.
//!
//! [`Metrics`]: crate::Metrics

use crate::matcher::PixelMatcher;
use crate::RegionSearch;
use shotdiff_core::{BoundingBox, Image};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Returns the first differing pixel in row-major order.
pub fn find_top(matcher: &mut PixelMatcher<'_>, old: &Image, new: &Image) -> Option<(u32, u32)> {
    for y in 0..old.height() {
        for x in 0..old.width() {
            if !matcher.same_color(old, new, x, y) {
                trace!(x, y, "find_top hit");
                return Some((x, y));
            }
        }
    }
    None
}

/// Computes the bounding box of the differing pixels.
///
/// `seed` is a box already known to contain differing pixels (for instance
/// the result of [`find_top`]); the search starts from its edges. Returns
/// `None` if no pixel differs.
pub fn find_diff_rectangle(
    matcher: &mut PixelMatcher<'_>,
    old: &Image,
    new: &Image,
    seed: Option<BoundingBox>,
) -> Option<BoundingBox> {
    if old.is_empty() {
        return None;
    }
    let bbox = match matcher.tolerance().region_search {
        RegionSearch::Narrowing => find_left_right_and_top(matcher, old, new, seed)
            .map(|bbox| find_bottom(matcher, old, new, bbox)),
        RegionSearch::Exhaustive => find_exhaustive(matcher, old, new, seed),
    };
    debug!(bbox = ?bbox, "find_diff_rectangle");
    bbox
}

/// Phase 1: left, right and top edges plus a provisional bottom.
fn find_left_right_and_top(
    matcher: &mut PixelMatcher<'_>,
    old: &Image,
    new: &Image,
    seed: Option<BoundingBox>,
) -> Option<BoundingBox> {
    let width = old.width();
    let mut top = seed.map(|b| b.top);
    let mut bottom = seed.map(|b| b.bottom);
    // Until the first hit `left` is past the last column, so the forward
    // scan covers whole rows.
    let mut left = seed.map_or(width, |b| b.left);
    let mut right = seed.map_or(0, |b| b.right);

    for y in 0..old.height() {
        if let Some(x) = (0..left).find(|&x| !matcher.same_color(old, new, x, y)) {
            top.get_or_insert(y);
            bottom = Some(y);
            left = x;
            right = right.max(x);
        }
        if top.is_none() {
            continue;
        }
        if let Some(x) = (right + 1..width)
            .rev()
            .find(|&x| !matcher.same_color(old, new, x, y))
        {
            bottom = Some(y);
            right = x;
        }
    }

    match (top, bottom) {
        (Some(top), Some(bottom)) => Some(BoundingBox::new(left, top, right, bottom)),
        _ => None,
    }
}

/// Phase 2: lowest differing row inside the column range of `bbox`.
fn find_bottom(
    matcher: &mut PixelMatcher<'_>,
    old: &Image,
    new: &Image,
    mut bbox: BoundingBox,
) -> BoundingBox {
    for y in (bbox.bottom + 1..old.height()).rev() {
        if (bbox.left..=bbox.right).any(|x| !matcher.same_color(old, new, x, y)) {
            bbox.bottom = y;
            break;
        }
    }
    bbox
}

fn find_exhaustive(
    matcher: &mut PixelMatcher<'_>,
    old: &Image,
    new: &Image,
    seed: Option<BoundingBox>,
) -> Option<BoundingBox> {
    let mut bbox = seed;
    for y in 0..old.height() {
        for x in 0..old.width() {
            if !matcher.same_color(old, new, x, y) {
                match bbox.as_mut() {
                    Some(b) => b.include(x, y),
                    None => bbox = Some(BoundingBox::point(x, y)),
                }
            }
        }
    }
    bbox
}

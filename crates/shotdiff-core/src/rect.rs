//! Bounding box of a detected difference.
//!
//! # Coordinate System
//!
//! All coordinates use the standard image convention:
//! - Origin (0, 0) is at the **top-left** corner
//! - X increases to the right
//! - Y increases downward
//!
//! ```text
//! (0,0) ────────► X
//!   │
//!   │   (left,top)
//!   │       ┌──────────┐
//!   │       │   diff   │
//!   │       └──────────┘
//!   ▼             (right,bottom)
//!   Y
//! ```
//!
//! Unlike an origin+size rectangle, a [`BoundingBox`] stores four
//! **inclusive** edges: a single differing pixel at (3, 7) is the box
//! `(3, 7, 3, 7)` with an area of 1.

use std::fmt;

/// Inclusive pixel rectangle enclosing the pixels that failed a tolerance test.
///
/// # Invariants
///
/// - `left <= right`
/// - `top <= bottom`
///
/// # Example
///
/// ```rust
/// use shotdiff_core::BoundingBox;
///
/// let bbox = BoundingBox::new(10, 10, 12, 12);
/// assert_eq!(bbox.width(), 3);
/// assert_eq!(bbox.area(), 9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    /// Leftmost column (inclusive)
    pub left: u32,
    /// Topmost row (inclusive)
    pub top: u32,
    /// Rightmost column (inclusive)
    pub right: u32,
    /// Bottommost row (inclusive)
    pub bottom: u32,
}

impl BoundingBox {
    /// Creates a box from its four inclusive edges.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `left > right` or `top > bottom`.
    #[inline]
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        debug_assert!(left <= right && top <= bottom, "inverted bounding box");
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a box covering the single pixel at (x, y).
    #[inline]
    pub fn point(x: u32, y: u32) -> Self {
        Self::new(x, y, x, y)
    }

    /// Creates a box covering a whole `width` x `height` image.
    ///
    /// A zero dimension collapses to the first row or column.
    #[inline]
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width.saturating_sub(1), height.saturating_sub(1))
    }

    /// Width in pixels (`right - left + 1`).
    #[inline]
    pub const fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Height in pixels (`bottom - top + 1`).
    #[inline]
    pub const fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Number of pixels enclosed by the box.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    /// Returns `true` if (x, y) lies inside the box.
    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    /// Grows the box so that it also covers (x, y).
    #[inline]
    pub fn include(&mut self, x: u32, y: u32) {
        self.left = self.left.min(x);
        self.right = self.right.max(x);
        self.top = self.top.min(y);
        self.bottom = self.bottom.max(y);
    }

    /// Returns the edges as `[left, top, right, bottom]`.
    #[inline]
    pub const fn to_array(&self) -> [u32; 4] {
        [self.left, self.top, self.right, self.bottom]
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}) {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

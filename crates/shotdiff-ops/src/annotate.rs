//! Difference highlighting.
//!
//! Draws a one pixel outline just outside a [`BoundingBox`] so the changed
//! pixels themselves stay visible. Parts of the outline that fall outside
//! the image are dropped.

use shotdiff_core::{BoundingBox, Image, Pixel};

/// Outline color.
pub const HIGHLIGHT: Pixel = Pixel::RED;

/// Returns a copy of `image` with a red outline around `bbox`.
///
/// The outline runs along `left - 1`, `top - 1`, `right + 1` and
/// `bottom + 1`. The source image is not modified.
///
/// # Example
///
/// ```rust
/// use shotdiff_core::{BoundingBox, Image, Pixel};
/// use shotdiff_ops::annotate::annotate;
///
/// let img = Image::filled(5, 5, Pixel::WHITE);
/// let marked = annotate(&img, BoundingBox::point(2, 2));
/// assert_eq!(marked.pixel(1, 1), Pixel::RED);
/// assert_eq!(marked.pixel(2, 2), Pixel::WHITE);
/// assert_eq!(img.pixel(1, 1), Pixel::WHITE);
/// ```
pub fn annotate(image: &Image, bbox: BoundingBox) -> Image {
    let mut out = image.clone();
    let x0 = bbox.left as i64 - 1;
    let y0 = bbox.top as i64 - 1;
    let x1 = bbox.right as i64 + 1;
    let y1 = bbox.bottom as i64 + 1;

    for x in x0..=x1 {
        plot(&mut out, x, y0);
        plot(&mut out, x, y1);
    }
    for y in y0 + 1..y1 {
        plot(&mut out, x0, y);
        plot(&mut out, x1, y);
    }
    out
}

#[inline]
fn plot(image: &mut Image, x: i64, y: i64) {
    if x >= 0 && y >= 0 && x < image.width() as i64 && y < image.height() as i64 {
        image.set_pixel(x as u32, y as u32, HIGHLIGHT);
    }
}

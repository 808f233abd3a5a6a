//! Decoded RGBA raster buffer.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom, four bytes each:
//!
//! ```text
//! Memory: [R G B A R G B A R G B A ...]  ← Row 0
//!         [R G B A R G B A R G B A ...]  ← Row 1
//!         ...
//! ```
//!
//! Rows are tightly packed, so the stride is always `width * 4`.
//!
//! # Sharing
//!
//! The buffer lives behind an [`Arc`]: cloning an [`Image`] is cheap and the
//! clone shares the pixels until one side is written to ([`Image::set_pixel`]
//! copies on write). Annotation relies on this to draw on a copy without
//! touching the source.
//!
//! # Usage
//!
//! ```rust
//! use shotdiff_core::{Image, Pixel};
//!
//! let mut img = Image::filled(4, 4, Pixel::WHITE);
//! img.set_pixel(1, 2, Pixel::BLACK);
//!
//! let cropped = img.crop(1, 2, 2, 2).unwrap();
//! assert_eq!(cropped.pixel(0, 0), Pixel::BLACK);
//! ```

use crate::{BoundingBox, Error, Pixel, Result};
use std::fmt;
use std::sync::Arc;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Owned 8-bit RGBA image.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel data buffer (Arc for cheap cloning)
    data: Arc<Vec<u8>>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

impl Image {
    /// Creates a new fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Pixel::TRANSPARENT)
    }

    /// Creates an image with every pixel set to `pixel`.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * BYTES_PER_PIXEL);
        for _ in 0..count {
            data.extend_from_slice(&pixel.0);
        }
        Self {
            data: Arc::new(data),
            width,
            height,
        }
    }

    /// Wraps a raw row-major RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data` does not hold exactly
    /// `width * height` pixels.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} bytes, got {}", expected, data.len()),
            ));
        }
        Ok(Self {
            data: Arc::new(data),
            width,
            height,
        })
    }

    /// Returns the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the image dimensions as (width, height).
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the image has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns a box covering the entire image.
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::full(self.width, self.height)
    }

    /// Returns the raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns the raw RGBA bytes.
    ///
    /// Copies only if the buffer is still shared with a clone.
    pub fn into_raw(self) -> Vec<u8> {
        Arc::try_unwrap(self.data).unwrap_or_else(|shared| (*shared).clone())
    }

    /// Returns `true` if both images have the same dimensions and pixel bytes.
    #[inline]
    pub fn same_pixels(&self, other: &Image) -> bool {
        self.dimensions() == other.dimensions()
            && (Arc::ptr_eq(&self.data, &other.data) || self.data == other.data)
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Returns the pixel at (x, y).
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{}",
            x,
            y,
            self.width,
            self.height
        );
        let o = self.offset(x, y);
        Pixel([
            self.data[o],
            self.data[o + 1],
            self.data[o + 2],
            self.data[o + 3],
        ])
    }

    /// Returns the pixel at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x < self.width && y < self.height {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }

    /// Sets the pixel at (x, y).
    ///
    /// If the buffer is shared with a clone it is copied first.
    ///
    /// # Panics
    ///
    /// Panics if (x, y) is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: Pixel) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        let data = Arc::make_mut(&mut self.data);
        data[o..o + BYTES_PER_PIXEL].copy_from_slice(&pixel.0);
    }

    /// Extracts the `width` x `height` region at (x, y) into a new image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRegion`] if the region exceeds the image.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Image> {
        let fits_x = x.checked_add(width).is_some_and(|r| r <= self.width);
        let fits_y = y.checked_add(height).is_some_and(|b| b <= self.height);
        if !fits_x || !fits_y {
            return Err(Error::invalid_region(
                x,
                y,
                width,
                height,
                self.width,
                self.height,
            ));
        }

        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let mut dst = Vec::with_capacity(row_bytes * height as usize);
        for row in y..y + height {
            let start = self.offset(x, row);
            dst.extend_from_slice(&self.data[start..start + row_bytes]);
        }

        Ok(Image {
            data: Arc::new(dst),
            width,
            height,
        })
    }

    /// Iterates over all pixels in row-major order as `(x, y, pixel)`.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y, self.pixel(x, y))))
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Image {
        let mut img = Image::new(width, height);
        for y in 0..height {
            for x in 0..width {
                img.set_pixel(x, y, Pixel::rgba(x as u8, y as u8, 0, 255));
            }
        }
        img
    }

    #[test]
    fn test_filled() {
        let img = Image::filled(3, 2, Pixel::WHITE);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.as_bytes().len(), 3 * 2 * 4);
        assert!(img.pixels().all(|(_, _, px)| px == Pixel::WHITE));
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Image::from_raw(2, 2, vec![0; 16]).is_ok());
        let err = Image::from_raw(2, 2, vec![0; 12]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_crop_keeps_row_order() {
        let img = gradient(8, 6);
        let cropped = img.crop(2, 3, 4, 2).unwrap();
        assert_eq!(cropped.dimensions(), (4, 2));
        assert_eq!(cropped.pixel(0, 0), Pixel::rgba(2, 3, 0, 255));
        assert_eq!(cropped.pixel(3, 1), Pixel::rgba(5, 4, 0, 255));
    }

    #[test]
    fn test_crop_out_of_bounds_is_not_clamped() {
        let img = gradient(8, 6);
        assert!(img.crop(0, 0, 9, 6).unwrap_err().is_bounds_error());
        assert!(img.crop(5, 5, 4, 1).unwrap_err().is_bounds_error());
        assert!(img.crop(u32::MAX, 0, 2, 1).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_clone_is_copy_on_write() {
        let original = Image::filled(2, 2, Pixel::WHITE);
        let mut copy = original.clone();
        copy.set_pixel(0, 0, Pixel::RED);
        assert_eq!(original.pixel(0, 0), Pixel::WHITE);
        assert_eq!(copy.pixel(0, 0), Pixel::RED);
        assert!(!original.same_pixels(&copy));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let img = Image::new(2, 2);
        assert!(img.get(1, 1).is_some());
        assert!(img.get(2, 0).is_none());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_pixel_out_of_bounds_panics() {
        Image::new(2, 2).pixel(0, 2);
    }

    #[test]
    fn test_into_raw_roundtrip() {
        let img = gradient(3, 3);
        let bytes = img.clone().into_raw();
        assert_eq!(Image::from_raw(3, 3, bytes).unwrap(), img);
    }
}

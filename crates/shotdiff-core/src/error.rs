//! Error types for shotdiff-core operations.
//!
//! # Overview
//!
//! The [`Error`] enum covers the failure modes of raster buffer handling:
//! - Building an image from a raw buffer of the wrong length
//! - Cropping to a region that does not fit inside the source
//!
//! Out-of-bounds pixel reads are not errors: they panic, because they can only
//! come from a logic error in the scanning code.
//!
//! # Usage
//!
//! ```rust
//! use shotdiff_core::{Error, Image};
//!
//! let img = Image::new(8, 8);
//! let err = img.crop(4, 4, 8, 8).unwrap_err();
//! assert!(err.is_bounds_error());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or slicing images.
#[derive(Debug, Error)]
pub enum Error {
    /// Region of interest extends beyond image bounds.
    ///
    /// Returned by [`crate::Image::crop`] when the requested rectangle does not
    /// fit. Crop requests are never clamped.
    #[error("region ({rx}, {ry}, {rw}x{rh}) exceeds image bounds {width}x{height}")]
    InvalidRegion {
        /// Region X origin
        rx: u32,
        /// Region Y origin
        ry: u32,
        /// Region width
        rw: u32,
        /// Region height
        rh: u32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Invalid image dimensions.
    ///
    /// Returned when a raw buffer does not hold exactly `width * height`
    /// RGBA quads, or when the dimensions overflow the buffer size.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::InvalidRegion`] error.
    #[inline]
    pub fn invalid_region(rx: u32, ry: u32, rw: u32, rh: u32, width: u32, height: u32) -> Self {
        Self::InvalidRegion {
            rx,
            ry,
            rw,
            rh,
            width,
            height,
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::InvalidRegion { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_region() {
        let err = Error::invalid_region(10, 20, 100, 50, 80, 60);
        let msg = err.to_string();
        assert!(msg.contains("100x50"));
        assert!(msg.contains("80x60"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(4, 4, "expected 64 bytes, got 12");
        assert!(err.to_string().contains("4x4"));
        assert!(err.to_string().contains("64 bytes"));
        assert!(!err.is_bounds_error());
    }
}

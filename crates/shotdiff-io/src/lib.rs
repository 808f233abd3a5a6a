//! # shotdiff-io
//!
//! Image I/O for screenshot comparison.
//!
//! Screenshots arrive as PNG files or byte buffers. This crate turns them
//! into [`shotdiff_core::Image`] rasters and back:
//!
//! - [`decode_png`] / [`encode_png`] - in-memory buffers
//! - [`read`] / [`write`] - files on disk
//!
//! Malformed input is reported as [`IoError::DecodeError`] and is never
//! recovered from.
//!
//! # Example
//!
//! ```rust,ignore
//! use shotdiff_io::{read, write};
//!
//! let image = read("baseline.png")?;
//! write("copy.png", &image)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod png;

pub use error::{IoError, IoResult};

use shotdiff_core::Image;
use std::path::Path;

/// Decodes PNG bytes into an RGBA image.
#[inline]
pub fn decode_png(bytes: &[u8]) -> IoResult<Image> {
    png::decode(bytes)
}

/// Encodes an RGBA image into PNG bytes.
#[inline]
pub fn encode_png(image: &Image) -> IoResult<Vec<u8>> {
    png::encode(image)
}

/// Reads a PNG file.
#[inline]
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    png::read(path)
}

/// Writes an image as a PNG file.
#[inline]
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    png::write(path, image)
}

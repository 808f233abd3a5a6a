//! # shotdiff-core
//!
//! Core types for screenshot comparison.
//!
//! This crate provides the foundational types used throughout the shotdiff workspace:
//!
//! - [`Image`] - Decoded 8-bit RGBA raster, immutable after decoding
//! - [`Pixel`] - A single RGBA quad
//! - [`BoundingBox`] - Inclusive pixel rectangle enclosing a difference
//! - [`Error`] - Bounds and buffer errors
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The other crates build on it:
//!
//! ```text
//! shotdiff-core (this crate)
//!    ^
//!    |
//!    +-- shotdiff-io  (PNG decode/encode)
//!    +-- shotdiff-ops (tolerances, region search, comparison sessions)
//!    +-- shotdiff-cli
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod pixel;
pub mod rect;

pub use error::{Error, Result};
pub use image::Image;
pub use pixel::Pixel;
pub use rect::BoundingBox;

/// Prelude module for convenient imports.
///
/// ```
/// use shotdiff_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::Image;
    pub use crate::pixel::Pixel;
    pub use crate::rect::BoundingBox;
}

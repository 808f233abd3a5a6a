//! Error types for I/O operations.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed or truncated image data.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Decoded image does not fit the RGBA raster model.
    #[error("unsupported bit depth: {0}")]
    UnsupportedBitDepth(String),

    /// Buffer rejected by the core image type.
    #[error(transparent)]
    Image(#[from] shotdiff_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

//! Error types for comparison operations.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for comparison operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Image buffer or crop request rejected.
    #[error(transparent)]
    Image(#[from] shotdiff_core::Error),

    /// Snapshot could not be decoded or encoded.
    #[error(transparent)]
    Codec(#[from] shotdiff_io::IoError),

    /// Snapshot file could not be read, written or removed.
    #[error("{action} {}: {source}", .path.display())]
    File {
        /// What was being done ("read", "copy", ...).
        action: &'static str,
        /// The file involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Tolerance values out of range.
    #[error("invalid tolerance: {0}")]
    InvalidTolerance(String),

    /// Tolerance file could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl OpsError {
    pub(crate) fn file(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result type for comparison operations.
pub type OpsResult<T> = Result<T, OpsError>;

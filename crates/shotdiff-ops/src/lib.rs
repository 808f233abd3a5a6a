//! # shotdiff-ops
//!
//! Screenshot comparison engine.
//!
//! Decides whether two snapshots of the same view are the same under a
//! [`Tolerance`] and, if not, finds the rectangle enclosing the difference
//! and outlines it on copies of both images.
//!
//! ## Modules
//!
//! - [`color`] - Euclidean RGBA distance
//! - [`shift`] - ring search for displaced pixels
//! - [`matcher`] - per-pixel decision and running metrics
//! - [`region`] - bounding box search
//! - [`annotate`] - difference outline
//! - [`compare`] - in-memory comparison sessions
//! - [`snapshot`] - snapshot pairs on disk
//!
//! ## Example
//!
//! ```rust,ignore
//! use shotdiff_ops::{Outcome, SnapshotComparison, Tolerance};
//!
//! let tol = Tolerance::exact().with_color_distance_limit(3.0);
//! let mut cmp = SnapshotComparison::for_candidate("shots/home.png", tol);
//! match cmp.compare()? {
//!     Outcome::Different(bbox) => println!("changed: {}", bbox),
//!     outcome => println!("{:?}", outcome),
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod annotate;
pub mod color;
pub mod compare;
mod error;
pub mod matcher;
pub mod region;
pub mod shift;
pub mod snapshot;
pub mod tolerance;

pub use compare::{Comparison, Outcome};
pub use error::{OpsError, OpsResult};
pub use matcher::{Metrics, PixelMatcher};
pub use shift::ShiftDistance;
pub use snapshot::{SnapshotComparison, SnapshotPaths};
pub use tolerance::{CropSize, RegionSearch, Tolerance};

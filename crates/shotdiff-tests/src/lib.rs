//! Integration tests for shotdiff crates.
//!
//! End-to-end checks over real PNG files: snapshot pairs are written to a
//! temporary directory, compared, and the resulting files inspected.

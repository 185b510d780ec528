//! Error types for the expression crate.

use thiserror::Error;

/// Errors raised while describing a computation locally.
///
/// These only guard parameter values before they are sent; anything the
/// remote platform rejects is reported by the client crate instead.
#[derive(Debug, Error)]
pub enum ExprError {
    /// Bounding box coordinates are not a valid west/south/east/north box.
    #[error("Invalid bounds ({west}, {south}, {east}, {north}): {reason}")]
    InvalidBounds {
        /// Western longitude.
        west: f64,
        /// Southern latitude.
        south: f64,
        /// Eastern longitude.
        east: f64,
        /// Northern latitude.
        north: f64,
        /// What is wrong with the box.
        reason: &'static str,
    },

    /// Scale in meters must be finite and positive.
    #[error("Invalid scale {0} (must be a positive number of meters)")]
    InvalidScale(f64),

    /// A pixel limit must allow at least one pixel.
    #[error("Invalid maxPixels {0} (must be at least 1)")]
    InvalidMaxPixels(u64),

    /// An asset id, CRS code or description was empty.
    #[error("Empty {0}")]
    Empty(&'static str),
}

//! Error types for shape and tree construction.

use thiserror::Error;

/// Errors raised when a shape or tree is built from invalid parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum QuadTreeError {
    #[error("Negative extent: width {width}, height {height}")]
    NegativeExtent { width: f32, height: f32 },

    #[error("Negative radius: {0}")]
    NegativeRadius(f32),

    #[error("Coordinates and extents must be finite")]
    NonFinite,

    #[error("Node capacity must be at least 1")]
    ZeroCapacity,
}

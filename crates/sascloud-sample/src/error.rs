//! Error types for grid sampling.

use sascloud_mesh::MeshError;
use thiserror::Error;

/// Errors that can occur during a sampling call.
///
/// A sampling call either returns a complete cloud or one of these; there
/// is no partial-success mode.
#[derive(Error, Debug)]
pub enum SampleError {
    /// Bounding box has `min > max` on some axis, or non-finite bounds.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// Grid interval is zero, negative, or non-finite.
    #[error("invalid grid interval {0}: must be positive and finite")]
    InvalidInterval(f64),

    /// Invalid sampling settings.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Mesh failed validation (open mesh, empty mesh).
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The caller cancelled the sampling run.
    #[error("sampling cancelled")]
    Cancelled,

    /// Per-point SLD list does not match the point count.
    #[error("SLD count {sld} does not match point count {points}")]
    SldMismatch {
        /// Number of points in the cloud.
        points: usize,
        /// Number of SLD values supplied.
        sld: usize,
    },
}

/// Result type for sampling operations.
pub type Result<T> = std::result::Result<T, SampleError>;

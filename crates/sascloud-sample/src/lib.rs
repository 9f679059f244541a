#![warn(missing_docs)]

//! Point-in-solid classification and parallel grid sampling.
//!
//! Converts a 3D solid, described either as a closed triangulated surface
//! or as a boolean predicate over coordinates, into a cloud of
//! regular-grid points lying strictly inside the solid. The cloud, with a
//! scattering-length-density value per point, is the input to a downstream
//! scattering-intensity calculator reached through [`IntensityModel`].
//!
//! Pipeline: [`generate_grid`] → [`sample_mesh`] / [`sample_predicate`]
//! (chunked across rayon workers) → [`SampleCloud`]. The result set is
//! identical for any worker count; only enumeration order depends on it.

pub mod classify;
pub mod cloud;
pub mod error;
pub mod grid;
pub mod intensity;
pub mod intersect;
pub mod sampler;

pub use classify::{mesh_crossings, point_in_mesh};
pub use cloud::{SampleCloud, SldAssignment};
pub use error::{Result, SampleError};
pub use grid::{generate_grid, interval_for_count};
pub use intensity::IntensityModel;
pub use intersect::intersect_ray_triangle;
pub use sampler::{sample_mesh, sample_predicate};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sascloud_math::{Vec3, DEFAULT_OVERLAP_EPS};
use serde::{Deserialize, Serialize};

/// Sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSettings {
    /// Grid spacing along each axis.
    pub interval: f64,
    /// Number of contiguous grid chunks dispatched to workers.
    pub workers: usize,
    /// Ray direction for containment tests; need not be normalized. The
    /// default `(1,1,1)` avoids axis alignment with typical meshes.
    pub ray_direction: [f64; 3],
    /// Crossings closer than this are merged into one (edge/vertex grazes).
    pub overlap_eps: f64,
    /// Verify the mesh is watertight before sampling.
    pub check_closed: bool,
    /// Uniform scattering-length density attached to the resulting cloud.
    pub sld: f64,
    /// Cooperative cancellation flag, checked at chunk boundaries.
    #[serde(skip)]
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            interval: 1.0,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            ray_direction: [1.0, 1.0, 1.0],
            overlap_eps: DEFAULT_OVERLAP_EPS,
            check_closed: true,
            sld: 1.0,
            cancel: None,
        }
    }
}

impl SampleSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(SampleError::InvalidInterval(self.interval));
        }
        if self.workers == 0 {
            return Err(SampleError::InvalidSettings(
                "worker count must be at least 1".into(),
            ));
        }
        if !(self.overlap_eps.is_finite() && self.overlap_eps >= 0.0) {
            return Err(SampleError::InvalidSettings(
                "overlap_eps must be non-negative and finite".into(),
            ));
        }
        if self.ray_direction.iter().all(|&v| v == 0.0)
            || self.ray_direction.iter().any(|v| !v.is_finite())
        {
            return Err(SampleError::InvalidSettings(
                "ray_direction must be a non-zero finite vector".into(),
            ));
        }
        Ok(())
    }

    /// The ray direction as a vector.
    pub fn ray_vec(&self) -> Vec3 {
        Vec3::new(
            self.ray_direction[0],
            self.ray_direction[1],
            self.ray_direction[2],
        )
    }

    /// True once the cancellation flag has been raised.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::Relaxed))
            .unwrap_or(false)
    }
}

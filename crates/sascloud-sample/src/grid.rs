//! Regular-grid candidate point generation.

use sascloud_math::{Aabb, Point3};

use crate::error::{Result, SampleError};

/// Generate the full Cartesian lattice of candidate points over `bounds`.
///
/// The count along each axis is `floor((max - min) / interval) + 1`, so the
/// lattice always includes the minimum corner and never extends past the
/// maximum. Points are emitted x-major (x outermost, z innermost), giving a
/// fixed deterministic order.
pub fn generate_grid(bounds: &Aabb, interval: f64) -> Result<Vec<Point3>> {
    if !(interval.is_finite() && interval > 0.0) {
        return Err(SampleError::InvalidInterval(interval));
    }
    if !bounds.is_valid() {
        return Err(SampleError::InvalidBounds(format!(
            "min {:?} must not exceed max {:?}",
            bounds.min, bounds.max
        )));
    }

    let counts = [
        axis_count(bounds.min.x, bounds.max.x, interval),
        axis_count(bounds.min.y, bounds.max.y, interval),
        axis_count(bounds.min.z, bounds.max.z, interval),
    ];

    let mut points = Vec::with_capacity(counts[0] * counts[1] * counts[2]);
    for i in 0..counts[0] {
        let x = bounds.min.x + i as f64 * interval;
        for j in 0..counts[1] {
            let y = bounds.min.y + j as f64 * interval;
            for k in 0..counts[2] {
                let z = bounds.min.z + k as f64 * interval;
                points.push(Point3::new(x, y, z));
            }
        }
    }
    Ok(points)
}

fn axis_count(min: f64, max: f64, interval: f64) -> usize {
    ((max - min) / interval).floor() as usize + 1
}

/// Derive a grid interval that yields roughly `target` lattice points over
/// `bounds`, by giving each point an equal cube of the bounding-box volume.
///
/// The actual count from [`generate_grid`] can deviate from `target` because
/// each axis rounds down to whole steps. Requires non-degenerate bounds.
pub fn interval_for_count(bounds: &Aabb, target: usize) -> Result<f64> {
    if target == 0 {
        return Err(SampleError::InvalidSettings(
            "target point count must be positive".into(),
        ));
    }
    if !bounds.is_valid() {
        return Err(SampleError::InvalidBounds(format!(
            "min {:?} must not exceed max {:?}",
            bounds.min, bounds.max
        )));
    }
    let extents = bounds.extents();
    let volume = extents.x * extents.y * extents.z;
    if volume <= 0.0 {
        return Err(SampleError::InvalidBounds(
            "bounds must span all three axes to derive an interval from a point count".into(),
        ));
    }
    Ok((volume / target as f64).cbrt())
}

//! Parallel sampling: partition the candidate grid, classify each chunk on
//! an independent worker, and gather results in chunk order.

use rayon::prelude::*;
use sascloud_math::{Aabb, Point3};
use sascloud_mesh::TriMesh;
use sascloud_predicate::Predicate;

use crate::classify::point_in_mesh;
use crate::cloud::SampleCloud;
use crate::error::{Result, SampleError};
use crate::grid::generate_grid;
use crate::SampleSettings;

/// Sample a closed triangulated mesh into a cloud of inside-points.
///
/// The candidate grid spans the mesh's bounding box. Unless disabled in the
/// settings, the mesh is first checked for watertightness, since the
/// ray-parity rule is only correct on a closed surface.
pub fn sample_mesh(mesh: &TriMesh, settings: &SampleSettings) -> Result<SampleCloud> {
    settings.validate()?;
    if settings.check_closed {
        mesh.check_closed()?;
    }

    let grid = generate_grid(&mesh.bounds, settings.interval)?;
    log::debug!(
        "sampling mesh: {} triangles, {} candidate points, {} workers",
        mesh.num_triangles(),
        grid.len(),
        settings.workers
    );

    let ray_dir = settings.ray_vec();
    let eps = settings.overlap_eps;
    let inside = classify_chunked(&grid, settings, |p| point_in_mesh(p, mesh, &ray_dir, eps))?;
    Ok(SampleCloud::uniform(inside, settings.sld))
}

/// Sample an analytic solid described by a predicate over explicit bounds.
pub fn sample_predicate(
    predicate: &Predicate,
    bounds: &Aabb,
    settings: &SampleSettings,
) -> Result<SampleCloud> {
    settings.validate()?;

    let grid = generate_grid(bounds, settings.interval)?;
    log::debug!(
        "sampling predicate '{}': {} candidate points, {} workers",
        predicate.source(),
        grid.len(),
        settings.workers
    );

    let inside = classify_chunked(&grid, settings, |p| predicate.eval(p))?;
    Ok(SampleCloud::uniform(inside, settings.sld))
}

/// Split the grid into `workers` contiguous chunks, classify every chunk
/// independently, and concatenate the per-chunk inside-lists in chunk order.
///
/// Classification has no cross-point dependency, so the resulting *set* of
/// points is identical for any worker count; the worker count only affects
/// enumeration order. Cancellation is checked once per chunk; any chunk
/// failure fails the whole call and discards completed chunks.
fn classify_chunked<F>(
    grid: &[Point3],
    settings: &SampleSettings,
    is_inside: F,
) -> Result<Vec<Point3>>
where
    F: Fn(&Point3) -> bool + Sync,
{
    if grid.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_len = grid.len().div_ceil(settings.workers);
    let per_chunk: Vec<Result<Vec<Point3>>> = grid
        .par_chunks(chunk_len)
        .map(|chunk| {
            if settings.is_cancelled() {
                return Err(SampleError::Cancelled);
            }
            Ok(chunk.iter().filter(|p| is_inside(p)).copied().collect())
        })
        .collect();

    let mut inside = Vec::new();
    for chunk in per_chunk {
        inside.extend(chunk?);
    }
    Ok(inside)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use sascloud_mesh::Triangle;

    fn cube_mesh(s: f64) -> TriMesh {
        let p = |x: f64, y: f64, z: f64| Point3::new(x, y, z);
        let v = [
            p(0.0, 0.0, 0.0),
            p(s, 0.0, 0.0),
            p(s, s, 0.0),
            p(0.0, s, 0.0),
            p(0.0, 0.0, s),
            p(s, 0.0, s),
            p(s, s, s),
            p(0.0, s, s),
        ];
        let faces = [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [2, 3, 7],
            [2, 7, 6],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        TriMesh::new(
            faces
                .iter()
                .map(|f| Triangle::new(v[f[0]], v[f[1]], v[f[2]]))
                .collect(),
        )
        .unwrap()
    }

    /// Watertight UV-sphere triangulation of the given radius.
    fn sphere_mesh(radius: f64, rings: usize, segments: usize) -> TriMesh {
        let vertex = |ring: usize, seg: usize| -> Point3 {
            let theta = std::f64::consts::PI * ring as f64 / rings as f64;
            let phi = 2.0 * std::f64::consts::PI * seg as f64 / segments as f64;
            Point3::new(
                radius * theta.sin() * phi.cos(),
                radius * theta.sin() * phi.sin(),
                radius * theta.cos(),
            )
        };
        let north = Point3::new(0.0, 0.0, radius);
        let south = Point3::new(0.0, 0.0, -radius);

        let mut tris = Vec::new();
        for seg in 0..segments {
            let next = (seg + 1) % segments;
            // Polar caps
            tris.push(Triangle::new(north, vertex(1, seg), vertex(1, next)));
            tris.push(Triangle::new(south, vertex(rings - 1, next), vertex(rings - 1, seg)));
            // Quad bands split into two triangles
            for ring in 1..rings - 1 {
                let (a, b) = (vertex(ring, seg), vertex(ring, next));
                let (c, d) = (vertex(ring + 1, seg), vertex(ring + 1, next));
                tris.push(Triangle::new(a, c, d));
                tris.push(Triangle::new(a, d, b));
            }
        }
        TriMesh::new(tris).unwrap()
    }

    fn sorted_keys(cloud: &SampleCloud) -> Vec<(i64, i64, i64)> {
        let mut keys: Vec<(i64, i64, i64)> = cloud
            .points()
            .iter()
            .map(|p| {
                (
                    (p.x * 1e6).round() as i64,
                    (p.y * 1e6).round() as i64,
                    (p.z * 1e6).round() as i64,
                )
            })
            .collect();
        keys.sort_unstable();
        keys
    }

    fn settings(workers: usize) -> SampleSettings {
        SampleSettings {
            interval: 1.0,
            workers,
            ..Default::default()
        }
    }

    #[test]
    fn test_parallel_invariance_mesh() {
        let mesh = cube_mesh(10.0);
        let reference = sorted_keys(&sample_mesh(&mesh, &settings(1)).unwrap());
        assert!(!reference.is_empty());
        for workers in [2, 4, 16] {
            let cloud = sample_mesh(&mesh, &settings(workers)).unwrap();
            assert_eq!(sorted_keys(&cloud), reference, "workers = {}", workers);
        }
    }

    #[test]
    fn test_parallel_invariance_predicate() {
        let sphere: Predicate = "x**2+y**2+z**2 <= 25".parse().unwrap();
        let bounds = Aabb::from_bounds(-5.0, 5.0, -5.0, 5.0, -5.0, 5.0);
        let reference = sorted_keys(&sample_predicate(&sphere, &bounds, &settings(1)).unwrap());
        for workers in [2, 4, 16] {
            let cloud = sample_predicate(&sphere, &bounds, &settings(workers)).unwrap();
            assert_eq!(sorted_keys(&cloud), reference, "workers = {}", workers);
        }
    }

    #[test]
    fn test_cube_interior_count() {
        // Grid 0..10 interval 1 has 11^3 candidates; the classifier keeps
        // interior points and the parity rule decides boundary lattice
        // points consistently, so the count must sit between the open
        // interior (9^3) and the full closed cube (11^3).
        let mesh = cube_mesh(10.0);
        let cloud = sample_mesh(&mesh, &settings(4)).unwrap();
        assert!(cloud.len() >= 9 * 9 * 9);
        assert!(cloud.len() <= 11 * 11 * 11);
    }

    #[test]
    fn test_mesh_and_predicate_sphere_agree() {
        // Analytic sphere vs. a fairly fine triangulated sphere at the same
        // grid resolution: inside-counts differ only by surface-
        // triangulation error.
        let bounds = Aabb::from_bounds(-5.0, 5.0, -5.0, 5.0, -5.0, 5.0);
        let analytic: Predicate = "x**2+y**2+z**2 <= 25".parse().unwrap();
        let analytic_cloud = sample_predicate(&analytic, &bounds, &settings(4)).unwrap();

        // Axis-aligned extreme vertices land exactly on the lattice, so the
        // mesh bounding box (and hence the candidate grid) matches the
        // analytic bounds.
        let mesh = sphere_mesh(5.0, 24, 48);
        assert!(mesh.is_closed());
        let mesh_cloud = sample_mesh(&mesh, &settings(4)).unwrap();

        // The 30 integer lattice points at radius exactly 5 sit on the
        // analytic boundary but outside the inscribed triangulation, so the
        // counts legitimately differ by up to ~6%.
        let a = analytic_cloud.len() as f64;
        let b = mesh_cloud.len() as f64;
        let relative_gap = (a - b).abs() / a;
        assert!(
            relative_gap < 0.08,
            "analytic {} vs mesh {} ({}% apart)",
            a,
            b,
            relative_gap * 100.0
        );
    }

    #[test]
    fn test_open_mesh_rejected() {
        let mut tris = cube_mesh(10.0).triangles;
        tris.pop();
        let mesh = TriMesh::new(tris).unwrap();
        assert!(matches!(
            sample_mesh(&mesh, &settings(2)),
            Err(SampleError::Mesh(_))
        ));

        // Opting out of the check lets the (unreliable) sampling proceed.
        let mut relaxed = settings(2);
        relaxed.check_closed = false;
        assert!(sample_mesh(&mesh, &relaxed).is_ok());
    }

    #[test]
    fn test_cancellation() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut s = settings(4);
        s.cancel = Some(flag.clone());
        let mesh = cube_mesh(10.0);
        assert!(matches!(
            sample_mesh(&mesh, &s),
            Err(SampleError::Cancelled)
        ));

        flag.store(false, Ordering::Relaxed);
        assert!(sample_mesh(&mesh, &s).is_ok());
    }

    #[test]
    fn test_more_workers_than_points() {
        let mesh = cube_mesh(2.0);
        let mut s = settings(64);
        s.interval = 1.0; // 27 candidates, 64 workers
        let cloud = sample_mesh(&mesh, &s).unwrap();
        let reference = sample_mesh(&mesh, &settings(1)).unwrap();
        assert_eq!(sorted_keys(&cloud), sorted_keys(&reference));
    }

    #[test]
    fn test_sld_carried_from_settings() {
        let mesh = cube_mesh(4.0);
        let mut s = settings(2);
        s.sld = 3.5;
        let cloud = sample_mesh(&mesh, &s).unwrap();
        assert!(cloud.len() > 0);
        assert_eq!(cloud.sld_of(0), 3.5);
    }

    #[test]
    fn test_invalid_ray_direction_rejected() {
        let mesh = cube_mesh(4.0);
        let mut s = settings(2);
        s.ray_direction = [0.0, 0.0, 0.0];
        assert!(matches!(
            sample_mesh(&mesh, &s),
            Err(SampleError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mesh = cube_mesh(4.0);
        assert!(matches!(
            sample_mesh(&mesh, &settings(0)),
            Err(SampleError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_custom_ray_direction_same_set() {
        let mesh = cube_mesh(10.0);
        let reference = sorted_keys(&sample_mesh(&mesh, &settings(1)).unwrap());
        let mut tilted = settings(1);
        tilted.ray_direction = [1.0, 0.37, 0.73];
        let cloud = sample_mesh(&mesh, &tilted).unwrap();
        assert_eq!(sorted_keys(&cloud), reference);
    }
}

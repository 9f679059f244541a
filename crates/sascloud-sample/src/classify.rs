//! Point-in-mesh containment classification by ray parity.

use sascloud_math::{Point3, Vec3};
use sascloud_mesh::TriMesh;

use crate::intersect::intersect_ray_triangle;

/// Distinct surface crossings of a ray cast from `point` through the mesh.
///
/// Every triangle is tested with [`intersect_ray_triangle`]; accepted hits
/// closer together than `overlap_eps` are collapsed to one representative,
/// which removes double-counting when the ray grazes an edge or vertex
/// shared by adjacent triangles.
pub fn mesh_crossings(
    point: &Point3,
    mesh: &TriMesh,
    ray_dir: &Vec3,
    overlap_eps: f64,
) -> Vec<Point3> {
    let hits: Vec<Point3> = mesh
        .triangles
        .iter()
        .filter_map(|tri| intersect_ray_triangle(point, ray_dir, tri))
        .collect();
    dedup_crossings(hits, overlap_eps)
}

/// Classify a point against a closed mesh.
///
/// An odd number of distinct crossings along the ray means the point is
/// inside. The caller is responsible for the mesh being watertight; an open
/// mesh silently yields unreliable parity. A ray direction aligned with a
/// triangle edge or passing exactly through a vertex can still produce
/// inconsistent parity, which is why the default direction is not
/// axis-aligned.
pub fn point_in_mesh(point: &Point3, mesh: &TriMesh, ray_dir: &Vec3, overlap_eps: f64) -> bool {
    mesh_crossings(point, mesh, ray_dir, overlap_eps).len() % 2 == 1
}

/// Collapse near-coincident hit points, keeping one representative per
/// cluster (the last in collection order).
fn dedup_crossings(hits: Vec<Point3>, overlap_eps: f64) -> Vec<Point3> {
    if hits.len() <= 1 {
        return hits;
    }
    let mut distinct = Vec::with_capacity(hits.len());
    for i in 0..hits.len() {
        let duplicated_later = hits[i + 1..]
            .iter()
            .any(|other| (hits[i] - other).norm() <= overlap_eps);
        if !duplicated_later {
            distinct.push(hits[i]);
        }
    }
    distinct
}

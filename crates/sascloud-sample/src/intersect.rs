//! Ray/triangle intersection via the determinant (Möller–Trumbore) method.

use sascloud_math::{Point3, Vec3};
use sascloud_mesh::Triangle;

/// Intersect a ray with a triangle, returning the world-space hit point.
///
/// The direction need not be normalized. Solves the ray/plane/barycentric
/// system `O + t*D = (1-u-v)*V0 + u*V1 + v*V2` and accepts the hit iff
/// `t >= 0` (in front of the origin) and `u >= 0, v >= 0, u + v <= 1`
/// (inside the triangle, edges inclusive).
///
/// A determinant of exactly zero means the ray lies in (or parallel to) the
/// triangle plane; that case reports no intersection rather than dividing
/// by zero. True grazing intersections along the degenerate plane are
/// missed, which the containment classifier tolerates by using a
/// non-axis-aligned ray.
pub fn intersect_ray_triangle(origin: &Point3, dir: &Vec3, tri: &Triangle) -> Option<Point3> {
    let e1 = tri.b - tri.a;
    let e2 = tri.c - tri.a;
    let p = dir.cross(&e2);
    let det = p.dot(&e1);
    if det == 0.0 {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - tri.a;
    let q = s.cross(&e1);

    let t = inv_det * q.dot(&e2);
    let u = inv_det * p.dot(&s);
    let v = inv_det * q.dot(dir);

    if t >= 0.0 && u >= 0.0 && v >= 0.0 && u + v <= 1.0 {
        Some(origin + dir * t)
    } else {
        None
    }
}

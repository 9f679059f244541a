#![warn(missing_docs)]

//! Math types for the sascloud sampling core.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! point-in-solid classification: points, vectors, axis-aligned bounding
//! boxes, and tolerance constants.

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Default merge distance for near-coincident ray crossings.
///
/// Two surface crossings closer than this are treated as a single crossing,
/// which removes double-counting when a ray grazes an edge or vertex shared
/// by adjacent triangles.
pub const DEFAULT_OVERLAP_EPS: f64 = 1e-3;

/// An axis-aligned bounding box in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb {
    /// Create a bounding box from its two corners.
    ///
    /// The corners are stored as given; use [`Aabb::is_valid`] to check
    /// that `min` does not exceed `max` on any axis.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create a bounding box from six per-axis bounds.
    pub fn from_bounds(xmin: f64, xmax: f64, ymin: f64, ymax: f64, zmin: f64, zmax: f64) -> Self {
        Self {
            min: Point3::new(xmin, ymin, zmin),
            max: Point3::new(xmax, ymax, zmax),
        }
    }

    /// Smallest box containing all given points, or `None` if the iterator
    /// is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = Self {
            min: first,
            max: first,
        };
        for p in iter {
            bb.extend(&p);
        }
        Some(bb)
    }

    /// Grow the box to contain `p`.
    pub fn extend(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// True if `min <= max` on every axis and all bounds are finite.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x
            && self.min.y <= self.max.y
            && self.min.z <= self.max.z
            && self.min.coords.iter().all(|v| v.is_finite())
            && self.max.coords.iter().all(|v| v.is_finite())
    }

    /// True if `p` lies inside or on the boundary of the box.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Edge lengths along each axis.
    pub fn extents(&self) -> Vec3 {
        self.max - self.min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let pts = vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(-1.0, 5.0, 0.0),
            Point3::new(0.0, 0.0, 7.0),
        ];
        let bb = Aabb::from_points(pts).unwrap();
        assert_eq!(bb.min, Point3::new(-1.0, 0.0, 0.0));
        assert_eq!(bb.max, Point3::new(1.0, 5.0, 7.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_contains() {
        let bb = Aabb::from_bounds(0.0, 10.0, 0.0, 10.0, 0.0, 10.0);
        assert!(bb.contains(&Point3::new(5.0, 5.0, 5.0)));
        assert!(bb.contains(&Point3::new(0.0, 0.0, 10.0)));
        assert!(!bb.contains(&Point3::new(10.1, 5.0, 5.0)));
    }

    #[test]
    fn test_validity() {
        assert!(Aabb::from_bounds(0.0, 1.0, 0.0, 1.0, 0.0, 1.0).is_valid());
        assert!(!Aabb::from_bounds(2.0, 1.0, 0.0, 1.0, 0.0, 1.0).is_valid());
        assert!(!Aabb::from_bounds(0.0, f64::NAN, 0.0, 1.0, 0.0, 1.0).is_valid());
    }

    #[test]
    fn test_extents() {
        let bb = Aabb::from_bounds(-5.0, 5.0, 0.0, 2.0, 1.0, 4.0);
        let e = bb.extents();
        assert_eq!(e, Vec3::new(10.0, 2.0, 3.0));
    }
}

//! The sample cloud: inside-points annotated with scattering-length density.

use sascloud_math::Point3;

use crate::error::{Result, SampleError};

/// Scattering-length-density annotation for a cloud.
#[derive(Debug, Clone, PartialEq)]
pub enum SldAssignment {
    /// One SLD value shared by every point.
    Uniform(f64),
    /// One SLD value per point, index-aligned with the point list.
    PerPoint(Vec<f64>),
}

/// An ordered sequence of inside-points with SLD annotation.
///
/// Created fresh per sampling invocation and immutable thereafter. The
/// point order is deterministic for a fixed worker count (chunk order, then
/// within-chunk order); it carries no other meaning.
#[derive(Debug, Clone)]
pub struct SampleCloud {
    points: Vec<Point3>,
    sld: SldAssignment,
}

impl SampleCloud {
    /// Build a cloud, validating per-point SLD lengths.
    pub fn new(points: Vec<Point3>, sld: SldAssignment) -> Result<Self> {
        if let SldAssignment::PerPoint(values) = &sld {
            if values.len() != points.len() {
                return Err(SampleError::SldMismatch {
                    points: points.len(),
                    sld: values.len(),
                });
            }
        }
        Ok(Self { points, sld })
    }

    /// Build a cloud with a uniform SLD.
    pub fn uniform(points: Vec<Point3>, sld: f64) -> Self {
        Self {
            points,
            sld: SldAssignment::Uniform(sld),
        }
    }

    /// Replace the SLD annotation with a uniform value.
    pub fn with_uniform_sld(self, sld: f64) -> Self {
        Self {
            points: self.points,
            sld: SldAssignment::Uniform(sld),
        }
    }

    /// The sample points, in deterministic order.
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// The SLD annotation.
    pub fn sld(&self) -> &SldAssignment {
        &self.sld
    }

    /// SLD value of point `i`.
    pub fn sld_of(&self, i: usize) -> f64 {
        match &self.sld {
            SldAssignment::Uniform(v) => *v,
            SldAssignment::PerPoint(values) => values[i],
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the cloud contains no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

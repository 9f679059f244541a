#![warn(missing_docs)]

//! Triangle-soup meshes for the sascloud sampling core.
//!
//! A [`TriMesh`] is an ordered collection of triangles plus its derived
//! axis-aligned bounding box. Meshes are loaded from STL files (binary or
//! ASCII) and treated as immutable once built; the containment classifier
//! in `sascloud-sample` requires the mesh to be closed (watertight), which
//! [`TriMesh::open_edge_count`] can verify.

pub mod error;
pub mod stl;

pub use error::{MeshError, Result};
pub use stl::{parse_stl, write_binary_stl};

use std::collections::HashMap;
use std::path::Path;

use sascloud_math::{Aabb, Point3};

/// A single triangle with ordered vertices.
///
/// The classification algorithm assumes nothing about winding; only
/// closedness of the enclosing mesh matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex.
    pub a: Point3,
    /// Second vertex.
    pub b: Point3,
    /// Third vertex.
    pub c: Point3,
}

impl Triangle {
    /// Create a triangle from three vertices.
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// The three vertices in order.
    pub fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }
}

/// An ordered triangle soup with its derived bounding box.
#[derive(Debug, Clone)]
pub struct TriMesh {
    /// Triangles in file order.
    pub triangles: Vec<Triangle>,
    /// Smallest axis-aligned box containing every vertex.
    pub bounds: Aabb,
}

impl TriMesh {
    /// Build a mesh from a triangle list, deriving the bounding box.
    ///
    /// Fails with [`MeshError::EmptyMesh`] when the list is empty.
    pub fn new(triangles: Vec<Triangle>) -> Result<Self> {
        let bounds = Aabb::from_points(
            triangles
                .iter()
                .flat_map(|t| t.vertices()),
        )
        .ok_or(MeshError::EmptyMesh)?;
        Ok(Self { triangles, bounds })
    }

    /// Load a mesh from an STL file, auto-detecting binary vs. ASCII.
    pub fn from_stl_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_stl_bytes(&bytes)
    }

    /// Parse a mesh from raw STL bytes, auto-detecting binary vs. ASCII.
    pub fn from_stl_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(parse_stl(bytes)?)
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Number of undirected edges not shared by exactly two triangles.
    ///
    /// Zero means the mesh is watertight. Vertex positions are quantized
    /// before comparison so exactly-repeated STL vertices merge reliably.
    pub fn open_edge_count(&self) -> usize {
        let mut edge_use: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();
        for tri in &self.triangles {
            let keys = [
                VertexKey::from_point(&tri.a),
                VertexKey::from_point(&tri.b),
                VertexKey::from_point(&tri.c),
            ];
            for i in 0..3 {
                let (u, v) = (keys[i], keys[(i + 1) % 3]);
                let edge = if u <= v { (u, v) } else { (v, u) };
                *edge_use.entry(edge).or_insert(0) += 1;
            }
        }
        edge_use.values().filter(|&&n| n != 2).count()
    }

    /// True if every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        self.open_edge_count() == 0
    }

    /// Check closedness, failing with [`MeshError::OpenMesh`] if violated.
    pub fn check_closed(&self) -> Result<()> {
        match self.open_edge_count() {
            0 => Ok(()),
            n => Err(MeshError::OpenMesh(n)),
        }
    }
}

/// A vertex position quantized for hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct VertexKey(i64, i64, i64);

impl VertexKey {
    // 1e-7 resolution; STL coordinates are f32 so coincident vertices
    // are bit-identical and quantize to the same key.
    const SCALE: f64 = 1e7;

    fn from_point(p: &Point3) -> Self {
        Self(
            (p.x * Self::SCALE).round() as i64,
            (p.y * Self::SCALE).round() as i64,
            (p.z * Self::SCALE).round() as i64,
        )
    }
}

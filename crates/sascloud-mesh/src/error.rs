//! Error types for mesh loading and validation.

use thiserror::Error;

/// Errors that can occur while loading or validating a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    /// I/O error reading a mesh file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a well-formed STL.
    #[error("malformed STL: {0}")]
    MalformedStl(String),

    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// Mesh is not watertight: some edges are not shared by exactly two
    /// triangles, so the ray-parity containment rule would be unreliable.
    #[error("mesh is not closed: {0} edge(s) not shared by exactly two triangles")]
    OpenMesh(usize),
}

/// Result type for mesh operations.
pub type Result<T> = std::result::Result<T, MeshError>;

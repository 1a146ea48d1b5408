//! Error types for BVH and mesh construction.

use thiserror::Error;

/// Errors that can occur while building a BVH or a mesh on top of one.
///
/// Traversal never fails; all of these are input errors detected during construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Mesh has no triangles.
    #[error("mesh is empty")]
    EmptyMesh,

    /// A triangle references a vertex that does not exist.
    #[error("triangle {triangle} references vertex {vertex}, but there are only {num_vertices} vertices")]
    VertexIndexOutOfRange {
        triangle: usize,
        vertex: usize,
        num_vertices: usize,
    },

    /// A triangle given as signed indices carries a negative index.
    #[error("negative vertex index {index}")]
    NegativeVertexIndex { index: i32 },

    /// A vertex position is NaN or infinite.
    #[error("vertex {vertex} has a non-finite position")]
    NonFiniteVertex { vertex: usize },

    /// A range of several triangles has a bounding box with zero surface area, so split costs
    /// cannot be evaluated.
    #[error("{count} triangles at offset {offset} have degenerate bounds (area {area})")]
    DegenerateBounds {
        offset: usize,
        count: usize,
        area: f64,
    },

    /// Per-vertex normals were supplied, but not one per vertex.
    #[error("got {normals} normals for {vertices} vertices")]
    NormalCountMismatch { normals: usize, vertices: usize },
}

/// Result type for construction.
pub type Result<T> = std::result::Result<T, BuildError>;

mod bvh;
pub use crate::geom::bvh::{BuildOptions, Bvh, Candidates, Node, NodeKind, SplitKey};

mod error;
pub use crate::geom::error::{BuildError, Result};

mod mesh;
pub use crate::geom::mesh::{Mesh, MeshIntersection};

mod triangle;
pub use crate::geom::triangle::{intersect_triangle, Tri, TriangleHit};

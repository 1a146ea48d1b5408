//! Bounding-volume hierarchy over indexed triangle meshes.
//!
//! `core` holds the small geometry kernel (vectors, rays, boxes). `geom` holds the triangle
//! helpers, the BVH builder/traversal and a BVH-accelerated mesh that answers closest-hit and
//! any-hit queries.

pub mod core;
pub mod geom;

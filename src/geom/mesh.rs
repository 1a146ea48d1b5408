use crate::core;
use crate::geom::bvh::{BuildOptions, Bvh};
use crate::geom::error::{BuildError, Result};
use crate::geom::triangle::{intersect_triangle, Tri, TriangleHit};

use std::fmt;
use std::fmt::Display;

/// Closest hit of a ray against a mesh.
#[derive(Clone, Copy, Debug)]
pub struct MeshIntersection {
    pub lambda: f64,
    pub triangle: usize,
    pub position: core::Vec3f,
    /// Unit normal; interpolated from the vertex normals when the mesh has them.
    pub normal: core::Vec3f,
    pub bary: core::Vec3f,
}

/// Indexed triangle mesh whose ray queries go through a BVH.
pub struct Mesh {
    vertices: Vec<core::Vec3f>,
    normals: Option<Vec<core::Vec3f>>,
    tris: Vec<Tri>,
    bvh: Bvh,
}

impl Mesh {
    pub fn new(vertices: Vec<core::Vec3f>, tris: Vec<Tri>) -> Result<Mesh> {
        Mesh::with_options(vertices, tris, &BuildOptions::default())
    }

    pub fn with_options(vertices: Vec<core::Vec3f>, tris: Vec<Tri>, options: &BuildOptions)
        -> Result<Mesh>
    {
        let bvh = Bvh::build_with(&vertices, &tris, options)?;
        Ok(Mesh {
            vertices: vertices,
            normals: None,
            tris: tris,
            bvh: bvh
        })
    }

    /// Attaches one normal per vertex, used to shade hits smoothly.
    pub fn with_normals(mut self, normals: Vec<core::Vec3f>) -> Result<Mesh> {
        if normals.len() != self.vertices.len() {
            return Err(BuildError::NormalCountMismatch {
                normals: normals.len(),
                vertices: self.vertices.len()
            });
        }
        self.normals = Some(normals);
        Ok(self)
    }

    pub fn vertices(&self) -> &[core::Vec3f] {
        &self.vertices
    }

    pub fn tris(&self) -> &[Tri] {
        &self.tris
    }

    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Corner positions of a triangle. Indices were validated when the tree was built.
    fn corners(&self, triangle: usize) -> (&core::Vec3f, &core::Vec3f, &core::Vec3f) {
        let tri = &self.tris[triangle];
        (&self.vertices[tri.a], &self.vertices[tri.b], &self.vertices[tri.c])
    }

    fn intersect_candidate(&self, ray: &core::Ray, triangle: usize)
        -> Option<TriangleHit>
    {
        let (a, b, c) = self.corners(triangle);
        intersect_triangle(ray, a, b, c)
    }

    /// Returns the nearest hit with `0 < lambda < max_lambda`, if any. Every candidate from the
    /// tree is tested, since the traversal order says nothing about distance.
    pub fn closest_intersection(&self, ray: &core::Ray, max_lambda: f64)
        -> Option<MeshIntersection>
    {
        let mut closest_lambda = max_lambda;
        let mut closest: Option<(usize, TriangleHit)> = None;

        for candidate in self.bvh.candidates(ray, max_lambda) {
            if let Some(hit) = self.intersect_candidate(ray, candidate) {
                if hit.lambda < closest_lambda {
                    closest_lambda = hit.lambda;
                    closest = Some((candidate, hit));
                }
            }
        }

        closest.map(|(triangle, hit)| MeshIntersection {
            lambda: hit.lambda,
            triangle: triangle,
            position: ray.at(hit.lambda),
            normal: self.shading_normal(triangle, &hit.bary),
            bary: hit.bary
        })
    }

    /// Shadow-ray query: true as soon as any triangle is hit with `0 < lambda < max_lambda`.
    pub fn any_intersection(&self, ray: &core::Ray, max_lambda: f64) -> bool {
        self.bvh.candidates(ray, max_lambda).any(|candidate| {
            match self.intersect_candidate(ray, candidate) {
                Some(hit) => hit.lambda < max_lambda,
                None => false
            }
        })
    }

    fn shading_normal(&self, triangle: usize, bary: &core::Vec3f) -> core::Vec3f {
        let tri = &self.tris[triangle];
        match self.normals {
            Some(ref normals) => {
                let n = normals[tri.a] * bary.x + normals[tri.b] * bary.y
                        + normals[tri.c] * bary.z;
                n.normalized()
            }
            None => {
                let (a, b, c) = self.corners(triangle);
                (*b - *a).cross(&(*c - *a)).normalized()
            }
        }
    }
}

impl Display for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mesh({} vertices, {} triangles)", self.vertices.len(), self.tris.len())
    }
}

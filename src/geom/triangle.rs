use crate::core;
use crate::geom::error::{BuildError, Result};

use std::fmt;
use std::fmt::Display;

/// A triangle as three indices into a shared vertex array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tri {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl Tri {
    pub fn new(a: usize, b: usize, c: usize) -> Tri {
        Tri {a: a, b: b, c: c}
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    /// Looks up the three corner positions, failing on out-of-range indices. `triangle` is only
    /// used for error reporting.
    pub fn corners<'a>(&self, triangle: usize, vertices: &'a [core::Vec3f])
        -> Result<[&'a core::Vec3f; 3]>
    {
        let lookup = |vertex: usize| {
            vertices.get(vertex).ok_or(BuildError::VertexIndexOutOfRange {
                triangle: triangle,
                vertex: vertex,
                num_vertices: vertices.len()
            })
        };
        Ok([lookup(self.a)?, lookup(self.b)?, lookup(self.c)?])
    }

    /// Bounding box of the triangle's three corners.
    pub fn bbox(&self, triangle: usize, vertices: &[core::Vec3f]) -> Result<core::BBox> {
        let corners = self.corners(triangle, vertices)?;
        let mut bbox = core::BBox::empty();
        for (corner, &vertex) in corners.iter().zip(self.indices().iter()) {
            if !corner.is_finite() {
                return Err(BuildError::NonFiniteVertex {vertex: vertex});
            }
            bbox = bbox.union_with(corner);
        }
        Ok(bbox)
    }
}

impl From<[usize; 3]> for Tri {
    fn from(indices: [usize; 3]) -> Tri {
        Tri::new(indices[0], indices[1], indices[2])
    }
}

impl TryFrom<core::Vec3i> for Tri {
    type Error = BuildError;

    fn try_from(indices: core::Vec3i) -> Result<Tri> {
        let convert = |index: i32| {
            usize::try_from(index).map_err(|_| BuildError::NegativeVertexIndex {index: index})
        };
        Ok(Tri::new(convert(indices.x)?, convert(indices.y)?, convert(indices.z)?))
    }
}

impl Display for Tri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tri({}, {}, {})", self.a, self.b, self.c)
    }
}

/// Result of a ray/triangle test.
#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
    /// Parametric distance along the ray.
    pub lambda: f64,
    /// Barycentric weights of the corners `a`, `b` and `c`; they sum to one.
    pub bary: core::Vec3f,
}

/**
 * Intersects a ray with the triangle (a, b, c). Hits behind the origin (or within epsilon of it)
 * and rays parallel to the triangle's plane report no hit.
 */
pub fn intersect_triangle(ray: &core::Ray, a: &core::Vec3f, b: &core::Vec3f, c: &core::Vec3f)
    -> Option<TriangleHit>
{
    // Uses the Moller-Trumbore intersection algorithm.
    // See <http://en.wikipedia.org/wiki/Moller-Trumbore_intersection_algorithm> for more info.
    let edge1 = *b - *a;
    let edge2 = *c - *a;

    let p = ray.direction.cross(&edge2);
    let det = edge1.dot(&p);
    if core::is_nearly_zero(det) {
        return None; // No hit on plane.
    }

    let inv_det = 1.0 / det;
    let t = ray.origin - *a;
    let u = t.dot(&p) * inv_det;
    if u < 0.0 || u > 1.0 {
        return None; // In plane but not triangle.
    }

    let q = t.cross(&edge1);
    let v = ray.direction.dot(&q) * inv_det;
    if v < 0.0 || (u + v) > 1.0 {
        return None; // In plane but not triangle.
    }

    let dist = edge2.dot(&q) * inv_det;
    if !core::is_positive(dist) {
        return None; // In triangle but behind us.
    }

    Some(TriangleHit {
        lambda: dist,
        bary: core::Vec3f::new(1.0 - u - v, u, v)
    })
}

//! Bounding-volume hierarchy over a triangle soup.
//!
//! The tree is a flat array of nodes with the root at index 0. It is built once from a vertex
//! array and a triangle index array (see `build.rs`) and is immutable afterwards, so any number
//! of threads may traverse it at the same time; each traversal owns its own stack.

use crate::core;
use crate::geom::error::Result;
use crate::geom::triangle::Tri;

use std::fmt;
use std::fmt::Display;

mod build;

/// Ordering used to sort triangles along each axis before sweeping for the cheapest split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitKey {
    /// Sort by the centroid of each triangle's box along the axis.
    Centroid,
    /// Sort by the extent of each triangle's own box along the axis. Produces a valid but
    /// usually much looser tree, since neighbours in this order need not be close in space.
    Extent,
}

impl SplitKey {
    fn key(&self, bbox: &core::BBox, axis: usize) -> f64 {
        match *self {
            SplitKey::Centroid => bbox.centroid()[axis],
            SplitKey::Extent => bbox.max[axis] - bbox.min[axis],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub split_key: SplitKey,
}

impl Default for BuildOptions {
    fn default() -> BuildOptions {
        BuildOptions {split_key: SplitKey::Centroid}
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Indices of the two children in the node array.
    Internal { left: usize, right: usize },
    /// Index of the single triangle stored in this leaf.
    Leaf { triangle: usize },
}

#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub bbox: core::BBox,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        match self.kind {
            NodeKind::Leaf {..} => true,
            NodeKind::Internal {..} => false,
        }
    }
}

pub struct Bvh {
    nodes: Vec<Node>,
}

impl Bvh {
    /// Builds a tree with the default options.
    pub fn build(vertices: &[core::Vec3f], tris: &[Tri]) -> Result<Bvh> {
        Bvh::build_with(vertices, tris, &BuildOptions::default())
    }

    pub fn build_with(vertices: &[core::Vec3f], tris: &[Tri], options: &BuildOptions)
        -> Result<Bvh>
    {
        let nodes = build::Builder::new(vertices, tris, options)?.run()?;
        let bvh = Bvh {nodes: nodes};
        log::debug!("Built {} over {} triangles with {:?}", bvh, tris.len(), options.split_key);
        Ok(bvh)
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut nodes_to_visit = vec![(0usize, 1usize)];
        while let Some((index, depth)) = nodes_to_visit.pop() {
            max_depth = usize::max(max_depth, depth);
            if let NodeKind::Internal {left, right} = self.nodes[index].kind {
                nodes_to_visit.push((left, depth + 1));
                nodes_to_visit.push((right, depth + 1));
            }
        }
        max_depth
    }

    /// Lazily yields the triangles whose leaf boxes the ray may pass through within
    /// `[0, max_lambda]`. The order follows the traversal and says nothing about distance; callers
    /// must test every candidate and keep the closest hit themselves.
    pub fn candidates<'a>(&'a self, ray: &'a core::Ray, max_lambda: f64) -> Candidates<'a> {
        let mut nodes_to_visit = Vec::with_capacity(64);
        nodes_to_visit.push(0);
        Candidates {
            nodes: &self.nodes,
            ray: ray,
            max_lambda: max_lambda,
            nodes_to_visit: nodes_to_visit
        }
    }

    /// Collects `candidates` into a list. An empty list means the ray misses every box.
    pub fn intersect_bounding_boxes(&self, ray: &core::Ray, max_lambda: f64) -> Vec<usize> {
        self.candidates(ray, max_lambda).collect()
    }
}

impl Display for Bvh {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Bvh({} nodes, {} leaves, depth {})",
                self.num_nodes(), self.num_leaves(), self.depth())
    }
}

/// Depth-first traversal state for a single ray.
pub struct Candidates<'a> {
    nodes: &'a [Node],
    ray: &'a core::Ray,
    max_lambda: f64,
    nodes_to_visit: Vec<usize>,
}

impl<'a> Iterator for Candidates<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while let Some(index) = self.nodes_to_visit.pop() {
            let node = &self.nodes[index];
            if !node.bbox.any_intersection(self.ray, self.max_lambda) {
                continue;
            }
            match node.kind {
                NodeKind::Leaf {triangle} => return Some(triangle),
                NodeKind::Internal {left, right} => {
                    self.nodes_to_visit.push(left);
                    self.nodes_to_visit.push(right);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Ray, Vec3f};
    use crate::geom::error::BuildError;

    /// Two triangles forming the z = `z` face of an axis-aligned unit square centered at `x`.
    fn square(x: f64, z: f64, vertices: &mut Vec<Vec3f>, tris: &mut Vec<Tri>) {
        let base = vertices.len();
        vertices.push(Vec3f::new(x - 0.5, -0.5, z));
        vertices.push(Vec3f::new(x + 0.5, -0.5, z));
        vertices.push(Vec3f::new(x + 0.5, 0.5, z));
        vertices.push(Vec3f::new(x - 0.5, 0.5, z));
        tris.push(Tri::new(base, base + 1, base + 2));
        tris.push(Tri::new(base, base + 2, base + 3));
    }

    fn two_squares() -> (Vec<Vec3f>, Vec<Tri>) {
        let mut vertices = vec![];
        let mut tris = vec![];
        square(-5.0, -0.5, &mut vertices, &mut tris);
        square(5.0, 0.5, &mut vertices, &mut tris);
        (vertices, tris)
    }

    #[test]
    fn split_keys_read_box_centroid_and_extent() {
        let bbox = core::BBox::new(Vec3f::new(-1.0, 2.0, 3.0), Vec3f::new(3.0, 2.0, 7.0));
        assert_eq!(SplitKey::Centroid.key(&bbox, 0), 1.0);
        assert_eq!(SplitKey::Centroid.key(&bbox, 1), 2.0);
        assert_eq!(SplitKey::Centroid.key(&bbox, 2), 5.0);
        assert_eq!(SplitKey::Extent.key(&bbox, 0), 4.0);
        assert_eq!(SplitKey::Extent.key(&bbox, 1), 0.0);
    }

    #[test]
    fn single_triangle_is_a_root_leaf() {
        let vertices = vec![
            Vec3f::new(0.0, 0.0, 0.0),
            Vec3f::new(1.0, 0.0, 0.0),
            Vec3f::new(0.0, 1.0, 0.0),
        ];
        let bvh = Bvh::build(&vertices, &[Tri::new(0, 1, 2)]).unwrap();
        assert_eq!(bvh.num_nodes(), 1);
        assert_eq!(bvh.root().kind, NodeKind::Leaf {triangle: 0});
        assert_eq!(bvh.root().bbox.max, Vec3f::new(1.0, 1.0, 0.0));
        assert_eq!(bvh.depth(), 1);
    }

    #[test]
    fn empty_mesh_is_rejected() {
        let err = Bvh::build(&[Vec3f::zero()], &[]).err();
        assert_eq!(err, Some(BuildError::EmptyMesh));
    }

    #[test]
    fn full_binary_tree_shape() {
        let (vertices, tris) = two_squares();
        let bvh = Bvh::build(&vertices, &tris).unwrap();
        assert_eq!(bvh.num_leaves(), 4);
        assert_eq!(bvh.num_nodes(), 2 * 4 - 1);
        assert!(!bvh.root().is_leaf());
    }

    #[test]
    fn ray_only_reports_nearby_square() {
        let (vertices, tris) = two_squares();
        let bvh = Bvh::build(&vertices, &tris).unwrap();
        let ray = Ray::new(Vec3f::new(-5.0, 0.0, -10.0), Vec3f::new(0.0, 0.0, 1.0));
        let mut candidates = bvh.intersect_bounding_boxes(&ray, f64::INFINITY);
        candidates.sort();
        assert_eq!(candidates, vec![0, 1]);
    }

    #[test]
    fn missing_ray_reports_nothing() {
        let (vertices, tris) = two_squares();
        let bvh = Bvh::build(&vertices, &tris).unwrap();
        let ray = Ray::new(Vec3f::new(0.0, 10.0, -10.0), Vec3f::new(0.0, 0.0, 1.0));
        assert!(bvh.intersect_bounding_boxes(&ray, f64::INFINITY).is_empty());
    }

    #[test]
    fn max_lambda_prunes_far_boxes() {
        let (vertices, tris) = two_squares();
        let bvh = Bvh::build(&vertices, &tris).unwrap();
        let ray = Ray::new(Vec3f::new(-5.0, 0.0, -10.0), Vec3f::new(0.0, 0.0, 1.0));
        assert!(bvh.intersect_bounding_boxes(&ray, 5.0).is_empty());
    }

    #[test]
    fn candidates_iterator_matches_collected_list() {
        let (vertices, tris) = two_squares();
        let bvh = Bvh::build(&vertices, &tris).unwrap();
        let ray = Ray::new(Vec3f::new(-20.0, 0.0, 0.0), Vec3f::new(1.0, 0.0, 0.0));
        let listed = bvh.intersect_bounding_boxes(&ray, f64::INFINITY);
        let iterated: Vec<usize> = bvh.candidates(&ray, f64::INFINITY).collect();
        assert_eq!(listed, iterated);
        assert!(listed.is_empty());
    }

    #[test]
    fn display_summarizes_tree() {
        let (vertices, tris) = two_squares();
        let bvh = Bvh::build(&vertices, &tris).unwrap();
        assert_eq!(format!("{}", bvh), "Bvh(7 nodes, 4 leaves, depth 3)");
    }
}

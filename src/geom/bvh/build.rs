use crate::core;
use crate::geom::bvh::{BuildOptions, Node, NodeKind};
use crate::geom::error::{BuildError, Result};
use crate::geom::triangle::Tri;

/// A range of the per-axis orderings that still has to be split, owned by node `node`.
struct BuildJob {
    node: usize,
    offset: usize,
    count: usize,
}

/// Scratch state for a single build. Everything except the node array is dropped once the tree
/// is complete.
pub struct Builder {
    /// Bounding box of every input triangle, by triangle index.
    boxes: Vec<core::BBox>,
    /// For each axis, the triangle indices ordered by the split key. Within every pending range
    /// all three orderings hold the same set of triangles.
    sorted: [Vec<usize>; 3],
    /// Area of the union of `sorted[axis][offset..=i]`, stored at `i`.
    areas_left: [Vec<f64>; 3],
    /// Area of the union of `sorted[axis][i + 1..offset + count]`, stored at `i`.
    areas_right: [Vec<f64>; 3],
    /// True for triangles that go to the left child of the split being applied.
    marker: Vec<bool>,
    buffer: Vec<usize>,
    nodes: Vec<Node>,
}

impl Builder {
    pub fn new(vertices: &[core::Vec3f], tris: &[Tri], options: &BuildOptions)
        -> Result<Builder>
    {
        if tris.is_empty() {
            return Err(BuildError::EmptyMesh);
        }

        let boxes = tris.iter()
                .enumerate()
                .map(|(i, tri)| tri.bbox(i, vertices))
                .collect::<Result<Vec<_>>>()?;

        // Sorting permutations for the x, y and z orderings. Vertex positions are finite at this
        // point, so total_cmp agrees with the usual float order.
        let n = boxes.len();
        let split_key = options.split_key;
        let sort_axis = |axis: usize| {
            let mut permutation: Vec<usize> = (0..n).collect();
            permutation.sort_by(|&a, &b| {
                split_key.key(&boxes[a], axis).total_cmp(&split_key.key(&boxes[b], axis))
            });
            permutation
        };
        let sorted = [sort_axis(0), sort_axis(1), sort_axis(2)];

        let mut nodes = Vec::with_capacity(2 * n - 1);
        let root_bbox = boxes.iter().fold(core::BBox::empty(), |acc, b| acc.combine_with(b));
        nodes.push(if n == 1 {
            Node {bbox: root_bbox, kind: NodeKind::Leaf {triangle: 0}}
        }
        else {
            Builder::pending_node(root_bbox)
        });

        Ok(Builder {
            boxes: boxes,
            sorted: sorted,
            areas_left: [vec![0.0; n], vec![0.0; n], vec![0.0; n]],
            areas_right: [vec![0.0; n], vec![0.0; n], vec![0.0; n]],
            marker: vec![false; n],
            buffer: vec![0; n],
            nodes: nodes
        })
    }

    /// Splits ranges until every leaf holds a single triangle, and returns the node array.
    ///
    /// Ranges are processed from an explicit stack, left child first, which lays out the nodes in
    /// the same order as a recursive depth-first build would.
    pub fn run(mut self) -> Result<Vec<Node>> {
        let n = self.boxes.len();
        let mut jobs = Vec::new();
        if n > 1 {
            jobs.push(BuildJob {node: 0, offset: 0, count: n});
        }

        while let Some(job) = jobs.pop() {
            let (left, right) = self.split(&job)?;
            // Right is pushed first so that the left subtree is finished first.
            if let Some(right) = right {
                jobs.push(right);
            }
            if let Some(left) = left {
                jobs.push(left);
            }
        }

        debug_assert_eq!(self.nodes.len(), 2 * n - 1);
        Ok(self.nodes)
    }

    /// Interior node whose kind is filled in when its range is split.
    fn pending_node(bbox: core::BBox) -> Node {
        Node {bbox: bbox, kind: NodeKind::Internal {left: 0, right: 0}}
    }

    /// Fills `areas_left` and `areas_right` for the range by sweeping each axis ordering from
    /// both ends and growing a box one triangle at a time.
    fn compute_areas(&mut self, offset: usize, count: usize) {
        for axis in 0..3 {
            let sorted = &self.sorted[axis];

            let mut box_left = core::BBox::empty();
            for i in offset..(offset + count) {
                box_left = box_left.combine_with(&self.boxes[sorted[i]]);
                self.areas_left[axis][i] = box_left.surface_area();
            }

            let mut box_right = core::BBox::empty();
            for i in ((offset + 1)..(offset + count)).rev() {
                box_right = box_right.combine_with(&self.boxes[sorted[i]]);
                self.areas_right[axis][i - 1] = box_right.surface_area();
            }
        }
    }

    /// Returns the axis and the position within the range of the last triangle that goes left,
    /// for the split with the lowest surface-area cost. Ties keep the first split evaluated.
    fn find_split(&self, offset: usize, count: usize, total_area: f64) -> (usize, usize) {
        let mut min_cost = f64::INFINITY;
        let mut split_axis = 0;
        let mut split_index = 0;

        for axis in 0..3 {
            for i in 0..(count - 1) {
                let left_area = self.areas_left[axis][offset + i];
                let right_area = self.areas_right[axis][offset + i];
                let cost = (left_area * (i + 1) as f64
                        + right_area * (count - 1 - i) as f64) / total_area;
                if cost < min_cost {
                    min_cost = cost;
                    split_axis = axis;
                    split_index = i;
                }
            }
        }

        log::trace!("Split {} triangles at offset {}: axis {}, index {}, cost {}",
                count, offset, split_axis, split_index, min_cost);
        (split_axis, split_index)
    }

    /// Reorders the other two axis orderings of the range so that the triangles marked left come
    /// first, keeping the relative order within each side.
    fn partition_other_axes(&mut self, offset: usize, count: usize, split_axis: usize,
        left_count: usize)
    {
        for axis in (0..3).filter(|&axis| axis != split_axis) {
            let range = &mut self.sorted[axis][offset..(offset + count)];

            let mut num_left = 0;
            let mut num_right = 0;
            for &triangle in range.iter() {
                if self.marker[triangle] {
                    self.buffer[num_left] = triangle;
                    num_left += 1;
                }
                else {
                    self.buffer[left_count + num_right] = triangle;
                    num_right += 1;
                }
            }
            debug_assert_eq!(num_left, left_count);

            range.copy_from_slice(&self.buffer[..count]);
        }
    }

    fn range_bbox(&self, axis: usize, start: usize, end: usize) -> core::BBox {
        self.sorted[axis][start..end]
                .iter()
                .fold(core::BBox::empty(), |acc, &t| acc.combine_with(&self.boxes[t]))
    }

    /// Creates a child for `count` triangles starting at `offset` in the `axis` ordering. A single
    /// triangle becomes a leaf right away; larger ranges are returned as a job.
    fn add_child(&mut self, axis: usize, offset: usize, count: usize)
        -> (usize, Option<BuildJob>)
    {
        let bbox = self.range_bbox(axis, offset, offset + count);
        let index = self.nodes.len();
        if count == 1 {
            self.nodes.push(Node {
                bbox: bbox,
                kind: NodeKind::Leaf {triangle: self.sorted[axis][offset]}
            });
            (index, None)
        }
        else {
            self.nodes.push(Builder::pending_node(bbox));
            (index, Some(BuildJob {node: index, offset: offset, count: count}))
        }
    }

    fn split(&mut self, job: &BuildJob) -> Result<(Option<BuildJob>, Option<BuildJob>)> {
        let BuildJob {node, offset, count} = *job;

        let total_area = self.nodes[node].bbox.surface_area();
        if !(total_area > 0.0 && total_area.is_finite()) {
            return Err(BuildError::DegenerateBounds {
                offset: offset,
                count: count,
                area: total_area
            });
        }

        self.compute_areas(offset, count);
        let (split_axis, split_index) = self.find_split(offset, count, total_area);
        let left_count = split_index + 1;
        let right_count = count - left_count;

        // Mark the first left_count triangles of the chosen ordering as left, the rest as right.
        for i in 0..count {
            let triangle = self.sorted[split_axis][offset + i];
            self.marker[triangle] = i < left_count;
        }
        self.partition_other_axes(offset, count, split_axis, left_count);

        let (left, left_job) = self.add_child(split_axis, offset, left_count);
        let (right, right_job) = self.add_child(split_axis, offset + left_count, right_count);
        self.nodes[node].kind = NodeKind::Internal {left: left, right: right};

        Ok((left_job, right_job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vec3f;
    use crate::geom::bvh::SplitKey;

    /// Small triangles spaced along the x axis, listed in reverse order.
    fn row_of_triangles(n: usize) -> (Vec<Vec3f>, Vec<Tri>) {
        let mut vertices = vec![];
        let mut tris = vec![];
        for i in (0..n).rev() {
            let x = 3.0 * i as f64;
            let base = vertices.len();
            vertices.push(Vec3f::new(x, 0.0, 0.0));
            vertices.push(Vec3f::new(x + 1.0, 0.0, 0.0));
            vertices.push(Vec3f::new(x, 1.0, 0.5));
            tris.push(Tri::new(base, base + 1, base + 2));
        }
        (vertices, tris)
    }

    #[test]
    fn centroid_key_sorts_spatially() {
        let (vertices, tris) = row_of_triangles(4);
        let builder = Builder::new(&vertices, &tris, &BuildOptions::default()).unwrap();
        // Triangle 3 sits at x = 0, triangle 0 at x = 9.
        assert_eq!(builder.sorted[0], vec![3, 2, 1, 0]);
    }

    #[test]
    fn extent_key_sorts_by_span() {
        let vertices = vec![
            Vec3f::new(0.0, 0.0, 0.0),
            Vec3f::new(4.0, 0.0, 0.0),
            Vec3f::new(0.0, 1.0, 0.0),
            Vec3f::new(10.0, 0.0, 0.0),
            Vec3f::new(11.0, 0.0, 0.0),
            Vec3f::new(10.0, 1.0, 0.0),
        ];
        let tris = vec![Tri::new(0, 1, 2), Tri::new(3, 4, 5)];
        let options = BuildOptions {split_key: SplitKey::Extent};
        let builder = Builder::new(&vertices, &tris, &options).unwrap();
        assert_eq!(builder.sorted[0], vec![1, 0]);
        let builder = Builder::new(&vertices, &tris, &BuildOptions::default()).unwrap();
        assert_eq!(builder.sorted[0], vec![0, 1]);
    }

    #[test]
    fn prefix_areas_cover_both_sides() {
        let (vertices, tris) = row_of_triangles(3);
        let mut builder = Builder::new(&vertices, &tris, &BuildOptions::default()).unwrap();
        builder.compute_areas(0, 3);

        let single = builder.boxes[0].surface_area();
        let pair = builder.boxes[1].combine_with(&builder.boxes[2]).surface_area();
        let all = builder.nodes[0].bbox.surface_area();
        assert_eq!(builder.areas_left[0][0], single);
        assert_eq!(builder.areas_left[0][1], pair);
        assert_eq!(builder.areas_left[0][2], all);
        assert_eq!(builder.areas_right[0][0], pair);
        assert_eq!(builder.areas_right[0][1], single);
    }

    #[test]
    fn partition_keeps_relative_order() {
        let (vertices, tris) = row_of_triangles(4);
        let mut builder = Builder::new(&vertices, &tris, &BuildOptions::default()).unwrap();
        builder.sorted[1] = vec![0, 3, 1, 2];
        builder.marker = vec![true, false, true, false];
        builder.partition_other_axes(0, 4, 0, 2);
        assert_eq!(builder.sorted[1], vec![0, 2, 3, 1]);
        assert_eq!(builder.sorted[0], vec![3, 2, 1, 0]);
    }

    #[test]
    fn row_splits_into_balanced_halves() {
        let (vertices, tris) = row_of_triangles(4);
        let nodes = Builder::new(&vertices, &tris, &BuildOptions::default()).unwrap()
                .run()
                .unwrap();
        assert_eq!(nodes.len(), 7);
        match nodes[0].kind {
            NodeKind::Internal {left, right} => {
                assert_eq!(left, 1);
                assert_eq!(right, 2);
                assert!(nodes[left].bbox.max.x < nodes[right].bbox.min.x);
            }
            NodeKind::Leaf {..} => panic!("root of four triangles is a leaf"),
        }
    }

    #[test]
    fn coincident_triangles_with_zero_area_are_rejected() {
        let vertices = vec![Vec3f::new(1.0, 1.0, 1.0)];
        let tris = vec![Tri::new(0, 0, 0), Tri::new(0, 0, 0)];
        let err = Builder::new(&vertices, &tris, &BuildOptions::default()).unwrap()
                .run()
                .unwrap_err();
        assert_eq!(err, BuildError::DegenerateBounds {offset: 0, count: 2, area: 0.0});
    }

    #[test]
    fn out_of_range_vertex_fails_before_building() {
        let vertices = vec![Vec3f::zero(), Vec3f::one()];
        let tris = vec![Tri::new(0, 1, 0), Tri::new(0, 1, 2)];
        let err = Builder::new(&vertices, &tris, &BuildOptions::default()).err();
        assert_eq!(err, Some(BuildError::VertexIndexOutOfRange {
            triangle: 1,
            vertex: 2,
            num_vertices: 2
        }));
    }
}

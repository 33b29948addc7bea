// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Bounding volume hierarchy over the faces of one mesh.
//!
//! Median split along the longest axis. Leaf boxes are the padded
//! conservative boxes from [`BoundingBox::from_exact_triangle`], so a box
//! query can over-report candidates but never miss a true intersection.

use super::bbox::BoundingBox;
use super::mesh::Mesh;

const MAX_DEPTH: usize = 32;
const LEAF_SIZE: usize = 4;

#[derive(Debug)]
struct Node {
    bbox: BoundingBox,
    children: Option<(Box<Node>, Box<Node>)>,
    /// Face ids with their boxes, leaves only.
    faces: Vec<(usize, BoundingBox)>,
}

impl Node {
    fn leaf(entries: &[(usize, BoundingBox)]) -> Self {
        Self {
            bbox: union_of(entries),
            children: None,
            faces: entries.to_vec(),
        }
    }
}

fn union_of(entries: &[(usize, BoundingBox)]) -> BoundingBox {
    entries
        .iter()
        .fold(BoundingBox::empty(), |acc, (_, bb)| acc.union(bb))
}

/// Spatial index over one mesh's faces.
#[derive(Debug)]
pub struct FaceBvh {
    root: Node,
}

impl FaceBvh {
    /// Build the hierarchy for every face of `mesh`.
    pub fn build(mesh: &Mesh) -> Self {
        let mut entries: Vec<(usize, BoundingBox)> = (0..mesh.face_count())
            .map(|fi| (fi, BoundingBox::from_exact_triangle(&mesh.face_points(fi))))
            .collect();
        let root = build_node(&mut entries, 0);
        Self { root }
    }

    /// Bounding box of the whole indexed mesh.
    pub fn bounds(&self) -> &BoundingBox {
        &self.root.bbox
    }

    /// Face ids whose boxes intersect `query`.
    pub fn query(&self, query: &BoundingBox) -> Vec<usize> {
        let mut out = Vec::new();
        collect(&self.root, query, &mut out);
        out
    }
}

fn build_node(entries: &mut [(usize, BoundingBox)], depth: usize) -> Node {
    if entries.len() <= LEAF_SIZE || depth >= MAX_DEPTH {
        return Node::leaf(entries);
    }
    let bbox = union_of(entries);
    let axis = bbox.longest_axis();
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by(mid, |(_, a), (_, b)| {
        a.center()[axis]
            .partial_cmp(&b.center()[axis])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let (left, right) = entries.split_at_mut(mid);
    let left = Box::new(build_node(left, depth + 1));
    let right = Box::new(build_node(right, depth + 1));
    Node {
        bbox,
        children: Some((left, right)),
        faces: Vec::new(),
    }
}

fn collect(node: &Node, query: &BoundingBox, out: &mut Vec<usize>) {
    if !node.bbox.intersects(query) {
        return;
    }
    match &node.children {
        Some((left, right)) => {
            collect(left, query, out);
            collect(right, query, out);
        }
        None => out.extend(
            node.faces
                .iter()
                .filter(|(_, bb)| bb.intersects(query))
                .map(|(fi, _)| *fi),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::exact::ExactPoint;
    use crate::geometry::primitives::cuboid;
    use nalgebra::Point3;

    fn unit_cube() -> Mesh {
        cuboid(
            ExactPoint::from_integers(0, 0, 0),
            ExactPoint::from_integers(1, 1, 1),
        )
        .unwrap()
    }

    #[test]
    fn test_query_whole_box_returns_all_faces() {
        let mesh = unit_cube();
        let bvh = FaceBvh::build(&mesh);
        let mut hits = bvh.query(bvh.bounds());
        hits.sort_unstable();
        assert_eq!(hits, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_query_corner_is_partial() {
        let mesh = unit_cube();
        let bvh = FaceBvh::build(&mesh);
        let corner = BoundingBox::new(Point3::new(-0.1, -0.1, -0.1), Point3::new(0.1, 0.1, 0.1));
        let mut hits = bvh.query(&corner);
        hits.sort_unstable();
        // Exactly the bottom, front, and left faces touch this corner.
        assert_eq!(hits, vec![0, 1, 4, 5, 8, 9]);
    }

    #[test]
    fn test_query_far_box_is_empty() {
        let mesh = unit_cube();
        let bvh = FaceBvh::build(&mesh);
        let far = BoundingBox::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        assert!(bvh.query(&far).is_empty());
    }

    #[test]
    fn test_empty_mesh_builds() {
        let bvh = FaceBvh::build(&Mesh::new());
        assert!(bvh
            .query(&BoundingBox::new(
                Point3::new(-1.0, -1.0, -1.0),
                Point3::new(1.0, 1.0, 1.0)
            ))
            .is_empty());
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Indexed triangle mesh over exact vertices.
//!
//! Vertices live in an arena and are addressed by `usize` ids; faces are
//! ordered index triples whose winding defines the outward orientation.
//! Adjacency is rebuilt lazily: structural edits clear the cached edge map
//! and the next adjacency query recomputes it.

use super::exact::{ExactPoint, ExactVector};
use crate::error::{MeshBooleanError, Result};
use std::collections::HashMap;

/// A triangular face: three vertex ids, counter-clockwise seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [usize; 3],
}

impl Face {
    pub fn new(vertices: [usize; 3]) -> Self {
        Self { vertices }
    }

    /// Same face with reversed winding.
    pub fn flipped(&self) -> Self {
        let [a, b, c] = self.vertices;
        Self::new([a, c, b])
    }

    /// The three directed edges of the face, in winding order.
    pub fn directed_edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }

    /// The smallest rotation of the vertex triple, for canonical comparison
    /// of faces regardless of starting vertex.
    pub fn canonical(&self) -> [usize; 3] {
        let [a, b, c] = self.vertices;
        let rotations = [[a, b, c], [b, c, a], [c, a, b]];
        *rotations.iter().min().unwrap()
    }
}

/// Map from undirected edge to the faces containing it, with the direction
/// each face traverses the edge.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    edge_faces: HashMap<(usize, usize), Vec<usize>>,
}

fn undirected(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl Adjacency {
    fn build(faces: &[Face]) -> Self {
        let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
        for (fi, face) in faces.iter().enumerate() {
            for (a, b) in face.directed_edges() {
                edge_faces.entry(undirected(a, b)).or_default().push(fi);
            }
        }
        Self { edge_faces }
    }

    /// Face ids incident to the undirected edge (a, b).
    pub fn faces_sharing_edge(&self, a: usize, b: usize) -> &[usize] {
        self.edge_faces
            .get(&undirected(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Indexed triangle mesh with exact vertex coordinates.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<ExactPoint>,
    pub faces: Vec<Face>,
    adjacency: Option<Adjacency>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
            adjacency: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Add a vertex and return its id.
    pub fn add_vertex(&mut self, point: ExactPoint) -> usize {
        self.vertices.push(point);
        self.vertices.len() - 1
    }

    /// Add a face. Indices must be in range and pairwise distinct.
    pub fn add_face(&mut self, vertices: [usize; 3]) -> Result<usize> {
        let n = self.vertices.len();
        if vertices.iter().any(|&v| v >= n) {
            return Err(MeshBooleanError::InvalidInputMesh(format!(
                "face {vertices:?} references a vertex outside 0..{n}"
            )));
        }
        if vertices[0] == vertices[1] || vertices[1] == vertices[2] || vertices[0] == vertices[2] {
            return Err(MeshBooleanError::InvalidInputMesh(format!(
                "face {vertices:?} repeats a vertex"
            )));
        }
        self.faces.push(Face::new(vertices));
        self.adjacency = None;
        Ok(self.faces.len() - 1)
    }

    /// Remove a face by id. The last face takes its slot, so only the id of
    /// the previously-last face is invalidated.
    pub fn remove_face(&mut self, face_id: usize) {
        self.faces.swap_remove(face_id);
        self.adjacency = None;
    }

    /// Fan-split a face at an interior point: the face is replaced by three
    /// faces sharing the new vertex. Returns the new vertex id.
    pub fn split_face(&mut self, face_id: usize, point: ExactPoint) -> Result<usize> {
        if face_id >= self.faces.len() {
            return Err(MeshBooleanError::InvalidInputMesh(format!(
                "split of nonexistent face {face_id}"
            )));
        }
        let [a, b, c] = self.faces[face_id].vertices;
        let m = self.add_vertex(point);
        self.faces[face_id] = Face::new([a, b, m]);
        self.faces.push(Face::new([b, c, m]));
        self.faces.push(Face::new([c, a, m]));
        self.adjacency = None;
        Ok(m)
    }

    /// The three corner points of a face.
    pub fn face_points(&self, face_id: usize) -> [&ExactPoint; 3] {
        let [a, b, c] = self.faces[face_id].vertices;
        [&self.vertices[a], &self.vertices[b], &self.vertices[c]]
    }

    /// Unnormalized outward normal of a face (exact).
    pub fn face_normal(&self, face_id: usize) -> ExactVector {
        let [p0, p1, p2] = self.face_points(face_id);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Exact centroid of a face.
    pub fn face_centroid(&self, face_id: usize) -> ExactPoint {
        let [p0, p1, p2] = self.face_points(face_id);
        ExactPoint::centroid(p0, p1, p2)
    }

    /// Cached adjacency, rebuilt after any structural edit.
    pub fn adjacency(&mut self) -> &Adjacency {
        if self.adjacency.is_none() {
            self.adjacency = Some(Adjacency::build(&self.faces));
        }
        self.adjacency.as_ref().unwrap()
    }

    /// Adjacency computed fresh without touching the cache. Usable from
    /// shared references, e.g. inside parallel sections.
    pub fn compute_adjacency(&self) -> Adjacency {
        Adjacency::build(&self.faces)
    }

    /// Face ids sharing the undirected edge (a, b), via the cache.
    pub fn faces_sharing_edge(&mut self, a: usize, b: usize) -> Vec<usize> {
        self.adjacency().faces_sharing_edge(a, b).to_vec()
    }

    /// Faces sharing an edge with `face_id`, in edge order, without
    /// duplicates.
    pub fn neighbors_of(&mut self, face_id: usize) -> Vec<usize> {
        let edges = self.faces[face_id].directed_edges();
        let adj = self.adjacency();
        let mut out = Vec::with_capacity(3);
        for (a, b) in edges {
            for &nf in adj.faces_sharing_edge(a, b) {
                if nf != face_id && !out.contains(&nf) {
                    out.push(nf);
                }
            }
        }
        out
    }

    /// Verify the mesh bounds a solid: every directed edge appears exactly
    /// once and its reverse appears in some other face, no degenerate faces,
    /// no duplicate faces. An empty mesh passes (the empty solid).
    pub fn validate_closed(&self) -> Result<()> {
        let mut directed: HashMap<(usize, usize), usize> = HashMap::new();
        let mut seen_faces: HashMap<[usize; 3], usize> = HashMap::new();

        for (fi, face) in self.faces.iter().enumerate() {
            let n = self.vertices.len();
            if face.vertices.iter().any(|&v| v >= n) {
                return Err(MeshBooleanError::InvalidInputMesh(format!(
                    "face {fi} references a vertex outside 0..{n}"
                )));
            }
            if let Some(prev) = seen_faces.insert(face.canonical(), fi) {
                return Err(MeshBooleanError::InvalidInputMesh(format!(
                    "faces {prev} and {fi} are duplicates"
                )));
            }
            let [p0, p1, p2] = self.face_points(fi);
            if (p1 - p0).cross(&(p2 - p0)).is_zero() {
                return Err(MeshBooleanError::InvalidInputMesh(format!(
                    "face {fi} has zero area"
                )));
            }
            for (a, b) in face.directed_edges() {
                if a == b {
                    return Err(MeshBooleanError::InvalidInputMesh(format!(
                        "face {fi} repeats vertex {a}"
                    )));
                }
                *directed.entry((a, b)).or_insert(0) += 1;
            }
        }

        for (&(a, b), &count) in &directed {
            if count != 1 {
                return Err(MeshBooleanError::InvalidInputMesh(format!(
                    "directed edge ({a}, {b}) appears {count} times; mesh is non-manifold"
                )));
            }
            if !directed.contains_key(&(b, a)) {
                return Err(MeshBooleanError::InvalidInputMesh(format!(
                    "edge ({a}, {b}) has no oppositely wound partner; mesh is open"
                )));
            }
        }
        Ok(())
    }

    /// Canonical face set for comparing meshes up to face order and
    /// starting-vertex rotation. Vertices are compared by coordinates, so
    /// two meshes with different vertex numbering still compare equal.
    pub fn canonical_faces(&self) -> Vec<[ExactPoint; 3]> {
        let mut out: Vec<[ExactPoint; 3]> = self
            .faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.vertices;
                let corners = [
                    self.vertices[a].clone(),
                    self.vertices[b].clone(),
                    self.vertices[c].clone(),
                ];
                let mut best = corners.clone();
                for rot in 1..3 {
                    let cand = [
                        corners[rot % 3].clone(),
                        corners[(rot + 1) % 3].clone(),
                        corners[(rot + 2) % 3].clone(),
                    ];
                    if cand < best {
                        best = cand;
                    }
                }
                best
            })
            .collect();
        out.sort();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Mesh {
        let mut m = Mesh::new();
        let v0 = m.add_vertex(ExactPoint::from_integers(0, 0, 0));
        let v1 = m.add_vertex(ExactPoint::from_integers(1, 0, 0));
        let v2 = m.add_vertex(ExactPoint::from_integers(0, 1, 0));
        let v3 = m.add_vertex(ExactPoint::from_integers(0, 0, 1));
        m.add_face([v0, v2, v1]).unwrap();
        m.add_face([v0, v1, v3]).unwrap();
        m.add_face([v1, v2, v3]).unwrap();
        m.add_face([v0, v3, v2]).unwrap();
        m
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        tetrahedron().validate_closed().unwrap();
    }

    #[test]
    fn test_open_mesh_rejected() {
        let mut m = tetrahedron();
        m.remove_face(0);
        assert!(m.validate_closed().is_err());
    }

    #[test]
    fn test_duplicate_face_rejected() {
        let mut m = tetrahedron();
        // Same triangle again, rotated; still a duplicate.
        m.add_face([2, 1, 0]).unwrap();
        assert!(m.validate_closed().is_err());
    }

    #[test]
    fn test_empty_mesh_is_valid() {
        Mesh::new().validate_closed().unwrap();
    }

    #[test]
    fn test_add_face_validates_indices() {
        let mut m = Mesh::new();
        let v0 = m.add_vertex(ExactPoint::from_integers(0, 0, 0));
        assert!(m.add_face([v0, v0 + 1, v0 + 2]).is_err());
        assert!(m.add_face([v0, v0, v0]).is_err());
    }

    #[test]
    fn test_split_face_keeps_mesh_closed() {
        let mut m = tetrahedron();
        let centroid = m.face_centroid(0);
        m.split_face(0, centroid).unwrap();
        assert_eq!(m.face_count(), 6);
        m.validate_closed().unwrap();
    }

    #[test]
    fn test_adjacency_edges() {
        let mut m = tetrahedron();
        let shared = m.faces_sharing_edge(0, 1);
        assert_eq!(shared.len(), 2);
        let none = m.faces_sharing_edge(0, 99);
        assert!(none.is_empty());
    }

    #[test]
    fn test_face_neighbors() {
        let mut m = tetrahedron();
        let n = m.neighbors_of(0);
        assert_eq!(n.len(), 3);
        assert!(!n.contains(&0));
    }

    #[test]
    fn test_canonical_faces_ignore_order() {
        let a = tetrahedron();
        let mut b = tetrahedron();
        b.faces.reverse();
        assert_eq!(a.canonical_faces(), b.canonical_faces());
    }
}

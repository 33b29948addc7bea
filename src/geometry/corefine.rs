// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Corefinement: refine two meshes against each other so their intersection
//! curve becomes a chain of coincident edges in both.
//!
//! Pipeline: BVH candidate pairs, exact triangle-triangle intersections,
//! per-face accumulation of points and constraint segments, propagation of
//! points landing on original edges to both incident faces, constrained
//! retriangulation of every touched face, deterministic rebuild. Running
//! corefinement a second time finds only existing vertices and edges, so it
//! is idempotent.

use super::bbox::BoundingBox;
use super::bvh::FaceBvh;
use super::exact::ExactPoint;
use super::mesh::Mesh;
use super::predicates::segment_parameter;
use super::retriangulate::{retriangulate_face, FaceTriangulation};
use super::triangle_intersection::{triangle_triangle_intersection, TriTriIntersection};
use crate::error::{MeshBooleanError, Result};
use num_rational::BigRational;
use num_traits::{One, Zero};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};

/// Both meshes after mutual refinement, with the intersection-curve edges
/// marked by vertex-id pairs (smaller id first).
#[derive(Debug, Clone)]
pub struct Corefined {
    pub mesh_a: Mesh,
    pub mesh_b: Mesh,
    pub shared_edges_a: HashSet<(usize, usize)>,
    pub shared_edges_b: HashSet<(usize, usize)>,
}

/// Points and constraint segments accumulated on one face.
#[derive(Debug, Clone, Default)]
struct FaceWork {
    points: Vec<ExactPoint>,
    segments: Vec<(ExactPoint, ExactPoint)>,
}

/// Reject meshes a boolean cannot start from.
pub fn validate_input(mesh: &Mesh, which: &str) -> Result<()> {
    if mesh.is_empty() {
        return Err(MeshBooleanError::InvalidInputMesh(format!(
            "{which} mesh has no faces"
        )));
    }
    mesh.validate_closed()
}

/// Corefine two closed meshes. The inputs are untouched; the returned
/// meshes bound the same solids with the intersection curve embedded.
pub fn corefine(a: &Mesh, b: &Mesh) -> Result<Corefined> {
    validate_input(a, "first")?;
    validate_input(b, "second")?;

    let pairs = intersect_pairs(a, b)?;

    let mut work_a: HashMap<usize, FaceWork> = HashMap::new();
    let mut work_b: HashMap<usize, FaceWork> = HashMap::new();
    for (fa, fb, hit) in pairs {
        record_hit(&hit, work_a.entry(fa).or_default());
        record_hit(&hit, work_b.entry(fb).or_default());
    }

    distribute_edge_points(a, &mut work_a);
    distribute_edge_points(b, &mut work_b);

    let tris_a = retriangulate_all(a, &work_a)?;
    let tris_b = retriangulate_all(b, &work_b)?;

    let (mesh_a, shared_edges_a) = rebuild(a, &tris_a)?;
    let (mesh_b, shared_edges_b) = rebuild(b, &tris_b)?;

    Ok(Corefined {
        mesh_a,
        mesh_b,
        shared_edges_a,
        shared_edges_b,
    })
}

fn face_triangle(mesh: &Mesh, fi: usize) -> [ExactPoint; 3] {
    let [p0, p1, p2] = mesh.face_points(fi);
    [p0.clone(), p1.clone(), p2.clone()]
}

/// All intersecting face pairs with their exact intersections. Candidates
/// come from the BVH over `b`; faces of `a` are processed in parallel.
fn intersect_pairs(a: &Mesh, b: &Mesh) -> Result<Vec<(usize, usize, TriTriIntersection)>> {
    let bvh_b = FaceBvh::build(b);
    let per_face: Vec<Vec<(usize, usize, TriTriIntersection)>> = (0..a.face_count())
        .into_par_iter()
        .map(|fa| -> Result<Vec<(usize, usize, TriTriIntersection)>> {
            let tri_a = face_triangle(a, fa);
            let box_a = BoundingBox::from_exact_triangle(&a.face_points(fa));
            let mut hits = Vec::new();
            let mut candidates = bvh_b.query(&box_a);
            candidates.sort_unstable();
            for fb in candidates {
                let tri_b = face_triangle(b, fb);
                let hit = triangle_triangle_intersection(&tri_a, &tri_b)?;
                if hit != TriTriIntersection::Empty {
                    hits.push((fa, fb, hit));
                }
            }
            Ok(hits)
        })
        .collect::<Result<_>>()?;
    Ok(per_face.into_iter().flatten().collect())
}

fn record_hit(hit: &TriTriIntersection, work: &mut FaceWork) {
    match hit {
        TriTriIntersection::Empty => {}
        TriTriIntersection::Point(p) => work.points.push(p.clone()),
        TriTriIntersection::Segment(s, e) => work.segments.push((s.clone(), e.clone())),
        TriTriIntersection::Coplanar(poly) => {
            // The overlap polygon's boundary becomes constraint edges, so a
            // zero-thickness boundary patch is stitched into both meshes.
            for i in 0..poly.len() {
                let s = poly[i].clone();
                let e = poly[(i + 1) % poly.len()].clone();
                work.segments.push((s, e));
            }
        }
    }
}

fn on_segment_inclusive(a: &ExactPoint, b: &ExactPoint, p: &ExactPoint) -> bool {
    match segment_parameter(a, b, p) {
        Some(t) => t >= BigRational::zero() && t <= BigRational::one(),
        None => false,
    }
}

/// Propagate refinement points that land on an original mesh edge to the
/// neighboring face, so both sides of the edge split identically and the
/// surface stays watertight.
fn distribute_edge_points(mesh: &Mesh, work: &mut HashMap<usize, FaceWork>) {
    let adj = mesh.compute_adjacency();
    let mut extra_points: Vec<(usize, ExactPoint)> = Vec::new();
    let mut extra_segments: Vec<(usize, (ExactPoint, ExactPoint))> = Vec::new();

    for (&fi, w) in work.iter() {
        for (u, v) in mesh.faces[fi].directed_edges() {
            let pu = &mesh.vertices[u];
            let pv = &mesh.vertices[v];
            for &nf in adj.faces_sharing_edge(u, v) {
                if nf == fi {
                    continue;
                }
                for p in &w.points {
                    if on_segment_inclusive(pu, pv, p) {
                        extra_points.push((nf, p.clone()));
                    }
                }
                for (s, e) in &w.segments {
                    let s_on = on_segment_inclusive(pu, pv, s);
                    let e_on = on_segment_inclusive(pu, pv, e);
                    if s_on && e_on {
                        // Whole segment runs along the edge.
                        extra_segments.push((nf, (s.clone(), e.clone())));
                    } else if s_on {
                        extra_points.push((nf, s.clone()));
                    } else if e_on {
                        extra_points.push((nf, e.clone()));
                    }
                }
            }
        }
    }

    for (fi, p) in extra_points {
        work.entry(fi).or_default().points.push(p);
    }
    for (fi, s) in extra_segments {
        work.entry(fi).or_default().segments.push(s);
    }
}

/// Retriangulate every touched face, in parallel.
fn retriangulate_all(
    mesh: &Mesh,
    work: &HashMap<usize, FaceWork>,
) -> Result<HashMap<usize, FaceTriangulation>> {
    let mut touched: Vec<(&usize, &FaceWork)> = work.iter().collect();
    touched.sort_by_key(|(fi, _)| **fi);
    let done: Vec<(usize, FaceTriangulation)> = touched
        .into_par_iter()
        .map(|(&fi, w)| -> Result<(usize, FaceTriangulation)> {
            let corners = face_triangle(mesh, fi);
            let ft = retriangulate_face(&corners, &w.points, &w.segments)?;
            Ok((fi, ft))
        })
        .collect::<Result<_>>()?;
    Ok(done.into_iter().collect())
}

/// Rebuild a mesh with touched faces replaced by their sub-triangles.
/// Original vertex ids are preserved; new vertices are appended in the
/// (deterministic) order the sub-triangles produce them.
fn rebuild(
    mesh: &Mesh,
    tris: &HashMap<usize, FaceTriangulation>,
) -> Result<(Mesh, HashSet<(usize, usize)>)> {
    let mut out = Mesh::with_capacity(mesh.vertex_count(), mesh.face_count());
    let mut ids: HashMap<ExactPoint, usize> = HashMap::new();
    for v in &mesh.vertices {
        let id = out.add_vertex(v.clone());
        ids.entry(v.clone()).or_insert(id);
    }

    for fi in 0..mesh.face_count() {
        match tris.get(&fi) {
            Some(ft) => {
                for t in &ft.triangles {
                    let ia = intern(&mut out, &mut ids, &t[0]);
                    let ib = intern(&mut out, &mut ids, &t[1]);
                    let ic = intern(&mut out, &mut ids, &t[2]);
                    out.add_face([ia, ib, ic])?;
                }
            }
            None => {
                out.add_face(mesh.faces[fi].vertices)?;
            }
        }
    }

    let mut shared: HashSet<(usize, usize)> = HashSet::new();
    for ft in tris.values() {
        for (p, q) in &ft.constraints {
            if let (Some(&i), Some(&j)) = (ids.get(p), ids.get(q)) {
                shared.insert(if i < j { (i, j) } else { (j, i) });
            }
        }
    }
    Ok((out, shared))
}

fn intern(mesh: &mut Mesh, ids: &mut HashMap<ExactPoint, usize>, p: &ExactPoint) -> usize {
    if let Some(&id) = ids.get(p) {
        return id;
    }
    let id = mesh.add_vertex(p.clone());
    ids.insert(p.clone(), id);
    id
}

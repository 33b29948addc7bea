// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Constrained retriangulation of a single face.
//!
//! A face touched by the other mesh receives a set of points and constraint
//! segments (the intersection curve restricted to this face). The segments
//! are first arranged: split at mutual crossings and at every point lying in
//! their interior, so no two constraints cross and no vertex sits inside
//! one. The face is then triangulated incrementally in its projected plane
//! and each constraint is recovered by edge flips. Insertion order is
//! lexicographic, which makes the result independent of discovery order.

use super::exact::ExactPoint;
use super::predicates::{orient2d, segment_parameter, strictly_between, PlaneProjection, Uv};
use crate::error::{MeshBooleanError, Result};
use std::collections::{BTreeSet, HashMap};

/// Result of retriangulating one face.
#[derive(Debug, Clone)]
pub struct FaceTriangulation {
    /// Sub-triangles covering the face, winding matching the input corners.
    pub triangles: Vec<[ExactPoint; 3]>,
    /// The arranged constraint sub-segments, each realized as an edge.
    pub constraints: Vec<(ExactPoint, ExactPoint)>,
}

/// Retriangulate `corners` so that every point becomes a vertex and every
/// segment a union of edges. Points and segment endpoints must lie in the
/// closed triangle.
pub fn retriangulate_face(
    corners: &[ExactPoint; 3],
    points: &[ExactPoint],
    segments: &[(ExactPoint, ExactPoint)],
) -> Result<FaceTriangulation> {
    if points.is_empty() && segments.is_empty() {
        return Ok(FaceTriangulation {
            triangles: vec![corners.clone()],
            constraints: Vec::new(),
        });
    }
    let proj = PlaneProjection::for_triangle(corners)?;
    let (all_points, subsegments) = arrange(corners, points, segments, &proj);

    let mut tri = LocalTriangulation::new(corners, proj);
    for p in &all_points {
        tri.insert_point(p.clone())?;
    }
    for (a, b) in &subsegments {
        let ia = tri.insert_point(a.clone())?;
        let ib = tri.insert_point(b.clone())?;
        tri.insert_constraint(ia, ib)?;
    }

    Ok(FaceTriangulation {
        triangles: tri.into_triangles(),
        constraints: subsegments,
    })
}

/// Split segments at pairwise proper crossings and at every point interior
/// to them. Returns the full point set and the disjoint sub-segments, both
/// lexicographically sorted.
fn arrange(
    corners: &[ExactPoint; 3],
    points: &[ExactPoint],
    segments: &[(ExactPoint, ExactPoint)],
    proj: &PlaneProjection,
) -> (Vec<ExactPoint>, Vec<(ExactPoint, ExactPoint)>) {
    let mut point_set: BTreeSet<ExactPoint> = points.iter().cloned().collect();
    for (a, b) in segments {
        point_set.insert(a.clone());
        point_set.insert(b.clone());
    }

    // Proper pairwise crossings become split points of both segments.
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            if let Some(x) = proper_crossing(&segments[i], &segments[j], proj) {
                point_set.insert(x);
            }
        }
    }

    // Split at every point in a segment's interior. This also resolves
    // collinear overlaps and endpoints resting on another segment, because
    // all endpoints are in the point set. Corners count as split points so
    // a constraint never hides one in its interior.
    let mut splitters: Vec<&ExactPoint> = point_set.iter().collect();
    splitters.extend(corners.iter());

    let mut subs: BTreeSet<(ExactPoint, ExactPoint)> = BTreeSet::new();
    for (a, b) in segments {
        if a == b {
            continue;
        }
        let mut cuts: Vec<(num_rational::BigRational, ExactPoint)> = splitters
            .iter()
            .filter(|p| strictly_between(a, b, p))
            .filter_map(|p| segment_parameter(a, b, p).map(|t| (t, (*p).clone())))
            .collect();
        cuts.sort_by(|(s, _), (t, _)| s.cmp(t));
        let mut prev = a.clone();
        for (_, p) in cuts {
            subs.insert(ordered(prev, p.clone()));
            prev = p;
        }
        subs.insert(ordered(prev, b.clone()));
    }

    (point_set.into_iter().collect(), subs.into_iter().collect())
}

fn ordered(a: ExactPoint, b: ExactPoint) -> (ExactPoint, ExactPoint) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Exact crossing point of two segments whose interiors properly intersect.
fn proper_crossing(
    s1: &(ExactPoint, ExactPoint),
    s2: &(ExactPoint, ExactPoint),
    proj: &PlaneProjection,
) -> Option<ExactPoint> {
    use super::exact::sign;
    use super::predicates::orient2d_value;

    let (a, b) = (&s1.0, &s1.1);
    let (c, d) = (&s2.0, &s2.1);
    let (ua, ub, uc, ud) = (proj.uv(a), proj.uv(b), proj.uv(c), proj.uv(d));
    let fa = orient2d_value(&uc, &ud, &ua);
    let fb = orient2d_value(&uc, &ud, &ub);
    let fc = orient2d_value(&ua, &ub, &uc);
    let fd = orient2d_value(&ua, &ub, &ud);
    if sign(&fa) * sign(&fb) < 0 && sign(&fc) * sign(&fd) < 0 {
        let t = &fa / (&fa - &fb);
        return Some(a.lerp(b, &t));
    }
    None
}

const MAX_FLIP_ROUNDS: usize = 10_000;

/// Incremental triangulation of one face in its projected plane.
///
/// Triangles are kept counter-clockwise in the projection, which maps back
/// to the original 3-D winding of the corners.
struct LocalTriangulation {
    proj: PlaneProjection,
    points: Vec<ExactPoint>,
    uv: Vec<Uv>,
    tris: Vec<[usize; 3]>,
    index: HashMap<ExactPoint, usize>,
}

impl LocalTriangulation {
    fn new(corners: &[ExactPoint; 3], proj: PlaneProjection) -> Self {
        let mut t = Self {
            proj,
            points: Vec::new(),
            uv: Vec::new(),
            tris: Vec::new(),
            index: HashMap::new(),
        };
        for c in corners {
            t.push_vertex(c.clone());
        }
        t.tris.push([0, 1, 2]);
        t
    }

    fn push_vertex(&mut self, p: ExactPoint) -> usize {
        let id = self.points.len();
        self.uv.push(self.proj.uv(&p));
        self.index.insert(p.clone(), id);
        self.points.push(p);
        id
    }

    /// Insert a point, splitting the triangle or edge it falls on.
    /// Returns the vertex id; re-inserting an existing point is a no-op.
    fn insert_point(&mut self, p: ExactPoint) -> Result<usize> {
        if let Some(&id) = self.index.get(&p) {
            return Ok(id);
        }
        let uv = self.proj.uv(&p);
        for ti in 0..self.tris.len() {
            let [a, b, c] = self.tris[ti];
            let s0 = orient2d(&self.uv[a], &self.uv[b], &uv);
            let s1 = orient2d(&self.uv[b], &self.uv[c], &uv);
            let s2 = orient2d(&self.uv[c], &self.uv[a], &uv);
            if s0 < 0 || s1 < 0 || s2 < 0 {
                continue;
            }
            let m = self.push_vertex(p);
            if s0 == 0 {
                self.split_edge(ti, a, b, m);
            } else if s1 == 0 {
                self.split_edge(ti, b, c, m);
            } else if s2 == 0 {
                self.split_edge(ti, c, a, m);
            } else {
                self.tris[ti] = [a, b, m];
                self.tris.push([b, c, m]);
                self.tris.push([c, a, m]);
            }
            return Ok(m);
        }
        Err(MeshBooleanError::DegenerateGeometry(
            "refinement point falls outside its face".into(),
        ))
    }

    /// Split the edge (u, v) at vertex m, in the triangle `ti` that carries
    /// it and in the opposite triangle when the edge is interior.
    fn split_edge(&mut self, ti: usize, u: usize, v: usize, m: usize) {
        let w = self.apex_of(ti, u, v);
        self.tris[ti] = [u, m, w];
        self.tris.push([m, v, w]);
        if let Some((tj, y)) = self.find_directed(v, u) {
            self.tris[tj] = [v, m, y];
            self.tris.push([m, u, y]);
        }
    }

    fn apex_of(&self, ti: usize, u: usize, v: usize) -> usize {
        let t = self.tris[ti];
        for k in 0..3 {
            if t[k] == u && t[(k + 1) % 3] == v {
                return t[(k + 2) % 3];
            }
        }
        unreachable!("triangle {ti} does not carry directed edge ({u}, {v})")
    }

    /// Triangle carrying the directed edge (u, v), with its apex.
    fn find_directed(&self, u: usize, v: usize) -> Option<(usize, usize)> {
        for (ti, t) in self.tris.iter().enumerate() {
            for k in 0..3 {
                if t[k] == u && t[(k + 1) % 3] == v {
                    return Some((ti, t[(k + 2) % 3]));
                }
            }
        }
        None
    }

    fn edge_exists(&self, a: usize, b: usize) -> bool {
        self.tris
            .iter()
            .any(|t| t.contains(&a) && t.contains(&b))
    }

    /// Undirected edges whose interiors properly cross the open segment
    /// (a, b).
    fn edges_crossing(&self, a: usize, b: usize) -> Vec<(usize, usize)> {
        let mut seen: BTreeSet<(usize, usize)> = BTreeSet::new();
        for t in &self.tris {
            for k in 0..3 {
                let (u, v) = (t[k], t[(k + 1) % 3]);
                let key = if u < v { (u, v) } else { (v, u) };
                if u == a || u == b || v == a || v == b || seen.contains(&key) {
                    continue;
                }
                let o1 = orient2d(&self.uv[a], &self.uv[b], &self.uv[u]);
                let o2 = orient2d(&self.uv[a], &self.uv[b], &self.uv[v]);
                let o3 = orient2d(&self.uv[u], &self.uv[v], &self.uv[a]);
                let o4 = orient2d(&self.uv[u], &self.uv[v], &self.uv[b]);
                if o1 * o2 < 0 && o3 * o4 < 0 {
                    seen.insert(key);
                }
            }
        }
        seen.into_iter().collect()
    }

    /// Flip the interior edge (u, v) if its surrounding quad is strictly
    /// convex. Returns false when the edge is on the boundary or the quad
    /// is not flippable.
    fn try_flip(&mut self, u: usize, v: usize) -> bool {
        let Some((t1, x)) = self.find_directed(u, v) else {
            return false;
        };
        let Some((t2, y)) = self.find_directed(v, u) else {
            return false;
        };
        let ox = orient2d(&self.uv[x], &self.uv[y], &self.uv[u]);
        let oy = orient2d(&self.uv[x], &self.uv[y], &self.uv[v]);
        if ox * oy >= 0 {
            return false;
        }
        self.tris[t1] = [u, y, x];
        self.tris[t2] = [y, v, x];
        true
    }

    /// Recover the edge (a, b) by flipping the edges that cross it.
    fn insert_constraint(&mut self, a: usize, b: usize) -> Result<()> {
        if a == b {
            return Ok(());
        }
        for _ in 0..MAX_FLIP_ROUNDS {
            if self.edge_exists(a, b) {
                return Ok(());
            }
            let crossing = self.edges_crossing(a, b);
            if crossing.is_empty() {
                return Err(MeshBooleanError::DegenerateGeometry(
                    "constraint edge unreachable in face triangulation".into(),
                ));
            }
            let mut flipped = false;
            for (u, v) in crossing {
                if self.try_flip(u, v) {
                    flipped = true;
                    break;
                }
            }
            if !flipped {
                return Err(MeshBooleanError::DegenerateGeometry(
                    "no flippable edge while recovering a constraint".into(),
                ));
            }
        }
        Err(MeshBooleanError::DegenerateGeometry(
            "constraint recovery did not terminate".into(),
        ))
    }

    fn into_triangles(self) -> Vec<[ExactPoint; 3]> {
        self.tris
            .iter()
            .map(|&[a, b, c]| {
                [
                    self.points[a].clone(),
                    self.points[b].clone(),
                    self.points[c].clone(),
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::predicates::orient2d;

    fn corners() -> [ExactPoint; 3] {
        [
            ExactPoint::from_integers(0, 0, 0),
            ExactPoint::from_integers(8, 0, 0),
            ExactPoint::from_integers(0, 8, 0),
        ]
    }

    fn all_ccw(result: &FaceTriangulation, base: &[ExactPoint; 3]) {
        let proj = PlaneProjection::for_triangle(base).unwrap();
        for t in &result.triangles {
            assert_eq!(
                orient2d(&proj.uv(&t[0]), &proj.uv(&t[1]), &proj.uv(&t[2])),
                1,
                "sub-triangle lost the face's winding"
            );
        }
    }

    fn has_edge(result: &FaceTriangulation, a: &ExactPoint, b: &ExactPoint) -> bool {
        result.triangles.iter().any(|t| {
            (0..3).any(|k| {
                (&t[k] == a && &t[(k + 1) % 3] == b) || (&t[k] == b && &t[(k + 1) % 3] == a)
            })
        })
    }

    #[test]
    fn test_untouched_face_is_returned_whole() {
        let c = corners();
        let r = retriangulate_face(&c, &[], &[]).unwrap();
        assert_eq!(r.triangles.len(), 1);
        assert!(r.constraints.is_empty());
    }

    #[test]
    fn test_interior_point_splits_into_three() {
        let c = corners();
        let p = ExactPoint::from_integers(1, 1, 0);
        let r = retriangulate_face(&c, &[p], &[]).unwrap();
        assert_eq!(r.triangles.len(), 3);
        all_ccw(&r, &c);
    }

    #[test]
    fn test_point_on_boundary_edge_splits_into_two() {
        let c = corners();
        let p = ExactPoint::from_integers(4, 0, 0);
        let r = retriangulate_face(&c, &[p], &[]).unwrap();
        assert_eq!(r.triangles.len(), 2);
        all_ccw(&r, &c);
    }

    #[test]
    fn test_corner_point_is_noop() {
        let c = corners();
        let r = retriangulate_face(&c, &[c[0].clone()], &[]).unwrap();
        assert_eq!(r.triangles.len(), 1);
    }

    #[test]
    fn test_constraint_segment_becomes_edges() {
        let c = corners();
        let a = ExactPoint::from_integers(1, 1, 0);
        let b = ExactPoint::from_integers(3, 3, 0);
        let r = retriangulate_face(&c, &[], &[(a.clone(), b.clone())]).unwrap();
        all_ccw(&r, &c);
        assert!(has_edge(&r, &a, &b));
    }

    #[test]
    fn test_crossing_constraints_are_split() {
        let c = corners();
        let s1 = (
            ExactPoint::from_integers(1, 1, 0),
            ExactPoint::from_integers(3, 3, 0),
        );
        let s2 = (
            ExactPoint::from_integers(1, 3, 0),
            ExactPoint::from_integers(3, 1, 0),
        );
        let r = retriangulate_face(&c, &[], &[s1, s2]).unwrap();
        all_ccw(&r, &c);
        // Four sub-segments meeting at the crossing (2, 2).
        assert_eq!(r.constraints.len(), 4);
        let x = ExactPoint::from_integers(2, 2, 0);
        for (a, b) in &r.constraints {
            assert!(a == &x || b == &x);
            assert!(has_edge(&r, a, b));
        }
    }

    #[test]
    fn test_collinear_overlapping_constraints() {
        let c = corners();
        let s1 = (
            ExactPoint::from_integers(1, 1, 0),
            ExactPoint::from_integers(4, 4, 0),
        );
        let s2 = (
            ExactPoint::from_integers(2, 2, 0),
            ExactPoint::from_integers(3, 3, 0),
        );
        let r = retriangulate_face(&c, &[], &[s1, s2]).unwrap();
        all_ccw(&r, &c);
        // Arrangement yields (1,1)-(2,2), (2,2)-(3,3), (3,3)-(4,4).
        assert_eq!(r.constraints.len(), 3);
    }

    #[test]
    fn test_deterministic_under_input_order() {
        let c = corners();
        let p1 = ExactPoint::from_integers(2, 1, 0);
        let p2 = ExactPoint::from_integers(1, 2, 0);
        let p3 = ExactPoint::from_integers(3, 3, 0);
        let fwd = retriangulate_face(&c, &[p1.clone(), p2.clone(), p3.clone()], &[]).unwrap();
        let rev = retriangulate_face(&c, &[p3, p2, p1], &[]).unwrap();
        let key = |r: &FaceTriangulation| {
            let mut ts: Vec<_> = r.triangles.iter().cloned().collect();
            ts.sort();
            ts
        };
        assert_eq!(key(&fwd), key(&rev));
    }

    #[test]
    fn test_point_outside_face_is_an_error() {
        let c = corners();
        let p = ExactPoint::from_integers(10, 10, 0);
        assert!(retriangulate_face(&c, &[p], &[]).is_err());
    }

    #[test]
    fn test_triangulation_covers_face() {
        // Areas of the pieces must add up to the whole face.
        let c = corners();
        let pts = vec![
            ExactPoint::from_integers(2, 2, 0),
            ExactPoint::from_integers(4, 1, 0),
            ExactPoint::from_integers(1, 4, 0),
        ];
        let seg = (
            ExactPoint::from_integers(2, 2, 0),
            ExactPoint::from_integers(4, 1, 0),
        );
        let r = retriangulate_face(&c, &pts, &[seg]).unwrap();
        let proj = PlaneProjection::for_triangle(&c).unwrap();
        let area2 = |t: &[ExactPoint; 3]| {
            crate::geometry::predicates::orient2d_value(
                &proj.uv(&t[0]),
                &proj.uv(&t[1]),
                &proj.uv(&t[2]),
            )
        };
        let total: num_rational::BigRational = r.triangles.iter().map(|t| area2(t)).sum();
        assert_eq!(total, area2(&c));
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Exact triangle-triangle intersection.
//!
//! Non-coplanar pairs intersect in nothing, a point, or a segment on the
//! line common to both planes; coplanar pairs overlap in a convex polygon
//! computed by clipping. Candidates are collected symmetrically from both
//! triangles, so swapping the arguments yields the same geometry.

use super::exact::{sign, ExactPoint};
use super::predicates::{
    orient2d_value, orient3d_value, segment_triangle_intersection, PlaneProjection,
    SegmentTriangle, Uv,
};
use crate::error::Result;
use num_rational::BigRational;
use num_traits::{One, Zero};

/// Intersection of two triangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriTriIntersection {
    Empty,
    /// Single shared point (a touching vertex or edge grazing a corner).
    Point(ExactPoint),
    /// Segment on the common line of the two supporting planes.
    Segment(ExactPoint, ExactPoint),
    /// Coplanar overlap: the convex clip polygon, in boundary order, with
    /// at least three vertices. Winding follows the second triangle.
    Coplanar(Vec<ExactPoint>),
}

/// Exact intersection of two non-degenerate triangles.
pub fn triangle_triangle_intersection(
    tri_a: &[ExactPoint; 3],
    tri_b: &[ExactPoint; 3],
) -> Result<TriTriIntersection> {
    let signs_b: Vec<i8> = tri_b
        .iter()
        .map(|p| sign(&orient3d_value(&tri_a[0], &tri_a[1], &tri_a[2], p)))
        .collect();

    if signs_b.iter().all(|&s| s == 0) {
        return coplanar_overlap(tri_a, tri_b);
    }
    if signs_b.iter().all(|&s| s > 0) || signs_b.iter().all(|&s| s < 0) {
        return Ok(TriTriIntersection::Empty);
    }
    let signs_a: Vec<i8> = tri_a
        .iter()
        .map(|p| sign(&orient3d_value(&tri_b[0], &tri_b[1], &tri_b[2], p)))
        .collect();
    if signs_a.iter().all(|&s| s > 0) || signs_a.iter().all(|&s| s < 0) {
        return Ok(TriTriIntersection::Empty);
    }

    // Every crossing point lies on the common line of the two planes, so
    // after deduplication the lexicographic extremes span the overlap.
    let mut points: Vec<ExactPoint> = Vec::new();
    collect_edge_crossings(tri_a, tri_b, &mut points)?;
    collect_edge_crossings(tri_b, tri_a, &mut points)?;
    points.sort();
    points.dedup();

    Ok(match points.len() {
        0 => TriTriIntersection::Empty,
        1 => TriTriIntersection::Point(points.pop().unwrap()),
        n => {
            let last = points[n - 1].clone();
            let first = points.swap_remove(0);
            TriTriIntersection::Segment(first, last)
        }
    })
}

/// Intersections of `source`'s edges with the triangle `target`.
fn collect_edge_crossings(
    source: &[ExactPoint; 3],
    target: &[ExactPoint; 3],
    out: &mut Vec<ExactPoint>,
) -> Result<()> {
    let proj = PlaneProjection::for_triangle(target)?;
    for i in 0..3 {
        let p = &source[i];
        let q = &source[(i + 1) % 3];
        match segment_triangle_intersection(p, q, target)? {
            SegmentTriangle::Point(hit) => out.push(hit),
            SegmentTriangle::Coplanar => {
                // The edge lies in the target's plane: its overlap with the
                // triangle is an interval, clipped in the projected frame.
                out.extend(clip_segment_to_triangle(p, q, target, &proj));
            }
            SegmentTriangle::None => {}
        }
    }
    Ok(())
}

/// Signed distance surrogate of `x` against the directed triangle edge
/// (i, i+1): positive inside for a CCW projection.
fn edge_value(tri_uv: &[Uv; 3], i: usize, x: &Uv) -> BigRational {
    orient2d_value(&tri_uv[i], &tri_uv[(i + 1) % 3], x)
}

/// Clip the coplanar segment (p, q) to a triangle; returns the endpoints of
/// the surviving interval (0, 1, or 2 points).
fn clip_segment_to_triangle(
    p: &ExactPoint,
    q: &ExactPoint,
    tri: &[ExactPoint; 3],
    proj: &PlaneProjection,
) -> Vec<ExactPoint> {
    let tri_uv = [proj.uv(&tri[0]), proj.uv(&tri[1]), proj.uv(&tri[2])];
    let (up, uq) = (proj.uv(p), proj.uv(q));

    // Interval clipping in the segment parameter. The edge value is affine
    // in t, so the crossing parameter is exact.
    let mut t0 = BigRational::zero();
    let mut t1 = BigRational::one();
    for i in 0..3 {
        let fp = edge_value(&tri_uv, i, &up);
        let fq = edge_value(&tri_uv, i, &uq);
        let (sp, sq) = (sign(&fp), sign(&fq));
        if sp < 0 && sq < 0 {
            return Vec::new();
        }
        if sp >= 0 && sq >= 0 {
            continue;
        }
        let t = &fp / (&fp - &fq);
        if sp < 0 {
            if t > t0 {
                t0 = t;
            }
        } else if t < t1 {
            t1 = t;
        }
    }
    if t0 > t1 {
        return Vec::new();
    }
    let a = p.lerp(q, &t0);
    if t0 == t1 {
        return vec![a];
    }
    vec![a, p.lerp(q, &t1)]
}

/// Overlap polygon of two coplanar triangles: clip `tri_b` against the
/// half-planes of `tri_a` (Sutherland-Hodgman with exact crossings).
fn coplanar_overlap(
    tri_a: &[ExactPoint; 3],
    tri_b: &[ExactPoint; 3],
) -> Result<TriTriIntersection> {
    let proj = PlaneProjection::for_triangle(tri_a)?;
    let tri_uv = [proj.uv(&tri_a[0]), proj.uv(&tri_a[1]), proj.uv(&tri_a[2])];

    let mut poly: Vec<ExactPoint> = tri_b.to_vec();
    // B may wind opposite to A in this projection; the clip below is
    // insensitive to its winding.
    for i in 0..3 {
        if poly.is_empty() {
            break;
        }
        let mut next: Vec<ExactPoint> = Vec::with_capacity(poly.len() + 1);
        for j in 0..poly.len() {
            let s = &poly[j];
            let e = &poly[(j + 1) % poly.len()];
            let fs = edge_value(&tri_uv, i, &proj.uv(s));
            let fe = edge_value(&tri_uv, i, &proj.uv(e));
            let (ss, se) = (sign(&fs), sign(&fe));
            if ss >= 0 {
                next.push(s.clone());
            }
            if (ss > 0 && se < 0) || (ss < 0 && se > 0) {
                let t = &fs / (&fs - &fe);
                next.push(s.lerp(e, &t));
            }
        }
        poly = next;
    }
    poly.dedup();
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }

    Ok(match poly.len() {
        0 => TriTriIntersection::Empty,
        1 => TriTriIntersection::Point(poly.pop().unwrap()),
        2 => {
            let b = poly.pop().unwrap();
            let a = poly.pop().unwrap();
            if a <= b {
                TriTriIntersection::Segment(a, b)
            } else {
                TriTriIntersection::Segment(b, a)
            }
        }
        _ => TriTriIntersection::Coplanar(poly),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(coords: [(i64, i64, i64); 3]) -> [ExactPoint; 3] {
        [
            ExactPoint::from_integers(coords[0].0, coords[0].1, coords[0].2),
            ExactPoint::from_integers(coords[1].0, coords[1].1, coords[1].2),
            ExactPoint::from_integers(coords[2].0, coords[2].1, coords[2].2),
        ]
    }

    #[test]
    fn test_disjoint_triangles() {
        let a = tri([(0, 0, 0), (2, 0, 0), (0, 2, 0)]);
        let b = tri([(0, 0, 5), (2, 0, 5), (0, 2, 5)]);
        assert_eq!(
            triangle_triangle_intersection(&a, &b).unwrap(),
            TriTriIntersection::Empty
        );
    }

    #[test]
    fn test_transversal_segment() {
        // b pierces a's plane; the crossing is the segment x in [1, 2], y=1.
        let a = tri([(0, 0, 0), (4, 0, 0), (0, 4, 0)]);
        let b = tri([(1, 1, -1), (1, 1, 1), (4, 1, 1)]);
        match triangle_triangle_intersection(&a, &b).unwrap() {
            TriTriIntersection::Segment(s, e) => {
                assert_eq!(s, ExactPoint::from_integers(1, 1, 0));
                assert!(e.x > s.x && e.y == s.y);
            }
            other => panic!("expected segment, got {other:?}"),
        }
    }

    #[test]
    fn test_symmetry_of_arguments() {
        let a = tri([(0, 0, 0), (4, 0, 0), (0, 4, 0)]);
        let b = tri([(1, 1, -1), (1, 1, 1), (4, 1, 1)]);
        let ab = triangle_triangle_intersection(&a, &b).unwrap();
        let ba = triangle_triangle_intersection(&b, &a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_touching_vertex_is_point() {
        let a = tri([(0, 0, 0), (2, 0, 0), (0, 2, 0)]);
        let b = tri([(0, 0, 0), (-2, 0, 2), (0, -2, 2)]);
        match triangle_triangle_intersection(&a, &b).unwrap() {
            TriTriIntersection::Point(p) => assert_eq!(p, ExactPoint::from_integers(0, 0, 0)),
            other => panic!("expected point, got {other:?}"),
        }
    }

    #[test]
    fn test_coplanar_identical_triangles() {
        let a = tri([(0, 0, 0), (4, 0, 0), (0, 4, 0)]);
        match triangle_triangle_intersection(&a, &a.clone()).unwrap() {
            TriTriIntersection::Coplanar(poly) => assert_eq!(poly.len(), 3),
            other => panic!("expected coplanar overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_coplanar_partial_overlap() {
        let a = tri([(0, 0, 0), (4, 0, 0), (0, 4, 0)]);
        let b = tri([(1, 1, 0), (5, 1, 0), (1, 5, 0)]);
        match triangle_triangle_intersection(&a, &b).unwrap() {
            TriTriIntersection::Coplanar(poly) => {
                assert!(poly.len() >= 3);
                // Every overlap vertex is inside or on a.
                let proj = PlaneProjection::for_triangle(&a).unwrap();
                for p in &poly {
                    assert_ne!(
                        super::super::predicates::locate_in_triangle(p, &a, &proj),
                        super::super::predicates::TriangleLocation::Outside
                    );
                }
            }
            other => panic!("expected coplanar overlap, got {other:?}"),
        }
    }

    #[test]
    fn test_coplanar_disjoint() {
        let a = tri([(0, 0, 0), (2, 0, 0), (0, 2, 0)]);
        let b = tri([(5, 5, 0), (7, 5, 0), (5, 7, 0)]);
        assert_eq!(
            triangle_triangle_intersection(&a, &b).unwrap(),
            TriTriIntersection::Empty
        );
    }

    #[test]
    fn test_shared_edge_is_segment() {
        // Two faces of a solid meeting at an edge, folded apart.
        let a = tri([(0, 0, 0), (2, 0, 0), (0, 2, 0)]);
        let b = tri([(0, 0, 0), (2, 0, 0), (0, 0, 2)]);
        match triangle_triangle_intersection(&a, &b).unwrap() {
            TriTriIntersection::Segment(s, e) => {
                assert_eq!(s, ExactPoint::from_integers(0, 0, 0));
                assert_eq!(e, ExactPoint::from_integers(2, 0, 0));
            }
            other => panic!("expected segment, got {other:?}"),
        }
    }
}

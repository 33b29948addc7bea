// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Exact geometric predicates.
//!
//! Every test here is decided by the sign of an exact rational determinant,
//! so there are no false positives or negatives and no epsilon tuning.
//! Degenerate configurations (zero-area triangles) are reported as errors
//! rather than answered arbitrarily.

use super::exact::{sign, ExactPoint};
use crate::error::{MeshBooleanError, Result};
use num_rational::BigRational;
use num_traits::Signed;

/// Side of the oriented plane (a, b, c) a query point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// On the side the plane normal (b-a) x (c-a) points to.
    Positive,
    /// On the opposite side.
    Negative,
    /// Exactly on the plane.
    Coplanar,
}

/// Signed value of the orientation determinant `((b-a) x (c-a)) . (d-a)`.
///
/// Six times the signed volume of the tetrahedron (a, b, c, d).
pub fn orient3d_value(
    a: &ExactPoint,
    b: &ExactPoint,
    c: &ExactPoint,
    d: &ExactPoint,
) -> BigRational {
    let ab = b - a;
    let ac = c - a;
    let ad = d - a;
    ab.cross(&ac).dot(&ad)
}

/// Orientation of `d` relative to the plane through (a, b, c).
pub fn orient3d(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint, d: &ExactPoint) -> Orientation {
    match sign(&orient3d_value(a, b, c, d)) {
        1 => Orientation::Positive,
        -1 => Orientation::Negative,
        _ => Orientation::Coplanar,
    }
}

/// A 2-D coordinate in a projected face plane.
pub type Uv = (BigRational, BigRational);

/// Signed value of the 2-D orientation determinant; positive means c is to
/// the left of the directed line a -> b.
pub fn orient2d_value(a: &Uv, b: &Uv, c: &Uv) -> BigRational {
    (&b.0 - &a.0) * (&c.1 - &a.1) - (&b.1 - &a.1) * (&c.0 - &a.0)
}

/// Sign of [`orient2d_value`]: -1, 0, or 1.
pub fn orient2d(a: &Uv, b: &Uv, c: &Uv) -> i8 {
    sign(&orient2d_value(a, b, c))
}

/// Orientation-preserving projection of a triangle's supporting plane
/// onto two coordinate axes.
///
/// The dominant axis of the exact normal is dropped, which keeps the
/// projected triangle non-degenerate; the two kept axes are ordered so
/// the projected triangle is counter-clockwise. All 2-D reasoning about
/// a face (point location, constraint insertion) happens in this frame.
#[derive(Debug, Clone, Copy)]
pub struct PlaneProjection {
    axis_u: usize,
    axis_v: usize,
}

fn coord(p: &ExactPoint, axis: usize) -> &BigRational {
    match axis {
        0 => &p.x,
        1 => &p.y,
        _ => &p.z,
    }
}

impl PlaneProjection {
    /// Projection for the plane of `tri`. Fails on zero-area triangles.
    pub fn for_triangle(tri: &[ExactPoint; 3]) -> Result<Self> {
        let normal = (&tri[1] - &tri[0]).cross(&(&tri[2] - &tri[0]));
        if normal.is_zero() {
            return Err(MeshBooleanError::DegenerateGeometry(
                "zero-area triangle has no supporting plane".into(),
            ));
        }
        let ax = normal.x.abs();
        let ay = normal.y.abs();
        let az = normal.z.abs();
        let (axis_u, axis_v) = if ax >= ay && ax >= az {
            (1, 2)
        } else if ay >= az {
            (2, 0)
        } else {
            (0, 1)
        };
        let mut proj = Self { axis_u, axis_v };
        let o = orient2d(&proj.uv(&tri[0]), &proj.uv(&tri[1]), &proj.uv(&tri[2]));
        if o < 0 {
            std::mem::swap(&mut proj.axis_u, &mut proj.axis_v);
        }
        Ok(proj)
    }

    pub fn uv(&self, p: &ExactPoint) -> Uv {
        (coord(p, self.axis_u).clone(), coord(p, self.axis_v).clone())
    }
}

/// Where a coplanar point sits relative to a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleLocation {
    Outside,
    /// Strictly inside the triangle.
    Interior,
    /// On an edge or at a vertex.
    Boundary,
}

/// Locate a point assumed coplanar with `tri` (projected via `proj`).
pub fn locate_in_triangle(
    p: &ExactPoint,
    tri: &[ExactPoint; 3],
    proj: &PlaneProjection,
) -> TriangleLocation {
    let up = proj.uv(p);
    let u0 = proj.uv(&tri[0]);
    let u1 = proj.uv(&tri[1]);
    let u2 = proj.uv(&tri[2]);
    let s0 = orient2d(&u0, &u1, &up);
    let s1 = orient2d(&u1, &u2, &up);
    let s2 = orient2d(&u2, &u0, &up);
    if s0 < 0 || s1 < 0 || s2 < 0 {
        TriangleLocation::Outside
    } else if s0 > 0 && s1 > 0 && s2 > 0 {
        TriangleLocation::Interior
    } else {
        TriangleLocation::Boundary
    }
}

/// Outcome of intersecting a segment with a triangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentTriangle {
    /// No intersection.
    None,
    /// Transversal intersection in a single point (inclusive of the
    /// triangle boundary and the segment endpoints).
    Point(ExactPoint),
    /// The segment lies in the triangle's plane; the overlap is one-
    /// dimensional and must be resolved by planar clipping.
    Coplanar,
}

/// Exact segment/triangle intersection.
pub fn segment_triangle_intersection(
    p: &ExactPoint,
    q: &ExactPoint,
    tri: &[ExactPoint; 3],
) -> Result<SegmentTriangle> {
    let proj = PlaneProjection::for_triangle(tri)?;
    let dp = orient3d_value(&tri[0], &tri[1], &tri[2], p);
    let dq = orient3d_value(&tri[0], &tri[1], &tri[2], q);
    let (sp, sq) = (sign(&dp), sign(&dq));

    if sp == 0 && sq == 0 {
        return Ok(SegmentTriangle::Coplanar);
    }
    if sp == sq {
        return Ok(SegmentTriangle::None);
    }
    let candidate = if sp == 0 {
        p.clone()
    } else if sq == 0 {
        q.clone()
    } else {
        // Endpoints straddle the plane: t in (0, 1) exactly.
        let t = &dp / (&dp - &dq);
        p.lerp(q, &t)
    };
    if locate_in_triangle(&candidate, tri, &proj) == TriangleLocation::Outside {
        Ok(SegmentTriangle::None)
    } else {
        Ok(SegmentTriangle::Point(candidate))
    }
}

/// Exact parameter of `p` along the segment (a, b), if `p` lies on its
/// supporting line. The caller checks the [0, 1] range as needed.
pub fn segment_parameter(a: &ExactPoint, b: &ExactPoint, p: &ExactPoint) -> Option<BigRational> {
    let d = b - a;
    let ap = p - a;
    if !ap.cross(&d).is_zero() {
        return None;
    }
    let len_sq = d.dot(&d);
    if num_traits::Zero::is_zero(&len_sq) {
        return None;
    }
    Some(ap.dot(&d) / len_sq)
}

/// True when `p` lies strictly between `a` and `b` on their segment.
pub fn strictly_between(a: &ExactPoint, b: &ExactPoint, p: &ExactPoint) -> bool {
    use num_traits::{One, Zero};
    match segment_parameter(a, b, p) {
        Some(t) => t > BigRational::zero() && t < BigRational::one(),
        None => false,
    }
}

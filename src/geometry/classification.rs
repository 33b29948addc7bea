// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Inside/outside classification of corefined faces.
//!
//! After corefinement no face crosses the other surface, so one exact test
//! at the centroid decides the whole face. Faces lying on the other surface
//! are detected first (a boundary patch); the rest are classified by exact
//! ray parity. A ray that hits an edge, a vertex, or a coplanar face is an
//! exactly detected degeneracy: the ray is abandoned and the next direction
//! in a fixed ladder is tried, so the answer is never a guess.

use super::bbox::BoundingBox;
use super::bvh::FaceBvh;
use super::exact::{sign, ExactPoint, ExactVector};
use super::mesh::Mesh;
use super::predicates::{locate_in_triangle, PlaneProjection, TriangleLocation};
use crate::error::{MeshBooleanError, Result};
use nalgebra::Point3;
use num_traits::{ToPrimitive, Zero};
use rayon::prelude::*;

/// Position of a corefined face relative to the other solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceClass {
    /// Strictly inside the other solid.
    Inside,
    /// Strictly outside the other solid.
    Outside,
    /// On the other surface, with matching orientation.
    BoundaryCoincident,
    /// On the other surface, with opposite orientation.
    BoundaryOpposite,
}

/// Fixed ladder of ray directions. The axis directions go first; the rest
/// have pairwise independent component ratios so no single plane or edge
/// can defeat them all.
const RAY_DIRECTIONS: [[i64; 3]; 9] = [
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
    [3, 1, 7],
    [1, 5, 2],
    [7, 3, 1],
    [2, 9, 5],
    [5, 2, 11],
    [11, 7, 3],
];

enum RayCast {
    Crossings(usize),
    /// The ray met an edge, vertex, or in-plane face.
    Degenerate,
}

/// Classify every face of `mesh` against the solid bounded by `other`.
/// Both meshes must already be corefined against each other.
pub fn classify_faces(mesh: &Mesh, other: &Mesh) -> Result<Vec<FaceClass>> {
    let bvh = FaceBvh::build(other);
    (0..mesh.face_count())
        .into_par_iter()
        .map(|fi| classify_face(mesh, fi, other, &bvh))
        .collect()
}

fn classify_face(mesh: &Mesh, fi: usize, other: &Mesh, bvh: &FaceBvh) -> Result<FaceClass> {
    let centroid = mesh.face_centroid(fi);

    if let Some(class) = on_surface_class(mesh, fi, &centroid, other, bvh)? {
        return Ok(class);
    }

    for dir in RAY_DIRECTIONS {
        let d = ExactVector::from_integers(dir[0], dir[1], dir[2]);
        match count_crossings(&centroid, &d, other, bvh)? {
            RayCast::Crossings(n) => {
                return Ok(if n % 2 == 1 {
                    FaceClass::Inside
                } else {
                    FaceClass::Outside
                });
            }
            RayCast::Degenerate => continue,
        }
    }
    Err(MeshBooleanError::ClassificationFailure(format!(
        "face {fi}: every ray direction met a degeneracy"
    )))
}

/// Boundary-patch test: is the centroid on the other surface? If so the
/// whole face coincides with a face of the other mesh, and the relative
/// normal orientation picks the class.
fn on_surface_class(
    mesh: &Mesh,
    fi: usize,
    centroid: &ExactPoint,
    other: &Mesh,
    bvh: &FaceBvh,
) -> Result<Option<FaceClass>> {
    let cf = centroid.to_f64();
    let probe = point_box(&cf);
    let mut candidates = bvh.query(&probe);
    candidates.sort_unstable();
    for fj in candidates {
        let tri = triangle_of(other, fj);
        let normal = (&tri[1] - &tri[0]).cross(&(&tri[2] - &tri[0]));
        if !normal.dot(&(centroid - &tri[0])).is_zero() {
            continue;
        }
        let proj = PlaneProjection::for_triangle(&tri)?;
        if locate_in_triangle(centroid, &tri, &proj) == TriangleLocation::Outside {
            continue;
        }
        let alignment = sign(&mesh.face_normal(fi).dot(&normal));
        return Ok(Some(if alignment >= 0 {
            FaceClass::BoundaryCoincident
        } else {
            FaceClass::BoundaryOpposite
        }));
    }
    Ok(None)
}

/// Exact parity count of the ray from `origin` along `dir` against the
/// faces of `other`.
fn count_crossings(
    origin: &ExactPoint,
    dir: &ExactVector,
    other: &Mesh,
    bvh: &FaceBvh,
) -> Result<RayCast> {
    let qbox = ray_box(&origin.to_f64(), dir, bvh.bounds());
    let mut candidates = bvh.query(&qbox);
    candidates.sort_unstable();

    let mut count = 0usize;
    for fj in candidates {
        let tri = triangle_of(other, fj);
        let normal = (&tri[1] - &tri[0]).cross(&(&tri[2] - &tri[0]));
        let denom = normal.dot(dir);
        let height = normal.dot(&(origin - &tri[0]));

        if denom.is_zero() {
            if height.is_zero() {
                // Ray runs inside the face's plane.
                return Ok(RayCast::Degenerate);
            }
            continue;
        }
        let t = -height / denom;
        let ts = sign(&t);
        if ts < 0 {
            continue;
        }
        let proj = PlaneProjection::for_triangle(&tri)?;
        if ts == 0 {
            // Origin sits in this plane; a surface contact here would have
            // been classified as a boundary patch already.
            if locate_in_triangle(origin, &tri, &proj) != TriangleLocation::Outside {
                return Ok(RayCast::Degenerate);
            }
            continue;
        }
        let hit = origin + &(dir * &t);
        match locate_in_triangle(&hit, &tri, &proj) {
            TriangleLocation::Outside => {}
            TriangleLocation::Interior => count += 1,
            TriangleLocation::Boundary => return Ok(RayCast::Degenerate),
        }
    }
    Ok(RayCast::Crossings(count))
}

fn triangle_of(mesh: &Mesh, fi: usize) -> [ExactPoint; 3] {
    let [p0, p1, p2] = mesh.face_points(fi);
    [p0.clone(), p1.clone(), p2.clone()]
}

fn point_box(p: &Point3<f64>) -> BoundingBox {
    let mut bb = BoundingBox::empty();
    bb.expand_to_include(p);
    pad(bb)
}

/// Box covering the ray from `origin` far enough to cross all of `bounds`.
fn ray_box(origin: &Point3<f64>, dir: &ExactVector, bounds: &BoundingBox) -> BoundingBox {
    let df = [
        dir.x.to_f64().unwrap_or(0.0),
        dir.y.to_f64().unwrap_or(0.0),
        dir.z.to_f64().unwrap_or(0.0),
    ];
    let len = (df[0] * df[0] + df[1] * df[1] + df[2] * df[2]).sqrt();
    let mut reach_sq = 0.0;
    for i in 0..3 {
        let d = (bounds.min[i] - origin[i])
            .abs()
            .max((bounds.max[i] - origin[i]).abs());
        reach_sq += d * d;
    }
    let reach = reach_sq.sqrt();
    let scale = if reach.is_finite() && len > 0.0 {
        reach / len * 1.001 + 1.0
    } else {
        1.0
    };
    let far = Point3::new(
        origin.x + df[0] * scale,
        origin.y + df[1] * scale,
        origin.z + df[2] * scale,
    );
    let mut bb = BoundingBox::empty();
    bb.expand_to_include(origin);
    bb.expand_to_include(&far);
    pad(bb)
}

fn pad(mut bb: BoundingBox) -> BoundingBox {
    let max_abs = (0..3)
        .map(|i| bb.min[i].abs().max(bb.max[i].abs()))
        .fold(0.0_f64, f64::max);
    let pad = 1e-9 * (1.0 + max_abs);
    for i in 0..3 {
        bb.min[i] -= pad;
        bb.max[i] += pad;
    }
    bb
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Boolean set operations on closed meshes.
//!
//! The pipeline is corefine, classify, select, stitch. Selection is a pure
//! table over (operation, origin, class). Coincident boundary patches exist
//! in both corefined meshes; the A-side copy is kept and the B-side copy
//! discarded, so the output stays manifold. The stitched result is
//! validated closed before it is returned.

use super::classification::{classify_faces, FaceClass};
use super::corefine::{corefine, Corefined};
use super::exact::ExactPoint;
use super::mesh::Mesh;
use crate::error::{MeshBooleanError, Result};
use std::collections::HashMap;
use std::fmt;

/// The three supported set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Intersection,
    /// A minus B.
    Difference,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOp::Union => write!(f, "union"),
            BooleanOp::Intersection => write!(f, "intersection"),
            BooleanOp::Difference => write!(f, "difference"),
        }
    }
}

/// Which corefined mesh a face came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceOrigin {
    FromA,
    FromB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeepDecision {
    Keep,
    /// Keep with reversed winding (difference turns B's skin inside out).
    KeepFlipped,
    Discard,
}

/// Selection table: which corefined faces appear in the output.
fn keep_face(op: BooleanOp, origin: FaceOrigin, class: FaceClass) -> KeepDecision {
    use BooleanOp::*;
    use FaceClass::*;
    use FaceOrigin::*;
    use KeepDecision::*;

    match (op, origin, class) {
        (Union, FromA, Outside) | (Union, FromA, BoundaryCoincident) => Keep,
        (Union, FromB, Outside) => Keep,

        (Intersection, FromA, Inside) | (Intersection, FromA, BoundaryCoincident) => Keep,
        (Intersection, FromB, Inside) => Keep,

        (Difference, FromA, Outside) | (Difference, FromA, BoundaryOpposite) => Keep,
        (Difference, FromB, Inside) => KeepFlipped,

        _ => Discard,
    }
}

/// Full boolean pipeline on two closed meshes.
pub fn boolean_operation(a: &Mesh, b: &Mesh, op: BooleanOp) -> Result<Mesh> {
    let corefined = corefine(a, b)?;
    combine(&corefined, op)
}

/// Classify and stitch two already-corefined meshes.
pub fn combine(corefined: &Corefined, op: BooleanOp) -> Result<Mesh> {
    let class_a = classify_faces(&corefined.mesh_a, &corefined.mesh_b)?;
    let class_b = classify_faces(&corefined.mesh_b, &corefined.mesh_a)?;

    let mut out = Mesh::new();
    let mut ids: HashMap<ExactPoint, usize> = HashMap::new();

    stitch(&mut out, &mut ids, &corefined.mesh_a, &class_a, op, FaceOrigin::FromA)?;
    stitch(&mut out, &mut ids, &corefined.mesh_b, &class_b, op, FaceOrigin::FromB)?;

    out.validate_closed().map_err(|e| {
        MeshBooleanError::ClassificationFailure(format!("stitched result is not closed: {e}"))
    })?;
    Ok(out)
}

fn stitch(
    out: &mut Mesh,
    ids: &mut HashMap<ExactPoint, usize>,
    source: &Mesh,
    classes: &[FaceClass],
    op: BooleanOp,
    origin: FaceOrigin,
) -> Result<()> {
    for (fi, &class) in classes.iter().enumerate() {
        let decision = keep_face(op, origin, class);
        if decision == KeepDecision::Discard {
            continue;
        }
        let [p0, p1, p2] = source.face_points(fi);
        let v0 = intern(out, ids, p0);
        let v1 = intern(out, ids, p1);
        let v2 = intern(out, ids, p2);
        match decision {
            KeepDecision::Keep => out.add_face([v0, v1, v2])?,
            KeepDecision::KeepFlipped => out.add_face([v0, v2, v1])?,
            KeepDecision::Discard => unreachable!(),
        };
    }
    Ok(())
}

fn intern(mesh: &mut Mesh, ids: &mut HashMap<ExactPoint, usize>, p: &ExactPoint) -> usize {
    if let Some(&id) = ids.get(p) {
        return id;
    }
    let id = mesh.add_vertex(p.clone());
    ids.insert(p.clone(), id);
    id
}

/// Union of the two solids.
pub fn corefine_and_compute_union(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    boolean_operation(a, b, BooleanOp::Union)
}

/// Intersection of the two solids.
pub fn corefine_and_compute_intersection(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    boolean_operation(a, b, BooleanOp::Intersection)
}

/// The first solid minus the second.
pub fn corefine_and_compute_difference(a: &Mesh, b: &Mesh) -> Result<Mesh> {
    boolean_operation(a, b, BooleanOp::Difference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analytics::signed_volume;
    use crate::geometry::primitives::cuboid;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    fn cube(min: (i64, i64, i64), max: (i64, i64, i64)) -> Mesh {
        cuboid(
            ExactPoint::from_integers(min.0, min.1, min.2),
            ExactPoint::from_integers(max.0, max.1, max.2),
        )
        .unwrap()
    }

    fn vol(n: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn test_selection_table_collapses_duplicate_boundary() {
        // Only the A-side copy of a coincident patch survives.
        assert_eq!(
            keep_face(BooleanOp::Union, FaceOrigin::FromA, FaceClass::BoundaryCoincident),
            KeepDecision::Keep
        );
        assert_eq!(
            keep_face(BooleanOp::Union, FaceOrigin::FromB, FaceClass::BoundaryCoincident),
            KeepDecision::Discard
        );
        assert_eq!(
            keep_face(BooleanOp::Difference, FaceOrigin::FromB, FaceClass::Inside),
            KeepDecision::KeepFlipped
        );
    }

    #[test]
    fn test_union_of_disjoint_cubes_keeps_both() {
        let a = cube((0, 0, 0), (1, 1, 1));
        let b = cube((3, 0, 0), (4, 1, 1));
        let u = corefine_and_compute_union(&a, &b).unwrap();
        u.validate_closed().unwrap();
        assert_eq!(signed_volume(&u), vol(2));
        assert_eq!(u.face_count(), 24);
    }

    #[test]
    fn test_intersection_of_disjoint_cubes_is_empty() {
        let a = cube((0, 0, 0), (1, 1, 1));
        let b = cube((3, 0, 0), (4, 1, 1));
        let i = corefine_and_compute_intersection(&a, &b).unwrap();
        assert!(i.is_empty());
    }

    #[test]
    fn test_difference_with_self_is_empty() {
        let a = cube((0, 0, 0), (2, 2, 2));
        let d = corefine_and_compute_difference(&a, &a.clone()).unwrap();
        assert!(d.is_empty());
        assert_eq!(signed_volume(&d), vol(0));
    }

    #[test]
    fn test_union_with_self_is_identity() {
        let a = cube((0, 0, 0), (2, 2, 2));
        let u = corefine_and_compute_union(&a, &a.clone()).unwrap();
        u.validate_closed().unwrap();
        assert_eq!(u.canonical_faces(), a.canonical_faces());
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! End-to-end boolean tests on cube pairs, asserting exact volumes.

use corefine::geometry::analytics::signed_volume;
use corefine::geometry::primitives::cuboid;
use corefine::geometry::ExactPoint;
use corefine::{
    boolean_operation, corefine_and_compute_difference, corefine_and_compute_intersection,
    corefine_and_compute_union, BooleanOp, Mesh,
};
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
fn test_half_overlap_cubes_have_exact_volumes() {
    // Two 2x2x2 cubes overlapping in a 1x1x1 corner cube.
    let a = cube((0, 0, 0), (2, 2, 2));
    let b = cube((1, 1, 1), (3, 3, 3));

    let union = corefine_and_compute_union(&a, &b).unwrap();
    let inter = corefine_and_compute_intersection(&a, &b).unwrap();
    let diff = corefine_and_compute_difference(&a, &b).unwrap();

    union.validate_closed().unwrap();
    inter.validate_closed().unwrap();
    diff.validate_closed().unwrap();

    assert_eq!(signed_volume(&union), vol(15));
    assert_eq!(signed_volume(&inter), vol(1));
    assert_eq!(signed_volume(&diff), vol(7));
}

#[test]
fn test_volume_inclusion_exclusion_is_exact() {
    let a = cube((0, 0, 0), (2, 2, 2));
    let b = cube((1, 1, 1), (3, 3, 3));
    let union = corefine_and_compute_union(&a, &b).unwrap();
    let inter = corefine_and_compute_intersection(&a, &b).unwrap();
    assert_eq!(
        signed_volume(&a) + signed_volume(&b),
        signed_volume(&union) + signed_volume(&inter)
    );
}

#[test]
fn test_union_and_intersection_commute() {
    let a = cube((0, 0, 0), (2, 2, 2));
    let b = cube((1, 1, 1), (3, 3, 3));

    let u_ab = boolean_operation(&a, &b, BooleanOp::Union).unwrap();
    let u_ba = boolean_operation(&b, &a, BooleanOp::Union).unwrap();
    assert_eq!(u_ab.canonical_faces(), u_ba.canonical_faces());

    let i_ab = boolean_operation(&a, &b, BooleanOp::Intersection).unwrap();
    let i_ba = boolean_operation(&b, &a, BooleanOp::Intersection).unwrap();
    assert_eq!(i_ab.canonical_faces(), i_ba.canonical_faces());
}

#[test]
fn test_disjoint_cubes() {
    let a = cube((0, 0, 0), (1, 1, 1));
    let b = cube((3, 3, 3), (4, 4, 4));

    let union = corefine_and_compute_union(&a, &b).unwrap();
    union.validate_closed().unwrap();
    assert_eq!(signed_volume(&union), vol(2));
    assert_eq!(union.face_count(), a.face_count() + b.face_count());

    let inter = corefine_and_compute_intersection(&a, &b).unwrap();
    assert!(inter.is_empty());

    let diff = corefine_and_compute_difference(&a, &b).unwrap();
    assert_eq!(diff.canonical_faces(), a.canonical_faces());
}

#[test]
fn test_contained_cube() {
    let outer = cube((0, 0, 0), (4, 4, 4));
    let inner = cube((1, 1, 1), (2, 2, 2));

    let union = corefine_and_compute_union(&outer, &inner).unwrap();
    assert_eq!(union.canonical_faces(), outer.canonical_faces());

    let inter = corefine_and_compute_intersection(&outer, &inner).unwrap();
    assert_eq!(inter.canonical_faces(), inner.canonical_faces());

    // Hollowing: the shell keeps the outer skin and the inverted inner skin.
    let shell = corefine_and_compute_difference(&outer, &inner).unwrap();
    shell.validate_closed().unwrap();
    assert_eq!(signed_volume(&shell), vol(63));
    assert_eq!(shell.face_count(), outer.face_count() + inner.face_count());

    // The cavity swallows the inner solid completely.
    let nothing = corefine_and_compute_difference(&inner, &outer).unwrap();
    assert!(nothing.is_empty());
}

#[test]
fn test_boolean_with_self() {
    let a = cube((0, 0, 0), (2, 2, 2));

    let union = corefine_and_compute_union(&a, &a.clone()).unwrap();
    assert_eq!(union.canonical_faces(), a.canonical_faces());

    let inter = corefine_and_compute_intersection(&a, &a.clone()).unwrap();
    assert_eq!(inter.canonical_faces(), a.canonical_faces());

    let diff = corefine_and_compute_difference(&a, &a.clone()).unwrap();
    assert!(diff.is_empty());
    assert_eq!(signed_volume(&diff), vol(0));
}

#[test]
fn test_cubes_sharing_a_wall() {
    // Touching along the plane x = 1; the shared wall must vanish in the
    // union and the intersection has no volume.
    let a = cube((0, 0, 0), (1, 1, 1));
    let b = cube((1, 0, 0), (2, 1, 1));

    let union = corefine_and_compute_union(&a, &b).unwrap();
    union.validate_closed().unwrap();
    assert_eq!(signed_volume(&union), vol(2));

    let inter = corefine_and_compute_intersection(&a, &b).unwrap();
    assert!(inter.is_empty());

    let diff = corefine_and_compute_difference(&a, &b).unwrap();
    assert_eq!(diff.canonical_faces(), a.canonical_faces());
}

#[test]
fn test_edge_through_face_overlap() {
    // B is shifted so its edge runs across A's top face.
    let a = cube((0, 0, 0), (4, 4, 4));
    let b = cube((2, 2, 2), (6, 6, 6));

    let union = corefine_and_compute_union(&a, &b).unwrap();
    let inter = corefine_and_compute_intersection(&a, &b).unwrap();
    let diff = corefine_and_compute_difference(&a, &b).unwrap();

    union.validate_closed().unwrap();
    inter.validate_closed().unwrap();
    diff.validate_closed().unwrap();

    assert_eq!(signed_volume(&inter), vol(8));
    assert_eq!(signed_volume(&union), vol(120));
    assert_eq!(signed_volume(&diff), vol(56));
}

#[test]
fn test_invalid_input_is_rejected() {
    let a = cube((0, 0, 0), (1, 1, 1));
    let mut open = a.clone();
    open.remove_face(0);

    assert!(boolean_operation(&a, &open, BooleanOp::Union).is_err());
    assert!(boolean_operation(&open, &a, BooleanOp::Union).is_err());
    assert!(boolean_operation(&a, &Mesh::new(), BooleanOp::Union).is_err());
}

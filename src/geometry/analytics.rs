// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Mesh statistics: volume, surface area, bounding box, watertightness.
//!
//! The signed volume is computed exactly over the rational coordinates, so
//! set-theoretic identities like inclusion-exclusion can be asserted as
//! exact equalities in tests; the serialized report rounds to `f64`.

use super::bbox::BoundingBox;
use super::mesh::Mesh;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// Summary statistics of a mesh, serializable for the `check` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic units (meaningful when watertight).
    pub volume: f64,
    /// Total surface area in square units.
    pub surface_area: f64,
    /// Bounding box as [min_x, min_y, min_z, max_x, max_y, max_z].
    pub bbox: [f64; 6],
    pub vertex_count: usize,
    pub face_count: usize,
    pub is_watertight: bool,
}

/// Exact signed volume of the solid bounded by `mesh`.
///
/// Sum of signed tetrahedron volumes against the origin; positive when the
/// faces wind counter-clockwise seen from outside.
pub fn signed_volume(mesh: &Mesh) -> BigRational {
    let mut six_v = BigRational::zero();
    for fi in 0..mesh.face_count() {
        let [p0, p1, p2] = mesh.face_points(fi);
        six_v += p0.to_vector().dot(&p1.to_vector().cross(&p2.to_vector()));
    }
    six_v / BigRational::from_integer(BigInt::from(6))
}

/// Surface area in `f64`, from the exact face normals.
pub fn surface_area(mesh: &Mesh) -> f64 {
    (0..mesh.face_count())
        .map(|fi| {
            let n = mesh.face_normal(fi);
            let len_sq = n.dot(&n).to_f64().unwrap_or(f64::NAN);
            0.5 * len_sq.sqrt()
        })
        .sum()
}

/// Bounding box of all vertices.
pub fn bounding_box(mesh: &Mesh) -> BoundingBox {
    let mut bb = BoundingBox::empty();
    for v in &mesh.vertices {
        bb.expand_to_include(&v.to_f64());
    }
    bb
}

/// Full statistics report for a mesh.
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    let bb = bounding_box(mesh);
    GeometryStats {
        volume: signed_volume(mesh).to_f64().unwrap_or(f64::NAN),
        surface_area: surface_area(mesh),
        bbox: [bb.min.x, bb.min.y, bb.min.z, bb.max.x, bb.max.y, bb.max.z],
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        is_watertight: mesh.validate_closed().is_ok(),
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Geometry: exact kernel, mesh representation, corefinement, and booleans.

pub mod analytics;
pub mod bbox;
pub mod boolean;
pub mod bvh;
pub mod classification;
pub mod corefine;
pub mod exact;
pub mod mesh;
pub mod predicates;
pub mod primitives;
pub mod retriangulate;
pub mod triangle_intersection;

pub use bbox::BoundingBox;
pub use boolean::{
    boolean_operation, corefine_and_compute_difference, corefine_and_compute_intersection,
    corefine_and_compute_union, BooleanOp,
};
pub use classification::{classify_faces, FaceClass};
pub use corefine::{corefine, Corefined};
pub use exact::{ExactPoint, ExactVector};
pub use mesh::{Face, Mesh};
pub use predicates::{orient3d, Orientation};

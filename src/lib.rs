// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Corefine
//!
//! Exact boolean operations (union, intersection, difference) on closed
//! triangle meshes via corefinement. All geometric decisions use arbitrary-
//! precision rational arithmetic, so there are no epsilons and no
//! coordinate-dependent failures: the result is a valid closed mesh or a
//! typed error, never a silently broken one.

pub mod error;
pub mod geometry;
pub mod io;

pub use error::{MeshBooleanError, Result};
pub use geometry::{
    boolean_operation, corefine, corefine_and_compute_difference,
    corefine_and_compute_intersection, corefine_and_compute_union, BooleanOp, Corefined, Mesh,
};

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Error types for the corefine kernel.

use thiserror::Error;

/// Top-level error type for mesh boolean operations.
///
/// The kernel never recovers from geometric trouble by heuristic smoothing:
/// degeneracies and invalid inputs propagate up as typed failures and the
/// caller either gets a valid closed mesh or an error, never a partial one.
#[derive(Debug, Error)]
pub enum MeshBooleanError {
    /// An input mesh violates a precondition: empty, open, non-manifold,
    /// or containing degenerate/duplicate faces.
    #[error("invalid input mesh: {0}")]
    InvalidInputMesh(String),

    /// A geometric configuration the exact predicates cannot classify,
    /// e.g. a zero-area triangle handed to a plane construction.
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Inside/outside classification or the final stitch produced an
    /// inconsistent result (non-manifold output, unresolvable ray cast).
    #[error("classification failed: {0}")]
    ClassificationFailure(String),

    /// A mesh file could not be parsed.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// Underlying I/O failure while reading or writing a mesh file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MeshBooleanError>;

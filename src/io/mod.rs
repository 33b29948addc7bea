// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Mesh file I/O: OFF, OBJ, and STL, dispatched on the file extension.
//!
//! Readers convert float coordinates to exact rationals losslessly (every
//! finite float is a rational); writers round back to floats.

mod obj;
mod off;
mod stl;

pub use obj::{read_obj, write_obj};
pub use off::{read_off, write_off};
pub use stl::{read_stl_mesh, write_stl_mesh};

use crate::error::{MeshBooleanError, Result};
use crate::geometry::Mesh;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Off,
    Obj,
    Stl,
}

impl MeshFormat {
    /// Format implied by a file's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "off" => Ok(MeshFormat::Off),
            "obj" => Ok(MeshFormat::Obj),
            "stl" => Ok(MeshFormat::Stl),
            other => Err(MeshBooleanError::Parse {
                path: path.display().to_string(),
                message: format!("unsupported mesh format {other:?} (expected off, obj, or stl)"),
            }),
        }
    }
}

/// Read a mesh, picking the parser from the extension.
pub fn read_mesh(path: &Path) -> Result<Mesh> {
    match MeshFormat::from_path(path)? {
        MeshFormat::Off => read_off(path),
        MeshFormat::Obj => read_obj(path),
        MeshFormat::Stl => read_stl_mesh(path),
    }
}

/// Write a mesh, picking the writer from the extension.
pub fn write_mesh(path: &Path, mesh: &Mesh) -> Result<()> {
    match MeshFormat::from_path(path)? {
        MeshFormat::Off => write_off(path, mesh),
        MeshFormat::Obj => write_obj(path, mesh),
        MeshFormat::Stl => write_stl_mesh(path, mesh),
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Wavefront OBJ reader and writer (triangle subset).
//!
//! Only `v` and `f` records are interpreted; normals, texture coordinates,
//! groups, and materials are ignored. Face indices may carry `/`-separated
//! attributes and may be negative (relative); polygonal faces are rejected.

use crate::error::{MeshBooleanError, Result};
use crate::geometry::{ExactPoint, Mesh};
use std::fs;
use std::io::Write;
use std::path::Path;

fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> MeshBooleanError {
    MeshBooleanError::Parse {
        path: path.display().to_string(),
        message: format!("line {}: {}", line + 1, message.into()),
    }
}

pub fn read_obj(path: &Path) -> Result<Mesh> {
    let content = fs::read_to_string(path)?;
    let mut mesh = Mesh::new();

    for (ln, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coord = |axis: &str| -> Result<f64> {
                    tokens
                        .next()
                        .and_then(|t| t.parse().ok())
                        .ok_or_else(|| parse_error(path, ln, format!("bad {axis} coordinate")))
                };
                let (x, y, z) = (coord("x")?, coord("y")?, coord("z")?);
                mesh.add_vertex(ExactPoint::from_f64(x, y, z)?);
            }
            Some("f") => {
                let refs: Vec<&str> = tokens.collect();
                if refs.len() != 3 {
                    return Err(parse_error(
                        path,
                        ln,
                        format!(
                            "face has {} vertices; only triangles are supported",
                            refs.len()
                        ),
                    ));
                }
                let mut face = [0usize; 3];
                for (k, r) in refs.iter().enumerate() {
                    face[k] = resolve_index(r, mesh.vertex_count())
                        .ok_or_else(|| parse_error(path, ln, format!("bad face index {r:?}")))?;
                }
                mesh.add_face(face)?;
            }
            // vn, vt, g, o, s, usemtl, mtllib and anything else: skipped.
            _ => {}
        }
    }
    Ok(mesh)
}

/// OBJ indices are 1-based; negative indices count back from the vertices
/// seen so far. Attribute suffixes (`1/2/3`) are stripped.
fn resolve_index(token: &str, vertex_count: usize) -> Option<usize> {
    let first = token.split('/').next()?;
    let idx: i64 = first.parse().ok()?;
    if idx > 0 {
        let i = (idx - 1) as usize;
        (i < vertex_count).then_some(i)
    } else if idx < 0 {
        let back = (-idx) as usize;
        vertex_count.checked_sub(back)
    } else {
        None
    }
}

pub fn write_obj(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut out = String::new();
    for v in &mesh.vertices {
        let p = v.to_f64();
        out.push_str(&format!("v {} {} {}\n", p.x, p.y, p.z));
    }
    for f in &mesh.faces {
        let [a, b, c] = f.vertices;
        out.push_str(&format!("f {} {} {}\n", a + 1, b + 1, c + 1));
    }
    let mut file = fs::File::create(path)?;
    file.write_all(out.as_bytes())?;
    Ok(())
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! OFF reader and writer (triangle subset).
//!
//! Only the vertex/face-list core of the format is supported: an `OFF`
//! header, counts, float vertex lines, and `3 i j k` face lines. Comments
//! and blank lines are tolerated; polygonal faces are rejected.

use crate::error::{MeshBooleanError, Result};
use crate::geometry::{ExactPoint, Mesh};
use std::fs;
use std::io::Write;
use std::path::Path;

fn parse_error(path: &Path, message: impl Into<String>) -> MeshBooleanError {
    MeshBooleanError::Parse {
        path: path.display().to_string(),
        message: message.into(),
    }
}

pub fn read_off(path: &Path) -> Result<Mesh> {
    let content = fs::read_to_string(path)?;
    let mut tokens = content
        .lines()
        .map(|l| l.split('#').next().unwrap_or(""))
        .flat_map(|l| l.split_whitespace());

    match tokens.next() {
        Some(t) if t.eq_ignore_ascii_case("OFF") => {}
        _ => return Err(parse_error(path, "missing OFF header")),
    }
    let mut count = |name: &str| -> Result<usize> {
        tokens
            .next()
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| parse_error(path, format!("missing or invalid {name} count")))
    };
    let nv = count("vertex")?;
    let nf = count("face")?;
    let _ne = count("edge")?;

    let mut mesh = Mesh::with_capacity(nv, nf);
    for i in 0..nv {
        let mut coord = |axis: &str| -> Result<f64> {
            tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| parse_error(path, format!("vertex {i}: bad {axis} coordinate")))
        };
        let (x, y, z) = (coord("x")?, coord("y")?, coord("z")?);
        mesh.add_vertex(ExactPoint::from_f64(x, y, z)?);
    }
    for i in 0..nf {
        let mut index = |what: &str| -> Result<usize> {
            tokens
                .next()
                .and_then(|t| t.parse().ok())
                .ok_or_else(|| parse_error(path, format!("face {i}: bad {what}")))
        };
        let arity = index("vertex count")?;
        if arity != 3 {
            return Err(parse_error(
                path,
                format!("face {i} has {arity} vertices; only triangles are supported"),
            ));
        }
        let face = [index("index")?, index("index")?, index("index")?];
        mesh.add_face(face)?;
    }
    Ok(mesh)
}

pub fn write_off(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut out = String::new();
    out.push_str("OFF\n");
    out.push_str(&format!(
        "{} {} 0\n",
        mesh.vertex_count(),
        mesh.face_count()
    ));
    for v in &mesh.vertices {
        let p = v.to_f64();
        out.push_str(&format!("{} {} {}\n", p.x, p.y, p.z));
    }
    for f in &mesh.faces {
        let [a, b, c] = f.vertices;
        out.push_str(&format!("3 {a} {b} {c}\n"));
    }
    let mut file = fs::File::create(path)?;
    file.write_all(out.as_bytes())?;
    Ok(())
}

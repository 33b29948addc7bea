// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! STL reading and writing via the `stl_io` crate.
//!
//! STL stores single-precision coordinates, so a round trip through STL is
//! lossy; exactness holds only within one run. `stl_io` merges identical
//! vertices on read, which recovers the indexed structure the kernel needs.

use crate::error::{MeshBooleanError, Result};
use crate::geometry::{ExactPoint, Mesh};
use std::fs::File;
use std::path::Path;

pub fn read_stl_mesh(path: &Path) -> Result<Mesh> {
    let mut file = File::open(path)?;
    let indexed = stl_io::read_stl(&mut file).map_err(|e| MeshBooleanError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mut mesh = Mesh::with_capacity(indexed.vertices.len(), indexed.faces.len());
    for v in &indexed.vertices {
        mesh.add_vertex(ExactPoint::from_f64(
            v[0] as f64,
            v[1] as f64,
            v[2] as f64,
        )?);
    }
    for tri in &indexed.faces {
        mesh.add_face(tri.vertices)?;
    }
    Ok(mesh)
}

pub fn write_stl_mesh(path: &Path, mesh: &Mesh) -> Result<()> {
    let mut triangles = Vec::with_capacity(mesh.face_count());
    for fi in 0..mesh.face_count() {
        let [p0, p1, p2] = mesh.face_points(fi);
        let (a, b, c) = (p0.to_f64(), p1.to_f64(), p2.to_f64());
        let n = (b - a).cross(&(c - a));
        let n = if n.norm() > 0.0 {
            n.normalize()
        } else {
            nalgebra::Vector3::zeros()
        };
        triangles.push(stl_io::Triangle {
            normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: [
                stl_io::Vertex::new([a.x as f32, a.y as f32, a.z as f32]),
                stl_io::Vertex::new([b.x as f32, b.y as f32, b.z as f32]),
                stl_io::Vertex::new([c.x as f32, c.y as f32, c.z as f32]),
            ],
        });
    }
    let mut file = File::create(path)?;
    stl_io::write_stl(&mut file, triangles.iter())?;
    Ok(())
}

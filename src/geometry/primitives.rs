// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Simple closed-mesh constructors, used by tests and examples.

use super::exact::ExactPoint;
use super::mesh::Mesh;
use crate::error::{MeshBooleanError, Result};

/// Axis-aligned box between two opposite corners, triangulated into 12
/// faces with outward counter-clockwise winding.
pub fn cuboid(min: ExactPoint, max: ExactPoint) -> Result<Mesh> {
    if min.x >= max.x || min.y >= max.y || min.z >= max.z {
        return Err(MeshBooleanError::DegenerateGeometry(format!(
            "cuboid corners must satisfy min < max per axis, got {min:?}, {max:?}"
        )));
    }
    let mut mesh = Mesh::with_capacity(8, 12);
    // Bottom ring then top ring, counter-clockwise seen from above.
    let corners = [
        ExactPoint::new(min.x.clone(), min.y.clone(), min.z.clone()),
        ExactPoint::new(max.x.clone(), min.y.clone(), min.z.clone()),
        ExactPoint::new(max.x.clone(), max.y.clone(), min.z.clone()),
        ExactPoint::new(min.x.clone(), max.y.clone(), min.z.clone()),
        ExactPoint::new(min.x.clone(), min.y.clone(), max.z.clone()),
        ExactPoint::new(max.x.clone(), min.y.clone(), max.z.clone()),
        ExactPoint::new(max.x.clone(), max.y.clone(), max.z.clone()),
        ExactPoint::new(min.x.clone(), max.y.clone(), max.z.clone()),
    ];
    for c in corners {
        mesh.add_vertex(c);
    }
    let faces: [[usize; 3]; 12] = [
        [0, 3, 2], // bottom (z = min)
        [0, 2, 1],
        [4, 5, 6], // top (z = max)
        [4, 6, 7],
        [0, 1, 5], // front (y = min)
        [0, 5, 4],
        [2, 3, 7], // back (y = max)
        [2, 7, 6],
        [0, 4, 7], // left (x = min)
        [0, 7, 3],
        [1, 2, 6], // right (x = max)
        [1, 6, 5],
    ];
    for f in faces {
        mesh.add_face(f)?;
    }
    Ok(mesh)
}

/// Cuboid from `f64` corners. Coordinates must be finite.
pub fn cuboid_f64(min: [f64; 3], max: [f64; 3]) -> Result<Mesh> {
    cuboid(
        ExactPoint::from_f64(min[0], min[1], min[2])?,
        ExactPoint::from_f64(max[0], max[1], max[2])?,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::analytics::signed_volume;
    use num_bigint::BigInt;
    use num_rational::BigRational;

    #[test]
    fn test_cuboid_is_closed_with_positive_volume() {
        let m = cuboid(
            ExactPoint::from_integers(0, 0, 0),
            ExactPoint::from_integers(2, 3, 5),
        )
        .unwrap();
        m.validate_closed().unwrap();
        assert_eq!(
            signed_volume(&m),
            BigRational::from_integer(BigInt::from(30))
        );
    }

    #[test]
    fn test_degenerate_cuboid_rejected() {
        assert!(cuboid(
            ExactPoint::from_integers(0, 0, 0),
            ExactPoint::from_integers(0, 1, 1),
        )
        .is_err());
    }
}

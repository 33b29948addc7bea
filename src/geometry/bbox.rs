// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Axis-aligned bounding boxes in `f64`.
//!
//! Boxes are only a filter: candidate face pairs come from conservative,
//! padded boxes around exact triangles, and every surviving pair is decided
//! by the exact predicates. A box may therefore be slightly too large but
//! never too small.

use super::exact::ExactPoint;
use nalgebra::Point3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// An empty box that expands to fit the first point added.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn expand_to_include(&mut self, p: &Point3<f64>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }

    /// Conservative box around an exact triangle.
    ///
    /// Rounding the rational coordinates to `f64` can move them by up to
    /// half an ulp in either direction, so the box is padded relative to
    /// the largest coordinate magnitude it contains.
    pub fn from_exact_triangle(tri: &[&ExactPoint; 3]) -> Self {
        let mut bb = Self::empty();
        for p in tri {
            bb.expand_to_include(&p.to_f64());
        }
        let max_abs = (0..3)
            .map(|i| bb.min[i].abs().max(bb.max[i].abs()))
            .fold(0.0_f64, f64::max);
        let pad = 1e-9 * (1.0 + max_abs);
        for i in 0..3 {
            bb.min[i] -= pad;
            bb.max[i] += pad;
        }
        bb
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        out.expand_to_include(&other.min);
        out.expand_to_include(&other.max);
        out
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && self.max[i] >= other.min[i])
    }

    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        ]
    }

    /// Index of the longest axis, used by the BVH splitter.
    pub fn longest_axis(&self) -> usize {
        let s = self.size();
        if s[0] >= s[1] && s[0] >= s[2] {
            0
        } else if s[1] >= s[2] {
            1
        } else {
            2
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Corefine Developers

//! Exact-arithmetic point and vector types.
//!
//! All coordinates are arbitrary-precision rationals, so equality and
//! ordering are exact and the predicates built on top of them never
//! disagree across calls. Conversion from `f64` is lossless (every finite
//! float is a rational); conversion back to `f64` rounds and is reserved
//! for I/O and spatial-index bounding boxes.

use crate::error::{MeshBooleanError, Result};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use std::ops::{Add, Mul, Neg, Sub};

/// A point in 3-space with exact rational coordinates.
///
/// `Ord` is lexicographic on (x, y, z) and is the tie-break rule used
/// everywhere a deterministic ordering of geometrically produced points
/// is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExactPoint {
    pub x: BigRational,
    pub y: BigRational,
    pub z: BigRational,
}

/// A displacement in 3-space with exact rational coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactVector {
    pub x: BigRational,
    pub y: BigRational,
    pub z: BigRational,
}

impl ExactPoint {
    pub fn new(x: BigRational, y: BigRational, z: BigRational) -> Self {
        Self { x, y, z }
    }

    /// Build a point from finite floats. NaN or infinity is rejected.
    pub fn from_f64(x: f64, y: f64, z: f64) -> Result<Self> {
        let conv = |v: f64| {
            BigRational::from_float(v).ok_or_else(|| {
                MeshBooleanError::DegenerateGeometry(format!("non-finite coordinate {v}"))
            })
        };
        Ok(Self::new(conv(x)?, conv(y)?, conv(z)?))
    }

    /// Build a point from integer coordinates.
    pub fn from_integers(x: i64, y: i64, z: i64) -> Self {
        let conv = |v: i64| BigRational::from_integer(BigInt::from(v));
        Self::new(conv(x), conv(y), conv(z))
    }

    /// Rounded `f64` approximation, for bounding boxes and file output.
    pub fn to_f64(&self) -> nalgebra::Point3<f64> {
        let conv = |v: &BigRational| v.to_f64().unwrap_or(f64::NAN);
        nalgebra::Point3::new(conv(&self.x), conv(&self.y), conv(&self.z))
    }

    /// Point at parameter `t` along the segment from `self` to `other`.
    pub fn lerp(&self, other: &ExactPoint, t: &BigRational) -> ExactPoint {
        let dir = other - self;
        self + &(&dir * t)
    }

    /// Exact centroid of a triangle.
    pub fn centroid(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint) -> ExactPoint {
        let three = BigRational::from_integer(BigInt::from(3));
        ExactPoint::new(
            (&a.x + &b.x + &c.x) / &three,
            (&a.y + &b.y + &c.y) / &three,
            (&a.z + &b.z + &c.z) / &three,
        )
    }

    /// The point's coordinates as a vector from the origin.
    pub fn to_vector(&self) -> ExactVector {
        ExactVector {
            x: self.x.clone(),
            y: self.y.clone(),
            z: self.z.clone(),
        }
    }
}

impl ExactVector {
    pub fn new(x: BigRational, y: BigRational, z: BigRational) -> Self {
        Self { x, y, z }
    }

    pub fn from_integers(x: i64, y: i64, z: i64) -> Self {
        let conv = |v: i64| BigRational::from_integer(BigInt::from(v));
        Self::new(conv(x), conv(y), conv(z))
    }

    pub fn dot(&self, other: &ExactVector) -> BigRational {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    pub fn cross(&self, other: &ExactVector) -> ExactVector {
        ExactVector {
            x: &self.y * &other.z - &self.z * &other.y,
            y: &self.z * &other.x - &self.x * &other.z,
            z: &self.x * &other.y - &self.y * &other.x,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }
}

/// Sign of an exact scalar: -1, 0, or 1.
pub fn sign(v: &BigRational) -> i8 {
    if v.is_zero() {
        0
    } else if v.is_positive() {
        1
    } else {
        -1
    }
}

impl Sub for &ExactPoint {
    type Output = ExactVector;

    fn sub(self, rhs: &ExactPoint) -> ExactVector {
        ExactVector {
            x: &self.x - &rhs.x,
            y: &self.y - &rhs.y,
            z: &self.z - &rhs.z,
        }
    }
}

impl Add<&ExactVector> for &ExactPoint {
    type Output = ExactPoint;

    fn add(self, rhs: &ExactVector) -> ExactPoint {
        ExactPoint {
            x: &self.x + &rhs.x,
            y: &self.y + &rhs.y,
            z: &self.z + &rhs.z,
        }
    }
}

impl Add for &ExactVector {
    type Output = ExactVector;

    fn add(self, rhs: &ExactVector) -> ExactVector {
        ExactVector {
            x: &self.x + &rhs.x,
            y: &self.y + &rhs.y,
            z: &self.z + &rhs.z,
        }
    }
}

impl Sub for &ExactVector {
    type Output = ExactVector;

    fn sub(self, rhs: &ExactVector) -> ExactVector {
        ExactVector {
            x: &self.x - &rhs.x,
            y: &self.y - &rhs.y,
            z: &self.z - &rhs.z,
        }
    }
}

impl Mul<&BigRational> for &ExactVector {
    type Output = ExactVector;

    fn mul(self, rhs: &BigRational) -> ExactVector {
        ExactVector {
            x: &self.x * rhs,
            y: &self.y * rhs,
            z: &self.z * rhs,
        }
    }
}

impl Neg for &ExactVector {
    type Output = ExactVector;

    fn neg(self) -> ExactVector {
        ExactVector {
            x: -&self.x,
            y: -&self.y,
            z: -&self.z,
        }
    }
}

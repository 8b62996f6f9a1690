//! Basic 3D types: axes, signed motion directions, boxes, and progress intervals.
//!
//! - `MotionDirection`: one of the six signed Cartesian directions (codes ±1, ±2, ±3).
//! - `Aabb`: closed axis-aligned box with the intersection/swell helpers used by refinement.
//! - `Interval`: closed scalar range in the progress coordinate of a direction.

use std::fmt;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Cartesian axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Signed axis-aligned motion direction.
///
/// Codes match the batch interface: `POS_X = 1`, `NEG_X = -1`, `POS_Y = 2`, ...
/// Ordering is by code, so the positive canonical directions sort after their opposites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum MotionDirection {
    NegZ = -3,
    NegY = -2,
    NegX = -1,
    PosX = 1,
    PosY = 2,
    PosZ = 3,
}

impl MotionDirection {
    pub const ALL: [MotionDirection; 6] = [
        MotionDirection::PosX,
        MotionDirection::NegX,
        MotionDirection::PosY,
        MotionDirection::NegY,
        MotionDirection::PosZ,
        MotionDirection::NegZ,
    ];

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(MotionDirection::PosX),
            -1 => Some(MotionDirection::NegX),
            2 => Some(MotionDirection::PosY),
            -2 => Some(MotionDirection::NegY),
            3 => Some(MotionDirection::PosZ),
            -3 => Some(MotionDirection::NegZ),
            _ => None,
        }
    }

    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            MotionDirection::PosX | MotionDirection::NegX => Axis::X,
            MotionDirection::PosY | MotionDirection::NegY => Axis::Y,
            MotionDirection::PosZ | MotionDirection::NegZ => Axis::Z,
        }
    }

    /// `+1.0` for positive directions, `-1.0` for negative ones.
    #[inline]
    pub fn sign(self) -> f64 {
        if self.code() > 0 {
            1.0
        } else {
            -1.0
        }
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.code() > 0
    }

    pub fn unit(self) -> Vector3<f64> {
        let mut v = Vector3::zeros();
        v[self.axis().index()] = self.sign();
        v
    }

    pub fn opposite(self) -> Self {
        // Codes are symmetric, so this never fails.
        Self::from_code(-self.code()).unwrap_or(self)
    }

    /// Positive direction along the same axis.
    pub fn canonical(self) -> Self {
        if self.is_positive() {
            self
        } else {
            self.opposite()
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MotionDirection::PosX => "POS_X",
            MotionDirection::NegX => "NEG_X",
            MotionDirection::PosY => "POS_Y",
            MotionDirection::NegY => "NEG_Y",
            MotionDirection::PosZ => "POS_Z",
            MotionDirection::NegZ => "NEG_Z",
        }
    }
}

impl fmt::Display for MotionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<MotionDirection> for i32 {
    fn from(d: MotionDirection) -> i32 {
        d.code()
    }
}

impl TryFrom<i32> for MotionDirection {
    type Error = String;
    fn try_from(code: i32) -> Result<Self, Self::Error> {
        MotionDirection::from_code(code).ok_or_else(|| format!("invalid motion direction code {code}"))
    }
}

/// Closed axis-aligned bounding box.
///
/// Invariants:
/// - `min[i] <= max[i]` for a valid box; `Aabb::empty()` is the only exception and acts as
///   the identity of `union`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Aabb {
    #[inline]
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn from_corners(a: [f64; 3], b: [f64; 3]) -> Self {
        Self {
            min: Point3::new(a[0].min(b[0]), a[1].min(b[1]), a[2].min(b[2])),
            max: Point3::new(a[0].max(b[0]), a[1].max(b[1]), a[2].max(b[2])),
        }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    #[inline]
    pub fn length(&self, axis: Axis) -> f64 {
        self.max[axis.index()] - self.min[axis.index()]
    }

    #[inline]
    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    #[inline]
    pub fn diagonal(&self) -> f64 {
        self.extents().norm()
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let e = self.extents();
        e.x * e.y * e.z
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Closed intersection test; touching boxes intersect.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// Closed intersection box, `None` when disjoint.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        if !self.intersects(other) {
            return None;
        }
        Some(Aabb {
            min: self.min.sup(&other.min),
            max: self.max.inf(&other.max),
        })
    }

    /// Grow by `d` on every side (shrinks for negative `d`).
    pub fn swollen(&self, d: f64) -> Aabb {
        let v = Vector3::new(d, d, d);
        Aabb {
            min: self.min - v,
            max: self.max + v,
        }
    }

    pub fn translated(&self, t: &Vector3<f64>) -> Aabb {
        Aabb {
            min: self.min + t,
            max: self.max + t,
        }
    }

    /// True if `other` lies in the open interior of `self`.
    pub fn strictly_contains(&self, other: &Aabb) -> bool {
        (0..3).all(|i| self.min[i] < other.min[i] && other.max[i] < self.max[i])
    }

    /// Projection onto the progress coordinate of `dir` (`p = sign * axis coordinate`).
    pub fn progress_range(&self, dir: MotionDirection) -> Interval {
        let i = dir.axis().index();
        if dir.is_positive() {
            Interval::new(self.min[i], self.max[i])
        } else {
            Interval::new(-self.max[i], -self.min[i])
        }
    }

    /// Extend the box to the far side of `overall` along the motion direction.
    pub fn elongated(&self, overall: &Aabb, dir: MotionDirection) -> Aabb {
        let i = dir.axis().index();
        let mut out = *self;
        if dir.is_positive() {
            out.max[i] = out.max[i].max(overall.max[i]);
        } else {
            out.min[i] = out.min[i].min(overall.min[i]);
        }
        out
    }
}

/// Closed scalar interval `[lo, hi]` in the progress coordinate of a motion direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
}

impl Interval {
    #[inline]
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.hi - self.lo
    }

    /// Strict interior overlap (shared endpoints do not overlap).
    #[inline]
    pub fn overlaps_open(&self, other: &Interval) -> bool {
        self.lo < other.hi && other.lo < self.hi
    }
}

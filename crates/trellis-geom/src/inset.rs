use std::ops::{Add, Mul};

use serde::{Deserialize, Serialize};

use crate::Axis;

/// Four-sided inset, used for margins, padding and hit-test padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Inset {
    /// Left edge.
    #[serde(default)]
    pub left: f64,
    /// Right edge.
    #[serde(default)]
    pub right: f64,
    /// Top edge.
    #[serde(default)]
    pub top: f64,
    /// Bottom edge.
    #[serde(default)]
    pub bottom: f64,
}

impl Inset {
    /// The zero inset.
    pub const ZERO: Self = Self {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    /// Construct an inset from left, right, top and bottom values.
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Uniform inset on all four sides.
    pub const fn all(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// Inset with separate horizontal and vertical values.
    pub const fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(horizontal, horizontal, vertical, vertical)
    }

    /// Sum of left and right.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    /// Sum of both edges along `axis`.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Leading edge along `axis` (left or top).
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.left + (other.left - self.left) * t,
            self.right + (other.right - self.right) * t,
            self.top + (other.top - self.top) * t,
            self.bottom + (other.bottom - self.bottom) * t,
        )
    }
}

impl Add for Inset {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.left + other.left,
            self.right + other.right,
            self.top + other.top,
            self.bottom + other.bottom,
        )
    }
}

impl Mul<f64> for Inset {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(self.left * s, self.right * s, self.top * s, self.bottom * s)
    }
}

//! Geometry primitives used across trellis.

#![warn(missing_docs)]

/// Four-sided inset values.
mod inset;
/// Rectangle operations.
mod rect;
/// Two-dimensional vectors.
mod vec2;

pub use inset::Inset;
pub use rect::Rect;
pub use vec2::Vec2;

/// Layout axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal (x) axis.
    Horizontal,
    /// Vertical (y) axis.
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

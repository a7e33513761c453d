use serde::{Deserialize, Serialize};

use crate::{Inset, Vec2};

/// An axis-aligned rectangle.
///
/// Width and height may be transiently negative during measurement; callers
/// clamp before assigning a rectangle to a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a rectangle.
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// A zero-sized rectangle at the origin.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Construct a rectangle from a position and a size.
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Top-left corner.
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Width and height as a vector.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    /// Bottom-right corner.
    pub fn br(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    /// Center point.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Does this rectangle contain a point? The right and bottom edges are
    /// exclusive.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.w && p.y >= self.y && p.y < self.y + self.h
    }

    /// Return this rectangle translated by `offset`.
    pub fn moved_by(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.w, self.h)
    }

    /// Grow outwards by an inset.
    pub fn stretched(&self, inset: Inset) -> Self {
        Self::new(
            self.x - inset.left,
            self.y - inset.top,
            self.w + inset.horizontal(),
            self.h + inset.vertical(),
        )
    }

    /// Shrink inwards by an inset. The result may have negative extents.
    pub fn deflated(&self, inset: Inset) -> Self {
        Self::new(
            self.x + inset.left,
            self.y + inset.top,
            self.w - inset.horizontal(),
            self.h - inset.vertical(),
        )
    }

    /// Clamp width and height to be non-negative.
    pub fn non_negative(&self) -> Self {
        Self::new(self.x, self.y, self.w.max(0.0), self.h.max(0.0))
    }

    /// Are all components finite?
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Intersection of two rectangles, if they overlap with a positive area.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.w).min(other.x + other.w);
        let y1 = (self.y + self.h).min(other.y + other.h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Smallest rectangle that contains both rectangles.
    pub fn union(&self, other: &Self) -> Self {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.w).max(other.x + other.w);
        let y1 = (self.y + self.h).max(other.y + other.h);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(19.9, 19.9)));
        assert!(!r.contains(Vec2::new(20.0, 15.0)));
        assert!(!r.contains(Vec2::new(9.9, 15.0)));
    }

    #[test]
    fn stretch_and_deflate() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        let i = Inset::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.stretched(i), Rect::new(9.0, 7.0, 23.0, 27.0));
        assert_eq!(r.deflated(i), Rect::new(11.0, 13.0, 17.0, 13.0));
        assert_eq!(r.stretched(i).deflated(i), r);
    }

    #[test]
    fn intersect_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), None);
        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&c), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
    }

    #[test]
    fn derived_points() {
        let r = Rect::new(2.0, 4.0, 6.0, 8.0);
        assert_eq!(r.br(), Vec2::new(8.0, 12.0));
        assert_eq!(r.center(), Vec2::new(5.0, 8.0));
    }

    proptest! {
        #[test]
        fn union_contains_both(
            ax in -100.0f64..100.0, ay in -100.0f64..100.0, aw in 0.0f64..50.0, ah in 0.0f64..50.0,
            bx in -100.0f64..100.0, by in -100.0f64..100.0, bw in 0.0f64..50.0, bh in 0.0f64..50.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            let u = a.union(&b);
            prop_assert!(u.x <= a.x && u.x <= b.x);
            prop_assert!(u.y <= a.y && u.y <= b.y);
            prop_assert!(u.br().x >= a.br().x - 1e-9 && u.br().x >= b.br().x - 1e-9);
            prop_assert!(u.br().y >= a.br().y - 1e-9 && u.br().y >= b.br().y - 1e-9);
        }
    }
}

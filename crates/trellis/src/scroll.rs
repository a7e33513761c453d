//! Scroll ranges and scroll physics.
//!
//! A node's scroll offset translates its box children: a child laid out at
//! `r` is shown at `r + offset`. The valid offsets form a [`ScrollRange`]
//! derived from the content size, the viewport size and the layout's scroll
//! anchor. The free functions here are the per-frame physics steps the canvas
//! applies to drag, inertia and rubber-band motion.

use serde::{Deserialize, Serialize};

use crate::geom::{Axis, Rect, Vec2};

/// Which axes of a node scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScrollableAxis {
    /// Scrolls horizontally.
    pub horizontal: bool,
    /// Scrolls vertically.
    pub vertical: bool,
}

impl ScrollableAxis {
    /// Not scrollable.
    pub const NONE: Self = Self {
        horizontal: false,
        vertical: false,
    };
    /// Horizontal only.
    pub const HORIZONTAL: Self = Self {
        horizontal: true,
        vertical: false,
    };
    /// Vertical only.
    pub const VERTICAL: Self = Self {
        horizontal: false,
        vertical: true,
    };
    /// Both axes.
    pub const BOTH: Self = Self {
        horizontal: true,
        vertical: true,
    };

    /// Does either axis scroll?
    pub fn any(self) -> bool {
        self.horizontal || self.vertical
    }

    /// Does `axis` scroll?
    pub fn allows(self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    /// Zero the components of `v` on axes that do not scroll.
    pub fn mask(self, v: Vec2) -> Vec2 {
        Vec2::new(
            if self.horizontal { v.x } else { 0.0 },
            if self.vertical { v.y } else { 0.0 },
        )
    }
}

/// Inclusive range of valid scroll offsets on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollRange {
    /// Smallest valid offset.
    pub min: Vec2,
    /// Largest valid offset.
    pub max: Vec2,
}

impl ScrollRange {
    /// The range that only admits a zero offset.
    pub const ZERO: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ZERO,
    };

    /// Compute the range for `content` shown through `viewport`.
    ///
    /// Per axis the overflow is `max(content - viewport, 0)` and the range is
    /// `[-overflow * anchor, overflow * (1 - anchor)]`. Axes that do not
    /// scroll, and nodes without content, only admit zero.
    pub fn new(content: Option<Rect>, viewport: Rect, anchor: Vec2, axes: ScrollableAxis) -> Self {
        let Some(content) = content else {
            return Self::ZERO;
        };
        let overflow = (content.size() - viewport.size()).max(Vec2::ZERO);
        let overflow = axes.mask(overflow);
        if !overflow.is_finite() {
            return Self::ZERO;
        }
        Self {
            min: -overflow.mul_elem(anchor),
            max: overflow.mul_elem(Vec2::ONE - anchor),
        }
    }

    /// Width of the range per axis.
    pub fn extent(&self) -> Vec2 {
        self.max - self.min
    }

    /// Clamp an offset into the range.
    pub fn clamp(&self, offset: Vec2) -> Vec2 {
        Vec2::new(
            offset.x.clamp(self.min.x, self.max.x),
            offset.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Is `offset` inside the range?
    pub fn contains(&self, offset: Vec2) -> bool {
        self.clamp(offset) == offset
    }

    /// How far `offset` lies outside the range, signed per axis.
    pub fn overscroll(&self, offset: Vec2) -> Vec2 {
        offset - self.clamp(offset)
    }

    /// Would moving from `offset` by `delta` change the clamped offset?
    pub fn can_move(&self, offset: Vec2, delta: Vec2) -> bool {
        let from = self.clamp(offset);
        let to = self.clamp(offset + delta);
        to != from
    }
}

/// Exponential velocity decay: `v * rate^dt` per axis. A rate outside
/// `[0, 1]` is clamped into it.
pub fn decay_velocity(velocity: Vec2, rate: f64, dt: f64) -> Vec2 {
    velocity * rate.clamp(0.0, 1.0).powf(dt.max(0.0))
}

/// Zero velocity components that push further out of `range` from an offset
/// already at or beyond the boundary.
pub fn stop_outward_velocity(range: &ScrollRange, offset: Vec2, velocity: Vec2) -> Vec2 {
    let mut v = velocity;
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let o = offset.get(axis);
        let vel = v.get(axis);
        let at_min = o <= range.min.get(axis) && vel < 0.0;
        let at_max = o >= range.max.get(axis) && vel > 0.0;
        if at_min || at_max {
            v.set(axis, 0.0);
        }
    }
    v
}

/// One rubber-band step: ease `offset` towards the range, snapping once the
/// remaining distance drops below `snap`.
pub fn rubber_band_step(range: &ScrollRange, offset: Vec2, speed: f64, dt: f64, snap: f64) -> Vec2 {
    let target = range.clamp(offset);
    let t = (speed * dt).clamp(0.0, 1.0);
    let next = offset + (target - offset) * t;
    let mut out = next;
    for axis in [Axis::Horizontal, Axis::Vertical] {
        if (target.get(axis) - next.get(axis)).abs() < snap {
            out.set(axis, target.get(axis));
        }
    }
    out
}

/// Scale a drag delta on axes where the offset is already out of range.
pub fn resist_drag(range: &ScrollRange, offset: Vec2, delta: Vec2, resistance: f64) -> Vec2 {
    let over = range.overscroll(offset);
    let mut d = delta;
    for axis in [Axis::Horizontal, Axis::Vertical] {
        let o = over.get(axis);
        let dv = d.get(axis);
        if (o < 0.0 && dv < 0.0) || (o > 0.0 && dv > 0.0) {
            d.set(axis, dv * resistance);
        }
    }
    d
}

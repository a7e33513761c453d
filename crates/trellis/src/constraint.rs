//! Positioning constraints.
//!
//! A [`Constraint`] turns a parent rectangle into a child rectangle. Box
//! constraints only size the child; the parent's layout decides where it goes.
//! Anchor constraints place themselves directly against the parent rectangle
//! and ignore sibling flow.

use serde::{Deserialize, Deserializer, Serialize, de::Error as DeError};
use serde_json::Value;

use crate::geom::{Axis, Inset, Rect, Vec2};

/// Apply optional min and max bounds. Min is applied first, so max wins when
/// the bounds conflict.
fn clamp_opt(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let mut value = value;
    if let Some(min) = min {
        value = value.max(min);
    }
    if let Some(max) = max {
        value = value.min(max);
    }
    value
}

/// Size relative to the parent, positioned by the parent's layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxConstraint {
    /// Fraction of the parent size.
    pub size_ratio: Vec2,
    /// Additive size in pixels.
    pub size_delta: Vec2,
    /// Outer margin, added around the box by the layout.
    pub margin: Inset,
    /// Minimum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    /// Minimum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    /// Maximum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    /// Maximum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    /// Share of leftover main-axis space in horizontal and vertical layouts.
    pub flexible_weight: f64,
}

impl Default for BoxConstraint {
    fn default() -> Self {
        Self {
            size_ratio: Vec2::ZERO,
            size_delta: Vec2::ZERO,
            margin: Inset::ZERO,
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
            flexible_weight: 0.0,
        }
    }
}

impl BoxConstraint {
    /// A fixed-size box.
    pub fn fixed(width: f64, height: f64) -> Self {
        Self {
            size_delta: Vec2::new(width, height),
            ..Self::default()
        }
    }

    /// A box that takes the full parent size.
    pub fn fill() -> Self {
        Self {
            size_ratio: Vec2::ONE,
            ..Self::default()
        }
    }

    /// Build with a margin.
    pub fn with_margin(mut self, margin: Inset) -> Self {
        self.margin = margin;
        self
    }

    /// Build with a flexible weight.
    pub fn with_flexible_weight(mut self, weight: f64) -> Self {
        self.flexible_weight = weight;
        self
    }

    /// Build with minimum width and height.
    pub fn with_min(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.min_width = width;
        self.min_height = height;
        self
    }

    /// Build with maximum width and height.
    pub fn with_max(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    /// Flexible weight, never negative.
    pub fn weight(&self) -> f64 {
        self.flexible_weight.max(0.0)
    }

    /// Clamp a size along one axis against this constraint's bounds.
    pub fn clamp_axis(&self, axis: Axis, value: f64) -> f64 {
        match axis {
            Axis::Horizontal => clamp_opt(value, self.min_width, self.max_width),
            Axis::Vertical => clamp_opt(value, self.min_height, self.max_height),
        }
    }

    /// Size of the box inside a parent of `parent_size`, margins excluded.
    pub fn size_in(&self, parent_size: Vec2) -> Vec2 {
        let raw = parent_size.mul_elem(self.size_ratio) + self.size_delta;
        Vec2::new(
            self.clamp_axis(Axis::Horizontal, raw.x),
            self.clamp_axis(Axis::Vertical, raw.y),
        )
    }

    /// Compute the child rectangle. The layout offset is the position the
    /// owning layout chose, relative to the parent origin.
    pub fn apply(&self, parent: Rect, layout_offset: Vec2) -> Rect {
        let size = self.size_in(parent.size());
        let pos = parent.pos() + layout_offset + Vec2::new(self.margin.left, self.margin.top);
        Rect::from_pos_size(pos, size)
    }
}

/// Self-positioning against two fractional anchor points of the parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnchorConstraint {
    /// Lower anchor, as a fraction of the parent size.
    pub anchor_min: Vec2,
    /// Upper anchor, as a fraction of the parent size.
    pub anchor_max: Vec2,
    /// Pixel offset of the position.
    pub pos_delta: Vec2,
    /// Additive size in pixels.
    pub size_delta: Vec2,
    /// Pivot for `size_delta`, as a fraction of the node size.
    pub size_delta_pivot: Vec2,
    /// Minimum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    /// Minimum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    /// Maximum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    /// Maximum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

impl Default for AnchorConstraint {
    fn default() -> Self {
        Self {
            anchor_min: Vec2::ZERO,
            anchor_max: Vec2::ONE,
            pos_delta: Vec2::ZERO,
            size_delta: Vec2::ZERO,
            size_delta_pivot: Vec2::splat(0.5),
            min_width: None,
            min_height: None,
            max_width: None,
            max_height: None,
        }
    }
}

impl AnchorConstraint {
    /// A fixed-size node pinned at `anchor` of the parent. The anchor doubles
    /// as the pivot, so `pos_delta` is measured from that point.
    pub fn fixed(anchor: Vec2, size: Vec2, pos_delta: Vec2) -> Self {
        Self {
            anchor_min: anchor,
            anchor_max: anchor,
            pos_delta,
            size_delta: size,
            size_delta_pivot: anchor,
            ..Self::default()
        }
    }

    /// Stretch over the whole parent, inset by `margin`.
    pub fn stretch(margin: Inset) -> Self {
        Self {
            anchor_min: Vec2::ZERO,
            anchor_max: Vec2::ONE,
            pos_delta: Vec2::new(margin.left, margin.top),
            size_delta: Vec2::new(-margin.horizontal(), -margin.vertical()),
            size_delta_pivot: Vec2::ZERO,
            ..Self::default()
        }
    }

    /// Stretch horizontally at vertical fraction `y`, with a fixed height.
    pub fn stretch_horizontal(y: f64, height: f64, margin_left: f64, margin_right: f64) -> Self {
        Self {
            anchor_min: Vec2::new(0.0, y),
            anchor_max: Vec2::new(1.0, y),
            pos_delta: Vec2::new(margin_left, 0.0),
            size_delta: Vec2::new(-(margin_left + margin_right), height),
            size_delta_pivot: Vec2::new(0.0, y),
            ..Self::default()
        }
    }

    /// Stretch vertically at horizontal fraction `x`, with a fixed width.
    pub fn stretch_vertical(x: f64, width: f64, margin_top: f64, margin_bottom: f64) -> Self {
        Self {
            anchor_min: Vec2::new(x, 0.0),
            anchor_max: Vec2::new(x, 1.0),
            pos_delta: Vec2::new(0.0, margin_top),
            size_delta: Vec2::new(width, -(margin_top + margin_bottom)),
            size_delta_pivot: Vec2::new(x, 0.0),
            ..Self::default()
        }
    }

    /// Compute the child rectangle. The layout offset is ignored: anchored
    /// nodes do not take part in sibling flow.
    pub fn apply(&self, parent: Rect, _layout_offset: Vec2) -> Rect {
        let parent_size = parent.size();
        let raw = parent_size.mul_elem(self.anchor_max - self.anchor_min) + self.size_delta;
        let size = Vec2::new(
            clamp_opt(raw.x, self.min_width, self.max_width),
            clamp_opt(raw.y, self.min_height, self.max_height),
        );
        let size_diff = raw - size;
        let pos = parent.pos() + parent_size.mul_elem(self.anchor_min) + self.pos_delta
            - self.size_delta.mul_elem(self.size_delta_pivot)
            + size_diff.mul_elem(self.size_delta_pivot);
        Rect::from_pos_size(pos, size)
    }
}

/// A node's positioning rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Constraint {
    /// Sized relative to the parent, placed by the parent's layout.
    #[serde(rename = "BoxConstraint")]
    Box(BoxConstraint),
    /// Self-placed against the parent's anchor points.
    #[serde(rename = "AnchorConstraint")]
    Anchor(AnchorConstraint),
}

impl Default for Constraint {
    fn default() -> Self {
        Self::Box(BoxConstraint::default())
    }
}

impl From<BoxConstraint> for Constraint {
    fn from(c: BoxConstraint) -> Self {
        Self::Box(c)
    }
}

impl From<AnchorConstraint> for Constraint {
    fn from(c: AnchorConstraint) -> Self {
        Self::Anchor(c)
    }
}

impl Constraint {
    /// Compute the child rectangle from the parent rectangle and the offset
    /// chosen by the parent's layout.
    pub fn apply(&self, parent: Rect, layout_offset: Vec2) -> Rect {
        match self {
            Self::Box(c) => c.apply(parent, layout_offset),
            Self::Anchor(c) => c.apply(parent, layout_offset),
        }
    }

    /// Is this a box constraint?
    pub fn is_box(&self) -> bool {
        matches!(self, Self::Box(_))
    }

    /// Is this an anchor constraint?
    pub fn is_anchor(&self) -> bool {
        matches!(self, Self::Anchor(_))
    }

    /// The box constraint, if active.
    pub fn as_box(&self) -> Option<&BoxConstraint> {
        match self {
            Self::Box(c) => Some(c),
            Self::Anchor(_) => None,
        }
    }

    /// The anchor constraint, if active.
    pub fn as_anchor(&self) -> Option<&AnchorConstraint> {
        match self {
            Self::Anchor(c) => Some(c),
            Self::Box(_) => None,
        }
    }

    /// Build from a tagged JSON object. Unknown or missing tags fall back to
    /// the default box constraint with a warning; malformed fields of a known
    /// variant are an error.
    pub fn from_json(value: &Value) -> serde_json::Result<Self> {
        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        match tag {
            "BoxConstraint" => Ok(Self::Box(BoxConstraint::deserialize(value)?)),
            "AnchorConstraint" => Ok(Self::Anchor(AnchorConstraint::deserialize(value)?)),
            other => {
                tracing::warn!(tag = other, "unknown constraint type, using BoxConstraint");
                Ok(Self::default())
            }
        }
    }
}

impl<'de> Deserialize<'de> for Constraint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(DeError::custom)
    }
}

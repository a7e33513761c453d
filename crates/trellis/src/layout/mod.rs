//! Children layout algorithms.
//!
//! A [`Layout`] arranges the box-constrained children of a node. Every
//! algorithm works in two phases: a measure phase that computes sizes and
//! line breaks without touching any node, and an execute phase that hands the
//! final rectangle of each child to a caller-supplied setter. Anchor children
//! are skipped by measurement and self-place against the parent rectangle.
//! Children whose own active flag is off measure as zero and are never placed.

use serde::{Deserialize, Deserializer, Serialize, de::Error as DeError};
use serde_json::Value;

use crate::{
    constraint::Constraint,
    geom::{Inset, Rect, Vec2},
};

/// Flow layout.
mod flow;
/// Horizontal and vertical layouts.
mod linear;

pub use flow::FlowLayout;
pub use linear::{HorizontalLayout, VerticalLayout};

/// Horizontal alignment of laid-out content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HorizontalAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center horizontally.
    Center,
    /// Align to the right edge.
    Right,
}

impl HorizontalAlign {
    /// Fraction of leftover space placed before the content.
    pub fn ratio(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Center => 0.5,
            Self::Right => 1.0,
        }
    }
}

/// Vertical alignment of laid-out content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VerticalAlign {
    /// Align to the top edge.
    #[default]
    Top,
    /// Center vertically.
    Middle,
    /// Align to the bottom edge.
    Bottom,
}

impl VerticalAlign {
    /// Fraction of leftover space placed before the content.
    pub fn ratio(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Middle => 0.5,
            Self::Bottom => 1.0,
        }
    }
}

/// What a layout needs to know about one child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutChild {
    /// The child's constraint.
    pub constraint: Constraint,
    /// The child's own active flag (not the hierarchy flag).
    pub active: bool,
}

impl LayoutChild {
    /// Construct an active child.
    pub fn new(constraint: impl Into<Constraint>) -> Self {
        Self {
            constraint: constraint.into(),
            active: true,
        }
    }

    /// Build with the active flag set.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// A node's children layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Layout {
    /// Wrap children into lines.
    #[serde(rename = "FlowLayout")]
    Flow(FlowLayout),
    /// Single row.
    #[serde(rename = "HorizontalLayout")]
    Horizontal(HorizontalLayout),
    /// Single column.
    #[serde(rename = "VerticalLayout")]
    Vertical(VerticalLayout),
}

impl Default for Layout {
    fn default() -> Self {
        Self::Flow(FlowLayout::default())
    }
}

impl From<FlowLayout> for Layout {
    fn from(l: FlowLayout) -> Self {
        Self::Flow(l)
    }
}

impl From<HorizontalLayout> for Layout {
    fn from(l: HorizontalLayout) -> Self {
        Self::Horizontal(l)
    }
}

impl From<VerticalLayout> for Layout {
    fn from(l: VerticalLayout) -> Self {
        Self::Vertical(l)
    }
}

impl Layout {
    /// Inner padding.
    pub fn padding(&self) -> Inset {
        match self {
            Self::Flow(l) => l.padding,
            Self::Horizontal(l) => l.padding,
            Self::Vertical(l) => l.padding,
        }
    }

    /// Horizontal alignment.
    pub fn horizontal_align(&self) -> HorizontalAlign {
        match self {
            Self::Flow(l) => l.horizontal_align,
            Self::Horizontal(l) => l.horizontal_align,
            Self::Vertical(l) => l.horizontal_align,
        }
    }

    /// Vertical alignment.
    pub fn vertical_align(&self) -> VerticalAlign {
        match self {
            Self::Flow(l) => l.vertical_align,
            Self::Horizontal(l) => l.vertical_align,
            Self::Vertical(l) => l.vertical_align,
        }
    }

    /// Assign every placeable child its rectangle. `set_rect` receives the
    /// child index and the rectangle; inactive children are never reported.
    pub fn execute(
        &self,
        parent: Rect,
        children: &[LayoutChild],
        set_rect: impl FnMut(usize, Rect),
    ) {
        match self {
            Self::Flow(l) => l.execute(parent, children, set_rect),
            Self::Horizontal(l) => l.execute(parent, children, set_rect),
            Self::Vertical(l) => l.execute(parent, children, set_rect),
        }
    }

    /// Size needed to contain the box children, padding included. Only the
    /// flow layout looks at the width of `parent`, to break lines.
    pub fn fitting_size(&self, parent: Rect, children: &[LayoutChild]) -> Vec2 {
        match self {
            Self::Flow(l) => l.fitting_size(parent, children),
            Self::Horizontal(l) => l.fitting_size(parent, children),
            Self::Vertical(l) => l.fitting_size(parent, children),
        }
    }

    /// Fraction of the scroll overflow reachable with negative offsets, per
    /// axis. Content at rest sits where the alignment puts it, so a top
    /// aligned column scrolls in `[-overflow, 0]` and a bottom aligned one in
    /// `[0, overflow]`.
    pub fn scroll_offset_anchor(&self) -> Vec2 {
        Vec2::new(
            1.0 - self.horizontal_align().ratio(),
            1.0 - self.vertical_align().ratio(),
        )
    }

    /// Build from a tagged JSON object. Unknown or missing tags fall back to
    /// the default flow layout with a warning.
    pub fn from_json(value: &Value) -> serde_json::Result<Self> {
        let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
        match tag {
            "FlowLayout" => Ok(Self::Flow(FlowLayout::deserialize(value)?)),
            "HorizontalLayout" => Ok(Self::Horizontal(HorizontalLayout::deserialize(value)?)),
            "VerticalLayout" => Ok(Self::Vertical(VerticalLayout::deserialize(value)?)),
            other => {
                tracing::warn!(tag = other, "unknown layout type, using FlowLayout");
                Ok(Self::default())
            }
        }
    }
}

impl<'de> Deserialize<'de> for Layout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(DeError::custom)
    }
}

/// Bounding rectangle of the active box children's rectangles, margins
/// included, grown by `padding`. Returns `None` when there is no such child
/// or the result is not finite.
pub fn content_rect(
    padding: Inset,
    children: impl IntoIterator<Item = (Constraint, Rect)>,
) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    for (constraint, rect) in children {
        let Constraint::Box(c) = constraint else {
            continue;
        };
        let outer = rect.stretched(c.margin);
        bounds = Some(match bounds {
            Some(b) => b.union(&outer),
            None => outer,
        });
    }
    let content = bounds?.stretched(padding);
    if !content.is_finite() || content.w < 0.0 || content.h < 0.0 {
        return None;
    }
    Some(content)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::constraint::{AnchorConstraint, BoxConstraint};

    #[test]
    fn scroll_anchor_follows_alignment() {
        let top = Layout::Vertical(VerticalLayout::default());
        assert_eq!(top.scroll_offset_anchor(), Vec2::new(1.0, 1.0));
        let centered = Layout::Flow(FlowLayout {
            horizontal_align: HorizontalAlign::Center,
            vertical_align: VerticalAlign::Bottom,
            ..FlowLayout::default()
        });
        assert_eq!(centered.scroll_offset_anchor(), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn unknown_layout_falls_back() -> serde_json::Result<()> {
        let l = Layout::from_json(&json!({"type": "GridLayout"}))?;
        assert_eq!(l, Layout::default());
        Ok(())
    }

    #[test]
    fn bad_alignment_is_error() {
        let r = Layout::from_json(&json!({
            "type": "HorizontalLayout",
            "horizontalAlign": "Sideways"
        }));
        assert!(r.is_err());
    }

    #[test]
    fn layout_json_shape() -> serde_json::Result<()> {
        let l = Layout::Horizontal(HorizontalLayout {
            spacing: 4.0,
            horizontal_align: HorizontalAlign::Right,
            ..HorizontalLayout::default()
        });
        let v = serde_json::to_value(l)?;
        assert_eq!(v["type"], "HorizontalLayout");
        assert_eq!(v["horizontalAlign"], "Right");
        assert_eq!(serde_json::from_value::<Layout>(v)?, l);
        Ok(())
    }

    #[test]
    fn content_rect_skips_anchors() {
        let children = vec![
            (
                Constraint::Box(BoxConstraint::fixed(10.0, 10.0).with_margin(Inset::all(2.0))),
                Rect::new(2.0, 2.0, 10.0, 10.0),
            ),
            (
                Constraint::Anchor(AnchorConstraint::default()),
                Rect::new(-100.0, -100.0, 500.0, 500.0),
            ),
        ];
        assert_eq!(
            content_rect(Inset::all(1.0), children),
            Some(Rect::new(-1.0, -1.0, 16.0, 16.0))
        );
    }

    #[test]
    fn content_rect_rejects_non_finite() {
        let children = vec![(
            Constraint::Box(BoxConstraint::default()),
            Rect::new(f64::NAN, 0.0, 1.0, 1.0),
        )];
        assert_eq!(content_rect(Inset::ZERO, children), None);
        assert_eq!(content_rect(Inset::ZERO, Vec::new()), None);
    }
}

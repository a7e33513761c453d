use serde::{Deserialize, Serialize};

use super::{HorizontalAlign, LayoutChild, VerticalAlign};
use crate::{
    constraint::{BoxConstraint, Constraint},
    geom::{Axis, Inset, Rect, Vec2},
};

/// Lay children out in a single row.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HorizontalLayout {
    /// Inner padding.
    pub padding: Inset,
    /// Gap between consecutive box children.
    pub spacing: f64,
    /// Main-axis alignment.
    pub horizontal_align: HorizontalAlign,
    /// Cross-axis alignment.
    pub vertical_align: VerticalAlign,
}

/// Lay children out in a single column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerticalLayout {
    /// Inner padding.
    pub padding: Inset,
    /// Gap between consecutive box children.
    pub spacing: f64,
    /// Cross-axis alignment.
    pub horizontal_align: HorizontalAlign,
    /// Main-axis alignment.
    pub vertical_align: VerticalAlign,
}

impl HorizontalLayout {
    /// The axis-generic form of this layout.
    fn linear(&self) -> Linear {
        Linear {
            axis: Axis::Horizontal,
            padding: self.padding,
            spacing: self.spacing,
            main_ratio: self.horizontal_align.ratio(),
            cross_ratio: self.vertical_align.ratio(),
        }
    }

    /// Assign each active child its rectangle.
    pub fn execute(
        &self,
        parent: Rect,
        children: &[LayoutChild],
        set_rect: impl FnMut(usize, Rect),
    ) {
        self.linear().execute(parent, children, set_rect);
    }

    /// Size needed to contain the box children, padding included.
    pub fn fitting_size(&self, parent: Rect, children: &[LayoutChild]) -> Vec2 {
        self.linear().fitting_size(parent, children)
    }
}

impl VerticalLayout {
    /// The axis-generic form of this layout.
    fn linear(&self) -> Linear {
        Linear {
            axis: Axis::Vertical,
            padding: self.padding,
            spacing: self.spacing,
            main_ratio: self.vertical_align.ratio(),
            cross_ratio: self.horizontal_align.ratio(),
        }
    }

    /// Assign each active child its rectangle.
    pub fn execute(
        &self,
        parent: Rect,
        children: &[LayoutChild],
        set_rect: impl FnMut(usize, Rect),
    ) {
        self.linear().execute(parent, children, set_rect);
    }

    /// Size needed to contain the box children, padding included.
    pub fn fitting_size(&self, parent: Rect, children: &[LayoutChild]) -> Vec2 {
        self.linear().fitting_size(parent, children)
    }
}

/// Measurement of one active box child.
#[derive(Debug, Clone, Copy)]
pub(super) struct MeasuredChild {
    /// Index into the children slice.
    pub index: usize,
    /// The child's box constraint.
    pub constraint: BoxConstraint,
    /// Content size, margins excluded.
    pub size: Vec2,
}

impl MeasuredChild {
    /// Extent along `axis` including margins.
    pub fn full(&self, axis: Axis) -> f64 {
        self.size.get(axis) + self.constraint.margin.along(axis)
    }
}

/// Measure the active box children against the inner size of the parent.
pub(super) fn measure_children(children: &[LayoutChild], inner_size: Vec2) -> Vec<MeasuredChild> {
    children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.active)
        .filter_map(|(index, c)| match c.constraint {
            Constraint::Box(b) => Some(MeasuredChild {
                index,
                constraint: b,
                size: b.size_in(inner_size),
            }),
            Constraint::Anchor(_) => None,
        })
        .collect()
}

/// Grow flexible items along `axis` to share `leftover`. Each grown size is
/// clamped against the item's own bounds afterwards.
pub(super) fn distribute_flex(items: &mut [MeasuredChild], axis: Axis, leftover: f64) {
    let total_weight: f64 = items.iter().map(|i| i.constraint.weight()).sum();
    if total_weight <= 0.0 || leftover <= 0.0 {
        return;
    }
    for item in items.iter_mut() {
        let w = item.constraint.weight();
        if w <= 0.0 {
            continue;
        }
        let grown = item.size.get(axis) + leftover * w / total_weight;
        let clamped = item.constraint.clamp_axis(axis, grown);
        item.size.set(axis, clamped);
    }
}

/// Do any items carry a positive flexible weight?
pub(super) fn has_flex(items: &[MeasuredChild]) -> bool {
    items.iter().any(|i| i.constraint.weight() > 0.0)
}

/// Place anchor children directly against the parent rectangle.
pub(super) fn place_anchors(
    parent: Rect,
    children: &[LayoutChild],
    set_rect: &mut impl FnMut(usize, Rect),
) {
    for (i, c) in children.iter().enumerate() {
        if !c.active {
            continue;
        }
        if let Constraint::Anchor(a) = c.constraint {
            set_rect(i, a.apply(parent, Vec2::ZERO));
        }
    }
}

/// A row or column, parameterised by its main axis.
#[derive(Debug, Clone, Copy)]
struct Linear {
    /// Main axis.
    axis: Axis,
    /// Inner padding.
    padding: Inset,
    /// Gap between consecutive items.
    spacing: f64,
    /// Main-axis alignment ratio.
    main_ratio: f64,
    /// Cross-axis alignment ratio.
    cross_ratio: f64,
}

impl Linear {
    /// Total main extent and maximum cross extent of `items`, spacing included.
    fn extents(&self, items: &[MeasuredChild]) -> (f64, f64) {
        let mut total = 0.0;
        let mut max_cross: f64 = 0.0;
        for (n, item) in items.iter().enumerate() {
            if n > 0 {
                total += self.spacing;
            }
            total += item.full(self.axis);
            max_cross = max_cross.max(item.full(self.axis.cross()));
        }
        (total, max_cross)
    }

    /// Assign rectangles.
    fn execute(
        &self,
        parent: Rect,
        children: &[LayoutChild],
        mut set_rect: impl FnMut(usize, Rect),
    ) {
        let axis = self.axis;
        let cross = axis.cross();
        let inner = parent.deflated(self.padding);
        let avail_main = inner.size().get(axis);
        let avail_cross = inner.size().get(cross);

        let mut items = measure_children(children, inner.size());
        let (mut total, _) = self.extents(&items);
        if has_flex(&items) {
            distribute_flex(&mut items, axis, (avail_main - total).max(0.0));
            total = self.extents(&items).0.max(avail_main);
        }
        let (_, max_cross) = self.extents(&items);

        let mut main = (avail_main - total) * self.main_ratio;
        let block_cross = (avail_cross - max_cross) * self.cross_ratio;
        for item in &items {
            let margin = item.constraint.margin;
            let cross_off = block_cross + (max_cross - item.full(cross)) * self.cross_ratio;
            let offset = Vec2::from_main_cross(
                axis,
                main + margin.start(axis),
                cross_off + margin.start(cross),
            );
            set_rect(item.index, Rect::from_pos_size(inner.pos() + offset, item.size));
            main += item.full(axis) + self.spacing;
        }

        place_anchors(parent, children, &mut set_rect);
    }

    /// Size needed to contain all box children without flex growth.
    fn fitting_size(&self, parent: Rect, children: &[LayoutChild]) -> Vec2 {
        let inner = parent.deflated(self.padding);
        let items = measure_children(children, inner.size());
        let (total, max_cross) = self.extents(&items);
        Vec2::from_main_cross(
            self.axis,
            total + self.padding.along(self.axis),
            max_cross + self.padding.along(self.axis.cross()),
        )
    }
}

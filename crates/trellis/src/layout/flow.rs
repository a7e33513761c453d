use serde::{Deserialize, Serialize};

use super::{
    HorizontalAlign, LayoutChild, VerticalAlign,
    linear::{MeasuredChild, measure_children, place_anchors},
};
use crate::geom::{Axis, Inset, Rect, Vec2};

/// Tolerance for line-break comparisons, so that children that exactly fill
/// a line are not pushed down by rounding error.
const BREAK_EPSILON: f64 = 1e-6;

/// Pack children left to right into lines, wrapping at the available width.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowLayout {
    /// Inner padding.
    pub padding: Inset,
    /// Gap between children in a line (`x`) and between lines (`y`).
    pub spacing: Vec2,
    /// Alignment of each line within the available width.
    pub horizontal_align: HorizontalAlign,
    /// Alignment of the block of lines within the available height, and of
    /// each child within its line.
    pub vertical_align: VerticalAlign,
}

/// One measured line.
#[derive(Debug, Clone, Copy, Default)]
struct Line {
    /// First item in the line.
    start: usize,
    /// One past the last item in the line.
    end: usize,
    /// Accumulated width, spacing included.
    width: f64,
    /// Tallest item, margins included.
    height: f64,
}

impl FlowLayout {
    /// Break measured items into lines that fit `avail_width`. A line always
    /// holds at least one item.
    fn break_lines(&self, items: &[MeasuredChild], avail_width: f64) -> Vec<Line> {
        let mut lines: Vec<Line> = Vec::new();
        let mut cur = Line::default();
        for (i, item) in items.iter().enumerate() {
            let w = item.full(Axis::Horizontal);
            let h = item.full(Axis::Vertical);
            let empty = cur.end == cur.start;
            if !empty && cur.width + self.spacing.x + w > avail_width + BREAK_EPSILON {
                lines.push(cur);
                cur = Line {
                    start: i,
                    end: i,
                    ..Line::default()
                };
            }
            if cur.end > cur.start {
                cur.width += self.spacing.x;
            }
            cur.width += w;
            cur.height = cur.height.max(h);
            cur.end = i + 1;
        }
        if cur.end > cur.start {
            lines.push(cur);
        }
        lines
    }

    /// Total height of a set of lines, spacing included.
    fn block_height(&self, lines: &[Line]) -> f64 {
        let gaps = lines.len().saturating_sub(1) as f64;
        lines.iter().map(|l| l.height).sum::<f64>() + gaps * self.spacing.y
    }

    /// Assign each active child its rectangle.
    pub fn execute(
        &self,
        parent: Rect,
        children: &[LayoutChild],
        mut set_rect: impl FnMut(usize, Rect),
    ) {
        let inner = parent.deflated(self.padding);
        let items = measure_children(children, inner.size());
        let lines = self.break_lines(&items, inner.w);

        let h_ratio = self.horizontal_align.ratio();
        let v_ratio = self.vertical_align.ratio();
        let mut y = (inner.h - self.block_height(&lines)) * v_ratio;
        for line in &lines {
            let mut x = (inner.w - line.width) * h_ratio;
            for item in &items[line.start..line.end] {
                let margin = item.constraint.margin;
                let dy = (line.height - item.full(Axis::Vertical)) * v_ratio;
                let offset = Vec2::new(x + margin.left, y + dy + margin.top);
                set_rect(item.index, Rect::from_pos_size(inner.pos() + offset, item.size));
                x += item.full(Axis::Horizontal) + self.spacing.x;
            }
            y += line.height + self.spacing.y;
        }

        place_anchors(parent, children, &mut set_rect);
    }

    /// Size needed to contain the box children, padding included. Lines are
    /// broken against the width of `parent`.
    pub fn fitting_size(&self, parent: Rect, children: &[LayoutChild]) -> Vec2 {
        let inner = parent.deflated(self.padding);
        let items = measure_children(children, inner.size());
        let lines = self.break_lines(&items, inner.w);
        let width = lines.iter().map(|l| l.width).fold(0.0, f64::max);
        Vec2::new(
            width + self.padding.horizontal(),
            self.block_height(&lines) + self.padding.vertical(),
        )
    }
}

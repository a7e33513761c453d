//! Per-frame scroll input and physics.

use crate::{
    core::{canvas::Canvas, id::NodeId},
    geom::Vec2,
    scroll::{decay_velocity, resist_drag, rubber_band_step, stop_outward_velocity},
};

/// A drag scroll in progress. Created when the left button goes down over a
/// drag-scrollable node; it only moves content once the pointer has travelled
/// past the configured threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DragScroll {
    /// Node being scrolled.
    pub(crate) node: NodeId,
    /// Pointer position when the button went down.
    pub(crate) start_cursor: Vec2,
    /// Pointer position on the previous frame.
    pub(crate) last_cursor: Vec2,
    /// The threshold was crossed and content follows the pointer.
    pub(crate) started: bool,
    /// Smoothed pointer velocity in pixels per second.
    pub(crate) velocity: Vec2,
}

impl DragScroll {
    /// Is content following the pointer?
    pub(crate) fn is_active(&self) -> bool {
        self.started
    }
}

/// Nearest active ancestor-or-self of `start` accepted by `pred`.
fn nearest(
    canvas: &Canvas,
    start: Option<NodeId>,
    pred: impl Fn(NodeId) -> bool,
) -> Option<NodeId> {
    let mut cur = start;
    while let Some(id) = cur {
        let node = canvas.nodes.get(id)?;
        if node.active_in_hierarchy && pred(id) {
            return Some(id);
        }
        cur = node.parent;
    }
    None
}

/// Route wheel input to the nearest wheel-scrollable node under the pointer
/// that can still move in the wheel direction.
pub(crate) fn apply_wheel(canvas: &mut Canvas, hit: Option<NodeId>, wheel: Vec2) {
    if wheel.is_zero() {
        return;
    }
    let delta = -wheel * canvas.config.wheel_scroll_speed;
    let target = nearest(canvas, hit, |id| {
        canvas.nodes.get(id).is_some_and(|n| {
            n.wheel_scroll_enabled
                && n.scrollable.any()
                && n.scroll_range().can_move(n.scroll_offset, n.scrollable.mask(delta))
        })
    });
    let Some(id) = target else {
        return;
    };
    if let Some(n) = canvas.nodes.get_mut(id) {
        let range = n.scroll_range();
        n.scroll_offset = range.clamp(n.scroll_offset + n.scrollable.mask(delta));
        n.scroll_velocity = Vec2::ZERO;
    }
    canvas.frame.wheel_scroll_node = Some(id);
    canvas.layout_dirty = true;
}

/// Begin, advance or abandon a drag scroll from this frame's left button.
pub(crate) fn update_drag(canvas: &mut Canvas, hit: Option<NodeId>) {
    let input = canvas.input;
    if input.left.down {
        let target = nearest(canvas, hit, |id| {
            canvas
                .nodes
                .get(id)
                .is_some_and(|n| n.drag_scroll_enabled && n.scrollable.any())
        });
        canvas.drag = target.map(|node| DragScroll {
            node,
            start_cursor: input.cursor,
            last_cursor: input.cursor,
            started: false,
            velocity: Vec2::ZERO,
        });
        if let Some(n) = target.and_then(|id| canvas.nodes.get_mut(id)) {
            n.scroll_velocity = Vec2::ZERO;
        }
        return;
    }

    let Some(mut drag) = canvas.drag else {
        return;
    };
    if !input.left.pressed && !input.left.up {
        canvas.drag = None;
        return;
    }
    let Some(node) = canvas.nodes.get_mut(drag.node) else {
        canvas.drag = None;
        return;
    };
    if !node.active_in_hierarchy {
        canvas.drag = None;
        return;
    }

    if !drag.started {
        if node.prevent_drag_scroll {
            canvas.drag = None;
            return;
        }
        let travelled = (input.cursor - drag.start_cursor).length();
        if travelled < canvas.config.drag_scroll_threshold {
            canvas.drag = Some(drag);
            return;
        }
        drag.started = true;
        drag.last_cursor = drag.start_cursor;
        tracing::debug!(node = ?drag.node, "drag scroll start");
    }

    let dt = canvas.delta_time;
    let range = node.scroll_range();
    let raw = node.scrollable.mask(input.cursor - drag.last_cursor);
    let delta = if node.rubber_band_scroll_enabled {
        resist_drag(
            &range,
            node.scroll_offset,
            raw,
            canvas.config.rubber_band_drag_resistance,
        )
    } else {
        raw
    };
    let mut offset = node.scroll_offset + delta;
    if !node.rubber_band_scroll_enabled {
        offset = range.clamp(offset);
    }
    if offset != node.scroll_offset {
        node.scroll_offset = offset;
        canvas.layout_dirty = true;
    }
    if dt > 0.0 {
        let sample = raw / dt;
        drag.velocity = drag.velocity.lerp(sample, canvas.config.velocity_smoothing);
    }
    drag.last_cursor = input.cursor;
    canvas.frame.drag_scroll_node = Some(drag.node);
    canvas.drag = Some(drag);
}

/// Finish a drag on button release, handing its velocity to inertia.
pub(crate) fn end_drag(canvas: &mut Canvas) {
    let Some(drag) = canvas.drag.take() else {
        return;
    };
    if !drag.started {
        return;
    }
    if let Some(n) = canvas.nodes.get_mut(drag.node) {
        n.scroll_velocity = n.scrollable.mask(drag.velocity);
    }
    tracing::debug!(node = ?drag.node, velocity = ?drag.velocity, "drag scroll end");
}

/// Advance inertia and rubber-band motion for every scrollable node not
/// being dragged.
pub(crate) fn step_physics(canvas: &mut Canvas) {
    let dt = canvas.delta_time;
    if dt <= 0.0 {
        return;
    }
    let dragged = canvas
        .drag
        .filter(DragScroll::is_active)
        .map(|d| d.node);
    let cfg = canvas.config;
    let mut moved = false;
    for (id, n) in canvas.nodes.iter_mut() {
        if !n.active_in_hierarchy || !n.scrollable.any() || Some(id) == dragged {
            continue;
        }
        let range = n.scroll_range();
        let mut offset = n.scroll_offset;
        let mut velocity = n.scroll_velocity;

        if !velocity.is_zero() {
            velocity = decay_velocity(velocity, n.deceleration_rate, dt);
            if velocity.length() < cfg.velocity_stop_threshold {
                velocity = Vec2::ZERO;
            } else {
                let before = offset;
                offset += n.scrollable.mask(velocity * dt);
                if !n.rubber_band_scroll_enabled {
                    offset = range.clamp(offset);
                }
                if (offset - before).length() < cfg.applied_delta_epsilon {
                    velocity = Vec2::ZERO;
                }
                velocity = stop_outward_velocity(&range, offset, velocity);
            }
        }

        if n.rubber_band_scroll_enabled && !range.contains(offset) {
            offset = rubber_band_step(
                &range,
                offset,
                cfg.rubber_band_return_speed,
                dt,
                cfg.rubber_band_snap_threshold,
            );
        }

        n.scroll_velocity = velocity;
        if offset != n.scroll_offset {
            n.scroll_offset = offset;
            moved = true;
        }
    }
    if moved {
        canvas.layout_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constraint::BoxConstraint,
        error::Result,
        layout::{Layout, VerticalLayout},
        scroll::ScrollableAxis,
    };

    /// A 100x200 vertical scroller at the origin holding 500px of content.
    fn scroller() -> Result<(Canvas, NodeId)> {
        let mut canvas = Canvas::new(Vec2::new(400.0, 400.0));
        let root = canvas.root();
        let list = canvas.create_node_with(
            "list",
            BoxConstraint::fixed(100.0, 200.0).into(),
            Layout::Vertical(VerticalLayout::default()),
        );
        canvas.add_child(root, list)?;
        canvas.set_scrollable(list, ScrollableAxis::VERTICAL)?;
        let item = canvas.create_node_with(
            "item",
            BoxConstraint::fixed(100.0, 500.0).into(),
            Layout::default(),
        );
        canvas.add_child(list, item)?;
        canvas.refresh_layout()?;
        Ok((canvas, list))
    }

    #[test]
    fn wheel_routes_to_scroller() -> Result<()> {
        let (mut canvas, list) = scroller()?;
        let item = canvas.child_at(list, 0)?;
        apply_wheel(&mut canvas, Some(item), Vec2::new(0.0, 1.0));
        assert_eq!(canvas.frame.wheel_scroll_node, Some(list));
        assert_eq!(canvas.get(list)?.scroll_offset().y, -canvas.config.wheel_scroll_speed);
        Ok(())
    }

    #[test]
    fn wheel_at_edge_is_not_consumed() -> Result<()> {
        let (mut canvas, list) = scroller()?;
        apply_wheel(&mut canvas, Some(list), Vec2::new(0.0, -1.0));
        assert_eq!(canvas.frame.wheel_scroll_node, None);
        assert_eq!(canvas.get(list)?.scroll_offset(), Vec2::ZERO);
        Ok(())
    }

    #[test]
    fn inertia_decays_to_rest() -> Result<()> {
        let (mut canvas, list) = scroller()?;
        canvas.set_rubber_band_scroll_enabled(list, false)?;
        if let Some(n) = canvas.nodes.get_mut(list) {
            n.scroll_velocity = Vec2::new(0.0, -400.0);
        }
        canvas.delta_time = 1.0 / 60.0;
        for _ in 0..600 {
            step_physics(&mut canvas);
            canvas.refresh_layout()?;
        }
        let n = canvas.get(list)?;
        assert_eq!(n.scroll_velocity(), Vec2::ZERO);
        assert!(n.scroll_offset().y < 0.0);
        assert!(n.scroll_offset().y >= -300.0);
        Ok(())
    }

    #[test]
    fn rubber_band_returns() -> Result<()> {
        let (mut canvas, list) = scroller()?;
        if let Some(n) = canvas.nodes.get_mut(list) {
            n.scroll_offset = Vec2::new(0.0, 60.0);
        }
        canvas.delta_time = 1.0 / 60.0;
        for _ in 0..300 {
            step_physics(&mut canvas);
        }
        assert_eq!(canvas.get(list)?.scroll_offset(), Vec2::ZERO);
        Ok(())
    }
}

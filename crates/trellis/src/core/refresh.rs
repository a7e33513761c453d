//! Layout refresh.
//!
//! A refresh walks the tree top-down. Each node runs its layout over its
//! children, offsets box children by its scroll, recurses, and finally clamps
//! its own scroll against the content bounds the children now occupy. When
//! the clamp moves the offset, the node's subtree is laid out again; the
//! number of re-runs is bounded by the canvas configuration.

use crate::{
    core::{canvas::Canvas, id::NodeId},
    error::{Error, Result},
    geom::{Rect, Vec2},
    layout::{self, LayoutChild},
};

/// State for one layout refresh.
pub(crate) struct LayoutPass<'a> {
    /// Canvas being refreshed.
    canvas: &'a mut Canvas,
    /// Maximum clamp-triggered re-runs per node.
    max_passes: usize,
}

impl<'a> LayoutPass<'a> {
    /// Start a pass over `canvas`.
    pub(crate) fn new(canvas: &'a mut Canvas) -> Self {
        let max_passes = canvas.config.max_settle_passes.max(1);
        Self { canvas, max_passes }
    }

    /// Place the root against the canvas bounds and lay out the whole tree.
    pub(crate) fn refresh_root(&mut self) -> Result<()> {
        let root = self.canvas.root;
        let bounds = Rect::from_pos_size(Vec2::ZERO, self.canvas.size);
        let node = self
            .canvas
            .nodes
            .get_mut(root)
            .ok_or(Error::NodeNotFound(root))?;
        let rect = node.constraint.apply(bounds, Vec2::ZERO).non_negative();
        node.layout_applied_rect = rect;
        node.rect = rect;
        self.refresh_node(root)
    }

    /// Lay out the subtree below `id`, keeping `id`'s own rect.
    pub(crate) fn refresh_node(&mut self, id: NodeId) -> Result<()> {
        self.settle(id).map(|_| ())
    }

    /// Lay out `id`'s children, re-running whenever the scroll clamp moves
    /// the offset. A layout run always follows the last clamp, so box
    /// children end up placed against the final offset. Returns the number
    /// of layout runs.
    fn settle(&mut self, id: NodeId) -> Result<usize> {
        self.layout_children(id)?;
        let mut runs = 1;
        while self.clamp_scroll(id)? {
            if runs > self.max_passes {
                tracing::warn!(?id, passes = self.max_passes, "scroll offset did not settle");
                self.layout_children(id)?;
                return Ok(runs + 1);
            }
            tracing::debug!(?id, runs, "scroll clamp moved offset, re-running layout");
            self.layout_children(id)?;
            runs += 1;
        }
        Ok(runs)
    }

    /// Apply `id`'s layout to its children and recurse into the active ones.
    fn layout_children(&mut self, id: NodeId) -> Result<()> {
        let node = self.canvas.nodes.get(id).ok_or(Error::NodeNotFound(id))?;
        let parent_rect = node.rect;
        let node_layout = node.layout;
        let offset = node.scroll_offset;
        let children = node.children.clone();
        if children.is_empty() {
            return Ok(());
        }

        let specs = children
            .iter()
            .map(|c| {
                self.canvas
                    .nodes
                    .get(*c)
                    .map(|n| LayoutChild {
                        constraint: n.constraint,
                        active: n.active_self,
                    })
                    .ok_or(Error::NodeNotFound(*c))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut applied = vec![None; children.len()];
        node_layout.execute(parent_rect, &specs, |i, r| applied[i] = Some(r));

        for (child, rect) in children.iter().zip(applied) {
            let Some(rect) = rect else {
                continue;
            };
            let rect = rect.non_negative();
            if let Some(n) = self.canvas.nodes.get_mut(*child) {
                n.layout_applied_rect = rect;
                n.rect = if n.constraint.is_box() {
                    rect.moved_by(offset)
                } else {
                    rect
                };
            }
        }

        for child in &children {
            let active = self.canvas.nodes.get(*child).is_some_and(|n| n.active_self);
            if active {
                self.refresh_node(*child)?;
            }
        }
        Ok(())
    }

    /// Recompute `id`'s content bounds and clamp its scroll offset. Returns
    /// whether the offset changed.
    fn clamp_scroll(&mut self, id: NodeId) -> Result<bool> {
        let node = self.canvas.nodes.get(id).ok_or(Error::NodeNotFound(id))?;
        let padding = node.layout.padding();
        let children = node
            .children
            .iter()
            .filter_map(|c| self.canvas.nodes.get(*c))
            .filter(|c| c.active_self)
            .map(|c| (c.constraint, c.layout_applied_rect))
            .collect::<Vec<_>>();
        let content = layout::content_rect(padding, children);

        let node = self
            .canvas
            .nodes
            .get_mut(id)
            .ok_or(Error::NodeNotFound(id))?;
        node.content_rect = content;

        let range = node.scroll_range();
        let offset = node.scroll_offset;
        if node.rubber_band_scroll_enabled && !range.contains(offset) {
            return Ok(false);
        }
        let clamped = range.clamp(offset);
        if clamped == offset {
            return Ok(false);
        }
        node.scroll_offset = clamped;
        Ok(true)
    }
}

use std::iter;

use serde_json::Value;
use slotmap::SlotMap;

use crate::{
    component::{self, Component, ComponentFactory, Hook, run_hook},
    config::CanvasConfig,
    constraint::{AnchorConstraint, BoxConstraint, Constraint},
    core::{
        context::{CanvasUpdateContext, FrameInput, NodeContext},
        id::NodeId,
        interact,
        node::Node,
        refresh::LayoutPass,
        scrolling::{self, DragScroll},
    },
    error::{Error, Result},
    geom::{Axis, Inset, Rect, Vec2},
    interaction::{InheritChildrenStateFlags, MouseButton},
    layout::{Layout, LayoutChild},
    persist::{self, SaveOptions},
    scroll::ScrollableAxis,
};

/// Axes resized by [`Canvas::fit_region_to_children`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitTarget {
    /// Fit the width only.
    Width,
    /// Fit the height only.
    Height,
    /// Fit both axes.
    Both,
}

impl FitTarget {
    /// The axes this target covers.
    fn axes(self) -> &'static [Axis] {
        match self {
            Self::Width => &[Axis::Horizontal],
            Self::Height => &[Axis::Vertical],
            Self::Both => &[Axis::Horizontal, Axis::Vertical],
        }
    }
}

/// One entry of [`Canvas::draw_order`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Node to draw.
    pub node: NodeId,
    /// Depth below the root.
    pub depth: usize,
    /// Final rectangle.
    pub rect: Rect,
    /// Clip rectangle inherited from clipping ancestors, if any.
    pub clip: Option<Rect>,
}

/// The node arena and frame driver.
///
/// A canvas owns every node. Nodes are created detached and become part of
/// the scene once attached below the root. [`Canvas::update`] runs one frame:
/// hit testing, interaction states, component hooks, scrolling and layout.
pub struct Canvas {
    /// Node storage.
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Root node, sized to the canvas.
    pub(crate) root: NodeId,
    /// Canvas size in pixels.
    pub(crate) size: Vec2,
    /// Tunables.
    pub(crate) config: CanvasConfig,
    /// A layout input changed since the last refresh.
    pub(crate) layout_dirty: bool,
    /// Pointer results for the current frame.
    pub(crate) frame: CanvasUpdateContext,
    /// Pointer results for the previous frame.
    pub(crate) prev_frame: CanvasUpdateContext,
    /// Input for the current frame.
    pub(crate) input: FrameInput,
    /// Seconds since the previous frame.
    pub(crate) delta_time: f64,
    /// Drag scroll in progress.
    pub(crate) drag: Option<DragScroll>,
    /// Completed frames.
    pub(crate) frame_count: u64,
}

impl Canvas {
    /// Create a canvas of `size` with an empty root that stretches over it.
    pub fn new(size: Vec2) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = Node::new(
            "root",
            AnchorConstraint::stretch(Inset::ZERO).into(),
            Layout::default(),
        );
        root.is_hit_target = false;
        let root = nodes.insert(root);
        Self {
            nodes,
            root,
            size,
            config: CanvasConfig::default(),
            layout_dirty: true,
            frame: CanvasUpdateContext::default(),
            prev_frame: CanvasUpdateContext::default(),
            input: FrameInput::default(),
            delta_time: 0.0,
            drag: None,
            frame_count: 0,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: CanvasConfig) -> Self {
        self.config = config;
        self.layout_dirty = true;
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Canvas size in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Change the canvas size. Layout is refreshed on the next frame.
    pub fn resize(&mut self, size: Vec2) {
        if self.size != size {
            tracing::debug!(?size, "canvas resized");
            self.size = size;
            self.layout_dirty = true;
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node, failing if it does not exist.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id).ok_or(Error::NodeNotFound(id))
    }

    /// Mutable node lookup.
    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(id).ok_or(Error::NodeNotFound(id))
    }

    /// Number of live nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Does `id` refer to a live node?
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Seconds since the previous frame.
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Input of the current frame.
    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    /// Pointer results of the current frame.
    pub fn frame(&self) -> &CanvasUpdateContext {
        &self.frame
    }

    /// Pointer results of the previous frame.
    pub fn prev_frame(&self) -> &CanvasUpdateContext {
        &self.prev_frame
    }

    /// Number of completed frames.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Does the layout need a refresh?
    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    /// Create a detached node with a default box constraint and flow layout.
    pub fn create_node(&mut self, name: &str) -> NodeId {
        self.create_node_with(name, Constraint::default(), Layout::default())
    }

    /// Create a detached node.
    pub fn create_node_with(
        &mut self,
        name: &str,
        constraint: Constraint,
        layout: Layout,
    ) -> NodeId {
        let id = self.nodes.insert(Node::new(name, constraint, layout));
        tracing::trace!(?id, name, "node created");
        id
    }

    /// Attach `child` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.get(parent)?.children.len();
        self.add_child_at(parent, child, index)
    }

    /// Attach `child` at `index` among `parent`'s children.
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        let len = self.get(parent)?.children.len();
        let child_parent = self.get(child)?.parent;
        if child == self.root {
            return Err(Error::CannotRemoveRoot);
        }
        if child == parent {
            return Err(Error::AttachToSelf(child));
        }
        if child_parent.is_some() {
            return Err(Error::AlreadyAttached(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(Error::WouldCreateCycle { parent, child });
        }
        if index > len {
            return Err(Error::ChildIndexOutOfRange { parent, index, len });
        }
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        self.layout_dirty = true;
        self.sync_hierarchy(child)
    }

    /// Detach `child` from `parent`, keeping it alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.get(child)?;
        if !self.get(parent)?.children.contains(&child) {
            return Err(Error::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Detach `id` from its parent, keeping it alive. Detaching a detached
    /// node does nothing.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::CannotRemoveRoot);
        }
        let Some(parent) = self.get(id)?.parent else {
            return Ok(());
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        self.node_mut(id)?.parent = None;
        self.layout_dirty = true;
        self.sync_hierarchy(id)
    }

    /// Remove `id` and all of its descendants. Active nodes receive their
    /// deactivation hooks first, deepest first.
    pub fn remove_subtree(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(Error::CannotRemoveRoot);
        }
        self.get(id)?;
        for n in self.subtree(id).into_iter().rev() {
            if self.nodes.get(n).is_some_and(|n| n.active_in_hierarchy) {
                run_hook(self, n, Hook::Deactivated)?;
            }
        }
        if !self.contains(id) {
            return Ok(());
        }
        let parent = self.get(id)?.parent;
        if let Some(parent) = parent
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        let removed = self.subtree(id);
        if self.drag.is_some_and(|d| removed.contains(&d.node)) {
            self.drag = None;
        }
        for n in &removed {
            self.nodes.remove(*n);
        }
        tracing::debug!(?id, count = removed.len(), "subtree removed");
        self.layout_dirty = true;
        Ok(())
    }

    /// `id` and its descendants in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.nodes.get(cur) else {
                continue;
            };
            out.push(cur);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Child of `parent` at `index`.
    pub fn child_at(&self, parent: NodeId, index: usize) -> Result<NodeId> {
        let children = &self.get(parent)?.children;
        children
            .get(index)
            .copied()
            .ok_or(Error::ChildIndexOutOfRange {
                parent,
                index,
                len: children.len(),
            })
    }

    /// Position of `child` among `parent`'s children.
    pub fn index_of_child(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.get(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(Error::NotAChild { parent, child })
    }

    /// Is `child` a direct child of `parent`?
    pub fn contains_child(&self, parent: NodeId, child: NodeId) -> bool {
        self.nodes
            .get(parent)
            .is_some_and(|p| p.children.contains(&child))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.nodes.get(id).and_then(|n| n.parent), |p| {
            self.nodes.get(*p).and_then(|n| n.parent)
        })
    }

    /// Is `ancestor` a strict ancestor of `id`?
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// First descendant of `start` named `name`, in pre-order. `start` itself
    /// is not considered.
    pub fn find_by_name(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.subtree(start)
            .into_iter()
            .skip(1)
            .find(|id| self.nodes.get(*id).is_some_and(|n| n.name == name))
    }

    /// Direct child of `parent` named `name`.
    pub fn child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes.get(parent)?.children.iter().copied().find(|c| {
            self.nodes.get(*c).is_some_and(|n| n.name == name)
        })
    }

    /// Update a node field and mark the layout dirty.
    fn modify(&mut self, id: NodeId, f: impl FnOnce(&mut Node)) -> Result<()> {
        f(self.node_mut(id)?);
        self.layout_dirty = true;
        Ok(())
    }

    /// Rename a node.
    pub fn set_name(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.modify(id, |n| n.name = name.to_string())
    }

    /// Replace a node's constraint.
    pub fn set_constraint(&mut self, id: NodeId, constraint: Constraint) -> Result<()> {
        self.modify(id, |n| n.constraint = constraint)
    }

    /// Replace a node's constraint with a box constraint.
    pub fn set_box_constraint(&mut self, id: NodeId, constraint: BoxConstraint) -> Result<()> {
        self.set_constraint(id, constraint.into())
    }

    /// Replace a node's constraint with an anchor constraint.
    pub fn set_anchor_constraint(
        &mut self,
        id: NodeId,
        constraint: AnchorConstraint,
    ) -> Result<()> {
        self.set_constraint(id, constraint.into())
    }

    /// Replace the layout applied to a node's box children.
    pub fn set_layout(&mut self, id: NodeId, layout: impl Into<Layout>) -> Result<()> {
        let layout = layout.into();
        self.modify(id, |n| n.layout = layout)
    }

    /// Make a node hit-testable or not.
    pub fn set_hit_target(&mut self, id: NodeId, hit_target: bool) -> Result<()> {
        self.modify(id, |n| n.is_hit_target = hit_target)
    }

    /// Grow the hit area beyond the node rect.
    pub fn set_hit_test_padding(&mut self, id: NodeId, padding: Inset) -> Result<()> {
        self.modify(id, |n| n.hit_test_padding = padding)
    }

    /// Enable or disable interaction for a node and its subtree.
    pub fn set_interactable(&mut self, id: NodeId, interactable: bool) -> Result<()> {
        self.modify(id, |n| n.interactable = interactable)
    }

    /// Choose which child states a node adopts.
    pub fn set_inherit_children_state(
        &mut self,
        id: NodeId,
        flags: InheritChildrenStateFlags,
    ) -> Result<()> {
        self.modify(id, |n| n.inherit_children_state = flags)
    }

    /// Choose the axes a node scrolls on. Offsets along disabled axes are
    /// reset.
    pub fn set_scrollable(&mut self, id: NodeId, axes: ScrollableAxis) -> Result<()> {
        self.modify(id, |n| {
            n.scrollable = axes;
            n.scroll_offset = axes.mask(n.scroll_offset);
            n.scroll_velocity = axes.mask(n.scroll_velocity);
        })
    }

    /// Toggle wheel scrolling.
    pub fn set_wheel_scroll_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.modify(id, |n| n.wheel_scroll_enabled = enabled)
    }

    /// Toggle drag scrolling.
    pub fn set_drag_scroll_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.modify(id, |n| n.drag_scroll_enabled = enabled)
    }

    /// Fraction of inertia velocity kept per second.
    pub fn set_deceleration_rate(&mut self, id: NodeId, rate: f64) -> Result<()> {
        self.modify(id, |n| n.deceleration_rate = rate.clamp(0.0, 1.0))
    }

    /// Toggle elastic overscroll.
    pub fn set_rubber_band_scroll_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.modify(id, |n| n.rubber_band_scroll_enabled = enabled)
    }

    /// Toggle clipping of descendants to the node rect.
    pub fn set_clipping_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.modify(id, |n| n.clipping_enabled = enabled)
    }

    /// Set or clear the node's style state label.
    pub fn set_style_state(&mut self, id: NodeId, state: Option<&str>) -> Result<()> {
        self.modify(id, |n| n.style_state = state.map(str::to_string))
    }

    /// Activate or deactivate a node. Activation hooks fire for every node
    /// whose effective activity changes.
    pub fn set_active(&mut self, id: NodeId, active: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if node.active_self == active {
            return Ok(());
        }
        node.active_self = active;
        self.layout_dirty = true;
        tracing::debug!(?id, active, "active changed");
        self.sync_hierarchy(id)
    }

    /// Recompute effective activity below and including `id`, then run the
    /// matching hooks.
    fn sync_hierarchy(&mut self, id: NodeId) -> Result<()> {
        let parent_active = match self.get(id)?.parent {
            Some(p) => self.get(p)?.active_in_hierarchy,
            None => true,
        };
        let mut activated = Vec::new();
        let mut deactivated = Vec::new();
        let mut stack = vec![(id, parent_active)];
        while let Some((cur, parent_active)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(cur) else {
                continue;
            };
            let active = parent_active && node.active_self;
            if active != node.active_in_hierarchy {
                node.active_in_hierarchy = active;
                if active {
                    activated.push(cur);
                } else {
                    node.reset_interaction();
                    node.scroll_velocity = Vec2::ZERO;
                    node.prevent_drag_scroll = false;
                    deactivated.push(cur);
                }
            }
            stack.extend(node.children.iter().rev().map(|c| (*c, active)));
        }
        if self.drag.is_some_and(|d| deactivated.contains(&d.node)) {
            self.drag = None;
        }
        for n in deactivated {
            run_hook(self, n, Hook::Deactivated)?;
        }
        for n in activated {
            run_hook(self, n, Hook::Activated)?;
        }
        Ok(())
    }

    /// Style state labels of `id` and its ancestors, nearest first.
    pub fn active_style_states(&self, id: NodeId) -> Result<Vec<String>> {
        let own = self.get(id)?.style_state.clone();
        Ok(own
            .into_iter()
            .chain(
                self.ancestors(id)
                    .filter_map(|a| self.nodes.get(a).and_then(|n| n.style_state.clone())),
            )
            .collect())
    }

    /// Resize a node so that it wraps its children, using its layout's fitting
    /// size against the current rect. Box constraints lose their relative
    /// size on the fitted axes; anchor constraints collapse their anchors.
    /// Returns the fitted size.
    pub fn fit_region_to_children(&mut self, id: NodeId, target: FitTarget) -> Result<Vec2> {
        let node = self.get(id)?;
        let specs = node
            .children
            .iter()
            .filter_map(|c| self.nodes.get(*c))
            .map(|c| LayoutChild {
                constraint: c.constraint,
                active: c.active_self,
            })
            .collect::<Vec<_>>();
        let size = node.layout.fitting_size(node.rect, &specs);
        self.modify(id, |n| {
            for axis in target.axes() {
                let value = size.get(*axis);
                match &mut n.constraint {
                    Constraint::Box(c) => {
                        c.size_ratio.set(*axis, 0.0);
                        c.size_delta.set(*axis, value);
                    }
                    Constraint::Anchor(c) => {
                        let min = c.anchor_min.get(*axis);
                        c.anchor_max.set(*axis, min);
                        c.size_delta.set(*axis, value);
                    }
                }
            }
        })?;
        Ok(size)
    }

    /// Fire a synthetic click on `id` during the next interaction pass.
    pub fn request_click(&mut self, id: NodeId, button: MouseButton) -> Result<()> {
        self.node_mut(id)?.buttons[button.index()].click_requested = true;
        Ok(())
    }

    /// Suppress drag scrolling of `id` and its ancestors until the left
    /// button is released. Ignored unless the left button is held.
    pub fn prevent_drag_scroll(&mut self, id: NodeId) -> Result<()> {
        let held = self.input.left.pressed || self.input.left.down;
        let node = self.node_mut(id)?;
        if !held {
            tracing::trace!(?id, "drag scroll prevention without a held button ignored");
            return Ok(());
        }
        node.prevent_drag_scroll = true;
        let ancestors = self.ancestors(id).collect::<Vec<_>>();
        for a in ancestors {
            self.node_mut(a)?.prevent_drag_scroll = true;
        }
        Ok(())
    }

    /// Move a node's content by `delta`, clamped to the scroll range, and lay
    /// out its subtree again. Inertia is cancelled.
    pub fn scroll(&mut self, id: NodeId, delta: Vec2) -> Result<()> {
        if self.layout_dirty {
            self.refresh_layout()?;
        }
        let node = self.node_mut(id)?;
        let range = node.scroll_range();
        node.scroll_offset = range.clamp(node.scroll_offset + node.scrollable.mask(delta));
        node.scroll_velocity = Vec2::ZERO;
        LayoutPass::new(self).refresh_node(id)
    }

    /// Attach a component. If the node is active the component's activation
    /// hook runs before it is stored.
    pub fn add_component(&mut self, id: NodeId, component: impl Component + 'static) -> Result<()> {
        self.add_boxed_component(id, Box::new(component))
    }

    /// Attach an already boxed component.
    pub fn add_boxed_component(
        &mut self,
        id: NodeId,
        mut component: Box<dyn Component>,
    ) -> Result<()> {
        if self.get(id)?.active_in_hierarchy {
            let mut ctx = NodeContext::new(self, id);
            component.on_activated(&mut ctx)?;
        }
        self.node_mut(id)?.components.push(component);
        Ok(())
    }

    /// First component of type `T` on `id`. While `id`'s own hooks run its
    /// components are out of the node and this returns `None`.
    pub fn component<T: Component + 'static>(&self, id: NodeId) -> Option<&T> {
        self.nodes
            .get(id)?
            .components
            .iter()
            .find_map(|c| component::downcast_ref::<T>(&**c))
    }

    /// Mutable access to the first component of type `T` on `id`.
    pub fn component_mut<T: Component + 'static>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes
            .get_mut(id)?
            .components
            .iter_mut()
            .find_map(|c| component::downcast_mut::<T>(&mut **c))
    }

    /// Drop every component of type `T` from `id` without running hooks.
    /// Returns how many were removed. Fails with
    /// [`Error::ComponentsInUse`] when called from one of `id`'s own hooks.
    pub fn remove_components_of<T: Component + 'static>(&mut self, id: NodeId) -> Result<usize> {
        let node = self.node_mut(id)?;
        if node.hooks_running {
            return Err(Error::ComponentsInUse(id));
        }
        let before = node.components.len();
        node.components.retain(|c| !c.as_any().is::<T>());
        Ok(before - node.components.len())
    }

    /// Lay out the whole tree.
    pub fn refresh_layout(&mut self) -> Result<()> {
        LayoutPass::new(self).refresh_root()?;
        self.layout_dirty = false;
        Ok(())
    }

    /// Topmost active hit target under `point`. Children are tested before
    /// their parents, later siblings before earlier ones. Clipping ancestors
    /// hide whatever falls outside them.
    pub fn hit_test(&self, point: Vec2) -> Option<NodeId> {
        self.hit_node(self.root, point, None)
    }

    /// Hit test below and including `id`.
    fn hit_node(&self, id: NodeId, point: Vec2, clip: Option<Rect>) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if !node.active_in_hierarchy {
            return None;
        }
        if let Some(child_clip) = child_clip(node, clip) {
            for child in node.children.iter().rev() {
                if let Some(hit) = self.hit_node(*child, point, child_clip) {
                    return Some(hit);
                }
            }
        }
        let visible = clip.is_none_or(|c| c.contains(point));
        (node.is_hit_target && visible && node.hit_rect().contains(point)).then_some(id)
    }

    /// Active nodes in paint order, parents before children.
    pub fn draw_order(&self) -> Vec<DrawItem> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, 0, None)];
        while let Some((id, depth, clip)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.active_in_hierarchy {
                continue;
            }
            out.push(DrawItem {
                node: id,
                depth,
                rect: node.rect,
                clip,
            });
            if let Some(child_clip) = child_clip(node, clip) {
                stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1, child_clip)));
            }
        }
        out
    }

    /// Run one frame.
    ///
    /// The frame resolves the pointer, updates interaction states, runs the
    /// input pass, advances drag and inertia scrolling, runs the update pass,
    /// refreshes layout and finally runs the late-update pass.
    pub fn update(&mut self, input: &FrameInput, delta_time: f64) -> Result<()> {
        self.prev_frame = self.frame;
        self.frame = CanvasUpdateContext::default();
        self.input = *input;
        self.delta_time = delta_time.max(0.0);
        if self.layout_dirty {
            self.refresh_layout()?;
        }

        let hit = self.hit_test(input.cursor);
        let dragging = self.drag.filter(DragScroll::is_active);
        self.frame.hit_node = hit;
        self.frame.hovered_node = if dragging.is_some() { None } else { hit };
        self.frame.drag_scroll_node = dragging.map(|d| d.node);
        tracing::trace!(frame = self.frame_count, ?hit, "pointer resolved");

        scrolling::apply_wheel(self, hit, input.wheel);
        interact::run(self, input, self.frame.hovered_node);
        self.run_pass(Hook::UpdateInput)?;
        scrolling::update_drag(self, hit);
        scrolling::step_physics(self);
        self.run_pass(Hook::Update)?;
        self.refresh_layout()?;
        self.run_pass(Hook::LateUpdate)?;
        if self.layout_dirty {
            self.refresh_layout()?;
        }

        if input.left.up {
            scrolling::end_drag(self);
            for (_, n) in self.nodes.iter_mut() {
                n.prevent_drag_scroll = false;
            }
        }
        self.frame_count += 1;
        Ok(())
    }

    /// Run `hook` over the active tree. The input pass visits the topmost
    /// nodes first; every other pass runs in tree order. Nodes removed or
    /// deactivated by earlier hooks are skipped.
    fn run_pass(&mut self, hook: Hook) -> Result<()> {
        let mut order = self.subtree(self.root);
        if hook == Hook::UpdateInput {
            order.reverse();
        }
        for id in order {
            if self.nodes.get(id).is_some_and(|n| n.active_in_hierarchy) {
                run_hook(self, id, hook)?;
            }
        }
        Ok(())
    }

    /// Serialize the subtree rooted at `id`.
    pub fn to_json(&self, id: NodeId, options: SaveOptions) -> Result<Value> {
        persist::save(self, id, options)
    }

    /// Build a detached subtree from its persisted form. Components are
    /// restored through `factory`.
    pub fn load_json(&mut self, value: &Value, factory: &ComponentFactory) -> Result<NodeId> {
        persist::load(self, value, factory)
    }

    /// Parse `text` and build a detached subtree from it.
    pub fn load_json_str(&mut self, text: &str, factory: &ComponentFactory) -> Result<NodeId> {
        let value = serde_json::from_str::<Value>(text)?;
        self.load_json(&value, factory)
    }
}

/// Clip applied to the children of `node`. The outer `None` means the
/// children are clipped away entirely; the inner `None` means no clip.
fn child_clip(node: &Node, clip: Option<Rect>) -> Option<Option<Rect>> {
    if !node.clipping_enabled {
        return Some(clip);
    }
    match clip {
        Some(c) => c.intersect(&node.rect).map(Some),
        None => Some(Some(node.rect)),
    }
}

use crate::{
    component::Component,
    constraint::Constraint,
    core::id::{NodeId, next_internal_id},
    geom::{Inset, Rect, Vec2},
    interaction::{InheritChildrenStateFlags, InteractionState, MouseButton, MouseTracker},
    layout::Layout,
    scroll::{ScrollRange, ScrollableAxis},
};

/// Default inertial deceleration rate, applied as `rate^dt` per second.
pub const DEFAULT_DECELERATION_RATE: f64 = 0.2;

/// Interaction snapshot for one mouse button.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ButtonState {
    /// Press and hover tracking.
    pub(crate) tracker: MouseTracker,
    /// Final state after inheritance and pass-through.
    pub(crate) current: InteractionState,
    /// State from the node's own tracker.
    pub(crate) own: InteractionState,
    /// Merged state adopted from children.
    pub(crate) inherited: InteractionState,
    /// A click landed this frame.
    pub(crate) clicked: bool,
    /// A synthetic click is pending for the next interaction pass.
    pub(crate) click_requested: bool,
}

impl ButtonState {
    /// Clear all runtime interaction, keeping pending click requests.
    pub(crate) fn reset(&mut self) {
        *self = Self {
            click_requested: self.click_requested,
            ..Self::default()
        };
    }
}

/// Node data stored in the canvas arena.
pub struct Node {
    /// Persisted identity.
    pub(crate) internal_id: u64,
    /// Name used for lookup.
    pub(crate) name: String,
    /// Positioning rule against the parent.
    pub(crate) constraint: Constraint,
    /// Arrangement of this node's children.
    pub(crate) layout: Layout,
    /// Parent in the arena tree.
    pub(crate) parent: Option<NodeId>,
    /// Children in the arena tree, back to front.
    pub(crate) children: Vec<NodeId>,
    /// Behavior attachments.
    pub(crate) components: Vec<Box<dyn Component>>,
    /// The component list is taken out while its hooks run.
    pub(crate) hooks_running: bool,

    /// Eligible to be the pointer's hover target.
    pub(crate) is_hit_target: bool,
    /// Extra margin around the rect for hit testing.
    pub(crate) hit_test_padding: Inset,
    /// Responds to the pointer.
    pub(crate) interactable: bool,
    /// Descendant states this node adopts.
    pub(crate) inherit_children_state: InheritChildrenStateFlags,
    /// Scrolling axes.
    pub(crate) scrollable: ScrollableAxis,
    /// Accepts wheel scrolling.
    pub(crate) wheel_scroll_enabled: bool,
    /// Accepts drag scrolling.
    pub(crate) drag_scroll_enabled: bool,
    /// Inertial decay rate per second.
    pub(crate) deceleration_rate: f64,
    /// Permits temporary overscroll.
    pub(crate) rubber_band_scroll_enabled: bool,
    /// Clips hit testing and drawing of descendants to this node's rect.
    pub(crate) clipping_enabled: bool,
    /// Own visibility flag.
    pub(crate) active_self: bool,
    /// Optional style tag for renderers.
    pub(crate) style_state: Option<String>,

    /// `active_self` of this node and every ancestor.
    pub(crate) active_in_hierarchy: bool,
    /// `interactable` of this node and every ancestor, as of the last pass.
    pub(crate) interactable_in_hierarchy: bool,
    /// Final rect in canvas coordinates, scroll applied.
    pub(crate) rect: Rect,
    /// Rect assigned by the parent's layout, before scroll.
    pub(crate) layout_applied_rect: Rect,
    /// Bounds of the box children, padding included.
    pub(crate) content_rect: Option<Rect>,
    /// Translation applied to box children.
    pub(crate) scroll_offset: Vec2,
    /// Inertial scroll velocity in pixels per second.
    pub(crate) scroll_velocity: Vec2,
    /// Drag scrolling is suppressed until the left button is released.
    pub(crate) prevent_drag_scroll: bool,
    /// Per-button interaction, indexed by [`MouseButton::index`].
    pub(crate) buttons: [ButtonState; 2],
}

impl Node {
    /// Construct a detached node with default settings.
    pub(crate) fn new(name: &str, constraint: Constraint, layout: Layout) -> Self {
        Self {
            internal_id: next_internal_id(),
            name: name.to_string(),
            constraint,
            layout,
            parent: None,
            children: Vec::new(),
            components: Vec::new(),
            hooks_running: false,
            is_hit_target: true,
            hit_test_padding: Inset::ZERO,
            interactable: true,
            inherit_children_state: InheritChildrenStateFlags::NONE,
            scrollable: ScrollableAxis::NONE,
            wheel_scroll_enabled: true,
            drag_scroll_enabled: true,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            rubber_band_scroll_enabled: true,
            clipping_enabled: false,
            active_self: true,
            style_state: None,
            active_in_hierarchy: true,
            interactable_in_hierarchy: true,
            rect: Rect::zero(),
            layout_applied_rect: Rect::zero(),
            content_rect: None,
            scroll_offset: Vec2::ZERO,
            scroll_velocity: Vec2::ZERO,
            prevent_drag_scroll: false,
            buttons: [ButtonState::default(); 2],
        }
    }

    /// Persisted identity.
    pub fn internal_id(&self) -> u64 {
        self.internal_id
    }

    /// Node name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positioning constraint.
    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Is the constraint a box constraint?
    pub fn has_box_constraint(&self) -> bool {
        self.constraint.is_box()
    }

    /// Is the constraint an anchor constraint?
    pub fn has_anchor_constraint(&self) -> bool {
        self.constraint.is_anchor()
    }

    /// Children layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Parent, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children, back to front.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Number of attached components.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Is this node eligible as a hover target?
    pub fn is_hit_target(&self) -> bool {
        self.is_hit_target
    }

    /// Hit-test padding.
    pub fn hit_test_padding(&self) -> Inset {
        self.hit_test_padding
    }

    /// Own interactable flag.
    pub fn interactable(&self) -> bool {
        self.interactable
    }

    /// Is this node and every ancestor interactable? Updated by each
    /// interaction pass.
    pub fn is_interactable_in_hierarchy(&self) -> bool {
        self.interactable_in_hierarchy
    }

    /// Inheritance flags.
    pub fn inherit_children_state(&self) -> InheritChildrenStateFlags {
        self.inherit_children_state
    }

    /// Scrolling axes.
    pub fn scrollable(&self) -> ScrollableAxis {
        self.scrollable
    }

    /// Is wheel scrolling enabled?
    pub fn wheel_scroll_enabled(&self) -> bool {
        self.wheel_scroll_enabled
    }

    /// Is drag scrolling enabled?
    pub fn drag_scroll_enabled(&self) -> bool {
        self.drag_scroll_enabled
    }

    /// Inertial deceleration rate.
    pub fn deceleration_rate(&self) -> f64 {
        self.deceleration_rate
    }

    /// Is rubber-band overscroll enabled?
    pub fn rubber_band_scroll_enabled(&self) -> bool {
        self.rubber_band_scroll_enabled
    }

    /// Does this node clip its descendants?
    pub fn clipping_enabled(&self) -> bool {
        self.clipping_enabled
    }

    /// Own active flag.
    pub fn active_self(&self) -> bool {
        self.active_self
    }

    /// Is this node and every ancestor active?
    pub fn is_active_in_hierarchy(&self) -> bool {
        self.active_in_hierarchy
    }

    /// Style tag, if set.
    pub fn style_state(&self) -> Option<&str> {
        self.style_state.as_deref()
    }

    /// Final rect in canvas coordinates.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Rect assigned by the parent's layout, before the parent's scroll.
    pub fn layout_applied_rect(&self) -> Rect {
        self.layout_applied_rect
    }

    /// Rect used for hit testing.
    pub fn hit_rect(&self) -> Rect {
        self.rect.stretched(self.hit_test_padding)
    }

    /// Bounds of the box children as of the last layout refresh.
    pub fn content_rect(&self) -> Option<Rect> {
        self.content_rect
    }

    /// Current scroll offset.
    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll_offset
    }

    /// Current inertial scroll velocity.
    pub fn scroll_velocity(&self) -> Vec2 {
        self.scroll_velocity
    }

    /// Valid scroll offsets given the last layout refresh.
    pub fn scroll_range(&self) -> ScrollRange {
        if !self.scrollable.any() {
            return ScrollRange::ZERO;
        }
        ScrollRange::new(
            self.content_rect,
            self.rect,
            self.layout.scroll_offset_anchor(),
            self.scrollable,
        )
    }

    /// Is drag scrolling currently suppressed for this node?
    pub fn prevent_drag_scroll(&self) -> bool {
        self.prevent_drag_scroll
    }

    /// Interaction state for `button` as of the last pass.
    pub fn current_interaction_state(&self, button: MouseButton) -> InteractionState {
        self.buttons[button.index()].current
    }

    /// State this node computed from its own tracker.
    pub fn own_interaction_state(&self, button: MouseButton) -> InteractionState {
        self.buttons[button.index()].own
    }

    /// State adopted from children for `button`.
    pub fn inherited_interaction_state(&self, button: MouseButton) -> InteractionState {
        self.buttons[button.index()].inherited
    }

    /// Left-button state is hovered or pressed.
    pub fn is_hovered(&self) -> bool {
        self.current_interaction_state(MouseButton::Left).is_engaged()
    }

    /// Left-button state is pressed.
    pub fn is_pressed(&self) -> bool {
        self.current_interaction_state(MouseButton::Left) == InteractionState::Pressed
    }

    /// A left click landed this frame.
    pub fn is_clicked(&self) -> bool {
        self.buttons[MouseButton::Left.index()].clicked
    }

    /// A right click landed this frame.
    pub fn is_right_clicked(&self) -> bool {
        self.buttons[MouseButton::Right.index()].clicked
    }

    /// Reset interaction for both buttons.
    pub(crate) fn reset_interaction(&mut self) {
        for b in &mut self.buttons {
            b.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::BoxConstraint;

    #[test]
    fn defaults() {
        let n = Node::new("a", Constraint::default(), Layout::default());
        assert!(n.is_hit_target());
        assert!(n.interactable());
        assert!(n.active_self());
        assert!(n.has_box_constraint());
        assert_eq!(n.current_interaction_state(MouseButton::Left), InteractionState::Default);
        assert_eq!(n.scroll_range(), ScrollRange::ZERO);
    }

    #[test]
    fn hit_rect_padding() {
        let mut n = Node::new("a", BoxConstraint::fixed(10.0, 10.0).into(), Layout::default());
        n.rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        n.hit_test_padding = Inset::all(2.0);
        assert_eq!(n.hit_rect(), Rect::new(8.0, 8.0, 14.0, 14.0));
    }

    #[test]
    fn reset_keeps_requests() {
        let mut n = Node::new("a", Constraint::default(), Layout::default());
        n.buttons[0].click_requested = true;
        n.buttons[0].clicked = true;
        n.reset_interaction();
        assert!(n.buttons[0].click_requested);
        assert!(!n.buttons[0].clicked);
    }
}

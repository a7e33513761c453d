//! Interaction-state pass.
//!
//! The pass runs once per frame and button. A bottom-up walk updates each
//! node's tracker, letting nodes that opt in adopt the states and clicks of
//! their children. A top-down walk then lets nodes that are not hit targets
//! pick up their parent's state.

use crate::{
    core::{canvas::Canvas, context::FrameInput, id::NodeId},
    interaction::{ButtonInput, DisabledMerge, InteractionState, MouseButton},
};

/// Result of visiting one node in the bottom-up walk.
#[derive(Debug, Clone, Copy, Default)]
struct Visit {
    /// The node's state after inheritance.
    state: InteractionState,
    /// A click landed on the node this frame.
    clicked: bool,
}

/// Per-button interaction pass.
pub(crate) struct InteractionPass<'a> {
    /// Canvas being updated.
    canvas: &'a mut Canvas,
    /// Button being tracked.
    button: MouseButton,
    /// This frame's signals for the button.
    input: ButtonInput,
    /// Node the pointer resolves to, if any.
    hovered: Option<NodeId>,
}

/// Run the interaction pass for both buttons.
pub(crate) fn run(canvas: &mut Canvas, input: &FrameInput, hovered: Option<NodeId>) {
    let root = canvas.root;
    for button in MouseButton::ALL {
        let mut pass = InteractionPass {
            canvas: &mut *canvas,
            button,
            input: input.button(button),
            hovered,
        };
        pass.bottom_up(root, true);
        pass.top_down(root, None);
    }
}

impl InteractionPass<'_> {
    /// Update trackers below and including `id`, children first.
    fn bottom_up(&mut self, id: NodeId, parent_interactable: bool) -> Visit {
        let slot = self.button.index();
        let Some(node) = self.canvas.nodes.get_mut(id) else {
            return Visit::default();
        };
        if !node.active_in_hierarchy {
            return Visit::default();
        }
        let interactable = parent_interactable && node.interactable;
        node.interactable_in_hierarchy = interactable;
        let flags = node.inherit_children_state;
        let children = node.children.clone();

        let mut inherited = InteractionState::Default;
        let mut inherited_clicked = false;
        for child in children {
            let v = self.bottom_up(child, interactable);
            if flags.any() {
                inherited = inherited.merge(flags.demote(v.state), DisabledMerge::Ignore);
            }
            if flags.pressed && v.clicked {
                inherited_clicked = true;
            }
        }

        let Some(node) = self.canvas.nodes.get_mut(id) else {
            return Visit::default();
        };
        let real_over = self.hovered == Some(id);
        let over_hover = real_over || (flags.hovered && inherited.is_engaged());
        let over_press = real_over
            || (flags.pressed && (inherited == InteractionState::Pressed || inherited_clicked));

        let b = &mut node.buttons[slot];
        b.tracker.update(self.input, over_hover, over_press, interactable);
        b.own = b.tracker.state();
        b.inherited = inherited;
        b.current = b.own.merge(inherited, DisabledMerge::Ignore);
        b.clicked = interactable && (b.tracker.clicked() || b.click_requested);
        b.click_requested = false;
        if b.clicked {
            tracing::trace!(?id, button = ?self.button, "click");
        }
        Visit {
            state: b.current,
            clicked: b.clicked,
        }
    }

    /// Merge parent state into nodes that are not hit targets.
    fn top_down(&mut self, id: NodeId, parent_state: Option<InteractionState>) {
        let slot = self.button.index();
        let Some(node) = self.canvas.nodes.get_mut(id) else {
            return;
        };
        if !node.active_in_hierarchy {
            return;
        }
        if !node.is_hit_target
            && let Some(p) = parent_state
        {
            let b = &mut node.buttons[slot];
            b.current = b.current.merge(p, DisabledMerge::Apply);
        }
        let state = node.buttons[slot].current;
        let children = node.children.clone();
        for child in children {
            self.top_down(child, Some(state));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        constraint::BoxConstraint,
        error::Result,
        geom::Vec2,
        interaction::InheritChildrenStateFlags,
    };

    /// Root with a 100x100 parent holding a 50x50 child at the origin.
    fn tree() -> Result<(Canvas, NodeId, NodeId)> {
        let mut canvas = Canvas::new(Vec2::new(200.0, 200.0));
        let root = canvas.root();
        let parent = canvas.create_node_with(
            "parent",
            BoxConstraint::fixed(100.0, 100.0).into(),
            Default::default(),
        );
        let child = canvas.create_node_with(
            "child",
            BoxConstraint::fixed(50.0, 50.0).into(),
            Default::default(),
        );
        canvas.add_child(root, parent)?;
        canvas.add_child(parent, child)?;
        canvas.refresh_layout()?;
        Ok((canvas, parent, child))
    }

    /// Run one pass with the pointer resolved to `hovered`.
    fn pass(canvas: &mut Canvas, left: ButtonInput, hovered: Option<NodeId>) {
        let input = FrameInput {
            left,
            ..FrameInput::default()
        };
        run(canvas, &input, hovered);
    }

    /// Left-button state of `id`.
    fn state(canvas: &Canvas, id: NodeId) -> InteractionState {
        canvas
            .node(id)
            .map_or(InteractionState::Default, |n| n.current_interaction_state(MouseButton::Left))
    }

    #[test]
    fn no_inheritance_ignores_children() -> Result<()> {
        let (mut canvas, parent, child) = tree()?;
        pass(&mut canvas, ButtonInput::DOWN, Some(child));
        assert_eq!(state(&canvas, child), InteractionState::Pressed);
        assert_eq!(state(&canvas, parent), InteractionState::Default);
        Ok(())
    }

    #[test]
    fn hover_inheritance_demotes_press() -> Result<()> {
        let (mut canvas, parent, child) = tree()?;
        canvas.set_inherit_children_state(parent, InheritChildrenStateFlags::HOVERED)?;
        pass(&mut canvas, ButtonInput::DOWN, Some(child));
        assert_eq!(state(&canvas, parent), InteractionState::Hovered);
        Ok(())
    }

    #[test]
    fn press_inheritance_forwards_clicks() -> Result<()> {
        let (mut canvas, parent, child) = tree()?;
        canvas.set_inherit_children_state(parent, InheritChildrenStateFlags::ALL)?;
        pass(&mut canvas, ButtonInput::default(), Some(child));
        pass(&mut canvas, ButtonInput::DOWN, Some(child));
        assert_eq!(state(&canvas, parent), InteractionState::Pressed);
        pass(&mut canvas, ButtonInput::UP, Some(child));
        assert!(canvas.get(child)?.is_clicked());
        assert!(canvas.get(parent)?.is_clicked());
        pass(&mut canvas, ButtonInput::default(), Some(child));
        assert!(!canvas.get(parent)?.is_clicked());
        Ok(())
    }

    #[test]
    fn non_hit_target_follows_parent() -> Result<()> {
        let (mut canvas, parent, child) = tree()?;
        canvas.set_hit_target(child, false)?;
        pass(&mut canvas, ButtonInput::DOWN, Some(parent));
        assert_eq!(state(&canvas, parent), InteractionState::Pressed);
        assert_eq!(state(&canvas, child), InteractionState::Pressed);
        Ok(())
    }

    #[test]
    fn disabled_parent_wins() -> Result<()> {
        let (mut canvas, parent, child) = tree()?;
        canvas.set_inherit_children_state(parent, InheritChildrenStateFlags::HOVERED)?;
        canvas.set_interactable(parent, false)?;
        pass(&mut canvas, ButtonInput::default(), Some(child));
        assert_eq!(state(&canvas, parent), InteractionState::Disabled);
        assert_eq!(state(&canvas, child), InteractionState::Disabled);
        assert!(!canvas.get(child)?.is_interactable_in_hierarchy());
        Ok(())
    }

    #[test]
    fn disabled_child_does_not_disable_parent() -> Result<()> {
        let (mut canvas, parent, child) = tree()?;
        canvas.set_inherit_children_state(parent, InheritChildrenStateFlags::ALL)?;
        canvas.set_interactable(child, false)?;
        pass(&mut canvas, ButtonInput::default(), Some(parent));
        assert_eq!(state(&canvas, child), InteractionState::Disabled);
        assert_eq!(state(&canvas, parent), InteractionState::Hovered);
        Ok(())
    }

    #[test]
    fn requested_click_lasts_one_pass() -> Result<()> {
        let (mut canvas, _, child) = tree()?;
        canvas.request_click(child, MouseButton::Right)?;
        pass(&mut canvas, ButtonInput::default(), None);
        assert!(canvas.get(child)?.is_right_clicked());
        assert!(!canvas.get(child)?.is_clicked());
        pass(&mut canvas, ButtonInput::default(), None);
        assert!(!canvas.get(child)?.is_right_clicked());
        Ok(())
    }
}

use crate::{
    core::{canvas::Canvas, id::NodeId, node::Node},
    error::{Error, Result},
    geom::Vec2,
    interaction::{ButtonInput, MouseButton},
};

/// Raw pointer input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer position in canvas coordinates.
    pub cursor: Vec2,
    /// Left button signals.
    pub left: ButtonInput,
    /// Right button signals.
    pub right: ButtonInput,
    /// Wheel movement this frame. Positive `y` scrolls towards the end of
    /// the content.
    pub wheel: Vec2,
}

impl FrameInput {
    /// Input with the pointer at `cursor` and no buttons or wheel.
    pub fn at(cursor: Vec2) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }

    /// Signals for `button`.
    pub fn button(&self, button: MouseButton) -> ButtonInput {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Right => self.right,
        }
    }
}

/// Frame-scoped pointer results, owned by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CanvasUpdateContext {
    /// Topmost hit target under the pointer, regardless of drag state.
    pub hit_node: Option<NodeId>,
    /// Node that receives hover this frame. `None` while drag scrolling.
    pub hovered_node: Option<NodeId>,
    /// Node being drag scrolled.
    pub drag_scroll_node: Option<NodeId>,
    /// Node that consumed wheel input.
    pub wheel_scroll_node: Option<NodeId>,
}

impl CanvasUpdateContext {
    /// Is any node hovered?
    pub fn is_hovered_any(&self) -> bool {
        self.hovered_node.is_some()
    }

    /// Is a drag scroll in progress?
    pub fn is_drag_scrolling(&self) -> bool {
        self.drag_scroll_node.is_some()
    }
}

/// Access handed to component hooks: the canvas plus the node the hook runs
/// on.
pub struct NodeContext<'a> {
    /// The canvas.
    canvas: &'a mut Canvas,
    /// The node whose component is running.
    node: NodeId,
}

impl<'a> NodeContext<'a> {
    /// Construct a context for `node`.
    pub(crate) fn new(canvas: &'a mut Canvas, node: NodeId) -> Self {
        Self { canvas, node }
    }

    /// The node the hook runs on.
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// The node the hook runs on. Fails if a hook removed it.
    pub fn node(&self) -> Result<&Node> {
        self.canvas.get(self.node)
    }

    /// Shared access to the canvas.
    pub fn canvas(&self) -> &Canvas {
        self.canvas
    }

    /// Mutable access to the canvas.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        self.canvas
    }

    /// Seconds since the previous frame.
    pub fn delta_time(&self) -> f64 {
        self.canvas.delta_time()
    }

    /// This frame's raw input.
    pub fn input(&self) -> &FrameInput {
        self.canvas.input()
    }

    /// Was the node left-clicked this frame?
    pub fn is_clicked(&self) -> bool {
        self.node().is_ok_and(Node::is_clicked)
    }

    /// Was the node right-clicked this frame?
    pub fn is_right_clicked(&self) -> bool {
        self.node().is_ok_and(Node::is_right_clicked)
    }

    /// Is the node hovered or pressed?
    pub fn is_hovered(&self) -> bool {
        self.node().is_ok_and(Node::is_hovered)
    }

    /// Create a node and attach it as the last child of this node.
    pub fn spawn_child(&mut self, name: &str) -> Result<NodeId> {
        let id = self.canvas.create_node(name);
        self.canvas.add_child(self.node, id)?;
        Ok(id)
    }

    /// Suppress drag scrolling of this node and its ancestors until the left
    /// button is released.
    pub fn prevent_drag_scroll(&mut self) -> Result<()> {
        self.canvas.prevent_drag_scroll(self.node)
    }

    /// Fail with a component error.
    pub fn fail<T>(&self, msg: impl Into<String>) -> Result<T> {
        Err(Error::Component(msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_input_buttons() {
        let input = FrameInput {
            right: ButtonInput::DOWN,
            ..FrameInput::at(Vec2::new(3.0, 4.0))
        };
        assert_eq!(input.button(MouseButton::Right), ButtonInput::DOWN);
        assert_eq!(input.button(MouseButton::Left), ButtonInput::default());
        assert_eq!(input.cursor, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn update_context_queries() {
        let ctx = CanvasUpdateContext::default();
        assert!(!ctx.is_hovered_any());
        assert!(!ctx.is_drag_scrolling());
    }
}

//! Convenience re-exports for common Trellis types.

pub use crate::{
    Canvas, FitTarget, FrameInput, Node, NodeContext, NodeId,
    component::{Component, Hooks},
    constraint::{AnchorConstraint, BoxConstraint, Constraint},
    error,
    geom::{Axis, Inset, Rect, Vec2},
    interaction::{ButtonInput, InheritChildrenStateFlags, InteractionState, MouseButton},
    layout::{FlowLayout, HorizontalAlign, HorizontalLayout, Layout, VerticalAlign, VerticalLayout},
    scroll::ScrollableAxis,
};

/// Common result alias for Trellis operations.
pub type Result<T> = error::Result<T>;

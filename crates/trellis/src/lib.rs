//! Trellis: a retained-mode layout and interaction engine.
//!
//! Trellis keeps a tree of rectangular nodes in a [`Canvas`]. Each node is
//! sized by a [`constraint`] and places its children with a [`layout`]. Once
//! per frame the canvas turns raw pointer input into hover, press and click
//! states, routes wheel and drag input to scrollable nodes, runs component
//! hooks and refreshes layout. Drawing is left to the host: it reads the
//! computed rectangles from [`Canvas::draw_order`].
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Canvas`] - The node arena and frame driver
//! - [`component::Component`] - Behavior attached to nodes
//! - [`testing::Harness`] - Scripted frames for tests
//!
//! # Module Organization
//!
//! - [`geom`] - Geometry primitives (Vec2, Rect, Inset)
//! - [`constraint`] and [`layout`] - Sizing and placement
//! - [`interaction`] and [`scroll`] - Pointer state and scroll math
//! - [`persist`] - JSON documents for node trees

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod component;
pub mod config;
pub mod constraint;
pub mod interaction;
pub mod layout;
pub mod persist;
pub mod prelude;
pub mod scroll;

/// Geometry primitives.
pub mod geom {
    pub use trellis_geom::*;
}

// Re-export core types
pub use core::{
    Canvas, CanvasUpdateContext, DEFAULT_DECELERATION_RATE, DrawItem, FitTarget, FrameInput, Node,
    NodeContext, NodeId,
};
pub use core::{error, testing};

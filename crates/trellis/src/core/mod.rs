//! Node arena, frame driver and the passes it runs.

/// The canvas: node storage and the per-frame driver.
pub mod canvas;
/// Frame input, frame results and the context handed to components.
pub mod context;
/// Core error types.
pub mod error;
/// Node ID types.
pub mod id;
/// Node data.
pub mod node;
/// Testing utilities.
pub mod testing;

// Frame passes - internal
/// Interaction-state pass.
pub mod interact;
/// Layout refresh.
pub mod refresh;
/// Drag, wheel and inertia scrolling.
pub mod scrolling;

pub use canvas::{Canvas, DrawItem, FitTarget};
pub use context::{CanvasUpdateContext, FrameInput, NodeContext};
pub use id::NodeId;
pub use node::{DEFAULT_DECELERATION_RATE, Node};

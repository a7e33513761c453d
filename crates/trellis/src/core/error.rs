use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node does not exist in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A node was attached to itself.
    #[error("cannot attach node {0:?} to itself")]
    AttachToSelf(NodeId),

    /// Attaching would make a node its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },

    /// The child already has a parent.
    #[error("node {0:?} already has a parent")]
    AlreadyAttached(NodeId),

    /// The node is not a direct child of the parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Parent that was searched.
        parent: NodeId,
        /// Node that was not found among the children.
        child: NodeId,
    },

    /// A child index was outside the child list.
    #[error("child index {index} out of range for {parent:?} with {len} children")]
    ChildIndexOutOfRange {
        /// Parent node.
        parent: NodeId,
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },

    /// The canvas root cannot be removed or reparented.
    #[error("cannot remove or reparent the canvas root")]
    CannotRemoveRoot,

    /// Malformed JSON input.
    #[error("json: {0}")]
    Json(String),

    /// Document shape error during load.
    #[error("persist: {0}")]
    Persist(String),

    /// The node's components are running hooks, so its component list cannot
    /// be edited.
    #[error("components of {0:?} are running hooks")]
    ComponentsInUse(NodeId),

    /// Failure reported by a component hook.
    #[error("component: {0}")]
    Component(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

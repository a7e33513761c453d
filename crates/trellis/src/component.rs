//! Behavior attachments.
//!
//! Components hang off nodes and receive per-frame hooks. Every hook has a
//! no-op default, so most components implement one or two of them. For ad-hoc
//! behavior, [`Hooks`] holds each hook as an optional closure.
//!
//! While a node's hooks run, its component list is taken out of the node.
//! Hooks may freely restructure the tree, including adding components to the
//! node being visited; those are appended once the iteration finishes.
//! Removing components from the node being visited is rejected with
//! [`Error::ComponentsInUse`](crate::error::Error::ComponentsInUse).

use std::{
    any::{Any, type_name},
    mem,
};

use serde_json::Value;

use crate::{
    core::{Canvas, NodeContext, NodeId},
    error::Result,
};

/// Type-erasure helper for downcasting components.
pub trait AsAny {
    /// Borrow as `Any`.
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A behavior attached to a node.
pub trait Component: AsAny {
    /// The node became active in the hierarchy, or the component was added to
    /// an active node.
    fn on_activated(&mut self, _ctx: &mut NodeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// The node stopped being active in the hierarchy.
    fn on_deactivated(&mut self, _ctx: &mut NodeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Input pass. Runs after interaction states are known, topmost node
    /// first.
    fn update_input(&mut self, _ctx: &mut NodeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Update pass, in tree order.
    fn update(&mut self, _ctx: &mut NodeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Late-update pass, after layout has been refreshed.
    fn late_update(&mut self, _ctx: &mut NodeContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Tag stored in the persisted `type` field.
    fn type_tag(&self) -> &str {
        type_name::<Self>()
    }

    /// Persisted form. Components returning `None` are not saved.
    fn to_json(&self) -> Option<Value> {
        None
    }
}

/// Loads a component from its persisted form. Returning `None` skips the
/// entry.
pub type ComponentFactory = dyn Fn(&Value) -> Option<Box<dyn Component>>;

/// A hook closure.
pub type HookFn = Box<dyn FnMut(&mut NodeContext<'_>) -> Result<()>>;

/// Component made of optional closures. A `None` hook does nothing.
#[derive(Default)]
pub struct Hooks {
    /// Activation hook.
    pub on_activated: Option<HookFn>,
    /// Deactivation hook.
    pub on_deactivated: Option<HookFn>,
    /// Input-pass hook.
    pub update_input: Option<HookFn>,
    /// Update-pass hook.
    pub update: Option<HookFn>,
    /// Late-update hook.
    pub late_update: Option<HookFn>,
}

impl Hooks {
    /// Hooks that do nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the activation hook.
    pub fn with_activated(
        mut self,
        f: impl FnMut(&mut NodeContext<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.on_activated = Some(Box::new(f));
        self
    }

    /// Set the deactivation hook.
    pub fn with_deactivated(
        mut self,
        f: impl FnMut(&mut NodeContext<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.on_deactivated = Some(Box::new(f));
        self
    }

    /// Set the input-pass hook.
    pub fn with_update_input(
        mut self,
        f: impl FnMut(&mut NodeContext<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.update_input = Some(Box::new(f));
        self
    }

    /// Set the update-pass hook.
    pub fn with_update(
        mut self,
        f: impl FnMut(&mut NodeContext<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    /// Set the late-update hook.
    pub fn with_late_update(
        mut self,
        f: impl FnMut(&mut NodeContext<'_>) -> Result<()> + 'static,
    ) -> Self {
        self.late_update = Some(Box::new(f));
        self
    }
}

/// Call an optional hook.
fn call(hook: &mut Option<HookFn>, ctx: &mut NodeContext<'_>) -> Result<()> {
    match hook {
        Some(f) => f(ctx),
        None => Ok(()),
    }
}

impl Component for Hooks {
    fn on_activated(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        call(&mut self.on_activated, ctx)
    }

    fn on_deactivated(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        call(&mut self.on_deactivated, ctx)
    }

    fn update_input(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        call(&mut self.update_input, ctx)
    }

    fn update(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        call(&mut self.update, ctx)
    }

    fn late_update(&mut self, ctx: &mut NodeContext<'_>) -> Result<()> {
        call(&mut self.late_update, ctx)
    }

    fn type_tag(&self) -> &str {
        "Hooks"
    }
}

/// A component hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// [`Component::on_activated`].
    Activated,
    /// [`Component::on_deactivated`].
    Deactivated,
    /// [`Component::update_input`].
    UpdateInput,
    /// [`Component::update`].
    Update,
    /// [`Component::late_update`].
    LateUpdate,
}

impl Hook {
    /// Invoke this hook on one component.
    pub fn call(self, component: &mut dyn Component, ctx: &mut NodeContext<'_>) -> Result<()> {
        match self {
            Self::Activated => component.on_activated(ctx),
            Self::Deactivated => component.on_deactivated(ctx),
            Self::UpdateInput => component.update_input(ctx),
            Self::Update => component.update(ctx),
            Self::LateUpdate => component.late_update(ctx),
        }
    }
}

/// Run `hook` on every component of `node`. Missing nodes are skipped. The
/// first error stops the iteration and is returned after the component list
/// has been restored.
pub(crate) fn run_hook(canvas: &mut Canvas, node: NodeId, hook: Hook) -> Result<()> {
    let (mut components, was_running) = match canvas.nodes.get_mut(node) {
        Some(n) if !n.components.is_empty() => {
            let was_running = mem::replace(&mut n.hooks_running, true);
            (mem::take(&mut n.components), was_running)
        }
        _ => return Ok(()),
    };

    let mut result = Ok(());
    {
        let mut ctx = NodeContext::new(canvas, node);
        for c in components.iter_mut() {
            result = hook.call(&mut **c, &mut ctx);
            if result.is_err() {
                break;
            }
        }
    }

    if let Some(n) = canvas.nodes.get_mut(node) {
        let added = mem::take(&mut n.components);
        components.extend(added);
        n.components = components;
        n.hooks_running = was_running;
    }
    result
}

/// Downcast a stored component.
pub(crate) fn downcast_ref<T: Component + 'static>(c: &dyn Component) -> Option<&T> {
    c.as_any().downcast_ref::<T>()
}

/// Mutably downcast a stored component.
pub(crate) fn downcast_mut<T: Component + 'static>(c: &mut dyn Component) -> Option<&mut T> {
    c.as_any_mut().downcast_mut::<T>()
}

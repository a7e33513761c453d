//! Persisted node trees.
//!
//! A subtree is saved as a nested [`NodeDocument`]. Only authored settings are
//! stored; computed rectangles, scroll offsets and interaction states are
//! rebuilt by the next layout refresh and frame. Loading creates a detached
//! subtree that the caller attaches wherever it belongs.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    component::ComponentFactory,
    constraint::Constraint,
    core::{Canvas, DEFAULT_DECELERATION_RATE, NodeId, id::reserve_internal_id},
    error::{Error, Result},
    geom::Inset,
    interaction::InheritChildrenStateFlags,
    layout::Layout,
    scroll::ScrollableAxis,
};

/// Options for [`Canvas::to_json`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    /// Emit each node's `_internalId`. Only editors that need stable identities
    /// across a round trip should set this.
    pub include_internal_id: bool,
}

/// Serialized form of one node and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeDocument {
    /// Persisted identity, present only when requested at save time.
    #[serde(rename = "_internalId", skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<u64>,
    /// Node name.
    pub name: String,
    /// Positioning constraint.
    pub constraint: Constraint,
    /// Layout applied to box children.
    pub box_children_layout: Layout,
    /// Children in order.
    pub children: Vec<Self>,
    /// Component payloads, each tagged with a `type` field.
    pub components: Vec<Value>,
    /// Hit-testable.
    pub is_hit_target: bool,
    /// Hit area growth.
    pub hit_test_padding: Inset,
    /// Accepts interaction.
    pub interactable: bool,
    /// Scrolls horizontally.
    pub horizontal_scrollable: bool,
    /// Scrolls vertically.
    pub vertical_scrollable: bool,
    /// Wheel scrolling enabled.
    pub wheel_scroll_enabled: bool,
    /// Drag scrolling enabled.
    pub drag_scroll_enabled: bool,
    /// Inertia velocity kept per second.
    pub deceleration_rate: f64,
    /// Elastic overscroll enabled.
    pub rubber_band_scroll_enabled: bool,
    /// Clips descendants.
    pub clipping_enabled: bool,
    /// Own activity flag.
    pub active_self: bool,
    /// Child states adopted by this node.
    pub inherit_children_state: InheritChildrenStateFlags,
    /// Style state label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_state: Option<String>,
}

impl Default for NodeDocument {
    fn default() -> Self {
        Self {
            internal_id: None,
            name: String::new(),
            constraint: Constraint::default(),
            box_children_layout: Layout::default(),
            children: Vec::new(),
            components: Vec::new(),
            is_hit_target: true,
            hit_test_padding: Inset::ZERO,
            interactable: true,
            horizontal_scrollable: false,
            vertical_scrollable: false,
            wheel_scroll_enabled: true,
            drag_scroll_enabled: true,
            deceleration_rate: DEFAULT_DECELERATION_RATE,
            rubber_band_scroll_enabled: true,
            clipping_enabled: false,
            active_self: true,
            inherit_children_state: InheritChildrenStateFlags::NONE,
            style_state: None,
        }
    }
}

/// Build the document for `id` and its subtree.
pub fn document(canvas: &Canvas, id: NodeId, options: SaveOptions) -> Result<NodeDocument> {
    let node = canvas.get(id)?;
    let children = node
        .children()
        .iter()
        .map(|c| document(canvas, *c, options))
        .collect::<Result<Vec<_>>>()?;
    let components = node
        .components
        .iter()
        .filter_map(|c| {
            let mut value = c.to_json()?;
            if let Some(obj) = value.as_object_mut()
                && !obj.contains_key("type")
            {
                obj.insert("type".into(), Value::String(c.type_tag().to_string()));
            }
            Some(value)
        })
        .collect();
    Ok(NodeDocument {
        internal_id: options.include_internal_id.then_some(node.internal_id),
        name: node.name.clone(),
        constraint: node.constraint,
        box_children_layout: node.layout,
        children,
        components,
        is_hit_target: node.is_hit_target,
        hit_test_padding: node.hit_test_padding,
        interactable: node.interactable,
        horizontal_scrollable: node.scrollable.horizontal,
        vertical_scrollable: node.scrollable.vertical,
        wheel_scroll_enabled: node.wheel_scroll_enabled,
        drag_scroll_enabled: node.drag_scroll_enabled,
        deceleration_rate: node.deceleration_rate,
        rubber_band_scroll_enabled: node.rubber_band_scroll_enabled,
        clipping_enabled: node.clipping_enabled,
        active_self: node.active_self,
        inherit_children_state: node.inherit_children_state,
        style_state: node.style_state.clone(),
    })
}

/// Serialize `id` and its subtree.
pub(crate) fn save(canvas: &Canvas, id: NodeId, options: SaveOptions) -> Result<Value> {
    let doc = document(canvas, id, options)?;
    Ok(serde_json::to_value(doc)?)
}

/// Parse a document and build it as a detached subtree.
pub(crate) fn load(
    canvas: &mut Canvas,
    value: &Value,
    factory: &ComponentFactory,
) -> Result<NodeId> {
    if !value.is_object() {
        return Err(Error::Json("node document must be an object".into()));
    }
    let doc = NodeDocument::deserialize(value)?;
    let id = build(canvas, &doc, factory)?;
    tracing::debug!(?id, name = %doc.name, "document loaded");
    Ok(id)
}

/// Create the node described by `doc`, then its children and components.
///
/// Every `_internalId` in the document is checked against the canvas and the
/// rest of the document before any node is created. If a later step fails the
/// partially built subtree is removed again, leaving the canvas as it was.
pub fn build(
    canvas: &mut Canvas,
    doc: &NodeDocument,
    factory: &ComponentFactory,
) -> Result<NodeId> {
    let mut taken = canvas
        .nodes
        .values()
        .map(|n| n.internal_id)
        .collect::<HashSet<_>>();
    check_internal_ids(doc, &mut taken)?;
    build_node(canvas, doc, factory)
}

/// Fail if `doc` or any descendant repeats an id in `taken`. Ids are added to
/// `taken` as they are seen.
fn check_internal_ids(doc: &NodeDocument, taken: &mut HashSet<u64>) -> Result<()> {
    if let Some(internal_id) = doc.internal_id
        && !taken.insert(internal_id)
    {
        return Err(Error::Persist(format!("duplicate internal id {internal_id}")));
    }
    doc.children
        .iter()
        .try_for_each(|c| check_internal_ids(c, taken))
}

/// Create one node and its subtree, removing it again on failure.
fn build_node(
    canvas: &mut Canvas,
    doc: &NodeDocument,
    factory: &ComponentFactory,
) -> Result<NodeId> {
    let id = canvas.create_node_with(&doc.name, doc.constraint, doc.box_children_layout);
    match fill_node(canvas, id, doc, factory) {
        Ok(()) => Ok(id),
        Err(e) => {
            discard(canvas, id);
            Err(e)
        }
    }
}

/// Copy `doc`'s settings onto `id`, then build its children and components.
fn fill_node(
    canvas: &mut Canvas,
    id: NodeId,
    doc: &NodeDocument,
    factory: &ComponentFactory,
) -> Result<()> {
    if let Some(node) = canvas.nodes.get_mut(id) {
        if let Some(internal_id) = doc.internal_id {
            reserve_internal_id(internal_id);
            node.internal_id = internal_id;
        }
        node.is_hit_target = doc.is_hit_target;
        node.hit_test_padding = doc.hit_test_padding;
        node.interactable = doc.interactable;
        node.scrollable = ScrollableAxis {
            horizontal: doc.horizontal_scrollable,
            vertical: doc.vertical_scrollable,
        };
        node.wheel_scroll_enabled = doc.wheel_scroll_enabled;
        node.drag_scroll_enabled = doc.drag_scroll_enabled;
        node.deceleration_rate = doc.deceleration_rate.clamp(0.0, 1.0);
        node.rubber_band_scroll_enabled = doc.rubber_band_scroll_enabled;
        node.clipping_enabled = doc.clipping_enabled;
        node.inherit_children_state = doc.inherit_children_state;
        node.style_state.clone_from(&doc.style_state);
    }
    canvas.set_active(id, doc.active_self)?;

    for child in &doc.children {
        let child = build_node(canvas, child, factory)?;
        if let Err(e) = canvas.add_child(id, child) {
            discard(canvas, child);
            return Err(e);
        }
    }
    for value in &doc.components {
        match factory(value) {
            Some(component) => canvas.add_boxed_component(id, component)?,
            None => {
                let tag = value.get("type").and_then(Value::as_str).unwrap_or_default();
                tracing::warn!(tag, node = %doc.name, "unknown component, skipping");
            }
        }
    }
    Ok(())
}

/// Remove a partially loaded subtree.
fn discard(canvas: &mut Canvas, id: NodeId) {
    if let Err(e) = canvas.remove_subtree(id) {
        tracing::warn!(?id, error = %e, "could not discard partially loaded node");
    }
}

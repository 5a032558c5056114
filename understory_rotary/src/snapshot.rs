// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window and node snapshots.
//!
//! A [`Snapshot`] is an immutable picture of the on-screen windows and their
//! node trees, taken by the host right before a navigation query. Nodes live in
//! a flat arena and refer to each other by [`NodeId`]; there is no reference
//! counting and nothing to release. Anything that must outlive the snapshot
//! (focus history, for example) stores a [`NodeHandle`] instead and resolves it
//! against the next snapshot with [`Snapshot::find`].

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::error::SnapshotError;
use crate::types::{Actions, NodeFlags, NodeHandle, NodeId, NodeKey, NodeKind, WindowId, WindowKind};

/// Description of a node to add to a [`SnapshotBuilder`].
#[derive(Clone, Debug)]
pub struct NodeSpec<K> {
    /// Caller-chosen key, unique within the window.
    pub key: K,
    /// Bounds in screen coordinates.
    pub bounds: Rect,
    /// Visibility, focusability, and related state.
    pub flags: NodeFlags,
    /// Role in focus navigation.
    pub kind: NodeKind,
    /// Supported actions.
    pub actions: Actions,
}

impl<K> NodeSpec<K> {
    /// A visible, enabled, non-focusable node (a plain container).
    pub fn new(key: K, bounds: Rect) -> Self {
        Self {
            key,
            bounds,
            flags: NodeFlags::default(),
            kind: NodeKind::Ordinary,
            actions: Actions::empty(),
        }
    }

    /// A focusable, clickable view.
    pub fn view(key: K, bounds: Rect) -> Self {
        Self {
            flags: NodeFlags::TAKES_FOCUS,
            actions: Actions::FOCUS | Actions::CLICK,
            ..Self::new(key, bounds)
        }
    }

    /// A focus area.
    pub fn focus_area(key: K, bounds: Rect) -> Self {
        Self {
            kind: NodeKind::FocusArea,
            ..Self::new(key, bounds)
        }
    }

    /// A focus parking view. It is focusable so that the host can park focus on it.
    pub fn focus_parking_view(key: K, bounds: Rect) -> Self {
        Self {
            flags: NodeFlags::TAKES_FOCUS,
            kind: NodeKind::FocusParkingView,
            actions: Actions::FOCUS,
            ..Self::new(key, bounds)
        }
    }

    /// Mark this node as a scrollable container supporting `scroll` actions.
    pub fn scrollable(mut self, scroll: Actions) -> Self {
        self.flags |= NodeFlags::SCROLLABLE;
        self.actions |= scroll;
        self
    }

    /// Replace the flags.
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Replace the supported actions.
    pub fn with_actions(mut self, actions: Actions) -> Self {
        self.actions = actions;
        self
    }
}

/// A node of a [`Snapshot`].
#[derive(Clone, Debug)]
pub struct Node<K> {
    id: NodeId,
    key: K,
    window: WindowId,
    bounds: Rect,
    flags: NodeFlags,
    kind: NodeKind,
    actions: Actions,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

impl<K: NodeKey> Node<K> {
    /// This node's id within its snapshot.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The caller's key.
    pub fn key(&self) -> K {
        self.key
    }

    /// Stable identity of this node across snapshots.
    pub fn handle(&self) -> NodeHandle<K> {
        NodeHandle {
            window: self.window,
            key: self.key,
        }
    }

    /// The window this node belongs to.
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Bounds in screen coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// State flags.
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    /// Role in focus navigation.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Supported actions.
    pub fn actions(&self) -> Actions {
        self.actions
    }

    /// Parent node, or `None` for a window root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Visible, focusable, and enabled.
    pub fn can_take_focus(&self) -> bool {
        self.flags.contains(NodeFlags::TAKES_FOCUS)
    }

    /// Can take focus and is a real target (not a focus parking view).
    pub fn is_focus_candidate(&self) -> bool {
        self.can_take_focus() && !self.is_focus_parking_view()
    }

    /// Tagged as a focus area.
    pub fn is_focus_area(&self) -> bool {
        self.kind == NodeKind::FocusArea
    }

    /// Tagged as a focus parking view.
    pub fn is_focus_parking_view(&self) -> bool {
        self.kind == NodeKind::FocusParkingView
    }

    /// Flagged as a scrollable container.
    pub fn is_scrollable(&self) -> bool {
        self.flags.contains(NodeFlags::SCROLLABLE)
    }

    /// Flagged as an editable text field.
    pub fn is_editable(&self) -> bool {
        self.flags.contains(NodeFlags::EDITABLE)
    }

    /// Whether every action in `actions` is supported.
    pub fn supports(&self, actions: Actions) -> bool {
        self.actions.contains(actions)
    }
}

/// A window of a [`Snapshot`].
#[derive(Clone, Debug)]
pub struct Window {
    id: WindowId,
    kind: WindowKind,
    bounds: Rect,
    root: NodeId,
}

impl Window {
    /// Window id.
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// Window classification.
    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// Bounds in screen coordinates.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Root node.
    pub fn root(&self) -> NodeId {
        self.root
    }
}

/// An immutable picture of windows and their node trees.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use understory_rotary::{NodeSpec, Snapshot, WindowId, WindowKind};
///
/// let mut builder = Snapshot::builder();
/// let root = builder
///     .add_window(
///         WindowId(1),
///         WindowKind::Application,
///         Rect::new(0.0, 0.0, 100.0, 100.0),
///         NodeSpec::new(0_u32, Rect::new(0.0, 0.0, 100.0, 100.0)),
///     )
///     .unwrap();
/// let button = builder
///     .add_child(root, NodeSpec::view(1, Rect::new(10.0, 10.0, 50.0, 30.0)))
///     .unwrap();
/// let snapshot = builder.build();
///
/// assert!(snapshot.node(button).can_take_focus());
/// assert_eq!(snapshot.parent(button), Some(root));
/// assert_eq!(snapshot.find(snapshot.node(button).handle()), Some(button));
/// ```
#[derive(Clone, Debug)]
pub struct Snapshot<K> {
    nodes: Vec<Node<K>>,
    windows: Vec<Window>,
    index: HashMap<NodeHandle<K>, NodeId>,
}

impl<K: NodeKey> Snapshot<K> {
    /// Start building a snapshot.
    pub fn builder() -> SnapshotBuilder<K> {
        SnapshotBuilder::new()
    }

    /// Access a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was produced by a different snapshot and is out of range.
    pub fn node(&self, id: NodeId) -> &Node<K> {
        &self.nodes[id.idx()]
    }

    /// Access a node, returning `None` for out-of-range ids.
    pub fn get(&self, id: NodeId) -> Option<&Node<K>> {
        self.nodes.get(id.idx())
    }

    /// Number of nodes across all windows.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Windows in the order they were added.
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Look up a window by id.
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// The window containing `node`.
    pub fn window_of(&self, node: NodeId) -> Option<&Window> {
        self.get(node).and_then(|n| self.window(n.window))
    }

    /// Resolve a stable handle against this snapshot.
    pub fn find(&self, handle: NodeHandle<K>) -> Option<NodeId> {
        self.index.get(&handle).copied()
    }

    /// Stable handle of `node`.
    pub fn handle(&self, node: NodeId) -> Option<NodeHandle<K>> {
        self.get(node).map(Node::handle)
    }

    /// Parent of `node`, or `None` for window roots.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node).and_then(|n| n.parent)
    }

    /// Children of `node`, or an empty slice for out-of-range ids.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.get(node).map(|n| n.children()).unwrap_or(&[])
    }

    /// Next node in depth-first pre-order, crossing into parent siblings.
    ///
    /// The walk stays within the window of `current` and does not wrap around.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if let Some(&first_child) = self.children(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent(node) {
            if let Some(next) = self.next_sibling(node) {
                return Some(next);
            }
            node = parent;
        }
        None
    }

    /// Previous node in depth-first pre-order.
    ///
    /// The walk stays within the window of `current` and does not wrap around.
    pub fn prev_depth_first(&self, current: NodeId) -> Option<NodeId> {
        match self.prev_sibling(current) {
            Some(prev) => Some(self.last_in_subtree(prev)),
            None => self.parent(current),
        }
    }

    /// The last node of `node`'s subtree in pre-order.
    pub fn last_in_subtree(&self, node: NodeId) -> NodeId {
        let mut node = node;
        while let Some(&last) = self.children(node).last() {
            node = last;
        }
        node
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(node)?);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(node)?);
        let pos = siblings.iter().position(|&id| id == node)?;
        pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
    }

    /// Returns true if `node` is a proper descendant of `ancestor`.
    pub fn is_descendant(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Returns true if `node` is `ancestor` or one of its descendants.
    pub fn is_descendant_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.is_descendant(ancestor, node)
    }
}

/// Incremental builder for a [`Snapshot`].
///
/// Windows are added with their root node; further nodes are attached with
/// [`SnapshotBuilder::add_child`]. Children keep insertion order, which is also
/// the default tab order.
#[derive(Clone, Debug)]
pub struct SnapshotBuilder<K> {
    nodes: Vec<Node<K>>,
    windows: Vec<Window>,
    index: HashMap<NodeHandle<K>, NodeId>,
}

impl<K: NodeKey> Default for SnapshotBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: NodeKey> SnapshotBuilder<K> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            windows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add a window with its root node, returning the root's id.
    pub fn add_window(
        &mut self,
        id: WindowId,
        kind: WindowKind,
        bounds: Rect,
        root: NodeSpec<K>,
    ) -> Result<NodeId, SnapshotError> {
        if self.windows.iter().any(|w| w.id == id) {
            return Err(SnapshotError::DuplicateWindow(id));
        }
        let root = self.push(id, None, root)?;
        self.windows.push(Window {
            id,
            kind,
            bounds,
            root,
        });
        Ok(root)
    }

    /// Add a node as the last child of `parent`, returning its id.
    pub fn add_child(&mut self, parent: NodeId, spec: NodeSpec<K>) -> Result<NodeId, SnapshotError> {
        let window = self
            .nodes
            .get(parent.idx())
            .map(|p| p.window)
            .ok_or(SnapshotError::UnknownParent(parent))?;
        let id = self.push(window, Some(parent), spec)?;
        self.nodes[parent.idx()].children.push(id);
        Ok(id)
    }

    /// Finish building.
    pub fn build(self) -> Snapshot<K> {
        Snapshot {
            nodes: self.nodes,
            windows: self.windows,
            index: self.index,
        }
    }

    fn push(
        &mut self,
        window: WindowId,
        parent: Option<NodeId>,
        spec: NodeSpec<K>,
    ) -> Result<NodeId, SnapshotError> {
        let handle = NodeHandle {
            window,
            key: spec.key,
        };
        if self.index.contains_key(&handle) {
            return Err(SnapshotError::DuplicateKey(window));
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            id,
            key: spec.key,
            window,
            bounds: spec.bounds,
            flags: spec.flags,
            kind: spec.kind,
            actions: spec.actions,
            parent,
            children: SmallVec::new(),
        });
        self.index.insert(handle, id);
        Ok(id)
    }
}

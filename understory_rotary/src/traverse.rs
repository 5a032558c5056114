// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first searches over a [`Snapshot`].
//!
//! All walks are iterative with an explicit stack and visit children in order.
//! Predicates see the [`Node`] itself; use [`Node::can_take_focus`] for the
//! "visible, focusable and enabled" test.

use alloc::vec::Vec;

use crate::snapshot::{Node, Snapshot};
use crate::types::{NodeId, NodeKey};

/// Pre-order search for the first node under `root` (inclusive) matching `target`.
pub fn depth_first_search<K: NodeKey>(
    snapshot: &Snapshot<K>,
    root: NodeId,
    target: impl FnMut(&Node<K>) -> bool,
) -> Option<NodeId> {
    depth_first_search_skipping(snapshot, root, |_| false, target)
}

/// Pre-order search that does not descend into nodes matching `skip`.
///
/// A node matching `skip` is still tested against `target`; only its
/// descendants are left out.
pub fn depth_first_search_skipping<K: NodeKey>(
    snapshot: &Snapshot<K>,
    root: NodeId,
    mut skip: impl FnMut(&Node<K>) -> bool,
    mut target: impl FnMut(&Node<K>) -> bool,
) -> Option<NodeId> {
    let mut stack: Vec<NodeId> = Vec::new();
    stack.push(root);
    while let Some(id) = stack.pop() {
        let Some(node) = snapshot.get(id) else {
            continue;
        };
        if target(node) {
            return Some(id);
        }
        if !skip(node) {
            stack.extend(node.children().iter().rev().copied());
        }
    }
    None
}

/// Collect every node under `root` (inclusive) matching `target`, in pre-order.
///
/// Matches are not descended into, so nested matches are not reported.
pub fn depth_first_select<K: NodeKey>(
    snapshot: &Snapshot<K>,
    root: NodeId,
    target: impl FnMut(&Node<K>) -> bool,
    out: &mut Vec<NodeId>,
) {
    depth_first_select_bounded(snapshot, root, target, None, out);
}

/// Like [`depth_first_select`], but nodes deeper than `max_depth` below `root`
/// are not visited. `root` is at depth 0.
pub fn depth_first_select_bounded<K: NodeKey>(
    snapshot: &Snapshot<K>,
    root: NodeId,
    mut target: impl FnMut(&Node<K>) -> bool,
    max_depth: Option<usize>,
    out: &mut Vec<NodeId>,
) {
    let mut stack: Vec<(NodeId, usize)> = Vec::new();
    stack.push((root, 0));
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = snapshot.get(id) else {
            continue;
        };
        if target(node) {
            out.push(id);
            continue;
        }
        if max_depth.is_some_and(|max| depth >= max) {
            continue;
        }
        stack.extend(node.children().iter().rev().map(|&c| (c, depth + 1)));
    }
}

/// Search `root`'s subtree (inclusive) from the end: children last-to-first,
/// each subtree before its own root.
///
/// Returns the last match in pre-order.
pub fn reverse_depth_first_search<K: NodeKey>(
    snapshot: &Snapshot<K>,
    root: NodeId,
    mut target: impl FnMut(&Node<K>) -> bool,
) -> Option<NodeId> {
    // (node, children already pushed)
    let mut stack: Vec<(NodeId, bool)> = Vec::new();
    stack.push((root, false));
    while let Some((id, expanded)) = stack.pop() {
        let Some(node) = snapshot.get(id) else {
            continue;
        };
        if expanded {
            if target(node) {
                return Some(id);
            }
            continue;
        }
        stack.push((id, true));
        stack.extend(node.children().iter().map(|&c| (c, false)));
    }
    None
}

/// Walk from `node` up through its ancestors and return the first one matching
/// `target`, stopping (without testing) at the first node matching `stop`.
pub fn find_node_or_ancestor<K: NodeKey>(
    snapshot: &Snapshot<K>,
    node: NodeId,
    mut stop: impl FnMut(&Node<K>) -> bool,
    mut target: impl FnMut(&Node<K>) -> bool,
) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(id) = current {
        let n = snapshot.get(id)?;
        if stop(n) {
            return None;
        }
        if target(n) {
            return Some(id);
        }
        current = n.parent();
    }
    None
}

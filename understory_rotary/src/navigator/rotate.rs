// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_focus::{TabDirection, intersects};

use super::Navigator;
use crate::snapshot::{Node, Snapshot};
use crate::tab_order::TabOrder;
use crate::traverse::find_node_or_ancestor;
use crate::types::{Actions, NodeId, NodeKey};

/// Result of [`Navigator::find_rotate_target`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RotateTarget {
    /// The node to focus.
    pub node: NodeId,
    /// How many ticks were consumed; at most the requested count.
    pub advanced: usize,
}

impl<K: NodeKey, T: TabOrder<K>> Navigator<K, T> {
    /// Where `ticks` rotation steps in `direction` from `source` lead.
    ///
    /// Rotation follows the tab order but never leaves the focus area of
    /// `source`, never lands on a focus parking view, and stops before a node
    /// that its scrollable container could scroll into view instead. The tab
    /// order steps over `skip` (typically a scrollable container that is itself
    /// focusable) while keeping its position in the order.
    ///
    /// Returns `None` if rotation cannot move at all.
    pub fn find_rotate_target(
        &mut self,
        snapshot: &Snapshot<K>,
        source: NodeId,
        skip: Option<NodeId>,
        direction: TabDirection,
        ticks: usize,
    ) -> Option<RotateTarget> {
        if self.config.clear_focus_area_history_when_rotating {
            self.cache.clear_focus_area_history();
        }
        let Some(area) = self.ancestor_focus_area(snapshot, source) else {
            tracing::warn!(?source, "rotation source is not in the snapshot");
            return None;
        };
        let skip = skip.filter(|_| self.config.honor_skip_node);

        let mut current = source;
        let mut advanced = 0;
        for _ in 0..ticks {
            let Some(mut next) = self.tab_order.focus_search(snapshot, current, direction) else {
                break;
            };
            if Some(next) == skip {
                match self.tab_order.focus_search(snapshot, next, direction) {
                    Some(after_skip) => next = after_skip,
                    None => break,
                }
            }
            if next == source || snapshot.get(next).is_none_or(Node::is_focus_parking_view) {
                break;
            }
            if self.ancestor_focus_area(snapshot, next) != Some(area) {
                break;
            }
            if is_scrolled_out_of_view(snapshot, next, direction) {
                tracing::debug!(node = ?next, "rotation stopped before a scrolled-out node");
                break;
            }
            current = next;
            advanced += 1;
        }

        if current == source {
            return None;
        }
        Some(RotateTarget {
            node: current,
            advanced,
        })
    }
}

/// Whether `node` lies outside the visible bounds of an enclosing scrollable
/// container that can scroll toward it.
fn is_scrolled_out_of_view<K: NodeKey>(
    snapshot: &Snapshot<K>,
    node: NodeId,
    direction: TabDirection,
) -> bool {
    let Some(bounds) = snapshot.get(node).map(Node::bounds) else {
        return false;
    };
    let Some(parent) = snapshot.parent(node) else {
        return false;
    };
    let scroll = Actions::scroll_toward(direction);
    find_node_or_ancestor(snapshot, parent, Node::is_focus_area, |container| {
        container.is_scrollable()
            && container.supports(scroll)
            && !intersects(bounds, container.bounds())
    })
    .is_some()
}

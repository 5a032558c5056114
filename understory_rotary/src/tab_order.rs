// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tab-order primitive used for rotation.
//!
//! Hosts usually already know how their toolkit orders focus (reading order,
//! explicit next-focus links, and so on). They plug that into the
//! [`Navigator`](crate::Navigator) through [`TabOrder`]. [`TreeOrder`] is the
//! built-in order: snapshot pre-order within one window.

use understory_focus::{TabDirection, WrapMode};

use crate::snapshot::{Node, Snapshot};
use crate::types::{NodeId, NodeKey};

/// One step of sequential focus order.
pub trait TabOrder<K: NodeKey> {
    /// The node that receives focus after `from` when moving in `direction`.
    ///
    /// Implementations return nodes that can take focus (focus parking views
    /// included), never `from` itself, and `None` when there is nothing further.
    fn focus_search(&self, snapshot: &Snapshot<K>, from: NodeId, direction: TabDirection)
    -> Option<NodeId>;
}

/// Depth-first pre-order within the window of the starting node.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use understory_focus::{TabDirection, WrapMode};
/// use understory_rotary::{NodeSpec, Snapshot, TabOrder, TreeOrder, WindowId, WindowKind};
///
/// let r = Rect::new(0.0, 0.0, 10.0, 10.0);
/// let mut b = Snapshot::builder();
/// let root = b.add_window(WindowId(1), WindowKind::Application, r, NodeSpec::new(0_u32, r)).unwrap();
/// let first = b.add_child(root, NodeSpec::view(1, r)).unwrap();
/// let last = b.add_child(root, NodeSpec::view(2, r)).unwrap();
/// let s = b.build();
///
/// let order = TreeOrder::default();
/// assert_eq!(order.focus_search(&s, first, TabDirection::Forward), Some(last));
/// assert_eq!(order.focus_search(&s, last, TabDirection::Forward), None);
///
/// let wrapping = TreeOrder { wrap: WrapMode::Window };
/// assert_eq!(wrapping.focus_search(&s, last, TabDirection::Forward), Some(first));
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeOrder {
    /// Whether the walk continues from the other end of the window.
    pub wrap: WrapMode,
}

impl<K: NodeKey> TabOrder<K> for TreeOrder {
    fn focus_search(
        &self,
        snapshot: &Snapshot<K>,
        from: NodeId,
        direction: TabDirection,
    ) -> Option<NodeId> {
        let root = snapshot.window_of(from)?.root();
        let mut wrapped = false;
        let mut current = from;
        loop {
            let step = match direction {
                TabDirection::Forward => snapshot.next_depth_first(current),
                TabDirection::Backward => snapshot.prev_depth_first(current),
            };
            let next = match step {
                Some(next) => next,
                None if self.wrap == WrapMode::Window && !wrapped => {
                    wrapped = true;
                    match direction {
                        TabDirection::Forward => root,
                        TabDirection::Backward => snapshot.last_in_subtree(root),
                    }
                }
                None => return None,
            };
            if next == from {
                return None;
            }
            if snapshot.get(next).is_some_and(Node::can_take_focus) {
                return Some(next);
            }
            current = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::NodeSpec;
    use crate::types::{NodeFlags, WindowId, WindowKind};
    use kurbo::Rect;

    const R: Rect = Rect::new(0.0, 0.0, 10.0, 10.0);

    #[test]
    fn skips_nodes_that_cannot_take_focus() {
        let mut b = Snapshot::builder();
        let root = b
            .add_window(WindowId(1), WindowKind::Application, R, NodeSpec::new(0_u32, R))
            .unwrap();
        let a = b.add_child(root, NodeSpec::view(1, R)).unwrap();
        let group = b.add_child(root, NodeSpec::new(2, R)).unwrap();
        let _disabled = b
            .add_child(group, NodeSpec::view(3, R).with_flags(NodeFlags::VISIBLE | NodeFlags::FOCUSABLE))
            .unwrap();
        let c = b.add_child(group, NodeSpec::view(4, R)).unwrap();
        let parking = b.add_child(root, NodeSpec::focus_parking_view(5, R)).unwrap();
        let s = b.build();

        let order = TreeOrder::default();
        assert_eq!(order.focus_search(&s, a, TabDirection::Forward), Some(c));
        assert_eq!(order.focus_search(&s, c, TabDirection::Forward), Some(parking));
        assert_eq!(order.focus_search(&s, c, TabDirection::Backward), Some(a));
        assert_eq!(order.focus_search(&s, a, TabDirection::Backward), None);
    }

    #[test]
    fn wrapping_stops_at_the_start_node() {
        let mut b = Snapshot::builder();
        let root = b
            .add_window(WindowId(1), WindowKind::Application, R, NodeSpec::new(0_u32, R))
            .unwrap();
        let only = b.add_child(root, NodeSpec::view(1, R)).unwrap();
        let _hidden = b
            .add_child(root, NodeSpec::view(2, R).with_flags(NodeFlags::FOCUSABLE | NodeFlags::ENABLED))
            .unwrap();
        let s = b.build();

        let order = TreeOrder {
            wrap: WrapMode::Window,
        };
        assert_eq!(order.focus_search(&s, only, TabDirection::Forward), None);
        assert_eq!(order.focus_search(&s, only, TabDirection::Backward), None);
    }

    #[test]
    fn stays_within_the_window() {
        let mut b = Snapshot::builder();
        let w1 = b
            .add_window(WindowId(1), WindowKind::Application, R, NodeSpec::new(0_u32, R))
            .unwrap();
        let a = b.add_child(w1, NodeSpec::view(1, R)).unwrap();
        let w2 = b
            .add_window(WindowId(2), WindowKind::Application, R, NodeSpec::new(0_u32, R))
            .unwrap();
        let _b = b.add_child(w2, NodeSpec::view(1, R)).unwrap();
        let s = b.build();

        assert_eq!(TreeOrder::default().focus_search(&s, a, TabDirection::Forward), None);
    }
}

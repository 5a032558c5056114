// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The focus targeting engine.
//!
//! A [`Navigator`] answers "where does focus go next?" for rotation and nudge
//! input. It owns the focus history and the tab-order primitive, and is handed
//! a fresh [`Snapshot`] for every query. It never moves focus itself: callers
//! perform the focus, scroll, or click action on their UI and report back with
//! [`Navigator::save_focused_node`].
//!
//! A navigator is not synchronized. Callers that share one across threads must
//! serialize access, for example by owning it from a single event loop.

mod nudge;
mod rotate;

use alloc::vec::Vec;

use understory_focus::TabDirection;

use crate::cache::RotaryCache;
use crate::config::NavigatorConfig;
use crate::error::ConfigError;
use crate::snapshot::{Node, Snapshot, Window};
use crate::tab_order::{TabOrder, TreeOrder};
use crate::traverse::{
    depth_first_search, depth_first_search_skipping, depth_first_select_bounded,
    find_node_or_ancestor, reverse_depth_first_search,
};
use crate::types::{NodeId, NodeKey, WindowId, WindowKind};

pub use rotate::RotateTarget;

/// Rotary and directional focus targeting.
///
/// `T` is the sequential focus order used for rotation; it defaults to
/// [`TreeOrder`].
#[derive(Clone, Debug)]
pub struct Navigator<K: NodeKey, T = TreeOrder> {
    config: NavigatorConfig,
    cache: RotaryCache<K>,
    tab_order: T,
}

impl<K: NodeKey> Navigator<K, TreeOrder> {
    /// Create a navigator using snapshot pre-order for rotation.
    pub fn new(config: NavigatorConfig) -> Result<Self, ConfigError> {
        Self::with_tab_order(config, TreeOrder::default())
    }
}

impl<K: NodeKey, T: TabOrder<K>> Navigator<K, T> {
    /// Create a navigator with a custom tab order.
    pub fn with_tab_order(config: NavigatorConfig, tab_order: T) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            cache: RotaryCache::new(
                config.focus_history,
                config.focus_area_history,
                config.window_history,
            ),
            config,
            tab_order,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// The focus history.
    pub fn cache(&self) -> &RotaryCache<K> {
        &self.cache
    }

    /// Mutable access to the focus history.
    pub fn cache_mut(&mut self) -> &mut RotaryCache<K> {
        &mut self.cache
    }

    /// The tab order used for rotation.
    pub fn tab_order(&self) -> &T {
        &self.tab_order
    }

    /// Record that `node` received focus at `now`.
    ///
    /// The node is remembered as the last focused node of its focus area, and
    /// its window's kind is remembered. Focus parking views are ignored.
    pub fn save_focused_node(&mut self, snapshot: &Snapshot<K>, node: NodeId, now: u64) {
        let Some(n) = snapshot.get(node) else {
            tracing::warn!(?node, "cannot save focus: node is not in the snapshot");
            return;
        };
        if n.is_focus_parking_view() {
            return;
        }
        let Some(window) = snapshot.window_of(node) else {
            tracing::warn!(?node, "cannot save focus: node has no window");
            return;
        };
        self.cache.save_window_kind(window.id(), window.kind(), now);
        if let Some(area) = self.ancestor_focus_area(snapshot, node) {
            self.cache
                .save_focused_node(snapshot.node(area).handle(), n.handle(), now);
        }
    }

    /// The most recently focused node that still exists and can take focus,
    /// optionally restricted to `window`.
    pub fn most_recent_focus(
        &self,
        snapshot: &Snapshot<K>,
        window: Option<WindowId>,
        now: u64,
    ) -> Option<NodeId> {
        self.cache
            .recent_focus(now)
            .into_iter()
            .filter(|handle| window.is_none_or(|w| handle.window == w))
            .filter_map(|handle| snapshot.find(handle))
            .find(|&id| snapshot.get(id).is_some_and(Node::is_focus_candidate))
    }

    /// Forget every remembered nudge target.
    pub fn clear_focus_area_history(&mut self) {
        self.cache.clear_focus_area_history();
    }

    /// The focus area enclosing `node` (or `node` itself if it is one).
    ///
    /// Falls back to the window root, which acts as the implicit focus area of
    /// windows without explicit ones.
    pub fn ancestor_focus_area(&self, snapshot: &Snapshot<K>, node: NodeId) -> Option<NodeId> {
        find_node_or_ancestor(snapshot, node, |_| false, Node::is_focus_area)
            .or_else(|| snapshot.window_of(node).map(Window::root))
    }

    /// The focus areas under `root`, in pre-order; `[root]` if there are none.
    ///
    /// Focus areas do not nest, so the interior of a focus area is not scanned.
    pub fn focus_areas(&self, snapshot: &Snapshot<K>, root: NodeId) -> Vec<NodeId> {
        let mut areas = Vec::new();
        depth_first_select_bounded(
            snapshot,
            root,
            Node::is_focus_area,
            self.config.focus_area_scan_depth,
            &mut areas,
        );
        if areas.is_empty() {
            areas.push(root);
        }
        areas
    }

    /// The first node to focus under `root`, for example when a window opens.
    ///
    /// Starts from the first focus area and follows the tab order past any
    /// focus parking view. Falls back to the first focusable node in
    /// depth-first order.
    pub fn find_first_focus_descendant(
        &self,
        snapshot: &Snapshot<K>,
        root: NodeId,
    ) -> Option<NodeId> {
        let area = depth_first_search(snapshot, root, Node::is_focus_area).unwrap_or(root);
        let mut result = self
            .tab_order
            .focus_search(snapshot, area, TabDirection::Forward);
        let mut last_parking_view = None;
        while let Some(id) = result {
            if !snapshot.get(id).is_some_and(Node::is_focus_parking_view) {
                break;
            }
            if last_parking_view == Some(id) {
                tracing::warn!(parking_view = ?id, "tab order keeps returning the same focus parking view");
                result = None;
                break;
            }
            last_parking_view = Some(id);
            result = self
                .tab_order
                .focus_search(snapshot, id, TabDirection::Forward);
        }
        result
            .filter(|&id| {
                snapshot.is_descendant_or_self(root, id)
                    && snapshot.get(id).is_some_and(Node::is_focus_candidate)
            })
            .or_else(|| depth_first_search(snapshot, root, Node::is_focus_candidate))
    }

    /// The focus parking view of the window containing `node`.
    ///
    /// Focus areas are not searched; parking views live outside them.
    pub fn find_focus_parking_view(&self, snapshot: &Snapshot<K>, node: NodeId) -> Option<NodeId> {
        let window = snapshot.window_of(node)?;
        let found = depth_first_search_skipping(
            snapshot,
            window.root(),
            Node::is_focus_area,
            Node::is_focus_parking_view,
        );
        if found.is_none() && window.kind() == WindowKind::Application {
            tracing::warn!(window = ?window.id(), "application window has no focus parking view");
        }
        found
    }

    /// The scrollable container around or below `node`, within its focus area.
    ///
    /// Ancestors are searched first, nearest first, stopping at the enclosing
    /// focus area. Then `node`'s own subtree is searched without entering
    /// nested focus areas.
    pub fn find_scrollable_container(&self, snapshot: &Snapshot<K>, node: NodeId) -> Option<NodeId> {
        find_node_or_ancestor(snapshot, node, Node::is_focus_area, Node::is_scrollable).or_else(
            || {
                depth_first_search_skipping(
                    snapshot,
                    node,
                    |n| n.id() != node && n.is_focus_area(),
                    |n| n.is_scrollable() && !n.is_focus_area(),
                )
            },
        )
    }

    /// The node before `reference` in tab order, if it is still inside `container`.
    pub fn find_previous_focusable_descendant(
        &self,
        snapshot: &Snapshot<K>,
        container: NodeId,
        reference: NodeId,
    ) -> Option<NodeId> {
        self.step_within(snapshot, container, reference, TabDirection::Backward)
    }

    /// The node after `reference` in tab order, if it is still inside `container`.
    pub fn find_next_focusable_descendant(
        &self,
        snapshot: &Snapshot<K>,
        container: NodeId,
        reference: NodeId,
    ) -> Option<NodeId> {
        self.step_within(snapshot, container, reference, TabDirection::Forward)
    }

    /// The first node below `root` (excluding `root`) that can take focus.
    pub fn find_first_focusable_descendant(
        &self,
        snapshot: &Snapshot<K>,
        root: NodeId,
    ) -> Option<NodeId> {
        depth_first_search(snapshot, root, |n| {
            n.id() != root && n.is_focus_candidate()
        })
    }

    /// The last node below `root` (excluding `root`) that can take focus.
    pub fn find_last_focusable_descendant(
        &self,
        snapshot: &Snapshot<K>,
        root: NodeId,
    ) -> Option<NodeId> {
        reverse_depth_first_search(snapshot, root, |n| {
            n.id() != root && n.is_focus_candidate()
        })
    }

    /// The heads-up notification window, if one is configured and present.
    pub fn find_hun_window<'s>(&self, snapshot: &'s Snapshot<K>) -> Option<&'s Window> {
        let hun = self.config.hun?;
        snapshot.windows().iter().find(|w| {
            w.kind() == WindowKind::System
                && w.bounds().x0 == hun.left
                && w.bounds().x1 == hun.right
        })
    }

    /// The kind of `window`, falling back to history for windows that are
    /// not part of `snapshot`.
    pub fn window_kind(&mut self, snapshot: &Snapshot<K>, window: WindowId, now: u64) -> WindowKind {
        match snapshot.window(window) {
            Some(w) => w.kind(),
            None => self.cache.window_kind(window, now).unwrap_or_default(),
        }
    }

    fn step_within(
        &self,
        snapshot: &Snapshot<K>,
        container: NodeId,
        reference: NodeId,
        direction: TabDirection,
    ) -> Option<NodeId> {
        self.tab_order
            .focus_search(snapshot, reference, direction)
            .filter(|&id| {
                id != reference
                    && snapshot.is_descendant(container, id)
                    && snapshot.get(id).is_some_and(Node::is_focus_candidate)
            })
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::snapshot::NodeSpec;
    use crate::types::{Actions, NodeFlags};

    fn r(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
        Rect::new(x0, y0, x1, y1)
    }

    fn row(i: u32) -> Rect {
        let y = f64::from(i) * 10.0;
        r(0.0, y, 100.0, y + 10.0)
    }

    struct Layout {
        snapshot: Snapshot<u32>,
        root: NodeId,
        parking: NodeId,
        header: NodeId,
        area: NodeId,
        list: NodeId,
        items: [NodeId; 3],
        disabled: NodeId,
    }

    // root
    // ├── header (focusable, outside any area)
    // ├── parking view
    // └── area
    //     ├── list (scrollable)
    //     │   ├── item 0
    //     │   ├── item 1
    //     │   └── item 2
    //     └── disabled view
    fn layout() -> Layout {
        let screen = r(0.0, 0.0, 100.0, 100.0);
        let mut b = Snapshot::builder();
        let root = b
            .add_window(WindowId(1), WindowKind::Application, screen, NodeSpec::new(0, screen))
            .unwrap();
        let header = b.add_child(root, NodeSpec::view(1, row(0))).unwrap();
        let parking = b
            .add_child(root, NodeSpec::focus_parking_view(2, r(0.0, 0.0, 1.0, 1.0)))
            .unwrap();
        let area = b
            .add_child(root, NodeSpec::focus_area(3, r(0.0, 10.0, 100.0, 100.0)))
            .unwrap();
        let list = b
            .add_child(
                area,
                NodeSpec::new(4, r(0.0, 10.0, 100.0, 40.0)).scrollable(Actions::SCROLL_FORWARD),
            )
            .unwrap();
        let items = [
            b.add_child(list, NodeSpec::view(5, row(1))).unwrap(),
            b.add_child(list, NodeSpec::view(6, row(2))).unwrap(),
            b.add_child(list, NodeSpec::view(7, row(3))).unwrap(),
        ];
        let disabled = b
            .add_child(
                area,
                NodeSpec::view(8, row(4)).with_flags(NodeFlags::VISIBLE | NodeFlags::FOCUSABLE),
            )
            .unwrap();
        Layout {
            snapshot: b.build(),
            root,
            parking,
            header,
            area,
            list,
            items,
            disabled,
        }
    }

    fn navigator() -> Navigator<u32> {
        Navigator::new(NavigatorConfig::default()).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = NavigatorConfig {
            focus_area_scan_depth: Some(0),
            ..NavigatorConfig::default()
        };
        assert_eq!(
            Navigator::<u32>::new(config).map(|_| ()),
            Err(ConfigError::ZeroScanDepth)
        );
    }

    #[test]
    fn focus_areas_fall_back_to_the_root() {
        let t = layout();
        let s = &t.snapshot;
        let nav = navigator();
        assert_eq!(nav.focus_areas(s, t.root), [t.area]);
        assert_eq!(nav.ancestor_focus_area(s, t.items[2]), Some(t.area));
        assert_eq!(nav.ancestor_focus_area(s, t.area), Some(t.area));
        assert_eq!(nav.ancestor_focus_area(s, t.header), Some(t.root));

        let shallow = Navigator::<u32>::new(NavigatorConfig {
            focus_area_scan_depth: Some(1),
            ..NavigatorConfig::default()
        })
        .unwrap();
        assert_eq!(shallow.focus_areas(s, t.list), [t.list]);
        assert_eq!(shallow.focus_areas(s, t.root), [t.area]);
    }

    #[test]
    fn first_focus_starts_in_the_first_focus_area() {
        let t = layout();
        let nav = navigator();
        assert_eq!(nav.find_first_focus_descendant(&t.snapshot, t.root), Some(t.items[0]));
    }

    struct ParkingLoop(NodeId);

    impl TabOrder<u32> for ParkingLoop {
        fn focus_search(
            &self,
            _snapshot: &Snapshot<u32>,
            _from: NodeId,
            _direction: TabDirection,
        ) -> Option<NodeId> {
            Some(self.0)
        }
    }

    #[test]
    fn first_focus_breaks_parking_view_loops() {
        let t = layout();
        let nav = Navigator::with_tab_order(NavigatorConfig::default(), ParkingLoop(t.parking))
            .unwrap();
        // Falls back to plain depth-first order.
        assert_eq!(nav.find_first_focus_descendant(&t.snapshot, t.root), Some(t.header));
    }

    #[test]
    fn tab_order_pointing_outside_the_snapshot_finds_nothing() {
        let t = layout();
        let s = &t.snapshot;
        let mut nav =
            Navigator::with_tab_order(NavigatorConfig::default(), ParkingLoop(NodeId(999)))
                .unwrap();
        assert_eq!(nav.find_first_focus_descendant(s, t.root), Some(t.header));
        assert_eq!(nav.find_next_focusable_descendant(s, t.area, t.items[0]), None);
        assert_eq!(nav.find_previous_focusable_descendant(s, t.area, t.items[1]), None);
        assert_eq!(
            nav.find_rotate_target(s, t.items[0], None, TabDirection::Forward, 3),
            None
        );
    }

    #[test]
    fn parking_view_is_found_outside_focus_areas() {
        let t = layout();
        let nav = navigator();
        assert_eq!(nav.find_focus_parking_view(&t.snapshot, t.items[1]), Some(t.parking));

        let screen = r(0.0, 0.0, 10.0, 10.0);
        let mut b = Snapshot::builder();
        let root = b
            .add_window(WindowId(1), WindowKind::Application, screen, NodeSpec::new(0_u32, screen))
            .unwrap();
        let area = b.add_child(root, NodeSpec::focus_area(1, screen)).unwrap();
        // Inside a focus area, so it does not count.
        b.add_child(area, NodeSpec::focus_parking_view(2, screen)).unwrap();
        let s = b.build();
        assert_eq!(nav.find_focus_parking_view(&s, root), None);
    }

    #[test]
    fn scrollable_container_is_found_up_and_down() {
        let t = layout();
        let s = &t.snapshot;
        let nav = navigator();
        assert_eq!(nav.find_scrollable_container(s, t.items[1]), Some(t.list));
        assert_eq!(nav.find_scrollable_container(s, t.list), Some(t.list));
        assert_eq!(nav.find_scrollable_container(s, t.area), Some(t.list));
        assert_eq!(nav.find_scrollable_container(s, t.disabled), None);
        assert_eq!(nav.find_scrollable_container(s, t.header), None);
    }

    #[test]
    fn stepping_stays_inside_the_container() {
        let t = layout();
        let s = &t.snapshot;
        let nav = navigator();
        assert_eq!(nav.find_next_focusable_descendant(s, t.list, t.items[0]), Some(t.items[1]));
        assert_eq!(nav.find_previous_focusable_descendant(s, t.list, t.items[1]), Some(t.items[0]));
        assert_eq!(nav.find_next_focusable_descendant(s, t.list, t.items[2]), None);
        assert_eq!(nav.find_previous_focusable_descendant(s, t.list, t.items[0]), None);
    }

    #[test]
    fn first_and_last_focusable_descendants() {
        let t = layout();
        let s = &t.snapshot;
        let nav = navigator();
        assert_eq!(nav.find_first_focusable_descendant(s, t.area), Some(t.items[0]));
        assert_eq!(nav.find_last_focusable_descendant(s, t.area), Some(t.items[2]));
        assert_eq!(nav.find_first_focusable_descendant(s, t.root), Some(t.header));
        assert_eq!(nav.find_last_focusable_descendant(s, t.items[0]), None);
    }

    #[test]
    fn most_recent_focus_skips_stale_entries() {
        let t = layout();
        let s = &t.snapshot;
        let mut nav = navigator();
        nav.save_focused_node(s, t.items[0], 10);
        nav.save_focused_node(s, t.header, 20);
        // Parking views are never remembered.
        nav.save_focused_node(s, t.parking, 30);
        assert_eq!(nav.most_recent_focus(s, None, 40), Some(t.header));
        assert_eq!(nav.most_recent_focus(s, Some(WindowId(2)), 40), None);

        // The header disappeared from the next snapshot.
        let screen = r(0.0, 0.0, 100.0, 100.0);
        let mut b = Snapshot::builder();
        let root = b
            .add_window(WindowId(1), WindowKind::Application, screen, NodeSpec::new(0, screen))
            .unwrap();
        let area = b
            .add_child(root, NodeSpec::focus_area(3, r(0.0, 10.0, 100.0, 100.0)))
            .unwrap();
        let list = b
            .add_child(area, NodeSpec::new(4, r(0.0, 10.0, 100.0, 40.0)))
            .unwrap();
        let item = b.add_child(list, NodeSpec::view(5, row(1))).unwrap();
        let next = b.build();
        assert_eq!(nav.most_recent_focus(&next, Some(WindowId(1)), 40), Some(item));
    }

    #[test]
    fn window_kind_falls_back_to_history() {
        let t = layout();
        let mut nav = navigator();
        nav.save_focused_node(&t.snapshot, t.header, 0);
        let empty = Snapshot::<u32>::builder().build();
        assert_eq!(nav.window_kind(&empty, WindowId(1), 5), WindowKind::Application);
        assert_eq!(nav.cache_mut().window_kind(WindowId(1), 5), Some(WindowKind::Application));
        assert_eq!(nav.window_kind(&empty, WindowId(9), 5), WindowKind::default());
    }
}

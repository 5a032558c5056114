// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus history for nudge-back and focus restoration.
//!
//! [`RotaryCache`] combines three [`HistoryMap`]s:
//!
//! - the node last focused in each focus area,
//! - the focus area last nudged to from each (focus area, direction) pair,
//! - the kind of each window that held focus.
//!
//! Entries are stable [`NodeHandle`]s, not snapshot ids. Whatever they name may
//! have disappeared or stopped being focusable by the time they are read, so
//! callers resolve and revalidate them against the current snapshot.

use alloc::vec::Vec;

use understory_event_state::history::HistoryMap;
use understory_focus::Direction;

use crate::config::CacheConfig;
use crate::types::{NodeHandle, NodeKey, WindowId, WindowKind};

/// History of focused nodes, nudge targets, and window kinds.
#[derive(Clone, Debug)]
pub struct RotaryCache<K: NodeKey> {
    focused: HistoryMap<NodeHandle<K>, NodeHandle<K>>,
    target_areas: HistoryMap<(NodeHandle<K>, Direction), NodeHandle<K>>,
    window_kinds: HistoryMap<WindowId, WindowKind>,
}

impl<K: NodeKey> RotaryCache<K> {
    /// Create empty history with one configuration per map.
    pub fn new(focus: CacheConfig, focus_area: CacheConfig, window: CacheConfig) -> Self {
        Self {
            focused: HistoryMap::new(focus.policy, focus.capacity),
            target_areas: HistoryMap::new(focus_area.policy, focus_area.capacity),
            window_kinds: HistoryMap::new(window.policy, window.capacity),
        }
    }

    /// Remember `node` as the last focused node in `focus_area`.
    pub fn save_focused_node(&mut self, focus_area: NodeHandle<K>, node: NodeHandle<K>, now: u64) {
        self.focused.insert(focus_area, node, now);
    }

    /// The node last focused in `focus_area`, if still remembered at `now`.
    pub fn focused_node(&mut self, focus_area: NodeHandle<K>, now: u64) -> Option<NodeHandle<K>> {
        self.focused.get(&focus_area, now).copied()
    }

    /// Remember that a nudge in `direction` from `from` went to `to`.
    ///
    /// The reverse mapping (`to`, opposite direction) to `from` is saved too,
    /// so that nudging back returns to where the user came from.
    pub fn save_target_focus_area(
        &mut self,
        from: NodeHandle<K>,
        to: NodeHandle<K>,
        direction: Direction,
        now: u64,
    ) {
        self.target_areas.insert((from, direction), to, now);
        self.target_areas.insert((to, direction.opposite()), from, now);
    }

    /// The focus area last nudged to from `from` in `direction`.
    pub fn target_focus_area(
        &mut self,
        from: NodeHandle<K>,
        direction: Direction,
        now: u64,
    ) -> Option<NodeHandle<K>> {
        self.target_areas.get(&(from, direction), now).copied()
    }

    /// Like [`RotaryCache::target_focus_area`] without refreshing recency.
    pub fn peek_target_focus_area(
        &self,
        from: NodeHandle<K>,
        direction: Direction,
        now: u64,
    ) -> Option<NodeHandle<K>> {
        self.target_areas.peek(&(from, direction), now).copied()
    }

    /// Remember the kind of `window`.
    pub fn save_window_kind(&mut self, window: WindowId, kind: WindowKind, now: u64) {
        self.window_kinds.insert(window, kind, now);
    }

    /// The remembered kind of `window`.
    pub fn window_kind(&mut self, window: WindowId, now: u64) -> Option<WindowKind> {
        self.window_kinds.get(&window, now).copied()
    }

    /// The most recently saved focused node, optionally restricted to `window`.
    ///
    /// Of saves sharing a timestamp, the last one made wins.
    pub fn most_recent_focus(&self, window: Option<WindowId>, now: u64) -> Option<NodeHandle<K>> {
        self.focused
            .newest_first(now)
            .into_iter()
            .map(|(_, node, _)| node)
            .find(|node| window.is_none_or(|w| node.window == w))
    }

    /// Every remembered focused node at `now`, newest first.
    pub fn recent_focus(&self, now: u64) -> Vec<NodeHandle<K>> {
        self.focused
            .newest_first(now)
            .into_iter()
            .map(|(_, node, _)| node)
            .collect()
    }

    /// Forget all nudge targets. Focused nodes and window kinds are kept.
    pub fn clear_focus_area_history(&mut self) {
        self.target_areas.clear();
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.focused.clear();
        self.target_areas.clear();
        self.window_kinds.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_event_state::history::CachePolicy;

    fn h(window: u32, key: u32) -> NodeHandle<u32> {
        NodeHandle {
            window: WindowId(window),
            key,
        }
    }

    fn cache(policy: CachePolicy) -> RotaryCache<u32> {
        let config = CacheConfig {
            policy,
            capacity: 4,
        };
        RotaryCache::new(config, config, config)
    }

    #[test]
    fn target_areas_are_saved_both_ways() {
        let mut c = cache(CachePolicy::NeverExpire);
        c.save_target_focus_area(h(1, 1), h(1, 2), Direction::Right, 0);
        assert_eq!(c.target_focus_area(h(1, 1), Direction::Right, 0), Some(h(1, 2)));
        assert_eq!(c.target_focus_area(h(1, 2), Direction::Left, 0), Some(h(1, 1)));
        assert_eq!(c.target_focus_area(h(1, 1), Direction::Left, 0), None);

        c.clear_focus_area_history();
        assert_eq!(c.peek_target_focus_area(h(1, 1), Direction::Right, 0), None);
    }

    #[test]
    fn lookups_expire_with_the_policy() {
        let mut c = cache(CachePolicy::ExpireAfter { timeout_ms: 100 });
        c.save_focused_node(h(1, 10), h(1, 11), 1_000);
        assert_eq!(c.focused_node(h(1, 10), 1_099), Some(h(1, 11)));
        assert_eq!(c.focused_node(h(1, 10), 1_099), Some(h(1, 11)));
        assert_eq!(c.focused_node(h(1, 10), 1_101), None);
    }

    #[test]
    fn most_recent_focus_filters_by_window() {
        let mut c = cache(CachePolicy::ExpireAfter { timeout_ms: 100 });
        c.save_focused_node(h(1, 10), h(1, 11), 10);
        c.save_focused_node(h(2, 20), h(2, 21), 20);
        c.save_focused_node(h(1, 30), h(1, 31), 30);
        assert_eq!(c.most_recent_focus(None, 50), Some(h(1, 31)));
        assert_eq!(c.most_recent_focus(Some(WindowId(2)), 50), Some(h(2, 21)));
        assert_eq!(c.most_recent_focus(Some(WindowId(3)), 50), None);
        // The entry saved at 10 has expired at 115.
        assert_eq!(c.recent_focus(115), [h(1, 31), h(2, 21)]);
    }

    #[test]
    fn saves_in_the_same_millisecond_keep_their_order() {
        let mut c = cache(CachePolicy::NeverExpire);
        c.save_focused_node(h(1, 10), h(1, 11), 5);
        c.save_focused_node(h(1, 20), h(1, 21), 5);
        c.save_focused_node(h(2, 30), h(2, 31), 5);
        c.save_focused_node(h(1, 40), h(1, 41), 5);
        assert_eq!(c.most_recent_focus(None, 5), Some(h(1, 41)));
        assert_eq!(c.most_recent_focus(Some(WindowId(2)), 5), Some(h(2, 31)));
        assert_eq!(c.recent_focus(5), [h(1, 41), h(2, 31), h(1, 21), h(1, 11)]);
    }

    #[test]
    fn disabled_policy_remembers_nothing() {
        let mut c = cache(CachePolicy::Disabled);
        c.save_focused_node(h(1, 10), h(1, 11), 0);
        c.save_window_kind(WindowId(1), WindowKind::System, 0);
        assert_eq!(c.focused_node(h(1, 10), 0), None);
        assert_eq!(c.window_kind(WindowId(1), 0), None);
        assert_eq!(c.most_recent_focus(None, 0), None);
    }

    #[test]
    fn window_kinds_are_remembered() {
        let mut c = cache(CachePolicy::NeverExpire);
        c.save_window_kind(WindowId(7), WindowKind::InputMethod, 0);
        assert_eq!(c.window_kind(WindowId(7), 5), Some(WindowKind::InputMethod));
        c.clear();
        assert_eq!(c.window_kind(WindowId(7), 5), None);
    }
}

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::Rect;
use understory_focus::{Direction, is_candidate, is_partially_in_direction, pick_best};

use super::Navigator;
use crate::snapshot::Snapshot;
use crate::tab_order::TabOrder;
use crate::traverse::depth_first_select;
use crate::types::{NodeId, NodeKey, WindowKind};

impl<K: NodeKey, T: TabOrder<K>> Navigator<K, T> {
    /// Where a nudge in `direction` from `source` leads.
    ///
    /// Nudges move between focus areas, possibly across windows. In order:
    ///
    /// 1. Nudging toward the heads-up notification jumps into it, even when it
    ///    overlaps `source`.
    /// 2. Nudging out of the input method returns to `edit_node`, the field
    ///    being edited, when it lives in the target window.
    /// 3. Otherwise the target focus area comes from nudge history, or is the
    ///    geometrically best focus area that has a focusable node in
    ///    `direction`. Inside it, the node focused there last wins over geometry.
    ///
    /// `now` is the caller's clock in milliseconds, used by the history.
    pub fn find_nudge_target(
        &mut self,
        snapshot: &Snapshot<K>,
        source: NodeId,
        direction: Direction,
        edit_node: Option<NodeId>,
        now: u64,
    ) -> Option<NodeId> {
        let Some(source_window) = snapshot.window_of(source) else {
            tracing::warn!(?source, "nudge source has no window");
            return None;
        };
        let source_window = source_window.id();
        let current_area = self.ancestor_focus_area(snapshot, source)?;

        if let Some(target) = self.find_hun_nudge_target(snapshot, source, current_area, direction, now) {
            return Some(target);
        }

        let (target_area, from_history) =
            self.find_nudge_target_focus_area(snapshot, source, current_area, direction, now)?;

        let target_window = snapshot.node(target_area).window();
        if self.config.ime_exit_to_edit_node
            && let Some(edit) = edit_node
            && snapshot.get(edit).is_some_and(|n| n.window() == target_window)
            && self.window_kind(snapshot, source_window, now) == WindowKind::InputMethod
            && self.window_kind(snapshot, target_window, now) != WindowKind::InputMethod
        {
            tracing::debug!(?edit, "nudging out of the input method back to the edited node");
            return Some(edit);
        }

        let current = snapshot.node(current_area).handle();
        let target = snapshot.node(target_area).handle();
        self.cache
            .save_target_focus_area(current, target, direction, now);
        if from_history {
            tracing::debug!(?target_area, "nudge target area from history");
        }

        if let Some(cached) = self.cached_focus_in(snapshot, target_area, now) {
            return Some(cached);
        }

        let source_bounds = snapshot.node(source).bounds();
        let found = pick_best(
            direction,
            source_bounds,
            self.focus_candidates(snapshot, target_area)
                .into_iter()
                .filter(|&id| is_candidate(source_bounds, snapshot.node(id).bounds(), direction))
                .map(|id| (id, snapshot.node(id).bounds())),
        );
        if found.is_none() {
            tracing::warn!(?target_area, "nudge target area has no candidate node");
        }
        found
    }

    fn find_hun_nudge_target(
        &mut self,
        snapshot: &Snapshot<K>,
        source: NodeId,
        current_area: NodeId,
        direction: Direction,
        now: u64,
    ) -> Option<NodeId> {
        let hun = self.config.hun?;
        if direction != hun.nudge_direction() {
            return None;
        }
        let hun_window = self.find_hun_window(snapshot)?;
        if hun_window.id() == snapshot.node(source).window() {
            return None;
        }
        let source_bounds = snapshot.node(source).bounds();

        let mut areas = self.focus_areas(snapshot, hun_window.root());
        areas.retain(|&area| self.has_focus_candidate(snapshot, area));
        let target_area = self
            .best_focus_area(snapshot, source_bounds, &areas, direction)
            .or_else(|| areas.first().copied())?;
        tracing::debug!(?target_area, "nudging into the heads-up notification");

        self.cache.save_target_focus_area(
            snapshot.node(current_area).handle(),
            snapshot.node(target_area).handle(),
            direction,
            now,
        );
        if let Some(cached) = self.cached_focus_in(snapshot, target_area, now) {
            return Some(cached);
        }

        let candidates = self.focus_candidates(snapshot, target_area);
        pick_best(
            direction,
            source_bounds,
            candidates
                .iter()
                .filter(|&&id| is_candidate(source_bounds, snapshot.node(id).bounds(), direction))
                .map(|&id| (id, snapshot.node(id).bounds())),
        )
        .or_else(|| candidates.first().copied())
    }

    /// The focus area a nudge goes to, and whether it came from history.
    ///
    /// Nothing is saved here; the caller decides whether the nudge counts.
    fn find_nudge_target_focus_area(
        &mut self,
        snapshot: &Snapshot<K>,
        source: NodeId,
        current_area: NodeId,
        direction: Direction,
        now: u64,
    ) -> Option<(NodeId, bool)> {
        let current = snapshot.node(current_area).handle();
        if let Some(cached) = self.cache.target_focus_area(current, direction, now)
            && let Some(area) = snapshot.find(cached)
            && area != current_area
            && self.has_focus_candidate(snapshot, area)
        {
            return Some((area, true));
        }

        let source_node = snapshot.node(source);
        let source_window = snapshot.window_of(source)?;
        let mut areas: Vec<NodeId> = self
            .focus_areas(snapshot, source_window.root())
            .into_iter()
            .filter(|&area| area != current_area)
            .collect();
        for window in snapshot.windows() {
            if window.id() != source_window.id()
                && is_partially_in_direction(source_window.bounds(), window.bounds(), direction)
            {
                areas.extend(self.focus_areas(snapshot, window.root()));
            }
        }
        areas.retain(|&area| self.has_focus_candidate(snapshot, area));

        let best = self.best_focus_area(snapshot, source_node.bounds(), &areas, direction)?;
        Some((best, false))
    }

    /// The best of `areas` that has a focusable node in `direction`, ranked by
    /// the areas' own bounds.
    fn best_focus_area(
        &self,
        snapshot: &Snapshot<K>,
        source_bounds: Rect,
        areas: &[NodeId],
        direction: Direction,
    ) -> Option<NodeId> {
        pick_best(
            direction,
            source_bounds,
            areas
                .iter()
                .filter(|&&area| {
                    self.focus_candidates(snapshot, area)
                        .into_iter()
                        .any(|id| is_candidate(source_bounds, snapshot.node(id).bounds(), direction))
                })
                .map(|&area| (area, snapshot.node(area).bounds())),
        )
    }

    /// The remembered focus of `area`, if it still exists there and can take focus.
    fn cached_focus_in(&mut self, snapshot: &Snapshot<K>, area: NodeId, now: u64) -> Option<NodeId> {
        let handle = self.cache.focused_node(snapshot.node(area).handle(), now)?;
        let node = snapshot.find(handle)?;
        if !snapshot.node(node).is_focus_candidate() || !snapshot.is_descendant(area, node) {
            return None;
        }
        tracing::debug!(?node, "nudge restores the remembered focus");
        Some(node)
    }

    /// Focusable nodes below `area`, in pre-order, not descending into matches.
    fn focus_candidates(&self, snapshot: &Snapshot<K>, area: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        depth_first_select(
            snapshot,
            area,
            |n| n.id() != area && n.is_focus_candidate(),
            &mut out,
        );
        out
    }

    fn has_focus_candidate(&self, snapshot: &Snapshot<K>, area: NodeId) -> bool {
        !self.focus_candidates(snapshot, area).is_empty()
    }
}

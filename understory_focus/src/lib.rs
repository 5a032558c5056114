// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Focus: directional focus geometry.
//!
//! This crate answers the geometric half of focus navigation:
//! - **Direction vocabulary**: [`Direction`] for directional moves (a nudge of a
//!   rotary controller or an arrow key), [`TabDirection`] for sequential moves
//!   (rotation or Tab/Shift+Tab), and [`WrapMode`] for whether a sequential walk
//!   may wrap around.
//! - **Candidate tests**: [`is_candidate`] decides whether a rectangle lies in a
//!   direction from a source rectangle, and [`is_partially_in_direction`] is the
//!   looser test used to pre-filter whole windows.
//! - **Ordering**: [`is_better_candidate`] compares two candidates relative to a
//!   source, and [`pick_best`] folds it over a list.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_focus::{Direction, is_better_candidate, is_candidate, pick_best};
//!
//! let source = Rect::new(0.0, 0.0, 10.0, 10.0);
//! let ahead = Rect::new(20.0, 0.0, 30.0, 10.0);
//! let diagonal = Rect::new(15.0, 40.0, 25.0, 50.0);
//!
//! assert!(is_candidate(source, ahead, Direction::Right));
//! assert!(is_candidate(source, diagonal, Direction::Right));
//! // Something straight ahead beats something off to the side.
//! assert!(is_better_candidate(Direction::Right, source, ahead, diagonal));
//!
//! let best = pick_best(Direction::Right, source, [(1_u32, diagonal), (2_u32, ahead)]);
//! assert_eq!(best, Some(2));
//! ```
//!
//! ## Ordering rules
//!
//! Candidates are compared in three stages:
//!
//! 1. A candidate overlapping the source's *beam* (the band swept by the source
//!    along the direction of travel) beats one that does not. For vertical moves
//!    this only holds while the beam candidate is closer than the far edge of the
//!    other one.
//! 2. Otherwise the smaller `minor` offset wins, and equal offsets fall back to
//!    the smaller `major` distance. `minor` is the center-to-center offset across
//!    the direction of travel and `major` the edge-to-edge distance along it.
//! 3. A rectangle that is not a candidate never beats anything.
//!
//! [`is_better_candidate`] is irreflexive, so folding it over a list with
//! [`pick_best`] always yields a single deterministic winner (ties keep the
//! earlier entry).
//!
//! Geometry is expressed in terms of [`kurbo::Rect`], matching the rest of the
//! Understory crates. All rectangles passed to one comparison should share a
//! coordinate space (usually screen space).
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::Rect;

/// Direction of a directional (geometric) focus move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    /// Toward smaller `y`.
    Up,
    /// Toward larger `y`.
    Down,
    /// Toward smaller `x`.
    Left,
    /// Toward larger `x`.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// The direction pointing the other way (`Up` and `Down`, `Left` and `Right`).
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether this direction moves along the x axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Direction of a sequential (tab-order) focus move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TabDirection {
    /// Next in tab order (for example, a clockwise rotation or Tab).
    Forward,
    /// Previous in tab order (for example, a counter-clockwise rotation or Shift+Tab).
    Backward,
}

impl TabDirection {
    /// The direction walking the other way.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Wrap mode for sequential traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; reaching the end of the sequence yields no next candidate.
    #[default]
    Never,
    /// Wrap from the end of a window's sequence back to its start (and vice versa).
    Window,
}

/// Returns true if any part of `dest` lies beyond the leading edge of `source`
/// in `direction`.
///
/// This is intentionally permissive: `dest` may overlap `source` as long as it
/// sticks out on the requested side. It is meant for coarse filtering, such as
/// deciding which windows to search when focus leaves the current one.
pub fn is_partially_in_direction(source: Rect, dest: Rect, direction: Direction) -> bool {
    match direction {
        Direction::Left => dest.x0 < source.x0,
        Direction::Right => dest.x1 > source.x1,
        Direction::Up => dest.y0 < source.y0,
        Direction::Down => dest.y1 > source.y1,
    }
}

/// Returns true if `dest` is a candidate for a focus move from `source` in `direction`.
///
/// `dest` must be displaced in `direction`: its trailing edge must be beyond
/// the source's trailing edge (or it must lie entirely past the source's
/// leading edge), and its leading edge must be strictly beyond the source's
/// leading edge. A rectangle identical to `source` is never a candidate.
pub fn is_candidate(source: Rect, dest: Rect, direction: Direction) -> bool {
    match direction {
        Direction::Left => (source.x1 > dest.x1 || source.x0 >= dest.x1) && source.x0 > dest.x0,
        Direction::Right => (source.x0 < dest.x0 || source.x1 <= dest.x0) && source.x1 < dest.x1,
        Direction::Up => (source.y1 > dest.y1 || source.y0 >= dest.y1) && source.y0 > dest.y0,
        Direction::Down => (source.y0 < dest.y0 || source.y1 <= dest.y0) && source.y1 < dest.y1,
    }
}

/// Returns true if `candidate` is a better focus target than `current_best` for a
/// move from `source` in `direction`.
///
/// `candidate` must itself pass [`is_candidate`]. If `current_best` does not,
/// any candidate beats it. See the crate docs for the ordering rules.
pub fn is_better_candidate(
    direction: Direction,
    source: Rect,
    candidate: Rect,
    current_best: Rect,
) -> bool {
    if !is_candidate(source, candidate, direction) {
        return false;
    }
    if !is_candidate(source, current_best, direction) {
        return true;
    }
    if beam_beats(direction, source, candidate, current_best) {
        return true;
    }
    if beam_beats(direction, source, current_best, candidate) {
        return false;
    }
    let (minor, best_minor) = (
        minor_axis_distance(direction, source, candidate),
        minor_axis_distance(direction, source, current_best),
    );
    if minor != best_minor {
        return minor < best_minor;
    }
    major_axis_distance(direction, source, candidate)
        < major_axis_distance(direction, source, current_best)
}

/// Pick the best candidate out of `candidates` for a move from `source` in `direction`.
///
/// The first entry seeds the result and later entries replace it only when
/// [`is_better_candidate`] says so. Callers are expected to pass entries that
/// already qualify (for example via [`is_candidate`]); the seed is kept even if
/// its own rectangle is not a candidate, which lets a container qualify through
/// its contents while still being ranked by its own bounds.
pub fn pick_best<T>(
    direction: Direction,
    source: Rect,
    candidates: impl IntoIterator<Item = (T, Rect)>,
) -> Option<T> {
    let mut best: Option<(T, Rect)> = None;
    for (item, rect) in candidates {
        let replace = match &best {
            None => true,
            Some((_, best_rect)) => is_better_candidate(direction, source, rect, *best_rect),
        };
        if replace {
            best = Some((item, rect));
        }
    }
    best.map(|(item, _)| item)
}

/// Returns true if the two rectangles share a region of non-zero area.
///
/// Rectangles that only touch along an edge do not intersect.
pub fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

fn beam_beats(direction: Direction, source: Rect, rect1: Rect, rect2: Rect) -> bool {
    let rect1_in_beam = beams_overlap(direction, source, rect1);
    let rect2_in_beam = beams_overlap(direction, source, rect2);
    // rect1 only wins if it is exclusively in the beam.
    if rect2_in_beam || !rect1_in_beam {
        return false;
    }
    if !is_to_direction_of(direction, source, rect2) {
        return true;
    }
    if direction.is_horizontal() {
        return true;
    }
    // Vertically, beams only beat up to the far edge of the other rectangle.
    major_axis_distance(direction, source, rect1)
        < major_axis_distance_to_far_edge(direction, source, rect2)
}

fn beams_overlap(direction: Direction, source: Rect, rect: Rect) -> bool {
    if direction.is_horizontal() {
        rect.y1 > source.y0 && rect.y0 < source.y1
    } else {
        rect.x1 > source.x0 && rect.x0 < source.x1
    }
}

fn is_to_direction_of(direction: Direction, source: Rect, dest: Rect) -> bool {
    match direction {
        Direction::Left => source.x0 >= dest.x1,
        Direction::Right => source.x1 <= dest.x0,
        Direction::Up => source.y0 >= dest.y1,
        Direction::Down => source.y1 <= dest.y0,
    }
}

fn major_axis_distance(direction: Direction, source: Rect, dest: Rect) -> f64 {
    let raw = match direction {
        Direction::Left => source.x0 - dest.x1,
        Direction::Right => dest.x0 - source.x1,
        Direction::Up => source.y0 - dest.y1,
        Direction::Down => dest.y0 - source.y1,
    };
    raw.max(0.0)
}

fn major_axis_distance_to_far_edge(direction: Direction, source: Rect, dest: Rect) -> f64 {
    let raw = match direction {
        Direction::Left => source.x0 - dest.x0,
        Direction::Right => dest.x1 - source.x1,
        Direction::Up => source.y0 - dest.y0,
        Direction::Down => dest.y1 - source.y1,
    };
    raw.max(1.0)
}

fn minor_axis_distance(direction: Direction, source: Rect, dest: Rect) -> f64 {
    let (sc, dc) = (source.center(), dest.center());
    if direction.is_horizontal() {
        (sc.y - dc.y).abs()
    } else {
        (sc.x - dc.x).abs()
    }
}

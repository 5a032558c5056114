// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for snapshots: identifiers, node kinds, flags, and actions.

use core::fmt::Debug;
use core::hash::Hash;

use understory_focus::TabDirection;

/// Bound for caller-chosen node keys.
///
/// A key identifies a node within its window for as long as the underlying UI
/// element lives, across snapshots. Small copyable handles (integers, interned
/// ids) are typical.
pub trait NodeKey: Copy + Eq + Hash + Debug {}

impl<K: Copy + Eq + Hash + Debug> NodeKey for K {}

/// Identifier of a window, stable across snapshots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u32);

/// Coarse classification of a window.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// A regular application window.
    #[default]
    Application,
    /// A system window (status bar, navigation bar, notifications).
    System,
    /// An input-method (on-screen keyboard) window.
    InputMethod,
    /// Anything else.
    Other,
}

/// Index of a node within one [`Snapshot`](crate::Snapshot).
///
/// A `NodeId` is only meaningful for the snapshot that produced it. Use a
/// [`NodeHandle`] to refer to a node across snapshots.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Stable identity of a node: its window plus the caller's key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle<K> {
    /// Window the node belongs to.
    pub window: WindowId,
    /// Caller-chosen key, unique within the window.
    pub key: K,
}

/// Role of a node in focus navigation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// An ordinary view or container.
    #[default]
    Ordinary,
    /// A focus area: a grouping boundary that rotation does not leave.
    ///
    /// Focus areas do not nest; searches stop descending at the first one found.
    FocusArea,
    /// The per-window placeholder focused to represent "no real focus".
    ///
    /// It is never a rotation, nudge, or first-focus target.
    FocusParkingView,
}

bitflags::bitflags! {
    /// Node state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is visible to the user.
        const VISIBLE    = 0b0000_0001;
        /// Node accepts focus.
        const FOCUSABLE  = 0b0000_0010;
        /// Node is enabled.
        const ENABLED    = 0b0000_0100;
        /// Node is a scrollable container.
        const SCROLLABLE = 0b0000_1000;
        /// Node is an editable text field.
        const EDITABLE   = 0b0001_0000;
        /// All flags required for a node to take focus.
        const TAKES_FOCUS = Self::VISIBLE.bits() | Self::FOCUSABLE.bits() | Self::ENABLED.bits();
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::ENABLED
    }
}

bitflags::bitflags! {
    /// Actions a node supports.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Actions: u8 {
        /// The node can be focused.
        const FOCUS           = 0b0000_0001;
        /// The node can be clicked.
        const CLICK           = 0b0000_0010;
        /// The container can scroll toward later content.
        const SCROLL_FORWARD  = 0b0000_0100;
        /// The container can scroll toward earlier content.
        const SCROLL_BACKWARD = 0b0000_1000;
    }
}

impl Actions {
    /// The scroll action that reveals content in tab `direction`.
    pub const fn scroll_toward(direction: TabDirection) -> Self {
        match direction {
            TabDirection::Forward => Self::SCROLL_FORWARD,
            TabDirection::Backward => Self::SCROLL_BACKWARD,
        }
    }
}

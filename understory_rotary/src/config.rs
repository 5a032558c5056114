// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigator configuration.

use core::cmp::Ordering;

use understory_event_state::history::CachePolicy;
use understory_focus::Direction;

use crate::error::ConfigError;

/// Retention settings for one history map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// How long entries stay usable.
    pub policy: CachePolicy,
    /// Maximum number of entries.
    pub capacity: usize,
}

impl CacheConfig {
    /// Keep up to `capacity` entries for `timeout_ms` each.
    pub const fn expire_after(timeout_ms: u64, capacity: usize) -> Self {
        Self {
            policy: CachePolicy::ExpireAfter { timeout_ms },
            capacity,
        }
    }

    /// Keep up to `capacity` entries until evicted.
    pub const fn never_expire(capacity: usize) -> Self {
        Self {
            policy: CachePolicy::NeverExpire,
            capacity,
        }
    }

    /// Remember nothing.
    pub const fn disabled() -> Self {
        Self {
            policy: CachePolicy::Disabled,
            capacity: 0,
        }
    }

    fn validate(&self, cache: &'static str) -> Result<(), ConfigError> {
        match self.policy {
            CachePolicy::Disabled => Ok(()),
            _ if self.capacity == 0 => Err(ConfigError::ZeroCapacity { cache }),
            CachePolicy::ExpireAfter { timeout_ms: 0 } => Err(ConfigError::ZeroTimeout { cache }),
            _ => Ok(()),
        }
    }
}

/// How to recognize the heads-up notification window.
///
/// The HUN is a [`System`](crate::WindowKind::System) window whose left and
/// right edges match these bounds exactly. Its top and bottom vary with the
/// notification's height and are not compared.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HunConfig {
    /// Left edge of the HUN window in screen coordinates.
    pub left: f64,
    /// Right edge of the HUN window in screen coordinates.
    pub right: f64,
    /// Whether notifications appear at the top of the screen.
    pub show_on_top: bool,
}

impl HunConfig {
    /// The nudge direction that jumps into the HUN.
    pub const fn nudge_direction(&self) -> Direction {
        if self.show_on_top {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Settings for a [`Navigator`](crate::Navigator).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NavigatorConfig {
    /// Last focused node per focus area.
    pub focus_history: CacheConfig,
    /// Last nudge target per (focus area, direction).
    pub focus_area_history: CacheConfig,
    /// Kind of each window that held focus.
    pub window_history: CacheConfig,
    /// Forget nudge targets whenever a rotation is processed.
    pub clear_focus_area_history_when_rotating: bool,
    /// HUN recognition; `None` disables the HUN shortcut.
    pub hun: Option<HunConfig>,
    /// Only look this many levels below a window root for focus areas.
    pub focus_area_scan_depth: Option<usize>,
    /// Honor the `skip` node passed to rotation.
    pub honor_skip_node: bool,
    /// Nudging out of the input method returns to the node being edited.
    pub ime_exit_to_edit_node: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            focus_history: CacheConfig::expire_after(60_000, 5),
            focus_area_history: CacheConfig::expire_after(60_000, 5),
            window_history: CacheConfig::never_expire(5),
            clear_focus_area_history_when_rotating: true,
            hun: None,
            focus_area_scan_depth: None,
            honor_skip_node: true,
            ime_exit_to_edit_node: true,
        }
    }
}

impl NavigatorConfig {
    /// Check for settings that can never work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.focus_history.validate("focus")?;
        self.focus_area_history.validate("focus area")?;
        self.window_history.validate("window")?;
        if let Some(hun) = &self.hun
            && hun.left.partial_cmp(&hun.right) != Some(Ordering::Less)
        {
            return Err(ConfigError::InvalidHunBounds {
                left: hun.left,
                right: hun.right,
            });
        }
        if self.focus_area_scan_depth == Some(0) {
            return Err(ConfigError::ZeroScanDepth);
        }
        Ok(())
    }
}

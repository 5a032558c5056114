// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_rotary --heading-base-level=0

//! Understory Rotary: focus targeting for rotary controllers.
//!
//! A rotary controller has three inputs: **rotate** (step through nearby
//! controls), **nudge** (jump up, down, left, or right to another group of
//! controls), and **center-click**. This crate decides where focus goes for the
//! first two. It does not render, read devices, or move focus itself.
//!
//! The host describes what is on screen as a [`Snapshot`]: a list of windows,
//! each with a tree of nodes carrying screen bounds, state [`NodeFlags`],
//! supported [`Actions`], and a [`NodeKind`]. Two kinds matter to navigation:
//!
//! - A **focus area** groups controls. Rotation stays inside it; nudges move
//!   between focus areas, across windows if needed. A window without focus
//!   areas acts as one.
//! - A **focus parking view** is a per-window placeholder focused to mean "no
//!   real focus here". It is never a navigation target.
//!
//! The [`Navigator`] answers the queries and keeps a small focus history in a
//! [`RotaryCache`], so that nudging back returns to where the user left off.
//! Time is always passed in by the caller, in milliseconds.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_focus::{Direction, TabDirection};
//! use understory_rotary::{Navigator, NavigatorConfig, NodeSpec, Snapshot, WindowId, WindowKind};
//!
//! let screen = Rect::new(0.0, 0.0, 400.0, 200.0);
//! let mut b = Snapshot::builder();
//! let root = b
//!     .add_window(WindowId(1), WindowKind::Application, screen, NodeSpec::new(0_u32, screen))
//!     .unwrap();
//! let menu = b
//!     .add_child(root, NodeSpec::focus_area(1, Rect::new(0.0, 0.0, 100.0, 200.0)))
//!     .unwrap();
//! let first = b
//!     .add_child(menu, NodeSpec::view(2, Rect::new(0.0, 0.0, 100.0, 50.0)))
//!     .unwrap();
//! let second = b
//!     .add_child(menu, NodeSpec::view(3, Rect::new(0.0, 50.0, 100.0, 100.0)))
//!     .unwrap();
//! let content = b
//!     .add_child(root, NodeSpec::focus_area(4, Rect::new(100.0, 0.0, 400.0, 200.0)))
//!     .unwrap();
//! let play = b
//!     .add_child(content, NodeSpec::view(5, Rect::new(200.0, 50.0, 300.0, 100.0)))
//!     .unwrap();
//! let snapshot = b.build();
//!
//! let mut nav = Navigator::new(NavigatorConfig::default()).unwrap();
//!
//! // Rotation stays in the menu, however far the knob turns.
//! let rotated = nav
//!     .find_rotate_target(&snapshot, first, None, TabDirection::Forward, 5)
//!     .unwrap();
//! assert_eq!((rotated.node, rotated.advanced), (second, 1));
//!
//! // A nudge to the right moves into the content area.
//! nav.save_focused_node(&snapshot, second, 1_000);
//! assert_eq!(nav.find_nudge_target(&snapshot, second, Direction::Right, None, 1_100), Some(play));
//!
//! // Nudging back returns to the remembered menu entry.
//! nav.save_focused_node(&snapshot, play, 1_200);
//! assert_eq!(nav.find_nudge_target(&snapshot, play, Direction::Left, None, 1_300), Some(second));
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for dependencies such as `kurbo`.
//! - `libm`: enables `no_std` + `alloc` builds that rely on `libm` for floating-point math.
//! - `serde`: derives `Serialize` and `Deserialize` for the configuration types.
//!
//! This crate is `no_std` and uses `alloc`. Diagnostics are emitted through
//! [`tracing`]; install a subscriber to see them.

#![no_std]

extern crate alloc;

mod cache;
mod config;
mod error;
mod navigator;
mod snapshot;
mod tab_order;
pub mod traverse;
mod types;

pub use cache::RotaryCache;
pub use config::{CacheConfig, HunConfig, NavigatorConfig};
pub use error::{ConfigError, SnapshotError};
pub use navigator::{Navigator, RotateTarget};
pub use snapshot::{Node, NodeSpec, Snapshot, SnapshotBuilder, Window};
pub use tab_order::{TabOrder, TreeOrder};
pub use types::{Actions, NodeFlags, NodeHandle, NodeId, NodeKey, NodeKind, WindowId, WindowKind};

pub use understory_event_state::history::CachePolicy;

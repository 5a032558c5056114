// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: small, time-aware state machines for input handling.
//!
//! Input layers often need to remember a little about the recent past: where
//! focus was in a region before the user left it, which requests are still in
//! flight, and so on. This crate collects those helpers. None of them own a
//! clock. Every operation takes the caller's current timestamp (`now`, in
//! milliseconds from any monotonic origin), which keeps them deterministic and
//! easy to test.
//!
//! - [`history`]: [`HistoryMap`](history::HistoryMap), a fixed-capacity LRU map
//!   whose entries can optionally expire after a timeout.
//! - [`pending`]: [`PendingFocus`](pending::PendingFocus), a set of keys for
//!   which an action was issued but not yet confirmed, with time-based expiry.
//!
//! ```
//! use understory_event_state::history::{CachePolicy, HistoryMap};
//!
//! let mut recent: HistoryMap<&str, u32> =
//!     HistoryMap::new(CachePolicy::ExpireAfter { timeout_ms: 500 }, 2);
//! recent.insert("toolbar", 7, 1_000);
//! assert_eq!(recent.get(&"toolbar", 1_400), Some(&7));
//! assert_eq!(recent.get(&"toolbar", 1_600), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod history;
pub mod pending;

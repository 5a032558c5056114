// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracking of focus requests that were issued but not yet confirmed.
//!
//! Performing a focus action on a UI element is asynchronous: the request goes
//! out, and some time later an event reports that the element is focused. If
//! the same request is issued again in between (for example because a second
//! input arrives before the confirmation), it should be treated as already in
//! flight. [`PendingFocus`] remembers recent requests for a bounded time so
//! callers can make focus requests idempotent.
//!
//! ```
//! use understory_event_state::pending::PendingFocus;
//!
//! let mut pending = PendingFocus::with_timeout(200);
//! assert!(pending.insert(42_u32, 1_000));
//! // Issuing the same request again is a no-op while it is pending.
//! assert!(!pending.insert(42, 1_050));
//! // The confirmation event clears it.
//! assert!(pending.remove(&42, 1_100));
//! assert!(!pending.contains(&42, 1_100));
//! ```

use core::hash::Hash;

use hashbrown::HashMap;

/// Default time a request stays pending without confirmation, in milliseconds.
pub const DEFAULT_PENDING_TIMEOUT_MS: u64 = 1_000;

/// A short-lived set of keys with pending focus requests.
#[derive(Clone, Debug)]
pub struct PendingFocus<K> {
    /// How long a request stays pending without confirmation (milliseconds).
    pub timeout_ms: u64,
    requested_at: HashMap<K, u64>,
}

impl<K: Eq + Hash> Default for PendingFocus<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash> PendingFocus<K> {
    /// Create an empty tracker with [`DEFAULT_PENDING_TIMEOUT_MS`].
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_PENDING_TIMEOUT_MS)
    }

    /// Create an empty tracker with a custom timeout in milliseconds.
    pub fn with_timeout(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            requested_at: HashMap::new(),
        }
    }

    /// Record a request for `key` at `now`.
    ///
    /// Returns `true` if the key was not already pending (a fresh request),
    /// `false` if an unexpired request was already recorded. Either way the
    /// request time is left at the original request.
    pub fn insert(&mut self, key: K, now: u64) -> bool {
        if self.contains(&key, now) {
            return false;
        }
        self.requested_at.insert(key, now);
        true
    }

    /// Returns true if a request for `key` is pending at `now`.
    pub fn contains(&self, key: &K, now: u64) -> bool {
        self.requested_at
            .get(key)
            .is_some_and(|&at| self.is_live(at, now))
    }

    /// Clear the request for `key`, typically when its confirmation arrives.
    ///
    /// Returns `true` if the request was still pending at `now`.
    pub fn remove(&mut self, key: &K, now: u64) -> bool {
        match self.requested_at.remove(key) {
            Some(at) => self.is_live(at, now),
            None => false,
        }
    }

    /// Drop every request that has expired at `now`, returning how many were dropped.
    pub fn purge_expired(&mut self, now: u64) -> usize {
        let before = self.requested_at.len();
        let timeout_ms = self.timeout_ms;
        self.requested_at
            .retain(|_, &mut at| now.saturating_sub(at) <= timeout_ms);
        before - self.requested_at.len()
    }

    /// Number of recorded requests, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.requested_at.len()
    }

    /// Returns true if no requests are recorded.
    pub fn is_empty(&self) -> bool {
        self.requested_at.is_empty()
    }

    /// Forget every request.
    pub fn clear(&mut self) {
        self.requested_at.clear();
    }

    fn is_live(&self, requested_at: u64, now: u64) -> bool {
        now.saturating_sub(requested_at) <= self.timeout_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_requests_are_deduplicated() {
        let mut pending = PendingFocus::with_timeout(100);
        assert!(pending.insert(1_u32, 0));
        assert!(!pending.insert(1, 50));
        assert!(pending.insert(2, 50));
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn requests_expire() {
        let mut pending = PendingFocus::with_timeout(100);
        pending.insert(1_u32, 0);
        assert!(pending.contains(&1, 100));
        assert!(!pending.contains(&1, 101));
        // An expired request can be issued again.
        assert!(pending.insert(1, 150));
        assert!(pending.contains(&1, 200));
    }

    #[test]
    fn remove_reports_whether_request_was_live() {
        let mut pending = PendingFocus::with_timeout(10);
        pending.insert(1_u32, 0);
        pending.insert(2, 0);
        assert!(pending.remove(&1, 5));
        assert!(!pending.remove(&2, 50));
        assert!(!pending.remove(&3, 0));
        assert!(pending.is_empty());
    }

    #[test]
    fn purge_drops_only_expired() {
        let mut pending = PendingFocus::with_timeout(10);
        pending.insert(1_u32, 0);
        pending.insert(2, 8);
        assert_eq!(pending.purge_expired(15), 1);
        assert!(pending.contains(&2, 15));
        assert_eq!(pending.len(), 1);
    }
}

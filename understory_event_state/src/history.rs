// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-capacity history maps with least-recently-used eviction and optional expiry.
//!
//! A [`HistoryMap`] remembers a bounded number of key/value pairs together with
//! the time they were saved. Its [`CachePolicy`] decides how long an entry stays
//! usable:
//!
//! - [`CachePolicy::Disabled`]: nothing is stored and every read misses.
//! - [`CachePolicy::NeverExpire`]: entries stay until evicted for capacity.
//! - [`CachePolicy::ExpireAfter`]: entries older than the timeout read as
//!   absent. Expiry is checked lazily when an entry is read; there is no sweeper.
//!
//! When an insert would exceed the capacity, expired entries are dropped first,
//! then the least recently used one. Both [`HistoryMap::insert`] and
//! [`HistoryMap::get`] count as a use; [`HistoryMap::peek`] does not.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// Retention policy of a [`HistoryMap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CachePolicy {
    /// Do not remember anything.
    Disabled,
    /// Keep entries until they are evicted for capacity.
    NeverExpire,
    /// Keep entries for at most `timeout_ms` milliseconds after they were saved.
    ExpireAfter {
        /// Maximum age of a usable entry, in milliseconds.
        timeout_ms: u64,
    },
}

impl CachePolicy {
    /// Whether an entry saved at `saved_at` is still usable at `now`.
    ///
    /// A timestamp earlier than `saved_at` is treated as zero elapsed time.
    pub fn is_valid(self, saved_at: u64, now: u64) -> bool {
        match self {
            Self::Disabled => false,
            Self::NeverExpire => true,
            Self::ExpireAfter { timeout_ms } => now.saturating_sub(saved_at) <= timeout_ms,
        }
    }
}

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    saved_at: u64,
    // Use counter at the time of the save; orders saves sharing a timestamp.
    saved_seq: u64,
    last_use: u64,
}

/// A bounded LRU map whose entries may expire.
///
/// See the [module docs](self) for the retention rules.
#[derive(Clone, Debug)]
pub struct HistoryMap<K, V> {
    policy: CachePolicy,
    capacity: usize,
    entries: HashMap<K, Entry<V>>,
    // Monotonic use counter; independent of caller timestamps, which may repeat.
    uses: u64,
}

impl<K, V> HistoryMap<K, V>
where
    K: Clone + Eq + Hash,
{
    /// Create an empty map with the given policy and capacity.
    ///
    /// A capacity of zero behaves like [`CachePolicy::Disabled`].
    pub fn new(policy: CachePolicy, capacity: usize) -> Self {
        Self {
            policy,
            capacity,
            entries: HashMap::new(),
            uses: 0,
        }
    }

    /// The retention policy.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// The maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether this map stores anything at all.
    pub fn is_enabled(&self) -> bool {
        self.policy != CachePolicy::Disabled && self.capacity > 0
    }

    /// Number of stored entries, including expired ones that have not been read since.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Save `value` under `key` at time `now`, replacing any previous value.
    pub fn insert(&mut self, key: K, value: V, now: u64) {
        if !self.is_enabled() {
            return;
        }
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict(now);
        }
        let last_use = self.next_use();
        self.entries.insert(
            key,
            Entry {
                value,
                saved_at: now,
                saved_seq: last_use,
                last_use,
            },
        );
    }

    /// Look up `key` at time `now`, marking it as recently used.
    ///
    /// Expired entries are removed and read as `None`.
    pub fn get(&mut self, key: &K, now: u64) -> Option<&V> {
        let saved_at = self.entries.get(key)?.saved_at;
        if !self.policy.is_valid(saved_at, now) {
            self.entries.remove(key);
            return None;
        }
        let last_use = self.next_use();
        let entry = self.entries.get_mut(key)?;
        entry.last_use = last_use;
        Some(&entry.value)
    }

    /// Look up `key` at time `now` without touching its recency.
    pub fn peek(&self, key: &K, now: u64) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|e| self.policy.is_valid(e.saved_at, now))
            .map(|e| &e.value)
    }

    /// When `key` was last saved, if it is stored (expired or not).
    pub fn saved_at(&self, key: &K) -> Option<u64> {
        self.entries.get(key).map(|e| e.saved_at)
    }

    /// Remove `key`, returning its value if it was stored.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn next_use(&mut self) -> u64 {
        self.uses += 1;
        self.uses
    }

    fn evict(&mut self, now: u64) {
        let policy = self.policy;
        self.entries.retain(|_, e| policy.is_valid(e.saved_at, now));
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_use)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            self.entries.remove(&oldest);
        }
    }
}

impl<K, V> HistoryMap<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    /// Snapshot valid entries at `now`, newest save first.
    ///
    /// Saves sharing a timestamp are ordered by when they were inserted, so the
    /// order is deterministic.
    pub fn newest_first(&self, now: u64) -> Vec<(K, V, u64)> {
        let policy = self.policy;
        let mut entries: Vec<(&K, &Entry<V>)> = self
            .entries
            .iter()
            .filter(|(_, e)| policy.is_valid(e.saved_at, now))
            .collect();
        entries.sort_by(|a, b| (b.1.saved_at, b.1.saved_seq).cmp(&(a.1.saved_at, a.1.saved_seq)));
        entries
            .into_iter()
            .map(|(k, e)| (k.clone(), e.value.clone(), e.saved_at))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_is_inclusive_of_the_timeout() {
        let mut map = HistoryMap::new(CachePolicy::ExpireAfter { timeout_ms: 100 }, 4);
        map.insert(1_u32, "a", 1_000);
        assert_eq!(map.get(&1, 1_099), Some(&"a"));
        assert_eq!(map.get(&1, 1_100), Some(&"a"));
        assert_eq!(map.get(&1, 1_101), None);
        // Expired reads drop the entry.
        assert!(map.is_empty());
    }

    #[test]
    fn never_expire_ignores_age() {
        let mut map = HistoryMap::new(CachePolicy::NeverExpire, 4);
        map.insert(1_u32, 10_u32, 0);
        assert_eq!(map.get(&1, u64::MAX), Some(&10));
    }

    #[test]
    fn disabled_stores_nothing() {
        let mut map = HistoryMap::new(CachePolicy::Disabled, 4);
        map.insert(1_u32, 10_u32, 0);
        assert!(map.is_empty());
        assert_eq!(map.get(&1, 0), None);

        let mut zero = HistoryMap::new(CachePolicy::NeverExpire, 0);
        zero.insert(1_u32, 10_u32, 0);
        assert!(!zero.is_enabled());
        assert!(zero.is_empty());
    }

    #[test]
    fn capacity_evicts_least_recently_used() {
        let mut map = HistoryMap::new(CachePolicy::NeverExpire, 3);
        map.insert(1_u32, 'a', 0);
        map.insert(2, 'b', 1);
        map.insert(3, 'c', 2);
        // Touch 1 so that 2 becomes the least recently used.
        assert_eq!(map.get(&1, 3), Some(&'a'));
        map.insert(4, 'd', 4);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&2, 5), None);
        assert_eq!(map.get(&1, 5), Some(&'a'));
        assert_eq!(map.get(&3, 5), Some(&'c'));
        assert_eq!(map.get(&4, 5), Some(&'d'));
    }

    #[test]
    fn capacity_plus_one_evicts_exactly_one() {
        let mut map = HistoryMap::new(CachePolicy::NeverExpire, 5);
        for k in 0..6_u32 {
            map.insert(k, k * 10, u64::from(k));
        }
        assert_eq!(map.len(), 5);
        assert_eq!(map.peek(&0, 10), None);
        for k in 1..6_u32 {
            assert_eq!(map.peek(&k, 10), Some(&(k * 10)));
        }
    }

    #[test]
    fn replacing_a_key_does_not_evict() {
        let mut map = HistoryMap::new(CachePolicy::NeverExpire, 2);
        map.insert(1_u32, 'a', 0);
        map.insert(2, 'b', 0);
        map.insert(1, 'z', 1);
        assert_eq!(map.len(), 2);
        assert_eq!(map.peek(&1, 1), Some(&'z'));
        assert_eq!(map.saved_at(&1), Some(1));
    }

    #[test]
    fn expired_entries_are_evicted_before_live_ones() {
        let mut map = HistoryMap::new(CachePolicy::ExpireAfter { timeout_ms: 10 }, 2);
        map.insert(1_u32, 'a', 90);
        map.insert(2, 'b', 95);
        // Touch 1 so that 2 is the least recently used.
        assert_eq!(map.get(&1, 98), Some(&'a'));
        // At 102 entry 1 has expired; it goes first and 2 survives.
        map.insert(3, 'c', 102);
        assert_eq!(map.peek(&2, 102), Some(&'b'));
        assert_eq!(map.peek(&3, 102), Some(&'c'));
        assert_eq!(map.saved_at(&1), None);
    }

    #[test]
    fn repeated_reads_are_idempotent() {
        let mut map = HistoryMap::new(CachePolicy::ExpireAfter { timeout_ms: 50 }, 2);
        map.insert(7_u32, 70_u32, 10);
        let first = map.get(&7, 20).copied();
        let second = map.get(&7, 20).copied();
        assert_eq!(first, second);
        assert_eq!(first, Some(70));
    }

    #[test]
    fn newest_first_orders_by_save_time() {
        let mut map = HistoryMap::new(CachePolicy::ExpireAfter { timeout_ms: 100 }, 4);
        map.insert(1_u32, 'a', 10);
        map.insert(2, 'b', 30);
        map.insert(3, 'c', 20);
        map.insert(4, 'd', 0);
        let keys: Vec<u32> = map.newest_first(105).into_iter().map(|(k, _, _)| k).collect();
        // Entry 4 is expired at 105.
        assert_eq!(keys, [2, 3, 1]);
    }

    #[test]
    fn newest_first_breaks_timestamp_ties_by_insertion() {
        let mut map = HistoryMap::new(CachePolicy::NeverExpire, 8);
        for k in 0..6_u32 {
            map.insert(k, k, 5);
        }
        // Reads do not reorder saves.
        assert_eq!(map.get(&0, 5), Some(&0));
        // Re-saving moves a key to the front.
        map.insert(2, 20, 5);
        let keys: Vec<u32> = map.newest_first(5).into_iter().map(|(k, _, _)| k).collect();
        assert_eq!(keys, [2, 5, 4, 3, 1, 0]);
    }
}

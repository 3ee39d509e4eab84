//! Cache Table Module
//!
//! Memo table combining HashMap storage with insertion-order tracking and
//! TTL expiration. All methods assume the caller holds the table lock.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, Clock, InsertionOrder};

// == Lookup Outcome ==
/// Result of looking up a key in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Fresh entry found
    Hit(V),
    /// Absent or expired; the caller must compute
    Miss,
}

// == Cache Table ==
/// Memo storage with oldest-first eviction and TTL support.
#[derive(Debug)]
pub struct CacheTable<K, V> {
    /// Key to memoized result
    entries: HashMap<K, CacheEntry<V>>,
    /// Eviction order
    order: InsertionOrder<K>,
    /// Performance statistics
    stats: CacheStats,
    /// Lifetime of every entry
    ttl: Duration,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Next insertion sequence number
    next_seq: u64,
    /// Time source for stamping and aging entries
    clock: Arc<dyn Clock>,
}

impl<K, V> CacheTable<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty table. Parameters are validated by the caller.
    pub fn new(ttl: Duration, max_size: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            stats: CacheStats::new(),
            ttl,
            max_size,
            next_seq: 0,
            clock,
        }
    }

    // == Lookup ==
    /// Looks up `key`, recording exactly one hit or one miss.
    ///
    /// An expired entry is removed and reported as a miss.
    pub fn lookup(&mut self, key: &K) -> Lookup<V> {
        let now = self.clock.now();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now, self.ttl) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                return Lookup::Hit(value);
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.remove(key);
            self.stats.record_expirations(1);
        }

        self.stats.record_miss();
        Lookup::Miss
    }

    // == Insert ==
    /// Stores a freshly computed value, replacing any entry for `key`.
    ///
    /// Evicts oldest entries until the table is within capacity and returns
    /// how many were evicted.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        let now = self.clock.now();
        let seq = self.next_seq;
        self.next_seq += 1;

        if let Some(previous) = self
            .entries
            .insert(key.clone(), CacheEntry::new(value, now, seq))
        {
            self.order.remove(previous.seq);
        }
        self.order.push(seq, key);

        let mut evicted = 0;
        while self.entries.len() > self.max_size {
            let Some(oldest) = self.order.pop_oldest() else {
                break;
            };
            self.entries.remove(&oldest);
            self.stats.record_eviction();
            evicted += 1;
        }

        assert!(
            self.entries.len() <= self.max_size,
            "cache holds {} entries, max_size is {}",
            self.entries.len(),
            self.max_size
        );
        assert_eq!(
            self.entries.len(),
            self.order.len(),
            "eviction order out of sync with entries"
        );

        evicted
    }

    // == Sweep Expired ==
    /// Removes every entry whose age has reached the TTL.
    ///
    /// Returns the number of entries removed. Hit/miss counters are untouched.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut expired_seqs = Vec::new();

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired(now, ttl);
            if !keep {
                expired_seqs.push(entry.seq);
            }
            keep
        });

        for seq in &expired_seqs {
            self.order.remove(*seq);
        }

        self.stats.record_expirations(expired_seqs.len());
        expired_seqs.len()
    }

    // == Record Failure ==
    /// Counts a miss whose computation failed.
    pub fn record_failure(&mut self) {
        self.stats.record_failure();
    }

    // == Contains ==
    /// True if `key` has a fresh entry. Does not count as a lookup.
    pub fn contains(&self, key: &K) -> bool {
        let now = self.clock.now();
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now, self.ttl))
    }

    // == Stats ==
    /// Returns a snapshot of the counters with the current size.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_size(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Replaces the time source.
    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    fn remove(&mut self, key: &K) {
        if let Some(entry) = self.entries.remove(key) {
            self.order.remove(entry.seq);
        }
    }
}

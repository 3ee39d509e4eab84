//! Cache Entry Module
//!
//! Defines the structure for individual memoized results.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A computed value with the instant it was stored.
///
/// Entries are never mutated; recomputing a key replaces its entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The memoized value
    pub value: V,
    /// Instant the value was inserted
    pub created_at: Instant,
    /// Insertion sequence number, breaks ties between equal timestamps
    pub seq: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    pub fn new(value: V, created_at: Instant, seq: u64) -> Self {
        Self {
            value,
            created_at,
            seq,
        }
    }

    // == Age ==
    /// Time elapsed since insertion, saturating at zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry whose age equals the TTL is expired, so a
    /// hit always has age strictly below the TTL.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_fresh() {
        let now = Instant::now();
        let entry = CacheEntry::new(42, now, 0);

        assert_eq!(entry.value, 42);
        assert_eq!(entry.age(now), Duration::ZERO);
        assert!(!entry.is_expired(now, Duration::from_secs(1)));
    }

    #[test]
    fn test_entry_expiration() {
        let now = Instant::now();
        let entry = CacheEntry::new("v", now, 0);

        let later = now + Duration::from_millis(1500);
        assert!(entry.is_expired(later, Duration::from_secs(1)));
        assert!(!entry.is_expired(later, Duration::from_secs(2)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new("v", now, 0);

        let ttl = Duration::from_secs(10);
        assert!(!entry.is_expired(now + ttl - Duration::from_nanos(1), ttl));
        assert!(entry.is_expired(now + ttl, ttl), "Entry should be expired at boundary");
    }

    #[test]
    fn test_age_before_creation_saturates() {
        let now = Instant::now();
        let entry = CacheEntry::new((), now + Duration::from_secs(1), 0);
        assert_eq!(entry.age(now), Duration::ZERO);
    }
}

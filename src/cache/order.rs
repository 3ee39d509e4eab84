//! Insertion Order Module
//!
//! Tracks entry age for oldest-first eviction.

use std::collections::BTreeMap;

// == Insertion Order ==
/// Orders keys by insertion sequence number.
///
/// Sequence numbers are handed out under the table lock together with the
/// entry timestamp, so the smallest sequence is also the oldest `created_at`,
/// with ties resolved by insertion order.
#[derive(Debug)]
pub struct InsertionOrder<K> {
    /// Keys by sequence number (first = oldest)
    order: BTreeMap<u64, K>,
}

impl<K> InsertionOrder<K> {
    // == Constructor ==
    pub fn new() -> Self {
        Self {
            order: BTreeMap::new(),
        }
    }

    // == Push ==
    /// Records `key` as inserted at `seq`.
    pub fn push(&mut self, seq: u64, key: K) {
        self.order.insert(seq, key);
    }

    // == Remove ==
    /// Forgets the slot for `seq`, returning its key.
    pub fn remove(&mut self, seq: u64) -> Option<K> {
        self.order.remove(&seq)
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key.
    ///
    /// Returns None if nothing is tracked.
    pub fn pop_oldest(&mut self) -> Option<K> {
        self.order.pop_first().map(|(_, key)| key)
    }

    // == Peek Oldest ==
    #[allow(dead_code)]
    pub fn peek_oldest(&self) -> Option<&K> {
        self.order.first_key_value().map(|(_, key)| key)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K> Default for InsertionOrder<K> {
    fn default() -> Self {
        Self::new()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_new() {
        let order: InsertionOrder<u32> = InsertionOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn test_order_oldest_is_first_pushed() {
        let mut order = InsertionOrder::new();
        order.push(0, "a");
        order.push(1, "b");
        order.push(2, "c");

        assert_eq!(order.peek_oldest(), Some(&"a"));
        assert_eq!(order.pop_oldest(), Some("a"));
        assert_eq!(order.pop_oldest(), Some("b"));
        assert_eq!(order.pop_oldest(), Some("c"));
        assert_eq!(order.pop_oldest(), None);
    }

    #[test]
    fn test_order_reinsert_moves_to_back() {
        let mut order = InsertionOrder::new();
        order.push(0, "a");
        order.push(1, "b");

        // "a" recomputed: old slot dropped, new slot at the back
        assert_eq!(order.remove(0), Some("a"));
        order.push(2, "a");

        assert_eq!(order.pop_oldest(), Some("b"));
        assert_eq!(order.pop_oldest(), Some("a"));
    }

    #[test]
    fn test_order_remove_unknown_seq() {
        let mut order = InsertionOrder::new();
        order.push(0, 1u8);

        assert_eq!(order.remove(7), None);
        assert_eq!(order.len(), 1);
    }
}

//! Cache Module
//!
//! Provides function memoization with TTL expiration and oldest-first eviction.

mod clock;
mod entry;
mod memo;
mod order;
mod stats;
mod table;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use memo::MemoizingCache;
pub use stats::CacheStats;

// Internal building blocks of MemoizingCache
pub(crate) use entry::CacheEntry;
pub(crate) use order::InsertionOrder;
pub(crate) use table::{CacheTable, Lookup};

//! Memo Cache - a thread-safe memoizing cache
//!
//! Wraps an expensive pure function with TTL expiration, bounded
//! oldest-first eviction, and an optional background expiry sweep.

pub mod cache;
pub mod config;
pub mod error;
mod tasks;

pub use cache::{CacheStats, MemoizingCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};

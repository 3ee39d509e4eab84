//! Error types for the memoizing cache
//!
//! Provides unified error handling using thiserror. Errors raised by the
//! wrapped function are not represented here: they belong to the caller and
//! are returned from `get` unchanged.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache construction and lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Rejected construction parameters (zero TTL, zero capacity)
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Background sweeper requested outside a tokio runtime
    #[error("No runtime available: {0}")]
    NoRuntime(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

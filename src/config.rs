//! Configuration Module
//!
//! Handles loading, validating, and defaulting cache configuration.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Memoizing cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Seconds a computed result stays valid
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum number of entries the cache can hold
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Whether to run the background expiry sweep
    #[serde(default = "default_sweep")]
    pub sweep: bool,
}

fn default_ttl_secs() -> u64 {
    10
}

fn default_max_size() -> usize {
    5
}

fn default_sweep() -> bool {
    true
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MEMO_CACHE_TTL_SECS` - Entry lifetime in seconds (default: 10)
    /// - `MEMO_CACHE_MAX_SIZE` - Maximum cache entries (default: 5)
    /// - `MEMO_CACHE_SWEEP` - Run the expiry sweep, `true`/`false` (default: true)
    pub fn from_env() -> Self {
        Self {
            ttl_secs: env::var("MEMO_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_ttl_secs),
            max_size: env::var("MEMO_CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_max_size),
            sweep: env::var("MEMO_CACHE_SWEEP")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_sweep),
        }
    }

    /// Checks the construction constraints: non-zero TTL and capacity.
    pub fn validate(&self) -> Result<()> {
        validate_params(self.ttl(), self.max_size)
    }

    /// Returns the TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_size: default_max_size(),
            sweep: default_sweep(),
        }
    }
}

/// Rejects a zero TTL or a zero capacity.
pub(crate) fn validate_params(ttl: Duration, max_size: usize) -> Result<()> {
    if ttl.is_zero() {
        return Err(CacheError::InvalidConfig(
            "ttl must be greater than zero".to_string(),
        ));
    }
    if max_size == 0 {
        return Err(CacheError::InvalidConfig(
            "max_size must be at least 1".to_string(),
        ));
    }
    Ok(())
}

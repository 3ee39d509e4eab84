//! Memoizing Cache Module
//!
//! Call-through wrapper that memoizes an expensive pure function.
//!
//! # Locking policy
//! One mutex guards the table and its counters. The wrapped function runs
//! with the lock released: misses on different keys compute in parallel, and
//! concurrent misses on the same key may each compute, with the last insert
//! becoming the cached value. Duplicate computation is not suppressed.

use std::convert::Infallible;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, CacheTable, Clock, Lookup, SystemClock};
use crate::config::{validate_params, CacheConfig};
use crate::error::{CacheError, Result};
use crate::tasks::spawn_sweep_task;

type ComputeFn<K, V, E> = Box<dyn Fn(&K) -> std::result::Result<V, E> + Send + Sync>;

/// Handle to a running expiry sweep task.
struct Sweeper {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

// == Memoizing Cache ==
/// Bounded, time-expiring, thread-safe memo cache around `fn(&K) -> Result<V, E>`.
///
/// Entries live for `ttl`; when more than `max_size` entries are held the
/// oldest is evicted. A failed computation is returned to the caller and
/// never stored.
pub struct MemoizingCache<K, V, E = Infallible> {
    compute: ComputeFn<K, V, E>,
    table: Arc<Mutex<CacheTable<K, V>>>,
    sweeper: Mutex<Option<Sweeper>>,
}

impl<K, V> MemoizingCache<K, V, Infallible>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Wraps an infallible function.
    ///
    /// Fails with `InvalidConfig` if `ttl` is zero or `max_size` is zero.
    pub fn new<F>(f: F, ttl: Duration, max_size: usize) -> Result<Self>
    where
        F: Fn(&K) -> V + Send + Sync + 'static,
    {
        Self::try_new(move |key: &K| Ok(f(key)), ttl, max_size)
    }

    /// Builds a cache around an infallible function from `config`.
    pub fn from_config<F>(f: F, config: &CacheConfig) -> Result<Self>
    where
        F: Fn(&K) -> V + Send + Sync + 'static,
        K: Send + 'static,
        V: Send + 'static,
    {
        Self::try_from_config(move |key: &K| Ok(f(key)), config)
    }

    // == Call ==
    /// Returns the memoized value for `key`, computing it on a miss.
    pub fn call(&self, key: K) -> V {
        match self.get(key) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<K, V, E> MemoizingCache<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Wraps a fallible function.
    pub fn try_new<F>(f: F, ttl: Duration, max_size: usize) -> Result<Self>
    where
        F: Fn(&K) -> std::result::Result<V, E> + Send + Sync + 'static,
    {
        validate_params(ttl, max_size)?;

        Ok(Self {
            compute: Box::new(f),
            table: Arc::new(Mutex::new(CacheTable::new(
                ttl,
                max_size,
                Arc::new(SystemClock),
            ))),
            sweeper: Mutex::new(None),
        })
    }

    /// Builds a cache around a fallible function from `config`, starting the
    /// sweeper when `config.sweep`.
    ///
    /// Starting the sweeper requires a tokio runtime.
    pub fn try_from_config<F>(f: F, config: &CacheConfig) -> Result<Self>
    where
        F: Fn(&K) -> std::result::Result<V, E> + Send + Sync + 'static,
        K: Send + 'static,
        V: Send + 'static,
    {
        let cache = Self::try_new(f, config.ttl(), config.max_size)?;
        if config.sweep {
            cache.start_sweeper()?;
        }
        Ok(cache)
    }

    /// Replaces the time source used to stamp and age entries.
    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        self.table.lock().set_clock(clock);
        self
    }

    // == Get ==
    /// Returns the memoized value for `key`, computing it on a miss.
    ///
    /// An error from the wrapped function is returned unchanged; the call is
    /// counted as a miss and a failure, and nothing is stored.
    pub fn get(&self, key: K) -> std::result::Result<V, E> {
        if let Lookup::Hit(value) = self.table.lock().lookup(&key) {
            return Ok(value);
        }

        debug!("Cache miss, computing value");

        let value = match (self.compute)(&key) {
            Ok(value) => value,
            Err(err) => {
                self.table.lock().record_failure();
                warn!("Computation failed, result not cached");
                return Err(err);
            }
        };

        let evicted = self.table.lock().insert(key, value.clone());
        if evicted > 0 {
            debug!("Evicted {} oldest entries", evicted);
        }

        Ok(value)
    }

    // == Stats ==
    /// Snapshot of counters and current size.
    pub fn stats(&self) -> CacheStats {
        self.table.lock().stats()
    }

    /// True if `key` has a fresh entry. Not counted as a lookup.
    pub fn contains(&self, key: &K) -> bool {
        self.table.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.table.lock().ttl()
    }

    pub fn max_size(&self) -> usize {
        self.table.lock().max_size()
    }

    // == Sweeper ==
    /// Starts the background expiry sweep on the current tokio runtime.
    ///
    /// The sweep fires every `ttl`. Does nothing if a sweeper is already
    /// running; fails with `NoRuntime` outside a runtime.
    pub fn start_sweeper(&self) -> Result<()>
    where
        K: Send + 'static,
        V: Send + 'static,
    {
        let mut slot = self.sweeper.lock();
        if slot.as_ref().is_some_and(|s| !s.handle.is_finished()) {
            debug!("Expiry sweeper already running");
            return Ok(());
        }

        let runtime = Handle::try_current().map_err(|e| CacheError::NoRuntime(e.to_string()))?;
        let token = CancellationToken::new();
        let handle = spawn_sweep_task(
            &runtime,
            Arc::downgrade(&self.table),
            self.ttl(),
            token.clone(),
        );

        *slot = Some(Sweeper { token, handle });
        Ok(())
    }

    /// True while a sweeper task is alive.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|s| !s.handle.is_finished())
    }

    // == Shutdown ==
    /// Stops the expiry sweeper. Idempotent, and a no-op if none was started.
    pub fn shutdown(&self) {
        if let Some(sweeper) = self.sweeper.lock().take() {
            sweeper.token.cancel();
            info!("Expiry sweeper shutdown requested");
        }
    }
}

impl<K, V, E> Drop for MemoizingCache<K, V, E> {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.get_mut().take() {
            sweeper.token.cancel();
        }
    }
}

impl<K, V, E> fmt::Debug for MemoizingCache<K, V, E>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoizingCache")
            .field("table", &self.table)
            .field("sweeping", &self.sweeper.lock().is_some())
            .finish_non_exhaustive()
    }
}

//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Weak;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cache::CacheTable;

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// The first sweep runs one full interval after spawning. Each tick takes the
/// table lock once, so sweeps never overlap with each other or with a lookup.
/// The task holds only a weak reference to the table and exits when the
/// table is dropped or `token` is cancelled, whichever comes first.
///
/// # Example
/// ```ignore
/// let table = Arc::new(Mutex::new(CacheTable::new(ttl, 100, Arc::new(SystemClock))));
/// let token = CancellationToken::new();
/// let handle = spawn_sweep_task(&Handle::current(), Arc::downgrade(&table), ttl, token.clone());
/// // Later, on shutdown:
/// token.cancel();
/// ```
pub fn spawn_sweep_task<K, V>(
    runtime: &Handle,
    table: Weak<Mutex<CacheTable<K, V>>>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + 'static,
{
    runtime.spawn(async move {
        info!(
            "Starting expiry sweep task with interval of {}ms",
            interval.as_millis()
        );

        // A TTL past the clock's range never expires anything; idle until stopped
        let Some(first_tick) = Instant::now()
            .checked_add(interval)
            .filter(|start| start.checked_add(interval).is_some())
        else {
            info!("Sweep interval exceeds the clock range, expiry sweep idle");
            token.cancelled().await;
            info!("Expiry sweep task stopped");
            return;
        };

        let mut ticker = tokio::time::interval_at(first_tick, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Expiry sweep task stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let Some(shared) = table.upgrade() else {
                        debug!("Cache dropped, expiry sweep task exiting");
                        break;
                    };

                    let removed = shared.lock().sweep_expired();

                    if removed > 0 {
                        info!("Expiry sweep: removed {} expired entries", removed);
                    } else {
                        debug!("Expiry sweep: no expired entries found");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::{Lookup, ManualClock};

    const TTL: Duration = Duration::from_millis(50);

    fn shared_table(clock: Arc<ManualClock>) -> Arc<Mutex<CacheTable<u32, u32>>> {
        Arc::new(Mutex::new(CacheTable::new(TTL, 100, clock)))
    }

    #[tokio::test]
    async fn test_sweep_task_removes_expired_entries() {
        let clock = Arc::new(ManualClock::new());
        let table = shared_table(clock.clone());
        table.lock().insert(1, 1);

        let token = CancellationToken::new();
        let handle = spawn_sweep_task(
            &Handle::current(),
            Arc::downgrade(&table),
            TTL,
            token.clone(),
        );

        clock.advance(TTL);

        // Wait for at least one tick
        tokio::time::sleep(TTL * 4).await;

        {
            let guard = table.lock();
            assert!(guard.is_empty(), "Expired entry should have been swept");
            let stats = guard.stats();
            assert_eq!(stats.expirations, 1);
            assert_eq!(stats.hits + stats.misses, 0, "Sweeps are not lookups");
        }

        token.cancel();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn test_sweep_task_preserves_fresh_entries() {
        let clock = Arc::new(ManualClock::new());
        let table = shared_table(clock);
        table.lock().insert(7, 49);

        let token = CancellationToken::new();
        let handle = spawn_sweep_task(
            &Handle::current(),
            Arc::downgrade(&table),
            TTL,
            token.clone(),
        );

        tokio::time::sleep(TTL * 3).await;

        assert_eq!(table.lock().lookup(&7), Lookup::Hit(49));

        token.cancel();
        let _ = handle.await;
    }

    #[tokio::test]
    async fn test_sweep_task_stops_on_cancel() {
        let table = shared_table(Arc::new(ManualClock::new()));
        let token = CancellationToken::new();
        let handle = spawn_sweep_task(&Handle::current(), Arc::downgrade(&table), TTL, token.clone());

        token.cancel();

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("Task should finish after cancellation")
            .expect("Task should not panic");
    }

    #[tokio::test]
    async fn test_sweep_task_idles_on_unrepresentable_interval() {
        let table = shared_table(Arc::new(ManualClock::new()));
        table.lock().insert(3, 9);

        let token = CancellationToken::new();
        let handle = spawn_sweep_task(
            &Handle::current(),
            Arc::downgrade(&table),
            Duration::MAX,
            token.clone(),
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished(), "Task should stay alive with a huge interval");
        assert_eq!(table.lock().len(), 1);

        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("Idle task should still honour cancellation")
            .expect("Task should not panic");
    }

    #[tokio::test]
    async fn test_sweep_task_exits_when_table_dropped() {
        let table = shared_table(Arc::new(ManualClock::new()));
        let handle = spawn_sweep_task(
            &Handle::current(),
            Arc::downgrade(&table),
            TTL,
            CancellationToken::new(),
        );

        drop(table);

        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("Task should exit once the table is gone")
            .expect("Task should not panic");
    }
}

//! Memo Cache demo driver
//!
//! Wraps a deliberately slow squaring function and issues a fixed sequence of
//! lookups, logging each result and the final statistics.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memo_cache::{CacheConfig, MemoizingCache};

/// Simulated cost of one computation.
const COMPUTE_DELAY: Duration = Duration::from_secs(1);

/// Keys requested by the demo, in order.
const DEMO_KEYS: [u64; 11] = [5, 5, 10, 10, 7, 7, 7, 20, 15, 20, 25];

fn slow_square(n: &u64) -> u64 {
    info!("Computing result for {}", n);
    std::thread::sleep(COMPUTE_DELAY);
    n * n
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memo_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: ttl={}s, max_size={}, sweep={}",
        config.ttl_secs, config.max_size, config.sweep
    );

    let cache: Arc<MemoizingCache<u64, u64>> = Arc::new(
        MemoizingCache::from_config(slow_square, &config)
            .context("failed to build cache")?,
    );

    // Lookups block while computing, keep them off the async workers
    let worker = Arc::clone(&cache);
    tokio::task::spawn_blocking(move || {
        for key in DEMO_KEYS {
            let value = worker.call(key);
            info!("get({}) = {}", key, value);
        }
    })
    .await
    .context("demo worker panicked")?;

    let stats = cache.stats();
    info!(
        "Final stats: {}",
        serde_json::to_string(&stats).context("failed to serialize stats")?
    );

    cache.shutdown();
    info!("Demo complete");
    Ok(())
}

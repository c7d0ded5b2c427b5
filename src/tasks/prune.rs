//! Prune Task
//!
//! Background task that periodically removes entries no context can use.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{current_timestamp_ms, Cache};

/// Spawns a background task that periodically prunes the cache.
///
/// The task sleeps for `prune_interval_secs` between runs. Pruning touches
/// the store synchronously (a file store rewrites its file), so each run is
/// moved onto the blocking pool. Storage errors are logged and the loop
/// keeps going.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(Cache::new(CachePolicy::default(), Arc::new(MemoryStore::new())));
/// let prune_handle = spawn_prune_task(cache.clone(), 60);
/// // Later, during shutdown:
/// prune_handle.abort();
/// ```
pub fn spawn_prune_task(cache: Arc<Cache>, prune_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(prune_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting prune task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let cache = Arc::clone(&cache);
            let outcome =
                tokio::task::spawn_blocking(move || cache.prune(current_timestamp_ms())).await;

            match outcome {
                Ok(Ok(removed)) if removed > 0 => {
                    info!("Prune: removed {} unusable entries", removed);
                }
                Ok(Ok(_)) => debug!("Prune: nothing to remove"),
                Ok(Err(e)) => warn!(error = %e, "Prune failed"),
                Err(e) => warn!(error = %e, "Prune worker panicked"),
            }
        }
    })
}

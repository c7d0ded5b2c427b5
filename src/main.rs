//! Offline Cache - maintenance process
//!
//! Opens the configured cache store and keeps it pruned on an interval,
//! running one last prune before exiting.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use offline_cache::cache::current_timestamp_ms;
use offline_cache::{spawn_prune_task, CacheStore, Config};

/// Main entry point for the cache maintenance process.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache over the configured store and load it
/// 4. Start background prune task
/// 5. Wait for SIGINT/SIGTERM, then prune once more and exit
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "offline_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting offline cache maintenance");

    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        "Configuration loaded: backend={:?}, ttl={}ms, stale_if_error={}ms, stale_if_offline={}ms, prune_interval={}s",
        config.backend,
        config.ttl_ms,
        config.stale_if_error_ms,
        config.stale_if_offline_ms,
        config.prune_interval
    );

    let cache = Arc::new(config.build_cache());
    let entries = cache
        .store()
        .len()
        .context("failed to open cache store")?;
    info!("Cache store ready with {} entries", entries);

    let prune_handle = spawn_prune_task(cache.clone(), config.prune_interval);
    info!("Background prune task started");

    shutdown_signal(prune_handle).await;

    let removed = cache
        .prune(current_timestamp_ms())
        .context("final prune failed")?;
    let stats = cache.stats();
    info!(
        removed,
        total_pruned = stats.pruned,
        "Shutdown complete"
    );

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then aborts the prune task.
async fn shutdown_signal(prune_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    prune_handle.abort();
    warn!("Prune task aborted");
}

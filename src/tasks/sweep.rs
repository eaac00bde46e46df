//! Expiry Sweep Task
//!
//! Background task that periodically evicts expired quotes from the store.
//! Reads never depend on it; they check expiry themselves.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::resolver::Clock;

/// Spawns a background task that periodically purges expired entries.
///
/// # Arguments
/// * `store` - Shared cache store
/// * `clock` - Time source used to decide expiry
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task(
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    sweep_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            backend = store.backend_type(),
            "Starting expiry sweep task with interval of {} seconds", sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match store.purge_expired(clock.now()).await {
                Ok(0) => debug!("Expiry sweep: no expired entries found"),
                Ok(removed) => info!("Expiry sweep: removed {} expired entries", removed),
                Err(err) => warn!(error = %err, "Expiry sweep failed"),
            }
        }
    })
}

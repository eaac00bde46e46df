//! Steam Price Cache - A read-through cache for Steam market prices
//!
//! Serves `(app_id, market_hash_name)` quotes from a TTL cache and fills
//! misses from a metered, rate-limited upstream API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steam_price_cache::{
    api::{create_router, AppState},
    cache::{CacheStore, FileStore, MemoryStore},
    config::{Config, StoreBackend},
    resolver::{Clock, QuoteResolver, SystemClock},
    spawn_sweep_task,
    upstream::HttpUpstreamClient,
};

/// Main entry point for the price cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Open the cache store and build the upstream client
/// 4. Start background expiry sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steam_price_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Steam price cache server");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: backend={:?}, ttl={}s, connect_timeout={}s, read_timeout={}s, max_attempts={}, port={}",
        config.store_backend,
        config.cache_ttl,
        config.connect_timeout,
        config.read_timeout,
        config.max_attempts,
        config.server_port
    );

    let store: Arc<dyn CacheStore> = match config.store_backend {
        StoreBackend::File => Arc::new(
            FileStore::open(&config.cache_dir)
                .await
                .with_context(|| format!("opening cache dir {}", config.cache_dir.display()))?,
        ),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    info!(backend = store.backend_type(), "Cache store initialized");

    let upstream = HttpUpstreamClient::new(config.upstream_settings())
        .context("building upstream client")?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let resolver = QuoteResolver::new(
        Arc::clone(&store),
        Arc::new(upstream),
        Arc::clone(&clock),
        config.cache_policy(),
    );

    let sweep_handle = spawn_sweep_task(store, clock, config.sweep_interval);
    info!("Background expiry sweep started");

    let app = create_router(AppState::new(resolver));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
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

    sweep_handle.abort();
    warn!("Expiry sweep task aborted");
}

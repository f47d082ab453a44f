//! Request Guard - response cache and rate limiting for report endpoints
//!
//! Protects expensive report/query handlers with a dual-mode response cache
//! and per-client sliding-window rate limiting.

mod api;
mod cache;
mod config;
mod error;
mod limiter;
mod models;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::{spawn_cache_cleanup, spawn_limiter_cleanup};

/// Main entry point for the protection service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the cache service and both rate limiters
/// 4. Start the background sweep tasks
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "request_guard=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Request Guard");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, default_ttl={}s, cache_cap={}, prefix={}",
        config.server_port, config.default_ttl, config.cache_max_entries, config.key_prefix
    );

    // Build shared state: cache service plus both limiters
    let state = AppState::from_config(&config);
    info!("Cache service and rate limiters initialized");

    // Start background sweep tasks
    let cache_sweep = spawn_cache_cleanup(Arc::clone(&state.cache), config.cache_cleanup_interval);
    let limiter_sweep = spawn_limiter_cleanup(
        Arc::clone(&state.limiter),
        Arc::clone(&state.ip_limiter),
        config.limiter_cleanup_interval,
    );
    info!("Background sweep tasks started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(vec![cache_sweep, limiter_sweep]))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep tasks and allows graceful shutdown.
async fn shutdown_signal(sweep_handles: Vec<tokio::task::JoinHandle<()>>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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

    // Abort the sweep tasks
    for handle in sweep_handles {
        handle.abort();
    }
    warn!("Background sweep tasks aborted");
}

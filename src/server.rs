//! HTTP server initialization and runtime setup.
//!
//! Handles store connection, source wiring, the background refresh loop,
//! and the Axum server lifecycle.

use crate::application::services::{LinkMapRefresher, LookupGateway, run_refresh_loop};
use crate::config::Config;
use crate::domain::refresh_clock::RefreshClock;
use crate::domain::repositories::{ArtifactSource, KeyValueStore};
use crate::infrastructure::appveyor::{AppveyorClient, AppveyorSource};
use crate::infrastructure::store::RedisStore;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis store (startup fails if unreachable)
/// - One AppVeyor source per configured project
/// - Background refresh loop (first pass immediately)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The store is unavailable
/// - The configuration cannot produce a project registry or HTTP client
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let registry = Arc::new(config.registry()?);

    let store: Arc<dyn KeyValueStore> = Arc::new(
        RedisStore::connect(&config.redis_url, &config.redis_key_prefix)
            .await
            .context("Key-value store unavailable, refusing to start")?,
    );

    let client = Arc::new(
        AppveyorClient::new(config.appveyor_config()?).context("Failed to build HTTP client")?,
    );
    let sources: Vec<Arc<dyn ArtifactSource>> = registry
        .ids()
        .map(|id| Arc::new(AppveyorSource::new(id, client.clone())) as Arc<dyn ArtifactSource>)
        .collect();
    tracing::info!("Configured {} artifact source(s)", sources.len());

    let refresher = Arc::new(LinkMapRefresher::new(
        sources,
        store.clone(),
        Arc::new(RefreshClock::new()),
        config.refresh_min_interval(),
    ));
    let lookup = Arc::new(LookupGateway::new(store.clone(), registry));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_task = tokio::spawn(run_refresh_loop(
        refresher.clone(),
        config.refresh_period(),
        shutdown_rx,
    ));
    tracing::info!("Refresh loop started");

    let state = AppState::new(lookup, refresher, store, config.site_settings());

    let app = app_router(state, config.behind_proxy);

    let listener = bind_listener(&config.listen_addr).await?;

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let _ = shutdown_tx.send(true);
    if let Err(e) = refresh_task.await {
        tracing::error!("Refresh loop terminated abnormally: {}", e);
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Binds the listen address, resolving host names such as `localhost:8765`.
async fn bind_listener(listen_addr: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind '{}'", listen_addr))?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);
    Ok(listener)
}

/// Completes on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

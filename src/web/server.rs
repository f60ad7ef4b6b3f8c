//! Server lifecycle: listener, graceful shutdown and session cleanup.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;
use crate::session::SessionStoreRef;
use crate::web::{build_router, AppState};

/// Serve the form flow until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;

    let cleanup = spawn_cleanup(
        state.sessions.store().clone(),
        config.session.cleanup_interval_secs,
    );

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("formflow listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    if let Some(handle) = cleanup {
        handle.abort();
    }
    info!("formflow stopped");
    Ok(())
}

/// Periodically prune expired sessions. An interval of zero disables the sweep.
pub fn spawn_cleanup(store: SessionStoreRef, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("expired session cleanup disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.cleanup_expired().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "pruned expired sessions"),
                Err(e) => warn!(error = %e, "session cleanup failed"),
            }
        }
    }))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

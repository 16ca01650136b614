// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP API for listing namespaces and generating kubeconfigs.

pub mod handlers;
pub mod response;

use crate::generator::KubeconfigGenerator;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared by all handlers; read-only
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<KubeconfigGenerator>,
}

impl AppState {
    pub fn new(generator: KubeconfigGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

/// Build the router, serving files from `static_dir` for paths outside the API
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/namespaces", get(handlers::list_namespaces))
        .route("/api/generate-kubeconfig", post(handlers::generate_kubeconfig))
        .route("/api/download-kubeconfig", post(handlers::download_kubeconfig))
        .route("/healthz", get(handlers::healthz))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => api,
    };

    app.layer(TraceLayer::new_for_http())
}

/// Serve the API until Ctrl-C or SIGTERM
pub async fn serve(addr: SocketAddr, app: Router) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

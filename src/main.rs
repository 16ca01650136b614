// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kubeissuer::config::Config;
use kubeissuer::generator::KubeconfigGenerator;
use kubeissuer::kubernetes::ClusterEndpoint;
use kubeissuer::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting kubeissuer");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: cluster_name={}, strict_namespaces={}, api_timeout={}s",
        config.cluster_name,
        config.strict_namespaces,
        config.api_timeout.as_secs()
    );

    // Resolve what generated kubeconfigs will point at
    let endpoint =
        ClusterEndpoint::load(&config).context("Failed to resolve cluster connection info")?;

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    let config = Arc::new(config);
    let generator = KubeconfigGenerator::new(client, config.clone(), endpoint);
    let app = web::router(AppState::new(generator), config.static_dir.as_deref());

    web::serve(config.listen_addr, app).await
}

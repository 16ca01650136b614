// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Connection details of the cluster this service runs in, as written into kubeconfigs

use crate::config::Config;
use crate::constants::in_cluster;
use crate::error::{IssuerError, Result};
use crate::kubeconfig::ClusterInfo;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::env;
use tracing::{info, instrument};
use url::Url;

/// API server address and CA bundle handed out to kubeconfig users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterEndpoint {
    pub server: String,
    /// Base64 encoded PEM bundle
    pub certificate_authority_data: String,
}

impl ClusterEndpoint {
    /// Resolve the endpoint from configuration and the in-cluster environment
    #[instrument(skip(config))]
    pub fn load(config: &Config) -> Result<Self> {
        let server = resolve_server(config.cluster_server.as_deref(), |key| env::var(key).ok())?;

        let ca = std::fs::read(&config.cluster_ca_file).map_err(|e| {
            IssuerError::ClusterInfo(format!(
                "Failed to read CA bundle {}: {}",
                config.cluster_ca_file.display(),
                e
            ))
        })?;
        if ca.is_empty() {
            return Err(IssuerError::ClusterInfo(format!(
                "CA bundle {} is empty",
                config.cluster_ca_file.display()
            )));
        }

        info!("Kubeconfigs will point at {}", server);
        Ok(ClusterEndpoint {
            server,
            certificate_authority_data: STANDARD.encode(ca),
        })
    }

    pub fn cluster_info(&self) -> ClusterInfo {
        ClusterInfo {
            server: self.server.clone(),
            certificate_authority_data: Some(self.certificate_authority_data.clone()),
            insecure_skip_tls_verify: None,
        }
    }
}

/// Work out the API server URL: an explicit override, else the service host and port
/// Kubernetes injects into every pod.
pub fn resolve_server<F>(explicit: Option<&str>, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let candidate = match explicit {
        Some(server) => server.trim().to_string(),
        None => {
            let host = lookup(in_cluster::SERVICE_HOST_ENV).ok_or_else(|| {
                IssuerError::ClusterInfo(format!(
                    "CLUSTER_SERVER is not set and {} is missing; not running in a cluster?",
                    in_cluster::SERVICE_HOST_ENV
                ))
            })?;
            let port = lookup(in_cluster::SERVICE_PORT_ENV).unwrap_or_else(|| "443".to_string());
            if host.contains(':') && !host.starts_with('[') {
                format!("https://[{}]:{}", host, port)
            } else {
                format!("https://{}:{}", host, port)
            }
        }
    };

    let url = Url::parse(&candidate).map_err(|e| {
        IssuerError::ClusterInfo(format!("Invalid API server URL '{}': {}", candidate, e))
    })?;
    if !matches!(url.scheme(), "https" | "http") || url.host().is_none() {
        return Err(IssuerError::ClusterInfo(format!(
            "API server URL '{}' must be an absolute http(s) URL",
            candidate
        )));
    }

    Ok(candidate.trim_end_matches('/').to_string())
}

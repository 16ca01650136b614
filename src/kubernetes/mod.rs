// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for namespace listing, service account tokens and cluster endpoint discovery.

pub mod cluster;
pub mod namespaces;
pub mod service_accounts;

pub use cluster::ClusterEndpoint;
pub use namespaces::list_namespaces;
pub use service_accounts::{ensure_service_account, request_token};

use crate::error::{IssuerError, Result};
use std::future::Future;
use std::time::Duration;

/// Run a Kubernetes API call, giving up after `limit`
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| IssuerError::Timeout(limit))?
}

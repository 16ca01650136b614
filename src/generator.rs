// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Validation of generation requests and assembly of service account kubeconfigs.

use crate::config::Config;
use crate::constants::{fields, token};
use crate::error::{IssuerError, Result};
use crate::kubeconfig::{Kubeconfig, UserCredentials};
use crate::kubernetes::{
    ensure_service_account, list_namespaces, request_token, with_timeout, ClusterEndpoint,
};
use kube::Client;
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The form fields submitted by a user, as a flat name to value mapping.
///
/// Numbers and booleans are accepted and kept in their textual form; nulls are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationRequest {
    fields: BTreeMap<String, String>,
}

impl<'de> Deserialize<'de> for GenerationRequest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut fields = BTreeMap::new();

        for (name, value) in raw {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                serde_json::Value::Null => continue,
                _ => {
                    return Err(D::Error::custom(format!(
                        "field '{}' must be a string or number",
                        name
                    )))
                }
            };
            fields.insert(name, value);
        }

        Ok(GenerationRequest { fields })
    }
}

impl<K, V> FromIterator<(K, V)> for GenerationRequest
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        GenerationRequest {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A validated request for a service account token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    pub namespace: String,
    pub service_account: String,
    pub duration_secs: i64,
}

impl GenerationRequest {
    /// Trimmed value of a field, `None` when absent or blank
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Check the recognised fields, ignoring any others
    pub fn validate(&self, config: &Config) -> Result<TokenGrant> {
        let namespace = self.get(fields::NAMESPACE).ok_or_else(|| {
            IssuerError::validation(fields::NAMESPACE, "a namespace is required")
        })?;
        if !is_dns1123_label(namespace) {
            return Err(IssuerError::validation(
                fields::NAMESPACE,
                format!("'{}' is not a valid namespace name", namespace),
            ));
        }

        let service_account = self.get(fields::SERVICE_ACCOUNT_NAME).ok_or_else(|| {
            IssuerError::validation(
                fields::SERVICE_ACCOUNT_NAME,
                "a service account name is required",
            )
        })?;
        if !is_dns1123_subdomain(service_account) {
            return Err(IssuerError::validation(
                fields::SERVICE_ACCOUNT_NAME,
                format!("'{}' is not a valid service account name", service_account),
            ));
        }

        let duration_secs = match self.get(fields::TOKEN_DURATION) {
            None => config.default_token_duration,
            Some(raw) => parse_seconds(raw).ok_or_else(|| {
                IssuerError::validation(
                    fields::TOKEN_DURATION,
                    format!("'{}' is not a whole number of seconds", raw),
                )
            })?,
        };
        if !(token::MIN_DURATION_SECS..=config.max_token_duration).contains(&duration_secs) {
            return Err(IssuerError::validation(
                fields::TOKEN_DURATION,
                format!(
                    "must be between {} and {} seconds",
                    token::MIN_DURATION_SECS,
                    config.max_token_duration
                ),
            ));
        }

        for name in self.fields.keys() {
            if ![
                fields::NAMESPACE,
                fields::SERVICE_ACCOUNT_NAME,
                fields::TOKEN_DURATION,
            ]
            .contains(&name.as_str())
            {
                debug!("Ignoring unknown request field '{}'", name);
            }
        }

        Ok(TokenGrant {
            namespace: namespace.to_string(),
            service_account: service_account.to_string(),
            duration_secs,
        })
    }
}

/// Parse a number of seconds, accepting whole-valued decimals such as `3600.0`
fn parse_seconds(raw: &str) -> Option<i64> {
    if let Ok(secs) = raw.parse::<i64>() {
        return Some(secs);
    }
    let secs = raw.parse::<f64>().ok()?;
    if secs.is_finite() && secs.fract() == 0.0 && secs.abs() < i64::MAX as f64 {
        Some(secs as i64)
    } else {
        None
    }
}

/// RFC 1123 label: lowercase alphanumerics and '-', at most 63 characters,
/// starting and ending with an alphanumeric
pub fn is_dns1123_label(value: &str) -> bool {
    let bytes = value.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= 63
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes[0] != b'-'
        && bytes[bytes.len() - 1] != b'-'
}

/// RFC 1123 subdomain: dot separated labels, at most 253 characters
pub fn is_dns1123_subdomain(value: &str) -> bool {
    value.len() <= 253 && value.split('.').all(is_dns1123_label)
}

/// Issues kubeconfigs for service accounts of the cluster it runs in.
///
/// Holds no per-request state; clones share the client.
#[derive(Clone)]
pub struct KubeconfigGenerator {
    client: Client,
    config: Arc<Config>,
    endpoint: ClusterEndpoint,
}

impl KubeconfigGenerator {
    pub fn new(client: Client, config: Arc<Config>, endpoint: ClusterEndpoint) -> Self {
        Self {
            client,
            config,
            endpoint,
        }
    }

    /// List the namespaces a kubeconfig can be requested for
    pub async fn list_namespaces(&self) -> Result<Vec<String>> {
        with_timeout(self.config.api_timeout, list_namespaces(&self.client)).await
    }

    /// Validate the request, make sure the service account exists, mint a token and
    /// build a kubeconfig around it.
    ///
    /// Not idempotent: each call mints a new token, so two calls with the same input
    /// return documents that differ in their credentials.
    #[instrument(skip(self, request))]
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Kubeconfig> {
        let grant = request.validate(&self.config)?;
        let timeout = self.config.api_timeout;

        if self.config.is_protected(&grant.namespace) {
            warn!(
                "Refusing kubeconfig for protected namespace {}",
                grant.namespace
            );
            return Err(IssuerError::Unauthorized(format!(
                "kubeconfigs cannot be issued for namespace '{}'",
                grant.namespace
            )));
        }

        if self.config.strict_namespaces {
            let namespaces = self.list_namespaces().await?;
            if !namespaces.contains(&grant.namespace) {
                return Err(IssuerError::validation(
                    fields::NAMESPACE,
                    format!(
                        "namespace '{}' does not exist or is being deleted",
                        grant.namespace
                    ),
                ));
            }
        }

        with_timeout(
            timeout,
            ensure_service_account(
                &self.client,
                &grant.namespace,
                &grant.service_account,
                self.config.create_service_accounts,
            ),
        )
        .await?;

        let token = with_timeout(
            timeout,
            request_token(
                &self.client,
                &grant.namespace,
                &grant.service_account,
                grant.duration_secs,
            ),
        )
        .await?;

        let kubeconfig = Kubeconfig::single(
            &self.config.cluster_name,
            self.endpoint.cluster_info(),
            &grant.service_account,
            UserCredentials::from_token(token),
            &grant.namespace,
        );
        kubeconfig.validate()?;

        info!(
            "Generated kubeconfig for service account {}/{}",
            grant.namespace, grant.service_account
        );
        Ok(kubeconfig)
    }
}

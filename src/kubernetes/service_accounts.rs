// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Service account lookup and token minting

use crate::constants::{fields, labels, APP_NAME};
use crate::error::{IssuerError, Result};
use k8s_openapi::api::authentication::v1::{TokenRequest, TokenRequestSpec};
use k8s_openapi::api::core::v1::ServiceAccount;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Ensure a service account exists in the namespace.
///
/// A missing account is created when `create` is set and reported as a validation
/// error on the service account field otherwise.
#[instrument(skip(client))]
pub async fn ensure_service_account(
    client: &Client,
    namespace: &str,
    name: &str,
    create: bool,
) -> Result<()> {
    let accounts: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);

    match accounts.get(name).await {
        Ok(_) => {
            debug!("Service account {}/{} already exists", namespace, name);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            if !create {
                return Err(IssuerError::validation(
                    fields::SERVICE_ACCOUNT_NAME,
                    format!(
                        "service account '{}' does not exist in namespace '{}'",
                        name, namespace
                    ),
                ));
            }

            info!("Creating service account {}/{}", namespace, name);
            let account = ServiceAccount {
                metadata: ObjectMeta {
                    name: Some(name.to_string()),
                    namespace: Some(namespace.to_string()),
                    labels: Some(BTreeMap::from([(
                        labels::MANAGED_BY.to_string(),
                        APP_NAME.to_string(),
                    )])),
                    ..Default::default()
                },
                ..Default::default()
            };
            match accounts.create(&PostParams::default(), &account).await {
                Ok(_) => {
                    info!("Service account {}/{} created successfully", namespace, name);
                    Ok(())
                }
                // Lost a race with a concurrent request creating the same account
                Err(kube::Error::Api(err)) if err.code == 409 => {
                    debug!(
                        "Service account {}/{} was created concurrently",
                        namespace, name
                    );
                    Ok(())
                }
                Err(kube::Error::Api(err)) if err.code == 404 => Err(IssuerError::validation(
                    fields::NAMESPACE,
                    format!("namespace '{}' does not exist", namespace),
                )),
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Mint a bound token for a service account through the TokenRequest API.
///
/// Every call yields a fresh token.
#[instrument(skip(client))]
pub async fn request_token(
    client: &Client,
    namespace: &str,
    name: &str,
    expiration_seconds: i64,
) -> Result<String> {
    let accounts: Api<ServiceAccount> = Api::namespaced(client.clone(), namespace);
    let request = TokenRequest {
        spec: TokenRequestSpec {
            expiration_seconds: Some(expiration_seconds),
            ..Default::default()
        },
        ..Default::default()
    };
    let body = serde_json::to_vec(&request)
        .map_err(|e| IssuerError::Upstream(format!("Failed to encode token request: {}", e)))?;

    let response: TokenRequest = accounts
        .create_subresource("token", name, &PostParams::default(), body)
        .await?;

    let token = response
        .status
        .map(|s| s.token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            IssuerError::Upstream(format!(
                "Token request for service account {}/{} returned no token",
                namespace, name
            ))
        })?;

    info!(
        "Issued token for service account {}/{} valid for {}s",
        namespace, name, expiration_seconds
    );
    Ok(token)
}

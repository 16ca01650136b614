// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Namespace listing

use crate::error::Result;
use k8s_openapi::api::core::v1::Namespace;
use kube::{api::ListParams, Api, Client, ResourceExt};
use tracing::{debug, instrument};

/// List the names of all namespaces that can receive credentials.
///
/// Namespaces being deleted are skipped. An empty cluster yields an empty list.
#[instrument(skip(client))]
pub async fn list_namespaces(client: &Client) -> Result<Vec<String>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let list = namespaces.list(&ListParams::default()).await?;

    let names: Vec<String> = list
        .items
        .into_iter()
        .filter(|ns| !is_terminating(ns))
        .map(|ns| ns.name_any())
        .collect();

    debug!("Listed {} namespaces", names.len());
    Ok(names)
}

/// Check if a namespace is in the Terminating phase
pub fn is_terminating(namespace: &Namespace) -> bool {
    namespace
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .is_some_and(|phase| phase == "Terminating")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_utils::{namespace_list_json, status_json, MockService};

    const PATH: &str = "/api/v1/namespaces";

    #[tokio::test]
    async fn test_list_namespaces() {
        let client = MockService::new()
            .on_get(
                PATH,
                200,
                &namespace_list_json(&[("default", "Active"), ("kube-system", "Active")]),
            )
            .into_client();

        let names = list_namespaces(&client).await.unwrap();
        assert_eq!(names, vec!["default", "kube-system"]);
    }

    #[tokio::test]
    async fn test_list_namespaces_skips_terminating() {
        let client = MockService::new()
            .on_get(
                PATH,
                200,
                &namespace_list_json(&[("default", "Active"), ("old-team", "Terminating")]),
            )
            .into_client();

        let names = list_namespaces(&client).await.unwrap();
        assert_eq!(names, vec!["default"]);
    }

    #[tokio::test]
    async fn test_list_namespaces_empty_is_ok() {
        let client = MockService::new()
            .on_get(PATH, 200, &namespace_list_json(&[]))
            .into_client();

        assert!(list_namespaces(&client).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_namespaces_forbidden() {
        let client = MockService::new()
            .on_get(
                PATH,
                403,
                &status_json(403, "Forbidden", "namespaces is forbidden"),
            )
            .into_client();

        let err = list_namespaces(&client).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(err.to_string().contains("namespaces is forbidden"));
    }

    #[tokio::test]
    async fn test_list_namespaces_unreachable() {
        let client = MockService::new().unreachable().into_client();

        let err = list_namespaces(&client).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubeconfig document model and its YAML transfer encoding.

pub mod encode;

pub use encode::{decode, encode, KubeconfigArtifact};

use crate::error::{IssuerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const REDACTED: &str = "REDACTED";

/// A kubeconfig document, spelled the way kubectl reads it
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Kubeconfig {
    pub api_version: String,
    pub kind: String,
    #[serde(default)]
    pub clusters: Vec<NamedCluster>,
    #[serde(default)]
    pub users: Vec<NamedUser>,
    #[serde(default)]
    pub contexts: Vec<NamedContext>,
    #[serde(rename = "current-context", skip_serializing_if = "Option::is_none")]
    pub current_context: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NamedCluster {
    pub name: String,
    pub cluster: ClusterInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterInfo {
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure_skip_tls_verify: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NamedUser {
    pub name: String,
    pub user: UserCredentials,
}

/// Credentials of a kubeconfig user: a bearer token or a client certificate
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct UserCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key_data: Option<String>,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hide = |v: &Option<String>| v.as_ref().map(|_| REDACTED);
        f.debug_struct("UserCredentials")
            .field("token", &hide(&self.token))
            .field("client_certificate_data", &hide(&self.client_certificate_data))
            .field("client_key_data", &hide(&self.client_key_data))
            .finish()
    }
}

impl UserCredentials {
    pub fn from_token(token: impl Into<String>) -> Self {
        UserCredentials {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    fn redacted(&self) -> Self {
        let hide = |v: &Option<String>| v.as_ref().map(|_| REDACTED.to_string());
        UserCredentials {
            token: hide(&self.token),
            client_certificate_data: hide(&self.client_certificate_data),
            client_key_data: hide(&self.client_key_data),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NamedContext {
    pub name: String,
    pub context: ContextInfo,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContextInfo {
    pub cluster: String,
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Kubeconfig {
    /// Build a kubeconfig with a single cluster, user and context, the context being current.
    ///
    /// The context is named `<user>@<cluster>`.
    pub fn single(
        cluster_name: &str,
        cluster: ClusterInfo,
        user_name: &str,
        user: UserCredentials,
        namespace: &str,
    ) -> Self {
        let context_name = format!("{}@{}", user_name, cluster_name);
        Kubeconfig {
            api_version: "v1".to_string(),
            kind: "Config".to_string(),
            clusters: vec![NamedCluster {
                name: cluster_name.to_string(),
                cluster,
            }],
            users: vec![NamedUser {
                name: user_name.to_string(),
                user,
            }],
            contexts: vec![NamedContext {
                name: context_name.clone(),
                context: ContextInfo {
                    cluster: cluster_name.to_string(),
                    user: user_name.to_string(),
                    namespace: Some(namespace.to_string()),
                },
            }],
            current_context: Some(context_name),
        }
    }

    /// The context named by `current-context`, if any
    pub fn current(&self) -> Option<&ContextInfo> {
        let name = self.current_context.as_deref()?;
        self.contexts
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.context)
    }

    /// Check that names are unique and every reference resolves within the document
    pub fn validate(&self) -> Result<()> {
        let clusters = unique_names("cluster", self.clusters.iter().map(|c| &c.name))?;
        let users = unique_names("user", self.users.iter().map(|u| &u.name))?;
        let contexts = unique_names("context", self.contexts.iter().map(|c| &c.name))?;

        for named in &self.contexts {
            if !clusters.contains(named.context.cluster.as_str()) {
                return Err(IssuerError::InvalidKubeconfig(format!(
                    "context '{}' references unknown cluster '{}'",
                    named.name, named.context.cluster
                )));
            }
            if !users.contains(named.context.user.as_str()) {
                return Err(IssuerError::InvalidKubeconfig(format!(
                    "context '{}' references unknown user '{}'",
                    named.name, named.context.user
                )));
            }
        }

        if let Some(current) = &self.current_context {
            if !contexts.contains(current.as_str()) {
                return Err(IssuerError::InvalidKubeconfig(format!(
                    "current-context '{}' does not exist",
                    current
                )));
            }
        }

        Ok(())
    }

    /// A copy with all credential material replaced by a placeholder
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        for named in &mut copy.users {
            named.user = named.user.redacted();
        }
        copy
    }
}

fn unique_names<'a>(
    what: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(IssuerError::InvalidKubeconfig(format!(
                "duplicate {} name '{}'",
                what, name
            )));
        }
    }
    Ok(seen)
}

#[cfg(test)]
pub(crate) fn sample(token: &str) -> Kubeconfig {
    Kubeconfig::single(
        "kubernetes",
        ClusterInfo {
            server: "https://10.0.0.1:443".to_string(),
            certificate_authority_data: Some("Q0EgREFUQQ==".to_string()),
            insecure_skip_tls_verify: None,
        },
        "builder",
        UserCredentials::from_token(token),
        "default",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cross_references() {
        let doc = sample("abc");

        assert_eq!(doc.clusters.len(), 1);
        assert_eq!(doc.users.len(), 1);
        assert_eq!(doc.contexts.len(), 1);
        assert_eq!(doc.current_context.as_deref(), Some("builder@kubernetes"));

        let ctx = doc.current().unwrap();
        assert_eq!(ctx.cluster, "kubernetes");
        assert_eq!(ctx.user, "builder");
        assert_eq!(ctx.namespace.as_deref(), Some("default"));
        assert!(doc.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_cluster() {
        let mut doc = sample("abc");
        doc.contexts[0].context.cluster = "elsewhere".to_string();

        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("unknown cluster 'elsewhere'"));
    }

    #[test]
    fn test_validate_unknown_user() {
        let mut doc = sample("abc");
        doc.contexts[0].context.user = "nobody".to_string();

        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("unknown user 'nobody'"));
    }

    #[test]
    fn test_validate_dangling_current_context() {
        let mut doc = sample("abc");
        doc.current_context = Some("missing".to_string());

        assert!(doc.validate().is_err());
        assert!(doc.current().is_none());
    }

    #[test]
    fn test_validate_duplicate_names() {
        let mut doc = sample("abc");
        let extra = doc.users[0].clone();
        doc.users.push(extra);

        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate user name 'builder'"));
    }

    #[test]
    fn test_redacted_hides_credentials_only() {
        let a = sample("first-token");
        let b = sample("second-token");

        assert_ne!(a, b);
        assert_eq!(a.redacted(), b.redacted());
        assert_eq!(a.redacted().users[0].user.token.as_deref(), Some(REDACTED));
        assert_eq!(a.redacted().clusters, a.clusters);
    }

    #[test]
    fn test_debug_does_not_leak_token() {
        let doc = sample("very-secret-token");
        let debug = format!("{:?}", doc);

        assert!(!debug.contains("very-secret-token"));
        assert!(debug.contains(REDACTED));
    }

    #[test]
    fn test_json_field_spelling() {
        let json = serde_json::to_value(sample("abc")).unwrap();

        assert_eq!(json["apiVersion"], "v1");
        assert_eq!(json["kind"], "Config");
        assert_eq!(json["current-context"], "builder@kubernetes");
        assert_eq!(
            json["clusters"][0]["cluster"]["certificate-authority-data"],
            "Q0EgREFUQQ=="
        );
        assert_eq!(json["users"][0]["user"]["token"], "abc");
        assert!(json["users"][0]["user"].get("client-key-data").is_none());
        assert_eq!(json["contexts"][0]["context"]["namespace"], "default");
    }
}

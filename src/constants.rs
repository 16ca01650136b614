// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Name used for labels on objects this service creates
pub const APP_NAME: &str = "kubeissuer";

/// Kubernetes label keys used by kubeissuer
pub mod labels {
    /// Set on service accounts created by kubeissuer
    pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
}

/// Field names of a generation request, as sent by the form
pub mod fields {
    pub const NAMESPACE: &str = "namespace";
    pub const SERVICE_ACCOUNT_NAME: &str = "serviceAccountName";
    pub const TOKEN_DURATION: &str = "tokenDuration";
    /// Pseudo-field used when the request body itself cannot be parsed
    pub const BODY: &str = "body";
}

/// Service account token lifetimes, in seconds
pub mod token {
    pub const DEFAULT_DURATION_SECS: i64 = 3600;
    /// The API server refuses token requests shorter than ten minutes
    pub const MIN_DURATION_SECS: i64 = 600;
    pub const MAX_DURATION_SECS: i64 = 86400;
}

/// Locations available to a pod running in the cluster
pub mod in_cluster {
    pub const CA_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";
    pub const SERVICE_HOST_ENV: &str = "KUBERNETES_SERVICE_HOST";
    pub const SERVICE_PORT_ENV: &str = "KUBERNETES_SERVICE_PORT";
}

/// Generated kubeconfig download
pub mod download {
    pub const FILENAME: &str = "kubeconfig.yaml";
    pub const CONTENT_TYPE: &str = "application/yaml";
}

pub const DEFAULT_CLUSTER_NAME: &str = "kubernetes";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IssuerError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Kubernetes API request failed: {0}")]
    Upstream(String),

    #[error("Kubernetes API did not respond within {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    #[error("Failed to encode kubeconfig: {0}")]
    Encoding(#[from] serde_yaml::Error),

    #[error("Failed to resolve cluster connection info: {0}")]
    ClusterInfo(String),
}

/// Coarse classification of an [`IssuerError`], reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authorization,
    Upstream,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Authorization => "authorization",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Internal => "internal",
        }
    }
}

impl IssuerError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        IssuerError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            IssuerError::KubeError(kube::Error::Api(err)) if err.code == 401 || err.code == 403 => {
                ErrorKind::Authorization
            }
            IssuerError::KubeError(_) | IssuerError::Upstream(_) | IssuerError::Timeout(_) => {
                ErrorKind::Upstream
            }
            IssuerError::Validation { .. } => ErrorKind::Validation,
            IssuerError::Unauthorized(_) => ErrorKind::Authorization,
            IssuerError::InvalidKubeconfig(_)
            | IssuerError::Encoding(_)
            | IssuerError::ClusterInfo(_) => ErrorKind::Internal,
        }
    }

    /// The request field a validation error refers to
    pub fn field(&self) -> Option<&'static str> {
        match self {
            IssuerError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, IssuerError>;

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Response bodies of the HTTP API

use crate::error::{ErrorKind, IssuerError};
use crate::kubeconfig::KubeconfigArtifact;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

#[derive(Serialize, Debug)]
pub struct NamespaceList {
    pub namespaces: Vec<String>,
}

/// Failure body; the `error` message is shown to the user as is
#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

/// An [`IssuerError`] on its way to the client
#[derive(Debug)]
pub struct ApiError(pub IssuerError);

impl From<IssuerError> for ApiError {
    fn from(err: IssuerError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match (&self.0, self.0.kind()) {
            (IssuerError::Timeout(_), _) => StatusCode::GATEWAY_TIMEOUT,
            (_, ErrorKind::Validation) => StatusCode::BAD_REQUEST,
            (_, ErrorKind::Authorization) => StatusCode::FORBIDDEN,
            (_, ErrorKind::Upstream) => StatusCode::BAD_GATEWAY,
            (_, ErrorKind::Internal) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        } else {
            warn!("Request rejected: {}", self.0);
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            kind: self.0.kind().as_str(),
            field: self.0.field(),
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for KubeconfigArtifact {
    fn into_response(self) -> Response {
        let disposition = self.content_disposition();
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, self.content_type.to_string()),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.body,
        )
            .into_response()
    }
}

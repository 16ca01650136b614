// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use super::response::{ApiError, NamespaceList};
use super::AppState;
use crate::constants::fields;
use crate::error::IssuerError;
use crate::generator::GenerationRequest;
use crate::kubeconfig::{Kubeconfig, KubeconfigArtifact};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

// Handler for /api/namespaces
pub async fn list_namespaces(State(state): State<AppState>) -> Result<Json<NamespaceList>, ApiError> {
    let namespaces = state.generator.list_namespaces().await?;
    Ok(Json(NamespaceList { namespaces }))
}

// Handler for /api/generate-kubeconfig
pub async fn generate_kubeconfig(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<Kubeconfig>, ApiError> {
    let Json(request) = payload.map_err(body_error)?;
    let kubeconfig = state.generator.generate(&request).await?;
    Ok(Json(kubeconfig))
}

// Handler for /api/download-kubeconfig
pub async fn download_kubeconfig(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<KubeconfigArtifact, ApiError> {
    let Json(request) = payload.map_err(body_error)?;
    let kubeconfig = state.generator.generate(&request).await?;
    Ok(KubeconfigArtifact::from_document(&kubeconfig)?)
}

pub async fn healthz() -> &'static str {
    "ok"
}

fn body_error(rejection: JsonRejection) -> ApiError {
    ApiError(IssuerError::validation(fields::BODY, rejection.body_text()))
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! YAML encoding of kubeconfig documents

use super::Kubeconfig;
use crate::constants::download;
use crate::error::{IssuerError, Result};

/// Render a kubeconfig as YAML
pub fn encode(doc: &Kubeconfig) -> Result<String> {
    Ok(serde_yaml::to_string(doc)?)
}

/// Parse a YAML kubeconfig and check its internal references
pub fn decode(text: &str) -> Result<Kubeconfig> {
    let doc: Kubeconfig = serde_yaml::from_str(text)
        .map_err(|e| IssuerError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e)))?;
    doc.validate()?;
    Ok(doc)
}

/// An encoded kubeconfig ready to be handed out as a file download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KubeconfigArtifact {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl KubeconfigArtifact {
    pub fn from_document(doc: &Kubeconfig) -> Result<Self> {
        Ok(KubeconfigArtifact {
            filename: download::FILENAME,
            content_type: download::CONTENT_TYPE,
            body: encode(doc)?,
        })
    }

    /// Value for a `Content-Disposition` header
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

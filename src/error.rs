// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Backup key generation failed: {0}")]
    Generation(String),

    #[error("Kubernetes API error: {0}")]
    Storage(#[from] kube::Error),

    #[error("Export workload reconciliation failed: {0}")]
    Delegation(String),

    #[error("ArgoCDExport {0} has no namespace")]
    MissingNamespace(String),

    #[error("ArgoCDExport {0} has no uid, cannot own dependent objects")]
    MissingUid(String),
}

impl ExportError {
    /// Whether retrying the same pass later can succeed without operator intervention.
    ///
    /// Workload failures carry no classification of their own and are treated
    /// as transient. This only affects the level they are logged at; every
    /// error is requeued.
    pub fn is_transient(&self) -> bool {
        matches!(self, ExportError::Storage(_) | ExportError::Delegation(_))
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

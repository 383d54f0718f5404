// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{backends, EXPORT_SECRET_SUFFIX};
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[kube(group = "argoproj.io", version = "v1alpha1", kind = "ArgoCDExport")]
#[kube(namespaced)]
#[kube(status = "ArgoCDExportStatus")]
#[kube(shortname = "argocdexport")]
#[serde(rename_all = "camelCase")]
pub struct ArgoCDExportSpec {
    /// Name of the Argo CD instance to export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub argocd: Option<String>,
    /// Container image running the export, overrides the operator default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Cron expression; a non-empty schedule turns the export into a recurring one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<ExportStorage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportStorage {
    /// One of aws, azure, gcp or local
    #[serde(default)]
    pub backend: String,
    /// Overrides the name of the Secret holding the export credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArgoCDExportStatus {
    #[serde(default)]
    pub phase: String,
}

impl ArgoCDExport {
    /// Name of the Secret holding the backup key and storage settings
    pub fn storage_secret_name(&self) -> String {
        self.spec
            .storage
            .as_ref()
            .and_then(|s| s.secret_name.as_deref())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-{}", self.name_any(), EXPORT_SECRET_SUFFIX))
    }

    /// The schedule, if it selects a recurring export
    pub fn active_schedule(&self) -> Option<&str> {
        self.spec.schedule.as_deref().filter(|s| !s.is_empty())
    }

    pub fn uses_aws_backend(&self) -> bool {
        self.spec
            .storage
            .as_ref()
            .is_some_and(|s| s.backend == backends::AWS)
    }

    pub fn phase(&self) -> &str {
        self.status.as_ref().map(|s| s.phase.as_str()).unwrap_or_default()
    }
}

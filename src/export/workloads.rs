// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Job and CronJob collaborators that actually run an export.

use crate::config::Config;
use crate::constants::backends;
use crate::error::{ExportError, Result};
use crate::export::{export_labels, owner_reference};
use crate::types::ArgoCDExport;
use async_trait::async_trait;
use k8s_openapi::api::batch::v1::{CronJob, Job};
use kube::{api::PostParams, Api, Client, Resource, ResourceExt};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::fmt::Debug;
use tracing::{debug, info, instrument};

pub const EXPORT_CONTAINER_NAME: &str = "argocd-export";

/// Reconciles the artifact that runs an export.
///
/// Called once per pass with exactly one of the two methods, depending on
/// whether the export is scheduled.
#[async_trait]
pub trait ExportWorkloads: Send + Sync {
    /// Ensure a one-shot export Job exists
    async fn reconcile_job(&self, export: &ArgoCDExport) -> Result<()>;

    /// Ensure a recurring export CronJob exists
    async fn reconcile_cron_job(&self, export: &ArgoCDExport) -> Result<()>;
}

/// Creates a Job or CronJob named after the export when none exists.
/// Existing objects are never modified.
#[derive(Clone)]
pub struct BatchWorkloads {
    client: Client,
    image: String,
    version: String,
}

impl BatchWorkloads {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            image: config.export_image.clone(),
            version: config.export_version.clone(),
        }
    }

    fn image_for(&self, export: &ArgoCDExport) -> String {
        let image = export.spec.image.as_deref().unwrap_or(&self.image);
        let version = export.spec.version.as_deref().unwrap_or(&self.version);
        format!("{}:{}", image, version)
    }

    fn job_spec(&self, export: &ArgoCDExport) -> Value {
        let backend = export
            .spec
            .storage
            .as_ref()
            .map(|s| s.backend.as_str())
            .filter(|b| !b.is_empty())
            .unwrap_or(backends::LOCAL);

        let mut env = Vec::new();
        if let Some(argocd) = export.spec.argocd.as_deref() {
            env.push(json!({ "name": "ARGOCD_NAME", "value": argocd }));
        }

        json!({
            "template": {
                "metadata": { "labels": export_labels(export) },
                "spec": {
                    "restartPolicy": "OnFailure",
                    "containers": [{
                        "name": EXPORT_CONTAINER_NAME,
                        "image": self.image_for(export),
                        "command": ["uexport", backend],
                        "env": env,
                        "envFrom": [{ "secretRef": { "name": export.storage_secret_name() } }]
                    }]
                }
            }
        })
    }

    fn metadata(&self, export: &ArgoCDExport) -> Result<Value> {
        let owner = serde_json::to_value(owner_reference(export)?)
            .map_err(|e| ExportError::Delegation(format!("invalid owner reference: {}", e)))?;

        Ok(json!({
            "name": export.name_any(),
            "namespace": export.namespace(),
            "labels": export_labels(export),
            "ownerReferences": [owner]
        }))
    }

    pub fn build_job(&self, export: &ArgoCDExport) -> Result<Job> {
        let job = json!({
            "apiVersion": "batch/v1",
            "kind": "Job",
            "metadata": self.metadata(export)?,
            "spec": self.job_spec(export)
        });
        serde_json::from_value(job)
            .map_err(|e| ExportError::Delegation(format!("invalid export job: {}", e)))
    }

    pub fn build_cron_job(&self, export: &ArgoCDExport, schedule: &str) -> Result<CronJob> {
        let cron_job = json!({
            "apiVersion": "batch/v1",
            "kind": "CronJob",
            "metadata": self.metadata(export)?,
            "spec": {
                "schedule": schedule,
                "jobTemplate": { "spec": self.job_spec(export) }
            }
        });
        serde_json::from_value(cron_job)
            .map_err(|e| ExportError::Delegation(format!("invalid export cronjob: {}", e)))
    }

    fn api<K>(&self, export: &ArgoCDExport) -> Result<Api<K>>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        let namespace = export
            .namespace()
            .ok_or_else(|| ExportError::MissingNamespace(export.name_any()))?;
        Ok(Api::namespaced(self.client.clone(), &namespace))
    }
}

async fn create_if_absent<K>(api: &Api<K>, object: &K) -> Result<()>
where
    K: Resource + Clone + Serialize + DeserializeOwned + Debug,
    <K as Resource>::DynamicType: Default,
{
    let name = object.name_any();
    let kind = K::kind(&Default::default()).to_string();

    let existing = api
        .get_opt(&name)
        .await
        .map_err(|e| ExportError::Delegation(format!("failed to look up {} {}: {}", kind, name, e)))?;
    if existing.is_some() {
        debug!("{} {} already exists", kind, name);
        return Ok(());
    }

    info!("Creating {} {}", kind, name);
    api.create(&PostParams::default(), object)
        .await
        .map_err(|e| ExportError::Delegation(format!("failed to create {} {}: {}", kind, name, e)))?;
    Ok(())
}

#[async_trait]
impl ExportWorkloads for BatchWorkloads {
    #[instrument(skip(self, export), fields(export = %export.name_any()))]
    async fn reconcile_job(&self, export: &ArgoCDExport) -> Result<()> {
        let jobs: Api<Job> = self.api(export)?;
        create_if_absent(&jobs, &self.build_job(export)?).await
    }

    #[instrument(skip(self, export), fields(export = %export.name_any()))]
    async fn reconcile_cron_job(&self, export: &ArgoCDExport) -> Result<()> {
        let schedule = export.active_schedule().unwrap_or_default();
        let cron_jobs: Api<CronJob> = self.api(export)?;
        create_if_absent(&cron_jobs, &self.build_cron_job(export, schedule)?).await
    }
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Export reconciliation: the credential Secret first, then either a one-shot
//! Job or a recurring CronJob.

pub mod secret;
pub mod status;
pub mod workloads;

pub use secret::reconcile_export_secret;
pub use status::validate_export;
pub use workloads::{BatchWorkloads, ExportWorkloads};

use crate::constants::{labels, OPERATOR_NAME};
use crate::credentials::BackupKeyPolicy;
use crate::error::{ExportError, Result};
use crate::types::ArgoCDExport;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Client, Resource, ResourceExt};
use std::collections::BTreeMap;
use tracing::{info, instrument};

/// Labels put on every object created for an export
pub fn export_labels(export: &ArgoCDExport) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::NAME.to_string(), export.name_any()),
        (labels::PART_OF.to_string(), labels::PART_OF_VALUE.to_string()),
        (labels::MANAGED_BY.to_string(), OPERATOR_NAME.to_string()),
    ])
}

/// Controller owner reference so objects are garbage collected with their export
pub fn owner_reference(export: &ArgoCDExport) -> Result<OwnerReference> {
    export
        .controller_owner_ref(&())
        .ok_or_else(|| ExportError::MissingUid(export.name_any()))
}

/// Drives a single reconcile pass for an ArgoCDExport.
pub struct ExportReconciler<W> {
    client: Client,
    workloads: W,
    key_policy: BackupKeyPolicy,
}

impl<W: ExportWorkloads> ExportReconciler<W> {
    pub fn new(client: Client, workloads: W, key_policy: BackupKeyPolicy) -> Self {
        Self {
            client,
            workloads,
            key_policy,
        }
    }

    pub async fn validate_export(&self, export: &ArgoCDExport) -> Result<()> {
        validate_export(&self.client, export).await
    }

    /// Ensure the Secret, then the Job or CronJob, exist for the export.
    /// Stops at the first error; a Secret written earlier in the pass stays.
    #[instrument(
        skip(self, export),
        fields(export = %export.name_any(), namespace = %export.namespace().unwrap_or_default())
    )]
    pub async fn reconcile_export(&self, export: &ArgoCDExport) -> Result<()> {
        info!("Reconciling export secret");
        reconcile_export_secret(&self.client, export, &self.key_policy).await?;

        match export.active_schedule() {
            Some(schedule) => {
                info!(schedule = %schedule, "Reconciling export cronjob");
                self.workloads.reconcile_cron_job(export).await
            }
            None => {
                info!("Reconciling export job");
                self.workloads.reconcile_job(export).await
            }
        }
    }
}

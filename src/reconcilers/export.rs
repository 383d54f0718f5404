// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Export reconciler - watches ArgoCDExport resources and the objects they own.

use crate::config::Config;
use crate::error::{ExportError, Result};
use crate::export::{ExportReconciler, ExportWorkloads};
use crate::types::ArgoCDExport;
use futures::StreamExt;
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::NamespaceResourceScope;
use kube::{
    runtime::{controller::Action, Controller},
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub struct ExportController<W> {
    client: Client,
    reconciler: ExportReconciler<W>,
    config: Config,
}

impl<W: ExportWorkloads + 'static> ExportController<W> {
    pub fn new(client: Client, workloads: W, config: Config) -> Self {
        let reconciler = ExportReconciler::new(client.clone(), workloads, config.backup_key_policy);
        Self {
            client,
            reconciler,
            config,
        }
    }

    fn api<K>(&self) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        match self.config.watch_namespace.as_deref() {
            Some(namespace) => Api::namespaced(self.client.clone(), namespace),
            None => Api::all(self.client.clone()),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let exports: Api<ArgoCDExport> = self.api();
        let secrets: Api<Secret> = self.api();
        let jobs: Api<Job> = self.api();
        let cron_jobs: Api<CronJob> = self.api();

        match self.config.watch_namespace.as_deref() {
            Some(namespace) => info!("Watching ArgoCDExports in namespace {}", namespace),
            None => info!("Watching ArgoCDExports in all namespaces"),
        }

        let context = Arc::new(self);

        Controller::new(exports, WatcherConfig::default())
            .owns(secrets, WatcherConfig::default())
            .owns(jobs, WatcherConfig::default())
            .owns(cron_jobs, WatcherConfig::default())
            .shutdown_on_signal()
            .run(reconcile::<W>, error_policy::<W>, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled export: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }
}

async fn reconcile<W: ExportWorkloads + 'static>(
    export: Arc<ArgoCDExport>,
    ctx: Arc<ExportController<W>>,
) -> Result<Action> {
    let name = export.name_any();
    let namespace = export.namespace().unwrap_or_default();

    if export.metadata.deletion_timestamp.is_some() {
        debug!("ArgoCDExport {}/{} is being deleted, skipping", namespace, name);
        return Ok(Action::await_change());
    }

    debug!("Reconciling ArgoCDExport: {}/{}", namespace, name);

    ctx.reconciler.validate_export(&export).await?;
    ctx.reconciler.reconcile_export(&export).await?;

    // Owned objects changing or the export being edited will wake us up again
    Ok(Action::await_change())
}

fn error_policy<W>(export: Arc<ArgoCDExport>, error: &ExportError, ctx: Arc<ExportController<W>>) -> Action {
    let requeue = Duration::from_secs(ctx.config.error_requeue_secs);
    if error.is_transient() {
        warn!(
            "Reconciliation of {}/{} failed, retrying in {:?}: {}",
            export.namespace().unwrap_or_default(),
            export.name_any(),
            requeue,
            error
        );
    } else {
        error!(
            "Reconciliation of {}/{} failed: {}",
            export.namespace().unwrap_or_default(),
            export.name_any(),
            error
        );
    }
    Action::requeue(requeue)
}

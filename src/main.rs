// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use kube::Client;
use tracing::{info, warn};

use argocd_export_operator::config::Config;
use argocd_export_operator::export::BatchWorkloads;
use argocd_export_operator::kubernetes::wait_for_export_crd;
use argocd_export_operator::reconcilers::ExportController;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting ArgoCDExport operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: watch_namespace={}, export_image={}:{}",
        config.watch_namespace.as_deref().unwrap_or("<all>"),
        config.export_image,
        config.export_version
    );
    config.backup_key_policy.validate()?;

    // Create Kubernetes client
    let client = Client::try_default().await?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for ArgoCDExport CRD to become available...");
    wait_for_export_crd(&client).await?;

    let workloads = BatchWorkloads::new(client.clone(), &config);
    let controller = ExportController::new(client, workloads, config);

    info!("Starting export reconciler...");
    controller.run().await?;

    warn!("Export reconciler stopped");
    Ok(())
}

// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Initial status phase for newly observed exports.

use crate::constants::phases;
use crate::error::{ExportError, Result};
use crate::types::ArgoCDExport;
use kube::{
    api::{Patch, PatchParams},
    Api, Client, ResourceExt,
};
use serde_json::json;
use tracing::{debug, info, instrument};

/// Give a newly observed export its initial phase. Exports that already have one are untouched.
#[instrument(
    skip(client, export),
    fields(export = %export.name_any(), namespace = %export.namespace().unwrap_or_default())
)]
pub async fn validate_export(client: &Client, export: &ArgoCDExport) -> Result<()> {
    if !export.phase().is_empty() {
        debug!("Export already in phase {}", export.phase());
        return Ok(());
    }

    let namespace = export
        .namespace()
        .ok_or_else(|| ExportError::MissingNamespace(export.name_any()))?;
    let exports: Api<ArgoCDExport> = Api::namespaced(client.clone(), &namespace);

    let patch = json!({ "status": { "phase": phases::PENDING } });
    exports
        .patch_status(&export.name_any(), &PatchParams::default(), &Patch::Merge(&patch))
        .await?;

    info!("Export {}/{} is now {}", namespace, export.name_any(), phases::PENDING);
    Ok(())
}

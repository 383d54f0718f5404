// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Export Secret reconciliation: create once, fill in missing fields, never overwrite.

use crate::constants::keys;
use crate::credentials::{generate_backup_key, generate_bucket_name, BackupKeyPolicy};
use crate::error::{ExportError, Result};
use crate::export::{export_labels, owner_reference};
use crate::types::ArgoCDExport;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::{
    api::{ObjectMeta, PostParams},
    Api, Client, ResourceExt,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Ensure the Secret used by the export process exists and holds every required field.
#[instrument(
    skip(client, export, policy),
    fields(export = %export.name_any(), namespace = %export.namespace().unwrap_or_default())
)]
pub async fn reconcile_export_secret(
    client: &Client,
    export: &ArgoCDExport,
    policy: &BackupKeyPolicy,
) -> Result<()> {
    let name = export.storage_secret_name();
    let namespace = export
        .namespace()
        .ok_or_else(|| ExportError::MissingNamespace(export.name_any()))?;
    let secrets: Api<Secret> = Api::namespaced(client.clone(), &namespace);

    match secrets.get_opt(&name).await? {
        Some(mut secret) => {
            if !fill_missing_fields(&mut secret, export, policy)? {
                // A backup key that changes behind our back does not trigger a new export.
                debug!("Export secret {}/{} is up to date", namespace, name);
                return Ok(());
            }

            info!("Updating export secret {}/{}", namespace, name);
            secrets.replace(&name, &PostParams::default(), &secret).await?;
        }
        None => {
            let secret = new_export_secret(export, &name, &namespace, policy)?;

            info!("Creating export secret {}/{}", namespace, name);
            secrets.create(&PostParams::default(), &secret).await?;
        }
    }

    Ok(())
}

fn is_unset(data: &BTreeMap<String, ByteString>, key: &str) -> bool {
    data.get(key).map_or(true, |value| value.0.is_empty())
}

/// Populate empty fields of an existing Secret. Returns whether anything changed.
fn fill_missing_fields(
    secret: &mut Secret,
    export: &ArgoCDExport,
    policy: &BackupKeyPolicy,
) -> Result<bool> {
    let data = secret.data.get_or_insert_with(BTreeMap::new);
    let mut changed = false;

    if is_unset(data, keys::BACKUP_KEY) {
        data.insert(
            keys::BACKUP_KEY.to_string(),
            ByteString(generate_backup_key(policy)?),
        );
        changed = true;
    }

    if export.uses_aws_backend() && is_unset(data, keys::AWS_BUCKET_NAME) {
        data.insert(
            keys::AWS_BUCKET_NAME.to_string(),
            ByteString(generate_bucket_name(export)),
        );
        changed = true;
    }

    Ok(changed)
}

/// Build a fresh export Secret owned by the export.
/// The bucket name is written whatever the backend.
fn new_export_secret(
    export: &ArgoCDExport,
    name: &str,
    namespace: &str,
    policy: &BackupKeyPolicy,
) -> Result<Secret> {
    let owner = owner_reference(export)?;

    Ok(Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(export_labels(export)),
            owner_references: Some(vec![owner]),
            ..Default::default()
        },
        data: Some(BTreeMap::from([
            (
                keys::BACKUP_KEY.to_string(),
                ByteString(generate_backup_key(policy)?),
            ),
            (
                keys::AWS_BUCKET_NAME.to_string(),
                ByteString(generate_bucket_name(export)),
            ),
        ])),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    })
}

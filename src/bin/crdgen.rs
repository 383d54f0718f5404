// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Prints the ArgoCDExport CustomResourceDefinition as YAML.

use argocd_export_operator::types::ArgoCDExport;
use kube::CustomResourceExt;

fn main() -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(&ArgoCDExport::crd())?);
    Ok(())
}

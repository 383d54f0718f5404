// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::backup_key;
use crate::credentials::BackupKeyPolicy;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

pub const DEFAULT_EXPORT_IMAGE: &str = "quay.io/argoprojlabs/argocd-operator-util";
pub const DEFAULT_EXPORT_VERSION: &str = "latest";
pub const DEFAULT_ERROR_REQUEUE_SECS: u64 = 60;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Namespace to watch, all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Delay before a failed reconcile is retried
    pub error_requeue_secs: u64,
    /// Image running the export when the ArgoCDExport does not override it
    pub export_image: String,
    pub export_version: String,
    pub backup_key_policy: BackupKeyPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            watch_namespace: None,
            error_requeue_secs: DEFAULT_ERROR_REQUEUE_SECS,
            export_image: DEFAULT_EXPORT_IMAGE.to_string(),
            export_version: DEFAULT_EXPORT_VERSION.to_string(),
            backup_key_policy: BackupKeyPolicy::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let watch_namespace = env::var("WATCH_NAMESPACE").ok().filter(|ns| !ns.is_empty());

        Ok(Config {
            watch_namespace,
            error_requeue_secs: parse_var("ERROR_REQUEUE_SECS", DEFAULT_ERROR_REQUEUE_SECS)?,
            export_image: env::var("EXPORT_IMAGE")
                .unwrap_or_else(|_| DEFAULT_EXPORT_IMAGE.to_string()),
            export_version: env::var("EXPORT_VERSION")
                .unwrap_or_else(|_| DEFAULT_EXPORT_VERSION.to_string()),
            backup_key_policy: BackupKeyPolicy {
                length: parse_var("BACKUP_KEY_LENGTH", backup_key::DEFAULT_LENGTH)?,
                num_digits: parse_var("BACKUP_KEY_NUM_DIGITS", backup_key::DEFAULT_NUM_DIGITS)?,
                num_symbols: parse_var(
                    "BACKUP_KEY_NUM_SYMBOLS",
                    backup_key::DEFAULT_NUM_SYMBOLS,
                )?,
            },
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a non-negative integer, got '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

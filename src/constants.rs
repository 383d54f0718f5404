// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Data keys of the export Secret
pub mod keys {
    /// Passphrase protecting the exported data
    pub const BACKUP_KEY: &str = "backupKey";
    /// Bucket used by AWS-backed exports
    pub const AWS_BUCKET_NAME: &str = "awsBucketName";
}

/// Storage backends an ArgoCDExport can declare
pub mod backends {
    pub const AWS: &str = "aws";
    pub const AZURE: &str = "azure";
    pub const GCP: &str = "gcp";
    pub const LOCAL: &str = "local";
}

/// Lifecycle phases written to `status.phase`
pub mod phases {
    /// Initial phase of a newly observed export
    pub const PENDING: &str = "Pending";
}

/// Backup key generation defaults
pub mod backup_key {
    pub const DEFAULT_LENGTH: usize = 32;
    pub const DEFAULT_NUM_DIGITS: usize = 5;
    pub const DEFAULT_NUM_SYMBOLS: usize = 5;
}

/// Labels put on objects owned by an export
pub mod labels {
    pub const NAME: &str = "app.kubernetes.io/name";
    pub const PART_OF: &str = "app.kubernetes.io/part-of";
    pub const PART_OF_VALUE: &str = "argocd-export";
    pub const MANAGED_BY: &str = "app.kubernetes.io/managed-by";
}

/// Suffix appended to the export name to form the default Secret name
pub const EXPORT_SECRET_SUFFIX: &str = "export";

/// Value of the managed-by label on objects the operator creates
pub const OPERATOR_NAME: &str = "argocd-export-operator";

/// CRD polling configuration
pub mod crd {
    pub const GROUP: &str = "argoproj.io";
    pub const VERSION: &str = "v1alpha1";
    pub const KIND: &str = "ArgoCDExport";
    /// Initial polling interval in seconds when waiting for CRD
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}

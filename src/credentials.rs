// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Backup key and bucket name generation for export Secrets.

use crate::constants::backup_key;
use crate::error::{ExportError, Result};
use crate::types::ArgoCDExport;
use kube::ResourceExt;
use rand::rngs::{OsRng, StdRng};
use rand::seq::SliceRandom;
use rand::SeedableRng;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"~!@#$%^&*()_+`-={}|[]\\:\"<>?,./";

/// Shape of a generated backup key. Characters never repeat within a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupKeyPolicy {
    pub length: usize,
    pub num_digits: usize,
    pub num_symbols: usize,
}

impl Default for BackupKeyPolicy {
    fn default() -> Self {
        BackupKeyPolicy {
            length: backup_key::DEFAULT_LENGTH,
            num_digits: backup_key::DEFAULT_NUM_DIGITS,
            num_symbols: backup_key::DEFAULT_NUM_SYMBOLS,
        }
    }
}

impl BackupKeyPolicy {
    /// Number of letters in a key, once the policy has been validated
    fn num_letters(&self) -> usize {
        self.length - self.num_digits - self.num_symbols
    }

    pub fn validate(&self) -> Result<()> {
        if self.length == 0 {
            return Err(ExportError::Generation(
                "backup key length must be at least 1".to_string(),
            ));
        }
        if self.num_digits + self.num_symbols > self.length {
            return Err(ExportError::Generation(format!(
                "{} digits and {} symbols exceed the key length of {}",
                self.num_digits, self.num_symbols, self.length
            )));
        }
        check_available("letters", self.num_letters(), LETTERS)?;
        check_available("digits", self.num_digits, DIGITS)?;
        check_available("symbols", self.num_symbols, SYMBOLS)?;
        Ok(())
    }
}

fn check_available(class: &str, requested: usize, alphabet: &[u8]) -> Result<()> {
    if requested > alphabet.len() {
        return Err(ExportError::Generation(format!(
            "{} non-repeating {} requested but only {} are available",
            requested,
            class,
            alphabet.len()
        )));
    }
    Ok(())
}

/// Generate a random passphrase used to protect the exported data.
pub fn generate_backup_key(policy: &BackupKeyPolicy) -> Result<Vec<u8>> {
    policy.validate()?;

    let mut rng = StdRng::from_rng(OsRng)
        .map_err(|e| ExportError::Generation(format!("failed to seed random generator: {}", e)))?;

    let mut key: Vec<u8> = Vec::with_capacity(policy.length);
    key.extend(LETTERS.choose_multiple(&mut rng, policy.num_letters()));
    key.extend(DIGITS.choose_multiple(&mut rng, policy.num_digits));
    key.extend(SYMBOLS.choose_multiple(&mut rng, policy.num_symbols));
    key.shuffle(&mut rng);

    Ok(key)
}

/// The AWS bucket name for an export is its own name.
pub fn generate_bucket_name(export: &ArgoCDExport) -> Vec<u8> {
    export.name_any().into_bytes()
}

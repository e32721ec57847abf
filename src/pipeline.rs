//! End-to-end run: load, schema, semantics, canonicalization.
//!
//! Every entry point returns a [`ValidationReport`]; only a tree that cannot be decoded at all is
//! turned into a single root-scoped `load_error` finding.

use crate::fingerprint::{CanonicalSpec, canonicalize};
use crate::foundation::error::{SpecError, SpecResult};
use crate::schema::{Finding, FindingCode, validate_schema};
use crate::semantic::validate_semantics;
use rayon::prelude::*;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Tunable validation policy.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatorOpts {
    /// `noise_th` values above this (less negative) raise `suspicious_noise_th`.
    pub noise_ceiling_dbm: f64,
    /// Token every diagnostic command template is expected to contain.
    pub placeholder: String,
    /// Length of `meta.schema_hash` in hex characters (1..=64).
    pub hash_len: usize,
}

impl ValidatorOpts {
    pub const DEFAULT_NOISE_CEILING_DBM: f64 = -30.0;
    pub const DEFAULT_PLACEHOLDER: &'static str = "{interface}";
    pub const DEFAULT_HASH_LEN: usize = 12;
}

impl Default for ValidatorOpts {
    fn default() -> Self {
        Self {
            noise_ceiling_dbm: Self::DEFAULT_NOISE_CEILING_DBM,
            placeholder: Self::DEFAULT_PLACEHOLDER.to_owned(),
            hash_len: Self::DEFAULT_HASH_LEN,
        }
    }
}

/// Outcome of one validation run.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    /// Present exactly when `ok` is true.
    pub canonical: Option<CanonicalSpec>,
}

impl ValidationReport {
    fn failed(errors: Vec<Finding>, warnings: Vec<Finding>) -> Self {
        Self {
            ok: false,
            errors,
            warnings,
            canonical: None,
        }
    }

    /// Report for input that never became a JSON tree.
    pub fn load_failure(err: &SpecError) -> Self {
        Self::failed(
            vec![Finding::root(FindingCode::LoadError, err.to_string())],
            Vec::new(),
        )
    }

    pub fn schema_hash(&self) -> Option<&str> {
        self.canonical.as_ref().map(CanonicalSpec::schema_hash)
    }

    /// All findings with the given code, errors first.
    pub fn findings_with(&self, code: FindingCode) -> impl Iterator<Item = &Finding> {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |f| f.code == code)
    }
}

/// Validate an already-decoded JSON tree.
#[tracing::instrument(skip(root, opts))]
pub fn validate_value(root: &Value, opts: &ValidatorOpts) -> ValidationReport {
    let spec = match validate_schema(root) {
        Ok(spec) => spec,
        Err(errors) => return ValidationReport::failed(errors, Vec::new()),
    };

    let findings = validate_semantics(&spec, opts);
    if !findings.errors.is_empty() {
        return ValidationReport::failed(findings.errors, findings.warnings);
    }

    match canonicalize(&spec, opts) {
        Ok(canonical) => ValidationReport {
            ok: true,
            errors: Vec::new(),
            warnings: findings.warnings,
            canonical: Some(canonical),
        },
        Err(e) => {
            tracing::error!(error = %e, "canonicalization failed");
            ValidationReport::failed(
                vec![Finding::root(FindingCode::InternalError, e.to_string())],
                findings.warnings,
            )
        }
    }
}

/// Decode and validate JSON text.
pub fn validate_str(text: &str, opts: &ValidatorOpts) -> ValidationReport {
    match load_str(text) {
        Ok(root) => validate_value(&root, opts),
        Err(e) => ValidationReport::load_failure(&e),
    }
}

/// Read, decode and validate a JSON file.
pub fn validate_path(path: impl AsRef<Path>, opts: &ValidatorOpts) -> ValidationReport {
    match load_path(path.as_ref()) {
        Ok(root) => validate_value(&root, opts),
        Err(e) => ValidationReport::load_failure(&e),
    }
}

/// Validate several files independently and in parallel; reports keep input order.
pub fn validate_many(paths: &[PathBuf], opts: &ValidatorOpts) -> Vec<ValidationReport> {
    paths.par_iter().map(|p| validate_path(p, opts)).collect()
}

pub fn load_str(text: &str) -> SpecResult<Value> {
    serde_json::from_str(text).map_err(|e| SpecError::load(format!("parse spec JSON: {e}")))
}

pub fn load_path(path: &Path) -> SpecResult<Value> {
    let f = File::open(path)
        .map_err(|e| SpecError::load(format!("open spec JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(f))
        .map_err(|e| SpecError::load(format!("parse spec JSON '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;

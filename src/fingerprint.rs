//! Canonical encoding and content fingerprint.
//!
//! The canonical form is compact JSON with object keys sorted lexicographically at every level,
//! written by hand so the ordering does not depend on how `serde_json` was built. The fingerprint
//! is computed over the canonical bytes of the specification *without* `meta.schema_hash`, then
//! attached; re-canonicalizing a canonical document therefore reproduces it byte for byte.

use crate::foundation::error::{SpecError, SpecResult};
use crate::model::Specification;
use crate::pipeline::ValidatorOpts;
use serde_json::Value;
use sha2::Digest as _;

/// Key under `meta` where the fingerprint is stored.
pub const SCHEMA_HASH_KEY: &str = "schema_hash";

/// Normalized specification plus its fingerprint.
#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalSpec {
    value: Value,
    bytes: Vec<u8>,
    schema_hash: String,
}

impl CanonicalSpec {
    /// The canonical tree, `meta.schema_hash` included.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Exact canonical byte sequence; this is what gets persisted.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn schema_hash(&self) -> &str {
        &self.schema_hash
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Canonicalize a specification that passed semantic validation.
#[tracing::instrument(skip(spec, opts))]
pub fn canonicalize(spec: &Specification, opts: &ValidatorOpts) -> SpecResult<CanonicalSpec> {
    let mut value = serde_json::to_value(spec)
        .map_err(|e| SpecError::serde(format!("encode specification: {e}")))?;

    let hashed = canonical_bytes(&value)?;
    let schema_hash = fingerprint_bytes(&hashed, opts.hash_len);

    let Some(meta) = value.get_mut("meta").and_then(Value::as_object_mut) else {
        return Err(SpecError::validation(
            "specification encoded without a `meta` object",
        ));
    };
    meta.insert(
        SCHEMA_HASH_KEY.to_owned(),
        Value::String(schema_hash.clone()),
    );

    let bytes = canonical_bytes(&value)?;
    tracing::debug!(schema_hash = %schema_hash, len = bytes.len(), "canonicalized");

    Ok(CanonicalSpec {
        value,
        bytes,
        schema_hash,
    })
}

/// Fingerprint of a specification, as it would appear in `meta.schema_hash`.
pub fn fingerprint(spec: &Specification, opts: &ValidatorOpts) -> SpecResult<String> {
    let value = serde_json::to_value(spec)
        .map_err(|e| SpecError::serde(format!("encode specification: {e}")))?;
    Ok(fingerprint_bytes(&canonical_bytes(&value)?, opts.hash_len))
}

/// Encode a JSON tree with sorted keys and no insignificant whitespace.
pub fn canonical_bytes(v: &Value) -> SpecResult<Vec<u8>> {
    let mut out = Vec::new();
    write_canonical(&mut out, v)?;
    Ok(out)
}

fn write_canonical(out: &mut Vec<u8>, v: &Value) -> SpecResult<()> {
    match v {
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_canonical(out, item)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut keys = map.keys().collect::<Vec<_>>();
            keys.sort();
            out.push(b'{');
            for (i, k) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_scalar(out, &Value::String(k.clone()))?;
                out.push(b':');
                write_canonical(out, &map[k])?;
            }
            out.push(b'}');
        }
        scalar => write_scalar(out, scalar)?,
    }
    Ok(())
}

fn write_scalar(out: &mut Vec<u8>, v: &Value) -> SpecResult<()> {
    serde_json::to_writer(&mut *out, v)
        .map_err(|e| SpecError::serde(format!("encode canonical JSON: {e}")))
}

/// Lowercase hex SHA-256 of `bytes`, truncated to `len` characters (clamped to 1..=64).
pub fn fingerprint_bytes(bytes: &[u8], len: usize) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for b in digest {
        hex.push_str(&format!("{:02x}", b));
    }
    hex.truncate(len.clamp(1, 64));
    hex
}

#[cfg(test)]
#[path = "../tests/unit/fingerprint.rs"]
mod tests;

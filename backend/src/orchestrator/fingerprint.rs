//! Configuration fingerprinting
//!
//! A run is reproducible from its configuration alone (the seed is part of
//! it), so a stable hash of the configuration identifies a run's results.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::SimulationError;

/// SHA-256 of the configuration's canonical JSON, hex encoded
///
/// Object keys are sorted recursively before hashing, so field order in the
/// source document never changes the fingerprint.
pub fn config_fingerprint<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    let value = serde_json::to_value(config)
        .map_err(|e| SimulationError::Serialization(format!("config serialization failed: {}", e)))?;

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SimulationError::Serialization(format!("config serialization failed: {}", e)))?;

    let digest = Sha256::digest(json.as_bytes());
    Ok(format!("{:x}", digest))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

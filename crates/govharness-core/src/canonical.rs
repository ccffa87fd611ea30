// SPDX-License-Identifier: Apache-2.0

//! Key-order independent JSON encoding used for config fingerprints and for
//! stable CLI output.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub fn stable_json_value<T: Serialize>(value: &T) -> Result<Value, serde_json::Error> {
    Ok(normalize_json_value(serde_json::to_value(value)?))
}

pub fn stable_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(&stable_json_value(value)?)
}

pub fn stable_json_pretty<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&stable_json_value(value)?)
}

#[must_use]
pub fn stable_hash_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn stable_json_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = stable_json_bytes(value)?;
    Ok(stable_hash_hex(&bytes))
}

/// Returns true when the dotted `path` names a value inside nested objects.
#[must_use]
pub fn field_path_exists(root: &Value, path: &str) -> bool {
    let mut cur = root;
    for seg in path.split('.') {
        if seg.is_empty() {
            return false;
        }
        cur = match cur {
            Value::Object(map) => match map.get(seg) {
                Some(v) => v,
                None => return false,
            },
            _ => return false,
        };
    }
    true
}

/// Dotted paths of every leaf value (and every empty object) in `root`.
#[must_use]
pub fn leaf_paths(root: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_leaf_paths(root, String::new(), &mut out);
    out.sort();
    out
}

fn collect_leaf_paths(value: &Value, prefix: String, out: &mut Vec<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaf_paths(child, path, out);
            }
        }
        _ => {
            if !prefix.is_empty() {
                out.push(prefix);
            }
        }
    }
}

fn normalize_json_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map
                .into_iter()
                .map(|(k, v)| (k, normalize_json_value(v)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (k, v) in entries {
                sorted.insert(k, v);
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_json_value).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaf_paths_walk_nested_objects() {
        let value = json!({"naming": {"maxNameLength": 24, "timestampFormat": "%Y"}, "tags": {}});
        assert_eq!(
            leaf_paths(&value),
            vec!["naming.maxNameLength", "naming.timestampFormat", "tags"]
        );
        assert!(field_path_exists(&value, "naming.maxNameLength"));
        assert!(!field_path_exists(&value, "naming.missing"));
        assert!(!field_path_exists(&value, "naming..maxNameLength"));
    }
}

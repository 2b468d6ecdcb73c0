/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! RPC-driven configuration operations: dotted-path reads and `key:value`
//! mutations over the raw config document, plus signed replacement via
//! `LoadConfig`. Every mutation is schema-validated before it is
//! persisted.

use serde_json::Value;

use crate::error::{DispatcherError, DispatcherResult};

/// Read the value at a dotted path (`trustedRepositories` or
/// `proxy.url`-style).
pub fn get_path(document: &Value, path: &str) -> DispatcherResult<String> {
    if path.trim().is_empty() {
        return Err(DispatcherError::BadRequest("empty config path".to_string()));
    }
    let mut current = document;
    for segment in path.split('.') {
        current = current.get(segment).ok_or_else(|| {
            DispatcherError::BadRequest(format!("unknown config path {path:?}"))
        })?;
    }
    Ok(match current {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Split a `key:value` argument. The value may itself contain colons.
fn split_key_value(key_value: &str) -> DispatcherResult<(&str, &str)> {
    let (key, value) = key_value.split_once(':').ok_or_else(|| {
        DispatcherError::BadRequest(format!("expected key:value, got {key_value:?}"))
    })?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return Err(DispatcherError::BadRequest(format!(
            "expected key:value, got {key_value:?}"
        )));
    }
    Ok((key, value))
}

fn parent_of<'a>(
    document: &'a mut Value,
    path: &str,
) -> DispatcherResult<(&'a mut serde_json::Map<String, Value>, String)> {
    let mut segments: Vec<&str> = path.split('.').collect();
    let leaf = segments.pop().expect("split always yields one segment");
    let mut current = document;
    for segment in segments {
        current = current.get_mut(segment).ok_or_else(|| {
            DispatcherError::BadRequest(format!("unknown config path {path:?}"))
        })?;
    }
    match current.as_object_mut() {
        Some(map) => Ok((map, leaf.to_string())),
        None => Err(DispatcherError::BadRequest(format!(
            "config path {path:?} does not point into an object"
        ))),
    }
}

/// Interpret the value as JSON when it parses, a string otherwise. Keeps
/// numbers and booleans typed without demanding quoting from operators.
fn coerce(value: &str) -> Value {
    serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

/// `set key:value` — replace (or insert) the value at the key.
pub fn set_key_value(document: &mut Value, key_value: &str) -> DispatcherResult<()> {
    let (key, value) = split_key_value(key_value)?;
    let (parent, leaf) = parent_of(document, key)?;
    parent.insert(leaf, coerce(value));
    Ok(())
}

/// `append key:value` — push onto an existing array.
pub fn append_key_value(document: &mut Value, key_value: &str) -> DispatcherResult<()> {
    let (key, value) = split_key_value(key_value)?;
    let (parent, leaf) = parent_of(document, key)?;
    match parent.get_mut(&leaf) {
        Some(Value::Array(items)) => {
            items.push(coerce(value));
            Ok(())
        }
        Some(_) => Err(DispatcherError::BadRequest(format!(
            "config key {key:?} is not a list"
        ))),
        None => Err(DispatcherError::BadRequest(format!(
            "unknown config path {key:?}"
        ))),
    }
}

/// `remove key:value` — drop a matching element from an array, or drop
/// the key entirely when it holds the given scalar.
pub fn remove_key_value(document: &mut Value, key_value: &str) -> DispatcherResult<()> {
    let (key, value) = split_key_value(key_value)?;
    let (parent, leaf) = parent_of(document, key)?;
    let target = coerce(value);
    match parent.get_mut(&leaf) {
        Some(Value::Array(items)) => {
            let before = items.len();
            items.retain(|item| item != &target);
            if items.len() == before {
                return Err(DispatcherError::BadRequest(format!(
                    "value not present under {key:?}"
                )));
            }
            Ok(())
        }
        Some(existing) if *existing == target => {
            parent.remove(&leaf);
            Ok(())
        }
        Some(_) => Err(DispatcherError::BadRequest(format!(
            "value under {key:?} does not match"
        ))),
        None => Err(DispatcherError::BadRequest(format!(
            "unknown config path {key:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Value {
        serde_json::json!({
            "osType": "mutable",
            "verifierRetries": 10,
            "trustedRepositories": ["https://a.example.com/", "https://b.example.com/"],
        })
    }

    #[test]
    fn get_reads_scalars_and_arrays() {
        let doc = document();
        assert_eq!(get_path(&doc, "osType").unwrap(), "mutable");
        assert_eq!(get_path(&doc, "verifierRetries").unwrap(), "10");
        assert!(get_path(&doc, "trustedRepositories").unwrap().contains("a.example.com"));
        assert!(get_path(&doc, "nope").is_err());
    }

    #[test]
    fn set_replaces_and_keeps_types() {
        let mut doc = document();
        set_key_value(&mut doc, "verifierRetries:5").unwrap();
        assert_eq!(doc["verifierRetries"], serde_json::json!(5));
        set_key_value(&mut doc, "osType:immutable").unwrap();
        assert_eq!(doc["osType"], serde_json::json!("immutable"));
    }

    #[test]
    fn append_requires_a_list() {
        let mut doc = document();
        append_key_value(&mut doc, "trustedRepositories:https://c.example.com/").unwrap();
        assert_eq!(
            doc["trustedRepositories"].as_array().unwrap().len(),
            3
        );
        assert!(append_key_value(&mut doc, "osType:x").is_err());
    }

    #[test]
    fn remove_drops_matching_array_elements() {
        let mut doc = document();
        remove_key_value(&mut doc, "trustedRepositories:https://a.example.com/").unwrap();
        assert_eq!(doc["trustedRepositories"].as_array().unwrap().len(), 1);
        assert!(
            remove_key_value(&mut doc, "trustedRepositories:https://nope.example.com/").is_err()
        );
    }

    #[test]
    fn bare_keys_are_rejected() {
        let mut doc = document();
        assert!(set_key_value(&mut doc, "justakey").is_err());
        assert!(set_key_value(&mut doc, ":value").is_err());
        assert!(set_key_value(&mut doc, "key:").is_err());
    }
}

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

//! Guarded reads of on-disk JSON documents: never through a symlink, never
//! binary content, always validated against a JSON Schema.

use std::path::Path;
use std::sync::Arc;

use basalt_utils::FileSystem;

use crate::error::{DispatcherError, DispatcherResult};

/// Read a JSON document while rejecting symlinks and binary-looking
/// content.
pub fn read_json_guarded(
    fs: &Arc<dyn FileSystem>,
    path: &Path,
) -> DispatcherResult<serde_json::Value> {
    if fs.is_symlink(path).map_err(|_| {
        DispatcherError::Config(format!("{} does not exist", path.display()))
    })? {
        return Err(DispatcherError::Config(format!(
            "{} is a symlink; refusing to follow",
            path.display()
        )));
    }
    let raw = fs.read(path)?;
    if raw.contains(&0u8) {
        return Err(DispatcherError::Config(format!(
            "{} contains binary content",
            path.display()
        )));
    }
    let text = String::from_utf8(raw).map_err(|_| {
        DispatcherError::Config(format!("{} is not valid UTF-8", path.display()))
    })?;
    Ok(serde_json::from_str(&text)?)
}

/// Validate `instance` against `schema`, reporting the first violation.
pub fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> DispatcherResult<()> {
    let validator = jsonschema::validator_for(schema)
        .map_err(|err| DispatcherError::Config(format!("invalid schema: {err}")))?;
    validator
        .validate(instance)
        .map_err(|err| DispatcherError::Config(format!("schema violation: {err}")))
}

#[cfg(test)]
mod tests {
    use basalt_utils::RealFileSystem;

    use super::*;

    fn fs() -> Arc<dyn FileSystem> {
        Arc::new(RealFileSystem)
    }

    #[test]
    fn rejects_symlinked_config() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("real.json");
        let link = dir.path().join("link.json");
        std::fs::write(&real, "{}").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let err = read_json_guarded(&fs(), &link).unwrap_err();
        assert!(err.to_string().contains("symlink"));
    }

    #[test]
    fn rejects_binary_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf.json");
        std::fs::write(&path, b"\x7fELF\x00\x01\x02").unwrap();

        let err = read_json_guarded(&fs(), &path).unwrap_err();
        assert!(err.to_string().contains("binary"));
    }

    #[test]
    fn schema_violation_is_reported() {
        let schema = serde_json::json!({
            "type": "object",
            "required": ["osType"],
        });
        let bad = serde_json::json!({"other": 1});
        assert!(validate_against_schema(&schema, &bad).is_err());
        let good = serde_json::json!({"osType": "mutable"});
        assert!(validate_against_schema(&schema, &good).is_ok());
    }
}

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

//! Dispatcher configuration. The on-disk document is JSON, validated
//! against its JSON Schema at load time; a schema violation refuses
//! startup.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use basalt_utils::FileSystem;
use serde::{Deserialize, Serialize};

use crate::error::{DispatcherError, DispatcherResult};
use crate::schema::{read_json_guarded, validate_against_schema};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/inbd.conf";
pub const DEFAULT_CONFIG_SCHEMA_PATH: &str = "/usr/share/inbd_config_schema.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistroKind {
    /// Updated in place through the package manager.
    Mutable,
    /// Updated by swapping a whole OS image behind a filesystem snapshot.
    Immutable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherConfig {
    pub os_type: DistroKind,

    #[serde(default = "defaults::socket_path")]
    pub socket_path: PathBuf,
    #[serde(default = "defaults::state_file")]
    pub state_file: PathBuf,
    #[serde(default = "defaults::granular_log_file")]
    pub granular_log_file: PathBuf,
    #[serde(default = "defaults::download_dir")]
    pub download_dir: PathBuf,

    /// URL prefixes downloads must match.
    #[serde(default)]
    pub trusted_repositories: Vec<String>,

    /// When the root filesystem cannot be snapshotted: true skips the
    /// snapshot with a log line, false makes it a fatal error.
    #[serde(default = "defaults::yes")]
    pub proceed_with_rollback: bool,

    #[serde(default = "defaults::network_check_urls")]
    pub network_check_urls: Vec<String>,

    #[serde(default = "defaults::snapshot_tool")]
    pub snapshot_tool: String,
    #[serde(default = "defaults::image_update_tool")]
    pub image_update_tool: String,
    /// Digest of the currently running image, maintained by the image
    /// update tool. Compared against the desired profile after a reboot.
    #[serde(default = "defaults::image_sha_file")]
    pub image_sha_file: PathBuf,

    #[serde(default = "defaults::firmware_tool_info")]
    pub firmware_tool_info: PathBuf,
    #[serde(default = "defaults::firmware_tool_schema")]
    pub firmware_tool_schema: PathBuf,

    #[serde(default = "defaults::apt_sources_list")]
    pub apt_sources_list: PathBuf,
    #[serde(default = "defaults::apt_sources_dir")]
    pub apt_sources_dir: PathBuf,
    #[serde(default = "defaults::gpg_key_dir")]
    pub gpg_key_dir: PathBuf,

    /// Forward-proxy integration for `#ReleaseService` repositories.
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default)]
    pub proxy_config_file: Option<PathBuf>,
    #[serde(default = "defaults::proxy_reload_command")]
    pub proxy_reload_command: Vec<String>,

    #[serde(default = "defaults::verifier_retries")]
    pub verifier_retries: u32,
    #[serde(default = "defaults::verifier_read_interval_secs")]
    pub verifier_read_interval_secs: u64,
}

mod defaults {
    use std::path::PathBuf;

    pub fn socket_path() -> PathBuf {
        PathBuf::from(basalt_rpc::socket::DEFAULT_DISPATCHER_SOCKET)
    }
    pub fn state_file() -> PathBuf {
        PathBuf::from("/var/lib/inbd/state.json")
    }
    pub fn granular_log_file() -> PathBuf {
        PathBuf::from("/var/lib/inbd/granular.log")
    }
    pub fn download_dir() -> PathBuf {
        PathBuf::from("/var/cache/inbd/downloads")
    }
    pub fn yes() -> bool {
        true
    }
    pub fn network_check_urls() -> Vec<String> {
        vec!["https://www.google.com".to_string()]
    }
    pub fn snapshot_tool() -> String {
        "snapper".to_string()
    }
    pub fn image_update_tool() -> String {
        "/usr/bin/os-update-tool".to_string()
    }
    pub fn image_sha_file() -> PathBuf {
        PathBuf::from("/etc/image.sha")
    }
    pub fn firmware_tool_info() -> PathBuf {
        PathBuf::from("/etc/firmware_tool_info.conf")
    }
    pub fn firmware_tool_schema() -> PathBuf {
        PathBuf::from("/usr/share/firmware_tool_config_schema.json")
    }
    pub fn apt_sources_list() -> PathBuf {
        PathBuf::from("/etc/apt/sources.list")
    }
    pub fn apt_sources_dir() -> PathBuf {
        PathBuf::from("/etc/apt/sources.list.d")
    }
    pub fn gpg_key_dir() -> PathBuf {
        PathBuf::from("/usr/share/keyrings")
    }
    pub fn proxy_reload_command() -> Vec<String> {
        vec![
            "systemctl".to_string(),
            "reload".to_string(),
            "caddy".to_string(),
        ]
    }
    pub fn verifier_retries() -> u32 {
        10
    }
    pub fn verifier_read_interval_secs() -> u64 {
        2
    }
}

/// The loaded configuration plus its raw JSON document and schema. The
/// raw value backs the config RPC operations (get/set/append/remove),
/// which mutate the document, re-validate it and persist it atomically.
#[derive(Debug, Clone)]
pub struct ConfigState {
    pub typed: DispatcherConfig,
    pub raw: serde_json::Value,
    pub schema: serde_json::Value,
    pub path: PathBuf,
}

impl ConfigState {
    /// Load and validate. Fatal at startup on any schema violation,
    /// symlinked path or binary-looking content.
    pub fn load(
        fs: &Arc<dyn FileSystem>,
        config_path: &Path,
        schema_path: &Path,
    ) -> DispatcherResult<Self> {
        let schema = read_json_guarded(fs, schema_path)?;
        let raw = read_json_guarded(fs, config_path)?;
        validate_against_schema(&schema, &raw)?;
        let typed: DispatcherConfig = serde_json::from_value(raw.clone())?;
        Ok(Self {
            typed,
            raw,
            schema,
            path: config_path.to_path_buf(),
        })
    }

    /// Replace the raw document after a mutation: re-validate, re-type and
    /// persist atomically.
    pub fn replace(
        &mut self,
        fs: &Arc<dyn FileSystem>,
        raw: serde_json::Value,
    ) -> DispatcherResult<()> {
        validate_against_schema(&self.schema, &raw)?;
        let typed: DispatcherConfig = serde_json::from_value(raw.clone())
            .map_err(|err| DispatcherError::BadRequest(format!("config not usable: {err}")))?;
        let rendered = serde_json::to_vec_pretty(&raw)?;
        fs.write_atomic(&self.path, &rendered)?;
        self.raw = raw;
        self.typed = typed;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// A minimal permissive schema for tests that don't exercise
    /// validation itself.
    pub fn open_schema() -> serde_json::Value {
        serde_json::json!({"type": "object"})
    }

    pub fn config_json(os_type: &str, dir: &Path) -> serde_json::Value {
        serde_json::json!({
            "osType": os_type,
            "stateFile": dir.join("state.json"),
            "granularLogFile": dir.join("granular.log"),
            "downloadDir": dir.join("downloads"),
            "aptSourcesList": dir.join("sources.list"),
            "aptSourcesDir": dir.join("sources.list.d"),
            "gpgKeyDir": dir.join("keyrings"),
            "trustedRepositories": ["https://repo.example.com/"],
        })
    }

    pub fn state_for(os_type: &str, dir: &Path) -> ConfigState {
        let raw = config_json(os_type, dir);
        ConfigState {
            typed: serde_json::from_value(raw.clone()).unwrap(),
            raw,
            schema: open_schema(),
            path: dir.join("inbd.conf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::RealFileSystem;

    use super::*;

    fn fs() -> Arc<dyn FileSystem> {
        Arc::new(RealFileSystem)
    }

    fn write_schema(dir: &Path) -> PathBuf {
        let schema_path = dir.join("schema.json");
        let schema = serde_json::json!({
            "type": "object",
            "required": ["osType"],
            "properties": {
                "osType": {"enum": ["mutable", "immutable"]},
            },
        });
        std::fs::write(&schema_path, serde_json::to_vec(&schema).unwrap()).unwrap();
        schema_path
    }

    #[test]
    fn valid_config_loads_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = write_schema(dir.path());
        let config_path = dir.path().join("inbd.conf");
        std::fs::write(&config_path, r#"{"osType": "mutable"}"#).unwrap();

        let state = ConfigState::load(&fs(), &config_path, &schema_path).unwrap();
        assert_eq!(state.typed.os_type, DistroKind::Mutable);
        assert_eq!(
            state.typed.socket_path,
            PathBuf::from("/var/run/inbd.sock")
        );
        assert_eq!(state.typed.verifier_retries, 10);
        assert!(state.typed.proceed_with_rollback);
    }

    #[test]
    fn schema_violation_refuses_startup() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = write_schema(dir.path());
        let config_path = dir.path().join("inbd.conf");
        std::fs::write(&config_path, r#"{"osType": "windows"}"#).unwrap();

        assert!(ConfigState::load(&fs(), &config_path, &schema_path).is_err());
    }

    #[test]
    fn replace_rejects_invalid_document_and_keeps_old_state() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = write_schema(dir.path());
        let config_path = dir.path().join("inbd.conf");
        std::fs::write(&config_path, r#"{"osType": "immutable"}"#).unwrap();

        let mut state = ConfigState::load(&fs(), &config_path, &schema_path).unwrap();
        let err = state
            .replace(&fs(), serde_json::json!({"osType": "bogus"}))
            .unwrap_err();
        assert!(err.to_string().contains("schema violation"));
        assert_eq!(state.typed.os_type, DistroKind::Immutable);
    }
}

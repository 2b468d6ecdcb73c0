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

//! FOTA: platform-aware firmware tool selection from a schema-validated
//! configuration file, trusted-repository download checks and tool
//! invocation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use basalt_rpc::basalt::{HashAlgorithm, UpdateFirmwareRequest};
use basalt_rpc::granular::UpdatePhase;
use basalt_utils::{CommandSpec, Executor, FileSystem};
use serde::{Deserialize, Serialize};

use crate::apt::UpdateOutcome;
use crate::download::{ArtifactFetcher, check_trusted, validate_url, verify_signature};
use crate::error::{DispatcherError, DispatcherResult};
use crate::granular::GranularLogStore;
use crate::power::PowerControl;
use crate::schema::{read_json_guarded, validate_against_schema};

/// One platform entry of the firmware tool configuration, selected by
/// matching `name` against the DMI system product name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirmwareToolInfo {
    pub name: String,
    pub bios_vendor: String,
    pub firmware_tool: String,
    #[serde(default)]
    pub firmware_tool_args: Option<String>,
    #[serde(default)]
    pub firmware_tool_check_args: Option<String>,
    pub firmware_file_type: String,
    #[serde(default)]
    pub tool_options: Option<String>,
    #[serde(default)]
    pub guid: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FirmwareToolConfig {
    firmware_tools: Vec<FirmwareToolInfo>,
}

/// Load the firmware tool configuration (mandatory, schema-validated) and
/// select the entry for this platform.
pub fn load_tool_info(
    fs: &Arc<dyn FileSystem>,
    config_path: &Path,
    schema_path: &Path,
    system_product_name: &str,
) -> DispatcherResult<FirmwareToolInfo> {
    let schema = read_json_guarded(fs, schema_path)?;
    let raw = read_json_guarded(fs, config_path)?;
    validate_against_schema(&schema, &raw)?;
    let config: FirmwareToolConfig = serde_json::from_value(raw)?;

    config
        .firmware_tools
        .into_iter()
        .find(|tool| tool.name == system_product_name)
        .ok_or_else(|| {
            DispatcherError::BadRequest(format!(
                "no firmware tool configured for platform {system_product_name:?}"
            ))
        })
}

pub struct FirmwareUpdater {
    executor: Arc<dyn Executor>,
    fs: Arc<dyn FileSystem>,
    fetcher: ArtifactFetcher,
    config_path: PathBuf,
    schema_path: PathBuf,
    trusted_repositories: Vec<String>,
}

impl FirmwareUpdater {
    pub fn new(
        executor: Arc<dyn Executor>,
        fs: Arc<dyn FileSystem>,
        download_dir: PathBuf,
        config_path: PathBuf,
        schema_path: PathBuf,
        trusted_repositories: Vec<String>,
    ) -> Self {
        let fetcher = ArtifactFetcher::new(fs.clone(), download_dir);
        Self {
            executor,
            fs,
            fetcher,
            config_path,
            schema_path,
            trusted_repositories,
        }
    }

    pub async fn update(
        &self,
        request: &UpdateFirmwareRequest,
        system_product_name: &str,
        granular: &GranularLogStore,
        power: &PowerControl,
    ) -> DispatcherResult<UpdateOutcome> {
        let url = validate_url(&request.url)?;
        check_trusted(&url, &self.trusted_repositories)?;

        let tool_info = load_tool_info(
            &self.fs,
            &self.config_path,
            &self.schema_path,
            system_product_name,
        )?;

        let filename = crate::download::filename_from_url(&url)?;
        if !filename.ends_with(&tool_info.firmware_file_type) {
            return Err(DispatcherError::BadRequest(format!(
                "firmware file {filename:?} does not match expected type {:?}",
                tool_info.firmware_file_type
            )));
        }

        granular.record(UpdatePhase::Downloading, format!("downloading {url}"));
        let path = self.fetcher.fetch(&url).await?;
        if let Some(signature) = request.signature.as_deref().filter(|s| !s.is_empty()) {
            let contents = self.fetcher.read(&path)?;
            verify_signature(HashAlgorithm::Sha384, &contents, signature)?;
        }
        granular.record(UpdatePhase::Downloaded, format!("firmware staged at {}", path.display()));

        if let Some(check_args) = tool_info
            .firmware_tool_check_args
            .as_deref()
            .filter(|a| !a.is_empty())
        {
            let spec = CommandSpec::new(&tool_info.firmware_tool)
                .args(check_args.split_whitespace().map(str::to_string));
            self.exec_checked(spec).await?;
        }

        let mut spec = CommandSpec::new(&tool_info.firmware_tool);
        if let Some(args) = tool_info.firmware_tool_args.as_deref().filter(|a| !a.is_empty()) {
            spec = spec.args(args.split_whitespace().map(str::to_string));
        }
        spec = spec.arg(path.to_string_lossy().into_owned());
        self.exec_checked(spec).await?;

        granular.record(UpdatePhase::Updated, "firmware applied");
        if request.do_not_reboot {
            return Ok(UpdateOutcome {
                rebooting: false,
                detail: "firmware applied".to_string(),
            });
        }
        power.reboot().await?;
        Ok(UpdateOutcome {
            rebooting: true,
            detail: "firmware applied, rebooting".to_string(),
        })
    }

    async fn exec_checked(&self, spec: CommandSpec) -> DispatcherResult<()> {
        let output = self.executor.run(&spec).await?;
        if !output.success() || !output.trimmed_stderr().is_empty() {
            return Err(DispatcherError::CommandFailed {
                command: spec.to_string(),
                stderr: if output.trimmed_stderr().is_empty() {
                    format!("exit code {}", output.exit_code)
                } else {
                    output.trimmed_stderr().to_string()
                },
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::{MockExecutor, RealFileSystem, SystemClock};

    use super::*;

    const SCHEMA: &str = r#"{
        "type": "object",
        "required": ["firmwareTools"],
        "properties": {
            "firmwareTools": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "biosVendor", "firmwareTool", "firmwareFileType"]
                }
            }
        }
    }"#;

    const CONFIG: &str = r#"{
        "firmwareTools": [
            {
                "name": "Edge Server XR12",
                "biosVendor": "American Megatrends Inc.",
                "firmwareTool": "/usr/bin/fwupdate",
                "firmwareToolArgs": "--apply",
                "firmwareFileType": "fwu"
            }
        ]
    }"#;

    fn write_config(dir: &Path) -> (PathBuf, PathBuf) {
        let config = dir.join("firmware_tool_info.conf");
        let schema = dir.join("firmware_tool_config_schema.json");
        std::fs::write(&config, CONFIG).unwrap();
        std::fs::write(&schema, SCHEMA).unwrap();
        (config, schema)
    }

    #[test]
    fn tool_info_is_selected_by_product_name() {
        let dir = tempfile::tempdir().unwrap();
        let (config, schema) = write_config(dir.path());
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

        let info = load_tool_info(&fs, &config, &schema, "Edge Server XR12").unwrap();
        assert_eq!(info.firmware_tool, "/usr/bin/fwupdate");
        assert_eq!(info.firmware_tool_args.as_deref(), Some("--apply"));

        let err = load_tool_info(&fs, &config, &schema, "Unknown Board").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn config_failing_schema_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("firmware_tool_info.conf");
        let schema = dir.path().join("schema.json");
        std::fs::write(&config, r#"{"firmwareTools": [{"name": "X"}]}"#).unwrap();
        std::fs::write(&schema, SCHEMA).unwrap();
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

        let err = load_tool_info(&fs, &config, &schema, "X").unwrap_err();
        assert!(err.to_string().contains("schema violation"));
    }

    #[tokio::test]
    async fn http_url_is_rejected_with_400() {
        let dir = tempfile::tempdir().unwrap();
        let (config, schema) = write_config(dir.path());
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let executor: Arc<dyn Executor> = Arc::new(MockExecutor::new());
        let granular = GranularLogStore::new(
            fs.clone(),
            Arc::new(SystemClock),
            dir.path().join("granular.log"),
        );

        let updater = FirmwareUpdater::new(
            executor.clone(),
            fs,
            dir.path().join("downloads"),
            config,
            schema,
            vec!["https://repo.example.com/".to_string()],
        );
        let err = updater
            .update(
                &UpdateFirmwareRequest {
                    url: "http://foo/bin.fw".to_string(),
                    release_date: None,
                    signature: None,
                    username: None,
                    do_not_reboot: true,
                },
                "Edge Server XR12",
                &granular,
                &PowerControl::new(executor),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}

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

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::{AgentError, AgentResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistroKind {
    Mutable,
    Immutable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Orchestrator endpoint, e.g. `https://orchestrator.example.com:8443`.
    pub orchestrator_url: String,
    /// Stable identifier this node reports itself under.
    pub host_guid: String,
    pub os_type: DistroKind,

    /// Status report interval (`T_status`).
    #[serde(with = "humantime_serde")]
    pub status_interval: Duration,
    /// Window before the update start during which a pending download is
    /// forced to happen immediately.
    #[serde(with = "humantime_serde")]
    pub immediate_window: Duration,
    /// Randomized download window ahead of the immediate window.
    #[serde(with = "humantime_serde")]
    pub download_window: Duration,

    pub metadata_file: PathBuf,
    pub dispatcher_socket: PathBuf,
    pub status_socket: PathBuf,
    /// The dispatcher's granular log, read to classify update outcomes.
    pub granular_log_file: PathBuf,

    /// Status report retry budget before the connection is rebuilt.
    pub report_retries: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            orchestrator_url: "https://localhost:8443".to_string(),
            host_guid: String::new(),
            os_type: DistroKind::Mutable,
            status_interval: Duration::from_secs(10),
            immediate_window: Duration::from_secs(30 * 60),
            download_window: Duration::from_secs(2 * 60 * 60),
            metadata_file: PathBuf::from("/var/lib/basalt-agent/metadata.json"),
            dispatcher_socket: PathBuf::from(basalt_rpc::socket::DEFAULT_DISPATCHER_SOCKET),
            status_socket: PathBuf::from("/var/run/node-status.sock"),
            granular_log_file: PathBuf::from("/var/lib/inbd/granular.log"),
            report_retries: 3,
        }
    }
}

impl AgentConfig {
    /// Layered load: defaults, then the TOML file (if any), then
    /// `BASALT_AGENT_*` environment overrides.
    pub fn load(path: Option<&Path>) -> AgentResult<Self> {
        let mut figment = Figment::from(Serialized::defaults(AgentConfig::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(Env::prefixed("BASALT_AGENT_"))
            .extract()
            .map_err(|err| AgentError::Config(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AgentConfig::default();
        assert_eq!(config.status_interval, Duration::from_secs(10));
        assert!(config.download_window > config.immediate_window);
        assert_eq!(
            config.dispatcher_socket,
            PathBuf::from("/var/run/inbd.sock")
        );
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.toml");
        std::fs::write(
            &path,
            r#"
orchestrator_url = "https://orch.example.com:8443"
host_guid = "edge-0042"
os_type = "immutable"
status_interval = "30s"
"#,
        )
        .unwrap();

        let config = AgentConfig::load(Some(&path)).unwrap();
        assert_eq!(config.host_guid, "edge-0042");
        assert_eq!(config.os_type, DistroKind::Immutable);
        assert_eq!(config.status_interval, Duration::from_secs(30));
        // untouched fields keep their defaults
        assert_eq!(config.report_retries, 3);
    }
}

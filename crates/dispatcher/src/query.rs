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

use std::sync::Arc;

use basalt_inventory::collect::InventoryCollector;
use basalt_rpc::basalt::QueryOption;
use basalt_utils::{CommandSpec, Executor, FileSystem};
use serde::Serialize;

use crate::config::DistroKind;
use crate::error::{DispatcherError, DispatcherResult};

#[derive(Debug, Serialize)]
struct SwbomEntry {
    name: String,
    version: String,
}

pub struct QueryRunner {
    fs: Arc<dyn FileSystem>,
    executor: Arc<dyn Executor>,
    distro: DistroKind,
}

impl QueryRunner {
    pub fn new(fs: Arc<dyn FileSystem>, executor: Arc<dyn Executor>, distro: DistroKind) -> Self {
        Self {
            fs,
            executor,
            distro,
        }
    }

    pub async fn run(&self, option: QueryOption) -> DispatcherResult<serde_json::Value> {
        let collector = InventoryCollector::new(self.fs.clone(), self.executor.clone());
        Ok(match option {
            QueryOption::Hardware => serde_json::to_value(collector.collect().await)?,
            QueryOption::Firmware => {
                let inventory = collector.collect().await;
                serde_json::json!({
                    "bios": inventory.bios,
                    "bmc": inventory.bmc,
                })
            }
            QueryOption::Os => {
                let inventory = collector.collect().await;
                serde_json::to_value(inventory.os)?
            }
            QueryOption::Swbom => serde_json::to_value(self.swbom().await?)?,
            QueryOption::Version => serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
            }),
            QueryOption::All => {
                let inventory = collector.collect().await;
                let swbom = match self.swbom().await {
                    Ok(entries) => serde_json::to_value(entries)?,
                    Err(err) => serde_json::json!({"error": err.to_string()}),
                };
                serde_json::json!({
                    "hardware": inventory,
                    "swbom": swbom,
                    "version": env!("CARGO_PKG_VERSION"),
                })
            }
            QueryOption::Unspecified => {
                return Err(DispatcherError::BadRequest(
                    "query option must be specified".to_string(),
                ));
            }
        })
    }

    async fn swbom(&self) -> DispatcherResult<Vec<SwbomEntry>> {
        if self.distro == DistroKind::Immutable {
            return Err(DispatcherError::NotImplemented(
                "software BOM on immutable distributions",
            ));
        }
        let spec =
            CommandSpec::new("dpkg-query").args(["-W", "-f", "${Package}\\t${Version}\\n"]);
        let output = self.executor.run(&spec).await?;
        if !output.success() {
            return Err(DispatcherError::CommandFailed {
                command: spec.to_string(),
                stderr: output.trimmed_stderr().to_string(),
            });
        }
        Ok(output
            .stdout
            .lines()
            .filter_map(|line| {
                let (name, version) = line.split_once('\t')?;
                Some(SwbomEntry {
                    name: name.to_string(),
                    version: version.to_string(),
                })
            })
            .collect())
    }
}

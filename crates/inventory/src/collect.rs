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

//! Whole-system inventory collection. Individual collector failures are
//! logged and degrade to "Not Available" records; they never fail the
//! inventory as a whole.

use std::path::Path;
use std::sync::Arc;

use basalt_utils::{CommandOutput, CommandSpec, Executor, FileSystem};

use crate::network::NetworkEnumerator;
use crate::parse::{
    parse_dmidecode_bios, parse_ipmitool_firmware_revision, parse_ipmitool_lan_address,
    parse_lsblk_disks, parse_lscpu, parse_lsmem_total_bytes, parse_lspci_gpus, parse_lsusb,
};
use crate::{
    BiosInfo, BmcInfo, HardwareInventory, MemoryInfo, OsInfo, not_available,
};

const DMI_PRODUCT_NAME: &str = "/sys/class/dmi/id/product_name";

pub struct InventoryCollector {
    fs: Arc<dyn FileSystem>,
    executor: Arc<dyn Executor>,
}

impl InventoryCollector {
    pub fn new(fs: Arc<dyn FileSystem>, executor: Arc<dyn Executor>) -> Self {
        Self { fs, executor }
    }

    pub async fn collect(&self) -> HardwareInventory {
        let nics = match NetworkEnumerator::new(self.fs.clone(), self.executor.clone())
            .enumerate()
            .await
        {
            Ok(nics) => nics,
            Err(err) => {
                tracing::warn!(error = %err, "network enumeration failed");
                Vec::new()
            }
        };

        HardwareInventory {
            system_product_name: self.system_product_name().await,
            disks: self
                .tool_output("lsblk", &["-b", "-d", "-P", "-o", "NAME,SIZE,MODEL,SERIAL,TYPE"])
                .await
                .map(|out| parse_lsblk_disks(&out.stdout))
                .unwrap_or_default(),
            gpus: self
                .tool_output("lspci", &[])
                .await
                .map(|out| parse_lspci_gpus(&out.stdout))
                .unwrap_or_default(),
            nics,
            usb_devices: self
                .tool_output("lsusb", &[])
                .await
                .map(|out| parse_lsusb(&out.stdout))
                .unwrap_or_default(),
            cpu: self.cpu().await,
            memory: self.memory().await,
            os: self.os().await,
            bios: self.bios().await,
            bmc: self.bmc().await,
        }
    }

    pub async fn system_product_name(&self) -> String {
        if let Ok(name) = self.fs.read_to_string(Path::new(DMI_PRODUCT_NAME)) {
            let name = name.trim();
            if !name.is_empty() {
                return name.to_string();
            }
        }
        match self
            .tool_output("dmidecode", &["-s", "system-product-name"])
            .await
        {
            Some(out) => {
                let name = out.stdout.trim();
                if name.is_empty() {
                    not_available()
                } else {
                    name.to_string()
                }
            }
            None => not_available(),
        }
    }

    async fn cpu(&self) -> Option<crate::CpuInfo> {
        let summary = self.tool_output("lscpu", &[]).await?;
        let topology = self.tool_output("lscpu", &["-p=SOCKET,CORE"]).await?;
        match parse_lscpu(&summary.stdout, &topology.stdout) {
            Ok(cpu) => Some(cpu),
            Err(err) => {
                tracing::warn!(error = %err, "cpu topology parse failed");
                None
            }
        }
    }

    async fn memory(&self) -> MemoryInfo {
        let Some(out) = self.tool_output("lsmem", &["-b"]).await else {
            return MemoryInfo::default();
        };
        match parse_lsmem_total_bytes(&out.stdout) {
            Ok(total_bytes) => MemoryInfo { total_bytes },
            Err(err) => {
                tracing::warn!(error = %err, "memory parse failed");
                MemoryInfo::default()
            }
        }
    }

    async fn os(&self) -> OsInfo {
        let uname = |flag: &'static str| async move {
            self.tool_output("uname", &[flag])
                .await
                .map(|out| out.stdout.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(not_available)
        };
        OsInfo {
            kernel: uname("-r").await,
            release: self.os_release_field("PRETTY_NAME"),
            version: uname("-v").await,
        }
    }

    fn os_release_field(&self, key: &str) -> String {
        let Ok(contents) = self.fs.read_to_string(Path::new("/etc/os-release")) else {
            return not_available();
        };
        contents
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once('=')?;
                (name == key).then(|| value.trim_matches('"').to_string())
            })
            .unwrap_or_else(not_available)
    }

    async fn bios(&self) -> BiosInfo {
        match self.tool_output("dmidecode", &["-t", "bios"]).await {
            Some(out) => parse_dmidecode_bios(&out.stdout),
            None => BiosInfo {
                vendor: not_available(),
                version: not_available(),
                release_date: not_available(),
            },
        }
    }

    async fn bmc(&self) -> Option<BmcInfo> {
        let lan = self.tool_output("ipmitool", &["lan", "print", "1"]).await?;
        let address = parse_ipmitool_lan_address(&lan.stdout)?;
        let firmware_version = match self.tool_output("ipmitool", &["mc", "info"]).await {
            Some(out) => parse_ipmitool_firmware_revision(&out.stdout).unwrap_or_else(not_available),
            None => not_available(),
        };
        Some(BmcInfo {
            address,
            firmware_version,
        })
    }

    async fn tool_output(&self, program: &str, args: &[&str]) -> Option<CommandOutput> {
        let spec = CommandSpec::new(program).args(args.iter().copied());
        match self.executor.run(&spec).await {
            Ok(output) if output.success() => Some(output),
            Ok(output) => {
                tracing::debug!(
                    command = %spec,
                    exit_code = output.exit_code,
                    stderr = %output.trimmed_stderr(),
                    "collector tool failed"
                );
                None
            }
            Err(err) => {
                tracing::debug!(command = %spec, error = %err, "collector tool not invocable");
                None
            }
        }
    }
}

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

//! Hardware discovery: typed inventory records and the collectors that
//! fill them from standard host tooling (`lsblk`, `lsusb`, `lscpu`,
//! `lsmem`, `lspci`, `dmidecode`, `ipmitool`, `ip addr`) and sysfs.
//! Parsers are pure functions from captured tool output to records so
//! they can be tested against fixture text.

pub mod collect;
pub mod network;
pub mod parse;

use serde::{Deserialize, Serialize};

/// Reserved marker for string fields a collector could not populate.
/// Consumers rely on this constant rather than empty strings.
pub const NOT_AVAILABLE: &str = "Not Available";

pub fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub name: String,
    pub size_bytes: u64,
    pub model: String,
    pub serial: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuInfo {
    pub pci_address: String,
    pub vendor: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IpConfigMode {
    Static,
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpAddressInfo {
    pub ip: String,
    pub prefix_bits: u8,
    pub config_mode: IpConfigMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SriovInfo {
    pub num_vfs: u32,
    pub total_vfs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NicInfo {
    pub name: String,
    /// Empty when the interface does not sit on the PCI bus.
    pub pci_id: String,
    pub mac: String,
    pub mtu: u32,
    pub addresses: Vec<IpAddressInfo>,
    /// True when one of the interface addresses is the BMC address.
    pub is_bmc: bool,
    pub sriov: Option<SriovInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDeviceInfo {
    pub bus: u32,
    pub device: u32,
    pub vendor_id: String,
    pub product_id: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreGroup {
    pub core_type: String,
    pub core_list: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSocket {
    pub socket_id: u32,
    pub core_groups: Vec<CoreGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    pub model: String,
    pub sockets: Vec<CpuSocket>,
    pub total_cores: u32,
    pub total_threads: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    pub kernel: String,
    pub release: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiosInfo {
    pub vendor: String,
    pub version: String,
    pub release_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmcInfo {
    pub address: String,
    pub firmware_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareInventory {
    pub system_product_name: String,
    pub disks: Vec<DiskInfo>,
    pub gpus: Vec<GpuInfo>,
    pub nics: Vec<NicInfo>,
    pub usb_devices: Vec<UsbDeviceInfo>,
    pub cpu: Option<CpuInfo>,
    pub memory: MemoryInfo,
    pub os: OsInfo,
    pub bios: BiosInfo,
    pub bmc: Option<BmcInfo>,
}

#[derive(thiserror::Error, Debug)]
pub enum InventoryError {
    #[error("Failed to enumerate {what}: {source}")]
    Enumeration {
        what: &'static str,
        source: std::io::Error,
    },
    #[error("Unrecognized {tool} output: {detail}")]
    Parse { tool: &'static str, detail: String },
    #[error("Failed to run {tool}: {source}")]
    ToolInvocation {
        tool: &'static str,
        source: std::io::Error,
    },
}

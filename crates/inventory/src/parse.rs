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

//! Pure parsers from external tool output to typed records.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::{
    BiosInfo, CoreGroup, CpuInfo, CpuSocket, DiskInfo, GpuInfo, InventoryError, IpAddressInfo,
    IpConfigMode, UsbDeviceInfo, not_available,
};

/// Result of parsing `ip addr show <iface>` for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAddrShow {
    pub mtu: u32,
    pub addresses: Vec<IpAddressInfo>,
}

/// Extract the MTU and every `inet` block from `ip addr show <iface>`.
pub fn parse_ip_addr_show(output: &str) -> Result<IpAddrShow, InventoryError> {
    let mut mtu = None;
    let mut addresses = Vec::new();

    for line in output.lines() {
        let trimmed = line.trim();
        if mtu.is_none()
            && let Some(rest) = trimmed.split("mtu ").nth(1)
        {
            let value = rest.split_whitespace().next().unwrap_or_default();
            mtu = Some(value.parse::<u32>().map_err(|_| InventoryError::Parse {
                tool: "ip addr",
                detail: format!("bad mtu segment {value:?}"),
            })?);
        }

        if let Some(rest) = trimmed.strip_prefix("inet ") {
            let cidr = rest.split_whitespace().next().unwrap_or_default();
            let (ip, prefix) = cidr.split_once('/').ok_or_else(|| InventoryError::Parse {
                tool: "ip addr",
                detail: format!("inet block without prefix: {cidr:?}"),
            })?;
            let prefix_bits = prefix.parse::<u8>().map_err(|_| InventoryError::Parse {
                tool: "ip addr",
                detail: format!("bad prefix in {cidr:?}"),
            })?;
            let config_mode = if trimmed.split_whitespace().any(|word| word == "dynamic") {
                IpConfigMode::Dynamic
            } else {
                IpConfigMode::Static
            };
            addresses.push(IpAddressInfo {
                ip: ip.to_string(),
                prefix_bits,
                config_mode,
            });
        }
    }

    let mtu = mtu.ok_or_else(|| InventoryError::Parse {
        tool: "ip addr",
        detail: "no mtu segment found".to_string(),
    })?;
    Ok(IpAddrShow { mtu, addresses })
}

/// Split one `lsblk -P` line (`KEY="value" KEY="value" ...`) into a map.
fn parse_pairs_line(line: &str) -> BTreeMap<String, String> {
    static PAIR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r#"(\w+)="([^"]*)""#).expect("static regex"));
    PAIR.captures_iter(line)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

/// Parse `lsblk -b -d -P -o NAME,SIZE,MODEL,SERIAL,TYPE`, keeping only
/// whole disks.
pub fn parse_lsblk_disks(output: &str) -> Vec<DiskInfo> {
    let mut disks = Vec::new();
    for line in output.lines() {
        let pairs = parse_pairs_line(line);
        if pairs.get("TYPE").map(String::as_str) != Some("disk") {
            continue;
        }
        let Some(name) = pairs.get("NAME") else {
            continue;
        };
        let size_bytes = pairs
            .get("SIZE")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0);
        let field = |key: &str| {
            pairs
                .get(key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().to_string())
                .unwrap_or_else(not_available)
        };
        disks.push(DiskInfo {
            name: name.clone(),
            size_bytes,
            model: field("MODEL"),
            serial: field("SERIAL"),
        });
    }
    disks
}

/// Parse `lsusb` listing lines.
pub fn parse_lsusb(output: &str) -> Vec<UsbDeviceInfo> {
    static LINE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^Bus (\d+) Device (\d+): ID ([0-9a-fA-F]{4}):([0-9a-fA-F]{4})\s*(.*)$")
            .expect("static regex")
    });
    output
        .lines()
        .filter_map(|line| {
            let cap = LINE.captures(line.trim())?;
            Some(UsbDeviceInfo {
                bus: cap[1].parse().ok()?,
                device: cap[2].parse().ok()?,
                vendor_id: cap[3].to_lowercase(),
                product_id: cap[4].to_lowercase(),
                description: if cap[5].trim().is_empty() {
                    not_available()
                } else {
                    cap[5].trim().to_string()
                },
            })
        })
        .collect()
}

fn lscpu_field<'a>(output: &'a str, key: &str) -> Option<&'a str> {
    output.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        (name.trim() == key).then(|| value.trim())
    })
}

/// Build the CPU topology from `lscpu` summary output plus the parsable
/// `lscpu -p=SOCKET,CORE` listing.
pub fn parse_lscpu(summary: &str, topology: &str) -> Result<CpuInfo, InventoryError> {
    let model = lscpu_field(summary, "Model name")
        .map(str::to_string)
        .unwrap_or_else(not_available);
    let total_threads = lscpu_field(summary, "CPU(s)")
        .and_then(|v| v.parse::<u32>().ok())
        .ok_or_else(|| InventoryError::Parse {
            tool: "lscpu",
            detail: "missing CPU(s) field".to_string(),
        })?;

    // socket id -> ordered distinct core ids
    let mut sockets: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for line in topology.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let mut fields = trimmed.split(',');
        let (Some(socket), Some(core)) = (fields.next(), fields.next()) else {
            continue;
        };
        let (Ok(socket), Ok(core)) = (socket.parse::<u32>(), core.parse::<u32>()) else {
            return Err(InventoryError::Parse {
                tool: "lscpu -p",
                detail: format!("bad topology line {trimmed:?}"),
            });
        };
        let cores = sockets.entry(socket).or_default();
        if !cores.contains(&core) {
            cores.push(core);
        }
    }

    let total_cores = sockets.values().map(|cores| cores.len() as u32).sum();
    let sockets = sockets
        .into_iter()
        .map(|(socket_id, core_list)| CpuSocket {
            socket_id,
            core_groups: vec![CoreGroup {
                core_type: "Core".to_string(),
                core_list,
            }],
        })
        .collect();

    Ok(CpuInfo {
        model,
        sockets,
        total_cores,
        total_threads,
    })
}

/// Parse `lsmem -b` for the total online memory in bytes.
pub fn parse_lsmem_total_bytes(output: &str) -> Result<u64, InventoryError> {
    for line in output.lines() {
        if let Some(value) = line.trim().strip_prefix("Total online memory:") {
            return value
                .trim()
                .parse::<u64>()
                .map_err(|_| InventoryError::Parse {
                    tool: "lsmem",
                    detail: format!("bad total {value:?}"),
                });
        }
    }
    Err(InventoryError::Parse {
        tool: "lsmem",
        detail: "no total online memory line".to_string(),
    })
}

fn dmidecode_field(output: &str, key: &str) -> String {
    output
        .lines()
        .find_map(|line| {
            let (name, value) = line.trim().split_once(':')?;
            (name.trim() == key).then(|| value.trim().to_string())
        })
        .filter(|v| !v.is_empty())
        .unwrap_or_else(not_available)
}

/// Parse `dmidecode -t bios`.
pub fn parse_dmidecode_bios(output: &str) -> BiosInfo {
    BiosInfo {
        vendor: dmidecode_field(output, "Vendor"),
        version: dmidecode_field(output, "Version"),
        release_date: dmidecode_field(output, "Release Date"),
    }
}

/// Extract the BMC LAN address from `ipmitool lan print 1`. The key is
/// exactly "IP Address"; "IP Address Source" must not match.
pub fn parse_ipmitool_lan_address(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "IP Address").then(|| value.trim().to_string())
    })
}

/// Extract the firmware revision from `ipmitool mc info`.
pub fn parse_ipmitool_firmware_revision(output: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        (key.trim() == "Firmware Revision").then(|| value.trim().to_string())
    })
}

/// Pull display-class devices out of a plain `lspci` listing.
pub fn parse_lspci_gpus(output: &str) -> Vec<GpuInfo> {
    output
        .lines()
        .filter_map(|line| {
            let (address, rest) = line.split_once(' ')?;
            let (class, description) = rest.split_once(": ")?;
            if !(class.starts_with("VGA compatible controller")
                || class.starts_with("3D controller")
                || class.starts_with("Display controller"))
            {
                return None;
            }
            let vendor = description
                .split_whitespace()
                .next()
                .map(str::to_string)
                .unwrap_or_else(not_available);
            Some(GpuInfo {
                pci_address: address.to_string(),
                vendor,
                description: description.to_string(),
            })
        })
        .collect()
}

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

//! NIC enumeration over sysfs plus `ip addr` / `ipmitool` output.
//!
//! A failure on an individual interface logs a warning and skips that
//! interface; only an unreadable network directory fails the enumeration
//! as a whole.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use basalt_utils::{CommandSpec, Executor, FileSystem};

use crate::parse::{parse_ip_addr_show, parse_ipmitool_lan_address};
use crate::{InventoryError, NicInfo, SriovInfo};

const SYSFS_NET: &str = "/sys/class/net";

pub struct NetworkEnumerator {
    fs: Arc<dyn FileSystem>,
    executor: Arc<dyn Executor>,
    sysfs_net: PathBuf,
}

impl NetworkEnumerator {
    pub fn new(fs: Arc<dyn FileSystem>, executor: Arc<dyn Executor>) -> Self {
        Self {
            fs,
            executor,
            sysfs_net: PathBuf::from(SYSFS_NET),
        }
    }

    pub async fn enumerate(&self) -> Result<Vec<NicInfo>, InventoryError> {
        let names =
            self.fs
                .read_dir_names(&self.sysfs_net)
                .map_err(|source| InventoryError::Enumeration {
                    what: "network interfaces",
                    source,
                })?;

        let bmc_address = self.bmc_address().await;

        let mut nics = Vec::new();
        for name in names {
            // The loopback and the bonding pseudo-entry are never NICs.
            if name == "lo" || name == "bonding_masters" {
                continue;
            }
            match self.collect_interface(&name, bmc_address.as_deref()).await {
                Ok(Some(nic)) => nics.push(nic),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(interface = %name, error = %err, "skipping interface");
                }
            }
        }
        Ok(nics)
    }

    async fn bmc_address(&self) -> Option<String> {
        let spec = CommandSpec::new("ipmitool").args(["lan", "print", "1"]);
        let output = match self.executor.run(&spec).await {
            Ok(output) if output.success() => output,
            Ok(output) => {
                tracing::debug!(stderr = %output.trimmed_stderr(), "ipmitool lan print failed");
                return None;
            }
            Err(err) => {
                tracing::debug!(error = %err, "ipmitool not invocable");
                return None;
            }
        };
        parse_ipmitool_lan_address(&output.stdout)
    }

    /// Returns `Ok(None)` for virtual interfaces.
    async fn collect_interface(
        &self,
        name: &str,
        bmc_address: Option<&str>,
    ) -> Result<Option<NicInfo>, InventoryError> {
        let iface_path = self.sysfs_net.join(name);

        if let Ok(resolved) = self.fs.canonicalize(&iface_path)
            && resolved
                .to_string_lossy()
                .contains("/devices/virtual/net/")
        {
            return Ok(None);
        }

        let mac = self
            .fs
            .read_to_string(&iface_path.join("address"))
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let spec = CommandSpec::new("ip").args(["addr", "show", name]);
        let output =
            self.executor
                .run(&spec)
                .await
                .map_err(|source| InventoryError::ToolInvocation {
                    tool: "ip addr",
                    source,
                })?;
        if !output.success() {
            return Err(InventoryError::Parse {
                tool: "ip addr",
                detail: output.trimmed_stderr().to_string(),
            });
        }
        let parsed = parse_ip_addr_show(&output.stdout)?;

        let is_bmc = bmc_address
            .map(|addr| parsed.addresses.iter().any(|a| a.ip == addr))
            .unwrap_or(false);

        Ok(Some(NicInfo {
            name: name.to_string(),
            pci_id: self.pci_id(&iface_path),
            mac,
            mtu: parsed.mtu,
            addresses: parsed.addresses,
            is_bmc,
            sriov: self.sriov(&iface_path),
        }))
    }

    /// Walk `net/<iface> -> device -> subsystem`; anything not on the PCI
    /// bus gets an empty PCI id.
    fn pci_id(&self, iface_path: &Path) -> String {
        match self.fs.canonicalize(&iface_path.join("device/subsystem")) {
            Ok(target) if target.ends_with("bus/pci") => {}
            _ => return String::new(),
        }
        self.fs
            .canonicalize(&iface_path.join("device"))
            .ok()
            .and_then(|device| {
                device
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_default()
    }

    /// SR-IOV is enabled iff `sriov_numvfs` exists under the device node.
    fn sriov(&self, iface_path: &Path) -> Option<SriovInfo> {
        let numvfs_path = iface_path.join("device/sriov_numvfs");
        if !self.fs.exists(&numvfs_path) {
            return None;
        }
        let read_u32 = |path: &Path| {
            self.fs
                .read_to_string(path)
                .ok()
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0)
        };
        Some(SriovInfo {
            num_vfs: read_u32(&numvfs_path),
            total_vfs: read_u32(&iface_path.join("device/sriov_totalvfs")),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use basalt_utils::{CommandOutput, MockExecutor, MockFileSystem};

    use super::*;
    use crate::IpConfigMode;

    const IP_ADDR_ETH0: &str = "\
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc mq state UP
    link/ether aa:bb:cc:dd:ee:ff brd ff:ff:ff:ff:ff:ff
    inet 10.1.2.3/24 brd 10.1.2.255 scope global dynamic eth0
";

    fn executor_fixture() -> MockExecutor {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            let output = if spec.program == "ipmitool" {
                CommandOutput {
                    exit_code: 0,
                    stdout: "IP Address Source : DHCP Address\nIP Address : 10.1.2.3\n".to_string(),
                    stderr: String::new(),
                }
            } else if spec.program == "ip" {
                CommandOutput {
                    exit_code: 0,
                    stdout: IP_ADDR_ETH0.to_string(),
                    stderr: String::new(),
                }
            } else {
                panic!("unexpected command {spec}");
            };
            Ok(output)
        });
        executor
    }

    fn fs_fixture() -> MockFileSystem {
        let mut fs = MockFileSystem::new();
        fs.expect_read_dir_names().returning(|_| {
            Ok(vec![
                "bonding_masters".to_string(),
                "eth0".to_string(),
                "lo".to_string(),
                "veth1".to_string(),
            ])
        });
        fs.expect_canonicalize().returning(|path| {
            let path = path.to_string_lossy();
            match path.as_ref() {
                "/sys/class/net/eth0" => {
                    Ok(PathBuf::from("/sys/devices/pci0000:00/0000:00:1f.6/net/eth0"))
                }
                "/sys/class/net/veth1" => Ok(PathBuf::from("/sys/devices/virtual/net/veth1")),
                "/sys/class/net/eth0/device/subsystem" => Ok(PathBuf::from("/sys/bus/pci")),
                "/sys/class/net/eth0/device" => {
                    Ok(PathBuf::from("/sys/devices/pci0000:00/0000:00:1f.6"))
                }
                other => Err(io::Error::new(io::ErrorKind::NotFound, other.to_string())),
            }
        });
        fs.expect_read_to_string().returning(|path| {
            if path.ends_with("address") {
                Ok("aa:bb:cc:dd:ee:ff\n".to_string())
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
            }
        });
        fs.expect_exists().returning(|_| false);
        fs
    }

    #[tokio::test]
    async fn enumerates_physical_interfaces_only() {
        let enumerator =
            NetworkEnumerator::new(Arc::new(fs_fixture()), Arc::new(executor_fixture()));
        let nics = enumerator.enumerate().await.unwrap();

        assert_eq!(nics.len(), 1);
        let nic = &nics[0];
        assert_eq!(nic.name, "eth0");
        assert_eq!(nic.pci_id, "0000:00:1f.6");
        assert_eq!(nic.mac, "aa:bb:cc:dd:ee:ff");
        assert_eq!(nic.mtu, 1500);
        assert_eq!(nic.addresses.len(), 1);
        assert_eq!(nic.addresses[0].config_mode, IpConfigMode::Dynamic);
        assert!(nic.is_bmc, "address matches the BMC LAN address");
        assert!(nic.sriov.is_none());
    }

    #[tokio::test]
    async fn unreadable_directory_is_fatal() {
        let mut fs = MockFileSystem::new();
        fs.expect_read_dir_names()
            .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        let enumerator = NetworkEnumerator::new(Arc::new(fs), Arc::new(MockExecutor::new()));
        assert!(enumerator.enumerate().await.is_err());
    }
}

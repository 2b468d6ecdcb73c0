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

//! SOTA on mutable distros: estimate through an apt dry run, check free
//! space on `/`, then execute the mode-specific command plan. Every
//! command failure (non-zero exit or any stderr output) aborts the update
//! with the tool's stderr as the user-visible detail.

use std::path::Path;
use std::sync::Arc;
use std::sync::LazyLock;
use std::time::Duration;

use basalt_rpc::basalt::DownloadMode;
use basalt_rpc::granular::UpdatePhase;
use basalt_utils::{CommandSpec, Executor, FileSystem};
use regex::Regex;

use crate::error::{DispatcherError, DispatcherResult};
use crate::granular::GranularLogStore;
use crate::power::PowerControl;
use crate::state::{DispatcherState, RESTART_REASON_SOTA, StateStore};

const TOOL_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";
const NO_UPDATE_MARKER: &str = "0 upgraded, 0 newly installed, 0 to remove";
const REBOOT_DELAY: Duration = Duration::from_secs(2);

static SIZE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:,\d+)*(\.\d+)?)\s*(kB|B|MB|GB).*(freed|used)").expect("static regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEstimate {
    pub update_available: bool,
    pub required_bytes: u64,
}

/// Parse the dry-run upgrade output into an availability + size estimate.
pub fn parse_upgrade_estimate(output: &str) -> DispatcherResult<SizeEstimate> {
    if output.contains(NO_UPDATE_MARKER) {
        return Ok(SizeEstimate {
            update_available: false,
            required_bytes: 0,
        });
    }

    for line in output.lines() {
        if !line.starts_with("After this operation, ") {
            continue;
        }
        let Some(captures) = SIZE_LINE.captures(line) else {
            continue;
        };
        let required_bytes = match &captures[4] {
            // Space is released, nothing extra is needed.
            "freed" => 0,
            _ => size_to_bytes(&captures[1], &captures[3])?,
        };
        return Ok(SizeEstimate {
            update_available: true,
            required_bytes,
        });
    }

    Err(DispatcherError::CommandFailed {
        command: "apt-get upgrade (dry run)".to_string(),
        stderr: "no output / unrecognized".to_string(),
    })
}

/// apt prints SI units, so kB/MB/GB are powers of 1000.
fn size_to_bytes(number: &str, unit: &str) -> DispatcherResult<u64> {
    let number: f64 = number
        .replace(',', "")
        .parse()
        .map_err(|_| DispatcherError::BadRequest(format!("unparseable size {number:?}")))?;
    let factor: f64 = match unit {
        "B" => 1.0,
        "kB" => 1_000.0,
        "MB" => 1_000_000.0,
        "GB" => 1_000_000_000.0,
        other => {
            return Err(DispatcherError::BadRequest(format!(
                "unknown size unit {other:?}"
            )));
        }
    };
    Ok((number * factor).round() as u64)
}

fn tool(program: &str) -> CommandSpec {
    CommandSpec::new(program)
        .env("DEBIAN_FRONTEND", "noninteractive")
        .env("PATH", TOOL_PATH)
}

fn dpkg_configure() -> CommandSpec {
    tool("dpkg").args(["--configure", "-a", "--force-confdef", "--force-confold"])
}

fn apt(args: &[&str]) -> CommandSpec {
    tool("apt-get")
        .args([
            "-yq",
            "-o",
            "Dpkg::Options::=--force-confdef",
            "-o",
            "Dpkg::Options::=--force-confold",
        ])
        .args(args.iter().copied())
}

fn apt_update() -> CommandSpec {
    apt(&["update"])
}

fn upgrade_or_install(packages: &[String], extra: &[&str]) -> CommandSpec {
    let mut spec = apt(extra);
    if packages.is_empty() {
        spec = spec.args(["--with-new-pkgs", "upgrade"]);
    } else {
        spec = spec.arg("install").args(packages.iter().cloned());
    }
    spec
}

/// The ordered command plan for one update mode.
pub fn command_plan(mode: DownloadMode, packages: &[String]) -> Vec<CommandSpec> {
    match mode {
        DownloadMode::NoDownload => vec![
            dpkg_configure(),
            apt(&["-f", "install"]),
            upgrade_or_install(packages, &[]),
        ],
        DownloadMode::DownloadOnly => vec![
            dpkg_configure(),
            apt_update(),
            upgrade_or_install(packages, &["--download-only"]),
        ],
        // FULL and the unspecified default behave identically.
        _ => vec![
            apt_update(),
            apt(&["-f", "install"]),
            dpkg_configure(),
            upgrade_or_install(packages, &[]),
        ],
    }
}

pub struct AptUpdater {
    executor: Arc<dyn Executor>,
    fs: Arc<dyn FileSystem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub rebooting: bool,
    pub detail: String,
}

impl AptUpdater {
    pub fn new(executor: Arc<dyn Executor>, fs: Arc<dyn FileSystem>) -> Self {
        Self { executor, fs }
    }

    pub async fn update(
        &self,
        mode: DownloadMode,
        packages: &[String],
        do_not_reboot: bool,
        granular: &GranularLogStore,
        state: &StateStore,
        power: &PowerControl,
    ) -> DispatcherResult<UpdateOutcome> {
        let estimate = self.estimate(packages).await?;
        if !estimate.update_available {
            granular.record(UpdatePhase::Updated, "no updates available");
            return Ok(UpdateOutcome {
                rebooting: false,
                detail: "no updates available".to_string(),
            });
        }

        let available = self.fs.free_space_bytes(Path::new("/"))?;
        if available < estimate.required_bytes {
            return Err(DispatcherError::InsufficientDiskSpace {
                needed: estimate.required_bytes,
                available,
            });
        }

        for spec in command_plan(mode, packages) {
            self.exec_checked(&spec).await?;
        }

        if mode == DownloadMode::DownloadOnly {
            granular.record(UpdatePhase::Downloaded, "packages downloaded");
            return Ok(UpdateOutcome {
                rebooting: false,
                detail: "packages downloaded".to_string(),
            });
        }

        granular.record(UpdatePhase::Updated, "system packages updated");
        if do_not_reboot {
            return Ok(UpdateOutcome {
                rebooting: false,
                detail: "system packages updated".to_string(),
            });
        }

        state.save(&DispatcherState {
            restart_reason: RESTART_REASON_SOTA.to_string(),
            ..Default::default()
        })?;
        tokio::time::sleep(REBOOT_DELAY).await;
        if let Err(err) = power.reboot().await {
            granular.record(UpdatePhase::Failed, format!("reboot failed: {err}"));
            state.clear();
            return Err(err);
        }
        Ok(UpdateOutcome {
            rebooting: true,
            detail: "system packages updated, rebooting".to_string(),
        })
    }

    async fn estimate(&self, packages: &[String]) -> DispatcherResult<SizeEstimate> {
        let mut spec = tool("apt-get").arg("--simulate");
        if packages.is_empty() {
            spec = spec.args(["--with-new-pkgs", "upgrade"]);
        } else {
            spec = spec.arg("install").args(packages.iter().cloned());
        }
        let output = self.executor.run(&spec).await?;
        if !output.success() {
            return Err(DispatcherError::CommandFailed {
                command: spec.to_string(),
                stderr: output.trimmed_stderr().to_string(),
            });
        }
        parse_upgrade_estimate(&output.stdout)
    }

    async fn exec_checked(&self, spec: &CommandSpec) -> DispatcherResult<()> {
        let output = self.executor.run(spec).await?;
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
    use basalt_utils::{CommandOutput, MockExecutor, MockFileSystem, RealFileSystem, SystemClock};

    use super::*;

    const UPGRADE_OUTPUT: &str = "\
Reading package lists...
The following packages will be upgraded:
  libssl3 openssl
2 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.
After this operation, 2,611 kB of additional disk space will be used.
";

    #[test]
    fn no_update_marker_yields_unavailable() {
        let output = "0 upgraded, 0 newly installed, 0 to remove and 0 not upgraded.\n";
        let estimate = parse_upgrade_estimate(output).unwrap();
        assert_eq!(
            estimate,
            SizeEstimate {
                update_available: false,
                required_bytes: 0,
            }
        );
    }

    #[test]
    fn used_size_is_converted_with_si_units() {
        let estimate = parse_upgrade_estimate(UPGRADE_OUTPUT).unwrap();
        assert!(estimate.update_available);
        assert_eq!(estimate.required_bytes, 2_611_000);
    }

    #[test]
    fn freed_size_requires_no_space() {
        let output = "After this operation, 48.5 MB disk space will be freed.\n";
        let estimate = parse_upgrade_estimate(output).unwrap();
        assert!(estimate.update_available);
        assert_eq!(estimate.required_bytes, 0);
    }

    #[test]
    fn fractional_gigabytes() {
        let output = "After this operation, 1.5 GB of additional disk space will be used.\n";
        assert_eq!(
            parse_upgrade_estimate(output).unwrap().required_bytes,
            1_500_000_000
        );
    }

    #[test]
    fn unrecognized_output_fails() {
        let err = parse_upgrade_estimate("something unexpected\n").unwrap_err();
        assert!(err.to_string().contains("no output / unrecognized"));
    }

    #[test]
    fn full_plan_updates_before_upgrading() {
        let plan = command_plan(DownloadMode::Full, &[]);
        assert_eq!(plan.len(), 4);
        assert!(plan[0].args.contains(&"update".to_string()));
        assert!(plan[3].to_string().contains("--with-new-pkgs upgrade"));
        for spec in &plan {
            if spec.program == "apt-get" {
                assert!(
                    spec.args.contains(&"Dpkg::Options::=--force-confold".to_string()),
                    "{spec} must carry dpkg conf options"
                );
            }
            assert!(
                spec.envs
                    .contains(&("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string()))
            );
        }
    }

    #[test]
    fn no_download_plan_skips_apt_update() {
        let plan = command_plan(DownloadMode::NoDownload, &[]);
        assert!(plan.iter().all(|s| !s.args.contains(&"update".to_string())));
    }

    #[test]
    fn package_list_switches_to_install() {
        let packages = vec!["basalt-agent".to_string()];
        let plan = command_plan(DownloadMode::Full, &packages);
        let last = plan.last().unwrap().to_string();
        assert!(last.contains("install basalt-agent"));
        assert!(!last.contains("upgrade"));
    }

    #[test]
    fn download_only_plan_carries_the_flag() {
        let plan = command_plan(DownloadMode::DownloadOnly, &[]);
        assert!(plan.iter().any(|s| s.args.contains(&"--download-only".to_string())));
    }

    fn stores(dir: &Path) -> (GranularLogStore, StateStore) {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        (
            GranularLogStore::new(fs.clone(), Arc::new(SystemClock), dir.join("granular.log")),
            StateStore::new(fs, dir.join("state.json")),
        )
    }

    fn ok_output(stdout: &str) -> CommandOutput {
        CommandOutput {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    #[tokio::test]
    async fn happy_update_records_updated_without_reboot() {
        let dir = tempfile::tempdir().unwrap();
        let (granular, state) = stores(dir.path());

        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            Ok(if spec.args.contains(&"--simulate".to_string()) {
                ok_output(UPGRADE_OUTPUT)
            } else {
                ok_output("")
            })
        });
        let executor: Arc<dyn Executor> = Arc::new(executor);

        let mut fs = MockFileSystem::new();
        fs.expect_free_space_bytes().returning(|_| Ok(u64::MAX));

        let updater = AptUpdater::new(executor.clone(), Arc::new(fs));
        let outcome = updater
            .update(
                DownloadMode::Full,
                &[],
                true,
                &granular,
                &state,
                &PowerControl::new(executor),
            )
            .await
            .unwrap();

        assert!(!outcome.rebooting);
        assert_eq!(granular.read().unwrap().status, UpdatePhase::Updated);
        assert!(state.load().is_none(), "no reboot, no state file");
    }

    #[tokio::test]
    async fn stderr_output_aborts_even_on_exit_zero() {
        let dir = tempfile::tempdir().unwrap();
        let (granular, state) = stores(dir.path());

        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            Ok(if spec.args.contains(&"--simulate".to_string()) {
                ok_output(UPGRADE_OUTPUT)
            } else {
                CommandOutput {
                    exit_code: 0,
                    stdout: String::new(),
                    stderr: "E: dpkg was interrupted".to_string(),
                }
            })
        });
        let executor: Arc<dyn Executor> = Arc::new(executor);

        let mut fs = MockFileSystem::new();
        fs.expect_free_space_bytes().returning(|_| Ok(u64::MAX));

        let updater = AptUpdater::new(executor.clone(), Arc::new(fs));
        let err = updater
            .update(
                DownloadMode::Full,
                &[],
                true,
                &granular,
                &state,
                &PowerControl::new(executor),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("dpkg was interrupted"));
    }

    #[tokio::test]
    async fn insufficient_disk_space_is_a_client_error() {
        let dir = tempfile::tempdir().unwrap();
        let (granular, state) = stores(dir.path());

        let mut executor = MockExecutor::new();
        executor
            .expect_run()
            .returning(|_| Ok(ok_output(UPGRADE_OUTPUT)));
        let executor: Arc<dyn Executor> = Arc::new(executor);

        let mut fs = MockFileSystem::new();
        fs.expect_free_space_bytes().returning(|_| Ok(1_000));

        let updater = AptUpdater::new(executor.clone(), Arc::new(fs));
        let err = updater
            .update(
                DownloadMode::Full,
                &[],
                true,
                &granular,
                &state,
                &PowerControl::new(executor),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }
}

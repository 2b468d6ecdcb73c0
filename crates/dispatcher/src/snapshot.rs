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

//! Pre-update filesystem snapshots through the snapshot tool. Snapshot id
//! 0 is the reserved "no snapshot" value: undo and delete treat it as a
//! no-op.

use std::path::Path;
use std::sync::Arc;

use basalt_utils::{CommandSpec, Executor, FileSystem};

use crate::error::{DispatcherError, DispatcherResult};

pub const SNAPSHOT_CONFIG_NAME: &str = "rootConfig";
pub const SNAPSHOT_DESCRIPTION: &str = "sota_update";

/// statfs magic of btrfs, the only snapshot-capable root we drive.
pub const BTRFS_MAGIC: i64 = 0x9123_683E;

pub struct Snapshotter {
    executor: Arc<dyn Executor>,
    fs: Arc<dyn FileSystem>,
    tool: String,
    proceed_with_rollback: bool,
}

impl Snapshotter {
    pub fn new(
        executor: Arc<dyn Executor>,
        fs: Arc<dyn FileSystem>,
        tool: String,
        proceed_with_rollback: bool,
    ) -> Self {
        Self {
            executor,
            fs,
            tool,
            proceed_with_rollback,
        }
    }

    fn tool_cmd(&self, args: &[&str]) -> CommandSpec {
        CommandSpec::new(&self.tool)
            .args(["-c", SNAPSHOT_CONFIG_NAME])
            .args(args.iter().copied())
    }

    /// Create the pre-update snapshot. Returns `None` when the root
    /// filesystem cannot be snapshotted and policy allows proceeding
    /// without rollback.
    pub async fn create(&self) -> DispatcherResult<Option<u64>> {
        let magic = self.fs.filesystem_magic(Path::new("/"))?;
        if magic != BTRFS_MAGIC {
            if self.proceed_with_rollback {
                tracing::warn!(
                    magic = format!("{magic:#x}"),
                    "root filesystem does not support snapshots, proceeding without rollback"
                );
                return Ok(None);
            }
            return Err(DispatcherError::Snapshot(
                "root filesystem does not support snapshots and policy forbids proceeding"
                    .to_string(),
            ));
        }

        self.probe_tool().await?;
        self.ensure_config().await?;

        let spec = self.tool_cmd(&[
            "create",
            "--description",
            SNAPSHOT_DESCRIPTION,
            "--print-number",
        ]);
        let output = self.executor.run(&spec).await?;
        if !output.success() {
            return Err(DispatcherError::Snapshot(format!(
                "snapshot creation failed: {}",
                output.trimmed_stderr()
            )));
        }
        if !output.trimmed_stderr().is_empty() {
            tracing::warn!(stderr = %output.trimmed_stderr(), "snapshot tool warning");
        }
        let id: u64 = output.stdout.trim().parse().map_err(|_| {
            DispatcherError::Snapshot(format!(
                "snapshot tool printed {:?}, expected a snapshot number",
                output.stdout.trim()
            ))
        })?;
        Ok(Some(id))
    }

    /// `undochange N..0`; `N = 0` is a no-op.
    pub async fn undo_change(&self, snapshot: u64) -> DispatcherResult<()> {
        if snapshot == 0 {
            return Ok(());
        }
        let range = format!("{snapshot}..0");
        self.run_fatal(self.tool_cmd(&["undochange", &range])).await
    }

    /// Delete snapshot `N`; `N = 0` is a no-op.
    pub async fn delete_snapshot(&self, snapshot: u64) -> DispatcherResult<()> {
        if snapshot == 0 {
            return Ok(());
        }
        let number = snapshot.to_string();
        self.run_fatal(self.tool_cmd(&["delete", &number])).await
    }

    async fn probe_tool(&self) -> DispatcherResult<()> {
        let spec = CommandSpec::new(&self.tool).arg("--version");
        match self.executor.run(&spec).await {
            Ok(output) if output.success() => Ok(()),
            Ok(_) | Err(_) => Err(DispatcherError::Snapshot(format!(
                "snapshot tool {} is not installed",
                self.tool
            ))),
        }
    }

    async fn ensure_config(&self) -> DispatcherResult<()> {
        let probe = self.tool_cmd(&["get-config"]);
        if let Ok(output) = self.executor.run(&probe).await
            && output.success()
        {
            return Ok(());
        }
        self.run_fatal(self.tool_cmd(&["create-config", "/"])).await
    }

    async fn run_fatal(&self, spec: CommandSpec) -> DispatcherResult<()> {
        let output = self.executor.run(&spec).await?;
        if !output.success() || !output.trimmed_stderr().is_empty() {
            let stderr = if output.trimmed_stderr().is_empty() {
                format!("exit code {}", output.exit_code)
            } else {
                output.trimmed_stderr().to_string()
            };
            return Err(DispatcherError::Snapshot(format!(
                "`{spec}` failed: {stderr}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::{CommandOutput, MockExecutor, MockFileSystem};

    use super::*;

    fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    fn btrfs_fs() -> Arc<dyn FileSystem> {
        let mut fs = MockFileSystem::new();
        fs.expect_filesystem_magic().returning(|_| Ok(BTRFS_MAGIC));
        Arc::new(fs)
    }

    fn snapshotter(executor: MockExecutor, fs: Arc<dyn FileSystem>, proceed: bool) -> Snapshotter {
        Snapshotter::new(Arc::new(executor), fs, "snapper".to_string(), proceed)
    }

    #[tokio::test]
    async fn create_parses_snapshot_number() {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            Ok(if spec.args.contains(&"create".to_string()) {
                ok("42\n")
            } else {
                ok("")
            })
        });
        let snapshotter = snapshotter(executor, btrfs_fs(), true);
        assert_eq!(snapshotter.create().await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn create_warns_but_succeeds_on_stderr_with_exit_zero() {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            Ok(if spec.args.contains(&"create".to_string()) {
                CommandOutput {
                    exit_code: 0,
                    stdout: "7\n".to_string(),
                    stderr: "quota support not enabled\n".to_string(),
                }
            } else {
                ok("")
            })
        });
        let snapshotter = snapshotter(executor, btrfs_fs(), true);
        assert_eq!(snapshotter.create().await.unwrap(), Some(7));
    }

    #[tokio::test]
    async fn non_numeric_snapshot_id_is_an_error() {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            Ok(if spec.args.contains(&"create".to_string()) {
                ok("not-a-number\n")
            } else {
                ok("")
            })
        });
        let snapshotter = snapshotter(executor, btrfs_fs(), true);
        assert!(snapshotter.create().await.is_err());
    }

    #[tokio::test]
    async fn non_btrfs_root_skips_when_policy_allows() {
        let mut fs = MockFileSystem::new();
        fs.expect_filesystem_magic().returning(|_| Ok(0x0000_ef53)); // ext4
        let snapshotter = snapshotter(MockExecutor::new(), Arc::new(fs), true);
        assert_eq!(snapshotter.create().await.unwrap(), None);
    }

    #[tokio::test]
    async fn non_btrfs_root_is_fatal_when_policy_forbids() {
        let mut fs = MockFileSystem::new();
        fs.expect_filesystem_magic().returning(|_| Ok(0x0000_ef53));
        let snapshotter = snapshotter(MockExecutor::new(), Arc::new(fs), false);
        assert!(snapshotter.create().await.is_err());
    }

    #[tokio::test]
    async fn missing_tool_fails_creation() {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            if spec.args.contains(&"--version".to_string()) {
                Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no such file",
                ))
            } else {
                Ok(ok(""))
            }
        });
        let snapshotter = snapshotter(executor, btrfs_fs(), true);
        let err = snapshotter.create().await.unwrap_err();
        assert!(err.to_string().contains("not installed"));
    }

    #[tokio::test]
    async fn zero_is_a_noop_for_undo_and_delete() {
        // No executor expectations: any invocation would panic.
        let snapshotter = snapshotter(MockExecutor::new(), btrfs_fs(), true);
        snapshotter.undo_change(0).await.unwrap();
        snapshotter.delete_snapshot(0).await.unwrap();
    }

    #[tokio::test]
    async fn undo_uses_the_range_syntax() {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            assert!(spec.args.contains(&"undochange".to_string()));
            assert!(spec.args.contains(&"9..0".to_string()));
            Ok(ok(""))
        });
        let snapshotter = snapshotter(executor, btrfs_fs(), true);
        snapshotter.undo_change(9).await.unwrap();
    }

    #[tokio::test]
    async fn undo_fails_on_stderr_even_with_exit_zero() {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|_| {
            Ok(CommandOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: "IO error (.snapshots is not a btrfs subvolume)".to_string(),
            })
        });
        let snapshotter = snapshotter(executor, btrfs_fs(), true);
        let err = snapshotter.undo_change(3).await.unwrap_err();
        assert!(err.to_string().contains("not a btrfs subvolume"));
    }
}

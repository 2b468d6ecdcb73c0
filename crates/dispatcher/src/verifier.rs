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

//! Post-reboot verification, run at dispatcher startup after the socket
//! is bound but before serving. Classifies the outcome of an update that
//! spanned the reboot, commits or rolls back the pre-update snapshot, and
//! always clears the state file on the way out.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use basalt_rpc::granular::UpdatePhase;
use basalt_utils::{FileSystem, NetworkProbe};

use crate::config::DistroKind;
use crate::granular::GranularLogStore;
use crate::power::PowerControl;
use crate::snapshot::Snapshotter;
use crate::state::{DispatcherState, RESTART_REASON_SOTA, StateStore};

pub struct PostRebootVerifier {
    pub fs: Arc<dyn FileSystem>,
    pub network: Arc<dyn NetworkProbe>,
    pub state: StateStore,
    pub granular: GranularLogStore,
    pub snapshotter: Snapshotter,
    pub power: PowerControl,
    pub distro: DistroKind,
    pub image_sha_file: PathBuf,
    pub retries: u32,
    pub read_interval: Duration,
}

impl PostRebootVerifier {
    pub async fn run(&self) {
        // Absent or unparseable both mean no update was in progress.
        let Some(state) = self.state.load() else {
            return;
        };
        if state.restart_reason != RESTART_REASON_SOTA {
            self.state.clear();
            return;
        }

        tracing::info!(
            snapshot = state.snapshot_number,
            "classifying update outcome after reboot"
        );

        if self.distro == DistroKind::Immutable {
            self.verify_running_image(&state);
        }

        let terminal = self.poll_terminal_status().await;

        if self.distro == DistroKind::Immutable {
            if !self.network.check_connectivity().await {
                self.granular.record(
                    UpdatePhase::Failed,
                    "no network connectivity after update, rolling back",
                );
                self.rollback_and_reboot(&state).await;
                return;
            }
            match terminal {
                UpdatePhase::Updated => {
                    // Commit: the pre-update snapshot is no longer needed.
                    if let Err(err) = self.snapshotter.delete_snapshot(state.snapshot_number).await
                    {
                        tracing::warn!(error = %err, "could not delete committed snapshot");
                    }
                }
                _ => {
                    self.rollback_and_reboot(&state).await;
                    return;
                }
            }
        }

        self.state.clear();
    }

    /// Compare the digest of the running image against the desired
    /// profile and persist the verdict to the granular log.
    fn verify_running_image(&self, state: &DispatcherState) {
        let Some(desired) = state
            .desired_profile
            .as_ref()
            .filter(|profile| !profile.os_image_sha.is_empty())
        else {
            return;
        };
        match self.fs.read_to_string(&self.image_sha_file) {
            Ok(actual) => {
                let actual = actual.trim();
                if actual.eq_ignore_ascii_case(&desired.os_image_sha) {
                    self.granular.record(
                        UpdatePhase::Updated,
                        "running image matches the desired profile",
                    );
                } else {
                    self.granular.record(
                        UpdatePhase::Failed,
                        format!(
                            "running image {actual} differs from desired {}",
                            desired.os_image_sha
                        ),
                    );
                }
            }
            Err(err) => {
                self.granular.record(
                    UpdatePhase::Failed,
                    format!("cannot determine running image: {err}"),
                );
            }
        }
    }

    /// Poll the granular log for a terminal status, treating an exhausted
    /// budget as FAILED.
    async fn poll_terminal_status(&self) -> UpdatePhase {
        for attempt in 0..self.retries {
            if let Some(log) = self.granular.read()
                && log.status.is_terminal()
            {
                return log.status;
            }
            if attempt + 1 < self.retries {
                tokio::time::sleep(self.read_interval).await;
            }
        }
        tracing::warn!("update never reached a terminal status, treating as failed");
        self.granular.record(
            UpdatePhase::Failed,
            "update did not reach a terminal state after reboot",
        );
        UpdatePhase::Failed
    }

    async fn rollback_and_reboot(&self, state: &DispatcherState) {
        if let Err(err) = self.snapshotter.undo_change(state.snapshot_number).await {
            tracing::error!(error = %err, "rollback failed");
        }
        if let Err(err) = self.snapshotter.delete_snapshot(state.snapshot_number).await {
            tracing::error!(error = %err, "snapshot cleanup failed");
        }
        self.state.clear();
        if let Err(err) = self.power.reboot().await {
            tracing::error!(error = %err, "reboot into rolled-back image failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use basalt_rpc::granular::UpdatePhase;
    use basalt_utils::{
        CommandOutput, CommandSpec, Executor, MockFileSystem, MockNetworkProbe, RealFileSystem,
        SystemClock,
    };

    use super::*;
    use crate::snapshot::BTRFS_MAGIC;
    use crate::state::ProfileRecord;

    /// Records every command for later assertions and reports success.
    #[derive(Default)]
    struct RecordingExecutor {
        commands: Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl Executor for RecordingExecutor {
        async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
            self.commands.lock().unwrap().push(spec.to_string());
            Ok(CommandOutput::default())
        }
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        verifier: PostRebootVerifier,
        executor: Arc<RecordingExecutor>,
        state: StateStore,
        granular: GranularLogStore,
    }

    fn fixture(distro: DistroKind, network_up: bool, image_sha: &str) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let executor = Arc::new(RecordingExecutor::default());
        let state = StateStore::new(fs.clone(), dir.path().join("state.json"));
        let granular = GranularLogStore::new(
            fs.clone(),
            Arc::new(SystemClock),
            dir.path().join("granular.log"),
        );

        let image_sha_file = dir.path().join("image.sha");
        std::fs::write(&image_sha_file, format!("{image_sha}\n")).unwrap();

        let mut network = MockNetworkProbe::new();
        network
            .expect_check_connectivity()
            .returning(move || network_up);

        let mut snapshot_fs = MockFileSystem::new();
        snapshot_fs
            .expect_filesystem_magic()
            .returning(|_| Ok(BTRFS_MAGIC));

        let verifier = PostRebootVerifier {
            fs,
            network: Arc::new(network),
            state: state.clone(),
            granular: granular.clone(),
            snapshotter: Snapshotter::new(
                executor.clone(),
                Arc::new(snapshot_fs),
                "snapper".to_string(),
                true,
            ),
            power: PowerControl::new(executor.clone()),
            distro,
            image_sha_file,
            retries: 2,
            read_interval: Duration::from_millis(1),
        };

        Fixture {
            _dir: dir,
            verifier,
            executor,
            state,
            granular,
        }
    }

    fn sota_state(snapshot: u64, desired_sha: &str) -> DispatcherState {
        DispatcherState {
            restart_reason: RESTART_REASON_SOTA.to_string(),
            snapshot_number: snapshot,
            desired_profile: Some(ProfileRecord {
                os_image_url: "https://images.example.com/edge.img".to_string(),
                os_image_sha: desired_sha.to_string(),
            }),
            actual_profile: None,
            ts_last_update_start: None,
        }
    }

    #[tokio::test]
    async fn no_state_file_is_a_noop() {
        let fixture = fixture(DistroKind::Immutable, true, "abc");
        fixture.verifier.run().await;
        assert!(fixture.executor.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn matching_image_commits_and_deletes_the_snapshot() {
        let fixture = fixture(DistroKind::Immutable, true, "abc123");
        fixture.state.save(&sota_state(4, "abc123")).unwrap();

        fixture.verifier.run().await;

        assert_eq!(fixture.granular.read().unwrap().status, UpdatePhase::Updated);
        assert!(fixture.state.load().is_none(), "state file cleared");
        let commands = fixture.executor.commands.lock().unwrap();
        assert!(
            commands.iter().any(|c| c.contains("delete 4")),
            "snapshot must be deleted on commit: {commands:?}"
        );
        assert!(
            !commands.iter().any(|c| c.contains("undochange")),
            "no rollback on success"
        );
    }

    #[tokio::test]
    async fn lost_network_rolls_back_and_reboots() {
        let fixture = fixture(DistroKind::Immutable, false, "abc123");
        fixture.state.save(&sota_state(9, "abc123")).unwrap();

        fixture.verifier.run().await;

        let log = fixture.granular.read().unwrap();
        assert_eq!(log.status, UpdatePhase::Failed);
        assert!(log.detail.contains("network"));
        let commands = fixture.executor.commands.lock().unwrap();
        assert!(commands.iter().any(|c| c.contains("undochange 9..0")));
        assert!(commands.iter().any(|c| c.contains("delete 9")));
        assert!(commands.iter().any(|c| c.contains("reboot")));
        assert!(fixture.state.load().is_none());
    }

    #[tokio::test]
    async fn image_mismatch_rolls_back() {
        let fixture = fixture(DistroKind::Immutable, true, "actual-sha");
        fixture.state.save(&sota_state(2, "desired-sha")).unwrap();

        fixture.verifier.run().await;

        let commands = fixture.executor.commands.lock().unwrap();
        assert!(commands.iter().any(|c| c.contains("undochange 2..0")));
    }

    #[tokio::test]
    async fn mutable_distro_only_clears_state() {
        let fixture = fixture(DistroKind::Mutable, true, "ignored");
        fixture
            .state
            .save(&DispatcherState {
                restart_reason: RESTART_REASON_SOTA.to_string(),
                ..Default::default()
            })
            .unwrap();
        fixture.granular.record(UpdatePhase::Updated, "packages updated");

        fixture.verifier.run().await;

        assert!(fixture.state.load().is_none());
        assert!(fixture.executor.commands.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn stuck_nonterminal_log_becomes_failed() {
        let fixture = fixture(DistroKind::Mutable, true, "ignored");
        fixture
            .state
            .save(&DispatcherState {
                restart_reason: RESTART_REASON_SOTA.to_string(),
                ..Default::default()
            })
            .unwrap();
        fixture.granular.record(UpdatePhase::Started, "in flight");

        fixture.verifier.run().await;

        assert_eq!(fixture.granular.read().unwrap().status, UpdatePhase::Failed);
    }
}

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

//! SOTA on immutable distros: pre-update snapshot, image download with
//! digest verification, image swap through the install tool, state-file
//! persistence and reboot. A swap failure rolls the snapshot back before
//! surfacing.

use std::path::PathBuf;
use std::sync::Arc;

use basalt_rpc::basalt::{DownloadMode, HashAlgorithm};
use basalt_rpc::granular::UpdatePhase;
use basalt_utils::{Clock, CommandSpec, Executor, FileSystem};

use crate::apt::UpdateOutcome;
use crate::download::{ArtifactFetcher, check_trusted, validate_url, verify_signature};
use crate::error::{DispatcherError, DispatcherResult};
use crate::granular::GranularLogStore;
use crate::power::PowerControl;
use crate::snapshot::Snapshotter;
use crate::state::{DispatcherState, ProfileRecord, RESTART_REASON_SOTA, StateStore};

pub struct ImageUpdateRequest<'a> {
    pub mode: DownloadMode,
    pub url: Option<&'a str>,
    /// Expected sha256 of the image, hex-encoded.
    pub image_sha: Option<&'a str>,
    pub do_not_reboot: bool,
}

pub struct OsImageUpdater {
    executor: Arc<dyn Executor>,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    fetcher: ArtifactFetcher,
    image_update_tool: String,
    trusted_repositories: Vec<String>,
}

impl OsImageUpdater {
    pub fn new(
        executor: Arc<dyn Executor>,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        download_dir: PathBuf,
        image_update_tool: String,
        trusted_repositories: Vec<String>,
    ) -> Self {
        let fetcher = ArtifactFetcher::new(fs.clone(), download_dir);
        Self {
            executor,
            fs,
            clock,
            fetcher,
            image_update_tool,
            trusted_repositories,
        }
    }

    pub async fn update(
        &self,
        request: ImageUpdateRequest<'_>,
        granular: &GranularLogStore,
        state: &StateStore,
        power: &PowerControl,
        snapshotter: &Snapshotter,
    ) -> DispatcherResult<UpdateOutcome> {
        let raw_url = request
            .url
            .ok_or_else(|| DispatcherError::BadRequest("image URL required".to_string()))?;
        let url = validate_url(raw_url)?;
        check_trusted(&url, &self.trusted_repositories)?;

        if request.mode == DownloadMode::DownloadOnly {
            granular.record(UpdatePhase::Downloading, format!("downloading {url}"));
            let path = self.fetch_verified(&url, request.image_sha).await?;
            granular.record(
                UpdatePhase::Downloaded,
                format!("image staged at {}", path.display()),
            );
            return Ok(UpdateOutcome {
                rebooting: false,
                detail: "image downloaded".to_string(),
            });
        }

        // Snapshot before touching the image so a failed swap can be
        // undone.
        let snapshot = snapshotter.create().await?.unwrap_or(0);
        // A state file from an earlier staged update is superseded only
        // once this attempt is confirmed able to proceed.
        state.clear();

        let image_path = if request.mode == DownloadMode::NoDownload {
            let path = self.fetcher.local_path(&url)?;
            if !self.fs.exists(&path) {
                return Err(DispatcherError::BadRequest(format!(
                    "image {} has not been downloaded",
                    path.display()
                )));
            }
            self.verify_local(&path, request.image_sha)?;
            path
        } else {
            granular.record(UpdatePhase::Downloading, format!("downloading {url}"));
            let path = self.fetch_verified(&url, request.image_sha).await?;
            granular.record(
                UpdatePhase::Downloaded,
                format!("image staged at {}", path.display()),
            );
            path
        };

        if let Err(err) = self.swap(&image_path).await {
            granular.record(UpdatePhase::RollingBack, err.to_string());
            if let Err(undo_err) = snapshotter.undo_change(snapshot).await {
                tracing::error!(error = %undo_err, "rollback after failed swap also failed");
            }
            if let Err(delete_err) = snapshotter.delete_snapshot(snapshot).await {
                tracing::error!(error = %delete_err, "snapshot cleanup after rollback failed");
            }
            granular.record(UpdatePhase::Failed, err.to_string());
            return Err(err);
        }

        state.save(&DispatcherState {
            restart_reason: RESTART_REASON_SOTA.to_string(),
            snapshot_number: snapshot,
            desired_profile: Some(ProfileRecord {
                os_image_url: url.to_string(),
                os_image_sha: request.image_sha.unwrap_or_default().to_string(),
            }),
            actual_profile: None,
            ts_last_update_start: Some(self.clock.now_utc()),
        })?;

        if request.do_not_reboot {
            return Ok(UpdateOutcome {
                rebooting: false,
                detail: "image staged, reboot required".to_string(),
            });
        }
        if let Err(err) = power.reboot().await {
            granular.record(UpdatePhase::Failed, format!("reboot failed: {err}"));
            state.clear();
            return Err(err);
        }
        Ok(UpdateOutcome {
            rebooting: true,
            detail: "image applied, rebooting".to_string(),
        })
    }

    async fn fetch_verified(
        &self,
        url: &url::Url,
        image_sha: Option<&str>,
    ) -> DispatcherResult<PathBuf> {
        let path = self.fetcher.fetch(url).await?;
        self.verify_local(&path, image_sha)?;
        Ok(path)
    }

    fn verify_local(&self, path: &std::path::Path, image_sha: Option<&str>) -> DispatcherResult<()> {
        let Some(expected) = image_sha.filter(|sha| !sha.is_empty()) else {
            return Ok(());
        };
        let contents = self.fetcher.read(path)?;
        verify_signature(HashAlgorithm::Sha256, &contents, expected).map_err(|_| {
            DispatcherError::Download(format!(
                "image {} does not match the expected digest",
                path.display()
            ))
        })
    }

    async fn swap(&self, image_path: &std::path::Path) -> DispatcherResult<()> {
        let spec = CommandSpec::new(&self.image_update_tool)
            .arg("apply")
            .arg(image_path.to_string_lossy().into_owned());
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
    use basalt_rpc::granular::UpdatePhase;
    use basalt_utils::{
        CommandOutput, MockExecutor, RealFileSystem, SystemClock,
    };
    use sha2::{Digest, Sha256};

    use super::*;
    use crate::snapshot::BTRFS_MAGIC;

    struct Fixture {
        dir: tempfile::TempDir,
        granular: GranularLogStore,
        state: StateStore,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let granular = GranularLogStore::new(
            fs.clone(),
            Arc::new(SystemClock),
            dir.path().join("granular.log"),
        );
        let state = StateStore::new(fs, dir.path().join("state.json"));
        Fixture {
            dir,
            granular,
            state,
        }
    }

    fn updater(executor: Arc<dyn Executor>, download_dir: PathBuf) -> OsImageUpdater {
        OsImageUpdater::new(
            executor,
            Arc::new(RealFileSystem),
            Arc::new(SystemClock),
            download_dir,
            "os-update-tool".to_string(),
            vec!["https://images.example.com/".to_string()],
        )
    }

    fn btrfs_snapshotter(executor: Arc<dyn Executor>) -> Snapshotter {
        let mut fs = basalt_utils::MockFileSystem::new();
        fs.expect_filesystem_magic().returning(|_| Ok(BTRFS_MAGIC));
        Snapshotter::new(executor, Arc::new(fs), "snapper".to_string(), true)
    }

    fn tool_executor() -> MockExecutor {
        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            Ok(if spec.args.contains(&"create".to_string()) {
                CommandOutput {
                    exit_code: 0,
                    stdout: "3\n".to_string(),
                    stderr: String::new(),
                }
            } else {
                CommandOutput::default()
            })
        });
        executor
    }

    #[tokio::test]
    async fn no_download_applies_a_previously_staged_image() {
        let fixture = fixture();
        let download_dir = fixture.dir.path().join("downloads");
        std::fs::create_dir_all(&download_dir).unwrap();
        let image = b"image-bytes".to_vec();
        std::fs::write(download_dir.join("edge-2.img"), &image).unwrap();
        let sha = hex::encode(Sha256::digest(&image));

        let executor: Arc<dyn Executor> = Arc::new(tool_executor());
        let updater = updater(executor.clone(), download_dir);
        let outcome = updater
            .update(
                ImageUpdateRequest {
                    mode: DownloadMode::NoDownload,
                    url: Some("https://images.example.com/edge-2.img"),
                    image_sha: Some(&sha),
                    do_not_reboot: true,
                },
                &fixture.granular,
                &fixture.state,
                &PowerControl::new(executor.clone()),
                &btrfs_snapshotter(executor),
            )
            .await
            .unwrap();

        assert!(!outcome.rebooting);
        let state = fixture.state.load().unwrap();
        assert_eq!(state.restart_reason, "sota");
        assert_eq!(state.snapshot_number, 3);
        assert_eq!(state.desired_profile.unwrap().os_image_sha, sha);
    }

    #[tokio::test]
    async fn digest_mismatch_refuses_to_swap() {
        let fixture = fixture();
        let download_dir = fixture.dir.path().join("downloads");
        std::fs::create_dir_all(&download_dir).unwrap();
        std::fs::write(download_dir.join("edge-2.img"), b"tampered").unwrap();

        let executor: Arc<dyn Executor> = Arc::new(tool_executor());
        let updater = updater(executor.clone(), download_dir);
        let err = updater
            .update(
                ImageUpdateRequest {
                    mode: DownloadMode::NoDownload,
                    url: Some("https://images.example.com/edge-2.img"),
                    image_sha: Some("deadbeef"),
                    do_not_reboot: true,
                },
                &fixture.granular,
                &fixture.state,
                &PowerControl::new(executor.clone()),
                &btrfs_snapshotter(executor),
            )
            .await
            .unwrap_err();
        assert!(err.to_string().contains("digest"));
    }

    #[tokio::test]
    async fn untrusted_image_url_is_rejected_before_any_work() {
        let fixture = fixture();
        let executor: Arc<dyn Executor> = Arc::new(MockExecutor::new());
        let updater = updater(executor.clone(), fixture.dir.path().join("downloads"));
        let err = updater
            .update(
                ImageUpdateRequest {
                    mode: DownloadMode::Full,
                    url: Some("https://evil.example.com/edge-2.img"),
                    image_sha: None,
                    do_not_reboot: true,
                },
                &fixture.granular,
                &fixture.state,
                &PowerControl::new(executor.clone()),
                &btrfs_snapshotter(executor),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn failed_swap_rolls_back_the_snapshot() {
        let fixture = fixture();
        let download_dir = fixture.dir.path().join("downloads");
        std::fs::create_dir_all(&download_dir).unwrap();
        std::fs::write(download_dir.join("edge-2.img"), b"image").unwrap();

        let mut executor = MockExecutor::new();
        executor.expect_run().returning(|spec| {
            Ok(if spec.args.contains(&"create".to_string()) {
                CommandOutput {
                    exit_code: 0,
                    stdout: "5\n".to_string(),
                    stderr: String::new(),
                }
            } else if spec.args.contains(&"apply".to_string()) {
                CommandOutput {
                    exit_code: 1,
                    stdout: String::new(),
                    stderr: "image verity check failed".to_string(),
                }
            } else {
                CommandOutput::default()
            })
        });
        let executor: Arc<dyn Executor> = Arc::new(executor);

        let updater = updater(executor.clone(), download_dir);
        let err = updater
            .update(
                ImageUpdateRequest {
                    mode: DownloadMode::NoDownload,
                    url: Some("https://images.example.com/edge-2.img"),
                    image_sha: None,
                    do_not_reboot: true,
                },
                &fixture.granular,
                &fixture.state,
                &PowerControl::new(executor.clone()),
                &btrfs_snapshotter(executor),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("verity"));
        assert_eq!(
            fixture.granular.read().unwrap().status,
            UpdatePhase::Failed
        );
        assert!(fixture.state.load().is_none());
    }
}

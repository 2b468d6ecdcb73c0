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

//! Startup reclassification. When the previous run left an update in
//! flight, the dispatcher's granular log tells us how it ended: record
//! the final status, promote the actual profile on success, and pin the
//! one-shot window shut when we are still inside it.

use std::sync::Arc;
use std::time::Duration;

use basalt_rpc::granular::{GranularLog, UpdatePhase};
use basalt_utils::{Clock, FileSystem};

use crate::config::{AgentConfig, DistroKind};
use crate::metadata::{MetadataStore, UpdateInProgress, UpdateStatusKind};

const LOG_READ_RETRIES: u32 = 10;
const LOG_READ_INTERVAL: Duration = Duration::from_secs(2);

pub struct Reclassifier {
    pub config: Arc<AgentConfig>,
    pub metadata: MetadataStore,
    pub fs: Arc<dyn FileSystem>,
    pub clock: Arc<dyn Clock>,
}

impl Reclassifier {
    pub async fn run(&self) {
        let metadata = self.metadata.load();
        match metadata.update_in_progress {
            UpdateInProgress::None => {}
            UpdateInProgress::Self_ => {
                // The agent is running again, so its own installation
                // completed.
                let _ = self.metadata.mutate(|m| {
                    m.update_status = UpdateStatusKind::Updated;
                    m.update_log = "agent restarted after self-update".to_string();
                    m.update_in_progress = UpdateInProgress::None;
                });
            }
            UpdateInProgress::Os => self.classify_os_update().await,
        }
    }

    async fn classify_os_update(&self) {
        let outcome = self.poll_granular_log().await;
        let now = self.clock.now_utc();

        let _ = self.metadata.mutate(|m| {
            match &outcome {
                Some(log) if log.status == UpdatePhase::Updated => {
                    m.update_status = UpdateStatusKind::Updated;
                    m.update_log = log.detail.clone();
                    // The installed image is now the desired one.
                    if self.config.os_type == DistroKind::Immutable {
                        m.os_profile_update_source_actual =
                            m.os_profile_update_source_desired.clone();
                    }
                }
                Some(log) => {
                    m.update_status = UpdateStatusKind::Failed;
                    m.update_log = log.detail.clone();
                }
                None => {
                    m.update_status = UpdateStatusKind::Failed;
                    m.update_log =
                        "update did not reach a terminal state after restart".to_string();
                }
            }

            // A retry inside the same window must not re-fire.
            if let Some(single) = m.single_schedule
                && single.to_rpc().contains(now)
            {
                m.single_schedule_finished = true;
            }

            m.update_in_progress = UpdateInProgress::None;
        });
    }

    /// Wait for the dispatcher's log to reach a terminal status; `None`
    /// after the budget is exhausted.
    async fn poll_granular_log(&self) -> Option<GranularLog> {
        for attempt in 0..LOG_READ_RETRIES {
            if let Ok(contents) = self.fs.read_to_string(&self.config.granular_log_file)
                && let Ok(log) = GranularLog::parse(&contents)
                && log.status.is_terminal()
            {
                return Some(log);
            }
            if attempt + 1 < LOG_READ_RETRIES {
                tokio::time::sleep(LOG_READ_INTERVAL).await;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::{MockClock, RealFileSystem};
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::metadata::{AgentMetadata, ProfileRecord, SingleScheduleRecord};

    fn write_log(dir: &std::path::Path, status: UpdatePhase, detail: &str) {
        let log = GranularLog {
            status,
            detail: detail.to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };
        std::fs::write(dir.join("granular.log"), log.to_json().unwrap()).unwrap();
    }

    fn reclassifier(dir: &std::path::Path, now_secs: i64, os_type: DistroKind) -> Reclassifier {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let mut clock = MockClock::new();
        clock
            .expect_now_utc()
            .returning(move || Utc.timestamp_opt(now_secs, 0).unwrap());
        Reclassifier {
            config: Arc::new(AgentConfig {
                os_type,
                granular_log_file: dir.join("granular.log"),
                metadata_file: dir.join("metadata.json"),
                ..Default::default()
            }),
            metadata: MetadataStore::new(fs.clone(), dir.join("metadata.json")),
            fs,
            clock: Arc::new(clock),
        }
    }

    #[tokio::test]
    async fn successful_update_promotes_the_actual_profile() {
        let dir = tempfile::tempdir().unwrap();
        let reclassifier = reclassifier(dir.path(), 1_500, DistroKind::Immutable);
        write_log(dir.path(), UpdatePhase::Updated, "image committed");

        let desired = ProfileRecord {
            profile_name: "edge".to_string(),
            os_image_sha: "abc".to_string(),
            ..Default::default()
        };
        let mut seed = AgentMetadata {
            update_status: UpdateStatusKind::Started,
            os_profile_update_source_desired: Some(desired.clone()),
            single_schedule: Some(SingleScheduleRecord {
                start_seconds: 1_000,
                end_seconds: 2_000,
            }),
            ..Default::default()
        };
        seed.set_in_progress(UpdateInProgress::Os).unwrap();
        reclassifier.metadata.save(&seed).unwrap();

        reclassifier.run().await;

        let result = reclassifier.metadata.load();
        assert_eq!(result.update_status, UpdateStatusKind::Updated);
        assert_eq!(result.os_profile_update_source_actual, Some(desired));
        assert_eq!(result.update_in_progress, UpdateInProgress::None);
        assert!(
            result.single_schedule_finished,
            "still inside the window, must not re-fire"
        );
    }

    #[tokio::test]
    async fn failed_update_keeps_the_detail() {
        let dir = tempfile::tempdir().unwrap();
        let reclassifier = reclassifier(dir.path(), 5_000, DistroKind::Immutable);
        write_log(dir.path(), UpdatePhase::Failed, "no network connectivity after update");

        let mut seed = AgentMetadata::default();
        seed.set_in_progress(UpdateInProgress::Os).unwrap();
        reclassifier.metadata.save(&seed).unwrap();

        reclassifier.run().await;

        let result = reclassifier.metadata.load();
        assert_eq!(result.update_status, UpdateStatusKind::Failed);
        assert!(result.update_log.contains("network"));
        assert!(result.os_profile_update_source_actual.is_none());
        assert!(!result.single_schedule_finished, "outside any window");
    }

    #[tokio::test]
    async fn self_update_is_marked_complete_by_running_again() {
        let dir = tempfile::tempdir().unwrap();
        let reclassifier = reclassifier(dir.path(), 0, DistroKind::Mutable);

        let mut seed = AgentMetadata::default();
        seed.set_in_progress(UpdateInProgress::Self_).unwrap();
        reclassifier.metadata.save(&seed).unwrap();

        reclassifier.run().await;

        let result = reclassifier.metadata.load();
        assert_eq!(result.update_status, UpdateStatusKind::Updated);
        assert_eq!(result.update_in_progress, UpdateInProgress::None);
    }

    #[tokio::test]
    async fn idle_metadata_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let reclassifier = reclassifier(dir.path(), 0, DistroKind::Mutable);
        let seed = AgentMetadata {
            update_status: UpdateStatusKind::UpToDate,
            ..Default::default()
        };
        reclassifier.metadata.save(&seed).unwrap();

        reclassifier.run().await;

        assert_eq!(reclassifier.metadata.load(), seed);
    }
}

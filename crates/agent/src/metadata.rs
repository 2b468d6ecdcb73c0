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

//! The agent's persisted metadata. One writer (this process), atomic
//! replacement on every save, defaults with a warning on a torn or
//! unparseable read.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;

use basalt_rpc::basalt::{
    OsProfileUpdateSource, RepeatedSchedule, SingleSchedule, StatusType, UpdateSource,
};
use basalt_utils::FileSystem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateStatusKind {
    #[default]
    Unspecified,
    UpToDate,
    Started,
    Updated,
    Failed,
    RollingBack,
    Downloading,
    Downloaded,
}

impl From<UpdateStatusKind> for StatusType {
    fn from(kind: UpdateStatusKind) -> Self {
        match kind {
            UpdateStatusKind::Unspecified => StatusType::Unspecified,
            UpdateStatusKind::UpToDate => StatusType::UpToDate,
            UpdateStatusKind::Started => StatusType::Started,
            UpdateStatusKind::Updated => StatusType::Updated,
            UpdateStatusKind::Failed => StatusType::Failed,
            UpdateStatusKind::RollingBack => StatusType::RollingBack,
            UpdateStatusKind::Downloading => StatusType::Downloading,
            UpdateStatusKind::Downloaded => StatusType::Downloaded,
        }
    }
}

/// What kind of update may currently span a restart: an OS update driven
/// through the dispatcher, or an installation of the agent's own
/// packages. At most one is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UpdateInProgress {
    #[default]
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "SELF")]
    Self_,
    #[serde(rename = "OS")]
    Os,
}

impl Display for UpdateInProgress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UpdateInProgress::None => "NONE",
            UpdateInProgress::Self_ => "SELF",
            UpdateInProgress::Os => "OS",
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum MetadataError {
    #[error("invalid update-in-progress transition {from} -> {to}")]
    InvalidTransition {
        from: UpdateInProgress,
        to: UpdateInProgress,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SingleScheduleRecord {
    pub start_seconds: i64,
    pub end_seconds: i64,
}

impl From<&SingleSchedule> for SingleScheduleRecord {
    fn from(schedule: &SingleSchedule) -> Self {
        Self {
            start_seconds: schedule.start_seconds,
            end_seconds: schedule.end_seconds,
        }
    }
}

impl SingleScheduleRecord {
    pub fn to_rpc(self) -> SingleSchedule {
        SingleSchedule {
            start_seconds: self.start_seconds,
            end_seconds: self.end_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepeatedScheduleRecord {
    pub duration_seconds: i64,
    pub cron_minutes: String,
    pub cron_hours: String,
    pub cron_day_month: String,
    pub cron_month: String,
    pub cron_day_week: String,
}

impl From<&RepeatedSchedule> for RepeatedScheduleRecord {
    fn from(schedule: &RepeatedSchedule) -> Self {
        Self {
            duration_seconds: schedule.duration_seconds,
            cron_minutes: schedule.cron_minutes.clone(),
            cron_hours: schedule.cron_hours.clone(),
            cron_day_month: schedule.cron_day_month.clone(),
            cron_month: schedule.cron_month.clone(),
            cron_day_week: schedule.cron_day_week.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub profile_name: String,
    pub profile_version: String,
    pub os_image_id: String,
    pub os_image_url: String,
    pub os_image_sha: String,
}

impl From<&OsProfileUpdateSource> for ProfileRecord {
    fn from(source: &OsProfileUpdateSource) -> Self {
        Self {
            profile_name: source.profile_name.clone(),
            profile_version: source.profile_version.clone(),
            os_image_id: source.os_image_id.clone(),
            os_image_url: source.os_image_url.clone(),
            os_image_sha: source.os_image_sha.clone(),
        }
    }
}

impl ProfileRecord {
    pub fn to_rpc(&self) -> OsProfileUpdateSource {
        OsProfileUpdateSource {
            profile_name: self.profile_name.clone(),
            profile_version: self.profile_version.clone(),
            os_image_id: self.os_image_id.clone(),
            os_image_url: self.os_image_url.clone(),
            os_image_sha: self.os_image_sha.clone(),
        }
    }
}

/// Image equality over persisted profiles, mirroring the wire-side rule:
/// only the digest participates.
pub fn profiles_equal(a: Option<&ProfileRecord>, b: Option<&ProfileRecord>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.os_image_sha == b.os_image_sha,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSourceRecord {
    pub kernel_command: String,
    pub os_repo_url: String,
    pub custom_repos: Vec<String>,
    pub updated_packages: Vec<String>,
}

impl From<&UpdateSource> for UpdateSourceRecord {
    fn from(source: &UpdateSource) -> Self {
        Self {
            kernel_command: source.kernel_command.clone(),
            os_repo_url: source.os_repo_url.clone(),
            custom_repos: source.custom_repos.clone(),
            updated_packages: source.updated_packages.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentMetadata {
    pub update_status: UpdateStatusKind,
    pub update_log: String,
    pub update_in_progress: UpdateInProgress,
    pub single_schedule: Option<SingleScheduleRecord>,
    pub repeated_schedules: Vec<RepeatedScheduleRecord>,
    pub single_schedule_finished: bool,
    pub os_profile_update_source_desired: Option<ProfileRecord>,
    pub os_profile_update_source_actual: Option<ProfileRecord>,
    pub os_profile_update_source_downloaded: Option<ProfileRecord>,
    pub installed_packages: Vec<String>,
    pub update_source: Option<UpdateSourceRecord>,
}

impl AgentMetadata {
    /// Enforces the sum-type rule: SELF and OS never coexist, and one
    /// cannot silently replace the other.
    pub fn set_in_progress(&mut self, next: UpdateInProgress) -> Result<(), MetadataError> {
        use UpdateInProgress::*;
        match (self.update_in_progress, next) {
            (from, to) if from == to => Ok(()),
            (None, _) | (_, None) => {
                self.update_in_progress = next;
                Ok(())
            }
            (from, to) => Err(MetadataError::InvalidTransition { from, to }),
        }
    }
}

#[derive(Clone)]
pub struct MetadataStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl MetadataStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    /// A torn or unparseable file degrades to defaults with a warning.
    pub fn load(&self) -> AgentMetadata {
        let contents = match self.fs.read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return AgentMetadata::default();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "metadata unreadable, resetting to defaults");
                return AgentMetadata::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "metadata unparseable, resetting to defaults");
                AgentMetadata::default()
            }
        }
    }

    pub fn save(&self, metadata: &AgentMetadata) -> std::io::Result<()> {
        let rendered = serde_json::to_vec_pretty(metadata)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        self.fs.write_atomic(&self.path, &rendered)
    }

    /// Load-modify-save helper; the closure's return value is passed
    /// through.
    pub fn mutate<R>(&self, mutate: impl FnOnce(&mut AgentMetadata) -> R) -> std::io::Result<R> {
        let mut metadata = self.load();
        let result = mutate(&mut metadata);
        self.save(&metadata)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::RealFileSystem;

    use super::*;

    fn store(dir: &std::path::Path) -> MetadataStore {
        MetadataStore::new(Arc::new(RealFileSystem), dir.join("metadata.json"))
    }

    #[test]
    fn roundtrip_preserves_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let mut metadata = AgentMetadata {
            update_status: UpdateStatusKind::Downloaded,
            update_log: "image staged".to_string(),
            single_schedule: Some(SingleScheduleRecord {
                start_seconds: 100,
                end_seconds: 200,
            }),
            single_schedule_finished: true,
            installed_packages: vec!["basalt-agent".to_string()],
            ..Default::default()
        };
        metadata.set_in_progress(UpdateInProgress::Os).unwrap();

        store.save(&metadata).unwrap();
        assert_eq!(store.load(), metadata);
    }

    #[test]
    fn unparseable_metadata_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("metadata.json"), "{\"updateStatus\": \"UP").unwrap();
        assert_eq!(store(dir.path()).load(), AgentMetadata::default());
    }

    #[test]
    fn self_and_os_updates_cannot_coexist() {
        let mut metadata = AgentMetadata::default();
        metadata.set_in_progress(UpdateInProgress::Self_).unwrap();
        let err = metadata.set_in_progress(UpdateInProgress::Os).unwrap_err();
        assert!(err.to_string().contains("SELF -> OS"));

        metadata.set_in_progress(UpdateInProgress::None).unwrap();
        metadata.set_in_progress(UpdateInProgress::Os).unwrap();
        assert_eq!(metadata.update_in_progress, UpdateInProgress::Os);
    }

    #[test]
    fn profile_equality_uses_the_digest_only() {
        let a = ProfileRecord {
            profile_name: "edge".to_string(),
            os_image_sha: "abc".to_string(),
            ..Default::default()
        };
        let mut b = a.clone();
        b.profile_name = "renamed".to_string();
        assert!(profiles_equal(Some(&a), Some(&b)));
        b.os_image_sha = "def".to_string();
        assert!(!profiles_equal(Some(&a), Some(&b)));
        assert!(profiles_equal(None, None));
        assert!(!profiles_equal(Some(&a), None));
    }

    #[test]
    fn status_kind_maps_onto_wire_status() {
        assert_eq!(
            StatusType::from(UpdateStatusKind::UpToDate),
            StatusType::UpToDate
        );
        assert_eq!(StatusType::from(UpdateStatusKind::Failed), StatusType::Failed);
    }
}

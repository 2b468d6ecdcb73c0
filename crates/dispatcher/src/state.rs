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

//! The dispatcher state file: written atomically before a reboot is
//! triggered, read by the post-reboot verifier, deleted afterwards. The
//! dispatcher is its only writer.

use std::path::PathBuf;
use std::sync::Arc;

use basalt_rpc::basalt::OsProfileUpdateSource;
use basalt_utils::FileSystem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RESTART_REASON_SOTA: &str = "sota";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default)]
    pub os_image_url: String,
    #[serde(default)]
    pub os_image_sha: String,
}

impl From<&OsProfileUpdateSource> for ProfileRecord {
    fn from(source: &OsProfileUpdateSource) -> Self {
        Self {
            os_image_url: source.os_image_url.clone(),
            os_image_sha: source.os_image_sha.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatcherState {
    /// `"sota"` when an update spans the next reboot, empty otherwise.
    #[serde(default)]
    pub restart_reason: String,
    /// Pre-update snapshot id; 0 when no snapshot was taken.
    #[serde(default)]
    pub snapshot_number: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_profile: Option<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_profile: Option<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts_last_update_start: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct StateStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl StateStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }

    /// `None` when the file is absent or unparseable: either way no update
    /// was in progress.
    pub fn load(&self) -> Option<DispatcherState> {
        let contents = match self.fs.read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "state file unreadable");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(state) => Some(state),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "state file unparseable, treating as no update in progress"
                );
                None
            }
        }
    }

    pub fn save(&self, state: &DispatcherState) -> std::io::Result<()> {
        let rendered = serde_json::to_vec_pretty(state)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        self.fs.write_atomic(&self.path, &rendered)
    }

    /// Best-effort removal.
    pub fn clear(&self) {
        match self.fs.remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to clear state file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::RealFileSystem;

    use super::*;

    fn store(dir: &std::path::Path) -> StateStore {
        StateStore::new(Arc::new(RealFileSystem), dir.join("state.json"))
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        let state = DispatcherState {
            restart_reason: RESTART_REASON_SOTA.to_string(),
            snapshot_number: 7,
            desired_profile: Some(ProfileRecord {
                os_image_url: "https://images.example.com/edge-2.img".to_string(),
                os_image_sha: "abc123".to_string(),
            }),
            actual_profile: None,
            ts_last_update_start: Some(DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()),
        };
        store.save(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn missing_file_means_no_update_in_progress() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store(dir.path()).load().is_none());
    }

    #[test]
    fn torn_read_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("state.json"), "{\"restartReason\": \"so").unwrap();
        assert!(store(dir.path()).load().is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save(&DispatcherState::default()).unwrap();
        store.clear();
        store.clear();
        assert!(store.load().is_none());
    }
}

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

//! Writer side of the granular log (the shared record type lives in
//! `basalt_rpc::granular`).

use std::path::PathBuf;
use std::sync::Arc;

use basalt_rpc::granular::{GranularLog, UpdatePhase};
use basalt_utils::{Clock, FileSystem};

#[derive(Clone)]
pub struct GranularLogStore {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    path: PathBuf,
}

impl GranularLogStore {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>, path: PathBuf) -> Self {
        Self { fs, clock, path }
    }

    pub fn record(&self, status: UpdatePhase, detail: impl Into<String>) {
        let log = GranularLog {
            status,
            detail: detail.into(),
            timestamp: self.clock.now_utc(),
        };
        let rendered = match log.to_json() {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::error!(error = %err, "failed to render granular log");
                return;
            }
        };
        if let Err(err) = self.fs.write_atomic(&self.path, rendered.as_bytes()) {
            tracing::error!(path = %self.path.display(), error = %err, "failed to persist granular log");
        }
    }

    pub fn read(&self) -> Option<GranularLog> {
        let contents = self.fs.read_to_string(&self.path).ok()?;
        match GranularLog::parse(&contents) {
            Ok(log) => Some(log),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "granular log unparseable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::{RealFileSystem, SystemClock};

    use super::*;

    #[test]
    fn record_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = GranularLogStore::new(
            Arc::new(RealFileSystem),
            Arc::new(SystemClock),
            dir.path().join("granular.log"),
        );

        store.record(UpdatePhase::Started, "apt-get update");
        let log = store.read().unwrap();
        assert_eq!(log.status, UpdatePhase::Started);
        assert_eq!(log.detail, "apt-get update");

        store.record(UpdatePhase::Updated, "");
        assert_eq!(store.read().unwrap().status, UpdatePhase::Updated);
    }
}

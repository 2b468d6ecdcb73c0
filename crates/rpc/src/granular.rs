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

//! The dispatcher's granular log: a single JSON record describing the most
//! recent update attempt. The dispatcher is its only writer; the update
//! agent reads it to classify an update outcome across a reboot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdatePhase {
    Started,
    Downloading,
    Downloaded,
    Updated,
    Failed,
    RollingBack,
}

impl UpdatePhase {
    /// Terminal phases end the classification poll after a reboot.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            UpdatePhase::Updated | UpdatePhase::Failed | UpdatePhase::RollingBack
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GranularLog {
    pub status: UpdatePhase,
    /// The most actionable message available, usually an external tool's
    /// stderr.
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

impl GranularLog {
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_phase_and_detail() {
        let log = GranularLog {
            status: UpdatePhase::RollingBack,
            detail: "snapper undochange 7..0".to_string(),
            timestamp: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap(),
        };
        let parsed = GranularLog::parse(&log.to_json().unwrap()).unwrap();
        assert_eq!(parsed, log);
    }

    #[test]
    fn terminal_phases() {
        assert!(UpdatePhase::Updated.is_terminal());
        assert!(UpdatePhase::Failed.is_terminal());
        assert!(UpdatePhase::RollingBack.is_terminal());
        assert!(!UpdatePhase::Started.is_terminal());
        assert!(!UpdatePhase::Downloading.is_terminal());
        assert!(!UpdatePhase::Downloaded.is_terminal());
    }
}

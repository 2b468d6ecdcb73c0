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

use chrono::{DateTime, Utc};

use crate::basalt::{OsProfileUpdateSource, SingleSchedule};

/// Image equality for "already installed" / "already downloaded"
/// decisions. Only the image digest participates; every other field is
/// metadata and may differ between otherwise identical images.
pub fn os_images_equal(
    a: Option<&OsProfileUpdateSource>,
    b: Option<&OsProfileUpdateSource>,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.os_image_sha == b.os_image_sha,
        _ => false,
    }
}

impl SingleSchedule {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.start_seconds, 0)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        if self.end_seconds == 0 {
            return None;
        }
        DateTime::<Utc>::from_timestamp(self.end_seconds, 0)
    }

    /// True while `now` lies inside the maintenance window. An end of 0 is
    /// open-ended.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let Some(start) = self.start_time() else {
            return false;
        };
        if now < start {
            return false;
        }
        match self.end_time() {
            Some(end) => now < end,
            None => true,
        }
    }
}

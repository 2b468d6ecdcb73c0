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

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;

#[automock]
#[async_trait]
pub trait NetworkProbe: Send + Sync {
    /// True when at least one probe target is reachable. Used after a
    /// reboot to decide whether an image update can be verified or must be
    /// rolled back.
    async fn check_connectivity(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct SystemNetworkProbe {
    probe_urls: Vec<String>,
    timeout: Duration,
}

impl SystemNetworkProbe {
    pub fn new(probe_urls: Vec<String>) -> Self {
        Self {
            probe_urls,
            timeout: Duration::from_secs(5),
        }
    }
}

#[async_trait]
impl NetworkProbe for SystemNetworkProbe {
    async fn check_connectivity(&self) -> bool {
        let client = match reqwest::Client::builder().timeout(self.timeout).build() {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(error = %err, "failed to build connectivity probe client");
                return false;
            }
        };

        for url in &self.probe_urls {
            match client.head(url).send().await {
                Ok(_) => return true,
                Err(err) => {
                    tracing::debug!(url = %url, error = %err, "connectivity probe failed");
                }
            }
        }
        false
    }
}

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

//! The status-report loop: periodically report the persisted update
//! status upward, validate the orchestrator's answer for this
//! distribution, and hand accepted responses to the schedule handler.
//! The hand-off channel is unbuffered; when the handler is busy the
//! response is dropped, a newer one will arrive.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;
use basalt_rpc::basalt::{
    PlatformUpdateStatusRequest, PlatformUpdateStatusResponse, UpdateStatus,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::client::OrchestratorClient;
use crate::config::AgentConfig;
use crate::metadata::{AgentMetadata, MetadataStore, UpdateStatusKind};
use crate::validation::{ValidationError, validate_response};

pub struct ControlLoopDeps {
    pub config: Arc<AgentConfig>,
    pub metadata: MetadataStore,
    pub client: OrchestratorClient,
    /// Monotonic timestamp of the last successful orchestrator contact,
    /// shared with the health reporter.
    pub last_contact: Arc<ArcSwap<Instant>>,
    pub responses_tx: mpsc::Sender<PlatformUpdateStatusResponse>,
    pub cancel: CancellationToken,
}

pub fn build_status_request(config: &AgentConfig, metadata: &AgentMetadata) -> PlatformUpdateStatusRequest {
    let actual = metadata.os_profile_update_source_actual.as_ref();
    PlatformUpdateStatusRequest {
        host_guid: config.host_guid.clone(),
        update_status: Some(UpdateStatus {
            status_type: basalt_rpc::basalt::StatusType::from(metadata.update_status) as i32,
            status_detail: metadata.update_log.clone(),
            profile_name: actual.map(|p| p.profile_name.clone()).unwrap_or_default(),
            profile_version: actual.map(|p| p.profile_version.clone()).unwrap_or_default(),
            os_image_id: actual.map(|p| p.os_image_id.clone()).unwrap_or_default(),
        }),
    }
}

pub async fn run_status_loop(deps: ControlLoopDeps) {
    let mut ticker = tokio::time::interval(deps.config.status_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = deps.cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let metadata = deps.metadata.load();
        let request = build_status_request(&deps.config, &metadata);

        let response = match deps.client.report(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "status report failed, will retry next cycle");
                continue;
            }
        };

        deps.last_contact.store(Arc::new(Instant::now()));

        // The terminal "updated" is reported exactly once.
        if metadata.update_status == UpdateStatusKind::Updated {
            let _ = deps.metadata.mutate(|m| {
                if m.update_status == UpdateStatusKind::Updated {
                    m.update_status = UpdateStatusKind::UpToDate;
                }
            });
        }

        handle_response(&deps, response);
    }
}

fn handle_response(deps: &ControlLoopDeps, response: PlatformUpdateStatusResponse) {
    match validate_response(deps.config.os_type, &response) {
        Ok(()) => {
            // Unbuffered hand-off: drop when the handler is not ready.
            if deps.responses_tx.try_send(response).is_err() {
                tracing::debug!("schedule handler busy, response dropped");
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "dropping orchestrator response");
            if err == ValidationError::UnsafeKernelCommand {
                let _ = deps.metadata.mutate(|m| {
                    m.update_log = err.to_string();
                });
            }
        }
    }
}

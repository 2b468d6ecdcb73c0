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

//! Thin RPC clients. Each call builds a fresh connection, so a retry
//! after a transport failure always reconnects instead of reusing a dead
//! channel.

use std::path::PathBuf;
use std::time::Duration;

use basalt_rpc::basalt::dispatcher_client::DispatcherClient as RpcDispatcherClient;
use basalt_rpc::basalt::platform_update_client::PlatformUpdateClient;
use basalt_rpc::basalt::{
    DispatcherResponse, PlatformUpdateStatusRequest, PlatformUpdateStatusResponse,
    UpdateSystemSoftwareRequest,
};
use tonic::transport::Endpoint;

use crate::error::{AgentError, AgentResult};

#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    url: String,
    retries: u32,
}

impl OrchestratorClient {
    pub fn new(url: String, retries: u32) -> Self {
        Self { url, retries }
    }

    /// Send one status report, retrying with exponential backoff up to
    /// the configured budget. Every attempt dials a fresh connection.
    pub async fn report(
        &self,
        request: PlatformUpdateStatusRequest,
    ) -> AgentResult<PlatformUpdateStatusResponse> {
        let url = self.url.clone();
        tryhard::retry_fn(move || {
            let url = url.clone();
            let request = request.clone();
            async move {
                let channel = Endpoint::from_shared(url)
                    .map_err(AgentError::from)?
                    .connect()
                    .await
                    .map_err(AgentError::from)?;
                let mut client = PlatformUpdateClient::new(channel);
                Ok::<_, AgentError>(
                    client
                        .report_platform_update_status(request)
                        .await?
                        .into_inner(),
                )
            }
        })
        .retries(self.retries)
        .exponential_backoff(Duration::from_millis(500))
        .max_delay(Duration::from_secs(10))
        .await
    }
}

#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    socket_path: PathBuf,
}

impl DispatcherHandle {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    pub async fn update_system_software(
        &self,
        request: UpdateSystemSoftwareRequest,
    ) -> AgentResult<DispatcherResponse> {
        let channel = basalt_rpc::socket::connect_unix(&self.socket_path).await?;
        let mut client = RpcDispatcherClient::new(channel);
        Ok(client.update_system_software(request).await?.into_inner())
    }
}
